//! Assignment evaluation
//!
//! `target = value` and `target op= value`. Compound assignment reads the
//! target, applies the operator, then writes back; the target's
//! subexpressions are evaluated for the read and again for the write.

use crate::ast::{Expr, ExprKind, InfixOp};
use crate::dispatch;
use crate::error::type_name;
use crate::value::{propagate, propagate_result};
use crate::{Environment, EvalError, Interpreter, Value};

use super::binary::apply_infix;
use super::index::checked_index;
use super::Evaluate;

/// Evaluate an assignment. Yields the assigned value.
pub fn eval_assign(
    target: &Expr,
    op: Option<InfixOp>,
    value: &Expr,
    env: &Environment,
    interp: &mut Interpreter,
) -> Value {
    let value = match op {
        Some(op) => {
            let current = propagate!(target.eval(env, interp));
            let rhs = propagate!(value.eval(env, interp));
            propagate_result!(apply_infix(op, current, rhs))
        }
        None => propagate!(value.eval(env, interp)),
    };
    propagate_result!(write(target, value.clone(), env, interp));
    value
}

fn write(
    target: &Expr,
    value: Value,
    env: &Environment,
    interp: &mut Interpreter,
) -> Result<(), EvalError> {
    match &target.kind {
        ExprKind::Ident(name) => {
            env.set(name, value);
            Ok(())
        }
        ExprKind::Member { object, property } => {
            match object.eval(env, interp).into_result()? {
                Value::Instance(instance) => dispatch::set_member(&instance, property, value, env),
                Value::Class(class) => dispatch::assign_class_member(&class, property, value, env),
                other => Err(EvalError::type_mismatch(format!(
                    "cannot assign field {property} on {}",
                    type_name(&other)
                ))),
            }
        }
        ExprKind::Index { object, index } => {
            let object = object.eval(env, interp).into_result()?;
            let index = index.eval(env, interp).into_result()?;
            match object {
                Value::Array(items) => {
                    let mut items = items.borrow_mut();
                    let i = checked_index(&index, items.len())?;
                    items[i] = value;
                    Ok(())
                }
                other => Err(EvalError::type_mismatch(format!(
                    "cannot assign by index into {}",
                    type_name(&other)
                ))),
            }
        }
        ExprKind::StaticAccess { class, member } => {
            dispatch::static_assign(interp, class, member, value, env)
        }
        _ => Err(EvalError::runtime("invalid assignment target")),
    }
}

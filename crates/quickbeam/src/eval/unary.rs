//! Unary operation evaluation

use crate::ast::{Expr, PrefixOp};
use crate::error::type_name;
use crate::value::propagate;
use crate::{Environment, EvalError, Interpreter, Value};

use super::Evaluate;

/// Evaluate `-x` or `!x`.
pub fn eval_prefix(
    op: PrefixOp,
    operand: &Expr,
    env: &Environment,
    interp: &mut Interpreter,
) -> Value {
    let value = propagate!(operand.eval(env, interp));
    match op {
        PrefixOp::Neg => eval_neg(value),
        PrefixOp::Not => Value::Bool(!value.is_truthy()),
    }
}

fn eval_neg(value: Value) -> Value {
    match value {
        Value::Int(n) => match n.checked_neg() {
            Some(result) => Value::Int(result),
            None => Value::error(EvalError::IntegerOverflow {
                op: "-".to_string(),
            }),
        },
        Value::Float(n) => Value::Float(-n),
        other => Value::error(EvalError::type_mismatch(format!(
            "cannot negate {}",
            type_name(&other)
        ))),
    }
}

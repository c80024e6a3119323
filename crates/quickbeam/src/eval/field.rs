//! Member access evaluation (`object.property`)

use std::rc::Rc;

use crate::ast::Expr;
use crate::dispatch::{self, resolve_type};
use crate::error::type_name;
use crate::value::{propagate, propagate_result, BoundStringMethod};
use crate::{Environment, EvalError, Interpreter, Value};

use super::string_methods::StringMethod;
use super::Evaluate;

/// Evaluate `object.property`.
///
/// A dotted chain (`App.Models.User`) bound as a whole name wins outright.
/// If its first segment is neither a variable nor a known type it is then
/// tried as a qualified type name, resolving through the namespace registry
/// and loading the defining file if needed.
pub fn eval_member(
    expr: &Expr,
    object: &Expr,
    property: &str,
    env: &Environment,
    interp: &mut Interpreter,
) -> Value {
    if let Some(path) = expr.dotted_path() {
        if let Some(value) = env.get(&path) {
            return value;
        }
        let root = path.split('.').next().unwrap_or(&path);
        if !env.contains(root) && !dispatch::names_type(interp, root) {
            if let Some(value) = propagate_result!(resolve_type(interp, &path, env)) {
                return value;
            }
        }
    }

    let receiver = propagate!(object.eval(env, interp));
    propagate_result!(member_of(&receiver, property, env))
}

/// Look up `property` on an evaluated receiver.
fn member_of(receiver: &Value, property: &str, env: &Environment) -> Result<Value, EvalError> {
    match receiver {
        Value::Instance(instance) => dispatch::get_member(instance, property, env),
        Value::Class(class) => dispatch::class_member(class, class, property, env),
        Value::Str(s) => match StringMethod::from_name(property) {
            Some(method) => Ok(Value::BoundStringMethod(Rc::new(BoundStringMethod {
                receiver: Rc::clone(s),
                method,
            }))),
            None => Err(EvalError::undefined_member("string", property)),
        },
        Value::Array(items) if property == "length" => {
            Ok(Value::Int(items.borrow().len() as i64))
        }
        other => Err(EvalError::undefined_member(type_name(other), property)),
    }
}

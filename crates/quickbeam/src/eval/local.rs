//! Local variable declarations: `let` and `:=`

use crate::ast::Expr;
use crate::value::propagate;
use crate::{Environment, Interpreter, Value};

use super::Evaluate;

/// Bind `name` in the current scope. A missing initializer binds `null`.
///
/// Declaring always creates a local binding, shadowing any outer one.
/// Yields `null`.
pub fn eval_let(
    name: &str,
    value: Option<&Expr>,
    env: &Environment,
    interp: &mut Interpreter,
) -> Value {
    let value = match value {
        Some(expr) => propagate!(expr.eval(env, interp)),
        None => Value::Null,
    };
    env.define(name, value);
    Value::Null
}

//! Array literal evaluation

use crate::ast::Expr;
use crate::value::propagate;
use crate::{Environment, Interpreter, Value};

use super::Evaluate;

/// Evaluate `[a, b, c]`. Elements are evaluated left to right; the first
/// error wins.
pub fn eval_array(items: &[Expr], env: &Environment, interp: &mut Interpreter) -> Value {
    let mut values = Vec::with_capacity(items.len());
    for item in items {
        values.push(propagate!(item.eval(env, interp)));
    }
    Value::array(values)
}

//! Conditional evaluation: `if` statements and `?:`

use crate::ast::{Block, Expr, Stmt};
use crate::value::propagate;
use crate::{Environment, Interpreter, Value};

use super::{eval_block, Evaluate};

/// Evaluate `if cond { } else ...`.
///
/// Whatever the taken branch yields (including signals) is the result;
/// with no branch taken the result is `null`.
pub fn eval_if(
    condition: &Expr,
    then_branch: &Block,
    else_branch: Option<&Stmt>,
    env: &Environment,
    interp: &mut Interpreter,
) -> Value {
    let cond = propagate!(condition.eval(env, interp));
    if cond.is_truthy() {
        eval_block(then_branch, env, interp)
    } else if let Some(else_branch) = else_branch {
        else_branch.eval(env, interp)
    } else {
        Value::Null
    }
}

/// Evaluate `cond ? a : b`; only the chosen side is evaluated.
pub fn eval_ternary(
    condition: &Expr,
    then_branch: &Expr,
    else_branch: &Expr,
    env: &Environment,
    interp: &mut Interpreter,
) -> Value {
    let cond = propagate!(condition.eval(env, interp));
    if cond.is_truthy() {
        then_branch.eval(env, interp)
    } else {
        else_branch.eval(env, interp)
    }
}

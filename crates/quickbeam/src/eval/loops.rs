//! Loop evaluation
//!
//! All three `for` forms share one evaluator. The loop consumes `break` and
//! `continue`; `return` and errors leave the loop unchanged.

use crate::ast::ForLoop;
use crate::value::propagate;
use crate::{Environment, EvalError, Interpreter, Value};

use super::{eval_block, Evaluate};

/// Evaluate a `for` loop. Yields `null` when the loop ends normally.
pub fn eval_for(for_loop: &ForLoop, env: &Environment, interp: &mut Interpreter) -> Value {
    // The init statement's bindings belong to the loop, not the enclosing block
    let loop_env = env.new_child();
    if let Some(init) = &for_loop.init {
        let value = init.eval(&loop_env, interp);
        if value.is_signal() {
            return value;
        }
    }

    loop {
        if interp.ctx.is_interrupted() {
            return Value::error(EvalError::Interrupted);
        }

        if let Some(condition) = &for_loop.condition {
            let cond = propagate!(condition.eval(&loop_env, interp));
            if !cond.is_truthy() {
                break;
            }
        }

        match eval_block(&for_loop.body, &loop_env, interp) {
            Value::Break => break,
            signal @ (Value::Return(_) | Value::Error(_)) => return signal,
            // Continue and normal completion both run the post statement
            _ => {}
        }

        if let Some(post) = &for_loop.post {
            let value = post.eval(&loop_env, interp);
            if value.is_signal() {
                return value;
            }
        }
    }

    Value::Null
}

//! Function call evaluation

use crate::ast::{Expr, FunctionDecl};
use crate::dispatch;
use crate::error::type_name;
use crate::stack::ensure_sufficient_stack;
use crate::value::{propagate, propagate_result, BuiltinFn, Function};
use crate::{Environment, EvalError, Interpreter, Value};

use super::stmt::eval_stmts;
use super::{eval_args, Evaluate};

/// Evaluate `callee(args)`: callee first, then arguments left to right.
pub fn eval_call(callee: &Expr, args: &[Expr], env: &Environment, interp: &mut Interpreter) -> Value {
    let func = propagate!(callee.eval(env, interp));
    let args = propagate_result!(eval_args(args, env, interp));
    call_value(interp, &func, args)
}

/// Call a Value as a function.
///
/// Yields the callee's result with `return` already unwrapped, or an
/// error: `NotCallable` for non-callables, `ArityMismatch` for a wrong
/// argument count.
pub fn call_value(interp: &mut Interpreter, func: &Value, args: Vec<Value>) -> Value {
    match func {
        Value::Function(f) => call_function(interp, f, args),
        Value::Builtin(b) => propagate_result!(call_builtin(interp, b, &args)),
        Value::BoundMethod(m) => dispatch::call_method(
            interp,
            m.receiver.clone(),
            &m.class,
            &m.called,
            &m.method,
            args,
        ),
        Value::BoundStringMethod(m) => propagate_result!(m.method.call(&m.receiver, &args)),
        other => Value::error(EvalError::NotCallable {
            kind: type_name(other).to_string(),
        }),
    }
}

/// Call a closure: parameters are bound in a child of the captured scope.
fn call_function(interp: &mut Interpreter, func: &Function, args: Vec<Value>) -> Value {
    propagate_result!(interp.ctx.enter_call());
    let env = func.env.new_child();
    let result = ensure_sufficient_stack(|| {
        match bind_params(interp, &func.decl, func.name(), args, &env) {
            Ok(()) => eval_stmts(&func.decl.body.stmts, &env, interp),
            Err(err) => Value::from(err),
        }
    });
    interp.ctx.exit_call();
    result.into_call_result()
}

/// Bind arguments to parameters in `env`.
///
/// Omitted trailing parameters take their default, evaluated at call time
/// in `env` (so a default may refer to earlier parameters); an omitted
/// parameter without a default, or any surplus argument, is an arity error.
pub(crate) fn bind_params(
    interp: &mut Interpreter,
    decl: &FunctionDecl,
    name: &str,
    args: Vec<Value>,
    env: &Environment,
) -> Result<(), EvalError> {
    let arity_error = |got: usize| EvalError::ArityMismatch {
        name: name.to_string(),
        expected: decl.params.len(),
        got,
    };
    let got = args.len();
    if got > decl.params.len() {
        return Err(arity_error(got));
    }

    let mut args = args.into_iter();
    for param in &decl.params {
        let value = match (args.next(), &param.default) {
            (Some(value), _) => value,
            (None, Some(default)) => default.eval(env, interp).into_result()?,
            (None, None) => return Err(arity_error(got)),
        };
        env.define(param.name.clone(), value);
    }
    Ok(())
}

/// Call a builtin, checking its arity first. Variadic builtins (negative
/// arity) accept any count.
fn call_builtin(
    interp: &mut Interpreter,
    builtin: &BuiltinFn,
    args: &[Value],
) -> Result<Value, EvalError> {
    if let Ok(expected) = usize::try_from(builtin.arity) {
        if args.len() != expected {
            return Err(EvalError::ArityMismatch {
                name: builtin.name.clone(),
                expected,
                got: args.len(),
            });
        }
    }
    (builtin.func)(args, interp.output()).map_err(|message| EvalError::Builtin {
        name: builtin.name.clone(),
        message,
    })
}

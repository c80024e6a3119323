//! Identifier evaluation

use crate::dispatch::resolve_type;
use crate::value::propagate_result;
use crate::{Environment, EvalError, Interpreter, Value};

/// Evaluate an identifier.
///
/// Variables shadow types; a name that is not bound anywhere in the chain
/// is tried as a class or interface name.
pub fn eval_ident(name: &str, env: &Environment, interp: &mut Interpreter) -> Value {
    if let Some(value) = env.get(name) {
        return value;
    }
    match propagate_result!(resolve_type(interp, name, env)) {
        Some(value) => value,
        None => Value::error(EvalError::UndefinedIdentifier {
            name: name.to_string(),
        }),
    }
}

/// Evaluate `this` or bare `super`, which only exist inside methods.
pub fn eval_bound(keyword: &str, env: &Environment) -> Value {
    env.get(keyword).unwrap_or_else(|| {
        Value::error(EvalError::runtime(format!(
            "`{keyword}` used outside of a method"
        )))
    })
}

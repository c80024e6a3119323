//! Control signals: return, error, break and continue
//!
//! Signals are ordinary [`Value`] variants. A block stops at the first
//! statement that yields one and hands it upward unchanged; only the
//! construct that handles a kind consumes it:
//!
//! - loops consume `Break` and `Continue`
//! - call boundaries unwrap `Return` to its inner value
//! - `Error` travels until the host surfaces it
//!
//! Expression evaluators use [`propagate!`] after every sub-evaluation so an
//! error short-circuits the rest of the work.

use super::Value;
use crate::error::EvalError;

/// Return early from the enclosing evaluator if the value is an error.
///
/// Evaluates to the value otherwise.
macro_rules! propagate {
    ($value:expr) => {{
        let value = $value;
        if value.is_error() {
            return value;
        }
        value
    }};
}

/// Unwrap a `Result<T, EvalError>`, returning the error as a signal value
/// from the enclosing evaluator on failure.
macro_rules! propagate_result {
    ($result:expr) => {
        match $result {
            Ok(value) => value,
            Err(err) => return $crate::value::Value::from(err),
        }
    };
}

pub(crate) use propagate;
pub(crate) use propagate_result;

impl Value {
    /// Create an error signal.
    pub fn error(err: EvalError) -> Self {
        Value::Error(Box::new(err))
    }

    /// Create a return signal.
    pub fn return_value(value: Value) -> Self {
        Value::Return(Box::new(value))
    }

    /// Check whether this value is any of the four signals.
    pub fn is_signal(&self) -> bool {
        matches!(
            self,
            Value::Return(_) | Value::Error(_) | Value::Break | Value::Continue
        )
    }

    /// Check whether this value is an error signal.
    pub fn is_error(&self) -> bool {
        matches!(self, Value::Error(_))
    }

    /// Borrow the error if this is an error signal.
    pub fn as_error(&self) -> Option<&EvalError> {
        match self {
            Value::Error(err) => Some(err),
            _ => None,
        }
    }

    /// Consume the result of a function, method or constructor body at its
    /// call boundary.
    ///
    /// `Return` unwraps to its payload, errors pass through, a loop signal
    /// that escaped every loop becomes an error, and normal completion
    /// yields `null`.
    pub fn into_call_result(self) -> Value {
        match self {
            Value::Return(inner) => *inner,
            Value::Error(_) => self,
            Value::Break => Value::error(EvalError::BreakOutsideLoop),
            Value::Continue => Value::error(EvalError::ContinueOutsideLoop),
            _ => Value::Null,
        }
    }

    /// Split into the Rust-side `Result` used by the dispatch engine and the
    /// module loader.
    pub fn into_result(self) -> Result<Value, EvalError> {
        match self {
            Value::Error(err) => Err(*err),
            other => Ok(other),
        }
    }
}

impl From<EvalError> for Value {
    fn from(err: EvalError) -> Self {
        Value::error(err)
    }
}

impl From<Result<Value, EvalError>> for Value {
    fn from(result: Result<Value, EvalError>) -> Self {
        result.unwrap_or_else(Value::error)
    }
}

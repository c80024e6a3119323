//! Index evaluation (`object[index]`)

use crate::ast::Expr;
use crate::error::type_name;
use crate::value::{propagate, propagate_result};
use crate::{Environment, EvalError, Interpreter, Value};

use super::Evaluate;

/// Evaluate `object[index]` on an array or a string.
pub fn eval_index(object: &Expr, index: &Expr, env: &Environment, interp: &mut Interpreter) -> Value {
    let object = propagate!(object.eval(env, interp));
    let index = propagate!(index.eval(env, interp));
    propagate_result!(index_value(&object, &index))
}

/// Read element `index` of an array, or character `index` of a string.
pub fn index_value(object: &Value, index: &Value) -> Result<Value, EvalError> {
    match object {
        Value::Array(items) => {
            let items = items.borrow();
            let i = checked_index(index, items.len())?;
            Ok(items[i].clone())
        }
        Value::Str(s) => {
            let len = s.chars().count();
            let i = checked_index(index, len)?;
            Ok(s.chars().nth(i).map(|c| Value::string(c.to_string())).unwrap_or(Value::Null))
        }
        other => Err(EvalError::type_mismatch(format!(
            "cannot index into {}",
            type_name(other)
        ))),
    }
}

/// Validate an index against a length.
pub(crate) fn checked_index(index: &Value, len: usize) -> Result<usize, EvalError> {
    let Value::Int(n) = index else {
        return Err(EvalError::type_mismatch(format!(
            "index must be an int, found {}",
            type_name(index)
        )));
    };
    usize::try_from(*n)
        .ok()
        .filter(|i| *i < len)
        .ok_or_else(|| EvalError::runtime(format!("index {n} out of bounds for length {len}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_array_index() {
        let array = Value::array(vec![Value::Int(10), Value::Int(20)]);
        assert_eq!(index_value(&array, &Value::Int(1)).unwrap(), Value::Int(20));
    }

    #[test]
    fn test_string_index_is_char_based() {
        let s = Value::string("héllo");
        assert_eq!(index_value(&s, &Value::Int(1)).unwrap(), Value::string("é"));
    }

    #[test]
    fn test_out_of_bounds() {
        let array = Value::array(vec![Value::Int(1)]);
        let err = index_value(&array, &Value::Int(1)).unwrap_err();
        assert_eq!(err.to_string(), "index 1 out of bounds for length 1");
        assert!(index_value(&array, &Value::Int(-1)).is_err());
    }

    #[test]
    fn test_non_int_index() {
        let array = Value::array(vec![]);
        assert!(matches!(
            index_value(&array, &Value::string("0")),
            Err(EvalError::TypeMismatch { .. })
        ));
    }
}

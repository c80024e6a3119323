//! Display and Debug implementations for Value

use std::fmt;

use super::*;

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(n) => write!(f, "{}", n),
            Value::Float(n) => write!(f, "{}", format_float(*n)),
            Value::Str(s) => write!(f, "{:?}", s.as_ref()),

            Value::Array(items) => {
                write!(f, "[")?;
                for (i, item) in items.borrow().iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{:?}", item)?;
                }
                write!(f, "]")
            }

            // Shallow: instance graphs may be cyclic
            Value::Instance(inst) => write!(f, "<{} instance>", inst.class.qualified_name()),

            Value::Function(func) => write!(f, "<func {}>", func.name()),
            Value::Builtin(b) => write!(f, "<builtin {}>", b.name),
            Value::BoundMethod(m) => {
                write!(f, "<method {}::{}>", m.class.qualified_name(), m.method.name())
            }
            Value::BoundStringMethod(m) => write!(f, "<string method {}>", m.method.name()),
            Value::Class(c) => write!(f, "<class {}>", c.qualified_name()),
            Value::Interface(i) => write!(f, "<interface {}>", i.qualified_name()),

            Value::Return(v) => write!(f, "return {:?}", v),
            Value::Error(e) => write!(f, "error: {}", e),
            Value::Break => write!(f, "break"),
            Value::Continue => write!(f, "continue"),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Display is the stringification used by `+` and `print`
        match self {
            Value::Str(s) => write!(f, "{}", s.as_ref()), // No quotes for Display
            _ => fmt::Debug::fmt(self, f),
        }
    }
}

/// Shortest decimal that round-trips to the same `f64`.
///
/// Whole numbers keep no fractional part (`3.0` prints as `3`).
fn format_float(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        if n > 0.0 { "Inf" } else { "-Inf" }.to_string()
    } else {
        format!("{}", n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_scalars() {
        assert_eq!(Value::Null.to_string(), "null");
        assert_eq!(Value::Bool(true).to_string(), "true");
        assert_eq!(Value::Int(-42).to_string(), "-42");
        assert_eq!(Value::string("hi").to_string(), "hi");
    }

    #[test]
    fn test_display_floats_round_trip() {
        assert_eq!(Value::Float(3.5).to_string(), "3.5");
        assert_eq!(Value::Float(3.0).to_string(), "3");
        assert_eq!(Value::Float(0.1).to_string(), "0.1");
        assert_eq!(Value::Float(f64::INFINITY).to_string(), "Inf");
    }

    #[test]
    fn test_debug_quotes_strings_in_arrays() {
        let arr = Value::array(vec![Value::Int(1), Value::string("a")]);
        assert_eq!(arr.to_string(), "[1, \"a\"]");
    }

    #[test]
    fn test_signals_display() {
        assert_eq!(Value::Break.to_string(), "break");
        assert_eq!(
            Value::error(crate::EvalError::DivisionByZero).to_string(),
            "error: division by zero"
        );
    }
}

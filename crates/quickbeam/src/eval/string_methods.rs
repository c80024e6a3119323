//! Builtin methods on strings
//!
//! `"abc".upper()` evaluates the member access to a bound string method,
//! then calls it. Positions and lengths count characters, not bytes.

use crate::error::type_name;
use crate::{EvalError, Value};

/// A method available on every string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringMethod {
    /// `length()`: character count
    Length,
    /// `upper()`
    Upper,
    /// `lower()`
    Lower,
    /// `trim()`: strip surrounding whitespace
    Trim,
    /// `contains(s)`
    Contains,
    /// `starts_with(s)`
    StartsWith,
    /// `ends_with(s)`
    EndsWith,
    /// `index_of(s)`: character position of the first match, or -1
    IndexOf,
    /// `replace(from, to)`: replace every occurrence
    Replace,
    /// `split(sep)`: array of pieces; an empty separator splits into characters
    Split,
    /// `substring(start[, end])`: characters in `start..end`
    Substring,
}

impl StringMethod {
    /// Look a method up by name.
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "length" => Self::Length,
            "upper" => Self::Upper,
            "lower" => Self::Lower,
            "trim" => Self::Trim,
            "contains" => Self::Contains,
            "starts_with" => Self::StartsWith,
            "ends_with" => Self::EndsWith,
            "index_of" => Self::IndexOf,
            "replace" => Self::Replace,
            "split" => Self::Split,
            "substring" => Self::Substring,
            _ => return None,
        })
    }

    /// The method's name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Length => "length",
            Self::Upper => "upper",
            Self::Lower => "lower",
            Self::Trim => "trim",
            Self::Contains => "contains",
            Self::StartsWith => "starts_with",
            Self::EndsWith => "ends_with",
            Self::IndexOf => "index_of",
            Self::Replace => "replace",
            Self::Split => "split",
            Self::Substring => "substring",
        }
    }

    /// Accepted argument counts (inclusive).
    fn arity(self) -> (usize, usize) {
        match self {
            Self::Length | Self::Upper | Self::Lower | Self::Trim => (0, 0),
            Self::Contains | Self::StartsWith | Self::EndsWith | Self::IndexOf | Self::Split => {
                (1, 1)
            }
            Self::Replace => (2, 2),
            Self::Substring => (1, 2),
        }
    }

    /// Call the method on `receiver`.
    pub fn call(self, receiver: &str, args: &[Value]) -> Result<Value, EvalError> {
        let (min, max) = self.arity();
        if args.len() < min || args.len() > max {
            return Err(EvalError::ArityMismatch {
                name: format!("string.{}", self.name()),
                expected: max,
                got: args.len(),
            });
        }

        let value = match self {
            Self::Length => Value::Int(receiver.chars().count() as i64),
            Self::Upper => Value::string(receiver.to_uppercase()),
            Self::Lower => Value::string(receiver.to_lowercase()),
            Self::Trim => Value::string(receiver.trim()),
            Self::Contains => Value::Bool(receiver.contains(self.str_arg(args, 0)?)),
            Self::StartsWith => Value::Bool(receiver.starts_with(self.str_arg(args, 0)?)),
            Self::EndsWith => Value::Bool(receiver.ends_with(self.str_arg(args, 0)?)),
            Self::IndexOf => {
                let needle = self.str_arg(args, 0)?;
                let position = receiver
                    .find(needle)
                    .map(|byte| receiver[..byte].chars().count() as i64)
                    .unwrap_or(-1);
                Value::Int(position)
            }
            Self::Replace => {
                let from = self.str_arg(args, 0)?;
                let to = self.str_arg(args, 1)?;
                Value::string(receiver.replace(from, to))
            }
            Self::Split => {
                let sep = self.str_arg(args, 0)?;
                let pieces = if sep.is_empty() {
                    receiver.chars().map(|c| Value::string(c.to_string())).collect()
                } else {
                    receiver.split(sep).map(Value::string).collect()
                };
                Value::array(pieces)
            }
            Self::Substring => {
                let len = receiver.chars().count();
                let start = self.int_arg(args, 0)?;
                let end = match args.get(1) {
                    Some(_) => self.int_arg(args, 1)?,
                    None => len,
                };
                if start > end || end > len {
                    return Err(EvalError::runtime(format!(
                        "substring range {start}..{end} out of bounds for length {len}"
                    )));
                }
                Value::string(receiver.chars().skip(start).take(end - start).collect::<String>())
            }
        };
        Ok(value)
    }

    fn str_arg<'a>(self, args: &'a [Value], i: usize) -> Result<&'a str, EvalError> {
        match args.get(i) {
            Some(Value::Str(s)) => Ok(&**s),
            other => Err(self.bad_arg("string", other)),
        }
    }

    fn int_arg(self, args: &[Value], i: usize) -> Result<usize, EvalError> {
        match args.get(i) {
            Some(Value::Int(n)) => usize::try_from(*n).map_err(|_| {
                EvalError::runtime(format!("{}: negative position {n}", self.name()))
            }),
            other => Err(self.bad_arg("int", other)),
        }
    }

    fn bad_arg(self, expected: &str, found: Option<&Value>) -> EvalError {
        EvalError::type_mismatch(format!(
            "{} expects {expected} arguments, found {}",
            self.name(),
            found.map(type_name).unwrap_or("nothing")
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn call(name: &str, receiver: &str, args: &[Value]) -> Value {
        StringMethod::from_name(name)
            .unwrap()
            .call(receiver, args)
            .unwrap()
    }

    #[test]
    fn test_case_and_trim() {
        assert_eq!(call("upper", "abc", &[]), Value::string("ABC"));
        assert_eq!(call("lower", "ABC", &[]), Value::string("abc"));
        assert_eq!(call("trim", "  x  ", &[]), Value::string("x"));
        assert_eq!(call("length", "héllo", &[]), Value::Int(5));
    }

    #[test]
    fn test_index_of_counts_characters() {
        assert_eq!(call("index_of", "héllo", &[Value::string("l")]), Value::Int(2));
        assert_eq!(call("index_of", "abc", &[Value::string("z")]), Value::Int(-1));
    }

    #[test]
    fn test_split() {
        assert_eq!(
            call("split", "a,b", &[Value::string(",")]),
            Value::array(vec![Value::string("a"), Value::string("b")])
        );
        assert_eq!(
            call("split", "ab", &[Value::string("")]),
            Value::array(vec![Value::string("a"), Value::string("b")])
        );
    }

    #[test]
    fn test_substring() {
        assert_eq!(call("substring", "hello", &[Value::Int(1), Value::Int(3)]), Value::string("el"));
        assert_eq!(call("substring", "hello", &[Value::Int(3)]), Value::string("lo"));
        assert!(StringMethod::Substring
            .call("hi", &[Value::Int(1), Value::Int(5)])
            .is_err());
    }

    #[test]
    fn test_replace_and_predicates() {
        assert_eq!(
            call("replace", "a-b-c", &[Value::string("-"), Value::string("+")]),
            Value::string("a+b+c")
        );
        assert_eq!(call("starts_with", "hello", &[Value::string("he")]), Value::Bool(true));
        assert_eq!(call("ends_with", "hello", &[Value::string("x")]), Value::Bool(false));
        assert_eq!(call("contains", "hello", &[Value::string("ll")]), Value::Bool(true));
    }

    #[test]
    fn test_arity_and_argument_types() {
        assert!(matches!(
            StringMethod::Upper.call("x", &[Value::Int(1)]),
            Err(EvalError::ArityMismatch { .. })
        ));
        assert!(matches!(
            StringMethod::Contains.call("x", &[Value::Int(1)]),
            Err(EvalError::TypeMismatch { .. })
        ));
        assert_eq!(StringMethod::from_name("reverse"), None);
    }
}

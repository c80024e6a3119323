//! Literal evaluation

use crate::ast::Literal;
use crate::Value;

/// Evaluate a literal.
pub fn eval_literal(lit: &Literal) -> Value {
    match lit {
        Literal::Null => Value::Null,
        Literal::Bool(b) => Value::Bool(*b),
        Literal::Int(n) => Value::Int(*n),
        Literal::Float(n) => Value::Float(*n),
        Literal::Str(s) => Value::string(s),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literals() {
        assert_eq!(eval_literal(&Literal::Null), Value::Null);
        assert_eq!(eval_literal(&Literal::Int(42)), Value::Int(42));
        assert_eq!(eval_literal(&Literal::Float(2.5)), Value::Float(2.5));
        assert_eq!(
            eval_literal(&Literal::Str("hi".to_string())),
            Value::string("hi")
        );
    }
}

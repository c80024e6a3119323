//! Reference frontend for Quickbeam surface syntax
//!
//! Tokenizes and parses `.qb` source text into the AST, and formats errors
//! and values in Quickbeam style.

mod lexer;
mod parser;

use crate::ast::Program;
use crate::frontend::{LanguageFrontend, ParseError};
use crate::{EvalError, Value};

use lexer::Lexer;
use parser::Parser;

/// Quickbeam language frontend.
///
/// # Example
///
/// ```
/// use quickbeam::frontends::QuickbeamFrontend;
/// use quickbeam::LanguageFrontend;
///
/// let frontend = QuickbeamFrontend::new();
/// let program = frontend.parse("x := 1 + 2", "<input>").unwrap();
/// assert_eq!(program.stmts.len(), 1);
/// assert_eq!(frontend.name(), "Quickbeam");
/// assert_eq!(frontend.file_extension(), "qb");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct QuickbeamFrontend;

impl QuickbeamFrontend {
    /// Create a new Quickbeam frontend.
    pub fn new() -> Self {
        Self
    }
}

impl LanguageFrontend for QuickbeamFrontend {
    fn parse(&self, source: &str, file: &str) -> Result<Program, ParseError> {
        let tokens = Lexer::new(source, file).tokenize()?;
        Parser::new(tokens, file).parse_program()
    }

    fn format_error(&self, error: &EvalError, _source: &str) -> String {
        match error {
            EvalError::UndefinedIdentifier { name } => {
                format!("error: cannot find `{}` in this scope", name)
            }
            EvalError::ArityMismatch {
                name,
                expected,
                got,
            } => format!(
                "error: `{}` takes {} argument{} but {} {} supplied",
                name,
                expected,
                if *expected == 1 { "" } else { "s" },
                got,
                if *got == 1 { "was" } else { "were" }
            ),
            _ => format!("error: {}", error),
        }
    }

    fn format_value(&self, value: &Value, depth: usize) -> String {
        format_value_qb(value, depth, 0)
    }

    fn name(&self) -> &str {
        "Quickbeam"
    }

    fn file_extension(&self) -> &str {
        "qb"
    }
}

/// Format a value in Quickbeam literal syntax.
fn format_value_qb(value: &Value, max_depth: usize, current_depth: usize) -> String {
    if current_depth >= max_depth && max_depth > 0 {
        return "...".to_string();
    }

    match value {
        Value::Str(s) => format!("\"{}\"", s.escape_default()),
        Value::Array(items) => {
            let items = items.borrow();
            let formatted: Vec<_> = items
                .iter()
                .take(10) // Limit to first 10 elements
                .map(|v| format_value_qb(v, max_depth, current_depth + 1))
                .collect();
            if items.len() > 10 {
                format!("[{}, ...]", formatted.join(", "))
            } else {
                format!("[{}]", formatted.join(", "))
            }
        }
        Value::Instance(inst) => {
            let fields = inst.fields.borrow();
            if fields.is_empty() {
                format!("{} {{}}", inst.class.qualified_name())
            } else {
                let formatted: Vec<_> = fields
                    .iter()
                    .take(5)
                    .map(|(k, v)| {
                        format!("{}: {}", k, format_value_qb(v, max_depth, current_depth + 1))
                    })
                    .collect();
                if fields.len() > 5 {
                    format!("{} {{ {}, .. }}", inst.class.qualified_name(), formatted.join(", "))
                } else {
                    format!("{} {{ {} }}", inst.class.qualified_name(), formatted.join(", "))
                }
            }
        }
        other => format!("{:?}", other),
    }
}

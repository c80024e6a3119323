//! Language frontend trait for Quickbeam
//!
//! This module defines the `LanguageFrontend` trait that separates source
//! syntax from evaluation. The interpreter core and the module loader only
//! ever see a parsed [`Program`].
//!
//! # Architecture
//!
//! ```text
//! Source Code → [Frontend] → Program (AST) → [Quickbeam Core] → Value
//! ```
//!
//! Frontends are responsible for:
//! - Parsing source code into the Quickbeam AST
//! - Language-specific error formatting
//! - Language-specific value formatting
//!
//! The interpreter core is responsible for:
//! - Evaluating AST nodes
//! - Managing runtime environments, namespaces and module loading

use std::fmt;

use crate::ast::Program;
use crate::{EvalError, Value};

// ═══════════════════════════════════════════════════════════════════════
// ERROR TYPES
// ═══════════════════════════════════════════════════════════════════════

/// Error that occurred during parsing.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    /// Human-readable error message
    pub message: String,

    /// Optional source location
    pub location: Option<SourceLocation>,
}

impl ParseError {
    /// Create a new parse error with just a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            location: None,
        }
    }

    /// Add location information to the error.
    pub fn with_location(mut self, location: SourceLocation) -> Self {
        self.location = Some(location);
        self
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(loc) = &self.location {
            write!(f, " at {}:{}:{}", loc.file, loc.line, loc.column)?;
        }
        Ok(())
    }
}

impl std::error::Error for ParseError {}

/// Source code location for error reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLocation {
    /// File name or identifier
    pub file: String,

    /// Line number (1-indexed)
    pub line: usize,

    /// Column number (1-indexed)
    pub column: usize,
}

impl SourceLocation {
    /// Create a new source location.
    pub fn new(file: impl Into<String>, line: usize, column: usize) -> Self {
        Self {
            file: file.into(),
            line,
            column,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// LANGUAGE FRONTEND TRAIT
// ═══════════════════════════════════════════════════════════════════════

/// Language frontend interface for Quickbeam.
///
/// The module loader holds a frontend behind this trait and calls
/// [`parse`](LanguageFrontend::parse) on every file a `use` statement pulls
/// in, so an alternative surface syntax only has to produce the same
/// [`Program`] shape.
///
/// # Example Implementation
///
/// ```rust
/// use quickbeam::ast::Program;
/// use quickbeam::frontend::{LanguageFrontend, ParseError};
/// use quickbeam::{EvalError, Value};
///
/// struct EmptyFrontend;
///
/// impl LanguageFrontend for EmptyFrontend {
///     fn parse(&self, _source: &str, _file: &str) -> Result<Program, ParseError> {
///         Ok(Program::default())
///     }
///
///     fn format_error(&self, error: &EvalError, _source: &str) -> String {
///         format!("error: {}", error)
///     }
///
///     fn format_value(&self, value: &Value, _depth: usize) -> String {
///         format!("{:?}", value)
///     }
///
///     fn name(&self) -> &str {
///         "Empty"
///     }
///
///     fn file_extension(&self) -> &str {
///         "empty"
///     }
/// }
/// ```
pub trait LanguageFrontend {
    /// Parse source code into a program.
    ///
    /// `file` names the source for diagnostics only; it is never read.
    ///
    /// # Errors
    ///
    /// Returns `ParseError` if the source cannot be parsed.
    fn parse(&self, source: &str, file: &str) -> Result<Program, ParseError>;

    /// Format an evaluation error in a language-appropriate style.
    ///
    /// # Parameters
    ///
    /// - `error`: The evaluation error to format
    /// - `source`: The original source code (for context and snippets)
    fn format_error(&self, error: &EvalError, source: &str) -> String;

    /// Format a value in a language-appropriate style.
    ///
    /// The depth parameter controls how deeply nested arrays are shown
    /// (0 = compact).
    fn format_value(&self, value: &Value, depth: usize) -> String;

    /// Return the name of this language frontend.
    fn name(&self) -> &str;

    /// Return the file extension for this language, without the dot.
    fn file_extension(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_creation() {
        let err = ParseError::new("unexpected token");
        assert_eq!(err.message, "unexpected token");
        assert!(err.location.is_none());
    }

    #[test]
    fn test_parse_error_display() {
        let err = ParseError::new("unexpected token")
            .with_location(SourceLocation::new("main.qb", 10, 5));
        assert_eq!(err.to_string(), "unexpected token at main.qb:10:5");
    }

    #[test]
    fn test_source_location() {
        let loc = SourceLocation::new("main.qb", 42, 10);
        assert_eq!(loc.file, "main.qb");
        assert_eq!(loc.line, 42);
        assert_eq!(loc.column, 10);
    }
}

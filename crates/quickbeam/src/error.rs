//! Error types for Quickbeam evaluation

use std::path::PathBuf;

use thiserror::Error;

use crate::Value;

/// Runtime error carried by the `error` signal.
///
/// Evaluation never unwinds: an `EvalError` travels upward inside
/// [`Value::Error`] until something surfaces it. The `Display` output is the
/// message a host prints before exiting with a failure status.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    /// Identifier not bound in any enclosing scope
    #[error("undefined identifier: {name}")]
    UndefinedIdentifier {
        /// The identifier
        name: String,
    },

    /// Class name could not be resolved
    #[error("undefined class: {name}")]
    UndefinedClass {
        /// The class name as written
        name: String,
    },

    /// Interface name could not be resolved
    #[error("undefined interface: {name}")]
    UndefinedInterface {
        /// The interface name as written
        name: String,
    },

    /// Name resolved to something that is not a class
    #[error("{name} is not a class (found {found})")]
    NotAClass {
        /// The name as written
        name: String,
        /// Kind of value found instead
        found: String,
    },

    /// Name resolved to something that is not an interface
    #[error("{name} is not an interface (found {found})")]
    NotAnInterface {
        /// The name as written
        name: String,
        /// Kind of value found instead
        found: String,
    },

    /// Member lookup failed on a class, instance or value
    #[error("undefined member {member} on {owner}")]
    UndefinedMember {
        /// Description of the receiver
        owner: String,
        /// The member name
        member: String,
    },

    /// Operator or operation applied to incompatible kinds
    #[error("type mismatch: {message}")]
    TypeMismatch {
        /// Details
        message: String,
    },

    /// Division by zero
    #[error("division by zero")]
    DivisionByZero,

    /// Modulo by zero
    #[error("modulo by zero")]
    ModuloByZero,

    /// Checked integer arithmetic overflowed
    #[error("integer overflow in {op}")]
    IntegerOverflow {
        /// The operator
        op: String,
    },

    /// A class declared an interface it does not fully implement
    #[error("class {class} does not implement {interface}::{method}")]
    InterfaceNotImplemented {
        /// Offending class
        class: String,
        /// Interface declaring the requirement
        interface: String,
        /// Missing method
        method: String,
    },

    /// More than one class declares a static `main`
    #[error("ambiguous entry point: static main declared by {}", .classes.join(", "))]
    AmbiguousEntryPoint {
        /// Qualified names of every candidate
        classes: Vec<String>,
    },

    /// No class declares a static `main`
    #[error("missing entry point: no class declares a static main method")]
    MissingEntryPoint,

    /// A `use` target matched no file
    #[error("module not found: {path} (tried: {})", display_paths(.attempted))]
    ModuleNotFound {
        /// The qualified path from the `use` statement
        path: String,
        /// Every candidate file that was checked
        attempted: Vec<PathBuf>,
    },

    /// A loaded source file failed to parse
    #[error("parse error in {}: {message}", .file.display())]
    ParseError {
        /// The file being loaded
        file: PathBuf,
        /// Parser message including position
        message: String,
    },

    /// Reading a source file failed
    #[error("cannot read {}: {message}", .file.display())]
    Io {
        /// The file being read
        file: PathBuf,
        /// OS error text
        message: String,
    },

    /// Nested `use` loading went deeper than allowed
    #[error("import depth exceeded ({max}) while loading {path}")]
    ImportDepthExceeded {
        /// The path being imported
        path: String,
        /// Configured maximum
        max: usize,
    },

    /// Wrong number of arguments
    #[error("{name} expects {expected} argument{}, got {got}", plural(.expected))]
    ArityMismatch {
        /// Callee name
        name: String,
        /// Expected count (upper bound when defaults exist)
        expected: usize,
        /// Provided count
        got: usize,
    },

    /// Attempted to call a value that is not callable
    #[error("{kind} is not callable")]
    NotCallable {
        /// Kind of the value
        kind: String,
    },

    /// Call depth limit reached
    #[error("stack overflow: call depth {depth} exceeds maximum {max}")]
    StackOverflow {
        /// Depth reached
        depth: usize,
        /// Configured maximum
        max: usize,
    },

    /// Private or protected member accessed from outside its reach
    #[error("cannot access {visibility} member {class}::{member}")]
    AccessViolation {
        /// Declaring class
        class: String,
        /// Member name
        member: String,
        /// `private` or `protected`
        visibility: String,
    },

    /// A builtin function reported a failure
    #[error("{name}: {message}")]
    Builtin {
        /// Builtin name
        name: String,
        /// Failure message
        message: String,
    },

    /// Construct parsed but not executable by this core
    #[error("unsupported: {what}")]
    Unsupported {
        /// Description of the construct
        what: String,
    },

    /// Runtime failure that fits no other category
    #[error("{message}")]
    Runtime {
        /// Details
        message: String,
    },

    /// `break` escaped every loop
    #[error("break outside of loop")]
    BreakOutsideLoop,

    /// `continue` escaped every loop
    #[error("continue outside of loop")]
    ContinueOutsideLoop,

    /// `return` at the top level of a file
    #[error("return outside of function")]
    ReturnOutsideFunction,

    /// Evaluation was interrupted
    #[error("evaluation interrupted")]
    Interrupted,
}

impl EvalError {
    /// Shorthand for a type mismatch.
    pub fn type_mismatch(message: impl Into<String>) -> Self {
        EvalError::TypeMismatch {
            message: message.into(),
        }
    }

    /// Shorthand for an undefined member.
    pub fn undefined_member(owner: impl Into<String>, member: impl Into<String>) -> Self {
        EvalError::UndefinedMember {
            owner: owner.into(),
            member: member.into(),
        }
    }

    /// Shorthand for a generic runtime failure.
    pub fn runtime(message: impl Into<String>) -> Self {
        EvalError::Runtime {
            message: message.into(),
        }
    }

    /// Whether this error means the `use` target `path` simply could not be
    /// found.
    ///
    /// These are recorded against the alias instead of halting the program.
    /// Failures raised while evaluating a file that *was* found do not count.
    pub fn is_unresolved_import(&self, path: &str) -> bool {
        match self {
            EvalError::ModuleNotFound { path: missing, .. } => missing == path,
            EvalError::UndefinedClass { name } => name == path,
            _ => false,
        }
    }
}

fn plural(count: &usize) -> &'static str {
    if *count == 1 {
        ""
    } else {
        "s"
    }
}

fn display_paths(paths: &[PathBuf]) -> String {
    if paths.is_empty() {
        return "no candidates".to_string();
    }
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Error loading a project configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file could not be read
    #[error("cannot read project file {}: {source}", .path.display())]
    Read {
        /// Path of the project file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid project JSON
    #[error("invalid project file {}: {source}", .path.display())]
    Parse {
        /// Path of the project file
        path: PathBuf,
        /// Underlying JSON error
        #[source]
        source: serde_json::Error,
    },
}

/// Get a human-readable name for a value's kind.
pub fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Int(_) => "int",
        Value::Float(_) => "float",
        Value::Str(_) => "string",
        Value::Array(_) => "array",
        Value::Function(_) => "function",
        Value::Builtin(_) => "builtin",
        Value::BoundMethod(_) => "method",
        Value::BoundStringMethod(_) => "string method",
        Value::Class(_) => "class",
        Value::Interface(_) => "interface",
        Value::Instance(_) => "instance",
        Value::Return(_) => "return signal",
        Value::Error(_) => "error",
        Value::Break => "break signal",
        Value::Continue => "continue signal",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_not_found_lists_attempts() {
        let err = EvalError::ModuleNotFound {
            path: "App.Missing".to_string(),
            attempted: vec![PathBuf::from("src/App/Missing.qb"), PathBuf::from("App/Missing.qb")],
        };
        let msg = err.to_string();
        assert!(msg.contains("App.Missing"));
        assert!(msg.contains("src/App/Missing.qb"));
        assert!(msg.contains("App/Missing.qb"));
    }

    #[test]
    fn test_ambiguous_entry_point_lists_classes() {
        let err = EvalError::AmbiguousEntryPoint {
            classes: vec!["A.Main".to_string(), "B.Main".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "ambiguous entry point: static main declared by A.Main, B.Main"
        );
    }

    #[test]
    fn test_arity_pluralization() {
        let one = EvalError::ArityMismatch {
            name: "f".to_string(),
            expected: 1,
            got: 2,
        };
        let two = EvalError::ArityMismatch {
            name: "f".to_string(),
            expected: 2,
            got: 0,
        };
        assert_eq!(one.to_string(), "f expects 1 argument, got 2");
        assert_eq!(two.to_string(), "f expects 2 arguments, got 0");
    }

    #[test]
    fn test_unresolved_import_classification() {
        let missing = EvalError::ModuleNotFound {
            path: "A.B".to_string(),
            attempted: vec![],
        };
        assert!(missing.is_unresolved_import("A.B"));
        assert!(!missing.is_unresolved_import("A.C"));
        assert!(!EvalError::DivisionByZero.is_unresolved_import("A.B"));
    }
}

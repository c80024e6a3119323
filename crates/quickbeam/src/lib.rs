//! # Quickbeam
//!
//! A tree-walking interpreter for a small class-based language with
//! closures, single inheritance, interfaces and lazily loaded namespaces.
//!
//! ## Architecture
//!
//! - **Frontend**: turn source text into an [`ast::Program`] (see
//!   [`LanguageFrontend`]; [`frontends::QuickbeamFrontend`] is the built-in one)
//! - **Value model**: runtime values plus the four control signals
//!   (`return`, `error`, `break`, `continue`), all ordinary [`Value`]s
//! - **Environment**: chained scopes shared by closures
//! - **Namespaces & loader**: `use A.B.C` locates, parses and evaluates
//!   source files on demand, once each
//! - **Dispatch**: class definition, interface conformance, instantiation
//!   and method resolution
//! - **Evaluator**: the [`eval::Evaluate`] walk over the AST
//!
//! ## Example
//!
//! ```
//! use quickbeam::{Interpreter, Value};
//!
//! let mut interp = Interpreter::new();
//! let result = interp.run_source(
//!     r#"
//!     class Counter {
//!         count = 0
//!         func tick() { this.count += 1; return this.count }
//!     }
//!     class Main {
//!         static func main() {
//!             c := new Counter()
//!             c.tick()
//!             return c.tick()
//!         }
//!     }
//!     "#,
//!     "counter.qb",
//! );
//! assert_eq!(result, Value::Int(2));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod ast;
pub mod config;
pub mod context;
pub(crate) mod dispatch;
pub mod environment;
pub mod error;
pub mod eval;
pub mod frontend;
pub mod frontends;
pub mod interpreter;
pub(crate) mod loader;
pub mod namespace;
pub(crate) mod stack;
pub mod value;

// Re-export main types
pub use config::ProjectConfig;
pub use context::EvalContext;
pub use environment::Environment;
pub use error::{ConfigError, EvalError};
pub use eval::{eval_block, eval_expr, Evaluate};
pub use frontend::{LanguageFrontend, ParseError, SourceLocation};
pub use interpreter::{Interpreter, OutputBuffer};
pub use namespace::{Namespace, NamespaceManager};
pub use value::{
    BoundMethod, BoundStringMethod, BuiltinFn, BuiltinFnPtr, Class, FieldDecl, Function, Instance,
    Interface, Method, RequiredMethod, Value,
};

/// Quickbeam version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

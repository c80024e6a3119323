//! Callable value types: closures, builtins and bound methods

use std::io::Write;
use std::rc::Rc;

use super::{Class, Instance, Method, Value};
use crate::ast::FunctionDecl;
use crate::environment::Environment;
use crate::eval::string_methods::StringMethod;

/// Type alias for builtin function pointers to reduce complexity.
///
/// Builtins receive the interpreter's output sink so `print` and friends
/// can be redirected.
pub type BuiltinFnPtr = Rc<dyn Fn(&[Value], &mut dyn Write) -> Result<Value, String>>;

/// A closure: a function definition plus the environment it was created in.
///
/// The environment is a captured view: the closure observes later mutations
/// of variables that were visible when it was created, but not variables
/// defined after it.
#[derive(Debug, Clone)]
pub struct Function {
    /// The definition (parameters, return types, body)
    pub decl: Rc<FunctionDecl>,

    /// The defining environment
    pub env: Environment,
}

impl Function {
    /// Create a closure over `env`.
    pub fn new(decl: Rc<FunctionDecl>, env: Environment) -> Self {
        Self { decl, env }
    }

    /// Name for diagnostics.
    pub fn name(&self) -> &str {
        self.decl.name.as_deref().unwrap_or("<closure>")
    }
}

/// A built-in native function.
///
/// These are Rust functions exposed to the interpreter.
#[derive(Clone)]
pub struct BuiltinFn {
    /// Function name (for display/debugging)
    pub name: String,

    /// Arity (-1 for variadic)
    pub arity: i32,

    /// The actual function pointer
    pub func: BuiltinFnPtr,
}

impl BuiltinFn {
    /// Create a builtin.
    pub fn new(
        name: impl Into<String>,
        arity: i32,
        func: impl Fn(&[Value], &mut dyn Write) -> Result<Value, String> + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            arity,
            func: Rc::new(func),
        }
    }
}

impl std::fmt::Debug for BuiltinFn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "BuiltinFn({})", self.name)
    }
}

/// A method resolved through member lookup, ready to be called.
///
/// `class` is the class that *defines* the method (what `self` binds to),
/// `called` is the class the lookup started from (what `static` binds to).
#[derive(Debug, Clone)]
pub struct BoundMethod {
    /// Receiver, absent for static methods
    pub receiver: Option<Rc<Instance>>,

    /// Defining class
    pub class: Rc<Class>,

    /// Dynamically invoked class
    pub called: Rc<Class>,

    /// The method itself
    pub method: Rc<Method>,
}

/// A builtin string method bound to its receiver.
#[derive(Debug, Clone)]
pub struct BoundStringMethod {
    /// The receiver string
    pub receiver: Rc<str>,

    /// Which method
    pub method: StringMethod,
}

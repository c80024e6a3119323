//! Value representation for runtime values

mod callable;
mod display;
mod impls;
mod object;
mod signal;

pub use callable::{BoundMethod, BoundStringMethod, BuiltinFn, BuiltinFnPtr, Function};
pub use object::{Class, FieldDecl, Instance, Interface, Method, RequiredMethod};
pub(crate) use signal::{propagate, propagate_result};

use std::cell::RefCell;
use std::rc::Rc;

use crate::error::EvalError;

/// Runtime value representation for the Quickbeam interpreter.
///
/// Values are organized into four tiers:
/// - Tier 1: Scalars, copied on assignment
/// - Tier 2: Shared mutable objects (reference semantics)
/// - Tier 3: Callables and type records
/// - Tier 4: Control signals, which only ever exist transiently
///
/// Every evaluation step produces exactly one `Value`. Signals are never
/// stored in a variable, field or array; they are propagated or consumed by
/// the construct that handles them.
#[derive(Clone)]
pub enum Value {
    // ═══════════════════════════════════════════════════════════════════
    // Tier 1: Scalars
    // ═══════════════════════════════════════════════════════════════════
    /// `null`
    Null,

    /// Boolean: `true` or `false`
    Bool(bool),

    /// 64-bit signed integer
    Int(i64),

    /// 64-bit floating point
    Float(f64),

    /// Immutable string (shared storage, value semantics)
    Str(Rc<str>),

    // ═══════════════════════════════════════════════════════════════════
    // Tier 2: Shared Mutable Objects
    // ═══════════════════════════════════════════════════════════════════
    /// Growable array
    Array(Rc<RefCell<Vec<Value>>>),

    /// Class instance
    Instance(Rc<Instance>),

    // ═══════════════════════════════════════════════════════════════════
    // Tier 3: Callables and Type Records
    // ═══════════════════════════════════════════════════════════════════
    /// Closure with captured environment
    Function(Rc<Function>),

    /// Built-in native function
    Builtin(BuiltinFn),

    /// Method paired with its receiver (or its class, for static methods)
    BoundMethod(Rc<BoundMethod>),

    /// String method paired with its receiver string
    BoundStringMethod(Rc<BoundStringMethod>),

    /// Class record
    Class(Rc<Class>),

    /// Interface record
    Interface(Rc<Interface>),

    // ═══════════════════════════════════════════════════════════════════
    // Tier 4: Control Signals
    // ═══════════════════════════════════════════════════════════════════
    /// `return` unwinding to the nearest call boundary
    Return(Box<Value>),

    /// Error unwinding until something surfaces it
    Error(Box<EvalError>),

    /// `break` unwinding to the nearest loop
    Break,

    /// `continue` unwinding to the nearest loop
    Continue,
}

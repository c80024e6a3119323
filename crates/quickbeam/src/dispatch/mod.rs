//! Class and interface dispatch
//!
//! Everything that turns names into class records and class records into
//! behavior: definition with conformance checking, instantiation, method and
//! static member resolution, and visibility enforcement.
//!
//! Functions here return `Result<_, EvalError>`; the evaluator converts at
//! its boundary.

mod define;
mod instance;
mod invoke;
mod visibility;

pub(crate) use define::{define_class, define_interface};
pub(crate) use instance::{get_member, instantiate, set_member};
pub(crate) use invoke::{
    assign_class_member, call_method, class_member, static_access, static_assign, static_call,
};
pub(crate) use visibility::check_access;

use std::rc::Rc;

use crate::environment::Environment;
use crate::error::{type_name, EvalError};
use crate::interpreter::Interpreter;
use crate::value::{Class, Interface, Value};

/// Resolve a (possibly dotted) type name.
///
/// Search order: the environment chain, the current namespace, the
/// registry by qualified name (loading the defining file for dotted names),
/// then every namespace as a last resort. A name recorded as an unresolved
/// import reports that failure.
pub(crate) fn resolve_type(
    interp: &mut Interpreter,
    name: &str,
    env: &Environment,
) -> Result<Option<Value>, EvalError> {
    if let Some(value) = env.get(name) {
        return Ok(Some(value));
    }
    if let Some(ns) = interp.current_namespace.as_deref() {
        if let Some(value) = interp.namespaces.lookup(ns, name) {
            return Ok(Some(value));
        }
    }

    if name.contains('.') {
        if let Some(value) = interp.lookup_registered(name) {
            return Ok(Some(value));
        }
        match interp.resolve_import(name) {
            Ok(Some(value)) => return Ok(Some(value)),
            Ok(None) => {}
            Err(err) if err.is_unresolved_import(name) => {}
            Err(err) => return Err(err),
        }
    } else if let Some(value) = interp.namespaces.find_anywhere(name) {
        return Ok(Some(value));
    }

    match interp.unresolved_imports.get(name) {
        Some(err) => Err(err.clone()),
        None => Ok(None),
    }
}

/// Whether a bare name already denotes a registered class or interface.
///
/// Only consults the registry, never the loader.
pub(crate) fn names_type(interp: &Interpreter, name: &str) -> bool {
    let local = interp
        .current_namespace
        .as_deref()
        .and_then(|ns| interp.namespaces.lookup(ns, name));
    local.is_some() || interp.namespaces.find_anywhere(name).is_some()
}

/// Resolve a name that must denote a class.
pub(crate) fn resolve_class(
    interp: &mut Interpreter,
    name: &str,
    env: &Environment,
) -> Result<Rc<Class>, EvalError> {
    match resolve_type(interp, name, env)? {
        Some(Value::Class(class)) => Ok(class),
        Some(other) => Err(EvalError::NotAClass {
            name: name.to_string(),
            found: type_name(&other).to_string(),
        }),
        None => Err(EvalError::UndefinedClass {
            name: name.to_string(),
        }),
    }
}

/// Resolve a name that must denote an interface.
pub(crate) fn resolve_interface(
    interp: &mut Interpreter,
    name: &str,
    env: &Environment,
) -> Result<Rc<Interface>, EvalError> {
    match resolve_type(interp, name, env)? {
        Some(Value::Interface(interface)) => Ok(interface),
        Some(other) => Err(EvalError::NotAnInterface {
            name: name.to_string(),
            found: type_name(&other).to_string(),
        }),
        None => Err(EvalError::UndefinedInterface {
            name: name.to_string(),
        }),
    }
}

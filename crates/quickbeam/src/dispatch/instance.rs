//! Instance creation and instance member access

use std::rc::Rc;

use indexmap::IndexMap;

use super::define::class_scope;
use super::{call_method, check_access};
use crate::environment::Environment;
use crate::error::EvalError;
use crate::eval::Evaluate;
use crate::interpreter::Interpreter;
use crate::value::{BoundMethod, Class, Instance, Value};

const CONSTRUCTOR: &str = "__construct";

/// `new Class(args)`.
///
/// Fields are allocated root class first, so a subclass redeclaring a field
/// replaces the inherited default instead of adding a second slot. The
/// closest `__construct` in the ancestor chain then runs with the new
/// instance as `this`.
pub(crate) fn instantiate(
    interp: &mut Interpreter,
    class: &Rc<Class>,
    args: Vec<Value>,
    env: &Environment,
) -> Result<Value, EvalError> {
    let mut fields = IndexMap::new();
    for ancestor in class.lineage().into_iter().rev() {
        if ancestor.fields.is_empty() {
            continue;
        }
        let scope = class_scope(&ancestor);
        for (name, decl) in &ancestor.fields {
            let value = match &decl.default {
                Some(expr) => expr.eval(&scope, interp).into_result()?,
                None => Value::Null,
            };
            fields.insert(name.clone(), value);
        }
    }
    let instance = Rc::new(Instance::new(Rc::clone(class), fields));

    match class.find_method(CONSTRUCTOR) {
        Some((owner, ctor)) => {
            check_access(&owner, CONSTRUCTOR, ctor.visibility, env)?;
            call_method(interp, Some(Rc::clone(&instance)), &owner, class, &ctor, args)
                .into_result()?;
        }
        None if !args.is_empty() => {
            return Err(EvalError::ArityMismatch {
                name: format!("{}::{CONSTRUCTOR}", class.qualified_name()),
                expected: 0,
                got: args.len(),
            });
        }
        None => {}
    }
    Ok(Value::Instance(instance))
}

/// `instance.name`: a field if the instance has one, else a method bound to
/// the instance.
pub(crate) fn get_member(
    instance: &Rc<Instance>,
    name: &str,
    env: &Environment,
) -> Result<Value, EvalError> {
    if let Some(value) = instance.get_field(name) {
        if let Some((owner, decl)) = instance.class.find_field_decl(name) {
            check_access(&owner, name, decl.visibility, env)?;
        }
        return Ok(value);
    }
    if let Some((owner, method)) = instance.class.find_method(name) {
        check_access(&owner, name, method.visibility, env)?;
        return Ok(Value::BoundMethod(Rc::new(BoundMethod {
            receiver: Some(Rc::clone(instance)),
            class: owner,
            called: Rc::clone(&instance.class),
            method,
        })));
    }
    Err(EvalError::undefined_member(
        instance.class.qualified_name(),
        name,
    ))
}

/// `instance.name = value`.
///
/// Undeclared fields are created on the instance.
pub(crate) fn set_member(
    instance: &Rc<Instance>,
    name: &str,
    value: Value,
    env: &Environment,
) -> Result<(), EvalError> {
    if let Some((owner, decl)) = instance.class.find_field_decl(name) {
        check_access(&owner, name, decl.visibility, env)?;
    }
    instance.set_field(name, value);
    Ok(())
}

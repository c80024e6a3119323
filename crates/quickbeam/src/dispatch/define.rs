//! Class and interface definition

use std::cell::RefCell;
use std::rc::Rc;

use indexmap::IndexMap;

use super::{resolve_class, resolve_interface};
use crate::ast::{ClassDecl, ClassMember, InterfaceDecl};
use crate::environment::Environment;
use crate::error::EvalError;
use crate::eval::Evaluate;
use crate::interpreter::Interpreter;
use crate::value::{Class, FieldDecl, Interface, Method, Value};

/// Build, check and register a class.
///
/// Conformance to every implemented interface is verified once all members
/// are collected, before anything is registered. Constants and static
/// fields are then evaluated in declaration order, so later ones may refer
/// to earlier ones through `self::`.
pub(crate) fn define_class(
    interp: &mut Interpreter,
    decl: &ClassDecl,
    env: &Environment,
) -> Result<Rc<Class>, EvalError> {
    let parent = decl
        .parent
        .as_deref()
        .map(|name| resolve_class(interp, name, env))
        .transpose()?;
    let interfaces = decl
        .interfaces
        .iter()
        .map(|name| resolve_interface(interp, name, env))
        .collect::<Result<Vec<_>, _>>()?;

    let mut fields = IndexMap::new();
    let mut static_fields = IndexMap::new();
    let mut methods = IndexMap::new();
    let mut static_methods = IndexMap::new();
    for member in &decl.members {
        match member {
            ClassMember::Constant { .. } => {}
            ClassMember::Field {
                name,
                ty,
                default,
                modifiers,
            } => {
                let field = FieldDecl {
                    ty: ty.clone(),
                    default: default.clone(),
                    visibility: modifiers.visibility,
                };
                if modifiers.is_static {
                    static_fields.insert(name.clone(), field);
                } else {
                    fields.insert(name.clone(), field);
                }
            }
            ClassMember::Method { decl, modifiers } => {
                let method = Rc::new(Method {
                    decl: Rc::clone(decl),
                    visibility: modifiers.visibility,
                    is_static: modifiers.is_static,
                });
                let name = method.name().to_string();
                if modifiers.is_static {
                    static_methods.insert(name, method);
                } else {
                    methods.insert(name, method);
                }
            }
        }
    }

    let class = Rc::new(Class {
        name: decl.name.clone(),
        namespace: interp.current_namespace.clone(),
        parent,
        interfaces,
        constants: RefCell::new(IndexMap::new()),
        fields,
        static_fields,
        static_values: RefCell::new(IndexMap::new()),
        methods,
        static_methods,
        env: env.clone(),
    });

    check_conformance(&class)?;

    match interp.current_namespace.clone() {
        Some(ns) => interp.namespaces.register_class(&ns, Rc::clone(&class))?,
        None => env.define(decl.name.clone(), Value::Class(Rc::clone(&class))),
    }

    initialize_statics(interp, &class, decl)?;
    Ok(class)
}

/// Every method required by an implemented interface (including the
/// interfaces it extends) must exist as a non-static method on the class
/// or an ancestor, with the same number of parameters.
fn check_conformance(class: &Rc<Class>) -> Result<(), EvalError> {
    for interface in &class.interfaces {
        for required in interface.required_methods() {
            let signature = &required.signature;
            let satisfied = class
                .find_method(&signature.name)
                .is_some_and(|(_, method)| method.arity() == signature.params.len());
            if !satisfied {
                return Err(EvalError::InterfaceNotImplemented {
                    class: class.qualified_name(),
                    interface: required.interface,
                    method: signature.name.clone(),
                });
            }
        }
    }
    Ok(())
}

fn initialize_statics(
    interp: &mut Interpreter,
    class: &Rc<Class>,
    decl: &ClassDecl,
) -> Result<(), EvalError> {
    let scope = class_scope(class);
    for member in &decl.members {
        match member {
            ClassMember::Constant { name, value, .. } => {
                let value = value.eval(&scope, interp).into_result()?;
                class.constants.borrow_mut().insert(name.clone(), value);
            }
            ClassMember::Field {
                name,
                default,
                modifiers,
                ..
            } if modifiers.is_static => {
                let value = match default {
                    Some(expr) => expr.eval(&scope, interp).into_result()?,
                    None => Value::Null,
                };
                class.static_values.borrow_mut().insert(name.clone(), value);
            }
            _ => {}
        }
    }
    Ok(())
}

/// Scope for expressions evaluated on behalf of a class outside any method:
/// constants, static defaults and field defaults.
pub(super) fn class_scope(class: &Rc<Class>) -> Environment {
    let scope = class.env.new_child();
    scope.define("self", Value::Class(Rc::clone(class)));
    scope.define("static", Value::Class(Rc::clone(class)));
    if let Some(parent) = &class.parent {
        scope.define("super", Value::Class(Rc::clone(parent)));
    }
    scope
}

/// Build and register an interface.
pub(crate) fn define_interface(
    interp: &mut Interpreter,
    decl: &InterfaceDecl,
    env: &Environment,
) -> Result<Rc<Interface>, EvalError> {
    let parents = decl
        .parents
        .iter()
        .map(|name| resolve_interface(interp, name, env))
        .collect::<Result<Vec<_>, _>>()?;
    let methods = decl
        .methods
        .iter()
        .map(|sig| (sig.name.clone(), sig.clone()))
        .collect();

    let interface = Rc::new(Interface {
        name: decl.name.clone(),
        namespace: interp.current_namespace.clone(),
        parents,
        methods,
    });

    match interp.current_namespace.clone() {
        Some(ns) => interp
            .namespaces
            .register_interface(&ns, Rc::clone(&interface))?,
        None => env.define(decl.name.clone(), Value::Interface(Rc::clone(&interface))),
    }
    Ok(interface)
}

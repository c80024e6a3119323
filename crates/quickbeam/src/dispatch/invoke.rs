//! Method invocation and `::` resolution

use std::rc::Rc;

use super::{check_access, resolve_class};
use crate::ast::ClassRef;
use crate::environment::Environment;
use crate::error::EvalError;
use crate::eval::call::bind_params;
use crate::eval::stmt::eval_stmts;
use crate::interpreter::Interpreter;
use crate::stack::ensure_sufficient_stack;
use crate::value::{propagate_result, BoundMethod, Class, Instance, Method, Value};

/// Call a method.
///
/// The body runs in a child of the class's declaring environment with
/// `this` (instance methods only), `self` (the defining class), `static`
/// (the invoked class) and `super` (the defining class's parent) bound.
/// While it runs, the current namespace is the class's.
pub(crate) fn call_method(
    interp: &mut Interpreter,
    receiver: Option<Rc<Instance>>,
    class: &Rc<Class>,
    called: &Rc<Class>,
    method: &Rc<Method>,
    args: Vec<Value>,
) -> Value {
    propagate_result!(interp.ctx.enter_call());

    let env = class.env.new_child();
    if let Some(receiver) = receiver {
        env.define("this", Value::Instance(receiver));
    }
    env.define("self", Value::Class(Rc::clone(class)));
    env.define("static", Value::Class(Rc::clone(called)));
    if let Some(parent) = &class.parent {
        env.define("super", Value::Class(Rc::clone(parent)));
    }

    let saved_namespace = std::mem::replace(&mut interp.current_namespace, class.namespace.clone());
    let name = format!("{}::{}", class.qualified_name(), method.name());
    let result = ensure_sufficient_stack(|| {
        match bind_params(interp, &method.decl, &name, args, &env) {
            Ok(()) => eval_stmts(&method.decl.body.stmts, &env, interp),
            Err(err) => Value::from(err),
        }
    });
    interp.current_namespace = saved_namespace;
    interp.ctx.exit_call();

    result.into_call_result()
}

/// Resolve the anchor of a `::` expression to (lookup class, invoked class).
fn resolve_anchor(
    interp: &mut Interpreter,
    anchor: &ClassRef,
    env: &Environment,
) -> Result<(Rc<Class>, Rc<Class>), EvalError> {
    let bound = |name: &str| match env.get(name) {
        Some(Value::Class(class)) => Ok(class),
        _ => Err(EvalError::runtime(format!(
            "cannot use `{name}::` outside of a class"
        ))),
    };
    match anchor {
        ClassRef::Named(name) => {
            let class = resolve_class(interp, name, env)?;
            Ok((Rc::clone(&class), class))
        }
        ClassRef::SelfClass => {
            let class = bound("self")?;
            Ok((Rc::clone(&class), class))
        }
        ClassRef::Super => {
            let parent = env.get("super").and_then(|v| v.as_class().cloned());
            match parent {
                Some(parent) => Ok((parent, bound("static")?)),
                None => Err(EvalError::runtime("`super::` used in a class without a parent")),
            }
        }
        ClassRef::Static => {
            let class = bound("static")?;
            Ok((Rc::clone(&class), class))
        }
    }
}

/// `Anchor::method(args)`.
///
/// Static methods are searched up the ancestor chain first. Failing that,
/// an instance method is called on the current `this` when `this` belongs to
/// the anchor's hierarchy (e.g. `super::__construct(...)`).
pub(crate) fn static_call(
    interp: &mut Interpreter,
    anchor: &ClassRef,
    method: &str,
    args: Vec<Value>,
    env: &Environment,
) -> Result<Value, EvalError> {
    let (target, called) = resolve_anchor(interp, anchor, env)?;

    if let Some((owner, found)) = target.find_static_method(method) {
        check_access(&owner, method, found.visibility, env)?;
        return call_method(interp, None, &owner, &called, &found, args).into_result();
    }

    if let Some(Value::Instance(this)) = env.get("this") {
        if this.class.is_subclass_of(&target) {
            if let Some((owner, found)) = target.find_method(method) {
                check_access(&owner, method, found.visibility, env)?;
                let invoked = Rc::clone(&this.class);
                return call_method(interp, Some(this), &owner, &invoked, &found, args)
                    .into_result();
            }
        }
    }

    Err(EvalError::undefined_member(target.qualified_name(), method))
}

/// `Anchor::member`.
pub(crate) fn static_access(
    interp: &mut Interpreter,
    anchor: &ClassRef,
    member: &str,
    env: &Environment,
) -> Result<Value, EvalError> {
    let (target, called) = resolve_anchor(interp, anchor, env)?;
    class_member(&target, &called, member, env)
}

/// Look `member` up on a class value: constants, then static fields, then
/// static methods, each searched up the ancestor chain.
pub(crate) fn class_member(
    target: &Rc<Class>,
    called: &Rc<Class>,
    member: &str,
    env: &Environment,
) -> Result<Value, EvalError> {
    if let Some(value) = target.find_constant(member) {
        return Ok(value);
    }
    if let Some(owner) = target.find_static_field_owner(member) {
        if let Some(decl) = owner.static_fields.get(member) {
            check_access(&owner, member, decl.visibility, env)?;
        }
        let value = owner.static_values.borrow().get(member).cloned();
        return Ok(value.unwrap_or(Value::Null));
    }
    if let Some((owner, method)) = target.find_static_method(member) {
        check_access(&owner, member, method.visibility, env)?;
        return Ok(Value::BoundMethod(Rc::new(BoundMethod {
            receiver: None,
            class: owner,
            called: Rc::clone(called),
            method,
        })));
    }
    Err(EvalError::undefined_member(target.qualified_name(), member))
}

/// `Anchor::field = value`.
pub(crate) fn static_assign(
    interp: &mut Interpreter,
    anchor: &ClassRef,
    member: &str,
    value: Value,
    env: &Environment,
) -> Result<(), EvalError> {
    let (target, _) = resolve_anchor(interp, anchor, env)?;
    assign_class_member(&target, member, value, env)
}

/// Write a static field. The write lands on the class that declares it.
pub(crate) fn assign_class_member(
    target: &Rc<Class>,
    member: &str,
    value: Value,
    env: &Environment,
) -> Result<(), EvalError> {
    match target.find_static_field_owner(member) {
        Some(owner) => {
            if let Some(decl) = owner.static_fields.get(member) {
                check_access(&owner, member, decl.visibility, env)?;
            }
            owner
                .static_values
                .borrow_mut()
                .insert(member.to_string(), value);
            Ok(())
        }
        None if target.find_constant(member).is_some() => Err(EvalError::runtime(format!(
            "cannot assign to constant {}::{member}",
            target.qualified_name()
        ))),
        None => Err(EvalError::undefined_member(target.qualified_name(), member)),
    }
}

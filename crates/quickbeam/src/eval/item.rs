//! Declarations and class-related expressions
//!
//! Thin glue between the AST and the dispatch engine and module loader.

use std::rc::Rc;

use crate::ast::{ClassDecl, ClassRef, Expr, InterfaceDecl};
use crate::dispatch;
use crate::value::propagate_result;
use crate::{Environment, Interpreter, Value};

use super::eval_args;

/// `namespace A.B`: switch the current namespace for the statements that
/// follow, creating it if needed.
pub fn eval_namespace(name: &str, interp: &mut Interpreter) -> Value {
    let qualified = interp.qualify_namespace(name);
    interp.namespaces.ensure(&qualified);
    interp.current_namespace = Some(qualified);
    Value::Null
}

/// `use A.B.C [as D]`.
pub fn eval_use(path: &str, alias: Option<&str>, env: &Environment, interp: &mut Interpreter) -> Value {
    propagate_result!(interp.import(path, alias, env));
    Value::Null
}

/// Class declaration.
pub fn eval_class(decl: &Rc<ClassDecl>, env: &Environment, interp: &mut Interpreter) -> Value {
    propagate_result!(dispatch::define_class(interp, decl, env));
    Value::Null
}

/// Interface declaration.
pub fn eval_interface(decl: &Rc<InterfaceDecl>, env: &Environment, interp: &mut Interpreter) -> Value {
    propagate_result!(dispatch::define_interface(interp, decl, env));
    Value::Null
}

/// `new A.B.C(args)`: arguments are evaluated before the class is resolved.
pub fn eval_new(class: &str, args: &[Expr], env: &Environment, interp: &mut Interpreter) -> Value {
    let args = propagate_result!(eval_args(args, env, interp));
    let class = propagate_result!(dispatch::resolve_class(interp, class, env));
    propagate_result!(dispatch::instantiate(interp, &class, args, env))
}

/// `Anchor::method(args)`.
pub fn eval_static_call(
    class: &ClassRef,
    method: &str,
    args: &[Expr],
    env: &Environment,
    interp: &mut Interpreter,
) -> Value {
    let args = propagate_result!(eval_args(args, env, interp));
    propagate_result!(dispatch::static_call(interp, class, method, args, env))
}

/// `Anchor::member`.
pub fn eval_static_access(
    class: &ClassRef,
    member: &str,
    env: &Environment,
    interp: &mut Interpreter,
) -> Value {
    propagate_result!(dispatch::static_access(interp, class, member, env))
}

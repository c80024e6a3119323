//! Function definitions and literals

use std::rc::Rc;

use crate::ast::FunctionDecl;
use crate::value::Function;
use crate::{Environment, Value};

/// `func (params) { body }`: a closure over the names visible in `env` now.
pub fn eval_function(decl: &Rc<FunctionDecl>, env: &Environment) -> Value {
    Value::Function(Rc::new(Function::new(Rc::clone(decl), env.capture())))
}

/// `func name(params) { body }` at statement level binds the closure under
/// its name. The name is reserved before capture so the body can call
/// itself recursively.
pub fn eval_function_stmt(decl: &Rc<FunctionDecl>, env: &Environment) -> Value {
    match &decl.name {
        Some(name) => {
            env.define(name.clone(), Value::Null);
            let function = eval_function(decl, env);
            env.define(name.clone(), function);
        }
        None => {
            eval_function(decl, env);
        }
    }
    Value::Null
}

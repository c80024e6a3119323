//! Statement and block evaluation

use crate::ast::{Block, Stmt, StmtKind};
use crate::value::propagate;
use crate::{Environment, EvalError, Interpreter, Value};

use super::{function, if_expr, item, local, loops, Evaluate};

impl Evaluate for Stmt {
    fn eval(&self, env: &Environment, interp: &mut Interpreter) -> Value {
        if interp.ctx.is_interrupted() {
            return Value::error(EvalError::Interrupted);
        }

        match &self.kind {
            StmtKind::Namespace(name) => item::eval_namespace(name, interp),
            StmtKind::Use { path, alias } => item::eval_use(path, alias.as_deref(), env, interp),
            StmtKind::Class(decl) => item::eval_class(decl, env, interp),
            StmtKind::Interface(decl) => item::eval_interface(decl, env, interp),
            StmtKind::Function(decl) => function::eval_function_stmt(decl, env),

            StmtKind::Let { name, value, .. } => local::eval_let(name, value.as_ref(), env, interp),
            StmtKind::ShortDeclare { name, value } => {
                local::eval_let(name, Some(value), env, interp)
            }
            StmtKind::Expr(expr) => expr.eval(env, interp),

            StmtKind::Return(value) => {
                let value = match value {
                    Some(expr) => propagate!(expr.eval(env, interp)),
                    None => Value::Null,
                };
                Value::return_value(value)
            }
            StmtKind::If {
                condition,
                then_branch,
                else_branch,
            } => if_expr::eval_if(condition, then_branch, else_branch.as_deref(), env, interp),
            StmtKind::For(for_loop) => loops::eval_for(for_loop, env, interp),
            StmtKind::Break => Value::Break,
            StmtKind::Continue => Value::Continue,
            StmtKind::Block(block) => eval_block(block, env, interp),

            StmtKind::Go(_) => Value::error(EvalError::Unsupported {
                what: "go statements (concurrent tasks)".to_string(),
            }),
        }
    }
}

/// Evaluate a block in a fresh child scope.
pub fn eval_block(block: &Block, env: &Environment, interp: &mut Interpreter) -> Value {
    let scope = env.new_child();
    eval_stmts(&block.stmts, &scope, interp)
}

/// Evaluate statements in `env` itself, stopping at the first signal.
///
/// Yields the signal unchanged, or the last statement's value.
pub fn eval_stmts(stmts: &[Stmt], env: &Environment, interp: &mut Interpreter) -> Value {
    let mut last = Value::Null;
    for stmt in stmts {
        last = stmt.eval(env, interp);
        if last.is_signal() {
            return last;
        }
    }
    last
}

//! Expression and statement evaluation

pub mod array;
pub mod assign;
pub mod binary;
pub mod call;
pub mod field;
pub mod function;
pub mod if_expr;
pub mod index;
pub mod item;
pub mod literal;
pub mod local;
pub mod loops;
pub mod path;
pub mod stmt;
pub mod string_methods;
pub mod unary;

pub use call::call_value;
pub use stmt::{eval_block, eval_stmts};

use crate::ast::{Expr, ExprKind};
use crate::{Environment, EvalError, Interpreter, Value};

/// Trait for evaluating AST nodes to values.
///
/// This is the core abstraction for the tree-walking interpreter. The result
/// is always a single [`Value`]; failures and control flow travel as signal
/// variants rather than as `Err`.
pub trait Evaluate {
    /// Evaluate this AST node in the given environment.
    fn eval(&self, env: &Environment, interp: &mut Interpreter) -> Value;
}

// ═══════════════════════════════════════════════════════════════════════
// Main Expression Dispatcher
// ═══════════════════════════════════════════════════════════════════════

impl Evaluate for Expr {
    fn eval(&self, env: &Environment, interp: &mut Interpreter) -> Value {
        match &self.kind {
            ExprKind::Literal(lit) => literal::eval_literal(lit),
            ExprKind::Ident(name) => path::eval_ident(name, env, interp),
            ExprKind::Array(items) => array::eval_array(items, env, interp),

            ExprKind::Prefix { op, operand } => unary::eval_prefix(*op, operand, env, interp),
            ExprKind::Infix { op, left, right } => {
                binary::eval_infix(*op, left, right, env, interp)
            }
            ExprKind::Ternary {
                condition,
                then_branch,
                else_branch,
            } => if_expr::eval_ternary(condition, then_branch, else_branch, env, interp),

            ExprKind::Call { callee, args } => call::eval_call(callee, args, env, interp),
            ExprKind::Member { object, property } => {
                field::eval_member(self, object, property, env, interp)
            }
            ExprKind::Index { object, index } => index::eval_index(object, index, env, interp),

            ExprKind::New { class, args } => item::eval_new(class, args, env, interp),
            ExprKind::StaticCall {
                class,
                method,
                args,
            } => item::eval_static_call(class, method, args, env, interp),
            ExprKind::StaticAccess { class, member } => {
                item::eval_static_access(class, member, env, interp)
            }

            ExprKind::This => path::eval_bound("this", env),
            ExprKind::Super => path::eval_bound("super", env),

            ExprKind::Function(decl) => function::eval_function(decl, env),
            ExprKind::Assign { target, op, value } => {
                assign::eval_assign(target, *op, value, env, interp)
            }
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Convenience Functions
// ═══════════════════════════════════════════════════════════════════════

/// Evaluate an expression (convenience wrapper).
pub fn eval_expr(expr: &Expr, env: &Environment, interp: &mut Interpreter) -> Value {
    expr.eval(env, interp)
}

/// Evaluate each expression in order, stopping at the first error.
pub(crate) fn eval_args(
    args: &[Expr],
    env: &Environment,
    interp: &mut Interpreter,
) -> Result<Vec<Value>, EvalError> {
    args.iter()
        .map(|arg| arg.eval(env, interp).into_result())
        .collect()
}

//! Binary operation evaluation

use std::cmp::Ordering;

use crate::ast::{Expr, InfixOp};
use crate::error::type_name;
use crate::value::{propagate, propagate_result};
use crate::{Environment, EvalError, Interpreter, Value};

use super::Evaluate;

/// Evaluate `left op right`.
///
/// `&&` and `||` short-circuit and always yield a boolean.
pub fn eval_infix(
    op: InfixOp,
    left: &Expr,
    right: &Expr,
    env: &Environment,
    interp: &mut Interpreter,
) -> Value {
    let left = propagate!(left.eval(env, interp));
    match op {
        InfixOp::And if !left.is_truthy() => return Value::Bool(false),
        InfixOp::Or if left.is_truthy() => return Value::Bool(true),
        InfixOp::And | InfixOp::Or => {
            let right = propagate!(right.eval(env, interp));
            return Value::Bool(right.is_truthy());
        }
        _ => {}
    }
    let right = propagate!(right.eval(env, interp));
    propagate_result!(apply_infix(op, left, right))
}

/// Apply a non-short-circuiting operator to two evaluated operands.
///
/// Shared with compound assignment.
pub fn apply_infix(op: InfixOp, left: Value, right: Value) -> Result<Value, EvalError> {
    match op {
        InfixOp::Add => eval_add(left, right),
        InfixOp::Sub => arithmetic(op, left, right, i64::checked_sub, |a, b| a - b),
        InfixOp::Mul => arithmetic(op, left, right, i64::checked_mul, |a, b| a * b),
        InfixOp::Div => eval_div(left, right),
        InfixOp::Rem => eval_rem(left, right),

        InfixOp::Eq => Ok(Value::Bool(left == right)),
        InfixOp::Ne => Ok(Value::Bool(left != right)),
        InfixOp::Lt => compare(op, &left, &right).map(|o| Value::Bool(o == Ordering::Less)),
        InfixOp::Le => compare(op, &left, &right).map(|o| Value::Bool(o != Ordering::Greater)),
        InfixOp::Gt => compare(op, &left, &right).map(|o| Value::Bool(o == Ordering::Greater)),
        InfixOp::Ge => compare(op, &left, &right).map(|o| Value::Bool(o != Ordering::Less)),

        InfixOp::And => Ok(Value::Bool(left.is_truthy() && right.is_truthy())),
        InfixOp::Or => Ok(Value::Bool(left.is_truthy() || right.is_truthy())),
    }
}

fn mismatch(op: InfixOp, left: &Value, right: &Value) -> EvalError {
    EvalError::type_mismatch(format!(
        "cannot apply `{op}` to {} and {}",
        type_name(left),
        type_name(right)
    ))
}

fn overflow(op: InfixOp) -> EvalError {
    EvalError::IntegerOverflow { op: op.to_string() }
}

// ═══════════════════════════════════════════════════════════════════════
// Arithmetic
// ═══════════════════════════════════════════════════════════════════════

/// `+` concatenates when either side is a string, stringifying the other.
fn eval_add(left: Value, right: Value) -> Result<Value, EvalError> {
    if left.is_string() || right.is_string() {
        return Ok(Value::string(format!("{left}{right}")));
    }
    arithmetic(InfixOp::Add, left, right, i64::checked_add, |a, b| a + b)
}

/// Integer op when both sides are integers, float op after promotion when
/// either is a float.
fn arithmetic(
    op: InfixOp,
    left: Value,
    right: Value,
    int_op: fn(i64, i64) -> Option<i64>,
    float_op: fn(f64, f64) -> f64,
) -> Result<Value, EvalError> {
    match (&left, &right) {
        (Value::Int(a), Value::Int(b)) => int_op(*a, *b).map(Value::Int).ok_or_else(|| overflow(op)),
        _ => match (left.as_f64(), right.as_f64()) {
            (Some(a), Some(b)) => Ok(Value::Float(float_op(a, b))),
            _ => Err(mismatch(op, &left, &right)),
        },
    }
}

fn eval_div(left: Value, right: Value) -> Result<Value, EvalError> {
    match (&left, &right) {
        (Value::Int(_), Value::Int(0)) => Err(EvalError::DivisionByZero),
        (Value::Int(a), Value::Int(b)) => a
            .checked_div(*b)
            .map(Value::Int)
            .ok_or_else(|| overflow(InfixOp::Div)),
        _ => match (left.as_f64(), right.as_f64()) {
            (Some(_), Some(b)) if b == 0.0 => Err(EvalError::DivisionByZero),
            (Some(a), Some(b)) => Ok(Value::Float(a / b)),
            _ => Err(mismatch(InfixOp::Div, &left, &right)),
        },
    }
}

fn eval_rem(left: Value, right: Value) -> Result<Value, EvalError> {
    match (&left, &right) {
        (Value::Int(_), Value::Int(0)) => Err(EvalError::ModuloByZero),
        (Value::Int(a), Value::Int(b)) => a
            .checked_rem(*b)
            .map(Value::Int)
            .ok_or_else(|| overflow(InfixOp::Rem)),
        _ => match (left.as_f64(), right.as_f64()) {
            (Some(_), Some(b)) if b == 0.0 => Err(EvalError::ModuloByZero),
            (Some(a), Some(b)) => Ok(Value::Float(a % b)),
            _ => Err(mismatch(InfixOp::Rem, &left, &right)),
        },
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Comparison
// ═══════════════════════════════════════════════════════════════════════

/// Order numbers (with promotion) or strings; anything else is a mismatch.
fn compare(op: InfixOp, left: &Value, right: &Value) -> Result<Ordering, EvalError> {
    match (left, right) {
        (Value::Int(a), Value::Int(b)) => Ok(a.cmp(b)),
        (Value::Str(a), Value::Str(b)) => Ok(a.cmp(b)),
        _ => match (left.as_f64(), right.as_f64()) {
            (Some(a), Some(b)) => a.partial_cmp(&b).ok_or_else(|| {
                EvalError::type_mismatch(format!("cannot compare NaN with `{op}`"))
            }),
            _ => Err(mismatch(op, left, right)),
        },
    }
}

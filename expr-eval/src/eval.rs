use crate::ast::{ArithOp, BoolOp, CastFn, CompareOp, Expr};
use crate::error::{ExprError, Result};
use crate::value::Value;
use std::collections::HashMap;

pub type Vars = HashMap<String, Value>;

/// Builds the `answers` namespace from a flat `field_id -> value` map, the
/// shape the validator and workflow engine both hand in (see §4.2, §4.8).
pub fn vars_from_json(flat: &serde_json::Map<String, serde_json::Value>) -> Vars {
    flat.iter().map(|(k, v)| (k.clone(), Value::from_json(v))).collect()
}

pub fn evaluate(expr: &Expr, vars: &Vars) -> Result<Value> {
    match expr {
        Expr::Literal(v) => Ok(v.clone()),
        Expr::List(items) => {
            let values = items.iter().map(|e| evaluate(e, vars)).collect::<Result<Vec<_>>>()?;
            Ok(Value::List(values))
        }
        Expr::AnswersGet { id, default } => match vars.get(id) {
            Some(v) => Ok(v.clone()),
            None => match default {
                Some(expr) => evaluate(expr, vars),
                None => Ok(Value::Null),
            },
        },
        Expr::Not(inner) => Ok(Value::Bool(!evaluate(inner, vars)?.truthy())),
        Expr::Neg(inner) => {
            let n = evaluate(inner, vars)?
                .as_f64()
                .ok_or_else(|| ExprError::Type("unary '-' on a non-numeric value".to_string()))?;
            Ok(Value::Number(-n))
        }
        Expr::BoolOp { op, lhs, rhs } => {
            let lhs_val = evaluate(lhs, vars)?;
            match op {
                BoolOp::And => {
                    if !lhs_val.truthy() {
                        Ok(lhs_val)
                    } else {
                        evaluate(rhs, vars)
                    }
                }
                BoolOp::Or => {
                    if lhs_val.truthy() {
                        Ok(lhs_val)
                    } else {
                        evaluate(rhs, vars)
                    }
                }
            }
        }
        Expr::Compare { op, lhs, rhs } => {
            let lhs_val = evaluate(lhs, vars)?;
            let rhs_val = evaluate(rhs, vars)?;
            compare(*op, &lhs_val, &rhs_val)
        }
        Expr::In { lhs, rhs } => {
            let lhs_val = evaluate(lhs, vars)?;
            let rhs_val = evaluate(rhs, vars)?;
            match rhs_val {
                Value::List(items) => Ok(Value::Bool(items.contains(&lhs_val))),
                Value::Str(s) => match lhs_val {
                    Value::Str(needle) => Ok(Value::Bool(s.contains(&needle))),
                    _ => Err(ExprError::Type("'in' on a string requires a string operand".to_string())),
                },
                _ => Err(ExprError::Type("'in' requires a list or string on the right".to_string())),
            }
        }
        Expr::Arith { op, lhs, rhs } => {
            let lhs_val = evaluate(lhs, vars)?
                .as_f64()
                .ok_or_else(|| ExprError::Type("arithmetic on a non-numeric value".to_string()))?;
            let rhs_val = evaluate(rhs, vars)?
                .as_f64()
                .ok_or_else(|| ExprError::Type("arithmetic on a non-numeric value".to_string()))?;
            let result = match op {
                ArithOp::Add => lhs_val + rhs_val,
                ArithOp::Sub => lhs_val - rhs_val,
                ArithOp::Mul => lhs_val * rhs_val,
                ArithOp::Div => {
                    if rhs_val == 0.0 {
                        return Err(ExprError::Type("division by zero".to_string()));
                    }
                    lhs_val / rhs_val
                }
                ArithOp::Mod => {
                    if rhs_val == 0.0 {
                        return Err(ExprError::Type("modulo by zero".to_string()));
                    }
                    lhs_val % rhs_val
                }
            };
            Ok(Value::Number(result))
        }
        Expr::Cast { func, arg } => {
            let val = evaluate(arg, vars)?;
            cast(*func, val)
        }
    }
}

fn compare(op: CompareOp, lhs: &Value, rhs: &Value) -> Result<Value> {
    let result = match (lhs, rhs) {
        (Value::Str(a), Value::Str(b)) => compare_ord(op, a.cmp(b)),
        (Value::Bool(a), Value::Bool(b)) => compare_ord(op, a.cmp(b)),
        _ => {
            let a = lhs
                .as_f64()
                .ok_or_else(|| ExprError::Type("comparison between incompatible types".to_string()))?;
            let b = rhs
                .as_f64()
                .ok_or_else(|| ExprError::Type("comparison between incompatible types".to_string()))?;
            compare_ord(op, a.partial_cmp(&b).unwrap_or(std::cmp::Ordering::Less))
        }
    };
    Ok(Value::Bool(result))
}

fn compare_ord(op: CompareOp, ord: std::cmp::Ordering) -> bool {
    use std::cmp::Ordering::*;
    match op {
        CompareOp::Eq => ord == Equal,
        CompareOp::Ne => ord != Equal,
        CompareOp::Lt => ord == Less,
        CompareOp::Le => ord != Greater,
        CompareOp::Gt => ord == Greater,
        CompareOp::Ge => ord != Less,
    }
}

fn cast(func: CastFn, val: Value) -> Result<Value> {
    match func {
        CastFn::Int => val
            .as_f64()
            .map(|n| Value::Number(n.trunc()))
            .ok_or_else(|| ExprError::Type("int() of a non-numeric value".to_string())),
        CastFn::Float => val
            .as_f64()
            .map(Value::Number)
            .ok_or_else(|| ExprError::Type("float() of a non-numeric value".to_string())),
        CastFn::Str => Ok(Value::Str(val.to_string())),
        CastFn::Len => match val {
            Value::Str(s) => Ok(Value::Number(s.chars().count() as f64)),
            Value::List(items) => Ok(Value::Number(items.len() as f64)),
            _ => Err(ExprError::Type("len() requires a string or list".to_string())),
        },
    }
}

/// Evaluates `expr` and coerces the result to a boolean. A runtime type error
/// is treated as `false` and logged, per §4.2 — parse-time already rejected
/// anything outside the grammar, so what remains here is legitimate data
/// mismatch (e.g. comparing a string answer to a number), not malformed input.
pub fn eval_bool(expr: &Expr, vars: &Vars) -> bool {
    match evaluate(expr, vars) {
        Ok(value) => value.truthy(),
        Err(err) => {
            tracing::warn!(error = %err, "condition evaluation failed at runtime, treating as false");
            false
        }
    }
}

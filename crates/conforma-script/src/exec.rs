//! Tree-walking execution of compiled programs.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;

use conforma_model::ModelObject;

use crate::ast::{BinaryOp, Expr, Stmt, UnaryOp};
use crate::error::ExecError;
use crate::scope::Scope;
use crate::value::Value;

/// Runs a statement list against a scope. Functions are visible from
/// their declaration onward; the result is the value of the last executed
/// expression statement.
pub(crate) fn run<'a>(stmts: &[Stmt], scope: &mut Scope<'a>) -> Result<Value<'a>, ExecError> {
    let mut functions: HashMap<&str, &Expr> = HashMap::new();
    let mut last = Value::Null;
    for stmt in stmts {
        match stmt {
            Stmt::Var { name, init } => {
                let value = eval(init, scope, &functions)?;
                scope.bind(name.clone(), value);
            }
            Stmt::Function { name, body } => {
                functions.insert(name.as_str(), body);
            }
            Stmt::Expr(expr) => {
                last = eval(expr, scope, &functions)?;
            }
        }
    }
    Ok(last)
}

fn eval<'a>(
    expr: &Expr,
    scope: &Scope<'a>,
    functions: &HashMap<&str, &Expr>,
) -> Result<Value<'a>, ExecError> {
    match expr {
        Expr::Null => Ok(Value::Null),
        Expr::Bool(b) => Ok(Value::Bool(*b)),
        Expr::Int(v) => Ok(Value::Int(*v)),
        Expr::Real(v) => Ok(Value::Real(*v)),
        Expr::Str(s) => Ok(Value::Str(Arc::from(s.as_str()))),

        Expr::Ident(name) => scope
            .resolve(name)
            .ok_or_else(|| ExecError::UnresolvedIdentifier(name.clone())),

        Expr::Unary { op, expr } => eval_unary(*op, eval(expr, scope, functions)?),

        Expr::Binary { op, left, right } => eval_binary(*op, left, right, scope, functions),

        Expr::Ternary {
            cond,
            then_expr,
            else_expr,
        } => match eval(cond, scope, functions)? {
            Value::Bool(true) => eval(then_expr, scope, functions),
            Value::Bool(false) => eval(else_expr, scope, functions),
            other => Err(ExecError::TypeMismatch(format!(
                "ternary condition must be boolean, got {}",
                other.type_name()
            ))),
        },

        Expr::Call { name, args } => {
            let body = functions
                .get(name.as_str())
                .copied()
                .ok_or_else(|| ExecError::UnknownFunction(name.clone()))?;
            if !args.is_empty() {
                return Err(ExecError::TypeMismatch(format!(
                    "function {name}() takes no arguments"
                )));
            }
            eval(body, scope, functions)
        }

        Expr::MethodCall { target, name, args } => {
            let target = eval(target, scope, functions)?;
            let args = args
                .iter()
                .map(|arg| eval(arg, scope, functions))
                .collect::<Result<Vec<_>, _>>()?;
            call_method(target, name, &args)
        }
    }
}

fn eval_unary(op: UnaryOp, value: Value<'_>) -> Result<Value<'_>, ExecError> {
    match (op, value) {
        (UnaryOp::Not, Value::Bool(b)) => Ok(Value::Bool(!b)),
        (UnaryOp::Neg, Value::Int(v)) => v
            .checked_neg()
            .map(Value::Int)
            .ok_or(ExecError::Overflow("negation")),
        (UnaryOp::Neg, Value::Real(v)) => Ok(Value::Real(-v)),
        (op, value) => {
            let symbol = match op {
                UnaryOp::Not => "!",
                UnaryOp::Neg => "-",
            };
            Err(ExecError::TypeMismatch(format!(
                "cannot apply {symbol} to {}",
                value.type_name()
            )))
        }
    }
}

fn eval_binary<'a>(
    op: BinaryOp,
    left: &Expr,
    right: &Expr,
    scope: &Scope<'a>,
    functions: &HashMap<&str, &Expr>,
) -> Result<Value<'a>, ExecError> {
    // && and || short-circuit, so the right operand is evaluated lazily.
    if matches!(op, BinaryOp::And | BinaryOp::Or) {
        let lhs = as_bool(eval(left, scope, functions)?)?;
        return match (op, lhs) {
            (BinaryOp::And, false) => Ok(Value::Bool(false)),
            (BinaryOp::Or, true) => Ok(Value::Bool(true)),
            _ => Ok(Value::Bool(as_bool(eval(right, scope, functions)?)?)),
        };
    }

    let lhs = eval(left, scope, functions)?;
    let rhs = eval(right, scope, functions)?;
    match op {
        BinaryOp::Eq => Ok(Value::Bool(values_equal(&lhs, &rhs)?)),
        BinaryOp::Ne => Ok(Value::Bool(!values_equal(&lhs, &rhs)?)),
        BinaryOp::Lt => Ok(Value::Bool(compare(&lhs, &rhs)?.is_lt())),
        BinaryOp::Le => Ok(Value::Bool(compare(&lhs, &rhs)?.is_le())),
        BinaryOp::Gt => Ok(Value::Bool(compare(&lhs, &rhs)?.is_gt())),
        BinaryOp::Ge => Ok(Value::Bool(compare(&lhs, &rhs)?.is_ge())),
        BinaryOp::Add => add(lhs, rhs),
        BinaryOp::Sub => numeric(lhs, rhs, "-", "subtraction", i64::checked_sub, |a, b| a - b),
        BinaryOp::Mul => numeric(lhs, rhs, "*", "multiplication", i64::checked_mul, |a, b| {
            a * b
        }),
        BinaryOp::Div => div(lhs, rhs),
        BinaryOp::Mod => rem(lhs, rhs),
        BinaryOp::And | BinaryOp::Or => unreachable!("handled above"),
    }
}

fn as_bool(value: Value<'_>) -> Result<bool, ExecError> {
    match value {
        Value::Bool(b) => Ok(b),
        other => Err(ExecError::TypeMismatch(format!(
            "logical operand must be boolean, got {}",
            other.type_name()
        ))),
    }
}

/// Equality is strict: `null` equals only `null` and is unequal to
/// everything else, integers and reals compare numerically, and any other
/// cross-type comparison is an error rather than `false`.
fn values_equal(lhs: &Value<'_>, rhs: &Value<'_>) -> Result<bool, ExecError> {
    match (lhs, rhs) {
        (Value::Null, Value::Null) => Ok(true),
        (Value::Null, _) | (_, Value::Null) => Ok(false),
        (Value::Bool(a), Value::Bool(b)) => Ok(a == b),
        (Value::Int(a), Value::Int(b)) => Ok(a == b),
        (Value::Real(a), Value::Real(b)) => Ok(a == b),
        (Value::Int(a), Value::Real(b)) | (Value::Real(b), Value::Int(a)) => {
            Ok(*a as f64 == *b)
        }
        (Value::Str(a), Value::Str(b)) => Ok(a == b),
        _ => Err(ExecError::TypeMismatch(format!(
            "cannot compare {} with {}",
            lhs.type_name(),
            rhs.type_name()
        ))),
    }
}

fn compare(lhs: &Value<'_>, rhs: &Value<'_>) -> Result<Ordering, ExecError> {
    match (lhs, rhs) {
        (Value::Int(a), Value::Int(b)) => Ok(a.cmp(b)),
        (Value::Str(a), Value::Str(b)) => Ok(a.cmp(b)),
        (Value::Int(a), Value::Real(b)) => partial(*a as f64, *b),
        (Value::Real(a), Value::Int(b)) => partial(*a, *b as f64),
        (Value::Real(a), Value::Real(b)) => partial(*a, *b),
        _ => Err(ExecError::TypeMismatch(format!(
            "cannot order {} against {}",
            lhs.type_name(),
            rhs.type_name()
        ))),
    }
}

fn partial(a: f64, b: f64) -> Result<Ordering, ExecError> {
    a.partial_cmp(&b)
        .ok_or_else(|| ExecError::TypeMismatch("cannot order against NaN".to_string()))
}

fn add<'a>(lhs: Value<'a>, rhs: Value<'a>) -> Result<Value<'a>, ExecError> {
    match (&lhs, &rhs) {
        (Value::Int(a), Value::Int(b)) => a
            .checked_add(*b)
            .map(Value::Int)
            .ok_or(ExecError::Overflow("addition")),
        (Value::Int(a), Value::Real(b)) => Ok(Value::Real(*a as f64 + b)),
        (Value::Real(a), Value::Int(b)) => Ok(Value::Real(a + *b as f64)),
        (Value::Real(a), Value::Real(b)) => Ok(Value::Real(a + b)),
        (Value::Str(a), Value::Str(b)) => Ok(Value::Str(Arc::from(format!("{a}{b}")))),
        _ => Err(type_mismatch_binary("+", &lhs, &rhs)),
    }
}

fn numeric<'a>(
    lhs: Value<'a>,
    rhs: Value<'a>,
    symbol: &'static str,
    operation: &'static str,
    int_op: fn(i64, i64) -> Option<i64>,
    real_op: fn(f64, f64) -> f64,
) -> Result<Value<'a>, ExecError> {
    match (&lhs, &rhs) {
        (Value::Int(a), Value::Int(b)) => int_op(*a, *b)
            .map(Value::Int)
            .ok_or(ExecError::Overflow(operation)),
        (Value::Int(a), Value::Real(b)) => Ok(Value::Real(real_op(*a as f64, *b))),
        (Value::Real(a), Value::Int(b)) => Ok(Value::Real(real_op(*a, *b as f64))),
        (Value::Real(a), Value::Real(b)) => Ok(Value::Real(real_op(*a, *b))),
        _ => Err(type_mismatch_binary(symbol, &lhs, &rhs)),
    }
}

fn div<'a>(lhs: Value<'a>, rhs: Value<'a>) -> Result<Value<'a>, ExecError> {
    match (&lhs, &rhs) {
        (Value::Int(_), Value::Int(0)) => Err(ExecError::DivisionByZero),
        (Value::Int(a), Value::Int(b)) => a
            .checked_div(*b)
            .map(Value::Int)
            .ok_or(ExecError::Overflow("division")),
        (Value::Int(a), Value::Real(b)) => Ok(Value::Real(*a as f64 / b)),
        (Value::Real(a), Value::Int(b)) => Ok(Value::Real(a / *b as f64)),
        (Value::Real(a), Value::Real(b)) => Ok(Value::Real(a / b)),
        _ => Err(type_mismatch_binary("/", &lhs, &rhs)),
    }
}

fn rem<'a>(lhs: Value<'a>, rhs: Value<'a>) -> Result<Value<'a>, ExecError> {
    match (&lhs, &rhs) {
        (Value::Int(_), Value::Int(0)) => Err(ExecError::DivisionByZero),
        (Value::Int(a), Value::Int(b)) => a
            .checked_rem(*b)
            .map(Value::Int)
            .ok_or(ExecError::Overflow("remainder")),
        _ => Err(type_mismatch_binary("%", &lhs, &rhs)),
    }
}

fn type_mismatch_binary(symbol: &str, lhs: &Value<'_>, rhs: &Value<'_>) -> ExecError {
    ExecError::TypeMismatch(format!(
        "cannot apply {symbol} to {} and {}",
        lhs.type_name(),
        rhs.type_name()
    ))
}

fn call_method<'a>(
    target: Value<'a>,
    name: &str,
    args: &[Value<'a>],
) -> Result<Value<'a>, ExecError> {
    match target {
        Value::Object(object) => object_method(object, name, args),
        Value::Collection(items) => match name {
            "size" if args.is_empty() => Ok(Value::Int(items.len() as i64)),
            _ => Err(ExecError::UnknownMethod {
                target: "collection",
                name: name.to_string(),
            }),
        },
        other => Err(ExecError::UnknownMethod {
            target: other.type_name(),
            name: name.to_string(),
        }),
    }
}

/// The host-object surface: `getLinkedObjects("<rel>")` fetches a linked
/// collection, and any other `get<Prop>()` reads the property `<Prop>`.
fn object_method<'a>(
    object: &'a dyn ModelObject,
    name: &str,
    args: &[Value<'a>],
) -> Result<Value<'a>, ExecError> {
    if name == "getLinkedObjects" {
        let rel = match args {
            [Value::Str(rel)] => rel.as_ref(),
            _ => {
                return Err(ExecError::TypeMismatch(
                    "getLinkedObjects takes one string argument".to_string(),
                ));
            }
        };
        return object
            .linked_objects(rel)
            .map(Value::Collection)
            .ok_or_else(|| ExecError::UnknownRelationship(rel.to_string()));
    }
    match name.strip_prefix("get") {
        Some(property) if !property.is_empty() && args.is_empty() => {
            if object.property_names().iter().any(|p| p == property) {
                Ok(object.property(property).map(Value::from).unwrap_or(Value::Null))
            } else {
                Err(ExecError::UnknownProperty(property.to_string()))
            }
        }
        _ => Err(ExecError::UnknownMethod {
            target: "object",
            name: name.to_string(),
        }),
    }
}

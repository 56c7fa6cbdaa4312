// src/expression.rs
use crate::context::Context;
use crate::errors::{EvalError, Result};
use crate::operators::{self, Catalog};
use crate::parser::{self, OpCall};
use crate::path::find_value_by_path;
use crate::value::{Map, Value};
use tracing::{info, trace, warn};

const NOW: &str = "$NOW";
const CURRENT_USER: &str = "$CURRENT_USER";
const CURRENT_USER_KEY: &str = "__currentUser";

/// Evaluates `expr` against the context. Logs the final pair in debug mode.
pub(crate) fn evaluate(expr: &str, ctx: &Context<'_>) -> Result<Value> {
    let result = match resolve(expr, ctx, 0) {
        Err(EvalError::TooDeep(depth)) if !ctx.debug => {
            warn!(depth, expression = expr, "formula nesting limit reached");
            Value::String(String::new())
        }
        other => other?,
    };
    if ctx.debug {
        info!(expression = expr, result = %result.to_json(), "formula evaluated");
    }
    Ok(result)
}

/// First matching rule wins: quoted literal, field path, dynamic variable,
/// operator call, numeric literal. Nothing matching is `""`, or an error in
/// debug mode. Nesting past `max_depth` abandons the whole evaluation.
fn resolve(expr: &str, ctx: &Context<'_>, depth: usize) -> Result<Value> {
    let expr = expr.trim();

    if let Some(text) = parser::unquote(expr) {
        return Ok(Value::String(text));
    }
    if let Some(found) = lookup(expr, ctx) {
        return Ok(found);
    }
    if let Some(var) = dynamic_variable(expr, ctx) {
        return Ok(var);
    }

    if let Some(call) = parser::parse_op(expr) {
        if depth >= ctx.max_depth {
            return Err(EvalError::TooDeep(ctx.max_depth));
        }
        if let Some(value) = apply(&call, ctx, depth)? {
            if ctx.debug {
                trace!(expression = expr, result = %value, "operator applied");
            }
            return Ok(value);
        }
    }

    let n = parser::parse_float(expr);
    if !n.is_nan() {
        return Ok(Value::Number(n));
    }
    if ctx.debug {
        return Err(EvalError::Parse(expr.to_string()));
    }
    Ok(Value::String(String::new()))
}

/// Path in `values`, falling back to `defaults` when the primary is missing
/// or null. A null primary is still returned when the fallback is missing.
fn lookup(path: &str, ctx: &Context<'_>) -> Option<Value> {
    let primary = find_value_by_path(ctx.values, path);
    if primary.map_or(true, Value::is_nullish) {
        if let Some(fallback) = find_value_by_path(ctx.defaults, path) {
            return Some(fallback.clone());
        }
    }
    primary.cloned()
}

fn dynamic_variable(expr: &str, ctx: &Context<'_>) -> Option<Value> {
    if expr == NOW {
        return Some(Value::Date(ctx.now));
    }
    if !expr.starts_with(CURRENT_USER) {
        return None;
    }
    let user = find_value_by_path(ctx.values, CURRENT_USER_KEY);
    if expr == CURRENT_USER {
        return Some(
            user.and_then(|u| find_value_by_path(u, "id"))
                .cloned()
                .unwrap_or(Value::Undefined),
        );
    }
    let scope = Value::Object(Map::from([(
        CURRENT_USER.to_string(),
        user.cloned().unwrap_or(Value::Undefined),
    )]));
    Some(find_value_by_path(&scope, expr).cloned().unwrap_or(Value::Null))
}

/// `Ok(None)` when no operator of that name takes that many arguments.
fn apply(call: &OpCall<'_>, ctx: &Context<'_>, depth: usize) -> Result<Option<Value>> {
    if let ([source, body], Some(kind)) = (call.args.as_slice(), Aggregate::from_name(call.name)) {
        return aggregate(kind, source, body, ctx, depth).map(Some);
    }
    if call.name == "IFS" && call.args.len() >= 4 && call.args.len() % 2 == 0 {
        return ifs(&call.args, ctx, depth).map(Some);
    }

    let catalog = Catalog::builtin();
    if !catalog.supports(call.name, call.args.len()) {
        return Ok(None);
    }
    let args = call
        .args
        .iter()
        .map(|arg| resolve(arg, ctx, depth + 1))
        .collect::<Result<Vec<_>>>()?;
    Ok(catalog.apply(call.name, &args))
}

/// Value paired with the first condition that is exactly `true`, else null.
fn ifs(args: &[&str], ctx: &Context<'_>, depth: usize) -> Result<Value> {
    for pair in args.chunks(2) {
        if let [cond, value] = pair {
            if resolve(cond, ctx, depth + 1)? == Value::Bool(true) {
                return resolve(value, ctx, depth + 1);
            }
        }
    }
    Ok(Value::Null)
}

/// Per-record folds: the second argument is evaluated once per element of
/// the sequence named by the first, with the element as the record.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Aggregate {
    Sum,
    Min,
    Max,
    Avg,
    Mul,
    And,
    Or,
    Count,
}

impl Aggregate {
    fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "ASUM" => Self::Sum,
            "AMIN" => Self::Min,
            "AMAX" => Self::Max,
            "AAVG" => Self::Avg,
            "AMUL" => Self::Mul,
            "AAND" => Self::And,
            "AOR" => Self::Or,
            "ACOUNT" => Self::Count,
            _ => return None,
        })
    }

    fn seed(self) -> Value {
        match self {
            Self::Sum | Self::Avg | Self::Count => Value::Number(0.0),
            Self::Min => Value::Number(f64::INFINITY),
            Self::Max => Value::Number(f64::NEG_INFINITY),
            Self::Mul => Value::Number(1.0),
            Self::And => Value::Bool(true),
            Self::Or => Value::Bool(false),
        }
    }

    /// Result when the source is missing or not a sequence.
    fn missing(self) -> Value {
        match self {
            Self::And => Value::Bool(true),
            Self::Or => Value::Bool(false),
            _ => Value::Number(0.0),
        }
    }

    fn step(self, acc: Value, item: Value) -> Value {
        match self {
            Self::Sum | Self::Avg => acc.add(&item),
            Self::Min => Value::Number(operators::min(acc.to_number(), item.to_number())),
            Self::Max => Value::Number(operators::max(acc.to_number(), item.to_number())),
            Self::Mul => Value::Number(acc.to_number() * item.to_number()),
            Self::And => {
                if acc.truthy() {
                    item
                } else {
                    acc
                }
            }
            Self::Or => {
                if acc.truthy() {
                    acc
                } else {
                    item
                }
            }
            Self::Count => Value::Number(acc.to_number() + f64::from(u8::from(item.truthy()))),
        }
    }
}

fn aggregate(kind: Aggregate, source: &str, body: &str, ctx: &Context<'_>, depth: usize) -> Result<Value> {
    let records = match find_value_by_path(ctx.values, source)
        .or_else(|| find_value_by_path(ctx.defaults, source))
    {
        Some(Value::Array(items)) => items,
        _ => return Ok(kind.missing()),
    };

    let no_defaults = Value::Object(Map::new());
    let mut acc = kind.seed();
    for record in records {
        // Logical folds stop evaluating once the outcome is fixed.
        let settled = match kind {
            Aggregate::And => !acc.truthy(),
            Aggregate::Or => acc.truthy(),
            _ => false,
        };
        if settled {
            break;
        }
        let item = resolve(body, &ctx.with_record(record, &no_defaults), depth + 1)?;
        acc = kind.step(acc, item);
    }

    if kind == Aggregate::Avg {
        return Ok(Value::Number(acc.to_number() / records.len() as f64));
    }
    Ok(acc)
}

use super::Catalog;
use crate::format;
use crate::value::Value;

/// Nearest integer with halves rounded towards +infinity (`-2.5` -> `-2`).
pub(crate) fn round_half_up(x: f64) -> f64 {
    if !x.is_finite() {
        return x;
    }
    let floor = x.floor();
    if x - floor >= 0.5 {
        floor + 1.0
    } else {
        floor
    }
}

/// `Math.max` semantics: `NaN` wins over everything.
pub(crate) fn max(a: f64, b: f64) -> f64 {
    if a.is_nan() || b.is_nan() {
        f64::NAN
    } else {
        a.max(b)
    }
}

pub(crate) fn min(a: f64, b: f64) -> f64 {
    if a.is_nan() || b.is_nan() {
        f64::NAN
    } else {
        a.min(b)
    }
}

fn power(base: f64, exp: f64) -> f64 {
    if exp.is_nan() || (base.abs() == 1.0 && exp.is_infinite()) {
        return f64::NAN;
    }
    base.powf(exp)
}

pub(super) fn register(c: &mut Catalog) {
    c.unary("ABS", |a| Value::Number(a.to_number().abs()));
    c.unary("SQRT", |a| Value::Number(a.to_number().sqrt()));
    c.unary("EXP", |a| Value::Number(a.to_number().exp()));
    c.unary("LOG", |a| Value::Number(a.to_number().ln()));
    c.unary("CEIL", |a| Value::Number(a.to_number().ceil()));
    c.unary("FLOOR", |a| Value::Number(a.to_number().floor()));
    c.unary("ROUND", |a| Value::Number(round_half_up(a.to_number())));

    c.binary("SUM", |a, b| a.add(b));
    c.binary("SUBTRACT", |a, b| Value::Number(a.to_number() - b.to_number()));
    c.binary("MULTIPLY", |a, b| Value::Number(a.to_number() * b.to_number()));
    c.binary("DIVIDE", |a, b| Value::Number(a.to_number() / b.to_number()));
    c.binary("REMAINDER", |a, b| Value::Number(a.to_number() % b.to_number()));
    c.binary("ROUND", |a, b| Value::String(format::to_fixed(a.to_number(), b.to_number())));
    c.binary("MAX", |a, b| Value::Number(max(a.to_number(), b.to_number())));
    c.binary("MIN", |a, b| Value::Number(min(a.to_number(), b.to_number())));
    c.binary("POWER", |a, b| Value::Number(power(a.to_number(), b.to_number())));
}

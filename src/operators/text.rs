//! String operators. Positions and lengths count characters.

use super::Catalog;
use crate::value::Value;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Everything except `A-Z a-z 0-9 - _ . ! ~ * ' ( )` is escaped.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Integer part of a numeric argument; `NaN` counts as zero.
pub(crate) fn integer(v: &Value) -> f64 {
    let n = v.to_number();
    if n.is_nan() {
        0.0
    } else {
        n.trunc()
    }
}

/// Resolves a possibly negative position against `len`, clamped to `0..=len`.
fn relative(pos: f64, len: usize) -> usize {
    let len_f = len as f64;
    let p = if pos < 0.0 { (len_f + pos).max(0.0) } else { pos.min(len_f) };
    p as usize
}

fn slice(s: &str, start: usize, end: usize) -> String {
    if end <= start {
        return String::new();
    }
    s.chars().skip(start).take(end - start).collect()
}

fn left(a: &Value, b: &Value) -> Value {
    let s = a.to_string();
    let len = s.chars().count();
    Value::String(slice(&s, 0, relative(integer(b), len)))
}

fn right(a: &Value, b: &Value) -> Value {
    let s = a.to_string();
    let len = s.chars().count();
    let count = integer(b);
    if count <= 0.0 {
        return Value::String(String::new());
    }
    Value::String(slice(&s, relative(-count, len), len))
}

fn mid(s: &Value, start: &Value, count: &Value) -> Value {
    let s = s.to_string();
    let len = s.chars().count();
    let from = relative(integer(start), len);
    let count = integer(count).clamp(0.0, (len - from) as f64) as usize;
    Value::String(slice(&s, from, from + count))
}

/// Longest string the runtime can build.
const MAX_STRING_LEN: usize = (1 << 29) - 24;

fn rept(a: &Value, b: &Value) -> Value {
    let count = integer(b);
    if !count.is_finite() || count < 0.0 || count > MAX_STRING_LEN as f64 {
        return Value::String(String::new());
    }
    let s = a.to_string();
    match s.len().checked_mul(count as usize) {
        Some(total) if total <= MAX_STRING_LEN => Value::String(s.repeat(count as usize)),
        _ => Value::String(String::new()),
    }
}

/// Character index of `needle` in `hay` at or after `from`, or -1.
pub(crate) fn index_of(hay: &str, needle: &str, from: f64) -> f64 {
    let len = hay.chars().count();
    let from = from.clamp(0.0, len as f64) as usize;
    let byte_start = hay.char_indices().nth(from).map_or(hay.len(), |(i, _)| i);
    match hay[byte_start..].find(needle) {
        Some(offset) => (from + hay[byte_start..byte_start + offset].chars().count()) as f64,
        None => -1.0,
    }
}

pub(super) fn register(c: &mut Catalog) {
    c.unary("STR_LEN", |a| Value::Number(a.to_string().chars().count() as f64));
    c.unary("LOWER", |a| Value::String(a.to_string().to_lowercase()));
    c.unary("UPPER", |a| Value::String(a.to_string().to_uppercase()));
    c.unary("TRIM", |a| Value::String(a.to_string().trim().to_string()));
    c.unary("ENCODE_URL_COMPONENT", |a| {
        Value::String(utf8_percent_encode(&a.to_string(), URI_COMPONENT).to_string())
    });

    c.binary("CONCAT", |a, b| Value::String(format!("{a}{b}")));
    c.binary("LEFT", left);
    c.binary("RIGHT", right);
    c.binary("REPT", rept);
    c.binary("SEARCH", |a, b| {
        Value::Number(index_of(&a.to_string(), &b.to_string(), 0.0))
    });

    c.ternary("MID", mid);
    c.ternary("SUBSTITUTE", |s, old, new| {
        Value::String(s.to_string().replace(&old.to_string(), &new.to_string()))
    });
    c.ternary("SEARCH", |s, find, start| {
        Value::Number(index_of(&s.to_string(), &find.to_string(), integer(start)))
    });
}

use crate::{date, format};
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

pub type Map = BTreeMap<String, Value>;

/// A dynamically typed formula value.
///
/// `Date` carries epoch milliseconds; `NaN` marks an invalid timestamp.
/// `Undefined` is what an absent dynamic variable resolves to and is kept
/// apart from `Null` because `NULL(...)` distinguishes the two.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Value {
    #[default]
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Date(f64),
    Array(Vec<Value>),
    Object(Map),
}

/// Which primitive a composite value prefers when it has to become one.
#[derive(Clone, Copy, PartialEq)]
pub(crate) enum Hint {
    Default,
    Number,
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn is_nullish(&self) -> bool {
        matches!(self, Value::Null | Value::Undefined)
    }

    pub fn as_array(&self) -> Option<&Vec<Value>> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Loose truthiness: `false`, `0`, `NaN`, `""`, null and undefined are falsy.
    pub fn truthy(&self) -> bool {
        match self {
            Value::Undefined | Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => *n != 0.0 && !n.is_nan(),
            Value::String(s) => !s.is_empty(),
            Value::Date(_) | Value::Array(_) | Value::Object(_) => true,
        }
    }

    /// Numeric coercion as performed by arithmetic operators.
    pub fn to_number(&self) -> f64 {
        match self {
            Value::Undefined => f64::NAN,
            Value::Null => 0.0,
            Value::Bool(b) => f64::from(u8::from(*b)),
            Value::Number(n) => *n,
            Value::String(s) => string_to_number(s),
            Value::Date(ms) => *ms,
            Value::Array(_) => string_to_number(&self.to_string()),
            Value::Object(_) => f64::NAN,
        }
    }

    pub(crate) fn to_primitive(&self, hint: Hint) -> Value {
        match self {
            Value::Date(ms) if hint == Hint::Number => Value::Number(*ms),
            Value::Date(_) | Value::Array(_) | Value::Object(_) => Value::String(self.to_string()),
            other => other.clone(),
        }
    }

    /// The `+` operator: concatenation as soon as either side is textual,
    /// numeric addition otherwise.
    pub fn add(&self, other: &Value) -> Value {
        let a = self.to_primitive(Hint::Default);
        let b = other.to_primitive(Hint::Default);
        match (&a, &b) {
            (Value::String(_), _) | (_, Value::String(_)) => Value::String(format!("{a}{b}")),
            _ => Value::Number(a.to_number() + b.to_number()),
        }
    }

    /// Converts into JSON for hosts. Timestamps become ISO-8601 strings;
    /// non-finite numbers and undefined become null.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Undefined | Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Number(n) => number_to_json(*n),
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::Date(ms) => date::to_iso_string(*ms)
                .map(serde_json::Value::String)
                .unwrap_or(serde_json::Value::Null),
            Value::Array(items) => serde_json::Value::Array(items.iter().map(Value::to_json).collect()),
            Value::Object(map) => serde_json::Value::Object(
                map.iter().map(|(k, v)| (k.clone(), v.to_json())).collect(),
            ),
        }
    }
}

/// Parses a JSON document into a record.
pub fn parse_record(raw: &str) -> crate::errors::Result<Value> {
    Ok(Value::from(serde_json::from_str::<serde_json::Value>(raw)?))
}

fn number_to_json(n: f64) -> serde_json::Value {
    const MAX_SAFE: f64 = 9_007_199_254_740_991.0;
    if n.fract() == 0.0 && n.abs() <= MAX_SAFE {
        return serde_json::Value::from(n as i64);
    }
    serde_json::Number::from_f64(n)
        .map(serde_json::Value::Number)
        .unwrap_or(serde_json::Value::Null)
}

/// String-to-number coercion: whitespace is trimmed, the empty string is
/// zero, and anything that is not a complete numeric literal is `NaN`.
pub(crate) fn string_to_number(s: &str) -> f64 {
    let t = s.trim();
    if t.is_empty() {
        return 0.0;
    }
    match t {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }
    for (prefix, radix) in [("0x", 16), ("0X", 16), ("0o", 8), ("0O", 8), ("0b", 2), ("0B", 2)] {
        if let Some(digits) = t.strip_prefix(prefix) {
            if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
                return f64::NAN;
            }
            return digits
                .chars()
                .filter_map(|c| c.to_digit(radix))
                .fold(0.0, |acc, d| acc * f64::from(radix) + f64::from(d));
        }
    }
    // Rust also accepts "inf"/"nan"; only plain decimal syntax is numeric here.
    if !t
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-'))
    {
        return f64::NAN;
    }
    t.parse::<f64>().unwrap_or(f64::NAN)
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => f.write_str("undefined"),
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Number(n) => f.write_str(&format::number_to_string(*n)),
            Value::String(s) => f.write_str(s),
            Value::Date(ms) => f.write_str(&date::to_long_string(*ms)),
            Value::Array(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    if !item.is_nullish() {
                        write!(f, "{item}")?;
                    }
                }
                Ok(())
            }
            Value::Object(_) => f.write_str("[object Object]"),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => Value::Array(items.into_iter().map(Value::from).collect()),
            serde_json::Value::Object(map) => {
                Value::Object(map.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}

impl From<&serde_json::Value> for Value {
    fn from(v: &serde_json::Value) -> Self {
        Value::from(v.clone())
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn numeric_coercion() {
        assert_eq!(Value::from(" 42 ").to_number(), 42.0);
        assert_eq!(Value::from("").to_number(), 0.0);
        assert_eq!(Value::from("0x1F").to_number(), 31.0);
        assert!(Value::from("12abc").to_number().is_nan());
        assert!(Value::from("inf").to_number().is_nan());
        assert_eq!(Value::Null.to_number(), 0.0);
        assert!(Value::Undefined.to_number().is_nan());
        assert_eq!(Value::from(vec![Value::from(5.0)]).to_number(), 5.0);
        assert_eq!(Value::Array(vec![]).to_number(), 0.0);
    }

    #[test]
    fn truthiness_keeps_empty_containers_truthy() {
        assert!(Value::Array(vec![]).truthy());
        assert!(Value::Object(Map::new()).truthy());
        assert!(!Value::Number(f64::NAN).truthy());
        assert!(!Value::from("").truthy());
    }

    #[test]
    fn add_concatenates_text() {
        assert_eq!(Value::from(1.0).add(&Value::from(2.0)), Value::Number(3.0));
        assert_eq!(Value::from("a").add(&Value::from(1.0)), Value::from("a1"));
        assert_eq!(Value::Null.add(&Value::from(true)), Value::Number(1.0));
    }

    #[test]
    fn display_matches_runtime_string_form() {
        let arr = Value::Array(vec![Value::from(1.0), Value::Null, Value::from("x")]);
        assert_eq!(arr.to_string(), "1,,x");
        assert_eq!(Value::Object(Map::new()).to_string(), "[object Object]");
        assert_eq!(Value::from(0.5).to_string(), "0.5");
    }

    #[test]
    fn rejects_bad_records() {
        assert!(parse_record("{\"a\": 1}").is_ok());
        assert!(matches!(parse_record("{nope"), Err(crate::errors::EvalError::Json(_))));
    }

    #[test]
    fn json_round_trip_keeps_integers() {
        let v = Value::from(json!({"a": [1, 2.5, null, "s"]}));
        assert_eq!(v.to_json(), json!({"a": [1, 2.5, null, "s"]}));
        assert_eq!(Value::Number(f64::INFINITY).to_json(), json!(null));
    }
}

use super::Catalog;
use crate::value::Value;

fn sum(items: &[Value]) -> Value {
    items.iter().fold(Value::Number(0.0), |acc, v| acc.add(v))
}

pub(super) fn register(c: &mut Catalog) {
    c.unary("SUM", |a| match a {
        Value::Array(items) => sum(items),
        _ => Value::Number(0.0),
    });
    c.unary("AVERAGE", |a| match a {
        Value::Array(items) => Value::Number(sum(items).to_number() / items.len() as f64),
        _ => Value::Number(0.0),
    });
    c.unary("ARRAY_LEN", |a| {
        Value::Number(a.as_array().map_or(0, Vec::len) as f64)
    });

    c.binary("JOIN", |a, sep| match a {
        Value::Array(items) => {
            let sep = match sep {
                Value::Undefined => ",".to_string(),
                other => other.to_string(),
            };
            let parts: Vec<String> = items
                .iter()
                .map(|v| if v.is_nullish() { String::new() } else { v.to_string() })
                .collect();
            Value::String(parts.join(&sep))
        }
        _ => Value::String(String::new()),
    });
    c.binary("SPLIT", |a, sep| {
        let s = a.to_string();
        let sep = sep.to_string();
        let parts: Vec<Value> = if sep.is_empty() {
            s.chars().map(|ch| Value::String(ch.to_string())).collect()
        } else {
            s.split(sep.as_str()).map(Value::from).collect()
        };
        Value::Array(parts)
    });
}

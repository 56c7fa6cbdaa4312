use crate::value::{Hint, Value};
use std::cmp::Ordering;

/// Relational comparison under loose coercion: two strings compare
/// lexicographically, everything else numerically. `None` when either side
/// is `NaN` after coercion, which makes every ordering predicate false.
pub fn compare(a: &Value, b: &Value) -> Option<Ordering> {
    let pa = a.to_primitive(Hint::Number);
    let pb = b.to_primitive(Hint::Number);
    match (&pa, &pb) {
        (Value::String(sa), Value::String(sb)) => Some(sa.cmp(sb)),
        _ => pa.to_number().partial_cmp(&pb.to_number()),
    }
}

pub fn cmp_values<F>(a: &Value, b: &Value, pred_on_ord: F) -> bool
where
    F: Fn(Ordering) -> bool,
{
    compare(a, b).is_some_and(pred_on_ord)
}

/// Strict equality: same type and same value. `NaN` is never equal to itself.
///
/// Timestamps, arrays and objects compare by content, not identity, so two
/// separately built `DATE(0)` values are equal.
pub fn strict_eq(a: &Value, b: &Value) -> bool {
    a == b
}

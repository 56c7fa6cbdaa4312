use super::Catalog;
use crate::comparison::{cmp_values, strict_eq};
use crate::value::Value;

pub(super) fn register(c: &mut Catalog) {
    c.unary("NULL", |a| Value::Bool(a.is_null()));
    c.unary("NOT_NULL", |a| Value::Bool(!a.is_null()));
    c.unary("NOT", |a| Value::Bool(!a.truthy()));

    c.binary("EQUAL", |a, b| Value::Bool(strict_eq(a, b)));
    c.binary("NOT_EQUAL", |a, b| Value::Bool(!strict_eq(a, b)));
    c.binary("GT", |a, b| Value::Bool(cmp_values(a, b, |o| o.is_gt())));
    c.binary("GTE", |a, b| Value::Bool(cmp_values(a, b, |o| o.is_ge())));
    c.binary("LT", |a, b| Value::Bool(cmp_values(a, b, |o| o.is_lt())));
    c.binary("LTE", |a, b| Value::Bool(cmp_values(a, b, |o| o.is_le())));

    // Both return an operand, not a boolean.
    c.binary("AND", |a, b| if a.truthy() { b.clone() } else { a.clone() });
    c.binary("OR", |a, b| if a.truthy() { a.clone() } else { b.clone() });

    c.ternary("IF", |cond, then, otherwise| {
        if *cond == Value::Bool(true) {
            then.clone()
        } else {
            otherwise.clone()
        }
    });
}

use super::Catalog;
use crate::value::Value;
use crate::{date, format, parser, slug};

pub(super) fn register(c: &mut Catalog) {
    c.unary("INT", |a| Value::Number(parser::parse_int(&a.to_string())));
    c.unary("FLOAT", |a| Value::Number(parser::parse_float(&a.to_string())));
    c.unary("STRING", |a| Value::String(a.to_string()));
    c.unary("DATE", |a| Value::Date(date::to_timestamp(a)));
    c.unary("SLUG", |a| Value::String(slug::to_slug(a)));
    c.unary("CURRENCY", |a| Value::String(format::currency(a.to_number())));
}

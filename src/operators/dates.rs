use super::Catalog;
use crate::date::{self, Component};
use crate::value::Value;

/// Component of a timestamp operand; anything else reads as 0.
fn part(v: &Value, which: Component) -> Value {
    match v {
        Value::Date(ms) => Value::Number(date::component(*ms, which)),
        _ => Value::Number(0.0),
    }
}

pub(super) fn register(c: &mut Catalog) {
    c.unary("DATE_ISO", |a| {
        Value::String(
            date::to_iso_string(date::to_timestamp(a)).unwrap_or_else(|| "Invalid Date".to_string()),
        )
    });
    c.unary("DATE_UTC", |a| Value::String(date::to_utc_string(date::to_timestamp(a))));
    c.unary("DATE_STR", |a| Value::String(date::to_date_string(date::to_timestamp(a))));
    c.unary("TIME_STR", |a| Value::String(date::to_time_string(date::to_timestamp(a))));

    c.unary("YEAR", |a| part(a, Component::Year));
    c.unary("MONTH", |a| part(a, Component::Month));
    c.unary("GET_DATE", |a| part(a, Component::DayOfMonth));
    c.unary("DAY", |a| part(a, Component::Weekday));
    c.unary("HOURS", |a| part(a, Component::Hours));
    c.unary("MINUTES", |a| part(a, Component::Minutes));
    c.unary("SECONDS", |a| part(a, Component::Seconds));
    c.unary("TIME", |a| match a {
        Value::Date(ms) => Value::Number(*ms),
        _ => Value::Number(0.0),
    });
}

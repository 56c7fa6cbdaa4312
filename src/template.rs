use crate::context::Context;
use crate::errors::Result;
use crate::expression;
use crate::value::Value;
use regex::Regex;
use std::sync::OnceLock;

fn placeholder_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\{\{(.*?)\}\}").expect("static placeholder pattern"))
}

/// Renders `{{ expression }}` placeholders.
///
/// A template that is a single placeholder yields the raw value, so numbers
/// stay numbers. Otherwise every placeholder is replaced by the string form
/// of its value and the result is a string.
pub(crate) fn render(template: &str, ctx: &Context<'_>) -> Result<Value> {
    let trimmed = template.trim();
    if let Some(inner) = trimmed.strip_prefix("{{").and_then(|t| t.strip_suffix("}}")) {
        if !inner.contains("{{") {
            return expression::evaluate(inner, ctx);
        }
    }

    let mut out = String::with_capacity(template.len());
    let mut last = 0;
    for caps in placeholder_regex().captures_iter(template) {
        let (Some(whole), Some(inner)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        out.push_str(&template[last..whole.start()]);
        let value = expression::evaluate(inner.as_str(), ctx)?;
        out.push_str(&value.to_string());
        last = whole.end();
    }
    out.push_str(&template[last..]);
    Ok(Value::String(out))
}

/// Whether any placeholder of `template` mentions `field`.
pub fn referenced_in_template(template: &str, field: &str) -> bool {
    placeholder_regex()
        .find_iter(template)
        .any(|m| m.as_str().contains(field))
}

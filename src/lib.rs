//! A small spreadsheet-style formula language evaluated against a record of
//! named values.
//!
//! ```
//! use computed_formula::evaluate;
//! use serde_json::json;
//!
//! let out = evaluate("SUM(a, MULTIPLY(b, 2))", &json!({"a": 1, "b": 3}), &json!({}), false).unwrap();
//! assert_eq!(out.to_json(), json!(7));
//! ```

pub mod context;
pub mod date;
pub mod errors;
pub mod format;
pub mod operators;
pub mod parser;
pub mod path;
pub mod slug;
pub mod value;
mod comparison;
mod expression;
mod template;

use chrono::Utc;
use context::Context;

pub use context::EvalOptions;
pub use errors::{EvalError, Result};
pub use parser::{parse_op, OpCall};
pub use path::find_value_by_path;
pub use slug::to_slug;
pub use template::referenced_in_template;
pub use value::{parse_record, Map, Value};

/// Evaluates formulas and templates with a fixed set of options.
///
/// The evaluator holds no per-call state and can be shared across threads.
#[derive(Clone, Debug, Default)]
pub struct Evaluator {
    options: EvalOptions,
}

impl Evaluator {
    pub fn new(options: EvalOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &EvalOptions {
        &self.options
    }

    /// Evaluates `expr` against `values`, consulting `defaults` for paths
    /// that are missing or null in `values`.
    pub fn eval(&self, expr: &str, values: &Value, defaults: &Value) -> Result<Value> {
        expression::evaluate(expr, &self.context(values, defaults))
    }

    /// Renders a `{{ ... }}` template. See [`referenced_in_template`].
    pub fn render(&self, template: &str, values: &Value, defaults: &Value) -> Result<Value> {
        template::render(template, &self.context(values, defaults))
    }

    /// JSON in, JSON out.
    pub fn eval_json(
        &self,
        expr: &str,
        values: &serde_json::Value,
        defaults: &serde_json::Value,
    ) -> Result<serde_json::Value> {
        let out = self.eval(expr, &Value::from(values), &Value::from(defaults))?;
        Ok(out.to_json())
    }

    fn context<'a>(&self, values: &'a Value, defaults: &'a Value) -> Context<'a> {
        let now = self.options.now.unwrap_or_else(Utc::now);
        Context {
            values,
            defaults,
            now: now.timestamp_millis() as f64,
            debug: self.options.debug,
            max_depth: self.options.max_depth,
        }
    }
}

/// Convenience: evaluate with default options and the given debug flag.
pub fn evaluate(
    expr: &str,
    values: &serde_json::Value,
    defaults: &serde_json::Value,
    debug: bool,
) -> Result<Value> {
    Evaluator::new(EvalOptions::default().debug(debug)).eval(expr, &Value::from(values), &Value::from(defaults))
}

/// Convenience: render a template with default options and the given debug flag.
pub fn evaluate_template(
    template: &str,
    values: &serde_json::Value,
    defaults: &serde_json::Value,
    debug: bool,
) -> Result<Value> {
    Evaluator::new(EvalOptions::default().debug(debug)).render(
        template,
        &Value::from(values),
        &Value::from(defaults),
    )
}

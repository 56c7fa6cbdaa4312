use crate::value::Value;
use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Evaluation knobs.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct EvalOptions {
    /// Fail on unresolvable expressions and log every resolved step.
    pub debug: bool,
    /// Deepest operator nesting evaluated before the expression is given up on.
    pub max_depth: usize,
    /// Frozen value for `$NOW`. Unset means "read the clock once per evaluation".
    pub now: Option<DateTime<Utc>>,
}

impl Default for EvalOptions {
    fn default() -> Self {
        Self {
            debug: false,
            max_depth: 256,
            now: None,
        }
    }
}

impl EvalOptions {
    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn frozen_at(mut self, now: DateTime<Utc>) -> Self {
        self.now = Some(now);
        self
    }
}

/// Per-evaluation state threaded through the recursive evaluator.
///
/// `values` is the current record and `defaults` the fallback record; both
/// are borrowed read-only. `now` is resolved once per top-level call.
#[derive(Clone, Copy)]
pub(crate) struct Context<'a> {
    pub(crate) values: &'a Value,
    pub(crate) defaults: &'a Value,
    pub(crate) now: f64,
    pub(crate) debug: bool,
    pub(crate) max_depth: usize,
}

impl<'a> Context<'a> {
    /// Same clock and flags, different record. Used by the aggregation operators.
    pub(crate) fn with_record<'b>(&self, record: &'b Value, defaults: &'b Value) -> Context<'b> {
        Context {
            values: record,
            defaults,
            now: self.now,
            debug: self.debug,
            max_depth: self.max_depth,
        }
    }
}

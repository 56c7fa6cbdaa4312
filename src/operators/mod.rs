//! The built-in operator catalog.
//!
//! Operators are pure functions of their already-evaluated arguments and are
//! looked up by name within an arity class, so `SUM(a)` and `SUM(a, b)` are
//! different entries. The aggregation operators and `IFS` need the evaluator
//! itself and live in `expression.rs`.

use crate::value::Value;
use std::collections::HashMap;
use std::sync::OnceLock;

mod convert;
mod dates;
mod logic;
mod math;
mod sequence;
mod text;

pub(crate) use math::{max, min};

pub type Unary = fn(&Value) -> Value;
pub type Binary = fn(&Value, &Value) -> Value;
pub type Ternary = fn(&Value, &Value, &Value) -> Value;

/// Name-to-implementation tables, one per arity.
#[derive(Clone, Default)]
pub struct Catalog {
    unary: HashMap<&'static str, Unary>,
    binary: HashMap<&'static str, Binary>,
    ternary: HashMap<&'static str, Ternary>,
}

impl Catalog {
    /// The shared catalog of built-in operators.
    pub fn builtin() -> &'static Catalog {
        static CATALOG: OnceLock<Catalog> = OnceLock::new();
        CATALOG.get_or_init(Catalog::with_builtins)
    }

    fn with_builtins() -> Self {
        let mut c = Catalog::default();
        convert::register(&mut c);
        math::register(&mut c);
        text::register(&mut c);
        dates::register(&mut c);
        logic::register(&mut c);
        sequence::register(&mut c);
        c
    }

    pub(crate) fn unary(&mut self, name: &'static str, f: Unary) {
        self.unary.insert(name, f);
    }

    pub(crate) fn binary(&mut self, name: &'static str, f: Binary) {
        self.binary.insert(name, f);
    }

    pub(crate) fn ternary(&mut self, name: &'static str, f: Ternary) {
        self.ternary.insert(name, f);
    }

    pub fn supports(&self, name: &str, arity: usize) -> bool {
        match arity {
            1 => self.unary.contains_key(name),
            2 => self.binary.contains_key(name),
            3 => self.ternary.contains_key(name),
            _ => false,
        }
    }

    /// Applies `name` to `args`, or `None` when no operator of that name
    /// takes that many arguments.
    pub fn apply(&self, name: &str, args: &[Value]) -> Option<Value> {
        match args {
            [a] => self.unary.get(name).map(|f| f(a)),
            [a, b] => self.binary.get(name).map(|f| f(a, b)),
            [a, b, c] => self.ternary.get(name).map(|f| f(a, b, c)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arity_selects_the_entry() {
        let c = Catalog::builtin();
        let arr = Value::Array(vec![Value::Number(1.0), Value::Number(2.0)]);
        assert_eq!(c.apply("SUM", &[arr]), Some(Value::Number(3.0)));
        assert_eq!(
            c.apply("SUM", &[Value::Number(1.0), Value::Number(2.0)]),
            Some(Value::Number(3.0))
        );
        assert_eq!(c.apply("IF", &[Value::Bool(true)]), None);
        assert!(!c.supports("NOPE", 1));
    }
}

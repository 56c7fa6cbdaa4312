// src/parser.rs
use regex::Regex;
use std::sync::OnceLock;

/// An operator call split out of an expression: `NAME(arg, arg, ...)`.
///
/// Arguments are trimmed sub-slices of the source and are evaluated
/// separately; they are not parsed any further here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpCall<'a> {
    pub name: &'a str,
    pub args: Vec<&'a str>,
}

fn op_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^([A-Z_]+)\((.*)\)$").expect("static operator pattern"))
}

/// Recognises `NAME(...)` and splits the parenthesised list into top-level
/// arguments. Commas and parentheses inside quoted literals or nested calls
/// do not split. Unbalanced input is split as far as the scan gets.
pub fn parse_op(expr: &str) -> Option<OpCall<'_>> {
    let caps = op_regex().captures(expr.trim())?;
    let name = caps.get(1)?.as_str();
    let inner = caps.get(2)?.as_str();
    Some(OpCall {
        name,
        args: split_args(inner),
    })
}

fn split_args(inner: &str) -> Vec<&str> {
    let mut args = Vec::new();
    let mut depth = 0i32;
    let mut in_quote = false;
    let mut escaped = false;
    let mut start = 0;

    for (i, c) in inner.char_indices() {
        if in_quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_quote = false;
            }
            continue;
        }
        match c {
            '"' => in_quote = true,
            '(' => depth += 1,
            ')' => depth -= 1,
            ',' if depth == 0 => {
                args.push(inner[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }
    args.push(inner[start..].trim());
    args
}

/// Contents of a `"..."` literal with `\"` unescaped. No other escapes are
/// interpreted.
pub fn unquote(expr: &str) -> Option<String> {
    if !(expr.starts_with('"') && expr.ends_with('"')) {
        return None;
    }
    let inner = if expr.len() >= 2 { &expr[1..expr.len() - 1] } else { "" };
    Some(inner.replace("\\\"", "\""))
}

/// Longest numeric prefix as a float: `"12.5kg"` is 12.5, `"kg"` is NaN.
pub fn parse_float(s: &str) -> f64 {
    let mut p = Scanner::new(s);
    p.skip_ws();
    let start = p.i;
    let negative = p.peek_char() == Some('-');
    if !p.consume_char('+') {
        p.consume_char('-');
    }
    if p.peek_str("Infinity") {
        return if negative { f64::NEG_INFINITY } else { f64::INFINITY };
    }
    let int_digits = p.eat_digits(10);
    let mut frac_digits = 0;
    if p.consume_char('.') {
        frac_digits = p.eat_digits(10);
    }
    if int_digits + frac_digits == 0 {
        return f64::NAN;
    }
    let mantissa_end = p.i;
    if p.consume_char('e') || p.consume_char('E') {
        if !p.consume_char('+') {
            p.consume_char('-');
        }
        if p.eat_digits(10) == 0 {
            p.i = mantissa_end;
        }
    }
    p.s[start..p.i].parse().unwrap_or(f64::NAN)
}

/// Longest integer prefix, honouring a `0x` hex prefix: `"42px"` is 42,
/// `"1.9"` is 1, `"abc"` is NaN.
pub fn parse_int(s: &str) -> f64 {
    let mut p = Scanner::new(s);
    p.skip_ws();
    let sign = if p.consume_char('-') {
        -1.0
    } else {
        p.consume_char('+');
        1.0
    };
    let radix = if p.peek_str("0x") || p.peek_str("0X") {
        p.i += 2;
        16
    } else {
        10
    };
    let start = p.i;
    if p.eat_digits(radix) == 0 {
        return f64::NAN;
    }
    let magnitude = p.s[start..p.i]
        .chars()
        .filter_map(|c| c.to_digit(radix))
        .fold(0.0, |acc, d| acc * f64::from(radix) + f64::from(d));
    sign * magnitude
}

struct Scanner<'a> {
    s: &'a str,
    i: usize,
}

impl<'a> Scanner<'a> {
    fn new(s: &'a str) -> Self {
        Self { s, i: 0 }
    }

    fn eat_digits(&mut self, radix: u32) -> usize {
        let mut n = 0;
        while let Some(c) = self.peek_char() {
            if c.is_digit(radix) {
                self.i += c.len_utf8();
                n += 1;
            } else {
                break;
            }
        }
        n
    }

    fn consume_char(&mut self, c: char) -> bool {
        if self.peek_char() == Some(c) {
            self.i += c.len_utf8();
            true
        } else {
            false
        }
    }

    fn peek_char(&self) -> Option<char> {
        self.s[self.i..].chars().next()
    }

    fn peek_str(&self, lit: &str) -> bool {
        self.s[self.i..].starts_with(lit)
    }

    fn skip_ws(&mut self) {
        while let Some(c) = self.peek_char() {
            if c.is_whitespace() {
                self.i += c.len_utf8();
            } else {
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn splits_top_level_arguments() {
        let call = parse_op("SUM(a, MULTIPLY(b, c))").unwrap();
        assert_eq!(call.name, "SUM");
        assert_eq!(call.args, vec!["a", "MULTIPLY(b, c)"]);
    }

    #[test]
    fn quoted_commas_and_parens_do_not_split() {
        let call = parse_op(r#"CONCAT("a(b,c)d", x)"#).unwrap();
        assert_eq!(call.args, vec![r#""a(b,c)d""#, "x"]);
    }

    #[test]
    fn escaped_quote_stays_inside_literal() {
        let call = parse_op(r#"CONCAT("say \"hi, there\"", x)"#).unwrap();
        assert_eq!(call.args, vec![r#""say \"hi, there\"""#, "x"]);
    }

    #[test]
    fn escaped_backslash_then_quote_closes_literal() {
        let call = parse_op(r#"CONCAT("a\\", b)"#).unwrap();
        assert_eq!(call.args, vec![r#""a\\""#, "b"]);
    }

    #[test]
    fn single_argument_and_non_calls() {
        assert_eq!(parse_op("  INT(a)  ").unwrap().args, vec!["a"]);
        assert!(parse_op("a.b").is_none());
        assert!(parse_op("sum(a)").is_none());
        assert!(parse_op("SUM(a) + 1").is_none());
        assert!(parse_op("SUM(a,\nb)").is_none());
    }

    #[test]
    fn unbalanced_input_does_not_panic() {
        let call = parse_op("SUM((a, b)").unwrap();
        assert_eq!(call.args, vec!["(a, b"]);
        let call = parse_op(r#"CONCAT("open, b)"#).unwrap();
        assert_eq!(call.args, vec![r#""open, b"#]);
    }

    #[test]
    fn numeric_prefixes() {
        assert_eq!(parse_float("12.5kg"), 12.5);
        assert_eq!(parse_float(" -.5"), -0.5);
        assert_eq!(parse_float("1e3x"), 1000.0);
        assert_eq!(parse_float("2e"), 2.0);
        assert!(parse_float("kg").is_nan());
        assert_eq!(parse_float("Infinity"), f64::INFINITY);
        assert_eq!(parse_int("42px"), 42.0);
        assert_eq!(parse_int("1.9"), 1.0);
        assert_eq!(parse_int("0x1A"), 26.0);
        assert!(parse_int("abc").is_nan());
    }

    #[test]
    fn unquote_literals() {
        assert_eq!(unquote(r#""a\"b""#).as_deref(), Some("a\"b"));
        assert_eq!(unquote("\"\"").as_deref(), Some(""));
        assert_eq!(unquote("abc"), None);
    }
}

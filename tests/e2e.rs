use computed_formula::{evaluate, Value};
use pretty_assertions::assert_eq;
use serde_json::{json, Value as Json};

fn eval(expr: &str, values: Json) -> Json {
    evaluate(expr, &values, &json!({}), false).unwrap().to_json()
}

fn eval_raw(expr: &str, values: Json) -> Value {
    evaluate(expr, &values, &json!({}), false).unwrap()
}

#[test]
fn conversions() {
    assert_eq!(eval("INT(a)", json!({"a": "1"})), json!(1));
    assert_eq!(eval("FLOAT(a)", json!({"a": "1.234"})), json!(1.234));
    assert_eq!(eval("STRING(1)", json!({})), json!("1"));
    assert_eq!(eval("STRING(a)", json!({"a": 123})), json!("123"));
    assert_eq!(eval("SLUG(a)", json!({"a": "This is a title 123 !@#,./\""})), json!("this-is-a-title-123-"));
    assert_eq!(eval("CURRENCY(a)", json!({"a": 1000})), json!("1,000"));
}

#[test]
fn dates() {
    assert_eq!(eval("DATE_ISO(a)", json!({"a": "2022-01-01"})), json!("2022-01-01T00:00:00.000Z"));
    assert_eq!(eval("DATE_UTC(a)", json!({"a": "2022-01-01"})), json!("Sat, 01 Jan 2022 00:00:00 GMT"));
    assert_eq!(
        eval("SUBTRACT(DATE(a), DATE(b))", json!({"a": "2022-01-02", "b": "2022-01-01"})),
        json!(86_400_000)
    );
    assert_eq!(eval("YEAR(DATE(a))", json!({"a": "2022-06-15"})), json!(2022));
    assert_eq!(eval("MONTH(DATE(a))", json!({"a": "2022-06-15"})), json!(5));
    assert_eq!(eval("DATE_STR(DATE(a))", json!({"a": 0})), json!("1970-01-01"));
    assert_eq!(eval("YEAR(a)", json!({"a": "2022-06-15"})), json!(0));
}

#[test]
fn arithmetic() {
    assert_eq!(eval("SUM(a, b)", json!({"a": 1, "b": 2})), json!(3));
    assert_eq!(eval("SUM(a)", json!({"a": [1, 2, 3, 4, 5]})), json!(15));
    assert_eq!(eval("SUM(a)", json!({"a": 1})), json!(0));
    assert_eq!(eval("AVERAGE(a)", json!({"a": [1, 2, 3, 4, 5]})), json!(3));
    assert_eq!(eval("AVERAGE(a)", json!({"a": 1})), json!(0));
    assert_eq!(eval("ABS(a)", json!({"a": -1})), json!(1));
    assert_eq!(eval("SQRT(a)", json!({"a": 100})), json!(10));
    assert_eq!(eval("ROUND(a, 2)", json!({"a": 1.23456})), json!("1.23"));
    assert_eq!(eval("POWER(2, 3)", json!({})), json!(8));
    assert_eq!(eval("MULTIPLY(SUM(a, 1), 2)", json!({"a": 2})), json!(6));
}

#[test]
fn division_by_zero_is_not_guarded() {
    assert_eq!(eval_raw("DIVIDE(1, 0)", json!({})), Value::Number(f64::INFINITY));
    assert!(eval_raw("DIVIDE(0, 0)", json!({})).as_f64().is_some_and(f64::is_nan));
}

#[test]
fn strings() {
    assert_eq!(eval(r#"CONCAT(a, " world")"#, json!({"a": "hello"})), json!("hello world"));
    assert_eq!(eval("LEFT(a, 3)", json!({"a": "abcdef"})), json!("abc"));
    assert_eq!(eval("RIGHT(a, 3)", json!({"a": "abcdef"})), json!("def"));
    assert_eq!(eval("MID(a, 1, 2)", json!({"a": "abcdef"})), json!("bc"));
    assert_eq!(eval(r#"REPT("ab", 2)"#, json!({})), json!("abab"));
    assert_eq!(eval(r#"SEARCH(a, "c")"#, json!({"a": "abcdef"})), json!(2));
    assert_eq!(eval(r#"SEARCH(a, "z")"#, json!({"a": "abcdef"})), json!(-1));
    assert_eq!(eval(r#"SUBSTITUTE(a, "-", " ")"#, json!({"a": "a-b-c"})), json!("a b c"));
    assert_eq!(eval(r#"JOIN(a, ", ")"#, json!({"a": ["x", "y"]})), json!("x, y"));
    assert_eq!(eval(r#"SPLIT(a, ",")"#, json!({"a": "x,y"})), json!(["x", "y"]));
    assert_eq!(eval("STR_LEN(UPPER(TRIM(a)))", json!({"a": "  abc "})), json!(3));
    assert_eq!(eval("ENCODE_URL_COMPONENT(a)", json!({"a": "a b"})), json!("a%20b"));
    assert_eq!(eval("ARRAY_LEN(a)", json!({"a": [1, 2]})), json!(2));
}

#[test]
fn quoted_literals() {
    assert_eq!(eval(r#""a\"b""#, json!({})), json!("a\"b"));
    assert_eq!(eval(r#""a(b,c)d""#, json!({})), json!("a(b,c)d"));
    assert_eq!(eval(r#"CONCAT("x, (y", ")")"#, json!({})), json!("x, (y)"));
}

#[test]
fn logic_preserves_operands() {
    assert_eq!(eval("AND(0, 5)", json!({})), json!(0));
    assert_eq!(eval("OR(0, 5)", json!({})), json!(5));
    assert_eq!(eval("AND(a, b)", json!({"a": "x", "b": "y"})), json!("y"));
    assert_eq!(eval("NOT(a)", json!({"a": ""})), json!(true));
}

#[test]
fn if_is_strict_about_true() {
    assert_eq!(eval(r#"IF(1, "x", "y")"#, json!({})), json!("y"));
    assert_eq!(eval(r#"IF(GT(a, 1), "big", "small")"#, json!({"a": 5})), json!("big"));
    assert_eq!(eval(r#"IF(a, "x", "y")"#, json!({"a": true})), json!("x"));
}

#[test]
fn ifs_picks_first_true_condition() {
    let expr = r#"IFS(LT(a, 0), "neg", EQUAL(a, 0), "zero", GT(a, 0), "pos")"#;
    assert_eq!(eval(expr, json!({"a": -3})), json!("neg"));
    assert_eq!(eval(expr, json!({"a": 0})), json!("zero"));
    assert_eq!(eval(expr, json!({"a": 2})), json!("pos"));
    assert_eq!(eval(r#"IFS(a, 1, b, 2)"#, json!({"a": 1, "b": "true"})), json!(null));
}

#[test]
fn null_checks() {
    assert_eq!(eval("NULL(a)", json!({"a": null})), json!(true));
    assert_eq!(eval("NULL(a)", json!({"a": 0})), json!(false));
    assert_eq!(eval("NULL(a)", json!({"a": ""})), json!(false));
    assert_eq!(eval("NULL(a)", json!({"a": {}})), json!(false));
    assert_eq!(eval("NULL(a)", json!({"a": []})), json!(false));
    assert_eq!(eval("NULL(a)", json!({})), json!(false));
    assert_eq!(eval("NOT_NULL(a)", json!({"a": 1})), json!(true));
}

#[test]
fn equality_is_strict() {
    assert_eq!(eval(r#"EQUAL(a, "1")"#, json!({"a": 1})), json!(false));
    assert_eq!(eval("EQUAL(a, 1)", json!({"a": 1})), json!(true));
    assert_eq!(eval(r#"NOT_EQUAL(a, "x")"#, json!({"a": "x"})), json!(false));
}

#[test]
fn numeric_literals_are_permissive() {
    assert_eq!(eval("42", json!({})), json!(42));
    assert_eq!(eval("1.5", json!({})), json!(1.5));
    assert_eq!(eval("12px", json!({})), json!(12));
}

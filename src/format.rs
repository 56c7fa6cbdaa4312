//! Number formatting helpers.

use itertools::Itertools;

/// Renders a number the way the formula runtime prints it: shortest
/// round-trip digits, exponent notation outside `[1e-6, 1e21)`.
pub fn number_to_string(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if n == 0.0 {
        return "0".to_string();
    }
    if (1e-6..1e21).contains(&n.abs()) {
        return format!("{n}");
    }
    let s = format!("{n:e}");
    match s.split_once('e') {
        Some((mantissa, exp)) if !exp.starts_with('-') => format!("{mantissa}e+{exp}"),
        _ => s,
    }
}

/// Fixed-point rendering with `digits` decimals. Ties round away from zero
/// on the exact binary value, so `2.5` becomes `"3"` and `1.005` (stored as
/// 1.00499...) becomes `"1.00"`.
pub fn to_fixed(x: f64, digits: f64) -> String {
    let digits = (if digits.is_nan() { 0.0 } else { digits.trunc().clamp(0.0, 100.0) }) as usize;
    if x.is_nan() {
        return "NaN".to_string();
    }
    if x.abs() >= 1e21 {
        return number_to_string(x);
    }
    let sign = if x < 0.0 { "-" } else { "" };
    format!("{sign}{}", round_half_up(x.abs(), digits))
}

fn round_half_up(x: f64, digits: usize) -> String {
    // 1074 fractional digits print any finite double exactly.
    round_decimal(&format!("{x:.1074}"), digits)
}

/// Half-up rounding of a plain non-negative decimal string to `digits`
/// fractional digits, padding with zeros.
fn round_decimal(decimal: &str, digits: usize) -> String {
    let (int_part, frac_part) = decimal.split_once('.').unwrap_or((decimal, ""));
    let mut kept: Vec<u8> = int_part
        .bytes()
        .chain(frac_part.bytes().chain(std::iter::repeat(b'0')).take(digits))
        .collect();
    let mut int_len = int_part.len();

    if frac_part.as_bytes().get(digits).is_some_and(|&b| b >= b'5') {
        let mut carry = true;
        for d in kept.iter_mut().rev() {
            if *d == b'9' {
                *d = b'0';
            } else {
                *d += 1;
                carry = false;
                break;
            }
        }
        if carry {
            kept.insert(0, b'1');
            int_len += 1;
        }
    }

    let (int_digits, frac_digits) = kept.split_at(int_len);
    let int_digits = String::from_utf8_lossy(int_digits);
    if frac_digits.is_empty() {
        int_digits.into_owned()
    } else {
        format!("{int_digits}.{}", String::from_utf8_lossy(frac_digits))
    }
}

/// Grouped-thousands rendering with at most three decimals, trailing zeros
/// dropped: `1000` -> `"1,000"`, `1234.5678` -> `"1,234.568"`.
///
/// Rounds the shortest round-trip digits rather than the exact binary
/// value, so `1.0005` becomes `"1.001"`.
pub fn currency(x: f64) -> String {
    if x.is_nan() {
        return "NaN".to_string();
    }
    let sign = if x.is_sign_negative() { "-" } else { "" };
    if x.is_infinite() {
        return format!("{sign}∞");
    }
    let abs = x.abs();
    // `Display` never switches to exponent notation.
    let fixed = round_decimal(&format!("{abs}"), 3);
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((&fixed, ""));
    let frac_part = frac_part.trim_end_matches('0');
    let grouped = group_thousands(int_part, ',');
    if frac_part.is_empty() {
        format!("{sign}{grouped}")
    } else {
        format!("{sign}{grouped}.{frac_part}")
    }
}

fn group_thousands(digits: &str, sep: char) -> String {
    let chars: Vec<char> = digits.chars().collect();
    let head = chars.len() % 3;
    let mut groups: Vec<String> = Vec::new();
    if head > 0 {
        groups.push(chars[..head].iter().collect());
    }
    groups.extend(chars[head..].chunks(3).map(|c| c.iter().collect::<String>()));
    groups.iter().join(&sep.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn prints_numbers_like_the_runtime() {
        assert_eq!(number_to_string(1.0), "1");
        assert_eq!(number_to_string(-0.0), "0");
        assert_eq!(number_to_string(0.1 + 0.2), "0.30000000000000004");
        assert_eq!(number_to_string(1e21), "1e+21");
        assert_eq!(number_to_string(1.5e-7), "1.5e-7");
        assert_eq!(number_to_string(0.000001), "0.000001");
        assert_eq!(number_to_string(f64::NEG_INFINITY), "-Infinity");
    }

    #[test]
    fn fixed_point() {
        assert_eq!(to_fixed(12.34567, 2.0), "12.35");
        assert_eq!(to_fixed(2.5, 0.0), "3");
        assert_eq!(to_fixed(1.005, 2.0), "1.00");
        assert_eq!(to_fixed(9.999, 2.0), "10.00");
        assert_eq!(to_fixed(-1.5, 1.0), "-1.5");
        assert_eq!(to_fixed(-0.0001, 2.0), "-0.00");
        assert_eq!(to_fixed(10.0, 3.0), "10.000");
    }

    #[test]
    fn currency_groups_thousands() {
        assert_eq!(currency(1000.0), "1,000");
        assert_eq!(currency(1234567.891), "1,234,567.891");
        assert_eq!(currency(1234.5678), "1,234.568");
        assert_eq!(currency(-999.0), "-999");
        assert_eq!(currency(12.0), "12");
        assert_eq!(currency(f64::NAN), "NaN");
        assert_eq!(currency(1e21), "1,000,000,000,000,000,000,000");
    }

    #[test]
    fn currency_rounds_shortest_digits() {
        assert_eq!(currency(1.0005), "1.001");
        assert_eq!(currency(2.0004999), "2");
        assert_eq!(currency(0.9995), "1");
        assert_eq!(to_fixed(1.0005, 3.0), "1.000");
    }
}

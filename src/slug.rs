use crate::value::Value;
use itertools::Itertools;

const ACCENTED: &str = "àáãảạăằắẳẵặâầấẩẫậèéẻẽẹêềếểễệđùúủũụưừứửữựòóỏõọôồốổỗộơờớởỡợìíỉĩịäëïîöüûñçýỳỹỵỷ";
const PLAIN: &str = "aaaaaaaaaaaaaaaaaeeeeeeeeeeeduuuuuuuuuuuoooooooooooooooooiiiiiaeiiouuncyyyyy";

/// Slug of a string value; anything that is not a string yields `""`.
pub fn to_slug(value: &Value) -> String {
    match value {
        Value::String(s) => slugify(s),
        _ => String::new(),
    }
}

/// Lowercases, strips accents, drops everything outside `[a-z0-9 -]` and
/// turns whitespace and hyphen runs into a single hyphen. Leading and
/// trailing hyphens are kept.
pub fn slugify(input: &str) -> String {
    input
        .trim()
        .to_lowercase()
        .chars()
        .map(unaccent)
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == ' ' || *c == '-')
        .map(|c| if c == ' ' { '-' } else { c })
        .dedup_by(|a, b| *a == '-' && *b == '-')
        .collect()
}

fn unaccent(c: char) -> char {
    ACCENTED
        .chars()
        .position(|a| a == c)
        .and_then(|i| PLAIN.chars().nth(i))
        .unwrap_or(c)
}

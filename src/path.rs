use crate::value::Value;

/// Walks a dot-separated path one segment at a time. Objects are indexed by
/// key and arrays by a decimal index; any other value, or a missing key,
/// ends the walk with `None`. A present `null` is `Some(&Value::Null)`.
pub fn find_value_by_path<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(root, |current, segment| match current {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}

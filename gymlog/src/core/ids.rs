//! Identifier assignment for sibling collections.

use std::collections::HashSet;

use serde_json::{Number, Value};

pub const WORKOUT_ID_PREFIX: &str = "workout";
pub const EXERCISE_ID_PREFIX: &str = "exercise";

/// Assign one identifier per incoming item, in order.
///
/// An incoming id is kept unless it is missing, empty, or already assigned to
/// an earlier item; those get `<prefix>-<counter>`. The counter starts at 1 per
/// call and skips values already in use, so the result never repeats.
pub fn ensure_unique_ids<I>(incoming: I, prefix: &str) -> Vec<String>
where
    I: IntoIterator<Item = Option<String>>,
{
    let mut used: HashSet<String> = HashSet::new();
    let mut counter: u64 = 1;
    incoming
        .into_iter()
        .map(|candidate| {
            let id = match candidate {
                Some(id) if !id.is_empty() && !used.contains(&id) => id,
                _ => next_synthetic(prefix, &mut counter, &used),
            };
            used.insert(id.clone());
            id
        })
        .collect()
}

fn next_synthetic(prefix: &str, counter: &mut u64, used: &HashSet<String>) -> String {
    loop {
        let candidate = format!("{prefix}-{counter}");
        *counter += 1;
        if !used.contains(&candidate) {
            return candidate;
        }
    }
}

/// Return `base` if unused in `existing`, otherwise `base-2`, `base-3`, ...
pub fn unique_against<'a, I>(base: &str, existing: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let taken: HashSet<&str> = existing.into_iter().collect();
    if !taken.contains(base) {
        return base.to_string();
    }
    (2u64..)
        .map(|n| format!("{base}-{n}"))
        .find(|candidate| !taken.contains(candidate.as_str()))
        .unwrap_or_else(|| base.to_string())
}

/// Read the `id` field of a raw record. Strings, numbers and booleans are
/// accepted; every other shape counts as missing.
pub fn raw_id(record: &Value) -> Option<String> {
    match record.get("id")? {
        Value::String(id) => Some(id.clone()),
        Value::Number(number) => Some(number_to_text(number)),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}

/// Render a JSON number the way it was typed: integral values carry no
/// fractional part (`100.0` -> `"100"`).
pub fn number_to_text(number: &Number) -> String {
    if let Some(int) = number.as_i64() {
        return int.to_string();
    }
    if let Some(uint) = number.as_u64() {
        return uint.to_string();
    }
    match number.as_f64() {
        Some(float) if float.fract() == 0.0 && float.abs() < 1e15 => format!("{float:.0}"),
        Some(float) => float.to_string(),
        None => number.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ids(items: &[Option<&str>]) -> Vec<String> {
        ensure_unique_ids(
            items.iter().map(|id| id.map(str::to_string)),
            WORKOUT_ID_PREFIX,
        )
    }

    #[test]
    fn keeps_distinct_ids() {
        assert_eq!(ids(&[Some("a"), Some("b")]), vec!["a", "b"]);
    }

    #[test]
    fn replaces_missing_empty_and_duplicate_ids() {
        assert_eq!(
            ids(&[None, Some("a"), Some(""), Some("a")]),
            vec!["workout-1", "a", "workout-2", "workout-3"]
        );
    }

    #[test]
    fn synthetic_ids_skip_values_already_assigned() {
        assert_eq!(
            ids(&[Some("workout-1"), None, Some("workout-2")]),
            vec!["workout-1", "workout-2", "workout-3"]
        );
    }

    #[test]
    fn unique_against_appends_suffix() {
        let existing = ["100", "100-2"];
        assert_eq!(unique_against("100", existing), "100-3");
        assert_eq!(unique_against("200", existing), "200");
    }

    #[test]
    fn raw_id_stringifies_scalars() {
        assert_eq!(raw_id(&json!({"id": 7})), Some("7".to_string()));
        assert_eq!(raw_id(&json!({"id": 7.0})), Some("7".to_string()));
        assert_eq!(raw_id(&json!({"id": 1.5})), Some("1.5".to_string()));
        assert_eq!(raw_id(&json!({"id": "x"})), Some("x".to_string()));
        assert_eq!(raw_id(&json!({"id": {"nested": true}})), None);
        assert_eq!(raw_id(&json!(null)), None);
    }
}

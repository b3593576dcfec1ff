//! Shallow merge helpers for configuration fragments.
//!
//! Responsibilities:
//! - Fold ordered fragments into one mapping with last-write-wins precedence.
//! - Remove keys named by another mapping.
//!
//! Invariants:
//! - Only top-level keys are considered; nested objects are replaced, not merged.
//! - Inputs are never mutated.
//! - An overwritten key keeps the position of its first insertion.

use std::borrow::Borrow;

use crate::loader::Fragment;

/// Fold `dicts` into a single fragment. Later entries win for identical keys.
///
/// Iteration order is the precedence order, so pass layers from lowest to
/// highest priority.
pub fn join_dicts<I>(dicts: I) -> Fragment
where
    I: IntoIterator,
    I::Item: Borrow<Fragment>,
{
    let mut result = Fragment::new();
    for dict in dicts {
        for (key, value) in dict.borrow() {
            result.insert(key.clone(), value.clone());
        }
    }
    result
}

/// Return the entries of `orig` whose keys do not appear in `subtract`.
pub fn subtract_dicts(orig: &Fragment, subtract: &Fragment) -> Fragment {
    orig.iter()
        .filter(|(key, _)| !subtract.contains_key(key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fragment(value: serde_json::Value) -> Fragment {
        match value {
            serde_json::Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn test_join_dicts_later_wins() {
        let merged = join_dicts([fragment(json!({"a": 1})), fragment(json!({"a": 2, "b": 3}))]);
        assert_eq!(merged, fragment(json!({"a": 2, "b": 3})));
    }

    #[test]
    fn test_join_dicts_is_shallow() {
        let base = fragment(json!({"db": {"host": "localhost", "port": 5432}}));
        let over = fragment(json!({"db": {"host": "prod"}}));
        let merged = join_dicts([&base, &over]);
        assert_eq!(merged["db"], json!({"host": "prod"}));
    }

    #[test]
    fn test_join_dicts_keeps_first_insertion_position() {
        let merged = join_dicts([
            fragment(json!({"first": 1, "second": 2})),
            fragment(json!({"third": 3, "first": 10})),
        ]);
        let keys: Vec<&str> = merged.keys().map(String::as_str).collect();
        assert_eq!(keys, ["first", "second", "third"]);
        assert_eq!(merged["first"], json!(10));
    }

    #[test]
    fn test_join_dicts_empty_input() {
        let merged = join_dicts(Vec::<Fragment>::new());
        assert!(merged.is_empty());
    }

    #[test]
    fn test_join_dicts_does_not_mutate_inputs() {
        let base = fragment(json!({"a": 1}));
        let over = fragment(json!({"a": 2}));
        let _ = join_dicts([&base, &over]);
        assert_eq!(base["a"], json!(1));
    }

    #[test]
    fn test_subtract_dicts_removes_shared_keys() {
        let orig = fragment(json!({"a": 1, "b": 2}));
        let result = subtract_dicts(&orig, &fragment(json!({"b": 0})));
        assert_eq!(result, fragment(json!({"a": 1})));
        assert_eq!(orig.len(), 2);
    }

    #[test]
    fn test_subtract_dicts_does_not_recurse() {
        let orig = fragment(json!({"db": {"host": "x", "port": 1}, "debug": true}));
        let result = subtract_dicts(&orig, &fragment(json!({"db": {"host": null}})));
        assert_eq!(result, fragment(json!({"debug": true})));
    }
}

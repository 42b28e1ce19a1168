//! Deep merge over configuration trees
//!
//! A configuration tree is an ordered JSON object. Merging walks the keys the
//! override tree actually contains and resolves each pair of values by shape:
//!
//! - two sequences are unioned or replaced, depending on the array policy
//! - two nested trees are merged recursively with the same policy
//! - anything else is replaced verbatim by the override, including `null`
//!
//! An override of `null` clears the previous value. Omitting a key leaves the
//! target value as it was.

use serde_json::{Map, Value};

/// Recursively nested settings tree
pub type Tree = Map<String, Value>;

/// Merge `overrides` on top of `target`, returning a new tree.
///
/// Neither input is modified. With `merge_arrays` set, sequences present on
/// both sides are unioned (override elements first, then the remaining
/// target elements, duplicates dropped); otherwise the override sequence
/// replaces the target one.
pub fn merge_trees(target: &Tree, overrides: &Tree, merge_arrays: bool) -> Tree {
    let mut result = target.clone();

    for (key, override_value) in overrides {
        let merged = match result.get(key) {
            Some(existing) => merge_values(existing, override_value, merge_arrays),
            None => override_value.clone(),
        };
        result.insert(key.clone(), merged);
    }

    result
}

/// Merge two values of a tree slot.
///
/// Non-structural pairs and shape mismatches (a sequence against a tree, a
/// primitive against anything) resolve to a copy of `overrides`.
pub fn merge_values(target: &Value, overrides: &Value, merge_arrays: bool) -> Value {
    match (target, overrides) {
        (Value::Array(base), Value::Array(over)) => {
            if merge_arrays {
                Value::Array(union_sequences(over, base))
            } else {
                Value::Array(over.clone())
            }
        }
        (Value::Object(base), Value::Object(over)) => {
            Value::Object(merge_trees(base, over, merge_arrays))
        }
        (_, over) => over.clone(),
    }
}

/// Concatenate `first` and `second`, keeping only the first occurrence of
/// every structurally equal element.
fn union_sequences(first: &[Value], second: &[Value]) -> Vec<Value> {
    let mut out: Vec<Value> = Vec::with_capacity(first.len() + second.len());
    for value in first.iter().chain(second) {
        if !out.contains(value) {
            out.push(value.clone());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn tree(value: Value) -> Tree {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn test_empty_override_is_identity() {
        let base = tree(json!({
            "linter": { "enabled": true, "ignore": ["a", "b"] },
            "vcs": { "clientKind": "git" }
        }));

        let merged = merge_trees(&base, &Tree::new(), true);
        assert_eq!(merged, base);
    }

    #[test]
    fn test_result_does_not_share_structure_with_input() {
        let base = tree(json!({ "files": { "ignore": ["a"] } }));

        let mut merged = merge_trees(&base, &Tree::new(), true);
        merged["files"]["ignore"]
            .as_array_mut()
            .unwrap()
            .push(json!("b"));
        merged.insert("extra".to_string(), json!(1));

        assert_eq!(base, tree(json!({ "files": { "ignore": ["a"] } })));
    }

    #[test]
    fn test_inputs_are_not_mutated() {
        let base = tree(json!({ "a": { "b": [1] } }));
        let over = tree(json!({ "a": { "b": [2], "c": true } }));
        let base_before = base.clone();
        let over_before = over.clone();

        let _ = merge_trees(&base, &over, true);

        assert_eq!(base, base_before);
        assert_eq!(over, over_before);
    }

    #[test]
    fn test_disjoint_keys_are_unioned() {
        let a = tree(json!({ "vcs": { "enabled": false }, "x": 1 }));
        let b = tree(json!({ "files": { "ignore": [] }, "y": "two" }));

        let merged = merge_trees(&a, &b, true);

        assert_eq!(merged.len(), 4);
        assert_eq!(merged["vcs"], json!({ "enabled": false }));
        assert_eq!(merged["x"], json!(1));
        assert_eq!(merged["files"], json!({ "ignore": [] }));
        assert_eq!(merged["y"], json!("two"));
    }

    #[test]
    fn test_array_union_deduplicates() {
        let base = tree(json!({ "ignore": ["x", "y"] }));
        let over = tree(json!({ "ignore": ["y", "z"] }));

        let merged = merge_trees(&base, &over, true);
        let ignore = merged["ignore"].as_array().unwrap();

        assert_eq!(ignore.len(), 3);
        for item in ["x", "y", "z"] {
            assert_eq!(ignore.iter().filter(|v| *v == item).count(), 1);
        }
        // override elements lead, remaining base elements follow
        assert_eq!(merged["ignore"], json!(["y", "z", "x"]));
    }

    #[test]
    fn test_array_replace_when_policy_disabled() {
        let base = tree(json!({ "ignore": ["x", "y"] }));
        let over = tree(json!({ "ignore": ["y", "z"] }));

        let merged = merge_trees(&base, &over, false);
        assert_eq!(merged["ignore"], json!(["y", "z"]));
    }

    #[test]
    fn test_array_policy_applies_to_nested_levels() {
        let base = tree(json!({ "linter": { "ignore": ["a"] } }));
        let over = tree(json!({ "linter": { "ignore": ["b"] } }));

        assert_eq!(
            merge_trees(&base, &over, true)["linter"]["ignore"],
            json!(["b", "a"])
        );
        assert_eq!(
            merge_trees(&base, &over, false)["linter"]["ignore"],
            json!(["b"])
        );
    }

    #[test]
    fn test_deep_merge_keeps_siblings() {
        let base = tree(json!({
            "formatter": { "enabled": true, "indentWidth": 2, "lineWidth": 80 }
        }));
        let over = tree(json!({ "formatter": { "lineWidth": 120 } }));

        let merged = merge_trees(&base, &over, true);
        assert_eq!(
            merged["formatter"],
            json!({ "enabled": true, "indentWidth": 2, "lineWidth": 120 })
        );
    }

    #[test]
    fn test_explicit_null_clears_value() {
        let base = tree(json!({ "formatter": { "lineWidth": 80, "enabled": true } }));
        let over = tree(json!({ "formatter": { "lineWidth": null } }));

        let merged = merge_trees(&base, &over, true);
        assert_eq!(merged["formatter"]["lineWidth"], Value::Null);
        assert_eq!(merged["formatter"]["enabled"], json!(true));
    }

    #[test]
    fn test_shape_mismatch_replaces_verbatim() {
        let base = tree(json!({ "a": ["x"], "b": { "c": 1 }, "d": 3 }));
        let over = tree(json!({ "a": { "k": true }, "b": ["y"], "d": { "e": 4 } }));

        let merged = merge_trees(&base, &over, true);
        assert_eq!(merged["a"], json!({ "k": true }));
        assert_eq!(merged["b"], json!(["y"]));
        assert_eq!(merged["d"], json!({ "e": 4 }));
    }

    #[test]
    fn test_union_deduplicates_structured_elements() {
        let base = tree(json!({ "overrides": [{ "include": ["a"] }] }));
        let over = tree(json!({ "overrides": [{ "include": ["a"] }, { "include": ["b"] }] }));

        let merged = merge_trees(&base, &over, true);
        assert_eq!(
            merged["overrides"],
            json!([{ "include": ["a"] }, { "include": ["b"] }])
        );
    }

    #[test]
    fn test_missing_key_in_target_is_inserted() {
        let base = Tree::new();
        let over = tree(json!({ "organizeImports": { "enabled": false } }));

        let merged = merge_trees(&base, &over, false);
        assert_eq!(merged, over);
    }
}

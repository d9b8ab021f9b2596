//! Property tests for the diff engine.
//!
//! Generated documents contain no literal `null` values: the wire
//! format reserves `null` as the removal tombstone, so a field set to
//! `null` is outside the reconstructible domain by design.

use modelcast::{apply_patch, diff};
use proptest::prelude::*;
use serde_json::{json, Map, Value};

fn json_leaf() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(|n| json!(n)),
        (-1.0e9f64..1.0e9).prop_map(|f| json!(f)),
        "[a-z0-9 ]{0,12}".prop_map(Value::String),
    ]
}

fn json_value() -> impl Strategy<Value = Value> {
    json_leaf().prop_recursive(4, 48, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Value::Array),
            prop::collection::btree_map("[a-z]{1,4}", inner, 0..6)
                .prop_map(|map| Value::Object(map.into_iter().collect::<Map<_, _>>())),
        ]
    })
}

fn json_object() -> impl Strategy<Value = Value> {
    prop::collection::btree_map("[a-z]{1,4}", json_value(), 0..8)
        .prop_map(|map| Value::Object(map.into_iter().collect::<Map<_, _>>()))
}

proptest! {
    /// Applying `diff(a, b)` to `a` reconstructs `b` exactly.
    #[test]
    fn diff_then_apply_reconstructs_target(base in json_object(), target in json_object()) {
        let patch = diff(&base, &target);

        let mut doc = base;
        apply_patch(&mut doc, &patch);
        prop_assert_eq!(doc, target);
    }

    /// A snapshot diffed against itself is the empty patch.
    #[test]
    fn self_diff_is_empty(doc in json_object()) {
        prop_assert_eq!(diff(&doc, &doc), json!({}));
    }

    /// Diffing never mutates its inputs.
    #[test]
    fn diff_is_side_effect_free(base in json_object(), target in json_object()) {
        let base_before = base.clone();
        let target_before = target.clone();

        let _ = diff(&base, &target);
        prop_assert_eq!(base, base_before);
        prop_assert_eq!(target, target_before);
    }
}

//! Structural diffing between model snapshots.
//!
//! Patches use merge-patch semantics: changed and added object keys
//! appear with their new value, removed keys appear as explicit `null`
//! tombstones, unchanged keys are omitted, and arrays are replaced
//! wholesale rather than diffed element-wise. One consequence of the
//! tombstone convention: a field legitimately set to `null` is
//! indistinguishable from a removed field on the wire.

use serde_json::{Map, Value};

/// Compute the patch document that turns `base` into `target`.
///
/// Deterministic and side-effect-free; neither input is mutated.
/// Structurally identical inputs yield an empty object, which is still
/// a sendable patch (the protocol does not special-case it).
pub fn diff(base: &Value, target: &Value) -> Value {
    diff_value(base, target).unwrap_or_else(|| Value::Object(Map::new()))
}

/// Recursive comparison; `None` means the node is unchanged and is
/// omitted from the enclosing patch.
fn diff_value(base: &Value, target: &Value) -> Option<Value> {
    match (base, target) {
        (Value::Object(base_map), Value::Object(target_map)) => {
            let mut patch = Map::new();

            for (key, target_value) in target_map {
                match base_map.get(key) {
                    Some(base_value) => {
                        if let Some(changed) = diff_value(base_value, target_value) {
                            patch.insert(key.clone(), changed);
                        }
                    }
                    None => {
                        patch.insert(key.clone(), target_value.clone());
                    }
                }
            }

            // Tombstones for keys that disappeared.
            for key in base_map.keys() {
                if !target_map.contains_key(key) {
                    patch.insert(key.clone(), Value::Null);
                }
            }

            if patch.is_empty() {
                None
            } else {
                Some(Value::Object(patch))
            }
        }

        // Arrays are atomic: any difference replaces the whole array.
        // Scalars and type changes take the target verbatim.
        _ => {
            if base == target {
                None
            } else {
                Some(target.clone())
            }
        }
    }
}

/// Apply a patch produced by [`diff`] to a base document.
///
/// Object keys merge recursively, `null` values remove the key, and
/// non-object values (including arrays) replace the base value
/// wholesale. Clients use this to maintain their local model copy from
/// patch-mode updates.
pub fn apply_patch(base: &mut Value, patch: &Value) {
    match (base, patch) {
        (Value::Object(base_map), Value::Object(patch_map)) => {
            for (key, patch_value) in patch_map {
                if patch_value.is_null() {
                    base_map.remove(key);
                    continue;
                }
                match base_map.get_mut(key) {
                    Some(existing) if existing.is_object() && patch_value.is_object() => {
                        apply_patch(existing, patch_value);
                    }
                    _ => {
                        base_map.insert(key.clone(), patch_value.clone());
                    }
                }
            }
        }
        (base, patch) => *base = patch.clone(),
    }
}

//! Layered configuration merge

use serde_json::{Map, Value};

/// Merge a sequence of flat configuration layers, right-biased: when two
/// layers carry the same key, the later layer wins. The merge is shallow;
/// nested objects are replaced wholesale, not merged recursively.
pub fn merge_layers(layers: &[Map<String, Value>]) -> Map<String, Value> {
    let mut merged = Map::new();
    for layer in layers {
        for (key, value) in layer {
            merged.insert(key.clone(), value.clone());
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn layer(pairs: &[(&str, Value)]) -> Map<String, Value> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
    }

    #[test]
    fn test_empty_slice_merges_to_empty() {
        assert!(merge_layers(&[]).is_empty());
    }

    #[test]
    fn test_single_layer_passes_through() {
        let a = layer(&[("lr", json!(0.1)), ("momentum", json!(0.9))]);
        assert_eq!(merge_layers(std::slice::from_ref(&a)), a);
    }

    #[test]
    fn test_later_layer_wins() {
        let defaults = layer(&[("lr", json!(0.01)), ("momentum", json!(0.0))]);
        let overrides = layer(&[("lr", json!(0.1))]);
        let merged = merge_layers(&[defaults, overrides]);
        assert_eq!(merged["lr"], json!(0.1));
        assert_eq!(merged["momentum"], json!(0.0));
    }

    #[test]
    fn test_disjoint_layers_union() {
        let a = layer(&[("lr", json!(0.01))]);
        let b = layer(&[("gamma", json!(0.5))]);
        let merged = merge_layers(&[a, b]);
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn test_nested_objects_replace_not_merge() {
        let a = layer(&[("opts", json!({"x": 1, "y": 2}))]);
        let b = layer(&[("opts", json!({"x": 3}))]);
        let merged = merge_layers(&[a, b]);
        assert_eq!(merged["opts"], json!({"x": 3}));
    }

    fn arb_layer() -> impl Strategy<Value = Map<String, Value>> {
        proptest::collection::btree_map("[a-e]", any::<i64>(), 0..5).prop_map(|m| {
            m.into_iter().map(|(k, v)| (k, json!(v))).collect()
        })
    }

    proptest! {
        #[test]
        fn prop_last_layer_with_key_wins(layers in proptest::collection::vec(arb_layer(), 0..6)) {
            let merged = merge_layers(&layers);
            for (key, value) in &merged {
                let last = layers.iter().rev().find_map(|l| l.get(key));
                prop_assert_eq!(Some(value), last);
            }
            // No keys appear out of thin air
            for key in merged.keys() {
                prop_assert!(layers.iter().any(|l| l.contains_key(key)));
            }
        }

        #[test]
        fn prop_merge_associative_over_splits(
            layers in proptest::collection::vec(arb_layer(), 1..6),
            split in 0usize..6,
        ) {
            let split = split.min(layers.len());
            let (left, right) = layers.split_at(split);
            let two_pass = merge_layers(&[merge_layers(left), merge_layers(right)]);
            prop_assert_eq!(two_pass, merge_layers(&layers));
        }
    }
}

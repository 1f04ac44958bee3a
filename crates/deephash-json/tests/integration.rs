use std::collections::BTreeMap;

use chrono::{TimeZone, Utc};
use deephash::{Encoding, HashConfig, HashError, Hasher, Sha256Digest};
use deephash_json::{hash_json, hash_json_with, hash_serialize};
use serde::Serialize;
use serde_json::json;

fn make_document() -> serde_json::Value {
    json!({
        "string_var": "test string",
        "int_var": 123,
        "map_var": { "1": "one", "2": "two" },
        "list_var": [
            { "s": "aaaaa", "m": { "4333": "asdf" } },
            { "s": "bbbbbbb", "m": { "555": "ddd" } }
        ],
        "nothing": null
    })
}

#[derive(Serialize)]
struct Event {
    kind: String,
    attempts: u32,
    labels: BTreeMap<String, String>,
    #[serde(skip)]
    cache_hits: u64,
}

fn make_event(cache_hits: u64) -> Event {
    Event {
        kind: "deploy".into(),
        attempts: 2,
        labels: BTreeMap::from([("env".into(), "prod".into())]),
        cache_hits,
    }
}

#[test]
fn test_document_hash_is_stable() {
    let doc = make_document();
    let first = hash_json(&doc).unwrap();
    for _ in 0..10 {
        assert_eq!(hash_json(&doc).unwrap(), first);
    }
    assert_eq!(first.as_str().len(), 64);
}

#[test]
fn test_array_order_is_ignored() {
    let mut doc = make_document();
    let before = hash_json(&doc).unwrap();
    doc["list_var"].as_array_mut().unwrap().reverse();
    assert_eq!(hash_json(&doc).unwrap(), before);
}

#[test]
fn test_nested_leaf_change_is_detected() {
    let mut doc = make_document();
    let before = hash_json(&doc).unwrap();
    doc["list_var"][0]["m"]["4333"] = json!("asdg");
    assert_ne!(hash_json(&doc).unwrap(), before);
}

#[test]
fn test_null_members_contribute_their_key() {
    let with_null = json!({ "a": 1, "b": null });
    let without = json!({ "a": 1 });
    assert_ne!(hash_json(&with_null).unwrap(), hash_json(&without).unwrap());
}

#[test]
fn test_serialize_matches_equivalent_json() {
    let event = make_event(0);
    let doc = json!({
        "labels": { "env": "prod" },
        "attempts": 2,
        "kind": "deploy"
    });
    assert_eq!(hash_serialize(&event).unwrap(), hash_json(&doc).unwrap());
}

#[test]
fn test_skipped_fields_do_not_contribute() {
    assert_eq!(
        hash_serialize(&make_event(1)).unwrap(),
        hash_serialize(&make_event(9999)).unwrap()
    );
}

#[test]
fn test_non_string_map_keys_fail_introspection() {
    let mut bad = BTreeMap::new();
    bad.insert(vec![1u8], "v");
    let err = hash_serialize(&bad).unwrap_err();
    assert!(matches!(err, HashError::Introspection(_)));
}

#[test]
fn test_framed_encoding_changes_digest() {
    let doc = make_document();
    let framed = Hasher::<Sha256Digest>::with_config(HashConfig {
        encoding: Encoding::Framed,
        ..HashConfig::default()
    })
    .unwrap();
    assert_ne!(
        hash_json_with(&framed, &doc).unwrap(),
        hash_json(&doc).unwrap()
    );
}

#[test]
fn test_serialized_timestamp_hashes_as_its_text() {
    let ts = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    assert_eq!(
        hash_serialize(&ts).unwrap(),
        hash_json(&json!("2024-01-01T00:00:00Z")).unwrap()
    );
}

mod properties {
    use deephash_json::hash_json;
    use proptest::prelude::*;
    use serde_json::Value;

    proptest! {
        #[test]
        fn array_shuffle_keeps_digest(
            (original, shuffled) in prop::collection::vec("[a-z0-9]{0,8}", 0..10)
                .prop_flat_map(|v| (Just(v.clone()), Just(v).prop_shuffle()))
        ) {
            let a = Value::Array(original.into_iter().map(Value::String).collect());
            let b = Value::Array(shuffled.into_iter().map(Value::String).collect());
            prop_assert_eq!(hash_json(&a).unwrap(), hash_json(&b).unwrap());
        }
    }
}

use super::*;
use serde_json::json;

fn snapshot(value: Value) -> Snapshot {
    Snapshot::try_from(value).unwrap()
}
fn object(value: Value) -> Object {
    match value {
        Value::Object(object) => object,
        _ => unreachable!(),
    }
}

#[test]
fn new_is_empty() {
    let s = Snapshot::new();
    assert!(s.is_empty());
    assert_eq!(s.len(), 0);
    assert_eq!(s.get("user"), None);
}

#[test]
fn get() {
    let s = snapshot(json!({"user": {"name": "ada"}}));
    assert_eq!(s.get("user"), Some(&json!({"name": "ada"})));
    assert_eq!(s.get("cart"), None);
    assert_eq!(s.len(), 1);
}

#[test]
fn merged_overrides_and_keeps() {
    let s = snapshot(json!({"user": {"name": "ada"}, "cart": {"items": 2}}));
    let next = s.merged(&object(json!({"cart": {"items": 3}})));
    assert_eq!(next.get("cart"), Some(&json!({"items": 3})));
    assert_eq!(next.get("user"), Some(&json!({"name": "ada"})));
}

#[test]
fn merged_leaves_original_untouched() {
    let s = snapshot(json!({"n": 1}));
    let _next = s.merged(&object(json!({"n": 2})));
    assert_eq!(s.get("n"), Some(&json!(1)));
}

#[test]
fn merged_in_updates_nested_keys() {
    let s = snapshot(json!({"user": {"name": "ada", "age": 36}}));
    let next = s.merged_in("user", &object(json!({"age": 37})));
    assert_eq!(next.get("user"), Some(&json!({"name": "ada", "age": 37})));
}

#[test]
fn merged_in_creates_missing_namespace() {
    let s = Snapshot::new();
    let next = s.merged_in("user", &object(json!({"name": "ada"})));
    assert_eq!(next.get("user"), Some(&json!({"name": "ada"})));
}

#[test]
fn merged_in_replaces_non_object_namespace() {
    let s = snapshot(json!({"user": 42}));
    let next = s.merged_in("user", &object(json!({"name": "ada"})));
    assert_eq!(next.get("user"), Some(&json!({"name": "ada"})));
}

#[test]
fn ptr_eq_distinguishes_handles_from_contents() {
    let a = snapshot(json!({"n": 1}));
    let b = a.clone();
    let c = snapshot(json!({"n": 1}));
    assert!(Snapshot::ptr_eq(&a, &b));
    assert!(!Snapshot::ptr_eq(&a, &c));
    assert_eq!(a, c);
}

#[test]
fn try_from_rejects_non_objects() {
    assert_eq!(
        Snapshot::try_from(json!([1, 2])),
        Err(SnapshotError::NotAnObject)
    );
    assert_eq!(
        SnapshotError::NotAnObject.to_string(),
        "snapshot value is not an object"
    );
}

#[test]
fn namespace_is_empty() {
    let s = snapshot(json!({"user": {"name": "ada"}, "cart": {}, "count": 3}));
    assert!(!s.namespace_is_empty("user"));
    assert!(s.namespace_is_empty("cart"));
    assert!(s.namespace_is_empty("count"));
    assert!(s.namespace_is_empty("missing"));
}

#[test]
fn from_iter() {
    let s: Snapshot = [("n".to_string(), json!(1))].into_iter().collect();
    assert_eq!(s.get("n"), Some(&json!(1)));
}

#[test]
fn serde_roundtrip() {
    let s = snapshot(json!({"user": {"name": "ada"}}));
    let text = serde_json::to_string(&s).unwrap();
    let back: Snapshot = serde_json::from_str(&text).unwrap();
    assert_eq!(back, s);
}

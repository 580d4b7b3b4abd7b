//! Response envelope normalization.
//!
//! The API is inconsistent about wrapping results: some endpoints answer
//! `{"data": ...}`, some answer the bare object, and a few nest `data` twice.
//! All unwrapping lives here so callers never guess at the shape.

use serde_json::Value;

/// `payload.data` when present and non-null, otherwise the payload itself.
pub fn unwrap_data(payload: &Value) -> &Value {
  match payload.get("data") {
    Some(data) if !data.is_null() => data,
    _ => payload,
  }
}

/// Follow `path` field by field from `payload`.
pub fn at_path<'a>(payload: &'a Value, path: &[&str]) -> Option<&'a Value> {
  path
    .iter()
    .try_fold(payload, |value, field| value.get(*field))
    .filter(|value| !value.is_null())
}

/// The first of `paths` that resolves to a non-null value.
pub fn first_present<'a>(payload: &'a Value, paths: &[&[&str]]) -> Option<&'a Value> {
  paths.iter().find_map(|path| at_path(payload, path))
}

/// Elements of an array, or values of an object in key order.
///
/// Prayer schedules come back either way depending on the period requested.
pub fn collection_items(value: &Value) -> Vec<&Value> {
  match value {
    Value::Array(items) => items.iter().collect(),
    Value::Object(map) => map.values().collect(),
    _ => Vec::new(),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  #[test]
  fn test_unwrap_data_envelope() {
    let payload = json!({"status": true, "data": {"id": 1}});
    assert_eq!(unwrap_data(&payload), &json!({"id": 1}));
  }

  #[test]
  fn test_unwrap_data_bare_payload() {
    let payload = json!({"id": 1});
    assert_eq!(unwrap_data(&payload), &payload);
  }

  #[test]
  fn test_unwrap_data_null_falls_back() {
    let payload = json!({"data": null, "id": 1});
    assert_eq!(unwrap_data(&payload), &payload);
  }

  #[test]
  fn test_unwrap_data_keeps_falsy_values() {
    // Only absence or null falls back; empty collections are real answers
    let payload = json!({"data": []});
    assert_eq!(unwrap_data(&payload), &json!([]));
  }

  #[test]
  fn test_first_present_walks_alternatives() {
    let paths: &[&[&str]] = &[&["data", "jadwal"], &["data", "data", "jadwal"], &["jadwal"]];

    let single = json!({"data": {"jadwal": {"a": 1}}});
    let double = json!({"data": {"data": {"jadwal": {"b": 2}}}});
    let bare = json!({"jadwal": {"c": 3}});
    let none = json!({"data": {"other": 1}});

    assert_eq!(first_present(&single, paths), Some(&json!({"a": 1})));
    assert_eq!(first_present(&double, paths), Some(&json!({"b": 2})));
    assert_eq!(first_present(&bare, paths), Some(&json!({"c": 3})));
    assert_eq!(first_present(&none, paths), None);
  }

  #[test]
  fn test_at_path_skips_null() {
    let payload = json!({"data": {"hadis": null}});
    assert_eq!(at_path(&payload, &["data", "hadis"]), None);
    assert_eq!(at_path(&payload, &[]), Some(&payload));
  }

  #[test]
  fn test_collection_items() {
    assert_eq!(collection_items(&json!([1, 2])).len(), 2);
    assert_eq!(
      collection_items(&json!({"2024-01-01": 1, "2024-01-02": 2})),
      vec![&json!(1), &json!(2)]
    );
    assert!(collection_items(&json!("x")).is_empty());
  }
}

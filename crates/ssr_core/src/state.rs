//! Hydration payloads.
//!
//! Server-computed store state crosses to the client as a JSON string that
//! itself contains JSON: `to_string(to_string(state))`. The outer literal can
//! be dropped straight into `JSON.parse(...)` in the page, and the client
//! mirrors the encoding with two parses.

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use crate::error::{Result, SsrCoreError};

/// State keys starting with this prefix hold memoized, non-reactive data and
/// are never sent to the client.
pub const MEMO_KEY_PREFIX: &str = "$";

/// Encode store state for hydration.
///
/// Memo keys are stripped at every depth. Absent optional values are written
/// as explicit `null` so the client sees the same shape the server computed.
pub fn encode_state<T: Serialize>(state: &T) -> Result<String> {
    let value =
        serde_json::to_value(state).map_err(|e| SsrCoreError::Serialization(e.to_string()))?;
    let inner = serde_json::to_string(&strip_memo_keys(value))
        .map_err(|e| SsrCoreError::Serialization(e.to_string()))?;
    serde_json::to_string(&inner).map_err(|e| SsrCoreError::Serialization(e.to_string()))
}

/// Encode store state, rejecting payloads larger than `max_size` bytes.
pub fn encode_state_limited<T: Serialize>(state: &T, max_size: usize) -> Result<String> {
    let payload = encode_state(state)?;
    if payload.len() > max_size {
        return Err(SsrCoreError::PayloadTooLarge {
            size: payload.len(),
            max: max_size,
        });
    }
    Ok(payload)
}

/// Decode a hydration payload produced by [`encode_state`].
pub fn decode_state<T: DeserializeOwned>(payload: &str) -> Result<T> {
    let inner: String = serde_json::from_str(payload)
        .map_err(|e| SsrCoreError::Deserialization(e.to_string()))?;
    serde_json::from_str(&inner).map_err(|e| SsrCoreError::Deserialization(e.to_string()))
}

fn strip_memo_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .filter(|(key, _)| !key.starts_with(MEMO_KEY_PREFIX))
                .map(|(key, value)| (key, strip_memo_keys(value)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(strip_memo_keys).collect()),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_payload_is_json_string_of_json() {
        let payload = encode_state(&json!({"count": 1})).unwrap();
        assert_eq!(payload, r#""{\"count\":1}""#);

        let once: String = serde_json::from_str(&payload).unwrap();
        assert_eq!(once, r#"{"count":1}"#);
    }

    #[test]
    fn test_decode_mirrors_encode() {
        let state = json!({
            "count": 3,
            "cart": { "1": { "items": ["a", "b"], "note": "say \"hi\"" } }
        });
        let payload = encode_state(&state).unwrap();
        let decoded: Value = decode_state(&payload).unwrap();
        assert_eq!(decoded, state);
    }

    #[test]
    fn test_memo_keys_stripped_at_every_depth() {
        let state = json!({
            "$cache": { "big": true },
            "cart": {
                "$lookup": 1,
                "items": [{ "$derived": 2, "id": 7 }]
            }
        });
        let decoded: Value = decode_state(&encode_state(&state).unwrap()).unwrap();
        assert_eq!(decoded, json!({ "cart": { "items": [{ "id": 7 }] } }));
    }

    #[test]
    fn test_absent_values_become_null() {
        #[derive(Serialize)]
        struct Product {
            id: u32,
            discount: Option<u32>,
        }

        let payload = encode_state(&Product {
            id: 1,
            discount: None,
        })
        .unwrap();
        let decoded: Value = decode_state(&payload).unwrap();
        assert_eq!(decoded, json!({ "id": 1, "discount": null }));
    }

    #[test]
    fn test_decode_into_typed_state() {
        #[derive(Debug, Deserialize, PartialEq)]
        struct Root {
            count: u32,
        }

        let payload = encode_state(&json!({"count": 9})).unwrap();
        let root: Root = decode_state(&payload).unwrap();
        assert_eq!(root, Root { count: 9 });
    }

    #[test]
    fn test_decode_rejects_single_encoding() {
        let result: Result<Value> = decode_state(r#"{"count":1}"#);
        assert!(matches!(result, Err(SsrCoreError::Deserialization(_))));
    }

    #[test]
    fn test_encode_limited_rejects_large_payload() {
        let state = json!({ "blob": "x".repeat(64) });
        let result = encode_state_limited(&state, 32);
        assert!(matches!(result, Err(SsrCoreError::PayloadTooLarge { .. })));
        assert!(encode_state_limited(&state, 1024).is_ok());
    }
}

//! Cursor encoding and decoding

use crate::error::{Error, Result};
use crate::types::{JsonObject, JsonValue, PaginationKey};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde_json::json;

/// Schema version embedded in every token
pub const CURSOR_VERSION: u64 = 1;

/// Decoded cursor: the key value of a boundary row
#[derive(Debug, Clone, PartialEq)]
pub struct Cursor {
    /// Pagination key the value belongs to
    pub key: PaginationKey,
    /// Key value of the boundary row
    pub value: JsonValue,
}

impl Cursor {
    /// Create a cursor for a key value
    pub fn new(key: impl Into<PaginationKey>, value: impl Into<JsonValue>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Encode as an opaque token
    pub fn encode(&self) -> Result<String> {
        encode_cursor(self)
    }

    /// Decode an opaque token
    pub fn decode(token: &str) -> Result<Self> {
        decode_cursor(token)
    }

    /// The `{ key: value }` payload
    pub fn payload(&self) -> JsonObject {
        let mut map = JsonObject::new();
        map.insert(self.key.as_str().to_string(), self.value.clone());
        map
    }
}

/// Encode a cursor as base64 of `{"v":1,"k":{key:value}}`
pub fn encode_cursor(cursor: &Cursor) -> Result<String> {
    if !is_scalar(&cursor.value) {
        return Err(Error::UnsupportedKeyValue {
            field: cursor.key.to_string(),
        });
    }

    let document = json!({
        "v": CURSOR_VERSION,
        "k": cursor.payload(),
    });
    let bytes = serde_json::to_vec(&document)?;
    Ok(STANDARD.encode(bytes))
}

/// Decode a token produced by [`encode_cursor`]
pub fn decode_cursor(token: &str) -> Result<Cursor> {
    let bytes = STANDARD
        .decode(token.trim())
        .map_err(|e| Error::invalid_cursor(format!("not valid base64: {e}")))?;

    let document: JsonValue = serde_json::from_slice(&bytes)
        .map_err(|e| Error::invalid_cursor(format!("not valid JSON: {e}")))?;

    let JsonValue::Object(mut document) = document else {
        return Err(Error::invalid_cursor("payload is not an object"));
    };

    let version = document
        .get("v")
        .and_then(JsonValue::as_u64)
        .ok_or_else(|| Error::invalid_cursor("missing version"))?;
    if version != CURSOR_VERSION {
        return Err(Error::UnsupportedCursorVersion {
            version,
            expected: CURSOR_VERSION,
        });
    }

    let Some(JsonValue::Object(payload)) = document.remove("k") else {
        return Err(Error::invalid_cursor("missing key payload"));
    };

    if payload.len() != 1 {
        return Err(Error::invalid_cursor(format!(
            "expected exactly one key, found {}",
            payload.len()
        )));
    }

    let Some((key, value)) = payload.into_iter().next() else {
        return Err(Error::invalid_cursor("missing key payload"));
    };

    if !is_scalar(&value) {
        return Err(Error::invalid_cursor(format!(
            "value for '{key}' is not a scalar"
        )));
    }

    Ok(Cursor::new(key, value))
}

/// Key values must be strings, numbers or booleans
fn is_scalar(value: &JsonValue) -> bool {
    matches!(
        value,
        JsonValue::String(_) | JsonValue::Number(_) | JsonValue::Bool(_)
    )
}

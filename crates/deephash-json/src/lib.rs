//! Structural hashing for `serde_json` documents and `Serialize` types.
//!
//! Documents are mapped onto the `deephash` value model: objects become
//! mappings with string keys, arrays become sequences, and numbers keep the
//! class serde_json parsed them as (signed, unsigned or float). Object member
//! order and array element order therefore do not affect the digest.
//!
#![deny(missing_docs)]

use deephash::{HashError, Hasher, HexDigest, Scalar, StreamingDigest, Value};
use serde::Serialize;
use serde_json::Value as Json;
use std::borrow::Cow;
use tracing::debug;

/// Borrows a JSON document as a value tree.
pub fn json_to_value(json: &Json) -> Value<'_> {
    match json {
        Json::Null => Value::Null,
        Json::Bool(b) => Value::Scalar(Scalar::Bool(*b)),
        Json::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Scalar(Scalar::Int(i))
            } else if let Some(u) = n.as_u64() {
                Value::Scalar(Scalar::UInt(u))
            } else {
                // Finite by construction: serde_json cannot hold NaN or infinities.
                Value::Scalar(Scalar::Float64(n.as_f64().unwrap_or_default()))
            }
        }
        Json::String(s) => Value::Scalar(Scalar::Str(Cow::Borrowed(s.as_str()))),
        Json::Array(items) => Value::Sequence(items.iter().map(json_to_value).collect()),
        Json::Object(map) => Value::Mapping(
            map.iter()
                .map(|(k, v)| (Value::str(k.as_str()), json_to_value(v)))
                .collect(),
        ),
    }
}

/// Hashes a JSON document with SHA-256 and the default configuration.
///
/// # Example
///
/// ```rust
/// use deephash_json::hash_json;
/// use serde_json::json;
///
/// let a = hash_json(&json!({"tags": ["x", "y"], "id": 7}))?;
/// let b = hash_json(&json!({"id": 7, "tags": ["y", "x"]}))?;
/// assert_eq!(a, b);
/// # Ok::<(), deephash::HashError>(())
/// ```
pub fn hash_json(json: &Json) -> Result<HexDigest, HashError> {
    hash_json_with(&Hasher::new(), json)
}

/// Hashes a JSON document with the given hasher.
pub fn hash_json_with<D: StreamingDigest>(
    hasher: &Hasher<D>,
    json: &Json,
) -> Result<HexDigest, HashError> {
    hasher.hash_value(&json_to_value(json))
}

/// Hashes any `Serialize` type through its JSON form.
///
/// Struct fields become mapping entries keyed by their serialized names, so
/// `#[serde(skip)]` plays the role of an ignored field.
///
/// # Errors
///
/// Returns [`HashError::Introspection`] if the value cannot be serialized
/// (for example a map with non-string keys that serde_json rejects).
pub fn hash_serialize<T: Serialize + ?Sized>(value: &T) -> Result<HexDigest, HashError> {
    hash_serialize_with(&Hasher::new(), value)
}

/// Hashes any `Serialize` type through its JSON form with the given hasher.
pub fn hash_serialize_with<D: StreamingDigest, T: Serialize + ?Sized>(
    hasher: &Hasher<D>,
    value: &T,
) -> Result<HexDigest, HashError> {
    let json = serde_json::to_value(value).map_err(|e| {
        debug!(error = %e, "serialization failed before hashing");
        HashError::Introspection(e.to_string())
    })?;
    hash_json_with(hasher, &json)
}

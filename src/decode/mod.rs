//! Response Decoder: untyped JSON in, typed snapshot (or `MalformedResponse`) out.
//!
//! Each entity kind implements [`Decode`] exactly once, in `entities.rs`,
//! on top of [`FieldCursor`]. Decoding is pure: same input, same output.

mod cursor;
mod entities;

pub use cursor::FieldCursor;

use serde_json::Value;

use crate::error::{MgmtError, Result};

pub trait Decode: Sized {
    /// Entity kind named in `MalformedResponse` errors.
    const KIND: &'static str;

    fn decode(value: &Value) -> Result<Self>;
}

/// Decodes a top-level JSON array in broker order. One malformed element
/// fails the whole list.
pub fn decode_list<T: Decode>(value: &Value) -> Result<Vec<T>> {
    let Value::Array(items) = value else {
        return Err(MgmtError::malformed(T::KIND, "expected a JSON list"));
    };
    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            T::decode(item).map_err(|err| match err {
                MgmtError::MalformedResponse { entity, detail } => MgmtError::MalformedResponse {
                    entity,
                    detail: format!("element {}: {}", index, detail),
                },
                other => other,
            })
        })
        .collect()
}

/// Convenience for callers holding raw bytes (fixtures, recorded replies).
pub fn decode_slice<T: Decode>(bytes: &[u8]) -> Result<T> {
    let value: Value = serde_json::from_slice(bytes)
        .map_err(|e| MgmtError::malformed(T::KIND, format!("invalid JSON: {}", e)))?;
    T::decode(&value)
}

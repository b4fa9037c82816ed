//! Field cursor over one JSON object.
//!
//! Every tolerance rule of the decoder lives here: absent or `null` fields
//! fall back to a sentinel (0, 0.0, false, "", empty list, default nested
//! record), identity fields are strict, type mismatches are reported with
//! the entity kind and the field name.

use serde_json::{Map, Value};

use super::Decode;
use crate::error::{MgmtError, Result};

pub struct FieldCursor<'a> {
    entity: &'static str,
    fields: &'a Map<String, Value>,
}

impl<'a> FieldCursor<'a> {
    pub fn new(entity: &'static str, value: &'a Value) -> Result<Self> {
        match value {
            Value::Object(fields) => Ok(Self { entity, fields }),
            other => Err(MgmtError::malformed(
                entity,
                format!("expected a JSON object, got {}", type_name(other)),
            )),
        }
    }

    fn get(&self, key: &str) -> Option<&'a Value> {
        match self.fields.get(key) {
            None | Some(Value::Null) => None,
            Some(v) => Some(v),
        }
    }

    fn mismatch(&self, key: &str, expected: &str, got: &Value) -> MgmtError {
        MgmtError::malformed(
            self.entity,
            format!("field '{}' should be {}, got {}", key, expected, type_name(got)),
        )
    }

    // ========================================
    // IDENTITY FIELDS (strict)
    // ========================================

    /// Present, a string, and not empty.
    pub fn required_str(&self, key: &str) -> Result<String> {
        match self.get(key) {
            Some(Value::String(s)) if !s.is_empty() => Ok(s.clone()),
            Some(Value::String(_)) => Err(MgmtError::malformed(
                self.entity,
                format!("required field '{}' is empty", key),
            )),
            Some(other) => Err(self.mismatch(key, "a string", other)),
            None => Err(MgmtError::malformed(
                self.entity,
                format!("missing required field '{}'", key),
            )),
        }
    }

    /// Present and numeric; used where a number is part of an identity.
    pub fn required_u64(&self, key: &str) -> Result<u64> {
        if self.get(key).is_none() {
            return Err(MgmtError::malformed(
                self.entity,
                format!("missing required field '{}'", key),
            ));
        }
        self.u64(key)
    }

    // ========================================
    // TOLERANT FIELDS
    // ========================================

    pub fn u64(&self, key: &str) -> Result<u64> {
        let Some(value) = self.get(key) else {
            return Ok(0);
        };
        match value {
            Value::Number(n) => {
                if let Some(v) = n.as_u64() {
                    Ok(v)
                } else if let Some(f) = n.as_f64().filter(|f| f.is_finite() && *f >= 0.0) {
                    Ok(f as u64)
                } else {
                    Err(MgmtError::malformed(
                        self.entity,
                        format!("field '{}' must be non-negative, got {}", key, n),
                    ))
                }
            }
            Value::String(s) => s
                .trim()
                .parse::<u64>()
                .map_err(|_| self.mismatch(key, "a non-negative number", value)),
            other => Err(self.mismatch(key, "a number", other)),
        }
    }

    /// Rates and ratios: finite and non-negative.
    pub fn f64(&self, key: &str) -> Result<f64> {
        let Some(value) = self.get(key) else {
            return Ok(0.0);
        };
        let parsed = match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            other => return Err(self.mismatch(key, "a number", other)),
        };
        match parsed {
            Some(f) if f.is_finite() && f >= 0.0 => Ok(f),
            Some(f) => Err(MgmtError::malformed(
                self.entity,
                format!("field '{}' must be finite and non-negative, got {}", key, f),
            )),
            None => Err(self.mismatch(key, "a number", value)),
        }
    }

    pub fn bool(&self, key: &str) -> Result<bool> {
        match self.get(key) {
            None => Ok(false),
            Some(Value::Bool(b)) => Ok(*b),
            Some(Value::String(s)) if s == "true" => Ok(true),
            Some(Value::String(s)) if s == "false" => Ok(false),
            Some(other) => Err(self.mismatch(key, "a boolean", other)),
        }
    }

    /// Numbers are rendered as text: some brokers emit ports and pids as
    /// either form.
    pub fn string(&self, key: &str) -> Result<String> {
        match self.get(key) {
            None => Ok(String::new()),
            Some(Value::String(s)) => Ok(s.clone()),
            Some(Value::Number(n)) => Ok(n.to_string()),
            Some(Value::Bool(b)) => Ok(b.to_string()),
            Some(other) => Err(self.mismatch(key, "a string", other)),
        }
    }

    /// Strings or a comma separated string, both become a list.
    pub fn string_list(&self, key: &str) -> Result<Vec<String>> {
        match self.get(key) {
            None => Ok(Vec::new()),
            Some(Value::String(s)) => Ok(s
                .split(',')
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(String::from)
                .collect()),
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| match item {
                    Value::String(s) => Ok(s.clone()),
                    other => Err(self.mismatch(key, "a list of strings", other)),
                })
                .collect(),
            Some(other) => Err(self.mismatch(key, "a string or list", other)),
        }
    }

    // ========================================
    // NESTED STRUCTURES
    // ========================================

    /// Missing nested objects yield the default record, never a null.
    pub fn nested<T: Decode + Default>(&self, key: &str) -> Result<T> {
        match self.get(key) {
            None => Ok(T::default()),
            Some(v @ Value::Object(_)) => T::decode(v),
            Some(other) => Err(self.mismatch(key, "an object", other)),
        }
    }

    pub fn cursor(&self, key: &str) -> Result<Option<FieldCursor<'a>>> {
        match self.get(key) {
            None => Ok(None),
            Some(v @ Value::Object(_)) => FieldCursor::new(self.entity, v).map(Some),
            Some(other) => Err(self.mismatch(key, "an object", other)),
        }
    }

    /// Elements decode in order; the first malformed one fails the list.
    pub fn list<T: Decode>(&self, key: &str) -> Result<Vec<T>> {
        match self.get(key) {
            None => Ok(Vec::new()),
            Some(Value::Array(items)) => items.iter().map(T::decode).collect(),
            Some(other) => Err(self.mismatch(key, "a list", other)),
        }
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

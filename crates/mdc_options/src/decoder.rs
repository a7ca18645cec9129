//! Event payload decoders.
//!
//! Listeners do not see the raw DOM event. The rendering binding snapshots the fields commonly
//! read by handlers into a JSON object (see [`crate::render::event_payload`]) and decoders turn
//! that payload into a message.

use std::fmt;
use std::rc::Rc;

use serde_json::Value;
use thiserror::Error;

/// Errors produced while decoding an event payload.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The payload has no value at the given path.
    #[error("payload has no field at `{0}`")]
    MissingField(String),
    /// The value at the given path has an unexpected type.
    #[error("payload field `{path}` is not a {expected}")]
    WrongType {
        /// Dotted field path.
        path: String,
        /// Expected JSON type.
        expected: &'static str,
    },
    /// A custom decoder rejected the payload.
    #[error("{0}")]
    Failed(String),
}

/// Shared function from an event payload to a message.
pub struct Decoder<M>(Rc<dyn Fn(&Value) -> Result<M, DecodeError>>);

impl<M: 'static> Decoder<M> {
    /// Wraps a decoding function.
    pub fn new(decode: impl Fn(&Value) -> Result<M, DecodeError> + 'static) -> Self {
        Self(Rc::new(decode))
    }

    /// Ignores the payload and always produces `msg`.
    pub fn succeed(msg: M) -> Self
    where
        M: Clone,
    {
        Self::new(move |_| Ok(msg.clone()))
    }

    /// Transforms the decoded value.
    pub fn map<N: 'static>(self, f: impl Fn(M) -> N + 'static) -> Decoder<N> {
        Decoder::new(move |payload| self.decode(payload).map(&f))
    }
}

impl<M> Decoder<M> {
    /// Runs the decoder against `payload`.
    ///
    /// # Errors
    ///
    /// Returns the [`DecodeError`] reported by the wrapped function.
    pub fn decode(&self, payload: &Value) -> Result<M, DecodeError> {
        (self.0)(payload)
    }
}

impl<M> Clone for Decoder<M> {
    fn clone(&self) -> Self {
        Self(Rc::clone(&self.0))
    }
}

impl<M> PartialEq for Decoder<M> {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl<M> fmt::Debug for Decoder<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Decoder(..)")
    }
}

fn value_at<'a>(payload: &'a Value, path: &[&str]) -> Result<&'a Value, DecodeError> {
    path.iter()
        .try_fold(payload, |value, field| value.get(field))
        .filter(|value| !value.is_null())
        .ok_or_else(|| DecodeError::MissingField(path.join(".")))
}

/// Reads a string at `path`.
///
/// # Errors
///
/// Fails when the field is absent or not a string.
pub fn string_at(payload: &Value, path: &[&str]) -> Result<String, DecodeError> {
    value_at(payload, path)?
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| DecodeError::WrongType {
            path: path.join("."),
            expected: "string",
        })
}

/// Reads a boolean at `path`.
///
/// # Errors
///
/// Fails when the field is absent or not a boolean.
pub fn bool_at(payload: &Value, path: &[&str]) -> Result<bool, DecodeError> {
    value_at(payload, path)?
        .as_bool()
        .ok_or_else(|| DecodeError::WrongType {
            path: path.join("."),
            expected: "boolean",
        })
}

/// Reads a number at `path`.
///
/// # Errors
///
/// Fails when the field is absent or not a number.
pub fn f64_at(payload: &Value, path: &[&str]) -> Result<f64, DecodeError> {
    value_at(payload, path)?
        .as_f64()
        .ok_or_else(|| DecodeError::WrongType {
            path: path.join("."),
            expected: "number",
        })
}

/// Decodes `target.value`.
pub fn target_value() -> Decoder<String> {
    Decoder::new(|payload| string_at(payload, &["target", "value"]))
}

/// Decodes `target.checked`.
pub fn target_checked() -> Decoder<bool> {
    Decoder::new(|payload| bool_at(payload, &["target", "checked"]))
}

/// Decodes the keyboard `key`.
pub fn key() -> Decoder<String> {
    Decoder::new(|payload| string_at(payload, &["key"]))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn reads_nested_target_fields() {
        let payload = json!({ "type": "input", "target": { "value": "hello", "checked": false } });
        assert_eq!(target_value().decode(&payload), Ok("hello".to_string()));
        assert_eq!(target_checked().decode(&payload), Ok(false));
    }

    #[test]
    fn reports_missing_and_mistyped_fields() {
        let payload = json!({ "target": { "value": 3 }, "key": null });
        assert_eq!(
            target_value().decode(&payload),
            Err(DecodeError::WrongType {
                path: "target.value".to_string(),
                expected: "string",
            })
        );
        assert_eq!(
            target_checked().decode(&payload),
            Err(DecodeError::MissingField("target.checked".to_string()))
        );
        assert_eq!(
            key().decode(&payload),
            Err(DecodeError::MissingField("key".to_string()))
        );
    }

    #[test]
    fn map_and_succeed_compose() {
        let decoder = Decoder::succeed(2_u8).map(|n| n * 10);
        assert_eq!(decoder.decode(&Value::Null), Ok(20));
        let length = target_value().map(|value| value.len());
        assert_eq!(length.decode(&json!({ "target": { "value": "abc" } })), Ok(3));
        assert_eq!(f64_at(&json!({ "clientX": 12.5 }), &["clientX"]), Ok(12.5));
    }
}

//! AlertManager wire format and the translation into it.
//!
//! An [`AlertEvent`] becomes one [`WireEvent`]: fixed labels describing the
//! alert, the event's tags as extra labels, and its fields as annotations.
//! The endpoint expects an array of events, so [`encode_payload`] always
//! emits a one-element JSON array.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::event::AlertEvent;

#[cfg(test)]
#[path = "wire_tests.rs"]
mod tests;

/// Label keys every wire event carries.
pub mod label {
    /// Topic the event was published on.
    pub const TOPIC: &str = "_topic";
    /// Alert identifier.
    pub const ID: &str = "_ID";
    /// Alert message.
    pub const MESSAGE: &str = "_message";
    /// Severity level.
    pub const LEVEL: &str = "_level";
    /// Series name.
    pub const NAME: &str = "_name";
    /// Task name.
    pub const TASK_NAME: &str = "_taskName";
    /// Alert category.
    pub const CATEGORY: &str = "_category";
    /// `"true"` or `"false"`.
    pub const RECOVERABLE: &str = "_recoverable";

    /// All fixed label keys.
    pub const ALL: [&str; 8] = [
        TOPIC,
        ID,
        MESSAGE,
        LEVEL,
        NAME,
        TASK_NAME,
        CATEGORY,
        RECOVERABLE,
    ];
}

/// A single event in AlertManager's label/annotation format.
///
/// Maps are ordered so the encoded payload is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireEvent {
    /// Categorical metadata: fixed labels plus the event's tags.
    pub labels: BTreeMap<String, String>,
    /// Descriptive content taken from the event's fields.
    pub annotations: BTreeMap<String, String>,
}

/// Error raised when an event cannot be expressed in the wire format.
#[derive(Debug, Error)]
pub enum TranslateError {
    /// A field carried a value that is not a string.
    ///
    /// Annotations are string-only; other values are rejected instead of
    /// being stringified.
    #[error("field '{key}' must be a string to be sent as an annotation, got {kind}")]
    NonStringField {
        /// Name of the offending field
        key: String,
        /// Type of the value that was found
        kind: &'static str,
    },
}

/// Translates an alert event into its wire representation.
///
/// Tags are applied after the fixed labels, so a tag named like a fixed key
/// (e.g. `_level`) replaces it.
///
/// # Errors
///
/// Returns [`TranslateError::NonStringField`] if any field value is not a string.
pub fn translate(event: &AlertEvent) -> Result<WireEvent, TranslateError> {
    let mut labels = BTreeMap::new();

    labels.insert(label::TOPIC.to_string(), event.topic.clone());
    labels.insert(label::ID.to_string(), event.state.id.clone());
    labels.insert(label::MESSAGE.to_string(), event.state.message.clone());
    labels.insert(label::LEVEL.to_string(), event.state.level.to_string());
    labels.insert(label::NAME.to_string(), event.data.name.clone());
    labels.insert(label::TASK_NAME.to_string(), event.data.task_name.clone());
    labels.insert(label::CATEGORY.to_string(), event.data.category.clone());
    labels.insert(
        label::RECOVERABLE.to_string(),
        event.data.recoverable.to_string(),
    );

    for (key, value) in &event.data.tags {
        labels.insert(key.clone(), value.clone());
    }

    let annotations = event
        .data
        .fields
        .iter()
        .map(|(key, value)| {
            value
                .as_str()
                .map(|text| (key.clone(), text.to_string()))
                .ok_or_else(|| TranslateError::NonStringField {
                    key: key.clone(),
                    kind: value.kind(),
                })
        })
        .collect::<Result<BTreeMap<_, _>, _>>()?;

    Ok(WireEvent {
        labels,
        annotations,
    })
}

/// Serializes a wire event as the request body: a JSON array holding it.
///
/// # Errors
///
/// Returns the serializer error if encoding fails.
pub fn encode_payload(event: &WireEvent) -> Result<Vec<u8>, serde_json::Error> {
    serde_json::to_vec(std::slice::from_ref(event))
}

/// Parses a request body back into its wire events.
///
/// Retry files hold exactly the request body, so this also reads those.
///
/// # Errors
///
/// Returns the deserializer error if the bytes are not a JSON array of events.
pub fn decode_payload(bytes: &[u8]) -> Result<Vec<WireEvent>, serde_json::Error> {
    serde_json::from_slice(bytes)
}

//! Internal alert event model.
//!
//! These types mirror what the alerting pipeline hands to a handler. They are
//! immutable once produced; the dispatcher only reads them.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Severity level of an alert state.
///
/// Rendered upper-case (`OK`, `INFO`, `WARNING`, `CRITICAL`) both on the wire
/// and in JSON input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Level {
    /// The alert has recovered or never fired.
    #[default]
    Ok,
    /// Informational.
    Info,
    /// Degraded but not yet critical.
    Warning,
    /// Requires immediate attention.
    Critical,
}

impl Level {
    /// Returns the canonical upper-case name of the level.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::Info => "INFO",
            Self::Warning => "WARNING",
            Self::Critical => "CRITICAL",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A dynamically typed field value attached to an alert.
///
/// Only [`FieldValue::String`] can be forwarded as an annotation; the other
/// variants exist because the pipeline produces them and the translator has
/// to reject them explicitly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Text value.
    String(String),
    /// Signed integer value.
    Integer(i64),
    /// Floating point value.
    Float(f64),
    /// Boolean value.
    Boolean(bool),
}

impl FieldValue {
    /// Short name of the variant, used in error messages.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::String(_) => "string",
            Self::Integer(_) => "integer",
            Self::Float(_) => "float",
            Self::Boolean(_) => "boolean",
        }
    }

    /// Returns the text if this is a string value.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

/// Identity and severity of the alert at the time the event was produced.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventState {
    /// Alert identifier.
    pub id: String,
    /// Rendered alert message.
    pub message: String,
    /// Severity level.
    pub level: Level,
}

/// Data describing the series that triggered the alert.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EventData {
    /// Series or measurement name.
    pub name: String,
    /// Name of the task that raised the alert.
    pub task_name: String,
    /// Alert category.
    pub category: String,
    /// Whether the alert can recover on its own.
    pub recoverable: bool,
    /// Categorical tags; forwarded as labels.
    pub tags: HashMap<String, String>,
    /// Descriptive fields; forwarded as annotations.
    pub fields: HashMap<String, FieldValue>,
}

impl EventData {
    /// Adds a tag.
    #[must_use]
    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(key.into(), value.into());
        self
    }

    /// Adds a field.
    #[must_use]
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }
}

/// An alert event emitted by the alerting pipeline.
///
/// `AlertEvent::default()` is the zero-valued event used by the self-test.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertEvent {
    /// Topic the event was published on.
    pub topic: String,
    /// Alert state.
    pub state: EventState,
    /// Triggering data.
    pub data: EventData,
}

impl AlertEvent {
    /// Parses an event from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is not a valid event document.
    pub fn from_json(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }
}

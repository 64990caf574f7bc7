//! Field validation errors and attribute reading
//!
//! Validation failures are reported per field, in the shape clients receive
//! with an unprocessable-entity response: `{"title": ["can't be blank"]}`.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Message for a missing or blank mandatory field.
pub const BLANK: &str = "can't be blank";

/// Message for a value of the wrong shape.
pub const INVALID: &str = "is invalid";

/// Raw attributes of a create or update request.
pub type Attributes = serde_json::Map<String, Value>;

/// Validation errors keyed by field name.
///
/// # Examples
///
/// ```
/// use tracker_model::ValidationErrors;
///
/// let mut errors = ValidationErrors::new();
/// errors.add("title", "can't be blank");
///
/// assert_eq!(errors.get("title"), Some(&["can't be blank".to_string()][..]));
/// assert_eq!(
///     serde_json::to_value(&errors).unwrap(),
///     serde_json::json!({ "title": ["can't be blank"] })
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationErrors {
    fields: BTreeMap<String, Vec<String>>,
}

impl ValidationErrors {
    /// Creates an empty error set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an error set holding one message.
    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    /// Record `message` against `field`. Duplicate messages are kept once.
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        let message = message.into();
        let messages = self.fields.entry(field.into()).or_default();
        if !messages.contains(&message) {
            messages.push(message);
        }
    }

    /// Merge another error set into this one.
    pub fn merge(&mut self, other: ValidationErrors) {
        for (field, messages) in other.fields {
            for message in messages {
                self.add(field.clone(), message);
            }
        }
    }

    /// Messages recorded for `field`.
    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.fields.get(field).map(Vec::as_slice)
    }

    /// Check if any message is recorded for `field`.
    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Number of fields with errors.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// `Ok(())` when no error was recorded, otherwise `Err(self)`.
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in &self.fields {
            for message in messages {
                if !first {
                    f.write_str(", ")?;
                }
                write!(f, "{} {}", field, message)?;
                first = false;
            }
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// A single attribute as supplied by a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    /// The key was not supplied.
    Absent,
    /// The key was supplied as `null`.
    Null,
    /// A textual value. Numbers and booleans are cast to text.
    Text(String),
}

impl FieldValue {
    /// Read `field` from `attributes`.
    ///
    /// Arrays and objects are not valid attribute values; they record
    /// [`INVALID`] against the field and read as [`FieldValue::Absent`].
    pub fn read(attributes: &Attributes, field: &str, errors: &mut ValidationErrors) -> Self {
        match attributes.get(field) {
            None => FieldValue::Absent,
            Some(Value::Null) => FieldValue::Null,
            Some(Value::String(s)) => FieldValue::Text(s.clone()),
            Some(Value::Number(n)) => FieldValue::Text(n.to_string()),
            Some(Value::Bool(b)) => FieldValue::Text(b.to_string()),
            Some(Value::Array(_)) | Some(Value::Object(_)) => {
                errors.add(field, INVALID);
                FieldValue::Absent
            }
        }
    }

    /// Text content, `None` for absent, null or blank values.
    pub fn present(self) -> Option<String> {
        match self {
            FieldValue::Text(s) if !is_blank(&s) => Some(s),
            _ => None,
        }
    }
}

/// Whitespace-only strings are blank.
pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

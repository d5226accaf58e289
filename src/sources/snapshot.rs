//! Raw backing-store records and fail-fast entity mapping.
//!
//! A [`Snapshot`] is what the backing store hands over for one location: the
//! record identifier plus a field map of JSON values. Domain entities implement
//! [`FromSnapshot`] to map out of it.
//!
//! ## Rules
//! - Mapping fails fast: [`Snapshot::require`] yields
//!   [`TaskError::Validation`] naming the missing field and the record id,
//!   never a partially-populated entity.
//! - Only genuinely optional fields (e.g. a free-text message body) fall back
//!   to a default, via [`Snapshot::str_or_default`].

use serde_json::{Map, Value};

use crate::error::TaskError;

/// One backing record: identifier plus field map.
///
/// # Example
/// ```
/// use taskstream::{FromSnapshot, Snapshot, TaskError};
///
/// struct Message {
///     id: String,
///     sender_id: String,
///     text: String,
/// }
///
/// impl FromSnapshot for Message {
///     fn from_snapshot(snapshot: &Snapshot) -> Result<Self, TaskError> {
///         Ok(Message {
///             id: snapshot.id().to_string(),
///             sender_id: snapshot.require_str("sender_id")?.to_string(),
///             text: snapshot.str_or_default("text"),
///         })
///     }
/// }
///
/// let snapshot = Snapshot::new("msg-1").with_field("sender_id", "user-7");
/// let message = Message::from_snapshot(&snapshot).unwrap();
/// assert_eq!(message.sender_id, "user-7");
/// assert_eq!(message.text, ""); // optional field, empty default
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    id: String,
    fields: Map<String, Value>,
}

impl Snapshot {
    /// Creates an empty snapshot for the given record id.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            fields: Map::new(),
        }
    }

    /// Returns the snapshot with a field set (builder style).
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// The record identifier the store attached to this snapshot.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Looks up an optional field.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Looks up a structurally required field.
    ///
    /// A missing (or explicitly null) field is a mapping failure: returns
    /// [`TaskError::Validation`] naming the field and this record.
    pub fn require(&self, field: &str) -> Result<&Value, TaskError> {
        match self.fields.get(field) {
            Some(value) if !value.is_null() => Ok(value),
            _ => Err(TaskError::missing_field(field, &self.id)),
        }
    }

    /// Looks up a required string field. A present non-string value fails the
    /// same way as an absent one: the entity cannot be populated from it.
    pub fn require_str(&self, field: &str) -> Result<&str, TaskError> {
        self.require(field)?
            .as_str()
            .ok_or_else(|| TaskError::missing_field(field, &self.id))
    }

    /// Looks up an optional string field, defaulting to empty.
    ///
    /// For genuinely optional text only; required fields go through
    /// [`Snapshot::require_str`].
    pub fn str_or_default(&self, field: &str) -> String {
        self.fields
            .get(field)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    }
}

/// Mapping seam from a backing record to a domain entity.
pub trait FromSnapshot: Sized {
    /// Maps a snapshot into the entity, failing fast on any missing required
    /// field.
    fn from_snapshot(snapshot: &Snapshot) -> Result<Self, TaskError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_present_field() {
        let snapshot = Snapshot::new("rec-1").with_field("name", "alice");
        assert_eq!(snapshot.require_str("name").unwrap(), "alice");
    }

    #[test]
    fn test_require_missing_field_names_field_and_record() {
        let snapshot = Snapshot::new("rec-1");
        let err = snapshot.require("photo_url").unwrap_err();
        assert_eq!(
            err,
            TaskError::Validation {
                field: "photo_url".into(),
                record: "rec-1".into(),
            }
        );
    }

    #[test]
    fn test_null_counts_as_missing() {
        let snapshot = Snapshot::new("rec-1").with_field("name", Value::Null);
        assert!(snapshot.require("name").is_err());
    }

    #[test]
    fn test_wrong_type_fails_string_requirement() {
        let snapshot = Snapshot::new("rec-1").with_field("name", 42);
        assert!(snapshot.require_str("name").is_err());
    }

    #[test]
    fn test_optional_text_defaults_to_empty() {
        let snapshot = Snapshot::new("rec-1");
        assert_eq!(snapshot.str_or_default("body"), "");
    }
}

//! Error types crossing the task boundary.
//!
//! Every error delivered through a [`Task`](crate::Task) or
//! [`ObservableTask`](crate::ObservableTask) in this crate is a [`TaskError`].
//! The taxonomy mirrors the failure modes of a callback-driven backend:
//!
//! - [`TaskError::Validation`] — a required field was absent while mapping a
//!   backing record into a domain entity.
//! - [`TaskError::NotFound`] — a one-shot read targeted a location with no
//!   backing record.
//! - [`TaskError::Backend`] — the underlying transport/service reported failure
//!   (network, permission, quota).
//! - [`TaskError::Unknown`] — catch-all for unclassified producer failures.
//!
//! The type provides helper methods (`as_label`, `as_message`) for logs/metrics
//! plus classification predicates such as [`TaskError::is_not_found`].
//!
//! ## Rules
//! - Combinators never transform or wrap an error: [`Task::flat_map`](crate::Task::flat_map)
//!   forwards the upstream error unchanged.
//! - Mapping fails fast: a missing required field yields [`TaskError::Validation`]
//!   naming the field, never a partially-populated entity.
//! - No layer here retries; retry/backoff is a caller concern.

use thiserror::Error;

/// Errors produced by tasks, streams, and sources.
///
/// Cloneable and comparable so a single settlement can be fanned out to every
/// attached observer and asserted on in tests.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TaskError {
    /// A structurally required field was missing when mapping a backing record
    /// into a domain entity.
    #[error("required field {field:?} is missing in {record}")]
    Validation {
        /// Name of the missing field.
        field: String,
        /// Identifier of the record being mapped.
        record: String,
    },

    /// A one-shot read targeted a location with no backing record.
    ///
    /// The display format is `"{location} doesn't exist"`.
    #[error("{location} doesn't exist")]
    NotFound {
        /// The backing-store location (path or document id).
        location: String,
    },

    /// The underlying transport/service reported failure.
    #[error("backend failure: {message}")]
    Backend {
        /// Human-readable description from the transport layer.
        message: String,
    },

    /// Unclassified failure surfaced by a producer.
    #[error("unknown failure: {message}")]
    Unknown {
        /// Whatever description the producer could give.
        message: String,
    },
}

impl TaskError {
    /// Builds a [`TaskError::Validation`] for a missing field of a record.
    pub fn missing_field(field: impl Into<String>, record: impl Into<String>) -> Self {
        TaskError::Validation {
            field: field.into(),
            record: record.into(),
        }
    }

    /// Builds a [`TaskError::NotFound`] for an absent backing location.
    pub fn not_found(location: impl Into<String>) -> Self {
        TaskError::NotFound {
            location: location.into(),
        }
    }

    /// Builds a [`TaskError::Backend`] from a transport failure description.
    pub fn backend(message: impl Into<String>) -> Self {
        TaskError::Backend {
            message: message.into(),
        }
    }

    /// Builds a [`TaskError::Unknown`] from an unclassified description.
    pub fn unknown(message: impl Into<String>) -> Self {
        TaskError::Unknown {
            message: message.into(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use taskstream::TaskError;
    ///
    /// let err = TaskError::not_found("conversations/1");
    /// assert_eq!(err.as_label(), "not_found");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            TaskError::Validation { .. } => "validation_failed",
            TaskError::NotFound { .. } => "not_found",
            TaskError::Backend { .. } => "backend_failed",
            TaskError::Unknown { .. } => "unknown",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            TaskError::Validation { field, record } => {
                format!("record {record}: required field {field:?} is missing")
            }
            TaskError::NotFound { location } => format!("{location} doesn't exist"),
            TaskError::Backend { message } => format!("backend: {message}"),
            TaskError::Unknown { message } => message.clone(),
        }
    }

    /// True if the error reports an absent backing record.
    pub fn is_not_found(&self) -> bool {
        matches!(self, TaskError::NotFound { .. })
    }

    /// True if the error reports a failed entity mapping.
    pub fn is_validation(&self) -> bool {
        matches!(self, TaskError::Validation { .. })
    }

    /// True if the error comes from the transport/service layer.
    pub fn is_backend(&self) -> bool {
        matches!(self, TaskError::Backend { .. })
    }
}

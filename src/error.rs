//! Error taxonomy for the normalization core.
//!
//! Failures come in three tiers:
//!
//! - [`FieldError`]: one field failed its type rule. Carried inside
//!   [`RecordError::Field`] and recoverable: the record is discarded and the
//!   run continues.
//! - [`RecordError::UnhandledType`]: a column type with no transform. The
//!   same failure would repeat on every record, so it escalates to
//!   [`NormalizeError::UnhandledType`] and ends the run.
//! - [`NormalizeError`]: run-level failures (empty input, unreadable header,
//!   broken input/output streams).

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FieldError {
    #[error("cannot parse '{value}' as {kind}")]
    Parse { kind: &'static str, value: String },

    #[error("{kind} '{value}' is out of range: {reason}")]
    Range {
        kind: &'static str,
        value: String,
        reason: String,
    },

    #[error("'{value}' is not a valid {kind}")]
    Format { kind: &'static str, value: String },
}

impl FieldError {
    pub(crate) fn parse(kind: &'static str, value: &str) -> Self {
        FieldError::Parse {
            kind,
            value: value.to_string(),
        }
    }

    pub(crate) fn range(kind: &'static str, value: &str, reason: impl Into<String>) -> Self {
        FieldError::Range {
            kind,
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn format(kind: &'static str, value: &str) -> Self {
        FieldError::Format {
            kind,
            value: value.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RecordError {
    #[error("column {}: {source}", .index + 1)]
    Field {
        index: usize,
        #[source]
        source: FieldError,
    },

    #[error("column {} is not valid {encoding} text", .index + 1)]
    Undecodable {
        index: usize,
        encoding: &'static str,
    },

    #[error("column {} cannot be written as {encoding} text", .index + 1)]
    Unencodable {
        index: usize,
        encoding: &'static str,
    },

    #[error("column type '{type_name}' at column {} is not handled", .index + 1)]
    UnhandledType { index: usize, type_name: String },
}

impl RecordError {
    /// True when the failure will recur on every remaining record.
    pub fn is_fatal(&self) -> bool {
        matches!(self, RecordError::UnhandledType { .. })
    }
}

#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("no input to process")]
    EmptyInput,

    #[error("header row is not valid {encoding} text")]
    HeaderDecode { encoding: &'static str },

    #[error("header column {} cannot be written as {encoding} text", .index + 1)]
    HeaderEncode {
        index: usize,
        encoding: &'static str,
    },

    #[error(
        "column type '{type_name}' at column {} is not handled (line {line})",
        .index + 1
    )]
    UnhandledType {
        line: u64,
        index: usize,
        type_name: String,
    },

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

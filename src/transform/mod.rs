//! Per-type field transforms.
//!
//! Each function takes the raw text of one field and returns its normalized
//! text or a [`FieldError`](crate::error::FieldError). None of them touch
//! record or stream state; the record processor decides which one to call.

pub mod duration;
pub mod string_ops;
pub mod timestamp;
pub mod zip_code;

pub use duration::{duration, total_duration};
pub use string_ops::{full_name, unmodified};
pub use timestamp::{TimestampFormat, timestamp};
pub use zip_code::zip_code;

/// Settings shared by every transform call in a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransformOptions {
    pub timestamp_offset_hours: i64,
    pub timestamp_format: TimestampFormat,
}

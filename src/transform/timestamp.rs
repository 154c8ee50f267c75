use std::fmt::{self, Write as _};

use anyhow::{Result, anyhow};
use chrono::{NaiveDate, NaiveDateTime, TimeDelta};

use crate::error::FieldError;

const KIND: &str = "timestamp";

pub const DEFAULT_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

// Two-digit year layouts come first so `4/1/11` is not read as year 11.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%m/%d/%y %I:%M:%S %p",
    "%m/%d/%y %I:%M %p",
    "%m/%d/%y %H:%M:%S",
    "%m/%d/%y %H:%M",
    "%m/%d/%Y %I:%M:%S %p",
    "%m/%d/%Y %I:%M %p",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%Y/%m/%d %H:%M:%S",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%y", "%m/%d/%Y", "%Y/%m/%d"];

/// A validated chrono strftime string used to render timestamp columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimestampFormat(String);

impl TimestampFormat {
    /// Accepts a strftime pattern, or `s`/`iso8601` for the default layout.
    pub fn parse(value: &str) -> Result<Self> {
        let pattern = match value.trim() {
            "" | "s" | "iso8601" | "iso-8601" => DEFAULT_TIMESTAMP_FORMAT,
            other => other,
        };
        let sample = NaiveDate::from_ymd_opt(2000, 1, 1)
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .ok_or_else(|| anyhow!("Failed to build sample timestamp"))?;
        let mut rendered = String::new();
        write!(rendered, "{}", sample.format(pattern))
            .map_err(|_| anyhow!("Invalid timestamp format '{value}'"))?;
        Ok(Self(pattern.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for TimestampFormat {
    fn default() -> Self {
        Self(DEFAULT_TIMESTAMP_FORMAT.to_string())
    }
}

impl fmt::Display for TimestampFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub fn parse_naive_timestamp(value: &str) -> Option<NaiveDateTime> {
    let trimmed = value.trim();
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}

/// Parses `raw`, shifts it by `offset_hours`, and renders it with `format`.
pub fn timestamp(
    raw: &str,
    offset_hours: i64,
    format: &TimestampFormat,
) -> Result<String, FieldError> {
    let parsed = parse_naive_timestamp(raw).ok_or_else(|| FieldError::parse(KIND, raw))?;
    let shifted = TimeDelta::try_hours(offset_hours)
        .and_then(|delta| parsed.checked_add_signed(delta))
        .ok_or_else(|| {
            FieldError::range(
                KIND,
                raw,
                format!("offset of {offset_hours} hour(s) leaves the supported calendar"),
            )
        })?;
    Ok(shifted.format(format.as_str()).to_string())
}

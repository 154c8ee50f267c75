//! Elapsed-time parsing for `duration` and `total-duration` columns.
//!
//! Durations are read right to left as groups of digits separated by `:` or
//! `.`. When the final separator is `.`, the last group is a fraction of a
//! second. The remaining groups are seconds, minutes, hours and days, so
//! `25:00:00` is 25 hours and `90000` is 90000 seconds; no group is bounded
//! by the size of the next unit up.

use crate::error::FieldError;

const KIND: &str = "duration";
const TOTAL_KIND: &str = "duration total";
const UNIT_SECONDS: [u64; 4] = [1, 60, 3_600, 86_400];
const SEPARATORS: [char; 2] = [':', '.'];

/// Parses `raw` into total elapsed seconds.
pub fn parse_seconds(raw: &str) -> Result<f64, FieldError> {
    let text = raw.trim();
    let invalid = || FieldError::format(KIND, raw);
    if text.is_empty()
        || !text
            .chars()
            .all(|ch| ch.is_ascii_digit() || SEPARATORS.contains(&ch))
    {
        return Err(invalid());
    }

    let (whole, fraction) = match text.rfind(SEPARATORS) {
        Some(idx) if text[idx..].starts_with('.') => (&text[..idx], Some(&text[idx + 1..])),
        _ => (text, None),
    };
    match fraction {
        Some(digits) if digits.is_empty() => return Err(invalid()),
        None if whole.ends_with(SEPARATORS) => return Err(invalid()),
        _ => {}
    }

    let mut total: u64 = 0;
    let mut groups = whole.rsplit(SEPARATORS);
    for unit in UNIT_SECONDS {
        let Some(group) = groups.next() else {
            break;
        };
        if group.is_empty() {
            continue;
        }
        let value: u64 = group.parse().map_err(|_| invalid())?;
        total = value
            .checked_mul(unit)
            .and_then(|seconds| total.checked_add(seconds))
            .ok_or_else(invalid)?;
    }
    if groups.next().is_some() {
        return Err(invalid());
    }

    match fraction {
        // Rendering the decimal text keeps `3723.45` exact to the nearest f64.
        Some(digits) => format!("{total}.{digits}").parse().map_err(|_| invalid()),
        None => Ok(total as f64),
    }
}

pub fn format_seconds(seconds: f64) -> String {
    seconds.to_string()
}

/// Normalizes a single duration field to decimal seconds.
pub fn duration(raw: &str) -> Result<String, FieldError> {
    parse_seconds(raw).map(format_seconds)
}

/// Sums already-normalized duration fields.
pub fn total_duration(durations: &[&str]) -> Result<String, FieldError> {
    let mut total = 0.0_f64;
    for value in durations {
        let seconds: f64 = value
            .trim()
            .parse()
            .map_err(|_| FieldError::format(TOTAL_KIND, value))?;
        if !seconds.is_finite() {
            return Err(FieldError::format(TOTAL_KIND, value));
        }
        total += seconds;
    }
    Ok(format_seconds(total))
}

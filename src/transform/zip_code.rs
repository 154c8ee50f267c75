use crate::error::FieldError;

const KIND: &str = "zip code";
const ZIP_LIMIT: u32 = 100_000;

/// Validates a five-digit zip code, left-padding shorter values with zeros.
pub fn zip_code(raw: &str) -> Result<String, FieldError> {
    let trimmed = raw.trim();
    let digits = trimmed.strip_prefix('+').unwrap_or(trimmed);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(FieldError::parse(KIND, raw));
    }
    match digits.parse::<u32>() {
        Ok(value) if value < ZIP_LIMIT => Ok(format!("{value:05}")),
        _ => Err(FieldError::range(KIND, raw, "more than 5 digits")),
    }
}

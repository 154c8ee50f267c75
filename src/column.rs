use std::{fmt, str::FromStr};

use anyhow::{Result, bail};
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

/// Semantic classification that decides how the fields of a column are
/// validated and rendered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum ColumnType {
    Timestamp,
    ZipCode,
    FullName,
    Duration,
    TotalDuration,
    #[default]
    UnmodifiedString,
    /// A type named in configuration that this build has no transform for.
    /// Records reaching such a column abort the whole run.
    Unrecognized(String),
}

impl ColumnType {
    pub fn as_str(&self) -> &str {
        match self {
            ColumnType::Timestamp => "timestamp",
            ColumnType::ZipCode => "zip-code",
            ColumnType::FullName => "full-name",
            ColumnType::Duration => "duration",
            ColumnType::TotalDuration => "total-duration",
            ColumnType::UnmodifiedString => "string",
            ColumnType::Unrecognized(name) => name.as_str(),
        }
    }

    pub fn variants() -> &'static [&'static str] {
        &[
            "timestamp",
            "zip-code",
            "full-name",
            "duration",
            "total-duration",
            "string",
        ]
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, ColumnType::Unrecognized(_))
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ColumnType {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            bail!(
                "Column type cannot be empty. Supported types: {}",
                ColumnType::variants().join(", ")
            );
        }
        let normalized = trimmed.to_ascii_lowercase().replace('_', "-");
        let parsed = match normalized.as_str() {
            "timestamp" | "datetime" | "date-time" => ColumnType::Timestamp,
            "zip" | "zipcode" | "zip-code" => ColumnType::ZipCode,
            "name" | "fullname" | "full-name" => ColumnType::FullName,
            "duration" => ColumnType::Duration,
            "total" | "totalduration" | "total-duration" => ColumnType::TotalDuration,
            "string" | "unmodified" | "unmodifiedstring" | "unmodified-string" => {
                ColumnType::UnmodifiedString
            }
            _ => ColumnType::Unrecognized(trimmed.to_string()),
        };
        Ok(parsed)
    }
}

impl Serialize for ColumnType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ColumnType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let token = String::deserialize(deserializer)?;
        ColumnType::from_str(&token).map_err(|err| de::Error::custom(err.to_string()))
    }
}

/// Parses a comma-separated list such as `timestamp,string,zip`.
pub fn parse_column_types(values: &[String]) -> Result<Vec<ColumnType>> {
    values
        .iter()
        .flat_map(|value| value.split(','))
        .map(ColumnType::from_str)
        .collect()
}

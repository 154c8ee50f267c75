//! Run configuration: column types, delimiters and timestamp settings.
//!
//! A configuration can be persisted as YAML (see `probe`) and then edited by
//! hand. Command-line flags override whatever the file provides.

use std::{fs::File, io::BufReader, path::Path};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::{
    column::ColumnType,
    schema::Schema,
    transform::{TimestampFormat, TransformOptions, timestamp::DEFAULT_TIMESTAMP_FORMAT},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizeConfig {
    /// Declared column types, in column order. May be shorter than the header.
    pub columns: Vec<ColumnType>,
    #[serde(with = "delimiter_serde")]
    pub delimiter: u8,
    #[serde(
        with = "optional_delimiter_serde",
        skip_serializing_if = "Option::is_none"
    )]
    pub output_delimiter: Option<u8>,
    pub timestamp_offset_hours: i64,
    pub timestamp_format: String,
}

impl Default for NormalizeConfig {
    fn default() -> Self {
        Self {
            columns: Vec::new(),
            delimiter: b',',
            output_delimiter: None,
            timestamp_offset_hours: 0,
            timestamp_format: DEFAULT_TIMESTAMP_FORMAT.to_string(),
        }
    }
}

impl NormalizeConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).with_context(|| format!("Opening config file {path:?}"))?;
        let config: NormalizeConfig = serde_yaml::from_reader(BufReader::new(file))
            .with_context(|| format!("Parsing config YAML {path:?}"))?;
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let file = File::create(path).with_context(|| format!("Creating config file {path:?}"))?;
        serde_yaml::to_writer(file, self).context("Writing config YAML")
    }

    pub fn schema(&self) -> Schema {
        Schema::new(self.columns.clone())
    }

    pub fn output_delimiter(&self) -> u8 {
        self.output_delimiter.unwrap_or(self.delimiter)
    }

    pub fn transform_options(&self) -> Result<TransformOptions> {
        let timestamp_format = TimestampFormat::parse(&self.timestamp_format)
            .with_context(|| format!("Validating timestamp format '{}'", self.timestamp_format))?;
        Ok(TransformOptions {
            timestamp_offset_hours: self.timestamp_offset_hours,
            timestamp_format,
        })
    }
}

fn delimiter_to_string(delimiter: u8) -> String {
    match delimiter {
        b'\t' => "tab".to_string(),
        other => (other as char).to_string(),
    }
}

mod delimiter_serde {
    use serde::{Deserialize, Deserializer, Serializer, de};

    pub fn serialize<S: Serializer>(value: &u8, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::delimiter_to_string(*value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u8, D::Error> {
        let token = String::deserialize(deserializer)?;
        crate::cli::parse_delimiter(&token).map_err(de::Error::custom)
    }
}

mod optional_delimiter_serde {
    use serde::{Deserialize, Deserializer, Serializer, de};

    pub fn serialize<S: Serializer>(value: &Option<u8>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(delimiter) => serializer.serialize_str(&super::delimiter_to_string(*delimiter)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<u8>, D::Error> {
        Option::<String>::deserialize(deserializer)?
            .map(|token| crate::cli::parse_delimiter(&token).map_err(de::Error::custom))
            .transpose()
    }
}

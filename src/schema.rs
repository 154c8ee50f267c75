//! Column-type assignment for a stream.
//!
//! A [`Schema`] is the ordered list of [`ColumnType`]s, index-aligned with
//! the header and every record. Callers may declare all, some, or none of
//! the types up front. When a record is wider than the schema,
//! [`Schema::extend`] appends types for the missing columns using a
//! [`TypeGuesser`]. Existing entries are never changed.

use std::sync::OnceLock;

use clap::ValueEnum;
use regex::Regex;

use crate::{
    column::ColumnType,
    transform::{duration, timestamp},
};

/// Picks a type for a column whose type was not declared.
pub trait TypeGuesser {
    fn guess(&self, value: &str, field_name: &str) -> ColumnType;
}

/// Default guesser: every undeclared column passes through unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnmodifiedGuesser;

impl TypeGuesser for UnmodifiedGuesser {
    fn guess(&self, _value: &str, _field_name: &str) -> ColumnType {
        ColumnType::UnmodifiedString
    }
}

/// Classifies a column from its header name and the first value seen.
///
/// Totals cannot be confirmed from a single value, so a column is only
/// guessed as `total-duration` when its header says so.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicGuesser;

fn clock_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^\d+(:\d{1,2})+(\.\d+)?$").expect("valid duration pattern")
    })
}

fn short_phrase_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\S+(\s+\S+){0,2}$").expect("valid name pattern"))
}

impl TypeGuesser for HeuristicGuesser {
    fn guess(&self, value: &str, field_name: &str) -> ColumnType {
        let name = field_name.to_ascii_lowercase();
        let value = value.trim();
        let looks_like_duration =
            clock_pattern().is_match(value) && duration::parse_seconds(value).is_ok();

        if name.contains("zip")
            && (1..=5).contains(&value.len())
            && value.bytes().all(|b| b.is_ascii_digit())
        {
            ColumnType::ZipCode
        } else if (name.contains("total") || name.contains("sum")) && looks_like_duration {
            ColumnType::TotalDuration
        } else if looks_like_duration {
            ColumnType::Duration
        } else if timestamp::parse_naive_timestamp(value).is_some() {
            ColumnType::Timestamp
        } else if name.contains("name") && short_phrase_pattern().is_match(value) {
            ColumnType::FullName
        } else {
            ColumnType::UnmodifiedString
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "kebab-case")]
pub enum GuessStrategy {
    #[default]
    Unmodified,
    Heuristic,
}

impl GuessStrategy {
    pub fn guesser(self) -> Box<dyn TypeGuesser> {
        match self {
            GuessStrategy::Unmodified => Box::new(UnmodifiedGuesser),
            GuessStrategy::Heuristic => Box::new(HeuristicGuesser),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schema {
    columns: Vec<ColumnType>,
}

/// Result of [`Schema::extend`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extension {
    pub schema: Schema,
    pub added: usize,
}

impl Schema {
    pub fn new(columns: Vec<ColumnType>) -> Self {
        Self { columns }
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&ColumnType> {
        self.columns.get(index)
    }

    pub fn column_types(&self) -> &[ColumnType] {
        &self.columns
    }

    /// True when a record of `width` fields needs more column types.
    pub fn needs_extension(&self, header_len: usize, width: usize) -> bool {
        self.columns.len() < header_len.max(width)
    }

    /// Indices of `duration` columns strictly left of `index`.
    pub fn duration_indices_before(&self, index: usize) -> impl Iterator<Item = usize> + '_ {
        self.columns
            .iter()
            .take(index)
            .enumerate()
            .filter(|(_, ty)| **ty == ColumnType::Duration)
            .map(|(idx, _)| idx)
    }

    pub fn unrecognized(&self) -> impl Iterator<Item = (usize, &ColumnType)> + '_ {
        self.columns
            .iter()
            .enumerate()
            .filter(|(_, ty)| !ty.is_recognized())
    }

    /// Appends a guessed type for every column in `len()..max(header, record)`.
    ///
    /// The guesser sees `record[i]` (empty past the end of a short record)
    /// and `header[i]` (empty past the end of the header).
    pub fn extend<S: AsRef<str>>(
        self,
        header: &[S],
        record: &[S],
        guesser: &dyn TypeGuesser,
    ) -> Extension {
        let mut columns = self.columns;
        let start = columns.len();
        let target = header.len().max(record.len());
        for idx in start..target {
            let value = record.get(idx).map(AsRef::as_ref).unwrap_or("");
            let name = header.get(idx).map(AsRef::as_ref).unwrap_or("");
            columns.push(guesser.guess(value, name));
        }
        Extension {
            added: columns.len() - start,
            schema: Schema { columns },
        }
    }
}

impl From<Vec<ColumnType>> for Schema {
    fn from(columns: Vec<ColumnType>) -> Self {
        Self::new(columns)
    }
}

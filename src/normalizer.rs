//! Record processor: drives the per-field transforms over a CSV stream.
//!
//! Each record goes through the same steps. The schema is extended if the
//! record is wider than it. Then every field is transformed in column order.
//! On success the record is written. When a field fails, the whole record is
//! dropped and one diagnostic line is written. The exception is a column type
//! with no transform: that would fail every record, so the run stops at the
//! first record that reaches it.

use std::io::{Read, Write};

use encoding_rs::{Encoding, UTF_8};
use itertools::Itertools;
use log::{debug, error, warn};

use crate::{
    column::ColumnType,
    error::{NormalizeError, RecordError},
    io_utils::{decode_record, first_unencodable},
    schema::{Schema, TypeGuesser, UnmodifiedGuesser},
    transform::{self, TransformOptions},
};

/// Counts reported at the end of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub records_read: u64,
    pub records_written: u64,
    pub records_discarded: u64,
    pub columns_added: usize,
}

/// Transforms one record against `schema`.
///
/// `total-duration` columns ignore their own input and sum the normalized
/// `duration` fields strictly to their left. Columns past the end of the
/// schema are passed through unchanged.
pub fn normalize_record<S: AsRef<str>>(
    schema: &Schema,
    options: &TransformOptions,
    raw: &[S],
) -> Result<Vec<String>, RecordError> {
    let passthrough = ColumnType::default();
    let mut normalized: Vec<String> = Vec::with_capacity(raw.len());
    for (index, field) in raw.iter().enumerate() {
        let field = field.as_ref();
        let result = match schema.get(index).unwrap_or(&passthrough) {
            ColumnType::Timestamp => transform::timestamp(
                field,
                options.timestamp_offset_hours,
                &options.timestamp_format,
            ),
            ColumnType::ZipCode => transform::zip_code(field),
            ColumnType::FullName => Ok(transform::full_name(field).into_owned()),
            ColumnType::Duration => transform::duration(field),
            ColumnType::TotalDuration => {
                let durations = schema
                    .duration_indices_before(index)
                    .filter_map(|idx| normalized.get(idx).map(String::as_str))
                    .collect::<Vec<_>>();
                transform::total_duration(&durations)
            }
            ColumnType::UnmodifiedString => Ok(transform::unmodified(field).into_owned()),
            ColumnType::Unrecognized(name) => {
                return Err(RecordError::UnhandledType {
                    index,
                    type_name: name.clone(),
                });
            }
        };
        normalized.push(result.map_err(|source| RecordError::Field { index, source })?);
    }
    Ok(normalized)
}

pub struct Normalizer {
    schema: Schema,
    options: TransformOptions,
    guesser: Box<dyn TypeGuesser>,
    input_encoding: &'static Encoding,
    output_encoding: &'static Encoding,
}

impl Normalizer {
    pub fn new(schema: Schema, options: TransformOptions) -> Self {
        Self {
            schema,
            options,
            guesser: Box::new(UnmodifiedGuesser),
            input_encoding: UTF_8,
            output_encoding: UTF_8,
        }
    }

    pub fn with_guesser(mut self, guesser: Box<dyn TypeGuesser>) -> Self {
        self.guesser = guesser;
        self
    }

    pub fn with_input_encoding(mut self, encoding: &'static Encoding) -> Self {
        self.input_encoding = encoding;
        self
    }

    /// Encoding the writer transcodes into. Records holding characters it
    /// cannot represent are discarded instead of reaching the writer.
    pub fn with_output_encoding(mut self, encoding: &'static Encoding) -> Self {
        self.output_encoding = encoding;
        self
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Streams `reader` into `writer`, one record at a time.
    ///
    /// The header is copied through first. Every discarded record, schema
    /// extension, and fatal error produces exactly one line on `diagnostics`.
    pub fn run<R, W, D>(
        &mut self,
        reader: &mut csv::Reader<R>,
        writer: &mut csv::Writer<W>,
        diagnostics: &mut D,
    ) -> Result<RunSummary, NormalizeError>
    where
        R: Read,
        W: Write,
        D: Write + ?Sized,
    {
        let encoding = self.input_encoding;
        let header_bytes = reader.byte_headers()?.clone();
        if header_bytes.is_empty() {
            writeln!(diagnostics, "Error: no input to process")?;
            diagnostics.flush()?;
            return Err(NormalizeError::EmptyInput);
        }
        let Ok(header) = decode_record(&header_bytes, encoding) else {
            let err = NormalizeError::HeaderDecode {
                encoding: encoding.name(),
            };
            writeln!(diagnostics, "Error: {err}")?;
            diagnostics.flush()?;
            return Err(err);
        };
        if let Some(index) = first_unencodable(&header, self.output_encoding) {
            let err = NormalizeError::HeaderEncode {
                index,
                encoding: self.output_encoding.name(),
            };
            writeln!(diagnostics, "Error: {err}")?;
            diagnostics.flush()?;
            return Err(err);
        }
        writer.write_record(&header)?;

        let mut summary = RunSummary::default();
        let mut record = csv::ByteRecord::new();
        while reader.read_byte_record(&mut record)? {
            summary.records_read += 1;
            let line = record.position().map_or(0, |pos| pos.line());

            let raw = match decode_record(&record, encoding) {
                Ok(fields) => fields,
                Err(index) => {
                    let lossy = record
                        .iter()
                        .map(|field| encoding.decode(field).0.into_owned())
                        .collect::<Vec<_>>();
                    let err = RecordError::Undecodable {
                        index,
                        encoding: encoding.name(),
                    };
                    report_discard(diagnostics, line, &lossy, &err)?;
                    summary.records_discarded += 1;
                    continue;
                }
            };

            if self.schema.needs_extension(header.len(), raw.len()) {
                let extension =
                    std::mem::take(&mut self.schema).extend(&header, &raw, self.guesser.as_ref());
                self.schema = extension.schema;
                summary.columns_added += extension.added;
                let guessed = self.schema.column_types()[self.schema.len() - extension.added..]
                    .iter()
                    .join(", ");
                warn!(
                    "Column types not specified for {} column(s) at line {line}; guessed {guessed}",
                    extension.added
                );
                writeln!(
                    diagnostics,
                    "Warning: column types not specified for {} column(s); guessed {guessed}",
                    extension.added
                )?;
            }

            match normalize_record(&self.schema, &self.options, &raw) {
                Ok(fields) => match first_unencodable(&fields, self.output_encoding) {
                    Some(index) => {
                        let err = RecordError::Unencodable {
                            index,
                            encoding: self.output_encoding.name(),
                        };
                        report_discard(diagnostics, line, &raw, &err)?;
                        summary.records_discarded += 1;
                    }
                    None => {
                        writer.write_record(&fields)?;
                        summary.records_written += 1;
                    }
                },
                Err(RecordError::UnhandledType { index, type_name }) => {
                    let err = NormalizeError::UnhandledType {
                        line,
                        index,
                        type_name,
                    };
                    error!("{err}; aborting run");
                    writeln!(
                        diagnostics,
                        "Fatal: record discarded (line {line}): <{}> (error: {err}); aborting run",
                        raw.iter().join(",")
                    )?;
                    writer.flush()?;
                    diagnostics.flush()?;
                    return Err(err);
                }
                Err(err) => {
                    report_discard(diagnostics, line, &raw, &err)?;
                    summary.records_discarded += 1;
                }
            }
        }

        writer.flush()?;
        diagnostics.flush()?;
        Ok(summary)
    }
}

fn report_discard<D: Write + ?Sized>(
    diagnostics: &mut D,
    line: u64,
    raw: &[String],
    err: &RecordError,
) -> std::io::Result<()> {
    debug!("Discarding record at line {line}: {err}");
    writeln!(
        diagnostics,
        "Record discarded (line {line}): <{}> (error: {err})",
        raw.iter().join(",")
    )
}

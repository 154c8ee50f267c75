//! Stream plumbing around the normalizer core.
//!
//! - **Delimiters**: `.tsv` paths default to tab, everything else to comma,
//!   unless a delimiter is given explicitly.
//! - **Encoding**: input fields are decoded with `encoding_rs` and rejected
//!   when they contain invalid sequences; output can be transcoded, and
//!   fields are checked against the output encoding before they are written.
//! - **stdin/stdout**: the `-` path routes through the standard streams.
//! - **Quoting**: output fields are quoted only when they need it, so a
//!   header without delimiters or quotes is written back byte for byte.

use std::{
    fs::File,
    io::{self, BufReader, BufWriter, Read, Write},
    path::Path,
};

use anyhow::{Context, Result, anyhow};
use csv::QuoteStyle;
use encoding_rs::{Encoding, UTF_8};

pub const DEFAULT_CSV_DELIMITER: u8 = b',';
pub const DEFAULT_TSV_DELIMITER: u8 = b'\t';

pub fn is_dash(path: &Path) -> bool {
    path == Path::new("-")
}

pub fn resolve_encoding(label: Option<&str>) -> Result<&'static Encoding> {
    match label {
        Some(value) => Encoding::for_label(value.trim().as_bytes())
            .ok_or_else(|| anyhow!("Unknown encoding '{value}'")),
        None => Ok(UTF_8),
    }
}

pub fn resolve_input_delimiter(path: &Path, provided: Option<u8>) -> u8 {
    provided.unwrap_or_else(|| match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("tsv") => DEFAULT_TSV_DELIMITER,
        _ => DEFAULT_CSV_DELIMITER,
    })
}

pub fn resolve_output_delimiter(path: Option<&Path>, provided: Option<u8>, fallback: u8) -> u8 {
    if let Some(delim) = provided {
        return delim;
    }
    match path.and_then(|p| p.extension()).and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("tsv") => DEFAULT_TSV_DELIMITER,
        Some(ext) if ext.eq_ignore_ascii_case("csv") => DEFAULT_CSV_DELIMITER,
        _ => fallback,
    }
}

/// Builds a header-aware reader that tolerates records of varying width.
pub fn open_csv_reader<R>(reader: R, delimiter: u8) -> csv::Reader<R>
where
    R: Read,
{
    csv::ReaderBuilder::new()
        .has_headers(true)
        .delimiter(delimiter)
        .double_quote(true)
        .flexible(true)
        .from_reader(reader)
}

pub fn open_csv_reader_from_path(path: &Path, delimiter: u8) -> Result<csv::Reader<Box<dyn Read>>> {
    let reader: Box<dyn Read> = if is_dash(path) {
        Box::new(io::stdin().lock())
    } else {
        Box::new(BufReader::new(
            File::open(path).with_context(|| format!("Opening input file {path:?}"))?,
        ))
    };
    Ok(open_csv_reader(reader, delimiter))
}

pub fn open_csv_writer<W>(writer: W, delimiter: u8) -> csv::Writer<W>
where
    W: Write,
{
    csv::WriterBuilder::new()
        .delimiter(delimiter)
        .quote_style(QuoteStyle::Necessary)
        .double_quote(true)
        .flexible(true)
        .from_writer(writer)
}

pub fn open_csv_writer_to_path(
    path: Option<&Path>,
    delimiter: u8,
    encoding: &'static Encoding,
) -> Result<csv::Writer<Box<dyn Write>>> {
    let base: Box<dyn Write> = match path {
        Some(p) if !is_dash(p) => Box::new(BufWriter::new(
            File::create(p).with_context(|| format!("Creating output file {p:?}"))?,
        )),
        _ => Box::new(io::stdout()),
    };
    let writer: Box<dyn Write> = if encoding == UTF_8 {
        base
    } else {
        Box::new(TranscodingWriter::new(base, encoding))
    };
    Ok(open_csv_writer(writer, delimiter))
}

/// Opens the diagnostics sink: a file when a path is given, stderr otherwise.
pub fn open_diagnostics(path: Option<&Path>) -> Result<Box<dyn Write>> {
    match path {
        Some(p) if !is_dash(p) => Ok(Box::new(BufWriter::new(
            File::create(p).with_context(|| format!("Creating diagnostics file {p:?}"))?,
        ))),
        _ => Ok(Box::new(io::stderr())),
    }
}

/// Decodes one field, returning `None` when it holds invalid sequences.
pub fn decode_bytes(bytes: &[u8], encoding: &'static Encoding) -> Option<String> {
    let (text, _, had_errors) = encoding.decode(bytes);
    (!had_errors).then(|| text.into_owned())
}

/// Decodes every field, or reports the index of the first undecodable one.
pub fn decode_record(
    record: &csv::ByteRecord,
    encoding: &'static Encoding,
) -> Result<Vec<String>, usize> {
    record
        .iter()
        .enumerate()
        .map(|(idx, field)| decode_bytes(field, encoding).ok_or(idx))
        .collect()
}

/// Index of the first field that `encoding` cannot represent, if any.
pub fn first_unencodable<S: AsRef<str>>(
    fields: &[S],
    encoding: &'static Encoding,
) -> Option<usize> {
    if encoding == UTF_8 {
        return None;
    }
    fields
        .iter()
        .position(|field| encoding.encode(field.as_ref()).2)
}

/// Re-encodes UTF-8 output into another encoding, holding back any
/// trailing partial character until the next write.
struct TranscodingWriter<W: Write> {
    inner: W,
    encoding: &'static Encoding,
    pending: Vec<u8>,
}

impl<W: Write> TranscodingWriter<W> {
    fn new(inner: W, encoding: &'static Encoding) -> Self {
        Self {
            inner,
            encoding,
            pending: Vec::new(),
        }
    }

    fn drain_complete(&mut self) -> io::Result<()> {
        let valid_up_to = match std::str::from_utf8(&self.pending) {
            Ok(_) => self.pending.len(),
            Err(err) if err.error_len().is_some() => {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidData,
                    "Invalid UTF-8 sequence in output stream",
                ));
            }
            Err(err) => err.valid_up_to(),
        };
        if valid_up_to == 0 {
            return Ok(());
        }
        let chunk: Vec<u8> = self.pending.drain(..valid_up_to).collect();
        let text = std::str::from_utf8(&chunk)
            .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))?;
        let (encoded, _, had_errors) = self.encoding.encode(text);
        if had_errors {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("Failed to encode output as {}", self.encoding.name()),
            ));
        }
        self.inner.write_all(&encoded)
    }
}

impl<W: Write> Write for TranscodingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.pending.extend_from_slice(buf);
        self.drain_complete()?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.drain_complete()?;
        if !self.pending.is_empty() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "Incomplete UTF-8 sequence at end of output stream",
            ));
        }
        self.inner.flush()
    }
}

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::schema::GuessStrategy;

#[derive(Debug, Parser)]
#[command(author, version, about = "Normalize CSV exports by column type", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Validate and reformat every column according to its declared type
    Normalize(NormalizeArgs),
    /// Guess column types from the header and first record into a config file
    Probe(ProbeArgs),
}

#[derive(Debug, Args)]
pub struct NormalizeArgs {
    /// Input CSV file (`-` for stdin)
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// Output CSV file (stdout if omitted)
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,
    /// File receiving discarded-record diagnostics (stderr if omitted)
    #[arg(short = 'd', long = "diagnostics")]
    pub diagnostics: Option<PathBuf>,
    /// YAML config describing column types and timestamp settings
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,
    /// Column types in column order, e.g. `timestamp,string,zip,name,duration,total`
    #[arg(short = 't', long = "types", action = clap::ArgAction::Append)]
    pub types: Vec<String>,
    /// CSV delimiter character for reading input
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Delimiter to use for output (defaults to input delimiter)
    #[arg(long = "output-delimiter", value_parser = parse_delimiter)]
    pub output_delimiter: Option<u8>,
    /// Hours added to every timestamp column (may be negative)
    #[arg(long = "timestamp-offset", allow_hyphen_values = true)]
    pub timestamp_offset: Option<i64>,
    /// chrono strftime pattern for timestamp output (`s` for ISO-8601)
    #[arg(long = "timestamp-format")]
    pub timestamp_format: Option<String>,
    /// How to type columns that were not declared
    #[arg(long = "guess", value_enum, default_value = "unmodified")]
    pub guess: GuessStrategy,
    /// Character encoding of the input file (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
    /// Character encoding for the output file/stdout (defaults to utf-8)
    #[arg(long = "output-encoding")]
    pub output_encoding: Option<String>,
}

#[derive(Debug, Args)]
pub struct ProbeArgs {
    /// Input CSV file to inspect
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// Destination YAML config file
    #[arg(short = 'c', long = "config")]
    pub config: PathBuf,
    /// CSV delimiter character (supports ',', 'tab', ';', '|')
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// How to type the sampled columns
    #[arg(long = "guess", value_enum, default_value = "heuristic")]
    pub guess: GuessStrategy,
    /// Character encoding of the input file (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
}

pub fn parse_delimiter(value: &str) -> Result<u8, String> {
    match value {
        "tab" | "\t" => Ok(b'\t'),
        "comma" | "," => Ok(b','),
        "|" | "pipe" => Ok(b'|'),
        ";" | "semicolon" => Ok(b';'),
        other => {
            let mut chars = other.chars();
            let first = chars
                .next()
                .ok_or_else(|| "Delimiter cannot be empty".to_string())?;
            if chars.next().is_some() {
                return Err("Delimiter must be a single character".to_string());
            }
            if !first.is_ascii() {
                return Err("Delimiter must be ASCII".to_string());
            }
            Ok(first as u8)
        }
    }
}

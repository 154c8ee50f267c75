pub mod cli;
pub mod column;
pub mod config;
pub mod error;
pub mod io_utils;
pub mod normalizer;
pub mod schema;
pub mod transform;

use std::{env, sync::OnceLock};

use anyhow::{Context, Result, bail};
use clap::Parser;
use log::{LevelFilter, debug, info, warn};

use crate::{
    cli::{Cli, Commands, NormalizeArgs, ProbeArgs},
    config::NormalizeConfig,
    normalizer::Normalizer,
    schema::Schema,
};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("csv_normalize", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.command {
        Commands::Normalize(args) => handle_normalize(&args),
        Commands::Probe(args) => handle_probe(&args),
    }
}

fn resolve_config(args: &NormalizeArgs) -> Result<NormalizeConfig> {
    let mut config = match &args.config {
        Some(path) => NormalizeConfig::load(path)
            .with_context(|| format!("Loading config from {path:?}"))?,
        None => NormalizeConfig {
            delimiter: io_utils::resolve_input_delimiter(&args.input, None),
            ..NormalizeConfig::default()
        },
    };
    if !args.types.is_empty() {
        config.columns = column::parse_column_types(&args.types)?;
    }
    if let Some(delimiter) = args.delimiter {
        config.delimiter = delimiter;
    }
    config.output_delimiter = Some(io_utils::resolve_output_delimiter(
        args.output.as_deref(),
        args.output_delimiter.or(config.output_delimiter),
        config.delimiter,
    ));
    if let Some(offset) = args.timestamp_offset {
        config.timestamp_offset_hours = offset;
    }
    if let Some(format) = &args.timestamp_format {
        config.timestamp_format = format.clone();
    }
    Ok(config)
}

fn handle_normalize(args: &NormalizeArgs) -> Result<()> {
    let config = resolve_config(args)?;
    let options = config.transform_options()?;
    let schema = config.schema();
    let input_encoding = io_utils::resolve_encoding(args.input_encoding.as_deref())?;
    let output_encoding = io_utils::resolve_encoding(args.output_encoding.as_deref())?;

    info!(
        "Normalizing '{}' -> {} (delimiter '{}', output '{}', {} declared column type(s))",
        args.input.display(),
        args.output
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "stdout".into()),
        printable_delimiter(config.delimiter),
        printable_delimiter(config.output_delimiter()),
        schema.len()
    );
    debug!(
        "Timestamp offset {}h, format '{}'",
        options.timestamp_offset_hours, options.timestamp_format
    );
    for (idx, column_type) in schema.unrecognized() {
        warn!(
            "Column {} has unrecognized type '{column_type}'; the run will stop at the first record",
            idx + 1
        );
    }

    let mut reader = io_utils::open_csv_reader_from_path(&args.input, config.delimiter)?;
    let mut writer = io_utils::open_csv_writer_to_path(
        args.output.as_deref(),
        config.output_delimiter(),
        output_encoding,
    )?;
    let mut diagnostics = io_utils::open_diagnostics(args.diagnostics.as_deref())?;

    let mut normalizer = Normalizer::new(schema, options)
        .with_guesser(args.guess.guesser())
        .with_input_encoding(input_encoding)
        .with_output_encoding(output_encoding);
    let summary = normalizer
        .run(&mut reader, &mut writer, diagnostics.as_mut())
        .with_context(|| format!("Normalizing {:?}", args.input))?;

    info!(
        "Read {} record(s): {} written, {} discarded",
        summary.records_read, summary.records_written, summary.records_discarded
    );
    if summary.columns_added > 0 {
        info!(
            "Guessed {} column type(s): {}",
            summary.columns_added,
            normalizer
                .schema()
                .column_types()
                .iter()
                .map(|ty| ty.to_string())
                .collect::<Vec<_>>()
                .join(",")
        );
    }
    Ok(())
}

fn handle_probe(args: &ProbeArgs) -> Result<()> {
    let delimiter = io_utils::resolve_input_delimiter(&args.input, args.delimiter);
    let encoding = io_utils::resolve_encoding(args.input_encoding.as_deref())?;
    info!(
        "Probing '{}' with delimiter '{}'",
        args.input.display(),
        printable_delimiter(delimiter)
    );
    let mut reader = io_utils::open_csv_reader_from_path(&args.input, delimiter)?;
    let header_bytes = reader.byte_headers()?.clone();
    if header_bytes.is_empty() {
        bail!("No input to probe in {:?}", args.input);
    }
    let header = io_utils::decode_record(&header_bytes, encoding).map_err(|idx| {
        anyhow::anyhow!(
            "Header column {} is not valid {} text",
            idx + 1,
            encoding.name()
        )
    })?;
    let mut record = csv::ByteRecord::new();
    let sample = if reader.read_byte_record(&mut record)? {
        match io_utils::decode_record(&record, encoding) {
            Ok(fields) => fields,
            Err(idx) => {
                warn!(
                    "Sample record column {} is not valid {} text; guessing from the header only",
                    idx + 1,
                    encoding.name()
                );
                Vec::new()
            }
        }
    } else {
        Vec::new()
    };

    let extension = Schema::default().extend(&header, &sample, args.guess.guesser().as_ref());
    let config = NormalizeConfig {
        columns: extension.schema.column_types().to_vec(),
        delimiter,
        ..NormalizeConfig::default()
    };
    config
        .save(&args.config)
        .with_context(|| format!("Writing config to {:?}", args.config))?;
    info!(
        "Guessed types for {} column(s) written to {:?}",
        extension.added, args.config
    );
    Ok(())
}

pub(crate) fn printable_delimiter(delimiter: u8) -> String {
    match delimiter {
        b',' => ",".to_string(),
        b'\t' => "\\t".to_string(),
        b'\n' => "\\n".to_string(),
        other => (other as char).to_string(),
    }
}

pub mod terminal;

use std::io::Write;

use sentimeter_core::Envelope;
use serde_json::Value;

use crate::cli::OutputFormat;
use crate::error::CliError;

pub fn render<W: Write>(
    out: &mut W,
    envelope: &Envelope<Value>,
    table: Option<&str>,
    format: OutputFormat,
    pretty: bool,
) -> Result<(), CliError> {
    match format {
        OutputFormat::Json => {
            let payload = if pretty {
                serde_json::to_string_pretty(envelope)?
            } else {
                serde_json::to_string(envelope)?
            };
            writeln!(out, "{payload}")?;
        }
        OutputFormat::Table => render_table(out, envelope, table)?,
    }

    Ok(())
}

fn render_table<W: Write>(
    out: &mut W,
    envelope: &Envelope<Value>,
    table: Option<&str>,
) -> Result<(), CliError> {
    match table {
        Some(text) => write!(out, "{text}")?,
        None => {
            for line in serde_json::to_string_pretty(&envelope.data)?.lines() {
                writeln!(out, "  {line}")?;
            }
        }
    }

    let meta = &envelope.meta;
    let sources = meta
        .source_chain
        .iter()
        .map(|source| source.as_str())
        .collect::<Vec<_>>()
        .join(",");
    writeln!(out)?;
    writeln!(
        out,
        "sources: {sources} · latency: {}ms · cache_hit: {} · request: {}",
        meta.latency_ms, meta.cache_hit, meta.request_id
    )?;

    for warning in &meta.warnings {
        writeln!(out, "warning: {warning}")?;
    }
    for error in &envelope.errors {
        writeln!(out, "error: {} ({})", error.message, error.code)?;
    }

    Ok(())
}

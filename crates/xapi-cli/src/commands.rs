//! Subcommand implementations.
//!
//! Commands write their result to the sink they are given, so they run the
//! same against standard output and against a buffer in tests.

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;
use xapi_core::{XapiOptions, XapiRoot, parse_reader, to_json_string, to_json_string_pretty, write};

use crate::config::Command;

/// Runs a command, sending output to a file when one is named and to `stdout`
/// otherwise.
pub fn run<W: Write>(command: &Command, options: &XapiOptions, stdout: W) -> Result<()> {
    match command {
        Command::Check { input } => {
            let root = read_root(input.as_deref(), options)?;
            let mut stdout = stdout;
            summarize(&root, &mut stdout)?;
            stdout.flush()?;
        }
        Command::Format { input, output } => {
            let root = read_root(input.as_deref(), options)?;
            with_output(output.as_ref(), stdout, |sink| {
                write(sink, &root, options).map_err(Into::into)
            })?;
        }
        Command::ToJson {
            input,
            output,
            compact,
        } => {
            let root = read_root(input.as_deref(), options)?;
            let json = if *compact {
                to_json_string(&root)?
            } else {
                to_json_string_pretty(&root)?
            };
            with_output(output.as_ref(), stdout, |sink| {
                sink.write_all(json.as_bytes())?;
                sink.write_all(b"\n")?;
                Ok(())
            })?;
        }
    }
    Ok(())
}

/// Parses a file, or standard input when the path is absent or `-`.
pub fn read_root(input: Option<&Path>, options: &XapiOptions) -> Result<XapiRoot> {
    match input {
        Some(path) if path != Path::new("-") => {
            let file = File::open(path)
                .with_context(|| format!("failed to open {}", path.display()))?;
            let root = parse_reader(BufReader::new(file), options)
                .with_context(|| format!("failed to parse {}", path.display()))?;
            info!(input = %path.display(), "parsed document");
            Ok(root)
        }
        _ => {
            let root = parse_reader(io::stdin().lock(), options)
                .context("failed to parse standard input")?;
            info!("parsed document from standard input");
            Ok(root)
        }
    }
}

/// Writes a human-readable overview of a parsed root.
pub fn summarize<W: Write + ?Sized>(root: &XapiRoot, out: &mut W) -> io::Result<()> {
    writeln!(out, "parameters: {}", root.parameter_size())?;
    for parameter in root.iter_parameters() {
        let column_type = parameter.effective_type();
        match &parameter.value {
            Some(value) => writeln!(out, "  {} ({}) = {}", parameter.id, column_type, value)?,
            None => writeln!(out, "  {} ({})", parameter.id, column_type)?,
        }
    }

    writeln!(out, "datasets: {}", root.dataset_size())?;
    for dataset in root.iter_datasets() {
        writeln!(
            out,
            "  {}: {} columns, {} const columns, {} rows",
            dataset.id,
            dataset.column_size(),
            dataset.const_column_size(),
            dataset.row_size()
        )?;
        for column in dataset.iter_columns() {
            writeln!(out, "    {} {}({})", column.id, column.column_type, column.size)?;
        }
    }
    Ok(())
}

fn with_output<W, F>(output: Option<&PathBuf>, stdout: W, emit: F) -> Result<()>
where
    W: Write,
    F: FnOnce(&mut dyn Write) -> Result<()>,
{
    match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            let mut sink = BufWriter::new(file);
            emit(&mut sink)?;
            sink.flush()?;
            info!(output = %path.display(), "wrote output");
        }
        None => {
            let mut sink = stdout;
            emit(&mut sink)?;
            sink.flush()?;
        }
    }
    Ok(())
}

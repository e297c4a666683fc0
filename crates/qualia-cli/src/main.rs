//! qualia CLI
//!
//! Conditionally comments and uncomments qualified blocks in files such as
//! dotfiles, so one copy can serve several machines.

mod cli;
mod error;

use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, BufWriter, Read, Write};
use std::path::Path;

use clap::Parser;
use colored::Colorize;
use tempfile::NamedTempFile;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use cli::Cli;
use error::{CliError, Result};

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose);
    tracing::debug!(
        qualities = ?cli.active_qualities().collect::<Vec<_>>(),
        "Starting qualia"
    );

    let reader = open_input(&cli)?;
    match &cli.output {
        Some(path) => write_replacing(path, |writer| process(&cli, reader, writer)),
        None => process(&cli, reader, io::stdout().lock()),
    }
}

fn process(cli: &Cli, reader: impl BufRead, writer: impl Write) -> Result<()> {
    if cli.list {
        list_blocks(reader, writer)
    } else {
        qualia_blocks::qualify(cli.active_qualities(), reader, writer)?;
        Ok(())
    }
}

/// Installs a stderr subscriber when `--verbose` is given or `RUST_LOG` is set.
/// Stdout carries the rewritten text, so logs never go there.
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        match EnvFilter::try_from_default_env() {
            Ok(filter) => filter,
            Err(_) => return,
        }
    };
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(io::stderr)
        .finish();
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("{}: tracing subscriber already set", "warning".yellow().bold());
    }
}

fn open_input(cli: &Cli) -> Result<Box<dyn BufRead>> {
    match &cli.input {
        Some(path) => {
            let file = File::open(path).map_err(|e| CliError::file(path, e))?;
            Ok(Box::new(BufReader::new(file)))
        }
        None => Ok(Box::new(io::stdin().lock())),
    }
}

/// Writes to a temp file next to `path`, then renames it over `path`.
///
/// `path` is untouched until the output is complete, so it may also be the
/// input file. An unclosed block still replaces the file since its output
/// is whole; any other error leaves the original in place. Permissions of
/// an existing file are kept.
fn write_replacing<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut BufWriter<&File>) -> Result<()>,
{
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let temp = NamedTempFile::new_in(dir).map_err(|e| CliError::file(dir, e))?;
    if let Ok(meta) = fs::metadata(path) {
        temp.as_file()
            .set_permissions(meta.permissions())
            .map_err(|e| CliError::file(temp.path(), e))?;
    }

    let result = {
        let mut writer = BufWriter::new(temp.as_file());
        let result = write(&mut writer);
        match writer.flush() {
            Ok(()) => result,
            Err(e) => result.and(Err(e.into())),
        }
    };

    match result {
        Ok(()) | Err(CliError::Blocks(qualia_blocks::Error::UnclosedBlock { .. })) => {
            tracing::debug!(path = %path.display(), "Replacing output file");
            temp.persist(path).map_err(|e| CliError::file(path, e.error))?;
            result
        }
        Err(e) => Err(e),
    }
}

/// Prints one line per closed block: line range, quality and content state.
fn list_blocks(mut reader: impl Read, mut writer: impl Write) -> Result<()> {
    let mut content = Vec::new();
    reader.read_to_end(&mut content)?;

    for block in qualia_blocks::parse_blocks(&content) {
        writeln!(
            writer,
            "{}-{}\t{}\t{}",
            block.start_line,
            block.end_line,
            block.attrs.quality.escape_ascii(),
            block.state()
        )?;
    }
    writer.flush()?;
    Ok(())
}

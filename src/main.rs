//! Main entry point for the lhunzip CLI application.
//!
//! Prints entries of a ZIP archive to stdout, found by name or by
//! position, reading only the local file headers.

use std::io::{self, Write};

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use lhunzip::{ArchiveSource, Cli, ExtractedEntry, LocalArchive, ZipScanner};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli);

    let mut scanner = ZipScanner::new(LocalArchive::new(&cli.file));

    if cli.count {
        println!("{}", scanner.count_entries()?);
        return Ok(());
    }

    let entry = if let Some(index) = cli.index {
        scanner
            .extract_by_index(index)?
            .with_context(|| format!("{}: no entry at index {}", cli.file, index))?
    } else if let Some(ref name) = cli.name {
        let offset = scanner
            .offset_of_name(name, cli.match_flags(), cli.after)?
            .with_context(|| format!("{}: no entry matching {}", cli.file, name))?;
        scanner.extract_at(offset).with_context(|| {
            format!(
                "Can't extract {} from {}. Maybe the file is corrupted?",
                name, cli.file
            )
        })?
    } else {
        // Nothing to print: list instead
        return list_entries(&scanner);
    };

    if cli.list {
        list_entries(&scanner)?;
    }

    write_entry(entry, cli.strict)
}

/// Install the stderr log subscriber.
///
/// `RUST_LOG` wins over `-v`/`-q`.
fn init_logging(cli: &Cli) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli.log_level()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

/// Print a table of every entry in the archive.
fn list_entries<S: ArchiveSource>(scanner: &ZipScanner<S>) -> Result<()> {
    let entries = scanner.entries()?;

    println!(
        "{:>10}  {:>10}  {:>10}  {:>5}  Name",
        "Offset", "Length", "Date", "Time"
    );
    println!("{}", "-".repeat(60));

    let mut total = 0u64;
    let mut file_count = 0usize;
    for entry in &entries {
        let (year, month, day) = entry.header.mod_date();
        let (hour, minute, _second) = entry.header.mod_time();

        println!(
            "{:>10}  {:>10}  {:04}-{:02}-{:02}  {:02}:{:02}  {}",
            entry.offset,
            entry.header.uncompressed_size,
            year,
            month,
            day,
            hour,
            minute,
            entry.name
        );

        if !entry.is_directory() {
            total += u64::from(entry.header.uncompressed_size);
            file_count += 1;
        }
    }

    println!("{}", "-".repeat(60));
    println!("{:>10}  {:>10}  {:>17}  {} files", "", total, "", file_count);

    Ok(())
}

/// Send an entry's bytes to stdout.
fn write_entry(entry: ExtractedEntry, strict: bool) -> Result<()> {
    let data = if strict {
        entry.into_verified()?
    } else {
        entry.data
    };

    let mut stdout = io::stdout().lock();
    stdout.write_all(&data)?;
    stdout.flush()?;

    Ok(())
}

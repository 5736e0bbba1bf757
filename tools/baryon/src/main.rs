//! `baryon` - ELF header and program header inspector.

mod cli;
mod dump;
mod logger;
mod report;

use std::io::{self, Write};

use anyhow::{Context, Result};
use baryon_elf::ElfImage;
use clap::Parser;
use log::LevelFilter;

use crate::cli::Cli;
use crate::report::Sections;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.quiet {
        LevelFilter::Error
    } else if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    logger::init(level).context("failed to install logger")?;

    let data = std::fs::read(&cli.file)
        .with_context(|| format!("failed to read `{}`", cli.file.display()))?;

    let stdout = io::stdout();
    let mut out = stdout.lock();

    if cli.dump {
        dump::hex_dump(&mut out, &data).context("failed to write hex dump")?;
        writeln!(&mut out)?;
    }

    let image = ElfImage::parse(&data)
        .map_err(|err| anyhow::anyhow!("{err}"))
        .with_context(|| format!("failed to decode `{}`", cli.file.display()))?;

    report::render(&mut out, &image, selected_sections(&cli))
        .context("failed to write report")?;

    Ok(())
}

/// Map the section flags to the report selection. With no explicit flags the
/// report covers the header and the program header table.
fn selected_sections(cli: &Cli) -> Sections {
    let mut sections = Sections::empty();
    if cli.header {
        sections |= Sections::HEADER;
    }
    if cli.segments {
        sections |= Sections::SEGMENTS;
    }
    if cli.sections {
        sections |= Sections::SECTION_HEADERS | Sections::SECTION_DATA;
    }
    if sections.is_empty() {
        sections = Sections::HEADER | Sections::SEGMENTS;
    }
    sections
}

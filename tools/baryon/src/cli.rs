//! Command-line interface definitions for baryon.

use std::path::PathBuf;

use clap::Parser;

/// ELF header and program header inspector.
#[derive(Parser)]
#[command(name = "baryon", version, about)]
pub struct Cli {
    /// ELF file to inspect.
    pub file: PathBuf,

    /// Render the ELF header section.
    #[arg(long)]
    pub header: bool,

    /// Render the program header table section.
    #[arg(long)]
    pub segments: bool,

    /// Render the section header and program data views (placeholders).
    #[arg(long)]
    pub sections: bool,

    /// Hex dump the file image before the report.
    #[arg(long)]
    pub dump: bool,

    /// Suppress warnings; show only errors.
    #[arg(long, short = 'q', conflicts_with = "verbose")]
    pub quiet: bool,

    /// Enable debug output.
    #[arg(long, short = 'v')]
    pub verbose: bool,
}

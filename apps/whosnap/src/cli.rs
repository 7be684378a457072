//! Command-line overrides for the configuration file.

use std::path::PathBuf;

use clap::Parser;
use whosnap_output::OutputFormat;

/// Save the latest /who player list from a game log.
#[derive(Debug, Parser)]
#[command(version)]
pub struct Args {
    /// Configuration file (defaults to the per-user config location)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Game log to read
    #[arg(short, long)]
    pub log_file: Option<PathBuf>,
    /// Directory receiving the snapshot file
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,
    /// Output content: raw, names or json
    #[arg(short, long)]
    pub format: Option<OutputFormat>,
    /// Save the block even when it is not from today
    #[arg(long)]
    pub no_date_check: bool,
    /// Seconds to wait before exiting
    #[arg(long)]
    pub linger: Option<u32>,
}

//! One snapshot run: read the log, pick the latest block, check its date,
//! and write it out.
//!
//! Every failure ends in a [`RunOutcome`]; nothing here aborts the process.

use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use whosnap_output::{
    OutputError, OutputFormat, ensure_output_dir, expand_home, render, snapshot_file_name,
    write_snapshot,
};
use whosnap_roster::{Extraction, Recency, RosterParser};

use crate::config::Config;

/// How a run ended.
#[derive(Debug)]
pub enum RunOutcome {
    /// Snapshot written to `path`. `summary` is the block's end marker line.
    Saved { path: PathBuf, summary: String },
    /// No complete block in the log, or the log could not be read.
    NoBlock,
    /// A block was found but no player names could be parsed from it.
    NoPlayers,
    /// The block is from another day.
    Stale { raw: String },
    /// The block's timestamp is missing or unparseable.
    Undecidable { reason: String },
    /// The configured game name or line patterns are invalid.
    Misconfigured { reason: String },
    /// The snapshot could not be written.
    WriteFailed { reason: String },
}

/// Runs one extraction pass. `now` is the local time the run started.
pub fn run(config: &Config, now: NaiveDateTime) -> RunOutcome {
    let parser = match RosterParser::new(&config.game, &config.line_format) {
        Ok(p) => p,
        Err(e) => {
            tracing::error!(error = %e, "invalid log format configuration");
            return RunOutcome::Misconfigured {
                reason: e.to_string(),
            };
        }
    };

    if config.log_file.is_empty() {
        tracing::error!("no log file configured");
        return RunOutcome::NoBlock;
    }
    let log_file = expand_home(&config.log_file);

    let block = match parser.extract_file(&log_file) {
        Ok(Extraction::Found(block)) => block,
        Ok(Extraction::Unterminated { lines }) => {
            tracing::warn!(lines, "latest block has no start marker");
            return RunOutcome::NoBlock;
        }
        Ok(Extraction::NotFound) => {
            tracing::warn!(path = %log_file.display(), "no blocks found in the log file");
            return RunOutcome::NoBlock;
        }
        Err(e) => {
            tracing::error!(error = %e, "error extracting block");
            return RunOutcome::NoBlock;
        }
    };

    let (snapshot, recency) = parser.snapshot(block, now.date());

    match &recency {
        Recency::Recent { raw, .. } => {
            tracing::info!(timestamp = %raw, "block is from today");
        }
        Recency::Stale { raw, at } => {
            tracing::warn!(
                timestamp = %raw,
                date = %at.date(),
                today = %now.date(),
                "block is not from today"
            );
            if config.require_today {
                return RunOutcome::Stale { raw: raw.clone() };
            }
        }
        Recency::Undecidable(e) => {
            tracing::warn!(error = %e, "could not determine block date");
            if config.require_today {
                return RunOutcome::Undecidable {
                    reason: e.to_string(),
                };
            }
        }
    }

    if config.output_format == OutputFormat::Names && snapshot.players.is_empty() {
        tracing::warn!("no player names parsed from block");
        return RunOutcome::NoPlayers;
    }

    let contents = match render(&snapshot, config.output_format) {
        Ok(c) => c,
        Err(e) => {
            tracing::error!(error = %e, "failed to render snapshot");
            return RunOutcome::WriteFailed {
                reason: e.to_string(),
            };
        }
    };

    let count = config.include_count_in_filename.then_some(snapshot.count);
    let file_name = snapshot_file_name(now, count);
    match save(&expand_home(&config.output_dir), &file_name, &contents) {
        Ok(path) => RunOutcome::Saved {
            path,
            summary: snapshot.block.end_line().to_string(),
        },
        Err(e) => {
            tracing::error!(error = %e, "error saving snapshot");
            RunOutcome::WriteFailed {
                reason: e.to_string(),
            }
        }
    }
}

fn save(dir: &Path, file_name: &str, contents: &str) -> Result<PathBuf, OutputError> {
    let dir = ensure_output_dir(dir)?;
    write_snapshot(&dir, file_name, contents)
}

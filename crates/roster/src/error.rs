//! Roster error types.

use std::path::PathBuf;

/// Errors produced while reading or interpreting a who-list snapshot.
#[derive(Debug, thiserror::Error)]
pub enum RosterError {
    #[error("failed to read log file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid line pattern `{pattern}`: {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("line pattern `{0}` has no capture group for the name")]
    MissingCapture(String),

    #[error("block has no bracketed timestamp")]
    MissingTimestamp,

    #[error("unrecognized timestamp: {0}")]
    Timestamp(String),
}

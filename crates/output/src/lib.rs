//! Snapshot output: directory preparation, file naming, rendering and writing.
//!
//! One run produces at most one file in the output directory.

mod paths;
mod render;
mod write;

pub use paths::{ensure_output_dir, expand_home};
pub use render::{OutputFormat, render};
pub use write::{snapshot_file_name, write_snapshot};

/// Errors produced while writing a snapshot.
#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    #[error("failed to create output directory {path}: {source}")]
    CreateDir {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Home directory of the current user, or the temp directory when the
/// environment does not name one.
fn home_dir() -> std::path::PathBuf {
    let var = if cfg!(windows) { "USERPROFILE" } else { "HOME" };
    std::env::var_os(var)
        .filter(|v| !v.is_empty())
        .map_or_else(std::env::temp_dir, std::path::PathBuf::from)
}

//! Timestamped snapshot files.

use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use whosnap_roster::PlayerCount;

use crate::OutputError;

/// Builds the output file name for a run started at `now`.
///
/// `2025-03-16_20-45-30.txt`, or `2025-03-16_20-45-30_12_players.txt` when
/// a count is given.
pub fn snapshot_file_name(now: NaiveDateTime, count: Option<PlayerCount>) -> String {
    let stamp = now.format("%Y-%m-%d_%H-%M-%S");
    match count {
        Some(count) => format!("{stamp}_{count}_players.txt"),
        None => format!("{stamp}.txt"),
    }
}

/// Writes `contents` to `dir/file_name`, replacing any existing file.
pub fn write_snapshot(dir: &Path, file_name: &str, contents: &str) -> Result<PathBuf, OutputError> {
    let path = dir.join(file_name);
    let write_err = |source| OutputError::Write {
        path: path.clone(),
        source,
    };

    let mut file = std::fs::File::create(&path).map_err(write_err)?;
    file.write_all(contents.as_bytes()).map_err(write_err)?;
    file.flush().map_err(write_err)?;

    tracing::info!(path = %path.display(), bytes = contents.len(), "snapshot saved");
    Ok(path)
}

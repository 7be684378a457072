//! Output directory resolution and preparation.

use std::path::{Path, PathBuf};

use crate::OutputError;

/// Ensures the output directory exists, creating it if necessary.
pub fn ensure_output_dir(path: &Path) -> Result<PathBuf, OutputError> {
    if !path.is_dir() {
        std::fs::create_dir_all(path).map_err(|source| OutputError::CreateDir {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::info!(path = %path.display(), "created output directory");
    }
    Ok(path.to_path_buf())
}

/// Expands a leading `~` to the user's home directory.
///
/// Both `~/` and `~\\` are accepted as the separator; `~name` forms are left
/// untouched.
pub fn expand_home(path: &str) -> PathBuf {
    match path.strip_prefix('~') {
        Some("") => crate::home_dir(),
        Some(rest) if rest.starts_with(['/', '\\']) => crate::home_dir().join(&rest[1..]),
        _ => PathBuf::from(path),
    }
}

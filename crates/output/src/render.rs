//! Snapshot rendering.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use whosnap_roster::Snapshot;

use crate::OutputError;

/// Content written to the output file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// The block exactly as extracted, lines joined with `\n`.
    Raw,
    /// One player name per line.
    #[default]
    Names,
    /// Timestamp, declared count and names as a JSON document.
    Json,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Raw => "raw",
            Self::Names => "names",
            Self::Json => "json",
        })
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "raw" => Ok(Self::Raw),
            "names" => Ok(Self::Names),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown output format '{other}' (expected raw, names or json)")),
        }
    }
}

/// Renders `snapshot` in the requested format.
pub fn render(snapshot: &Snapshot, format: OutputFormat) -> Result<String, OutputError> {
    Ok(match format {
        OutputFormat::Raw => snapshot.block.text(),
        OutputFormat::Names => snapshot.players.join("\n"),
        OutputFormat::Json => serde_json::to_string_pretty(snapshot)?,
    })
}

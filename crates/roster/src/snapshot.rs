//! Parsed view of one who-list block.

use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Serialize, Serializer};

use crate::RosterError;
use crate::block::{
    Block, BlockMarkers, DEFAULT_GAME, Extraction, extract_from_file, extract_last_block,
};
use crate::players::{LineFormat, NameExtractor, PlayerCount, player_count};
use crate::recency::{Recency, check_recency};

/// Block plus the fields derived from it.
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    /// Bracketed timestamp text of the start marker.
    pub timestamp_raw: Option<String>,
    pub timestamp: Option<NaiveDateTime>,
    /// Count declared by the end marker, `null` when unparseable.
    #[serde(rename = "declared_count", serialize_with = "serialize_count")]
    pub count: PlayerCount,
    pub players: Vec<String>,
    #[serde(skip)]
    pub block: Block,
}

fn serialize_count<S: Serializer>(count: &PlayerCount, serializer: S) -> Result<S::Ok, S::Error> {
    count.known().serialize(serializer)
}

/// Markers and name rules for one game client's log layout.
#[derive(Debug, Clone)]
pub struct RosterParser {
    markers: BlockMarkers,
    names: NameExtractor,
}

impl RosterParser {
    pub fn new(game: &str, format: &LineFormat) -> Result<Self, RosterError> {
        Ok(Self {
            markers: BlockMarkers::for_game(game)?,
            names: NameExtractor::new(format)?,
        })
    }

    pub fn extract<S: AsRef<str>>(&self, lines: &[S]) -> Extraction {
        extract_last_block(lines, &self.markers)
    }

    pub fn extract_file(&self, path: &Path) -> Result<Extraction, RosterError> {
        extract_from_file(path, &self.markers)
    }

    /// Derives count, names and timestamp from `block`.
    ///
    /// Returns the snapshot along with its recency relative to `today`.
    pub fn snapshot(&self, block: Block, today: NaiveDate) -> (Snapshot, Recency) {
        let recency = check_recency(&block, today);
        let count = player_count(&block);
        let players = self.names.player_names(&block);

        if let Some(declared) = count.known() {
            if declared as usize != players.len() {
                tracing::debug!(
                    declared,
                    parsed = players.len(),
                    "player count differs from parsed names"
                );
            }
        }

        let snapshot = Snapshot {
            timestamp_raw: recency.raw().map(str::to_string),
            timestamp: recency.timestamp(),
            count,
            players,
            block,
        };
        (snapshot, recency)
    }
}

impl Default for RosterParser {
    fn default() -> Self {
        Self {
            markers: BlockMarkers::for_game(DEFAULT_GAME)
                .expect("default game markers are valid"),
            names: NameExtractor::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOG: &str = "\
[Sun Mar 16 20:40:00 2025] You say, 'hail'
[Sun Mar 16 20:45:30 2025] Players on EverQuest:
[Sun Mar 16 20:45:30 2025] ---------------------------
[Sun Mar 16 20:45:30 2025] [60 Cleric] Bob (Dwarf) <Guild>
[Sun Mar 16 20:45:30 2025]  AFK [ANONYMOUS] Shade
[Sun Mar 16 20:45:30 2025] [ANONYMOUS] Whisper
[Sun Mar 16 20:45:30 2025] There are 3 players in North Freeport.
[Sun Mar 16 20:46:00 2025] You have entered East Freeport.";

    #[test]
    fn snapshot_from_log() {
        let parser = RosterParser::default();
        let lines: Vec<&str> = LOG.lines().collect();
        let block = parser.extract(&lines).into_block().unwrap();
        let today = NaiveDate::from_ymd_opt(2025, 3, 16).unwrap();

        let (snapshot, recency) = parser.snapshot(block, today);
        assert!(recency.is_recent());
        assert_eq!(snapshot.players, vec!["Bob", "Shade", "Whisper"]);
        assert_eq!(snapshot.count, PlayerCount::Known(3));
        assert_eq!(
            snapshot.timestamp_raw.as_deref(),
            Some("Sun Mar 16 20:45:30 2025")
        );
        assert_eq!(snapshot.block.lines().len(), 6);
    }

    #[test]
    fn snapshot_of_stale_block_still_parses_fields() {
        let parser = RosterParser::default();
        let lines: Vec<&str> = LOG.lines().collect();
        let block = parser.extract(&lines).into_block().unwrap();
        let today = NaiveDate::from_ymd_opt(2025, 3, 17).unwrap();

        let (snapshot, recency) = parser.snapshot(block, today);
        assert!(!recency.is_recent());
        assert_eq!(snapshot.players.len(), 3);
    }

    #[test]
    fn parser_for_other_game() {
        let parser = RosterParser::new("Project 1999", &LineFormat::default()).unwrap();
        let lines = [
            "[Sun Mar 16 20:45:30 2025] Players on Project 1999:",
            "---",
            "[1 Rogue] Tiny (Halfling)",
            "There are 1 players in Qeynos.",
        ];
        let block = parser.extract(&lines).into_block().unwrap();
        assert_eq!(block.lines().len(), 4);
    }

    #[test]
    fn snapshot_with_unknown_count() {
        let block = Block::from_lines([
            "[Sun Mar 16 20:45:30 2025] Players on EverQuest:",
            "---",
            "There are lots of players in EverQuest.",
        ])
        .unwrap();
        let (snapshot, _) =
            RosterParser::default().snapshot(block, NaiveDate::from_ymd_opt(2025, 3, 16).unwrap());
        assert_eq!(snapshot.count, PlayerCount::Unknown);
        assert_eq!(snapshot.count.known(), None);
        assert!(snapshot.players.is_empty());
    }
}

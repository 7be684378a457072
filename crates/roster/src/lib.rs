//! Who-list snapshot extraction from game client logs.
//!
//! Finds the most recent `/who` block in an append-only log by scanning
//! backwards, parses the declared player count and the player names out of
//! it, and checks whether its timestamp falls on the current date.

pub mod block;
mod error;
pub mod players;
pub mod recency;
mod snapshot;
pub mod timestamp;

pub use block::{Block, BlockMarkers, Extraction, extract_last_block, read_log_lines};
pub use error::RosterError;
pub use players::{LineFormat, LineShape, NameExtractor, PlayerCount, parse_player_count};
pub use recency::{Recency, check_recency};
pub use snapshot::{RosterParser, Snapshot};
pub use timestamp::parse_timestamp;

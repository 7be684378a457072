//! Same-day check for a block's start-marker timestamp.

use chrono::{NaiveDate, NaiveDateTime};

use crate::RosterError;
use crate::block::Block;
use crate::timestamp::{bracketed, parse_timestamp};

/// Outcome of comparing a block's timestamp with the current date.
#[derive(Debug)]
pub enum Recency {
    /// The block was written today.
    Recent { raw: String, at: NaiveDateTime },
    /// The block was written on another day.
    Stale { raw: String, at: NaiveDateTime },
    /// No comparison was possible.
    Undecidable(RosterError),
}

impl Recency {
    /// Only [`Recency::Recent`] counts; undecidable blocks are not recent.
    pub fn is_recent(&self) -> bool {
        matches!(self, Self::Recent { .. })
    }

    /// Raw bracketed timestamp text, when one was found and parsed.
    pub fn raw(&self) -> Option<&str> {
        match self {
            Self::Recent { raw, .. } | Self::Stale { raw, .. } => Some(raw.as_str()),
            Self::Undecidable(_) => None,
        }
    }

    pub fn timestamp(&self) -> Option<NaiveDateTime> {
        match self {
            Self::Recent { at, .. } | Self::Stale { at, .. } => Some(*at),
            Self::Undecidable(_) => None,
        }
    }
}

/// Parses the timestamp on the block's start marker line.
///
/// Returns the raw bracketed text alongside the parsed value.
pub fn block_timestamp(
    block: &Block,
    today: NaiveDate,
) -> Result<(String, NaiveDateTime), RosterError> {
    let raw = bracketed(block.start_line()).ok_or(RosterError::MissingTimestamp)?;
    let at = parse_timestamp(raw, today)?;
    Ok((raw.to_string(), at))
}

/// Decides whether `block` was written on `today`, at date granularity.
pub fn check_recency(block: &Block, today: NaiveDate) -> Recency {
    match block_timestamp(block, today) {
        Ok((raw, at)) if at.date() == today => Recency::Recent { raw, at },
        Ok((raw, at)) => Recency::Stale { raw, at },
        Err(e) => Recency::Undecidable(e),
    }
}

//! Bracketed timestamp parsing for start-marker lines.
//!
//! The game client prefixes every log line with a local, timezone-less
//! timestamp such as `[Wed Mar 16 20:45:30 2025]`. Older clients and some
//! log converters emit slightly different layouts, so several are tried.

use chrono::{Datelike, NaiveDate, NaiveDateTime, Weekday};

use crate::RosterError;

/// Timestamp layouts, tried in the order of [`TimestampFormat::ALL`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimestampFormat {
    /// `Wed Mar 16 20:45:30 2025`
    Full,
    /// `Wed Mar 16 20:45:30`, dated in the current calendar year.
    NoYear,
    /// `03-16-2025 20:45:30`
    Numeric,
}

impl TimestampFormat {
    pub const ALL: [TimestampFormat; 3] = [Self::Full, Self::NoYear, Self::Numeric];

    fn parse(self, raw: &str, current_year: i32) -> Option<NaiveDateTime> {
        match self {
            Self::Full => {
                let rest = strip_weekday(raw)?;
                NaiveDateTime::parse_from_str(rest, "%b %d %H:%M:%S %Y").ok()
            }
            Self::NoYear => {
                let rest = strip_weekday(raw)?;
                let with_year = format!("{rest} {current_year}");
                NaiveDateTime::parse_from_str(&with_year, "%b %d %H:%M:%S %Y").ok()
            }
            Self::Numeric => NaiveDateTime::parse_from_str(raw, "%m-%d-%Y %H:%M:%S").ok(),
        }
    }
}

/// Returns the text between the first `[` and the following `]`.
pub fn bracketed(line: &str) -> Option<&str> {
    let start = line.find('[')? + 1;
    let len = line[start..].find(']')?;
    Some(line[start..start + len].trim())
}

/// Parses a bracketed timestamp, trying each supported layout in turn.
///
/// `today` supplies the year for layouts that omit it.
pub fn parse_timestamp(raw: &str, today: NaiveDate) -> Result<NaiveDateTime, RosterError> {
    let raw = raw.trim();
    for format in TimestampFormat::ALL {
        if let Some(parsed) = format.parse(raw, today.year()) {
            warn_on_weekday_mismatch(raw, parsed);
            tracing::trace!(?format, %parsed, "parsed block timestamp");
            return Ok(parsed);
        }
    }
    Err(RosterError::Timestamp(raw.to_string()))
}

/// Splits off a leading weekday name. The weekday is not checked against
/// the date; the remaining text carries all the information.
fn strip_weekday(raw: &str) -> Option<&str> {
    let (day, rest) = raw.split_once(char::is_whitespace)?;
    day.parse::<Weekday>().ok()?;
    Some(rest.trim_start())
}

fn warn_on_weekday_mismatch(raw: &str, parsed: NaiveDateTime) {
    let claimed = raw
        .split_whitespace()
        .next()
        .and_then(|day| day.parse::<Weekday>().ok());
    if let Some(claimed) = claimed {
        if claimed != parsed.weekday() {
            tracing::debug!(
                raw,
                claimed = %claimed,
                actual = %parsed.weekday(),
                "timestamp weekday does not match its date"
            );
        }
    }
}

//! Player count and player name parsing for a who-list block.
//!
//! Body lines come in a handful of shapes depending on whether the player
//! is flagged AFK and/or anonymous:
//!
//! ```text
//! [60 Cleric] Bob (Dwarf) <Guild>
//! [ANONYMOUS] Shade <Guild>
//!  AFK [ANONYMOUS] Shade
//!  AFK [50 Warrior] Alice (Human)
//! ```
//!
//! The markers and per-shape patterns live in [`LineFormat`] so a different
//! client layout can be handled from configuration.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::RosterError;
use crate::block::{Block, compile};

static PLAYER_COUNT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"There are\s+(\d+)\s+players").expect("player count pattern is valid")
});

/// Declared number of players from the end marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerCount {
    Known(u32),
    Unknown,
}

impl PlayerCount {
    pub fn known(self) -> Option<u32> {
        match self {
            Self::Known(n) => Some(n),
            Self::Unknown => None,
        }
    }
}

impl fmt::Display for PlayerCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Known(n) => write!(f, "{n}"),
            Self::Unknown => f.write_str("unknown"),
        }
    }
}

/// Parses the count out of an end marker line.
pub fn parse_player_count(line: &str) -> PlayerCount {
    PLAYER_COUNT
        .captures(line)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
        .map_or(PlayerCount::Unknown, PlayerCount::Known)
}

/// Count declared by the block's last line.
pub fn player_count(block: &Block) -> PlayerCount {
    let count = parse_player_count(block.end_line());
    if count == PlayerCount::Unknown {
        tracing::warn!(line = block.end_line(), "could not parse player count");
    }
    count
}

/// Body line layout. Each pattern must capture the name in group 1.
///
/// Patterns may refer to the configured markers as `{afk}` and `{anon}`;
/// both are replaced by the escaped marker text before compiling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LineFormat {
    /// Substring marking a player as away.
    pub afk_marker: String,
    /// Substring marking a player whose level and class are hidden.
    pub anonymous_flag: String,
    pub afk_anonymous_pattern: String,
    pub anonymous_pattern: String,
    pub afk_pattern: String,
    pub standard_pattern: String,
}

impl Default for LineFormat {
    fn default() -> Self {
        Self {
            afk_marker: "AFK".into(),
            anonymous_flag: "ANONYMOUS".into(),
            afk_anonymous_pattern: r"{afk}\s+\[{anon}\]\s+(\w+)".into(),
            anonymous_pattern: r"\[{anon}\]\s+(\w+)".into(),
            afk_pattern: r"{afk}\s+\[\d+[^\]]*\]\s+(\w+)".into(),
            standard_pattern: r"\]\s+(\w+)\s+\(".into(),
        }
    }
}

/// Classification of a body line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineShape {
    AfkAnonymous,
    Anonymous,
    Afk,
    Standard,
    Unrecognized,
}

/// Compiled [`LineFormat`].
#[derive(Debug, Clone)]
pub struct NameExtractor {
    afk_marker: String,
    anonymous_flag: String,
    afk_anonymous: Regex,
    anonymous: Regex,
    afk: Regex,
    standard: Regex,
}

impl NameExtractor {
    pub fn new(format: &LineFormat) -> Result<Self, RosterError> {
        let build = |pattern: &str| {
            let pattern = pattern
                .replace("{afk}", &regex::escape(&format.afk_marker))
                .replace("{anon}", &regex::escape(&format.anonymous_flag));
            compile_name_pattern(&pattern)
        };
        Ok(Self {
            afk_marker: format.afk_marker.clone(),
            anonymous_flag: format.anonymous_flag.clone(),
            afk_anonymous: build(&format.afk_anonymous_pattern)?,
            anonymous: build(&format.anonymous_pattern)?,
            afk: build(&format.afk_pattern)?,
            standard: build(&format.standard_pattern)?,
        })
    }

    /// Decides which pattern applies to `line`. First match wins.
    pub fn classify(&self, line: &str) -> LineShape {
        let afk = !self.afk_marker.is_empty() && line.contains(&self.afk_marker);
        let anonymous = !self.anonymous_flag.is_empty() && line.contains(&self.anonymous_flag);

        match (afk, anonymous) {
            (true, true) => LineShape::AfkAnonymous,
            (false, true) => LineShape::Anonymous,
            (true, false) => LineShape::Afk,
            (false, false) if line.contains(']') && line.contains('(') => LineShape::Standard,
            (false, false) => LineShape::Unrecognized,
        }
    }

    /// Extracts the player name from one body line, if any.
    pub fn extract<'a>(&self, line: &'a str) -> Option<&'a str> {
        let pattern = match self.classify(line) {
            LineShape::AfkAnonymous => &self.afk_anonymous,
            LineShape::Anonymous => &self.anonymous,
            LineShape::Afk => &self.afk,
            LineShape::Standard => &self.standard,
            LineShape::Unrecognized => return None,
        };
        pattern
            .captures(line)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
    }

    /// Names from every body line of `block`, in line order.
    ///
    /// Lines that yield no name are skipped.
    pub fn player_names(&self, block: &Block) -> Vec<String> {
        block
            .body()
            .iter()
            .filter_map(|line| {
                let name = self.extract(line);
                if name.is_none() {
                    tracing::debug!(line = line.as_str(), "no player name on line");
                }
                name
            })
            .map(str::to_string)
            .collect()
    }
}

impl Default for NameExtractor {
    fn default() -> Self {
        Self::new(&LineFormat::default()).expect("default line format is valid")
    }
}

fn compile_name_pattern(pattern: &str) -> Result<Regex, RosterError> {
    let regex = compile(pattern)?;
    if regex.captures_len() < 2 {
        return Err(RosterError::MissingCapture(pattern.to_string()));
    }
    Ok(regex)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_block() -> Block {
        Block::from_lines([
            "[Wed Mar 16 20:45:30 2025] Players on EverQuest:",
            "Header",
            "[50 Warrior] Bob (Human)",
            "There are 1 players in EverQuest.",
        ])
        .unwrap()
    }

    #[test]
    fn count_from_sample_block() {
        assert_eq!(player_count(&sample_block()), PlayerCount::Known(1));
    }

    #[test]
    fn names_from_sample_block() {
        let names = NameExtractor::default().player_names(&sample_block());
        assert_eq!(names, vec!["Bob"]);
    }

    #[test]
    fn count_unknown_when_malformed() {
        assert_eq!(
            parse_player_count("There are many players in EverQuest."),
            PlayerCount::Unknown
        );
        assert_eq!(
            parse_player_count("There are 99999999999999999999 players in EverQuest."),
            PlayerCount::Unknown
        );
        assert_eq!(parse_player_count(""), PlayerCount::Unknown);
    }

    #[test]
    fn count_with_timestamp_prefix() {
        assert_eq!(
            parse_player_count("[Sun Mar 16 20:45:30 2025] There are 42 players in The Nexus."),
            PlayerCount::Known(42)
        );
    }

    #[test]
    fn count_display() {
        assert_eq!(PlayerCount::Known(7).to_string(), "7");
        assert_eq!(PlayerCount::Unknown.to_string(), "unknown");
        assert_eq!(PlayerCount::Known(3).known(), Some(3));
        assert_eq!(PlayerCount::Unknown.known(), None);
    }

    #[test]
    fn classify_line_shapes() {
        let ex = NameExtractor::default();
        assert_eq!(ex.classify("AFK [ANONYMOUS] Shade"), LineShape::AfkAnonymous);
        assert_eq!(ex.classify("[ANONYMOUS] Shade <Guild>"), LineShape::Anonymous);
        assert_eq!(ex.classify("AFK [60 High Priest] Tank (Dwarf)"), LineShape::Afk);
        assert_eq!(ex.classify("[50 Warrior] Bob (Human)"), LineShape::Standard);
        assert_eq!(ex.classify("---------------------------"), LineShape::Unrecognized);
    }

    #[test]
    fn afk_anonymous_name() {
        let ex = NameExtractor::default();
        assert_eq!(ex.extract("AFK [ANONYMOUS] Shade"), Some("Shade"));
        assert_eq!(
            ex.extract("[Sun Mar 16 20:45:30 2025]  AFK [ANONYMOUS] Shade  <Night Watch>"),
            Some("Shade")
        );
    }

    #[test]
    fn anonymous_name() {
        let ex = NameExtractor::default();
        assert_eq!(ex.extract("[ANONYMOUS] Whisper <Guild>"), Some("Whisper"));
    }

    #[test]
    fn afk_name() {
        let ex = NameExtractor::default();
        assert_eq!(
            ex.extract("[Sun Mar 16 20:45:30 2025]  AFK [60 High Priest] Tank (Dwarf)"),
            Some("Tank")
        );
    }

    #[test]
    fn standard_name_skips_timestamp_bracket() {
        let ex = NameExtractor::default();
        assert_eq!(
            ex.extract("[Sun Mar 16 20:45:30 2025] [60 Cleric] Bob (Dwarf) <Guild>"),
            Some("Bob")
        );
    }

    #[test]
    fn classified_line_without_name_is_skipped() {
        let ex = NameExtractor::default();
        assert_eq!(ex.extract("AFK but nothing else"), None);
        assert_eq!(ex.extract("[ANONYMOUS]"), None);
        assert_eq!(ex.extract("] ("), None);
    }

    #[test]
    fn names_preserve_order_case_and_duplicates() {
        let block = Block::from_lines([
            "[Sun Mar 16 20:45:30 2025] Players on EverQuest:",
            "---------------------------",
            "[60 Cleric] bob (Dwarf)",
            "AFK [ANONYMOUS] Shade",
            "garbage line",
            "[ANONYMOUS] Whisper",
            "[60 Cleric] bob (Dwarf)",
            "AFK [1 Warrior] Newbie (Ogre)",
            "There are 5 players in EverQuest.",
        ])
        .unwrap();
        let names = NameExtractor::default().player_names(&block);
        assert_eq!(names, vec!["bob", "Shade", "Whisper", "bob", "Newbie"]);
    }

    #[test]
    fn markers_only_block_has_no_names() {
        let block = Block::from_lines(["[x] Players on EverQuest:", "There are 0 players in x."])
            .unwrap();
        assert!(NameExtractor::default().player_names(&block).is_empty());
    }

    #[test]
    fn custom_line_format() {
        let format = LineFormat {
            afk_marker: "<AWAY>".into(),
            afk_pattern: r"<AWAY>\s+(\w+)".into(),
            ..LineFormat::default()
        };
        let ex = NameExtractor::new(&format).unwrap();
        assert_eq!(ex.classify("<AWAY> Sleepy"), LineShape::Afk);
        assert_eq!(ex.extract("<AWAY> Sleepy"), Some("Sleepy"));
        assert_eq!(ex.extract("AFK [60 Cleric] Bob (Dwarf)"), Some("Bob"));
    }

    #[test]
    fn custom_markers_flow_into_default_patterns() {
        let format = LineFormat {
            afk_marker: "<AWAY>".into(),
            anonymous_flag: "HIDDEN".into(),
            ..LineFormat::default()
        };
        let ex = NameExtractor::new(&format).unwrap();

        assert_eq!(ex.classify("<AWAY> [HIDDEN] Shade"), LineShape::AfkAnonymous);
        assert_eq!(ex.extract("<AWAY> [HIDDEN] Shade"), Some("Shade"));
        assert_eq!(ex.classify("[HIDDEN] Whisper <Guild>"), LineShape::Anonymous);
        assert_eq!(ex.extract("[HIDDEN] Whisper <Guild>"), Some("Whisper"));
        assert_eq!(ex.classify("<AWAY> [60 Cleric] Bob (Dwarf)"), LineShape::Afk);
        assert_eq!(ex.extract("<AWAY> [60 Cleric] Bob (Dwarf)"), Some("Bob"));
    }

    #[test]
    fn afk_marker_override_keeps_anonymous_names() {
        let format = LineFormat {
            afk_marker: "<AWAY>".into(),
            ..LineFormat::default()
        };
        let ex = NameExtractor::new(&format).unwrap();
        assert_eq!(ex.extract("<AWAY> [ANONYMOUS] Shade"), Some("Shade"));
    }

    #[test]
    fn marker_text_is_escaped() {
        let format = LineFormat {
            afk_marker: "(away)".into(),
            ..LineFormat::default()
        };
        let ex = NameExtractor::new(&format).unwrap();
        assert_eq!(ex.extract("(away) [12 Bard] Lute (Elf)"), Some("Lute"));
    }

    #[test]
    fn pattern_without_capture_group_rejected() {
        let format = LineFormat {
            standard_pattern: r"\]\s+\w+".into(),
            ..LineFormat::default()
        };
        let err = NameExtractor::new(&format).unwrap_err();
        assert!(matches!(err, RosterError::MissingCapture(_)));
    }

    #[test]
    fn invalid_pattern_rejected() {
        let format = LineFormat {
            anonymous_pattern: r"\[ANONYMOUS".into(),
            ..LineFormat::default()
        };
        assert!(matches!(
            NameExtractor::new(&format),
            Err(RosterError::Pattern { .. })
        ));
    }
}

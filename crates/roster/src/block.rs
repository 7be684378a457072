//! Reverse scan for the most recent who-list block in a game log.
//!
//! A block starts with `[<timestamp>] Players on <Game>:` and ends with
//! `There are N players in <zone>.`. The log is append-only, so the newest
//! block is found by walking lines from the bottom of the file up.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use crate::RosterError;

/// Game name used in the start marker when none is configured.
pub const DEFAULT_GAME: &str = "EverQuest";

/// Pattern matched by the end marker of every block.
pub const END_MARKER_PATTERN: &str = r"There are \d+ players in .*";

static END_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(END_MARKER_PATTERN).expect("end marker pattern is valid"));

/// Compiled start/end marker patterns.
#[derive(Debug, Clone)]
pub struct BlockMarkers {
    start: Regex,
    end: Regex,
}

impl BlockMarkers {
    /// Markers for the `/who` output of the given game.
    pub fn for_game(game: &str) -> Result<Self, RosterError> {
        let start = format!(r"\[.*\] Players on {}:", regex::escape(game));
        Ok(Self {
            start: compile(&start)?,
            end: END_MARKER.clone(),
        })
    }

    pub fn is_start(&self, line: &str) -> bool {
        self.start.is_match(line)
    }

    pub fn is_end(&self, line: &str) -> bool {
        self.end.is_match(line)
    }
}

pub(crate) fn compile(pattern: &str) -> Result<Regex, RosterError> {
    Regex::new(pattern).map_err(|source| RosterError::Pattern {
        pattern: pattern.to_string(),
        source,
    })
}

/// One who-list snapshot: trimmed lines from start marker to end marker.
///
/// Always holds at least the two marker lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    lines: Vec<String>,
}

impl Block {
    /// Builds a block from already-delimited lines. Returns `None` when
    /// fewer than two lines are given.
    pub fn from_lines<I, S>(lines: I) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let lines: Vec<String> = lines.into_iter().map(Into::into).collect();
        (lines.len() >= 2).then_some(Self { lines })
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// The start marker line, carrying the timestamp.
    pub fn start_line(&self) -> &str {
        &self.lines[0]
    }

    /// The end marker line, carrying the player count.
    pub fn end_line(&self) -> &str {
        &self.lines[self.lines.len() - 1]
    }

    /// Player entry lines: everything between the header line under the
    /// start marker and the end marker.
    pub fn body(&self) -> &[String] {
        let end = self.lines.len() - 1;
        if end <= 2 { &[] } else { &self.lines[2..end] }
    }

    /// Block text as it is written to disk, lines joined with `\n`.
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }
}

/// Result of a reverse scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    /// The most recent complete block.
    Found(Block),
    /// An end marker was seen but the top of the file was reached before
    /// its start marker. `lines` is how many lines had been collected.
    Unterminated { lines: usize },
    /// No end marker anywhere in the input.
    NotFound,
}

impl Extraction {
    pub fn into_block(self) -> Option<Block> {
        match self {
            Self::Found(block) => Some(block),
            _ => None,
        }
    }
}

enum ScanState<'a> {
    Idle,
    /// Collecting lines bottom-up; the first entry is the end marker.
    InBlock(Vec<&'a str>),
}

/// Scans `lines` from last to first and returns the newest complete block.
///
/// An end marker met while a block is already open means the later block
/// lost its start marker; the open lines are dropped and collection
/// restarts from the earlier end marker, so two snapshots never merge.
pub fn extract_last_block<S: AsRef<str>>(lines: &[S], markers: &BlockMarkers) -> Extraction {
    let mut state = ScanState::Idle;

    for (idx, line) in lines.iter().enumerate().rev() {
        let line = line.as_ref();

        if markers.is_end(line) {
            if let ScanState::InBlock(open) = &state {
                tracing::warn!(
                    line = idx + 1,
                    dropped = open.len(),
                    "end marker inside an open block, dropping block without start marker"
                );
            }
            state = ScanState::InBlock(vec![line.trim()]);
            continue;
        }

        if let ScanState::InBlock(open) = &mut state {
            open.push(line.trim());
            if markers.is_start(line) {
                let forward: Vec<String> = open.iter().rev().map(|l| (*l).to_string()).collect();
                tracing::debug!(line = idx + 1, len = forward.len(), "found who-list block");
                return Extraction::Found(Block { lines: forward });
            }
        }
    }

    match state {
        ScanState::Idle => Extraction::NotFound,
        ScanState::InBlock(open) => {
            tracing::warn!(
                lines = open.len(),
                "reached start of log inside a block, no start marker found"
            );
            Extraction::Unterminated { lines: open.len() }
        }
    }
}

/// Reads a log file fully into memory, one entry per line.
///
/// Invalid UTF-8 is replaced rather than rejected; game clients are not
/// consistent about their output encoding.
pub fn read_log_lines(path: &Path) -> Result<Vec<String>, RosterError> {
    let bytes = std::fs::read(path).map_err(|source| RosterError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(String::from_utf8_lossy(&bytes)
        .lines()
        .map(str::to_string)
        .collect())
}

/// Reads `path` and extracts its most recent block.
pub fn extract_from_file(path: &Path, markers: &BlockMarkers) -> Result<Extraction, RosterError> {
    tracing::info!(path = %path.display(), "reading log file");
    let lines = read_log_lines(path)?;
    tracing::debug!(count = lines.len(), "processing log lines");
    Ok(extract_last_block(&lines, markers))
}

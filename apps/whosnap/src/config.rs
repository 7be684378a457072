//! whosnap configuration management.
//!
//! Configuration is stored as TOML:
//! - Linux: `~/.config/whosnap/whosnap.toml`
//! - Windows: `%APPDATA%/whosnap/whosnap.toml`

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use whosnap_output::OutputFormat;
use whosnap_roster::LineFormat;

use crate::cli::Args;

/// whosnap configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Game client log to read.
    #[serde(default)]
    pub log_file: String,

    /// Directory receiving snapshot files (`~/` is expanded).
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    /// Game name as printed in the `Players on <Game>:` line.
    #[serde(default = "default_game")]
    pub game: String,

    #[serde(default)]
    pub output_format: OutputFormat,

    /// Append the declared player count to the file name.
    #[serde(default = "default_true")]
    pub include_count_in_filename: bool,

    /// Only save blocks whose timestamp is from today.
    #[serde(default = "default_true")]
    pub require_today: bool,

    /// Seconds to wait, with a countdown, before exiting.
    #[serde(default)]
    pub linger_secs: u32,

    #[serde(default)]
    pub line_format: LineFormat,
}

fn default_output_dir() -> String {
    "~/whosnap".into()
}

fn default_game() -> String {
    whosnap_roster::block::DEFAULT_GAME.into()
}

fn default_true() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_file: String::new(),
            output_dir: default_output_dir(),
            game: default_game(),
            output_format: OutputFormat::default(),
            include_count_in_filename: default_true(),
            require_today: default_true(),
            linger_secs: 0,
            line_format: LineFormat::default(),
        }
    }
}

impl Config {
    /// Loads configuration from `path`, or the platform default location.
    ///
    /// A missing file is created with default values.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => config_path(),
        };

        if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            let config: Config = toml::from_str(&content)?;
            tracing::debug!(path = %path.display(), "configuration loaded");
            Ok(config)
        } else {
            let config = Config::default();
            config.save(&path)?;
            tracing::info!(path = %path.display(), "wrote default configuration");
            Ok(config)
        }
    }

    /// Saves the configuration to `path`.
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;

        tracing::debug!(path = %path.display(), "configuration saved");
        Ok(())
    }

    /// Applies command-line overrides on top of the file values.
    pub fn apply_args(&mut self, args: &Args) {
        if let Some(log_file) = &args.log_file {
            self.log_file = log_file.display().to_string();
        }
        if let Some(output_dir) = &args.output_dir {
            self.output_dir = output_dir.display().to_string();
        }
        if let Some(format) = args.format {
            self.output_format = format;
        }
        if args.no_date_check {
            self.require_today = false;
        }
        if let Some(linger) = args.linger {
            self.linger_secs = linger;
        }
    }
}

/// Returns the platform-specific configuration file path.
fn config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        let appdata =
            std::env::var("APPDATA").unwrap_or_else(|_| "C:\\Users\\Default\\AppData".into());
        PathBuf::from(appdata).join("whosnap").join("whosnap.toml")
    }

    #[cfg(not(target_os = "windows"))]
    {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".into());
        PathBuf::from(home)
            .join(".config")
            .join("whosnap")
            .join("whosnap.toml")
    }
}

//! Configuration loading and parsing.
//!
//! Parses `vimdojo.toml` (or an override path provided by the binary):
//!
//! ```toml
//! [history]
//! max_depth = 200
//!
//! [lessons]
//! catalog = "my-lessons.toml"
//! ```
//!
//! Missing files and parse errors fall back to defaults. Unknown fields are
//! ignored so older binaries tolerate newer files. The raw history depth is
//! kept next to the clamped effective value.

use anyhow::Result;
use serde::Deserialize;
use std::{fs, path::PathBuf};
use tracing::{info, warn};

/// Default undo history depth.
pub const DEFAULT_HISTORY_DEPTH: usize = 200;
/// Upper bound accepted for `history.max_depth`.
pub const MAX_HISTORY_DEPTH: usize = 10_000;

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct HistoryConfig {
    #[serde(default = "HistoryConfig::default_max_depth")]
    pub max_depth: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_depth: Self::default_max_depth(),
        }
    }
}

impl HistoryConfig {
    const fn default_max_depth() -> usize {
        DEFAULT_HISTORY_DEPTH
    }
}

#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct LessonsConfig {
    /// External catalog replacing the built-in lessons.
    #[serde(default)]
    pub catalog: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct ConfigFile {
    #[serde(default)]
    pub history: HistoryConfig,
    #[serde(default)]
    pub lessons: LessonsConfig,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub file: ConfigFile,    // parsed (or default) data
    pub effective_history_depth: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self::from_file(ConfigFile::default())
    }
}

/// Best-effort config path following platform conventions (XDG / AppData Roaming).
pub fn discover() -> PathBuf {
    let local = PathBuf::from("vimdojo.toml");
    if local.exists() {
        return local;
    }
    if let Some(dir) = dirs::config_dir() {
        return dir.join("vimdojo").join("vimdojo.toml");
    }
    PathBuf::from("vimdojo.toml")
}

pub fn load_from(path: Option<PathBuf>) -> Result<Config> {
    let path = path.unwrap_or_else(discover);
    let Ok(content) = fs::read_to_string(&path) else {
        return Ok(Config::default());
    };
    match toml::from_str::<ConfigFile>(&content) {
        Ok(file) => Ok(Config::from_file(file)),
        Err(e) => {
            warn!(target: "config", path = %path.display(), error = %e, "config_parse_failed_using_defaults");
            Ok(Config::default())
        }
    }
}

impl Config {
    fn from_file(file: ConfigFile) -> Self {
        let mut cfg = Self {
            file,
            effective_history_depth: DEFAULT_HISTORY_DEPTH,
        };
        cfg.apply_limits();
        cfg
    }

    /// Clamp the configured history depth into `1..=MAX_HISTORY_DEPTH`.
    /// Returns the effective value.
    pub fn apply_limits(&mut self) -> usize {
        let raw = self.file.history.max_depth;
        let clamped = raw.clamp(1, MAX_HISTORY_DEPTH);
        if clamped != raw {
            info!(
                target: "config",
                raw,
                clamped,
                max = MAX_HISTORY_DEPTH,
                "history_max_depth_clamped"
            );
        }
        self.effective_history_depth = clamped;
        clamped
    }

    pub fn catalog_path(&self) -> Option<&PathBuf> {
        self.file.lessons.catalog.as_ref()
    }
}

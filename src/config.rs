//! Configuration loading for mdtoc.
//!
//! Settings come from an optional `.mdtoc.toml` file, found either explicitly
//! or by walking up from the working directory. Command-line flags override
//! file values, which override built-in defaults.

use crate::marker::DEFAULT_MARKER;
use crate::options::TocOptions;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = ".mdtoc.toml";

const KNOWN_KEYS: &[&str] = &[
    "min-level",
    "max-level",
    "ordered",
    "line-numbers",
    "show-path",
    "global",
    "anchor-links",
    "marker",
];

/// Stop walking up after this many directories
const MAX_DEPTH: usize = 100;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file
    #[error("Failed to read config file at {path}: {source}")]
    IoError { source: io::Error, path: String },

    /// Failed to parse the TOML content
    #[error("Failed to parse config: {0}")]
    ParseError(String),
}

/// Contents of `.mdtoc.toml`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Config {
    pub min_level: u8,
    pub max_level: u8,
    pub ordered: bool,
    pub line_numbers: bool,
    pub show_path: bool,
    /// One TOC for the whole document instead of one per level-1 heading
    pub global: bool,
    /// Links in stdout previews. Written TOCs always link.
    pub anchor_links: bool,
    pub marker: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            min_level: 1,
            max_level: 3,
            ordered: false,
            line_numbers: true,
            show_path: false,
            global: false,
            anchor_links: false,
            marker: DEFAULT_MARKER.to_string(),
        }
    }
}

impl Config {
    /// Parse TOML text. Unknown keys are reported and ignored.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let table: toml::Table = toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        for key in table.keys().filter(|key| !KNOWN_KEYS.contains(&key.as_str())) {
            log::warn!("Unknown config key '{key}' ignored");
        }
        Self::deserialize(toml::Value::Table(table)).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::IoError {
            source,
            path: path.display().to_string(),
        })?;
        log::debug!("Loading config from {}", path.display());
        Self::from_toml_str(&content)
    }

    /// Nearest `.mdtoc.toml` at or above `start`, stopping at a repository root
    pub fn discover(start: &Path) -> Option<PathBuf> {
        for (depth, dir) in start.ancestors().enumerate() {
            if depth >= MAX_DEPTH {
                log::debug!("Maximum config traversal depth reached");
                break;
            }

            let candidate = dir.join(CONFIG_FILE);
            if candidate.is_file() {
                log::debug!("Found config file: {}", candidate.display());
                return Some(candidate);
            }
            if dir.join(".git").exists() {
                log::debug!("Stopping config search at {}", dir.display());
                break;
            }
        }
        None
    }

    /// The explicit file if given, else a discovered one, else defaults
    pub fn resolve(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        let discovered = std::env::current_dir().ok().and_then(|dir| Self::discover(&dir));
        match discovered {
            Some(path) => Self::load(&path),
            None => Ok(Self::default()),
        }
    }

    pub fn to_options(&self) -> TocOptions {
        TocOptions {
            min_level: self.min_level,
            max_level: self.max_level,
            ordered: self.ordered,
            line_numbers: self.line_numbers,
            show_path: self.show_path,
            file_path: None,
            section_mode: !self.global,
            anchor_links: self.anchor_links,
        }
    }
}

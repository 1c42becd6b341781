//! Configuration types.
//!
//! Every field has a serde default, so a partial file is always valid.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ApplierConfig {
    /// Debug logging.
    pub debug: bool,

    /// Where profile definitions live.
    pub profiles: ProfilesConfig,

    /// Sequencer behaviour.
    pub sequencer: SequencerConfig,

    /// Chooser behaviour.
    pub chooser: ChooserConfig,
}

impl ApplierConfig {
    /// Parses a config from TOML.
    ///
    /// # Errors
    ///
    /// Returns the TOML error for malformed input or mistyped fields.
    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}

/// Profile directory configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ProfilesConfig {
    /// Search directories, highest priority first.
    ///
    /// A leading `~` is the home directory. Relative paths are taken
    /// from the project root.
    pub dirs: Vec<PathBuf>,
}

impl Default for ProfilesConfig {
    fn default() -> Self {
        Self {
            dirs: vec![PathBuf::from("~/.applier/profiles")],
        }
    }
}

impl ProfilesConfig {
    /// Returns `dirs` with `~` expanded and relative paths anchored.
    #[must_use]
    pub fn resolved_dirs(&self, project_root: Option<&Path>) -> Vec<PathBuf> {
        self.dirs
            .iter()
            .map(|dir| resolve_dir(dir, project_root))
            .collect()
    }
}

fn resolve_dir(dir: &Path, project_root: Option<&Path>) -> PathBuf {
    if let Ok(rest) = dir.strip_prefix("~") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    match project_root {
        Some(root) if dir.is_relative() => root.join(dir),
        _ => dir.to_path_buf(),
    }
}

/// Sequencer configuration.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SequencerConfig {
    /// Exit the control loop as soon as the queue runs empty.
    pub exit_when_idle: bool,

    /// Let Advanced requests with a known state skip the chooser.
    pub skip_chooser_when_decided: bool,
}

impl Default for SequencerConfig {
    fn default() -> Self {
        Self {
            exit_when_idle: true,
            skip_chooser_when_decided: false,
        }
    }
}

/// Chooser configuration.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ChooserConfig {
    /// Ask on the terminal; when false every prompt is dismissed.
    pub interactive: bool,
}

impl Default for ChooserConfig {
    fn default() -> Self {
        Self { interactive: true }
    }
}

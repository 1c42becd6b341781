//! Configuration loader with hierarchical merging.
//!
//! # Load Order
//!
//! 1. Default values (compile-time)
//! 2. Global config (`~/.applier/config.toml`)
//! 3. Project config (`.applier/config.toml`)
//! 4. Environment variables (`APPLIER_*`)
//!
//! Each layer overrides the previous, key by key: a layer that sets
//! `sequencer.exit_when_idle` leaves `sequencer.skip_chooser_when_decided`
//! as the lower layers had it.

use super::{default_config_path, ApplierConfig, ConfigError, PROJECT_CONFIG_DIR, PROJECT_CONFIG_FILE};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Helper macro for parsing boolean environment variables.
macro_rules! parse_env_bool {
    ($loader:expr, $field:expr, $var:literal) => {
        if let Some(val) = $loader.env_var($var) {
            $field = parse_bool(&val)
                .ok_or_else(|| ConfigError::invalid_env_var($var, "expected bool"))?;
        }
    };
}

/// Configuration loader with builder pattern.
///
/// # Example
///
/// ```
/// use applier_runtime::config::ConfigLoader;
///
/// let config = ConfigLoader::new()
///     .skip_global_config()
///     .with_project_root("/nonexistent/project")
///     .skip_env_vars()
///     .load()
///     .expect("defaults always load");
/// assert!(config.sequencer.exit_when_idle);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    /// Global config file path (defaults to ~/.applier/config.toml).
    global_config_path: Option<PathBuf>,

    /// Project root directory.
    project_root: Option<PathBuf>,

    /// Replaces the process environment when set.
    env_override: Option<HashMap<String, String>>,

    skip_env: bool,
    skip_global: bool,
    skip_project: bool,
}

impl ConfigLoader {
    /// Creates a new loader with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a custom global config path.
    #[must_use]
    pub fn with_global_config(mut self, path: impl Into<PathBuf>) -> Self {
        self.global_config_path = Some(path.into());
        self
    }

    /// Sets the project root directory.
    ///
    /// Project config will be loaded from `<project_root>/.applier/config.toml`.
    #[must_use]
    pub fn with_project_root(mut self, path: impl Into<PathBuf>) -> Self {
        self.project_root = Some(path.into());
        self
    }

    /// Reads `APPLIER_*` variables from `vars` instead of the process
    /// environment.
    #[must_use]
    pub fn with_env_vars<I, K, V>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.env_override = Some(
            vars.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        );
        self
    }

    /// Skips environment variable loading.
    #[must_use]
    pub fn skip_env_vars(mut self) -> Self {
        self.skip_env = true;
        self
    }

    /// Skips global config loading.
    #[must_use]
    pub fn skip_global_config(mut self) -> Self {
        self.skip_global = true;
        self
    }

    /// Skips project config loading.
    #[must_use]
    pub fn skip_project_config(mut self) -> Self {
        self.skip_project = true;
        self
    }

    /// Loads and merges configuration from all sources.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if any config file exists but cannot be
    /// read or parsed, or an env var holds an invalid value. Missing
    /// config files are silently ignored.
    pub fn load(&self) -> Result<ApplierConfig, ConfigError> {
        let mut merged = toml::Table::new();

        // Layer 1: Global config
        if !self.skip_global {
            let global_path = self
                .global_config_path
                .clone()
                .unwrap_or_else(default_config_path);

            if let Some(layer) = self.load_file(&global_path)? {
                debug!(path = %global_path.display(), "Loaded global config");
                merge_tables(&mut merged, layer);
            }
        }

        // Layer 2: Project config
        if !self.skip_project {
            if let Some(ref project_root) = self.project_root {
                let project_config_path = project_root
                    .join(PROJECT_CONFIG_DIR)
                    .join(PROJECT_CONFIG_FILE);

                if let Some(layer) = self.load_file(&project_config_path)? {
                    debug!(
                        path = %project_config_path.display(),
                        project = %project_root.display(),
                        "Loaded project config"
                    );
                    merge_tables(&mut merged, layer);
                }
            }
        }

        let mut config: ApplierConfig = toml::Value::Table(merged)
            .try_into()
            .map_err(|e: toml::de::Error| ConfigError::invalid(e.to_string()))?;

        // Layer 3: Environment variables
        if !self.skip_env {
            self.apply_env_vars(&mut config)?;
        }

        Ok(config)
    }

    /// Loads a config file as a raw table, returning None if it doesn't exist.
    ///
    /// The file is also checked against [`ApplierConfig`] so a mistyped
    /// field is reported against the file that holds it.
    fn load_file(&self, path: &Path) -> Result<Option<toml::Table>, ConfigError> {
        if !path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        ApplierConfig::from_toml(&content).map_err(|e| ConfigError::parse_toml(path, e))?;
        let table = toml::from_str(&content).map_err(|e| ConfigError::parse_toml(path, e))?;

        Ok(Some(table))
    }

    fn env_var(&self, name: &str) -> Option<String> {
        match &self.env_override {
            Some(vars) => vars.get(name).cloned(),
            None => std::env::var(name).ok(),
        }
    }

    /// Applies environment variable overrides.
    fn apply_env_vars(&self, config: &mut ApplierConfig) -> Result<(), ConfigError> {
        parse_env_bool!(self, config.debug, "APPLIER_DEBUG");
        parse_env_bool!(self, config.sequencer.exit_when_idle, "APPLIER_EXIT_WHEN_IDLE");
        parse_env_bool!(self, config.chooser.interactive, "APPLIER_INTERACTIVE");

        // Prepended so env dirs win over file dirs.
        if let Some(val) = self.env_var("APPLIER_PROFILE_DIR") {
            let mut dirs: Vec<PathBuf> = std::env::split_paths(&val)
                .filter(|p| !p.as_os_str().is_empty())
                .collect();
            if dirs.is_empty() {
                return Err(ConfigError::invalid_env_var(
                    "APPLIER_PROFILE_DIR",
                    "expected at least one directory",
                ));
            }
            dirs.append(&mut config.profiles.dirs);
            config.profiles.dirs = dirs;
        }

        Ok(())
    }
}

/// Merges `layer` into `base`, recursing into nested tables.
fn merge_tables(base: &mut toml::Table, layer: toml::Table) {
    for (key, value) in layer {
        match (base.get_mut(&key), value) {
            (Some(toml::Value::Table(existing)), toml::Value::Table(incoming)) => {
                merge_tables(existing, incoming);
            }
            (_, value) => {
                base.insert(key, value);
            }
        }
    }
}

/// Parses a boolean from string.
///
/// Accepts: "true", "false", "1", "0", "yes", "no", "on", "off" (case-insensitive).
fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

//! Configuration with hierarchical layering.
//!
//! ```text
//! Priority (highest to lowest):
//!
//! ┌────────────────────────────────────────────┐
//! │  1. CLI flags (ConfigResolver)             │
//! ├────────────────────────────────────────────┤
//! │  2. Environment Variables (APPLIER_*)      │
//! ├────────────────────────────────────────────┤
//! │  3. Project Config (.applier/config.toml)  │
//! ├────────────────────────────────────────────┤
//! │  4. Global Config (~/.applier/config.toml) │
//! ├────────────────────────────────────────────┤
//! │  5. Default Values                         │
//! └────────────────────────────────────────────┘
//! ```
//!
//! Configuration is always passed explicitly; nothing here is global
//! state.
//!
//! # Environment Variables
//!
//! | Variable | Config Field | Type |
//! |----------|--------------|------|
//! | `APPLIER_DEBUG` | `debug` | bool |
//! | `APPLIER_PROFILE_DIR` | `profiles.dirs` (prepended) | path list |
//! | `APPLIER_EXIT_WHEN_IDLE` | `sequencer.exit_when_idle` | bool |
//! | `APPLIER_INTERACTIVE` | `chooser.interactive` | bool |
//!
//! # Example Configuration
//!
//! ```toml
//! # ~/.applier/config.toml
//! debug = false
//!
//! [profiles]
//! dirs = ["~/.applier/profiles", "profiles"]
//!
//! [sequencer]
//! exit_when_idle = true
//! skip_chooser_when_decided = false
//!
//! [chooser]
//! interactive = true
//! ```

mod error;
mod loader;
mod resolver;
mod types;

pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use resolver::ConfigResolver;
pub use types::{ApplierConfig, ChooserConfig, ProfilesConfig, SequencerConfig};

/// Default global config directory.
pub fn default_config_dir() -> std::path::PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| std::path::PathBuf::from("."))
        .join(".applier")
}

/// Default global config file path.
pub fn default_config_path() -> std::path::PathBuf {
    default_config_dir().join(PROJECT_CONFIG_FILE)
}

/// Project config directory name.
pub const PROJECT_CONFIG_DIR: &str = ".applier";

/// Project config file name.
pub const PROJECT_CONFIG_FILE: &str = "config.toml";

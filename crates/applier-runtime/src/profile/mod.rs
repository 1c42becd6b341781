//! Profile resolution.
//!
//! The sequencer never reads profile files itself. It asks a
//! [`ProfileStore`] to translate the trigger's identifier and to load
//! the definition, both asynchronously.
//!
//! ```text
//! Sequencer ──translate_legacy_id("Work")──► ProfileStore ──► "1699999999"
//!           ──resolve_profile("1699999999")─►              ──► ResolvedProfile
//! ```

mod error;
mod fs;

pub use error::StoreError;
pub use fs::{FsProfileStore, ProfileEntry, PROFILE_EXTENSION};

use applier_types::{ProfileId, ProfileState};
use async_trait::async_trait;

/// A parsed profile definition.
///
/// Loaded once per request and owned by that request until dispatch.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedProfile {
    /// Canonical ID the definition was loaded under.
    pub id: ProfileId,
    /// Human-readable name, passed to the dispatcher and the chooser.
    pub name: String,
    /// State to use when the trigger did not decide one.
    pub default_state: Option<ProfileState>,
    /// The profile's actions, opaque to the sequencer.
    pub actions: toml::Table,
}

impl ResolvedProfile {
    /// Creates a profile with no actions.
    #[must_use]
    pub fn new(id: ProfileId, name: impl Into<String>, default_state: Option<ProfileState>) -> Self {
        Self {
            id,
            name: name.into(),
            default_state,
            actions: toml::Table::new(),
        }
    }
}

/// Source of profile definitions.
///
/// Implementations may block on I/O for arbitrarily long; the sequencer
/// always calls them from a spawned task.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Maps a legacy profile name to its canonical ID.
    ///
    /// Inputs that already are IDs come back unchanged, as do names that
    /// match nothing (the subsequent load then reports `NotFound`).
    async fn translate_legacy_id(&self, name_or_id: &ProfileId) -> ProfileId;

    /// Loads and parses the definition stored under `id`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] on missing, unreadable or malformed definitions.
    async fn resolve_profile(&self, id: &ProfileId) -> Result<ResolvedProfile, StoreError>;
}

//! Chooser gateway: asking a human for the execution state.
//!
//! Advanced requests whose state is not fully decided end up here.
//!
//! ```text
//! Sequencer                 ChooserGateway              Human
//!     │  present(prompt)          │                        │
//!     ├──────────────────────────►│  on / off? [off]       │
//!     │                           ├───────────────────────►│
//!     │                           │        "on" / cancel   │
//!     │                           │◄───────────────────────┤
//!     │  Selected(On)/Dismissed   │                        │
//!     │◄──────────────────────────┤                        │
//! ```
//!
//! The sequencer keeps at most one prompt open at a time. An open
//! prompt has no timeout.

mod console;
mod parser;

pub use console::ConsoleChooser;
pub use parser::{ChoiceInput, ChoiceParser};

use applier_types::{ProfileId, ProfileState, RequestId};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// What the chooser shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChooserPrompt {
    /// Request the answer belongs to.
    pub request_id: RequestId,
    /// Canonical profile ID.
    pub profile_id: ProfileId,
    /// Display name for the title.
    pub profile_name: String,
    /// Options in display order.
    pub options: [ProfileState; 2],
    /// Option highlighted when the prompt opens.
    pub preselected: Option<ProfileState>,
}

impl ChooserPrompt {
    /// Creates a prompt offering [`ProfileState::ALL`].
    #[must_use]
    pub fn new(
        request_id: RequestId,
        profile_id: ProfileId,
        profile_name: impl Into<String>,
        preselected: Option<ProfileState>,
    ) -> Self {
        Self {
            request_id,
            profile_id,
            profile_name: profile_name.into(),
            options: ProfileState::ALL,
            preselected,
        }
    }
}

/// The human's answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChooserOutcome {
    /// A state was picked.
    Selected(ProfileState),
    /// The prompt was closed without a pick.
    Dismissed,
}

/// Presents a binary On/Off choice.
#[async_trait]
pub trait ChooserGateway: Send + Sync {
    /// Shows the prompt and waits, however long it takes, for the answer.
    async fn present(&self, prompt: ChooserPrompt) -> ChooserOutcome;
}

/// Chooser for non-interactive hosts: dismisses every prompt.
#[derive(Debug, Clone, Copy, Default)]
pub struct DismissingChooser;

#[async_trait]
impl ChooserGateway for DismissingChooser {
    async fn present(&self, prompt: ChooserPrompt) -> ChooserOutcome {
        debug!(
            request = %prompt.request_id,
            profile = %prompt.profile_id,
            "Non-interactive chooser dismissed prompt"
        );
        ChooserOutcome::Dismissed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_offers_on_then_off() {
        let prompt = ChooserPrompt::new(
            RequestId::new(),
            ProfileId::parse("p").expect("valid id"),
            "Work",
            Some(ProfileState::Off),
        );
        assert_eq!(prompt.options, [ProfileState::On, ProfileState::Off]);
        assert_eq!(prompt.preselected, Some(ProfileState::Off));
    }

    #[tokio::test]
    async fn dismissing_chooser_always_dismisses() {
        let prompt = ChooserPrompt::new(
            RequestId::new(),
            ProfileId::parse("p").expect("valid id"),
            "Work",
            Some(ProfileState::On),
        );
        assert_eq!(
            DismissingChooser.present(prompt).await,
            ChooserOutcome::Dismissed
        );
    }
}

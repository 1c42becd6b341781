//! Apply requests as they arrive from external triggers.
//!
//! A trigger (home-screen shortcut, automation, command line) produces
//! one [`ApplyRequest`]. Raw triggers may be incomplete; the sequencer
//! calls [`ApplyRequest::validate`] when the request reaches the head of
//! the queue and drops it if a required field is missing.

use crate::error::ErrorCode;
use crate::id::RequestId;
use crate::state::{ProfileState, ShortcutKind};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One intent to apply a profile.
///
/// Immutable after creation. `profile` may hold either a canonical
/// profile ID or, for shortcuts created by older releases, the profile's
/// display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplyRequest {
    /// Correlation ID, minted at creation.
    pub id: RequestId,
    /// Profile ID or legacy profile name.
    pub profile: Option<String>,
    /// Shortcut kind; absent on malformed triggers.
    pub kind: Option<ShortcutKind>,
    /// State decided by the trigger, if any.
    pub explicit_state: Option<ProfileState>,
}

impl ApplyRequest {
    /// Creates a request from raw trigger fields, exactly as given.
    #[must_use]
    pub fn new(
        profile: Option<String>,
        kind: Option<ShortcutKind>,
        explicit_state: Option<ProfileState>,
    ) -> Self {
        Self {
            id: RequestId::new(),
            profile,
            kind,
            explicit_state,
        }
    }

    /// Creates a Simple request with a pre-decided state.
    #[must_use]
    pub fn simple(profile: impl Into<String>, state: ProfileState) -> Self {
        Self::new(Some(profile.into()), Some(ShortcutKind::Simple), Some(state))
    }

    /// Creates an Advanced request, optionally with a suggested state.
    #[must_use]
    pub fn advanced(profile: impl Into<String>, state: Option<ProfileState>) -> Self {
        Self::new(Some(profile.into()), Some(ShortcutKind::Advanced), state)
    }

    /// Builds a request the way shortcuts are created.
    ///
    /// Fills in what a shortcut left unspecified:
    ///
    /// | `kind` | `state` | Result |
    /// |--------|---------|--------|
    /// | none | some | Simple with `state` |
    /// | none | none | Advanced, no state |
    /// | Simple | none | Simple with [`ProfileState::On`] |
    /// | given | given | unchanged |
    /// | Advanced | none | unchanged |
    ///
    /// ```
    /// use applier_types::{ApplyRequest, ProfileState, ShortcutKind};
    ///
    /// let req = ApplyRequest::from_shortcut("work", Some(ShortcutKind::Simple), None);
    /// assert_eq!(req.explicit_state, Some(ProfileState::On));
    ///
    /// let req = ApplyRequest::from_shortcut("work", None, None);
    /// assert_eq!(req.kind, Some(ShortcutKind::Advanced));
    /// ```
    #[must_use]
    pub fn from_shortcut(
        profile: impl Into<String>,
        kind: Option<ShortcutKind>,
        state: Option<ProfileState>,
    ) -> Self {
        let (kind, state) = match (kind, state) {
            (None, Some(s)) => (ShortcutKind::Simple, Some(s)),
            (None, None) => (ShortcutKind::Advanced, None),
            (Some(ShortcutKind::Simple), None) => (ShortcutKind::Simple, Some(ProfileState::On)),
            (Some(k), s) => (k, s),
        };
        Self::new(Some(profile.into()), Some(kind), state)
    }

    /// Checks that the request carries a profile and a kind.
    ///
    /// A blank profile string counts as missing.
    ///
    /// # Errors
    ///
    /// Returns [`MalformedRequest`] naming the first missing field.
    pub fn validate(&self) -> Result<ValidRequest, MalformedRequest> {
        let profile = self
            .profile
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .ok_or(MalformedRequest::MissingProfile)?;
        let kind = self.kind.ok_or(MalformedRequest::MissingKind)?;

        Ok(ValidRequest {
            id: self.id,
            profile: profile.to_string(),
            kind,
            explicit_state: self.explicit_state,
        })
    }
}

/// A request that passed [`ApplyRequest::validate`].
///
/// `profile` is still untranslated; it may be a legacy name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidRequest {
    pub id: RequestId,
    pub profile: String,
    pub kind: ShortcutKind,
    pub explicit_state: Option<ProfileState>,
}

/// Why a request was rejected before resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum MalformedRequest {
    /// No profile ID or name was supplied.
    #[error("request has no profile")]
    MissingProfile,
    /// No shortcut kind was supplied.
    #[error("request has no shortcut kind")]
    MissingKind,
}

impl ErrorCode for MalformedRequest {
    fn code(&self) -> &'static str {
        match self {
            Self::MissingProfile => "REQUEST_MISSING_PROFILE",
            Self::MissingKind => "REQUEST_MISSING_KIND",
        }
    }

    fn is_recoverable(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::assert_error_codes;

    #[test]
    fn shortcut_with_state_but_no_kind_is_simple() {
        let req = ApplyRequest::from_shortcut("p", None, Some(ProfileState::Off));
        assert_eq!(req.kind, Some(ShortcutKind::Simple));
        assert_eq!(req.explicit_state, Some(ProfileState::Off));
    }

    #[test]
    fn shortcut_without_anything_is_advanced() {
        let req = ApplyRequest::from_shortcut("p", None, None);
        assert_eq!(req.kind, Some(ShortcutKind::Advanced));
        assert_eq!(req.explicit_state, None);
    }

    #[test]
    fn simple_shortcut_without_state_defaults_on() {
        let req = ApplyRequest::from_shortcut("p", Some(ShortcutKind::Simple), None);
        assert_eq!(req.explicit_state, Some(ProfileState::On));
    }

    #[test]
    fn advanced_shortcut_keeps_given_state() {
        let req =
            ApplyRequest::from_shortcut("p", Some(ShortcutKind::Advanced), Some(ProfileState::Off));
        assert_eq!(req.kind, Some(ShortcutKind::Advanced));
        assert_eq!(req.explicit_state, Some(ProfileState::Off));
    }

    #[test]
    fn validate_accepts_complete_request() {
        let req = ApplyRequest::simple(" work ", ProfileState::On);
        let valid = req.validate().expect("complete request should validate");
        assert_eq!(valid.id, req.id);
        assert_eq!(valid.profile, "work");
        assert_eq!(valid.kind, ShortcutKind::Simple);
    }

    #[test]
    fn validate_reports_missing_profile_first() {
        let req = ApplyRequest::new(None, None, None);
        assert_eq!(req.validate(), Err(MalformedRequest::MissingProfile));

        let req = ApplyRequest::new(Some("  ".into()), Some(ShortcutKind::Simple), None);
        assert_eq!(req.validate(), Err(MalformedRequest::MissingProfile));
    }

    #[test]
    fn validate_reports_missing_kind() {
        let req = ApplyRequest::new(Some("work".into()), None, Some(ProfileState::On));
        assert_eq!(req.validate(), Err(MalformedRequest::MissingKind));
    }

    #[test]
    fn malformed_codes() {
        assert_error_codes(
            &[MalformedRequest::MissingProfile, MalformedRequest::MissingKind],
            "REQUEST_",
        );
    }
}

//! Command-line triggers.
//!
//! A trigger is `profile[:simple|advanced][:on|off]`. Suffixes are
//! peeled from the right, so profile names that contain `:` still work
//! as long as they don't end in a kind or state word.
//!
//! | Trigger | Request |
//! |---------|---------|
//! | `work:simple:off` | Simple, Off |
//! | `work:on` | Simple, On |
//! | `work:simple` | Simple, On |
//! | `work:advanced` | Advanced, no state |
//! | `work` | Advanced, no state |

use applier_types::{ApplyRequest, ProfileState, ShortcutKind};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TriggerError {
    #[error("trigger has no profile")]
    MissingProfile,
    #[error("trigger '{0}' must be profile[:simple|advanced][:on|off]")]
    BadSuffix(String),
}

/// A parsed trigger, before it becomes a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trigger {
    pub profile: String,
    pub kind: Option<ShortcutKind>,
    pub state: Option<ProfileState>,
}

impl Trigger {
    /// Builds the request the way a shortcut would.
    ///
    /// `work:simple` is pinned to `on` here, so the profile's stored
    /// default never applies to it. Use `work:on`/`work:off` for an
    /// explicit state, or `work:advanced` to be offered the default.
    pub fn into_request(self) -> ApplyRequest {
        ApplyRequest::from_shortcut(self.profile, self.kind, self.state)
    }
}

/// clap value parser.
pub fn parse_trigger(raw: &str) -> Result<Trigger, TriggerError> {
    let mut rest = raw;
    let mut kind = None;
    let mut state = None;

    while let Some((head, tail)) = rest.rsplit_once(':') {
        if let Ok(k) = tail.parse::<ShortcutKind>() {
            if kind.replace(k).is_some() {
                return Err(TriggerError::BadSuffix(raw.to_string()));
            }
        } else if let Ok(s) = tail.parse::<ProfileState>() {
            // Scanning right to left, the state must come before the kind.
            if state.replace(s).is_some() || kind.is_some() {
                return Err(TriggerError::BadSuffix(raw.to_string()));
            }
        } else {
            break;
        }
        rest = head;
    }

    if rest.trim().is_empty() {
        return Err(TriggerError::MissingProfile);
    }
    Ok(Trigger {
        profile: rest.to_string(),
        kind,
        state,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(raw: &str) -> Trigger {
        parse_trigger(raw).expect("valid trigger")
    }

    #[test]
    fn full_trigger() {
        let t = parse("work:simple:off");
        assert_eq!(t.profile, "work");
        assert_eq!(t.kind, Some(ShortcutKind::Simple));
        assert_eq!(t.state, Some(ProfileState::Off));
    }

    #[test]
    fn bare_profile() {
        let t = parse("work");
        assert_eq!(t.kind, None);
        assert_eq!(t.state, None);
        assert_eq!(t.into_request().kind, Some(ShortcutKind::Advanced));
    }

    #[test]
    fn state_only_becomes_simple() {
        let req = parse("work:off").into_request();
        assert_eq!(req.kind, Some(ShortcutKind::Simple));
        assert_eq!(req.explicit_state, Some(ProfileState::Off));
    }

    #[test]
    fn simple_without_state_becomes_on() {
        let req = parse("work:simple").into_request();
        assert_eq!(req.explicit_state, Some(ProfileState::On));
    }

    #[test]
    fn profile_may_contain_colons() {
        let t = parse("Work: Late:advanced:on");
        assert_eq!(t.profile, "Work: Late");
        assert_eq!(t.kind, Some(ShortcutKind::Advanced));
        assert_eq!(t.state, Some(ProfileState::On));
    }

    #[test]
    fn empty_profile_is_rejected() {
        assert_eq!(parse_trigger(":on"), Err(TriggerError::MissingProfile));
        assert_eq!(parse_trigger(""), Err(TriggerError::MissingProfile));
    }

    #[test]
    fn misordered_or_repeated_suffix_is_rejected() {
        assert!(matches!(
            parse_trigger("work:on:simple"),
            Err(TriggerError::BadSuffix(_))
        ));
        assert!(matches!(
            parse_trigger("work:on:off"),
            Err(TriggerError::BadSuffix(_))
        ));
    }
}

//! Execution state and shortcut kind.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Binary execution state of a profile.
///
/// Selects which variant of the profile's actions is performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProfileState {
    /// Apply the profile.
    On,
    /// Revert the profile.
    Off,
}

impl ProfileState {
    /// Every state, in the order a chooser presents them.
    pub const ALL: [ProfileState; 2] = [ProfileState::On, ProfileState::Off];

    /// Returns the lowercase wire name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::On => "on",
            Self::Off => "off",
        }
    }
}

impl fmt::Display for ProfileState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string names no known state or kind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognized {what}: '{input}'")]
pub struct ParseEnumError {
    what: &'static str,
    input: String,
}

impl FromStr for ProfileState {
    type Err = ParseEnumError;

    /// Accepts `on/off`, `true/false` and `1/0`, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "on" | "true" | "1" => Ok(Self::On),
            "off" | "false" | "0" => Ok(Self::Off),
            _ => Err(ParseEnumError {
                what: "profile state",
                input: s.to_string(),
            }),
        }
    }
}

/// How a shortcut decides its execution state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShortcutKind {
    /// The trigger pre-commits to a state; never prompts.
    Simple,
    /// The state is resolved per request, possibly by asking the user.
    Advanced,
}

impl ShortcutKind {
    /// Returns the lowercase wire name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Simple => "simple",
            Self::Advanced => "advanced",
        }
    }
}

impl fmt::Display for ShortcutKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ShortcutKind {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "simple" => Ok(Self::Simple),
            "advanced" => Ok(Self::Advanced),
            _ => Err(ParseEnumError {
                what: "shortcut kind",
                input: s.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_parses_aliases() {
        assert_eq!("on".parse::<ProfileState>(), Ok(ProfileState::On));
        assert_eq!("TRUE".parse::<ProfileState>(), Ok(ProfileState::On));
        assert_eq!(" 0 ".parse::<ProfileState>(), Ok(ProfileState::Off));
        assert_eq!("Off".parse::<ProfileState>(), Ok(ProfileState::Off));
    }

    #[test]
    fn state_rejects_unknown() {
        let err = "maybe".parse::<ProfileState>().unwrap_err();
        assert!(err.to_string().contains("maybe"));
        assert!(err.to_string().contains("profile state"));
    }

    #[test]
    fn state_serde_is_lowercase() {
        let json = serde_json::to_string(&ProfileState::Off).expect("should serialize");
        assert_eq!(json, "\"off\"");
        let back: ProfileState = serde_json::from_str("\"on\"").expect("should deserialize");
        assert_eq!(back, ProfileState::On);
    }

    #[test]
    fn chooser_order_is_on_then_off() {
        assert_eq!(ProfileState::ALL, [ProfileState::On, ProfileState::Off]);
    }

    #[test]
    fn kind_round_trips_through_display() {
        for kind in [ShortcutKind::Simple, ShortcutKind::Advanced] {
            assert_eq!(kind.to_string().parse::<ShortcutKind>(), Ok(kind));
        }
        assert!("fancy".parse::<ShortcutKind>().is_err());
    }
}

//! Identifier types.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Canonical identifier of a stored profile.
///
/// Profile IDs are opaque strings chosen by the profile store. Older
/// shortcuts may still carry a human-readable profile *name* instead;
/// those are translated by the store before a `ProfileId` is built
/// from them.
///
/// The inner string is always trimmed and non-empty.
///
/// # Example
///
/// ```
/// use applier_types::ProfileId;
///
/// let id = ProfileId::parse("  1699999999  ").expect("non-blank id");
/// assert_eq!(id.as_str(), "1699999999");
/// assert!(ProfileId::parse("   ").is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProfileId(String);

impl ProfileId {
    /// Builds an ID from raw input, returning `None` for blank strings.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    /// Returns the ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProfileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ProfileId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Identifier of a single apply request.
///
/// Assigned when the trigger fires. It correlates the asynchronous
/// load and chooser hand-offs with the request currently in flight, and
/// tags every log line for that request.
///
/// `RequestId` does not implement `Default`; an ID is only minted
/// together with the request it names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestId(pub Uuid);

impl RequestId {
    /// Creates a new random request ID.
    #[must_use]
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub fn uuid(&self) -> Uuid {
        self.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "req:{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_id_trims() {
        let id = ProfileId::parse(" work ").expect("should accept padded id");
        assert_eq!(id.as_str(), "work");
        assert_eq!(id.to_string(), "work");
    }

    #[test]
    fn profile_id_rejects_blank() {
        assert!(ProfileId::parse("").is_none());
        assert!(ProfileId::parse("\t\n").is_none());
    }

    #[test]
    fn profile_id_serializes_transparently() {
        let id = ProfileId::parse("abc").expect("should parse");
        let json = serde_json::to_string(&id).expect("should serialize");
        assert_eq!(json, "\"abc\"");
    }

    #[test]
    fn request_ids_are_unique() {
        assert_ne!(RequestId::new(), RequestId::new());
    }

    #[test]
    fn request_id_display() {
        let id = RequestId::new();
        let display = id.to_string();
        assert!(display.starts_with("req:"));
        assert!(display.contains(&id.uuid().to_string()));
    }
}

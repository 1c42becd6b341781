//! Core types for the profile applier.
//!
//! This crate holds the vocabulary shared by the runtime and any
//! frontend that produces apply requests.
//!
//! # Crate Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  applier-types   : IDs, ProfileState, ApplyRequest  ◄── HERE │
//! └─────────────────────────────────────────────────────────────┘
//!                               ↓
//! ┌─────────────────────────────────────────────────────────────┐
//! │  applier-runtime : RequestQueue, Sequencer, collaborators    │
//! └─────────────────────────────────────────────────────────────┘
//!                               ↓
//! ┌─────────────────────────────────────────────────────────────┐
//! │  applier-cli     : `applier` binary                          │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use applier_types::{ApplyRequest, ProfileState, ShortcutKind};
//!
//! let req = ApplyRequest::from_shortcut("1699999999", None, Some(ProfileState::Off));
//! let valid = req.validate().expect("shortcut requests are complete");
//! assert_eq!(valid.kind, ShortcutKind::Simple);
//! ```

mod error;
mod id;
mod request;
mod state;

pub use error::{assert_error_code, assert_error_codes, ErrorCode};
pub use id::{ProfileId, RequestId};
pub use request::{ApplyRequest, MalformedRequest, ValidRequest};
pub use state::{ParseEnumError, ProfileState, ShortcutKind};

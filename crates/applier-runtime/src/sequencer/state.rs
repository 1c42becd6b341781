//! Sequencer lifecycle states.
//!
//! ```text
//!            advance()                      Advanced
//!   ┌──────┐ ─────────► ┌───────────┐ ───────────────► ┌────────────────┐
//!   │ Idle │            │ Resolving │                  │ AwaitingChoice │
//!   └──────┘ ◄───────── └───────────┘                  └────────────────┘
//!      │     drop/next        │ Simple                  Selected │  │ Dismissed
//!      │                      ▼                                  ▼  │
//!      │               ┌─────────────┐ ◄─────────────────────────────┘
//!      │               │ Dispatching │ ──► advance()               (advance())
//!      ▼               └─────────────┘
//!   ┌─────────┐
//!   │ Drained │  (terminal)
//!   └─────────┘
//! ```

use applier_types::RequestId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Where the sequencer is in processing its queue.
///
/// Active states carry the ID of the request in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SequencerState {
    /// Nothing in flight and nothing queued.
    Idle,
    /// Waiting for the profile store.
    Resolving {
        /// Request being resolved.
        request: RequestId,
    },
    /// A chooser prompt is open.
    AwaitingChoice {
        /// Request the prompt belongs to.
        request: RequestId,
    },
    /// Handing the order to the dispatcher.
    Dispatching {
        /// Request being dispatched.
        request: RequestId,
    },
    /// The queue drained and the control loop exited.
    Drained,
}

impl SequencerState {
    /// Returns the in-flight request, if any.
    #[must_use]
    pub fn request(&self) -> Option<RequestId> {
        match self {
            Self::Resolving { request }
            | Self::AwaitingChoice { request }
            | Self::Dispatching { request } => Some(*request),
            Self::Idle | Self::Drained => None,
        }
    }

    /// Returns `true` while a request is in flight.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.request().is_some()
    }

    /// Returns `true` once the control loop has exited.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Drained)
    }

    /// Returns `true` if the lifecycle permits moving to `next`.
    ///
    /// Leaving an active state always passes through `advance()`, which
    /// may land on `Idle`, `Drained` or the next request's `Resolving`.
    #[must_use]
    pub fn allows(&self, next: &SequencerState) -> bool {
        use SequencerState::{AwaitingChoice, Dispatching, Drained, Idle, Resolving};
        match (self, next) {
            (Drained, _) => false,
            (_, Idle | Drained | Resolving { .. }) => true,
            (Resolving { request: a }, AwaitingChoice { request: b } | Dispatching { request: b }) => {
                a == b
            }
            (AwaitingChoice { request: a }, Dispatching { request: b }) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for SequencerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => f.write_str("idle"),
            Self::Resolving { request } => write!(f, "resolving({request})"),
            Self::AwaitingChoice { request } => write!(f, "awaiting_choice({request})"),
            Self::Dispatching { request } => write!(f, "dispatching({request})"),
            Self::Drained => f.write_str("drained"),
        }
    }
}

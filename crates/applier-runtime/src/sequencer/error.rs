//! Sequencer handle errors.
//!
//! # Error Codes
//!
//! | Variant | Code | Recoverable |
//! |---------|------|-------------|
//! | [`SequencerError::Closed`] | `SEQUENCER_CLOSED` | No |

use applier_types::ErrorCode;
use thiserror::Error;

/// Failure to hand a request to the sequencer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SequencerError {
    /// The control loop has exited; the request was not scheduled.
    #[error("sequencer has shut down")]
    Closed,
}

impl ErrorCode for SequencerError {
    fn code(&self) -> &'static str {
        match self {
            Self::Closed => "SEQUENCER_CLOSED",
        }
    }

    fn is_recoverable(&self) -> bool {
        false
    }
}

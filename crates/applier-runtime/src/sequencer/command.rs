//! Mailbox commands for the sequencer control loop.
//!
//! Handles and spawned work tasks never touch the in-flight application
//! directly; they post a [`SequencerCommand`] and the control loop
//! applies it on its own task.
//!
//! ```text
//! SequencerHandle ──(Wake/Shutdown)──┐
//!                                    │
//! load task ───────(Loaded)──────────┼──► mpsc::UnboundedSender ──► Sequencer::run
//!                                    │
//! chooser task ────(Chosen)──────────┘
//! ```

use crate::chooser::ChooserOutcome;
use crate::profile::{ResolvedProfile, StoreError};
use applier_types::RequestId;
use tokio::sync::mpsc;

/// Commands consumed by [`Sequencer::run`](super::Sequencer::run).
#[derive(Debug)]
pub(crate) enum SequencerCommand {
    /// A request was enqueued; advance if idle.
    Wake,

    /// A profile load finished.
    Loaded {
        /// Request the load was issued for.
        ticket: RequestId,
        /// Store result, with task panics already mapped to an error.
        result: Result<ResolvedProfile, StoreError>,
    },

    /// The chooser answered.
    Chosen {
        /// Request the prompt was opened for.
        ticket: RequestId,
        /// Answer, with task panics already mapped to `Dismissed`.
        outcome: ChooserOutcome,
    },

    /// Exit once the queue drains.
    Shutdown,
}

/// Sender half of the sequencer mailbox.
pub(crate) type CommandSender = mpsc::UnboundedSender<SequencerCommand>;

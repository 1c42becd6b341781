//! The request sequencer.
//!
//! Applies queued profile requests strictly one at a time:
//!
//! ```text
//! submit() ──► RequestQueue ──► advance() ──► ProfileStore (async)
//!                                                 │
//!                         ┌───────────────────────┴──────────────┐
//!                         ▼ Simple / decided                     ▼ Advanced
//!                  ExecutionDispatcher ◄── Selected ── ChooserGateway (async)
//!                         │                                      │ Dismissed
//!                         └──────────────► advance() ◄───────────┘
//! ```
//!
//! Every terminal path (dispatch, skip, drop) calls `advance()` exactly
//! once, and `advance()` is a no-op while a request is in flight.

mod command;
mod error;
mod handle;
mod report;
mod runner;
mod state;

pub use error::SequencerError;
pub use handle::SequencerHandle;
pub use report::{SequencerReport, TerminalOutcome, TerminalRecord};
pub use runner::{Sequencer, SequencerBuilder};
pub use state::SequencerState;

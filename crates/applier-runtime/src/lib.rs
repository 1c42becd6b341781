//! Applier Runtime - the request sequencer and its collaborators.
//!
//! # Crate Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  applier-types   : ApplyRequest, ProfileState, ErrorCode    │
//! └─────────────────────────────────────────────────────────────┘
//!                               ↓
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   Runtime Layer (THIS CRATE)                 │
//! ├─────────────────────────────────────────────────────────────┤
//! │  queue/      : RequestQueue (FIFO, any-thread enqueue)      │
//! │  sequencer/  : Sequencer control loop, SequencerHandle      │
//! │  profile/    : ProfileStore trait, FsProfileStore           │
//! │  chooser/    : ChooserGateway trait, ConsoleChooser         │
//! │  dispatch/   : ExecutionDispatcher trait, ChannelDispatcher │
//! │  config/     : ApplierConfig, layered ConfigLoader          │
//! └─────────────────────────────────────────────────────────────┘
//!                               ↓
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   Frontend Layer                             │
//! │  (applier-cli)                                               │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! ## [`sequencer`] - Sequential Application
//!
//! - [`Sequencer`]: drains the queue one request at a time
//! - [`SequencerHandle`]: submit from any thread, observe state
//! - [`SequencerReport`]: terminal record per request
//!
//! ## Collaborators
//!
//! - [`ProfileStore`]: resolves a profile ID to its definition
//! - [`ChooserGateway`](chooser::ChooserGateway): asks a human for On/Off
//! - [`ExecutionDispatcher`]: receives finished orders
//!
//! In-memory versions of all three live in [`testing`].
//!
//! ## [`config`] - Configuration Management
//!
//! Configuration priority: CLI > Environment > Project > Global > Default

pub mod chooser;
pub mod config;
pub mod dispatch;
pub mod profile;
pub mod queue;
pub mod sequencer;
pub mod testing;

// Re-exports for convenience
pub use chooser::{ChooserGateway, ChooserOutcome, ChooserPrompt, ConsoleChooser, DismissingChooser};
pub use config::{ApplierConfig, ConfigError, ConfigLoader, ConfigResolver, SequencerConfig};
pub use dispatch::{ChannelDispatcher, DispatchOrder, ExecutionDispatcher};
pub use profile::{FsProfileStore, ProfileEntry, ProfileStore, ResolvedProfile, StoreError};
pub use queue::{QueueClosed, RequestQueue};
pub use sequencer::{
    Sequencer, SequencerBuilder, SequencerError, SequencerHandle, SequencerReport, SequencerState,
    TerminalOutcome, TerminalRecord,
};

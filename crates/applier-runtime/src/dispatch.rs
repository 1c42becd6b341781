//! Hand-off of fully resolved requests to the execution service.
//!
//! Dispatch is fire-and-forget: the sequencer hands over a
//! [`DispatchOrder`] and moves on without observing the result. Failures
//! inside the execution service are that service's concern.

use applier_types::{ProfileId, ProfileState, RequestId};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// A request with everything the execution service needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchOrder {
    /// Originating request.
    pub request_id: RequestId,
    /// Canonical profile ID.
    pub profile_id: ProfileId,
    /// Profile display name.
    pub profile_name: String,
    /// Final execution state.
    pub state: ProfileState,
}

/// Receives resolved orders.
///
/// `dispatch` must return promptly; long-running work belongs on the
/// implementation's own task or thread.
pub trait ExecutionDispatcher: Send + Sync {
    /// Hands the order over. No result is observed.
    fn dispatch(&self, order: DispatchOrder);
}

/// Forwards orders to an out-of-band executor over an unbounded channel.
///
/// # Example
///
/// ```
/// use applier_runtime::{ChannelDispatcher, DispatchOrder, ExecutionDispatcher};
/// use applier_types::{ProfileId, ProfileState, RequestId};
///
/// let (dispatcher, mut orders) = ChannelDispatcher::new();
/// dispatcher.dispatch(DispatchOrder {
///     request_id: RequestId::new(),
///     profile_id: ProfileId::parse("1001").expect("valid id"),
///     profile_name: "Work".into(),
///     state: ProfileState::On,
/// });
/// assert_eq!(orders.try_recv().map(|o| o.state).ok(), Some(ProfileState::On));
/// ```
#[derive(Debug, Clone)]
pub struct ChannelDispatcher {
    tx: mpsc::UnboundedSender<DispatchOrder>,
}

impl ChannelDispatcher {
    /// Creates a dispatcher and the receiver the executor drains.
    #[must_use]
    pub fn new() -> (Self, mpsc::UnboundedReceiver<DispatchOrder>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl ExecutionDispatcher for ChannelDispatcher {
    fn dispatch(&self, order: DispatchOrder) {
        let request = order.request_id;
        match self.tx.send(order) {
            Ok(()) => debug!(request = %request, "Order handed to executor"),
            Err(_) => warn!(request = %request, "Executor is gone, order discarded"),
        }
    }
}

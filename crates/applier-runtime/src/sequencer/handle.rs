//! Thread-safe handle for feeding and observing a running sequencer.

use super::command::{CommandSender, SequencerCommand};
use super::error::SequencerError;
use super::state::SequencerState;
use crate::queue::RequestQueue;
use applier_types::{ApplyRequest, RequestId};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::debug;

struct HandleInner {
    queue: Arc<RequestQueue>,
    command_tx: CommandSender,
    state_rx: watch::Receiver<SequencerState>,
}

impl Drop for HandleInner {
    fn drop(&mut self) {
        // Last handle gone: nobody can submit any more.
        let _ = self.command_tx.send(SequencerCommand::Shutdown);
    }
}

/// Cloneable handle to a [`Sequencer`](super::Sequencer).
///
/// `submit` is synchronous and may be called from any thread, including
/// from outside the tokio runtime. Dropping the last clone asks the
/// sequencer to finish its queue and exit.
#[derive(Clone)]
pub struct SequencerHandle {
    inner: Arc<HandleInner>,
}

impl SequencerHandle {
    pub(crate) fn new(
        queue: Arc<RequestQueue>,
        command_tx: CommandSender,
        state_rx: watch::Receiver<SequencerState>,
    ) -> Self {
        Self {
            inner: Arc::new(HandleInner {
                queue,
                command_tx,
                state_rx,
            }),
        }
    }

    /// Enqueues a request and wakes the sequencer.
    ///
    /// The request never interrupts the one in flight; it waits its turn
    /// in FIFO order.
    ///
    /// # Errors
    ///
    /// Returns [`SequencerError::Closed`] if the sequencer has exited.
    pub fn submit(&self, request: ApplyRequest) -> Result<RequestId, SequencerError> {
        let id = request.id;
        self.inner
            .queue
            .enqueue(request)
            .map_err(|_| SequencerError::Closed)?;
        self.inner
            .command_tx
            .send(SequencerCommand::Wake)
            .map_err(|_| SequencerError::Closed)?;
        debug!(request = %id, "Request submitted");
        Ok(id)
    }

    /// Asks the sequencer to exit once the queue drains.
    ///
    /// Requests already queued are still processed. Returns `false` if
    /// the sequencer had already exited.
    pub fn shutdown(&self) -> bool {
        self.inner
            .command_tx
            .send(SequencerCommand::Shutdown)
            .is_ok()
    }

    /// Returns the current state.
    #[must_use]
    pub fn state(&self) -> SequencerState {
        *self.inner.state_rx.borrow()
    }

    /// Returns a receiver notified on every state change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SequencerState> {
        self.inner.state_rx.clone()
    }

    /// Waits until the state satisfies `predicate`.
    ///
    /// Returns the matching state, or `None` if the sequencer was dropped
    /// first.
    pub async fn wait_for<F>(&self, mut predicate: F) -> Option<SequencerState>
    where
        F: FnMut(&SequencerState) -> bool,
    {
        let mut rx = self.subscribe();
        let state = rx.wait_for(|s| predicate(s)).await.ok().map(|s| *s);
        state
    }

    /// Number of requests waiting behind the one in flight.
    #[must_use]
    pub fn queued(&self) -> usize {
        self.inner.queue.len()
    }
}

impl std::fmt::Debug for SequencerHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SequencerHandle")
            .field("state", &self.state())
            .field("queued", &self.queued())
            .finish()
    }
}

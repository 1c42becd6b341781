//! Thread-safe FIFO of not-yet-started apply requests.
//!
//! Triggers enqueue from any thread; the sequencer is the single
//! consumer. Both sides go through one mutex, so ordering can never be
//! corrupted by a concurrent enqueue/dequeue pair.
//!
//! The queue is unbounded. Triggers come from real-world launches and
//! arrive at human pace, so growth is not a practical concern.

use applier_types::ApplyRequest;
use parking_lot::Mutex;
use std::collections::VecDeque;
use thiserror::Error;
use tracing::debug;

/// Returned by [`RequestQueue::enqueue`] once the queue is closed.
///
/// Carries the rejected request back to the caller.
#[derive(Debug, Error)]
#[error("request queue is closed")]
pub struct QueueClosed(pub ApplyRequest);

#[derive(Debug, Default)]
struct QueueInner {
    items: VecDeque<ApplyRequest>,
    closed: bool,
}

/// Ordered holding area for incoming [`ApplyRequest`]s.
///
/// No priority and no deduplication: the same request enqueued twice is
/// processed twice.
///
/// Once the consumer has decided to stop it calls
/// [`close_if_empty`](Self::close_if_empty); the emptiness check and the
/// close happen under the same lock, so no request can slip in between
/// and be stranded.
#[derive(Debug, Default)]
pub struct RequestQueue {
    inner: Mutex<QueueInner>,
}

impl RequestQueue {
    /// Creates an empty, open queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a request to the tail.
    ///
    /// Returns the queue length after the append.
    ///
    /// # Errors
    ///
    /// Returns [`QueueClosed`] with the request if the consumer has exited.
    pub fn enqueue(&self, request: ApplyRequest) -> Result<usize, QueueClosed> {
        let mut queue = self.inner.lock();
        if queue.closed {
            return Err(QueueClosed(request));
        }
        debug!(
            request = %request.id,
            queue_size = queue.items.len() + 1,
            "enqueued apply request"
        );
        queue.items.push_back(request);
        Ok(queue.items.len())
    }

    /// Removes and returns the head, or `None` if the queue is empty.
    pub fn dequeue(&self) -> Option<ApplyRequest> {
        let mut queue = self.inner.lock();
        let request = queue.items.pop_front();
        if let Some(ref req) = request {
            debug!(request = %req.id, remaining = queue.items.len(), "dequeued apply request");
        }
        request
    }

    /// Closes the queue if, and only if, it is empty.
    ///
    /// Returns `true` if the queue is now closed.
    pub fn close_if_empty(&self) -> bool {
        let mut queue = self.inner.lock();
        if queue.items.is_empty() {
            queue.closed = true;
        }
        queue.closed
    }

    /// Returns `true` once the queue refuses new requests.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.inner.lock().closed
    }

    /// Returns the number of waiting requests.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.lock().items.len()
    }

    /// Returns `true` if no request is waiting.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.lock().items.is_empty()
    }
}

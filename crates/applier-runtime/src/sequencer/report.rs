//! Record of how each request left the sequencer.

use crate::dispatch::DispatchOrder;
use applier_types::{MalformedRequest, RequestId};
use serde::Serialize;

/// How a request reached its terminal transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum TerminalOutcome {
    /// Handed to the dispatcher.
    Dispatched {
        /// The order as dispatched.
        order: DispatchOrder,
    },
    /// Rejected before resolution.
    DroppedMalformed {
        /// The missing field.
        reason: MalformedRequest,
    },
    /// The profile store failed.
    DroppedResolution {
        /// Store error code, e.g. `STORE_NOT_FOUND`.
        code: String,
        /// Human-readable error.
        message: String,
    },
    /// The chooser was dismissed.
    Skipped,
}

impl TerminalOutcome {
    /// Returns the dispatched order, if any.
    #[must_use]
    pub fn order(&self) -> Option<&DispatchOrder> {
        match self {
            Self::Dispatched { order } => Some(order),
            _ => None,
        }
    }
}

/// One request's terminal transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TerminalRecord {
    /// The request.
    pub request_id: RequestId,
    /// What happened to it.
    #[serde(flatten)]
    pub outcome: TerminalOutcome,
}

/// Everything the sequencer did, in processing order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SequencerReport {
    /// Terminal records in the order the requests finished.
    pub records: Vec<TerminalRecord>,
}

impl SequencerReport {
    pub(crate) fn push(&mut self, request_id: RequestId, outcome: TerminalOutcome) {
        self.records.push(TerminalRecord {
            request_id,
            outcome,
        });
    }

    /// Dispatched orders, in dispatch order.
    pub fn dispatched(&self) -> impl Iterator<Item = &DispatchOrder> {
        self.records.iter().filter_map(|r| r.outcome.order())
    }

    /// Number of requests that were dropped or skipped.
    #[must_use]
    pub fn not_dispatched(&self) -> usize {
        self.records
            .iter()
            .filter(|r| r.outcome.order().is_none())
            .count()
    }

    /// Request IDs in terminal order.
    #[must_use]
    pub fn request_ids(&self) -> Vec<RequestId> {
        self.records.iter().map(|r| r.request_id).collect()
    }

    /// Looks up the record for a request.
    #[must_use]
    pub fn get(&self, request_id: RequestId) -> Option<&TerminalRecord> {
        self.records.iter().find(|r| r.request_id == request_id)
    }
}

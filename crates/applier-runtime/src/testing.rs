//! In-memory collaborators for tests and embedding.
//!
//! - [`MemoryProfileStore`]: profiles in a map, with injectable failures,
//!   legacy names and an optional gate that holds loads back.
//! - [`ScriptedChooser`]: answers from a script, or from the test at
//!   runtime in manual mode. Records every prompt.
//! - [`RecordingDispatcher`]: keeps every order.

use crate::chooser::{ChooserGateway, ChooserOutcome, ChooserPrompt};
use crate::dispatch::{DispatchOrder, ExecutionDispatcher};
use crate::profile::{ProfileStore, ResolvedProfile, StoreError};
use applier_types::ProfileId;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, Semaphore};

/// Holds profile loads until released.
///
/// Each [`release`](Self::release) lets that many loads proceed.
#[derive(Debug, Clone)]
pub struct LoadGate {
    permits: Arc<Semaphore>,
}

impl LoadGate {
    /// Lets `n` more loads through.
    pub fn release(&self, n: usize) {
        self.permits.add_permits(n);
    }
}

/// [`ProfileStore`] backed by a map.
#[derive(Debug, Default)]
pub struct MemoryProfileStore {
    profiles: Mutex<HashMap<ProfileId, ResolvedProfile>>,
    legacy: Mutex<HashMap<String, ProfileId>>,
    failures: Mutex<HashMap<ProfileId, String>>,
    lookups: Mutex<Vec<ProfileId>>,
    gate: Option<LoadGate>,
}

impl MemoryProfileStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store whose loads wait on the returned gate.
    #[must_use]
    pub fn gated() -> (Self, LoadGate) {
        let gate = LoadGate {
            permits: Arc::new(Semaphore::new(0)),
        };
        let store = Self {
            gate: Some(gate.clone()),
            ..Self::default()
        };
        (store, gate)
    }

    /// Adds or replaces a profile.
    pub fn insert(&self, profile: ResolvedProfile) {
        self.profiles.lock().insert(profile.id.clone(), profile);
    }

    /// Maps a legacy display name to a canonical ID.
    pub fn insert_legacy_name(&self, name: impl Into<String>, id: ProfileId) {
        self.legacy.lock().insert(name.into(), id);
    }

    /// Makes loads of `id` fail with a read error.
    pub fn fail_with(&self, id: ProfileId, reason: impl Into<String>) {
        self.failures.lock().insert(id, reason.into());
    }

    /// Clears an injected failure.
    pub fn heal(&self, id: &ProfileId) {
        self.failures.lock().remove(id);
    }

    /// IDs passed to `resolve_profile`, in call order.
    #[must_use]
    pub fn lookups(&self) -> Vec<ProfileId> {
        self.lookups.lock().clone()
    }
}

#[async_trait]
impl ProfileStore for MemoryProfileStore {
    async fn translate_legacy_id(&self, name_or_id: &ProfileId) -> ProfileId {
        if self.profiles.lock().contains_key(name_or_id) {
            return name_or_id.clone();
        }
        self.legacy
            .lock()
            .get(name_or_id.as_str())
            .cloned()
            .unwrap_or_else(|| name_or_id.clone())
    }

    async fn resolve_profile(&self, id: &ProfileId) -> Result<ResolvedProfile, StoreError> {
        if let Some(gate) = &self.gate {
            let permit = gate
                .permits
                .acquire()
                .await
                .map_err(|_| StoreError::unavailable("load gate closed"))?;
            permit.forget();
        }

        self.lookups.lock().push(id.clone());

        if let Some(reason) = self.failures.lock().get(id) {
            return Err(StoreError::read(
                format!("memory://{id}"),
                std::io::Error::other(reason.clone()),
            ));
        }
        self.profiles
            .lock()
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::not_found(id.clone(), Vec::new()))
    }
}

/// [`ChooserGateway`] with canned or test-driven answers.
///
/// Scripted mode pops answers in order and dismisses once the script
/// runs out. Manual mode waits for answers sent through the paired
/// [`ChooserRemote`].
#[derive(Debug)]
pub struct ScriptedChooser {
    script: Mutex<VecDeque<ChooserOutcome>>,
    remote: Option<tokio::sync::Mutex<mpsc::UnboundedReceiver<ChooserOutcome>>>,
    prompts: Mutex<Vec<ChooserPrompt>>,
    open: AtomicUsize,
    max_open: AtomicUsize,
}

/// Sends answers to a manual [`ScriptedChooser`].
#[derive(Debug, Clone)]
pub struct ChooserRemote {
    tx: mpsc::UnboundedSender<ChooserOutcome>,
}

impl ChooserRemote {
    /// Answers the open prompt, or the next one to open.
    pub fn answer(&self, outcome: ChooserOutcome) {
        let _ = self.tx.send(outcome);
    }
}

impl ScriptedChooser {
    /// Creates a chooser that answers from `answers` in order.
    pub fn new(answers: impl IntoIterator<Item = ChooserOutcome>) -> Self {
        Self {
            script: Mutex::new(answers.into_iter().collect()),
            remote: None,
            prompts: Mutex::new(Vec::new()),
            open: AtomicUsize::new(0),
            max_open: AtomicUsize::new(0),
        }
    }

    /// Creates a chooser that waits for answers from the remote.
    ///
    /// Dropping every remote dismisses pending and future prompts.
    #[must_use]
    pub fn manual() -> (Self, ChooserRemote) {
        let (tx, rx) = mpsc::unbounded_channel();
        let chooser = Self {
            remote: Some(tokio::sync::Mutex::new(rx)),
            ..Self::new([])
        };
        (chooser, ChooserRemote { tx })
    }

    /// Prompts presented so far.
    #[must_use]
    pub fn prompts(&self) -> Vec<ChooserPrompt> {
        self.prompts.lock().clone()
    }

    /// Highest number of prompts that were open at the same time.
    #[must_use]
    pub fn max_concurrent(&self) -> usize {
        self.max_open.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChooserGateway for ScriptedChooser {
    async fn present(&self, prompt: ChooserPrompt) -> ChooserOutcome {
        let now_open = self.open.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_open.fetch_max(now_open, Ordering::SeqCst);
        self.prompts.lock().push(prompt);

        let outcome = match &self.remote {
            Some(rx) => rx
                .lock()
                .await
                .recv()
                .await
                .unwrap_or(ChooserOutcome::Dismissed),
            None => self
                .script
                .lock()
                .pop_front()
                .unwrap_or(ChooserOutcome::Dismissed),
        };

        self.open.fetch_sub(1, Ordering::SeqCst);
        outcome
    }
}

/// [`ExecutionDispatcher`] that keeps every order.
#[derive(Debug, Default)]
pub struct RecordingDispatcher {
    orders: Mutex<Vec<DispatchOrder>>,
}

impl RecordingDispatcher {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Orders dispatched so far.
    #[must_use]
    pub fn orders(&self) -> Vec<DispatchOrder> {
        self.orders.lock().clone()
    }
}

impl ExecutionDispatcher for RecordingDispatcher {
    fn dispatch(&self, order: DispatchOrder) {
        self.orders.lock().push(order);
    }
}

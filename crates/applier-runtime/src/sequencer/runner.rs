//! The sequencer control loop.

use super::command::{CommandSender, SequencerCommand};
use super::handle::SequencerHandle;
use super::report::{SequencerReport, TerminalOutcome};
use super::state::SequencerState;
use crate::chooser::{ChooserGateway, ChooserOutcome, ChooserPrompt};
use crate::config::SequencerConfig;
use crate::dispatch::{DispatchOrder, ExecutionDispatcher};
use crate::profile::{ProfileStore, ResolvedProfile, StoreError};
use crate::queue::RequestQueue;
use applier_types::{
    ErrorCode, MalformedRequest, ProfileId, ProfileState, RequestId, ShortcutKind, ValidRequest,
};
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

/// The request currently being processed.
///
/// Owned by the control loop; never shared with spawned tasks.
#[derive(Debug)]
struct PendingApplication {
    request: ValidRequest,
    /// Set once the profile has loaded and a prompt is open.
    profile: Option<ResolvedProfile>,
}

/// Builder for [`Sequencer`].
pub struct SequencerBuilder {
    store: Arc<dyn ProfileStore>,
    chooser: Arc<dyn ChooserGateway>,
    dispatcher: Arc<dyn ExecutionDispatcher>,
    config: SequencerConfig,
}

impl SequencerBuilder {
    /// Replaces the default [`SequencerConfig`].
    #[must_use]
    pub fn with_config(mut self, config: SequencerConfig) -> Self {
        self.config = config;
        self
    }

    /// Creates the sequencer and its first handle.
    ///
    /// Nothing runs until [`Sequencer::run`] is awaited. Requests
    /// submitted before that wait in the queue.
    #[must_use]
    pub fn build(self) -> (Sequencer, SequencerHandle) {
        let queue = Arc::new(RequestQueue::new());
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (state_tx, state_rx) = watch::channel(SequencerState::Idle);

        let handle = SequencerHandle::new(Arc::clone(&queue), command_tx.clone(), state_rx);
        let sequencer = Sequencer {
            queue,
            command_tx,
            command_rx,
            state_tx,
            store: self.store,
            chooser: self.chooser,
            dispatcher: self.dispatcher,
            config: self.config,
            pending: None,
            shutdown_requested: false,
            report: SequencerReport::default(),
        };
        (sequencer, handle)
    }
}

/// Drains the request queue one application at a time.
///
/// Profile loads and chooser prompts run on spawned tasks and report
/// back through the mailbox, so the in-flight application is only ever
/// touched by [`run`](Self::run).
///
/// # Example
///
/// ```
/// use applier_runtime::testing::{MemoryProfileStore, RecordingDispatcher, ScriptedChooser};
/// use applier_runtime::{ResolvedProfile, Sequencer};
/// use applier_types::{ApplyRequest, ProfileId, ProfileState};
/// use std::sync::Arc;
///
/// # tokio_test_block(async {
/// let id = ProfileId::parse("1001").expect("valid id");
/// let store = Arc::new(MemoryProfileStore::new());
/// store.insert(ResolvedProfile::new(id, "Work", None));
/// let dispatcher = Arc::new(RecordingDispatcher::new());
///
/// let (sequencer, handle) = Sequencer::builder(
///     store,
///     Arc::new(ScriptedChooser::new([])),
///     dispatcher.clone(),
/// )
/// .build();
///
/// handle.submit(ApplyRequest::simple("1001", ProfileState::Off)).expect("sequencer open");
/// let report = sequencer.run().await;
///
/// assert_eq!(report.dispatched().count(), 1);
/// assert_eq!(dispatcher.orders()[0].state, ProfileState::Off);
/// # });
/// # fn tokio_test_block(f: impl std::future::Future<Output = ()>) {
/// #     tokio::runtime::Builder::new_current_thread().enable_all().build().expect("runtime").block_on(f)
/// # }
/// ```
pub struct Sequencer {
    queue: Arc<RequestQueue>,
    command_tx: CommandSender,
    command_rx: mpsc::UnboundedReceiver<SequencerCommand>,
    state_tx: watch::Sender<SequencerState>,
    store: Arc<dyn ProfileStore>,
    chooser: Arc<dyn ChooserGateway>,
    dispatcher: Arc<dyn ExecutionDispatcher>,
    config: SequencerConfig,
    pending: Option<PendingApplication>,
    shutdown_requested: bool,
    report: SequencerReport,
}

impl Sequencer {
    /// Starts building a sequencer over the three collaborators.
    #[must_use]
    pub fn builder(
        store: Arc<dyn ProfileStore>,
        chooser: Arc<dyn ChooserGateway>,
        dispatcher: Arc<dyn ExecutionDispatcher>,
    ) -> SequencerBuilder {
        SequencerBuilder {
            store,
            chooser,
            dispatcher,
            config: SequencerConfig::default(),
        }
    }

    /// Runs the control loop until the sequencer drains.
    ///
    /// Returns when the queue is empty and either `exit_when_idle` is
    /// set, a shutdown was requested, or every handle was dropped.
    pub async fn run(mut self) -> SequencerReport {
        info!(
            exit_when_idle = self.config.exit_when_idle,
            queued = self.queue.len(),
            "Sequencer started"
        );

        self.advance();
        while !self.state().is_terminal() {
            let Some(cmd) = self.command_rx.recv().await else {
                break;
            };
            self.apply_command(cmd);
        }

        info!(
            processed = self.report.records.len(),
            dispatched = self.report.dispatched().count(),
            "Sequencer stopped"
        );
        self.report
    }

    fn apply_command(&mut self, cmd: SequencerCommand) {
        match cmd {
            SequencerCommand::Wake => self.advance(),
            SequencerCommand::Shutdown => {
                if !self.shutdown_requested {
                    info!(queued = self.queue.len(), "Sequencer shutdown requested");
                }
                self.shutdown_requested = true;
                self.advance();
            }
            SequencerCommand::Loaded { ticket, result } => self.on_loaded(ticket, result),
            SequencerCommand::Chosen { ticket, outcome } => self.on_chosen(ticket, outcome),
        }
    }

    fn state(&self) -> SequencerState {
        *self.state_tx.borrow()
    }

    fn set_state(&mut self, next: SequencerState) {
        let current = self.state();
        if current == next {
            return;
        }
        if !current.allows(&next) {
            warn!(from = %current, to = %next, "Unexpected sequencer transition");
        }
        debug!(from = %current, to = %next, "Sequencer transition");
        self.state_tx.send_replace(next);
    }

    /// Starts the next request, if nothing is in flight.
    ///
    /// Malformed requests are dropped in place and the next one is tried,
    /// so a bad entry never stalls the queue.
    fn advance(&mut self) {
        if let Some(pending) = &self.pending {
            debug!(request = %pending.request.id, "advance() while in flight, ignored");
            return;
        }

        loop {
            let Some(request) = self.queue.dequeue() else {
                if self.config.exit_when_idle || self.shutdown_requested {
                    if self.queue.close_if_empty() {
                        self.set_state(SequencerState::Drained);
                        return;
                    }
                    // A submit raced the emptiness check.
                    continue;
                }
                self.set_state(SequencerState::Idle);
                return;
            };

            let valid = match request.validate() {
                Ok(valid) => valid,
                Err(reason) => {
                    self.drop_malformed(request.id, reason);
                    continue;
                }
            };
            let Some(raw_id) = ProfileId::parse(&valid.profile) else {
                self.drop_malformed(valid.id, MalformedRequest::MissingProfile);
                continue;
            };

            self.begin_resolution(valid, raw_id);
            return;
        }
    }

    fn drop_malformed(&mut self, request_id: RequestId, reason: MalformedRequest) {
        warn!(request = %request_id, code = reason.code(), "Dropping malformed request");
        self.report
            .push(request_id, TerminalOutcome::DroppedMalformed { reason });
    }

    fn begin_resolution(&mut self, request: ValidRequest, raw_id: ProfileId) {
        let ticket = request.id;
        debug!(
            request = %ticket,
            profile = %raw_id,
            kind = %request.kind,
            "Resolving profile"
        );
        self.pending = Some(PendingApplication {
            request,
            profile: None,
        });
        self.set_state(SequencerState::Resolving { request: ticket });

        let store = Arc::clone(&self.store);
        let tx = self.command_tx.clone();
        tokio::spawn(async move {
            let load = tokio::spawn(async move {
                let canonical = store.translate_legacy_id(&raw_id).await;
                if canonical != raw_id {
                    debug!(
                        request = %ticket,
                        legacy = %raw_id,
                        profile = %canonical,
                        "Translated legacy profile name"
                    );
                }
                store.resolve_profile(&canonical).await
            });
            let result = load.await.unwrap_or_else(|e| {
                Err(StoreError::unavailable(format!(
                    "profile load task failed: {e}"
                )))
            });
            let _ = tx.send(SequencerCommand::Loaded { ticket, result });
        });
    }

    fn on_loaded(&mut self, ticket: RequestId, result: Result<ResolvedProfile, StoreError>) {
        if self.state() != (SequencerState::Resolving { request: ticket }) {
            warn!(request = %ticket, state = %self.state(), "Ignoring stale profile load");
            return;
        }

        let profile = match result {
            Ok(profile) => profile,
            Err(e) => {
                warn!(
                    request = %ticket,
                    code = e.code(),
                    error = %e,
                    "Profile resolution failed, dropping request"
                );
                self.finish(TerminalOutcome::DroppedResolution {
                    code: e.code().to_string(),
                    message: e.to_string(),
                });
                return;
            }
        };

        let Some((kind, explicit)) = self
            .pending
            .as_ref()
            .map(|p| (p.request.kind, p.request.explicit_state))
        else {
            return;
        };

        match (kind, explicit.or(profile.default_state)) {
            (ShortcutKind::Simple, Some(state)) => self.dispatch(ticket, profile, state),
            (ShortcutKind::Simple, None) => {
                debug!(request = %ticket, "Simple request without state, using on");
                self.dispatch(ticket, profile, ProfileState::On);
            }
            (ShortcutKind::Advanced, Some(state)) if self.config.skip_chooser_when_decided => {
                self.dispatch(ticket, profile, state);
            }
            (ShortcutKind::Advanced, preselected) => {
                self.open_chooser(ticket, profile, preselected);
            }
        }
    }

    fn open_chooser(
        &mut self,
        ticket: RequestId,
        profile: ResolvedProfile,
        preselected: Option<ProfileState>,
    ) {
        let prompt = ChooserPrompt::new(ticket, profile.id.clone(), profile.name.clone(), preselected);
        if let Some(pending) = self.pending.as_mut() {
            pending.profile = Some(profile);
        }
        self.set_state(SequencerState::AwaitingChoice { request: ticket });

        let chooser = Arc::clone(&self.chooser);
        let tx = self.command_tx.clone();
        tokio::spawn(async move {
            let ask = tokio::spawn(async move { chooser.present(prompt).await });
            let outcome = ask.await.unwrap_or_else(|e| {
                warn!(request = %ticket, error = %e, "Chooser task failed, treating as dismissed");
                ChooserOutcome::Dismissed
            });
            let _ = tx.send(SequencerCommand::Chosen { ticket, outcome });
        });
    }

    fn on_chosen(&mut self, ticket: RequestId, outcome: ChooserOutcome) {
        if self.state() != (SequencerState::AwaitingChoice { request: ticket }) {
            warn!(request = %ticket, state = %self.state(), "Ignoring stale chooser answer");
            return;
        }

        match outcome {
            ChooserOutcome::Selected(state) => {
                match self.pending.as_mut().and_then(|p| p.profile.take()) {
                    Some(profile) => self.dispatch(ticket, profile, state),
                    None => self.finish(TerminalOutcome::Skipped),
                }
            }
            ChooserOutcome::Dismissed => {
                info!(request = %ticket, "Chooser dismissed, skipping request");
                self.finish(TerminalOutcome::Skipped);
            }
        }
    }

    fn dispatch(&mut self, ticket: RequestId, profile: ResolvedProfile, state: ProfileState) {
        self.set_state(SequencerState::Dispatching { request: ticket });

        let order = DispatchOrder {
            request_id: ticket,
            profile_id: profile.id,
            profile_name: profile.name,
            state,
        };
        info!(
            request = %ticket,
            profile = %order.profile_id,
            state = %state,
            "Dispatching profile"
        );

        let dispatcher = Arc::clone(&self.dispatcher);
        let handed = order.clone();
        if std::panic::catch_unwind(AssertUnwindSafe(move || dispatcher.dispatch(handed))).is_err()
        {
            warn!(request = %ticket, "Dispatcher panicked, continuing with next request");
        }

        self.finish(TerminalOutcome::Dispatched { order });
    }

    /// Records the terminal transition and advances exactly once.
    fn finish(&mut self, outcome: TerminalOutcome) {
        let Some(pending) = self.pending.take() else {
            warn!("Terminal transition without a pending application");
            return;
        };
        self.report.push(pending.request.id, outcome);
        self.advance();
    }
}

//! Lifecycle reconciliation: one thread per match, kept in step with the
//! match's latest record.
//!
//! Per key and cycle the state is re-derived from the binding table and the
//! gateway: no binding (or one the gateway can no longer honor) means create,
//! a live binding means update. Terminal status retires the binding after the
//! final update has been sent.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::dedupe::DedupedRecords;
use crate::patterns::PatternTable;
use crate::store::BindingStore;
use crate::template::{format_message, thread_name};
use crate::traits::{EditOutcome, Resolution, ThreadGateway};
use crate::types::{
    ActionFailure, ActionKind, CanonicalKey, CanonicalRecord, ThreadAction, ThreadBinding,
};

/// What the binding table and gateway currently say about one key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindingState {
    Unbound,
    /// A binding exists but the gateway could not resolve it.
    Stale(ThreadBinding),
    Live(ThreadBinding),
}

/// Pure decision for one record given its binding state.
pub fn decide(record: &CanonicalRecord, state: &BindingState) -> ThreadAction {
    let text = format_message(record);
    match state {
        BindingState::Unbound | BindingState::Stale(_) => ThreadAction::CreateThread {
            key: record.key.clone(),
            text,
        },
        BindingState::Live(binding) => ThreadAction::UpdateMessage {
            key: record.key.clone(),
            message_id: binding.starter_message_id.clone(),
            text,
        },
    }
}

/// Actions emitted during one reconcile call, plus the ones that failed.
#[derive(Debug, Default)]
pub struct ReconcileOutcome {
    pub actions: Vec<ThreadAction>,
    pub failures: Vec<ActionFailure>,
}

impl ReconcileOutcome {
    fn fail(&mut self, key: &CanonicalKey, kind: ActionKind, error: impl ToString) {
        self.failures.push(ActionFailure {
            key: key.clone(),
            kind,
            error: error.to_string(),
        });
    }
}

pub struct Reconciler {
    patterns: PatternTable,
    store: Arc<dyn BindingStore>,
    gateway: Arc<dyn ThreadGateway>,
}

impl Reconciler {
    pub fn new(
        patterns: PatternTable,
        store: Arc<dyn BindingStore>,
        gateway: Arc<dyn ThreadGateway>,
    ) -> Self {
        Self {
            patterns,
            store,
            gateway,
        }
    }

    /// Drive the gateway so every record has an up-to-date thread, then
    /// retire bindings whose record is terminal. Keys in the table but absent
    /// from `records` are left alone.
    pub async fn reconcile(&self, records: &DedupedRecords) -> ReconcileOutcome {
        let mut outcome = ReconcileOutcome::default();

        for record in records.iter() {
            let state = match self.binding_state(&record.key).await {
                Ok(state) => state,
                Err(e) => {
                    warn!(key = %record.key, error = %e, "Failed to read binding");
                    outcome.fail(&record.key, ActionKind::Update, e);
                    continue;
                }
            };

            // the stale binding stays until a replacement is stored; a failed
            // create leaves it in place
            if let BindingState::Stale(stale) = &state {
                info!(key = %record.key, thread_id = %stale.thread_id, "Bound thread no longer resolves, recreating");
            }

            let action = decide(record, &state);
            self.apply(record, &action, &mut outcome).await;
            outcome.actions.push(action);
        }

        for record in records.iter() {
            if !self.patterns.is_terminal(&record.status) {
                continue;
            }
            match self.store.remove(&record.key).await {
                Ok(Some(binding)) => {
                    info!(key = %record.key, thread_id = %binding.thread_id, status = %record.status, "Match finished, retiring binding");
                    outcome.actions.push(ThreadAction::RetireBinding {
                        key: record.key.clone(),
                    });
                }
                Ok(None) => {}
                Err(e) => {
                    warn!(key = %record.key, error = %e, "Failed to retire binding");
                    outcome.fail(&record.key, ActionKind::Retire, e);
                }
            }
        }

        outcome
    }

    async fn binding_state(&self, key: &CanonicalKey) -> anyhow::Result<BindingState> {
        let Some(binding) = self.store.get(key).await? else {
            return Ok(BindingState::Unbound);
        };

        match self.gateway.resolve_binding(&binding).await {
            Ok(Resolution::Resolved) => Ok(BindingState::Live(binding)),
            Ok(Resolution::NotFound) => Ok(BindingState::Stale(binding)),
            Err(e) => {
                warn!(key = %key, error = %e, "Binding resolution failed");
                Ok(BindingState::Stale(binding))
            }
        }
    }

    async fn apply(
        &self,
        record: &CanonicalRecord,
        action: &ThreadAction,
        outcome: &mut ReconcileOutcome,
    ) {
        match action {
            ThreadAction::CreateThread { key, text } => {
                let name = thread_name(record);
                match self.gateway.create_thread(text, &name).await {
                    Ok(created) => {
                        info!(key = %key, thread_id = %created.thread_id, "Created match thread");
                        let binding = ThreadBinding {
                            key: key.clone(),
                            thread_id: created.thread_id,
                            starter_message_id: created.starter_message_id,
                        };
                        if let Err(e) = self.store.put(binding).await {
                            warn!(key = %key, error = %e, "Failed to store binding");
                            outcome.fail(key, ActionKind::Create, e);
                        }
                    }
                    Err(e) => {
                        warn!(key = %key, error = %e, "Failed to create match thread");
                        outcome.fail(key, ActionKind::Create, e);
                    }
                }
            }
            ThreadAction::UpdateMessage {
                key,
                message_id,
                text,
            } => match self.gateway.edit_message(message_id, text).await {
                Ok(EditOutcome::Edited) => {
                    debug!(key = %key, message_id = %message_id, "Updated match message");
                }
                Ok(EditOutcome::NotFound) => {
                    warn!(key = %key, message_id = %message_id, "Starter message vanished during update");
                    outcome.fail(key, ActionKind::Update, "starter message not found");
                }
                Err(e) => {
                    warn!(key = %key, error = %e, "Failed to update match message");
                    outcome.fail(key, ActionKind::Update, e);
                }
            },
            ThreadAction::RetireBinding { .. } => {}
        }
    }
}

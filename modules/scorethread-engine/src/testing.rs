// Test mocks for the reconciliation engine.
//
// - MockSource (ObservationSource): scripted per-cycle observations or failures
// - MockGateway (ThreadGateway): stateful in-memory threads and messages,
//   with switches to delete threads and make calls fail
//
// Plus helpers for building observations and a ready-to-run Engine.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Arc, Mutex};

use anyhow::{bail, Result};
use async_trait::async_trait;

use crate::canonicalize::Canonicalizer;
use crate::engine::Engine;
use crate::patterns::PatternTable;
use crate::reconcile::Reconciler;
use crate::store::{BindingStore, MemoryBindingStore};
use crate::traits::{CreatedThread, EditOutcome, ObservationSource, Resolution, ThreadGateway};
use crate::types::{ExternalId, RawObservation, ThreadBinding};

pub fn obs(title: &str, status: &str, score: &str) -> RawObservation {
    RawObservation::new(title, status, score)
}

// ---------------------------------------------------------------------------
// MockSource
// ---------------------------------------------------------------------------

/// Returns one scripted batch per fetch. Once the script runs out every
/// fetch returns an empty batch.
pub struct MockSource {
    script: Mutex<VecDeque<Result<Vec<RawObservation>>>>,
}

impl MockSource {
    pub fn new() -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
        }
    }

    pub fn then(self, batch: Vec<RawObservation>) -> Self {
        self.script.lock().unwrap().push_back(Ok(batch));
        self
    }

    pub fn then_fail(self, message: &str) -> Self {
        self.script
            .lock()
            .unwrap()
            .push_back(Err(anyhow::anyhow!(message.to_string())));
        self
    }
}

impl Default for MockSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ObservationSource for MockSource {
    fn name(&self) -> &str {
        "mock"
    }

    async fn fetch_observations(&self) -> Result<Vec<RawObservation>> {
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(Vec::new()))
    }
}

// ---------------------------------------------------------------------------
// MockGateway
// ---------------------------------------------------------------------------

/// A recorded gateway call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayCall {
    Create { name: String, text: String },
    Resolve { thread_id: String },
    Edit { message_id: String, text: String },
}

#[derive(Default)]
struct GatewayState {
    next_id: u64,
    /// thread id → starter message id
    threads: HashMap<String, String>,
    /// message id → current text
    messages: HashMap<String, String>,
    calls: Vec<GatewayCall>,
    fail_creates: bool,
    fail_edits: bool,
    fail_resolves: bool,
    fail_create_names: HashSet<String>,
}

#[derive(Default)]
pub struct MockGateway {
    state: Mutex<GatewayState>,
}

impl MockGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<GatewayCall> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn thread_count(&self) -> usize {
        self.state.lock().unwrap().threads.len()
    }

    pub fn message_text(&self, message_id: &ExternalId) -> Option<String> {
        self.state
            .lock()
            .unwrap()
            .messages
            .get(message_id.as_str())
            .cloned()
    }

    /// Simulate the thread being deleted on the platform.
    pub fn delete_thread(&self, thread_id: &ExternalId) {
        let mut state = self.state.lock().unwrap();
        if let Some(message_id) = state.threads.remove(thread_id.as_str()) {
            state.messages.remove(&message_id);
        }
    }

    pub fn set_fail_creates(&self, fail: bool) {
        self.state.lock().unwrap().fail_creates = fail;
    }

    pub fn set_fail_edits(&self, fail: bool) {
        self.state.lock().unwrap().fail_edits = fail;
    }

    pub fn set_fail_resolves(&self, fail: bool) {
        self.state.lock().unwrap().fail_resolves = fail;
    }

    /// Fail creation only for threads with this exact name.
    pub fn fail_create_named(&self, name: &str) {
        self.state
            .lock()
            .unwrap()
            .fail_create_names
            .insert(name.to_string());
    }
}

#[async_trait]
impl ThreadGateway for MockGateway {
    async fn create_thread(
        &self,
        initial_text: &str,
        suggested_name: &str,
    ) -> Result<CreatedThread> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(GatewayCall::Create {
            name: suggested_name.to_string(),
            text: initial_text.to_string(),
        });
        if state.fail_creates || state.fail_create_names.contains(suggested_name) {
            bail!("MockGateway: create failed for {suggested_name}");
        }

        state.next_id += 1;
        let message_id = format!("m{}", state.next_id);
        let thread_id = format!("t{}", state.next_id);
        state.threads.insert(thread_id.clone(), message_id.clone());
        state
            .messages
            .insert(message_id.clone(), initial_text.to_string());

        Ok(CreatedThread {
            thread_id: ExternalId::new(thread_id),
            starter_message_id: ExternalId::new(message_id),
        })
    }

    async fn resolve_binding(&self, binding: &ThreadBinding) -> Result<Resolution> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(GatewayCall::Resolve {
            thread_id: binding.thread_id.to_string(),
        });
        if state.fail_resolves {
            bail!("MockGateway: resolve timed out");
        }
        let found = state
            .threads
            .get(binding.thread_id.as_str())
            .is_some_and(|m| m == binding.starter_message_id.as_str());
        Ok(if found {
            Resolution::Resolved
        } else {
            Resolution::NotFound
        })
    }

    async fn edit_message(&self, message_id: &ExternalId, text: &str) -> Result<EditOutcome> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(GatewayCall::Edit {
            message_id: message_id.to_string(),
            text: text.to_string(),
        });
        if state.fail_edits {
            bail!("MockGateway: edit failed");
        }
        match state.messages.get_mut(message_id.as_str()) {
            Some(current) => {
                *current = text.to_string();
                Ok(EditOutcome::Edited)
            }
            None => Ok(EditOutcome::NotFound),
        }
    }
}

// ---------------------------------------------------------------------------
// Harness
// ---------------------------------------------------------------------------

/// An engine wired to mocks, with handles to inspect them.
pub struct TestEngine {
    pub engine: Engine,
    pub gateway: Arc<MockGateway>,
    pub store: Arc<MemoryBindingStore>,
}

impl TestEngine {
    pub fn new(source: MockSource) -> Self {
        let patterns = PatternTable::for_team("india", "IND").unwrap();
        let gateway = Arc::new(MockGateway::new());
        let store = Arc::new(MemoryBindingStore::new());
        let reconciler = Reconciler::new(
            patterns.clone(),
            store.clone() as Arc<dyn BindingStore>,
            gateway.clone() as Arc<dyn ThreadGateway>,
        );
        let engine = Engine::new(Canonicalizer::new(patterns), reconciler)
            .with_source(Arc::new(source));
        Self {
            engine,
            gateway,
            store,
        }
    }

    pub async fn binding(&self, key: &str) -> Option<ThreadBinding> {
        self.store.get(&key.into()).await.unwrap()
    }
}

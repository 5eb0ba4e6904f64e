pub mod canonicalize;
pub mod dedupe;
pub mod engine;
pub mod error;
pub mod patterns;
pub mod reconcile;
pub mod store;
pub mod template;
#[cfg(any(test, feature = "test-support"))]
pub mod testing;
pub mod traits;
pub mod types;

pub use canonicalize::Canonicalizer;
pub use dedupe::{dedupe, DedupedRecords};
pub use engine::Engine;
pub use error::{EngineError, Result};
pub use patterns::{DenyRule, Field, PatternTable};
pub use reconcile::{decide, BindingState, ReconcileOutcome, Reconciler};
pub use store::{BindingStore, MemoryBindingStore};
pub use traits::{CreatedThread, EditOutcome, ObservationSource, Resolution, ThreadGateway};
pub use types::*;

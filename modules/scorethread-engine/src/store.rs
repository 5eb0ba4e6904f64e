use std::collections::HashMap;
use std::sync::Mutex;

use anyhow::Result;
use async_trait::async_trait;
use tracing::warn;

use crate::types::{CanonicalKey, ThreadBinding};

/// Key → binding table owned by the reconciler.
///
/// The in-memory implementation is the one the bot runs with; a durable
/// store only has to implement these three calls.
#[async_trait]
pub trait BindingStore: Send + Sync {
    async fn get(&self, key: &CanonicalKey) -> Result<Option<ThreadBinding>>;

    /// Insert or overwrite the binding for `binding.key`.
    async fn put(&self, binding: ThreadBinding) -> Result<()>;

    async fn remove(&self, key: &CanonicalKey) -> Result<Option<ThreadBinding>>;
}

#[derive(Debug, Default)]
pub struct MemoryBindingStore {
    bindings: Mutex<HashMap<CanonicalKey, ThreadBinding>>,
}

impl MemoryBindingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of bindings. Counts through a poisoned lock rather than
    /// reporting the table as empty.
    pub fn len(&self) -> usize {
        match self.bindings.lock() {
            Ok(bindings) => bindings.len(),
            Err(poisoned) => {
                warn!("binding table lock poisoned, counting anyway");
                poisoned.into_inner().len()
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<CanonicalKey, ThreadBinding>>> {
        self.bindings
            .lock()
            .map_err(|_| anyhow::anyhow!("binding table lock poisoned"))
    }
}

#[async_trait]
impl BindingStore for MemoryBindingStore {
    async fn get(&self, key: &CanonicalKey) -> Result<Option<ThreadBinding>> {
        Ok(self.lock()?.get(key).cloned())
    }

    async fn put(&self, binding: ThreadBinding) -> Result<()> {
        self.lock()?.insert(binding.key.clone(), binding);
        Ok(())
    }

    async fn remove(&self, key: &CanonicalKey) -> Result<Option<ThreadBinding>> {
        Ok(self.lock()?.remove(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ExternalId;

    fn binding(key: &str, thread: &str) -> ThreadBinding {
        ThreadBinding {
            key: CanonicalKey::from(key),
            thread_id: ExternalId::new(thread),
            starter_message_id: ExternalId::new(thread),
        }
    }

    #[tokio::test]
    async fn put_overwrites_existing_key() {
        let store = MemoryBindingStore::new();
        store.put(binding("India vs Australia", "1")).await.unwrap();
        store.put(binding("India vs Australia", "2")).await.unwrap();

        assert_eq!(store.len(), 1);
        let current = store.get(&"India vs Australia".into()).await.unwrap().unwrap();
        assert_eq!(current.thread_id.as_str(), "2");
    }

    #[tokio::test]
    async fn remove_returns_the_binding() {
        let store = MemoryBindingStore::new();
        store.put(binding("India vs Australia", "1")).await.unwrap();

        let removed = store.remove(&"India vs Australia".into()).await.unwrap();
        assert!(removed.is_some());
        assert!(store.is_empty());
        assert!(store.remove(&"India vs Australia".into()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn poisoned_table_keeps_its_count_and_errors_on_access() {
        let store = std::sync::Arc::new(MemoryBindingStore::new());
        store.put(binding("India vs Australia", "1")).await.unwrap();

        let holder = store.clone();
        let _ = std::thread::spawn(move || {
            let _guard = holder.bindings.lock().unwrap();
            panic!("writer died holding the lock");
        })
        .join();

        assert_eq!(store.len(), 1);
        assert!(!store.is_empty());
        assert!(store.get(&"India vs Australia".into()).await.is_err());
    }
}

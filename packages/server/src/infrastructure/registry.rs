//! Generic registry of remote notification handles.
//!
//! One instance per scope (a game room, a chat room, the lobby). Every
//! registration is stamped with a monotonically increasing generation so a
//! prune decided against an old registration can never remove a newer one
//! for the same key.

use std::collections::BTreeMap;

use tokio::sync::Mutex;

pub struct HandleRegistry<K, H> {
    inner: Mutex<RegistryInner<K, H>>,
}

struct RegistryInner<K, H> {
    entries: BTreeMap<K, RegisteredHandle<H>>,
    next_generation: u64,
}

struct RegisteredHandle<H> {
    handle: H,
    generation: u64,
}

impl<K, H> HandleRegistry<K, H>
where
    K: Ord + Clone,
    H: Clone,
{
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(RegistryInner {
                entries: BTreeMap::new(),
                next_generation: 0,
            }),
        }
    }

    /// Registers (or replaces, last-writer-wins) the handle for `key` and
    /// returns the generation stamp of this registration.
    pub async fn register(&self, key: K, handle: H) -> u64 {
        let mut inner = self.inner.lock().await;
        inner.next_generation += 1;
        let generation = inner.next_generation;
        inner
            .entries
            .insert(key, RegisteredHandle { handle, generation });
        generation
    }

    /// Unconditionally removes the entry for `key`. Idempotent.
    pub async fn unregister(&self, key: &K) -> bool {
        self.inner.lock().await.entries.remove(key).is_some()
    }

    /// Removes the entry for `key` only if it still carries `generation`.
    ///
    /// Returns whether an entry was removed. A false return means the key
    /// was re-registered in the meantime (or already gone), so the caller
    /// must not run its removal cascade.
    pub async fn unregister_stale(&self, key: &K, generation: u64) -> bool {
        let mut inner = self.inner.lock().await;
        match inner.entries.get(key) {
            Some(entry) if entry.generation == generation => {
                inner.entries.remove(key);
                true
            }
            _ => false,
        }
    }

    pub async fn lookup(&self, key: &K) -> Option<H> {
        self.inner
            .lock()
            .await
            .entries
            .get(key)
            .map(|entry| entry.handle.clone())
    }

    /// Point-in-time copy of the registry, ordered by key. All fan-out
    /// iterates a snapshot, never the live map.
    pub async fn snapshot(&self) -> Vec<(K, H, u64)> {
        self.inner
            .lock()
            .await
            .entries
            .iter()
            .map(|(key, entry)| (key.clone(), entry.handle.clone(), entry.generation))
            .collect()
    }

    pub async fn len(&self) -> usize {
        self.inner.lock().await.entries.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.lock().await.entries.is_empty()
    }
}

impl<K, H> Default for HandleRegistry<K, H>
where
    K: Ord + Clone,
    H: Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

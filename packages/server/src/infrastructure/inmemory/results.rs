//! In-memory classification store.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::error::StoreError;
use crate::domain::game::ScoreEntry;
use crate::domain::ports::ClassificationStore;
use crate::domain::values::RoomId;

/// Keeps final classifications per room for the lifetime of the process.
pub struct InMemoryClassificationStore {
    results: Mutex<HashMap<RoomId, Vec<ScoreEntry>>>,
}

impl InMemoryClassificationStore {
    pub fn new() -> Self {
        Self {
            results: Mutex::new(HashMap::new()),
        }
    }

    pub async fn results_for(&self, room_id: &RoomId) -> Option<Vec<ScoreEntry>> {
        self.results.lock().await.get(room_id).cloned()
    }
}

impl Default for InMemoryClassificationStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ClassificationStore for InMemoryClassificationStore {
    async fn persist_results(
        &self,
        room_id: &RoomId,
        results: &[ScoreEntry],
    ) -> Result<(), StoreError> {
        tracing::info!(room_id = %room_id, entries = results.len(), "persisting final classification");
        self.results
            .lock()
            .await
            .insert(room_id.clone(), results.to_vec());
        Ok(())
    }
}

//! In-memory room directory.
//!
//! Standalone deployments seed configurations at startup (or rely on the
//! defaults); the lifecycle and disconnect callbacks are recorded so that
//! operators and tests can inspect what the engine reported.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::game::RoomConfig;
use crate::domain::ports::RoomDirectory;
use crate::domain::values::{PlayerName, RoomId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomLifecycle {
    Created,
    Started,
    Finished,
}

struct DirectoryEntry {
    config: RoomConfig,
    lifecycle: RoomLifecycle,
}

#[derive(Default)]
struct DirectoryInner {
    rooms: HashMap<RoomId, DirectoryEntry>,
    disconnects: Vec<(RoomId, PlayerName)>,
    unreachable: Vec<(RoomId, PlayerName)>,
}

pub struct InMemoryRoomDirectory {
    inner: Mutex<DirectoryInner>,
}

impl InMemoryRoomDirectory {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(DirectoryInner::default()),
        }
    }

    /// Seeds a room configuration so it is found on the first subscribe.
    pub async fn register_room(&self, room_id: RoomId, config: RoomConfig) {
        self.inner.lock().await.rooms.insert(
            room_id,
            DirectoryEntry {
                config,
                lifecycle: RoomLifecycle::Created,
            },
        );
    }

    pub async fn lifecycle(&self, room_id: &RoomId) -> Option<RoomLifecycle> {
        self.inner
            .lock()
            .await
            .rooms
            .get(room_id)
            .map(|entry| entry.lifecycle)
    }

    pub async fn recorded_disconnects(&self) -> Vec<(RoomId, PlayerName)> {
        self.inner.lock().await.disconnects.clone()
    }

    pub async fn recorded_unreachable(&self) -> Vec<(RoomId, PlayerName)> {
        self.inner.lock().await.unreachable.clone()
    }
}

impl Default for InMemoryRoomDirectory {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RoomDirectory for InMemoryRoomDirectory {
    async fn room_configuration(&self, room_id: &RoomId) -> Option<RoomConfig> {
        self.inner
            .lock()
            .await
            .rooms
            .get(room_id)
            .map(|entry| entry.config.clone())
    }

    async fn mark_started(&self, room_id: &RoomId) {
        let mut inner = self.inner.lock().await;
        if let Some(entry) = inner.rooms.get_mut(room_id) {
            entry.lifecycle = RoomLifecycle::Started;
        }
        tracing::info!(room_id = %room_id, "room marked started");
    }

    async fn mark_finished(&self, room_id: &RoomId) {
        let mut inner = self.inner.lock().await;
        if let Some(entry) = inner.rooms.get_mut(room_id) {
            entry.lifecycle = RoomLifecycle::Finished;
        }
        tracing::info!(room_id = %room_id, "room marked finished");
    }

    async fn notify_player_disconnected(&self, room_id: &RoomId, name: &PlayerName) {
        tracing::info!(room_id = %room_id, player = %name, "player disconnected");
        self.inner
            .lock()
            .await
            .disconnects
            .push((room_id.clone(), name.clone()));
    }

    async fn notify_unreachable_client(&self, room_id: &RoomId, name: &PlayerName) {
        tracing::warn!(room_id = %room_id, player = %name, "client unreachable, removed from room");
        self.inner
            .lock()
            .await
            .unreachable
            .push((room_id.clone(), name.clone()));
    }
}

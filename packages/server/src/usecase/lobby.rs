//! Lobby roster publishing.
//!
//! Subscriptions are keyed by a generated id rather than account identity,
//! so two browser tabs of the same account are two independent subscribers.

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::game::RoomSummary;
use crate::domain::ports::LobbyNotifier;
use crate::domain::values::{PlayerName, RoomId};
use crate::infrastructure::dispatcher::{self, PrunedHandle};
use crate::infrastructure::registry::HandleRegistry;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriptionId(Uuid);

impl SubscriptionId {
    fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

pub struct LobbyPublisher {
    subscribers: HandleRegistry<SubscriptionId, Arc<dyn LobbyNotifier>>,
}

impl LobbyPublisher {
    pub fn new() -> Self {
        Self {
            subscribers: HandleRegistry::new(),
        }
    }

    pub async fn subscribe(&self, handle: Arc<dyn LobbyNotifier>) -> SubscriptionId {
        let id = SubscriptionId::generate();
        self.subscribers.register(id, handle).await;
        tracing::debug!(subscription = %id, "lobby subscriber added");
        id
    }

    pub async fn unsubscribe(&self, id: &SubscriptionId) -> bool {
        self.subscribers.unregister(id).await
    }

    pub async fn subscriber_count(&self) -> usize {
        self.subscribers.len().await
    }

    /// Pushes the full room list to every subscriber.
    pub async fn publish_room_list(&self, rooms: &[RoomSummary]) {
        self.fan_out(|handle| {
            let rooms = rooms.to_vec();
            async move { handle.room_list(&rooms).await }
        })
        .await;
    }

    /// One-shot push of the room list to a single subscriber. Returns false
    /// when the subscription is unknown or delivery failed.
    pub async fn refresh(&self, id: &SubscriptionId, rooms: &[RoomSummary]) -> bool {
        let Some(handle) = self.subscribers.lookup(id).await else {
            return false;
        };
        let delivered = dispatcher::dispatch_to_one(handle, |handle| {
            let rooms = rooms.to_vec();
            async move { handle.room_list(&rooms).await }
        })
        .await;
        if !delivered {
            self.subscribers.unregister(id).await;
        }
        delivered
    }

    pub async fn room_updated(&self, room: &RoomSummary) {
        self.fan_out(|handle| {
            let room = room.clone();
            async move { handle.room_updated(&room).await }
        })
        .await;
    }

    pub async fn room_cancelled(&self, room_id: &RoomId) {
        self.fan_out(|handle| {
            let room_id = room_id.clone();
            async move { handle.room_cancelled(&room_id).await }
        })
        .await;
    }

    pub async fn participant_expelled(&self, room_id: &RoomId, name: &PlayerName) {
        self.fan_out(|handle| {
            let room_id = room_id.clone();
            let name = name.clone();
            async move { handle.participant_expelled(&room_id, &name).await }
        })
        .await;
    }

    pub async fn participant_banned(&self, room_id: &RoomId, name: &PlayerName) {
        self.fan_out(|handle| {
            let room_id = room_id.clone();
            let name = name.clone();
            async move { handle.participant_banned(&room_id, &name).await }
        })
        .await;
    }

    async fn fan_out<F, Fut>(&self, mut action: F)
    where
        F: FnMut(Arc<dyn LobbyNotifier>) -> Fut,
        Fut: std::future::Future<Output = Result<(), crate::domain::error::NotifyError>>,
    {
        let snapshot = self.subscribers.snapshot().await;
        let pruned = dispatcher::dispatch_to_all(snapshot, |_id, handle| action(handle)).await;
        self.prune(pruned).await;
    }

    async fn prune(&self, pruned: Vec<PrunedHandle<SubscriptionId>>) {
        for entry in pruned {
            if self
                .subscribers
                .unregister_stale(&entry.key, entry.generation)
                .await
            {
                tracing::debug!(subscription = %entry.key, "pruned unreachable lobby subscriber");
            }
        }
    }
}

impl Default for LobbyPublisher {
    fn default() -> Self {
        Self::new()
    }
}

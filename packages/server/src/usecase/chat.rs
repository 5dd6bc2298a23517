//! Room-scoped chat fan-out without history.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::domain::ports::ChatNotifier;
use crate::domain::values::{MessageContent, PlayerName, RoomId};
use crate::infrastructure::dispatcher::{self, PrunedHandle};
use crate::infrastructure::registry::HandleRegistry;
use crate::usecase::error::ChatRelayError;

type ChatRegistry = HandleRegistry<PlayerName, Arc<dyn ChatNotifier>>;

/// Relays chat traffic per room. Keeps no message history; a member only
/// sees what is sent while they are registered.
pub struct ChatRelay {
    rooms: Mutex<HashMap<RoomId, Arc<ChatRegistry>>>,
}

impl ChatRelay {
    pub fn new() -> Self {
        Self {
            rooms: Mutex::new(HashMap::new()),
        }
    }

    async fn room(&self, room_id: &RoomId) -> Option<Arc<ChatRegistry>> {
        self.rooms.lock().await.get(room_id).cloned()
    }

    async fn room_or_create(&self, room_id: &RoomId) -> Arc<ChatRegistry> {
        self.rooms
            .lock()
            .await
            .entry(room_id.clone())
            .or_insert_with(|| Arc::new(HandleRegistry::new()))
            .clone()
    }

    /// Registers the participant, announces the join to the *other* members,
    /// then pushes the authoritative member list to everyone including the
    /// joiner. A re-join with the same name replaces the previous handle.
    pub async fn join(
        &self,
        room_id: &RoomId,
        participant: PlayerName,
        handle: Arc<dyn ChatNotifier>,
    ) {
        let registry = self.room_or_create(room_id).await;
        registry.register(participant.clone(), handle).await;
        tracing::info!(room_id = %room_id, participant = %participant, "participant joined chat");

        let snapshot = registry.snapshot().await;
        let members: Vec<PlayerName> = snapshot.iter().map(|(name, _, _)| name.clone()).collect();

        let others: Vec<_> = snapshot
            .iter()
            .filter(|(name, _, _)| name != &participant)
            .cloned()
            .collect();
        let mut pruned = dispatcher::dispatch_to_all(others, |_name, handle| {
            let joined = participant.clone();
            async move { handle.participant_joined(&joined).await }
        })
        .await;

        pruned.extend(
            dispatcher::dispatch_to_all(snapshot, |_name, handle| {
                let members = members.clone();
                async move { handle.member_list(&members).await }
            })
            .await,
        );

        self.prune(room_id, &registry, pruned).await;
    }

    /// Unregisters the participant and notifies the remaining members. The
    /// peer set is snapshotted before removal, so a concurrent join or
    /// leave cannot change who is told.
    pub async fn leave(&self, room_id: &RoomId, participant: &PlayerName) {
        let Some(registry) = self.room(room_id).await else {
            return;
        };
        let snapshot = registry.snapshot().await;
        registry.unregister(participant).await;
        tracing::info!(room_id = %room_id, participant = %participant, "participant left chat");

        let peers: Vec<_> = snapshot
            .into_iter()
            .filter(|(name, _, _)| name != participant)
            .collect();
        let pruned = dispatcher::dispatch_to_all(peers, |_name, handle| {
            let left = participant.clone();
            async move { handle.participant_left(&left).await }
        })
        .await;

        self.prune(room_id, &registry, pruned).await;
        self.drop_room_if_empty(room_id, &registry).await;
    }

    /// Relays a message to every registered member, sender included.
    pub async fn broadcast_message(
        &self,
        room_id: &RoomId,
        from: &PlayerName,
        text: &str,
    ) -> Result<(), ChatRelayError> {
        let content = MessageContent::new(text)?;
        let registry = self
            .room(room_id)
            .await
            .ok_or_else(|| ChatRelayError::RoomNotFound(room_id.to_string()))?;

        let snapshot = registry.snapshot().await;
        let pruned = dispatcher::dispatch_to_all(snapshot, |_name, handle| {
            let from = from.clone();
            let content = content.clone();
            async move { handle.chat_message(&from, content.as_str()).await }
        })
        .await;

        self.prune(room_id, &registry, pruned).await;
        Ok(())
    }

    pub async fn member_count(&self, room_id: &RoomId) -> usize {
        match self.room(room_id).await {
            Some(registry) => registry.len().await,
            None => 0,
        }
    }

    async fn prune(
        &self,
        room_id: &RoomId,
        registry: &Arc<ChatRegistry>,
        pruned: Vec<PrunedHandle<PlayerName>>,
    ) {
        for entry in pruned {
            if registry.unregister_stale(&entry.key, entry.generation).await {
                tracing::warn!(room_id = %room_id, participant = %entry.key, "pruned unreachable chat member");
            }
        }
    }

    async fn drop_room_if_empty(&self, room_id: &RoomId, registry: &Arc<ChatRegistry>) {
        let mut rooms = self.rooms.lock().await;
        if registry.is_empty().await {
            rooms.remove(room_id);
        }
    }
}

impl Default for ChatRelay {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex as StdMutex;

    use crate::domain::error::NotifyError;

    /// Records every notification in arrival order; optionally fails all
    /// deliveries to simulate a dead connection.
    struct RecordingChatNotifier {
        label: String,
        received: StdMutex<Vec<String>>,
        reachable: bool,
    }

    impl RecordingChatNotifier {
        fn reachable(label: &str) -> Arc<Self> {
            Arc::new(Self {
                label: label.to_string(),
                received: StdMutex::new(Vec::new()),
                reachable: true,
            })
        }

        fn unreachable(label: &str) -> Arc<Self> {
            Arc::new(Self {
                label: label.to_string(),
                received: StdMutex::new(Vec::new()),
                reachable: false,
            })
        }

        fn record(&self, entry: String) -> Result<(), NotifyError> {
            if !self.reachable {
                return Err(NotifyError::Unreachable(format!(
                    "{} is unreachable",
                    self.label
                )));
            }
            self.received.lock().unwrap().push(entry);
            Ok(())
        }

        fn received(&self) -> Vec<String> {
            self.received.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ChatNotifier for RecordingChatNotifier {
        async fn participant_joined(&self, name: &PlayerName) -> Result<(), NotifyError> {
            self.record(format!("joined:{name}"))
        }

        async fn participant_left(&self, name: &PlayerName) -> Result<(), NotifyError> {
            self.record(format!("left:{name}"))
        }

        async fn member_list(&self, members: &[PlayerName]) -> Result<(), NotifyError> {
            let names: Vec<&str> = members.iter().map(|m| m.as_str()).collect();
            self.record(format!("members:{}", names.join(",")))
        }

        async fn chat_message(&self, from: &PlayerName, text: &str) -> Result<(), NotifyError> {
            self.record(format!("msg:{from}:{text}"))
        }
    }

    fn room() -> RoomId {
        RoomId::new("room-1").unwrap()
    }

    fn name(s: &str) -> PlayerName {
        PlayerName::new(s).unwrap()
    }

    #[tokio::test]
    async fn test_join_notifies_others_then_sends_the_member_list() {
        // given: alice alone in the room
        let relay = ChatRelay::new();
        let alice = RecordingChatNotifier::reachable("alice");
        relay.join(&room(), name("alice"), alice.clone()).await;

        // when:
        let bob = RecordingChatNotifier::reachable("bob");
        relay.join(&room(), name("bob"), bob.clone()).await;

        // then: alice sees the join before the updated list, bob only the list
        assert_eq!(
            alice.received(),
            vec![
                "members:alice".to_string(),
                "joined:bob".to_string(),
                "members:alice,bob".to_string(),
            ]
        );
        assert_eq!(bob.received(), vec!["members:alice,bob".to_string()]);
    }

    #[tokio::test]
    async fn test_leave_notifies_the_remaining_members_only() {
        // given:
        let relay = ChatRelay::new();
        let alice = RecordingChatNotifier::reachable("alice");
        let bob = RecordingChatNotifier::reachable("bob");
        relay.join(&room(), name("alice"), alice.clone()).await;
        relay.join(&room(), name("bob"), bob.clone()).await;

        // when:
        relay.leave(&room(), &name("bob")).await;

        // then:
        assert!(alice.received().contains(&"left:bob".to_string()));
        assert!(!bob.received().iter().any(|e| e.starts_with("left:")));
        assert_eq!(relay.member_count(&room()).await, 1);
    }

    #[tokio::test]
    async fn test_broadcast_reaches_everyone_including_the_sender() {
        // given:
        let relay = ChatRelay::new();
        let alice = RecordingChatNotifier::reachable("alice");
        let bob = RecordingChatNotifier::reachable("bob");
        relay.join(&room(), name("alice"), alice.clone()).await;
        relay.join(&room(), name("bob"), bob.clone()).await;

        // when:
        relay
            .broadcast_message(&room(), &name("alice"), "ciao")
            .await
            .unwrap();

        // then:
        assert!(alice.received().contains(&"msg:alice:ciao".to_string()));
        assert!(bob.received().contains(&"msg:alice:ciao".to_string()));
    }

    #[tokio::test]
    async fn test_blank_message_is_rejected() {
        // given:
        let relay = ChatRelay::new();
        relay
            .join(&room(), name("alice"), RecordingChatNotifier::reachable("alice"))
            .await;

        // when:
        let result = relay.broadcast_message(&room(), &name("alice"), "   ").await;

        // then:
        assert!(matches!(result, Err(ChatRelayError::Domain(_))));
    }

    #[tokio::test]
    async fn test_unreachable_member_is_pruned_on_broadcast() {
        // given: bob's connection is dead
        let relay = ChatRelay::new();
        let alice = RecordingChatNotifier::reachable("alice");
        let bob = RecordingChatNotifier::unreachable("bob");
        relay.join(&room(), name("alice"), alice.clone()).await;
        relay.join(&room(), name("bob"), bob).await;

        // when:
        relay
            .broadcast_message(&room(), &name("alice"), "anyone here?")
            .await
            .unwrap();

        // then: bob is gone, alice still got the message
        assert_eq!(relay.member_count(&room()).await, 1);
        assert!(alice.received().contains(&"msg:alice:anyone here?".to_string()));
    }

    #[tokio::test]
    async fn test_broadcast_to_an_unknown_room_fails() {
        // given:
        let relay = ChatRelay::new();

        // when:
        let result = relay.broadcast_message(&room(), &name("alice"), "hello").await;

        // then:
        assert!(matches!(result, Err(ChatRelayError::RoomNotFound(_))));
    }
}

//! Orchestration of game rooms: state machines, notification fan-out,
//! round timers, and the disconnect/prune cascade.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;

use crate::domain::error::DomainError;
use crate::domain::game::{
    GameEvent, Phase, RoomSummary, RoundStartedNotice, SongHint, Stroke,
};
use crate::domain::ports::{
    ClassificationStore, GameNotifier, GuessValidator, RoomDirectory, SongCatalog,
};
use crate::domain::round::RoundStateMachine;
use crate::domain::values::{PlayerKey, PlayerName, RoomId};
use crate::infrastructure::dispatcher::{self, PrunedHandle};
use crate::infrastructure::registry::HandleRegistry;
use crate::usecase::error::GameError;

struct RoomHandle {
    state: Mutex<RoundStateMachine>,
    callbacks: HandleRegistry<PlayerKey, Arc<dyn GameNotifier>>,
    created_at_millis: i64,
}

impl RoomHandle {
    async fn summary(&self) -> RoomSummary {
        let state = self.state.lock().await;
        RoomSummary {
            room_id: state.room_id().clone(),
            player_count: state.players().len(),
            phase: state.phase(),
            created_at_millis: self.created_at_millis,
        }
    }
}

/// Owns every live room. The map itself sits behind a structural lock that
/// is only held for lookup/insert/remove; gameplay serializes on the
/// per-room state lock, and all fan-out happens after that lock is
/// released, over registry snapshots.
pub struct GameSessionCoordinator {
    directory: Arc<dyn RoomDirectory>,
    catalog: Arc<dyn SongCatalog>,
    validator: Arc<dyn GuessValidator>,
    results: Arc<dyn ClassificationStore>,
    rooms: Mutex<HashMap<RoomId, Arc<RoomHandle>>>,
}

impl GameSessionCoordinator {
    pub fn new(
        directory: Arc<dyn RoomDirectory>,
        catalog: Arc<dyn SongCatalog>,
        validator: Arc<dyn GuessValidator>,
        results: Arc<dyn ClassificationStore>,
    ) -> Self {
        Self {
            directory,
            catalog,
            validator,
            results,
            rooms: Mutex::new(HashMap::new()),
        }
    }

    async fn room(&self, room_id: &RoomId) -> Option<Arc<RoomHandle>> {
        self.rooms.lock().await.get(room_id).cloned()
    }

    async fn existing_room(&self, room_id: &RoomId) -> Result<Arc<RoomHandle>, GameError> {
        self.room(room_id)
            .await
            .ok_or_else(|| GameError::RoomNotFound(room_id.to_string()))
    }

    async fn room_or_create(&self, room_id: &RoomId) -> Arc<RoomHandle> {
        if let Some(room) = self.room(room_id).await {
            return room;
        }
        // The directory is queried outside the structural lock; on a lost
        // race the freshly built machine is simply dropped.
        let config = self
            .directory
            .room_configuration(room_id)
            .await
            .unwrap_or_default();
        let mut rooms = self.rooms.lock().await;
        rooms
            .entry(room_id.clone())
            .or_insert_with(|| {
                Arc::new(RoomHandle {
                    state: Mutex::new(RoundStateMachine::new(
                        room_id.clone(),
                        config,
                        self.catalog.clone(),
                        self.validator.clone(),
                    )),
                    callbacks: HandleRegistry::new(),
                    created_at_millis: tratto_shared::time::get_utc_timestamp(),
                })
            })
            .clone()
    }

    /// Adds a player to a room, creating the room on first contact, and
    /// registers their notification handle.
    pub async fn subscribe(
        self: &Arc<Self>,
        room_id: &RoomId,
        key: PlayerKey,
        name: PlayerName,
        host: bool,
        handle: Arc<dyn GameNotifier>,
    ) -> Result<(), GameError> {
        let room = self.room_or_create(room_id).await;
        {
            room.state.lock().await.add_player(key.clone(), name, host)?;
        }
        room.callbacks.register(key.clone(), handle).await;
        tracing::info!(room_id = %room_id, player = %key, "player subscribed");
        Ok(())
    }

    pub async fn start(self: &Arc<Self>, room_id: &RoomId, key: &PlayerKey) -> Result<(), GameError> {
        let room = self.existing_room(room_id).await?;
        let events = { room.state.lock().await.start(key)? };
        self.directory.mark_started(room_id).await;
        tracing::info!(room_id = %room_id, "game started");
        self.publish(room_id, &room, events).await;
        Ok(())
    }

    pub async fn submit_guess(
        self: &Arc<Self>,
        room_id: &RoomId,
        key: &PlayerKey,
        text: &str,
    ) -> Result<(), GameError> {
        let room = self.existing_room(room_id).await?;
        let events = { room.state.lock().await.submit_guess(key, text)? };
        self.publish(room_id, &room, events).await;
        Ok(())
    }

    pub async fn submit_stroke(
        self: &Arc<Self>,
        room_id: &RoomId,
        key: &PlayerKey,
        stroke: Stroke,
    ) -> Result<(), GameError> {
        let room = self.existing_room(room_id).await?;
        let events = { room.state.lock().await.submit_stroke(key, stroke)? };
        self.publish(room_id, &room, events).await;
        Ok(())
    }

    pub async fn submit_chat(
        self: &Arc<Self>,
        room_id: &RoomId,
        key: &PlayerKey,
        text: &str,
    ) -> Result<(), GameError> {
        let room = self.existing_room(room_id).await?;
        let events = { room.state.lock().await.submit_chat(key, text)? };
        self.publish(room_id, &room, events).await;
        Ok(())
    }

    /// Voluntary leave or transport-level connection close. Idempotent, and
    /// a no-op for unknown rooms so it can race the prune cascade safely.
    pub async fn leave(self: &Arc<Self>, room_id: &RoomId, key: &PlayerKey) {
        let Some(room) = self.room(room_id).await else {
            return;
        };
        let events = {
            let mut state = room.state.lock().await;
            match state.remove_player(key) {
                Ok(events) => events,
                Err(error) => {
                    tracing::error!(room_id = %room_id, player = %key, error = %error, "failed to remove player");
                    return;
                }
            }
        };
        room.callbacks.unregister(key).await;
        self.publish(room_id, &room, events).await;
    }

    /// Host-initiated removal of another player by display name.
    pub async fn expel(
        self: &Arc<Self>,
        room_id: &RoomId,
        requester: &PlayerKey,
        target: &PlayerName,
    ) -> Result<(), GameError> {
        let room = self.existing_room(room_id).await?;
        let (target_key, events) = {
            let mut state = room.state.lock().await;
            if !state.is_host(requester) {
                return Err(GameError::Domain(DomainError::InvalidInput(
                    "only the host can expel players".to_string(),
                )));
            }
            let target_key = state
                .players()
                .iter()
                .find(|p| &p.name == target)
                .map(|p| p.key.clone())
                .ok_or_else(|| {
                    GameError::Domain(DomainError::UnknownPlayer(target.to_string()))
                })?;
            let events = state.remove_player(&target_key)?;
            (target_key, events)
        };
        room.callbacks.unregister(&target_key).await;
        tracing::info!(room_id = %room_id, player = %target, "player expelled by host");
        self.publish(room_id, &room, events).await;
        Ok(())
    }

    pub async fn room_summaries(&self) -> Vec<RoomSummary> {
        let rooms: Vec<Arc<RoomHandle>> = self.rooms.lock().await.values().cloned().collect();
        let mut summaries = Vec::with_capacity(rooms.len());
        for room in rooms {
            summaries.push(room.summary().await);
        }
        summaries.sort_by(|a, b| a.room_id.cmp(&b.room_id));
        summaries
    }

    pub async fn room_summary(&self, room_id: &RoomId) -> Option<RoomSummary> {
        let room = self.room(room_id).await?;
        Some(room.summary().await)
    }

    /// Delivers the events one by one; every prune cascades into a roster
    /// removal whose follow-up events are appended to the queue, so a
    /// drawer whose connection died mid-broadcast still ends the round.
    async fn publish(
        self: &Arc<Self>,
        room_id: &RoomId,
        room: &Arc<RoomHandle>,
        events: Vec<GameEvent>,
    ) {
        let mut queue: VecDeque<GameEvent> = events.into();
        while let Some(event) = queue.pop_front() {
            let pruned = self.deliver(room_id, room, &event).await;
            for entry in pruned {
                queue.extend(self.prune_player(room_id, room, entry).await);
            }
        }
        self.evict_if_abandoned(room_id, room).await;
    }

    /// Removes a pruned handle and its roster entry. The stale-generation
    /// check guarantees the cascade (and the directory callback) runs at
    /// most once per failed registration, even when several broadcasts
    /// observe the same dead handle.
    async fn prune_player(
        self: &Arc<Self>,
        room_id: &RoomId,
        room: &Arc<RoomHandle>,
        entry: PrunedHandle<PlayerKey>,
    ) -> Vec<GameEvent> {
        if !room
            .callbacks
            .unregister_stale(&entry.key, entry.generation)
            .await
        {
            return Vec::new();
        }
        let (name, follow_up) = {
            let mut state = room.state.lock().await;
            let name = state.player_name(&entry.key);
            let follow_up = state.remove_player(&entry.key).unwrap_or_default();
            (name, follow_up)
        };
        if let Some(name) = name {
            self.directory.notify_unreachable_client(room_id, &name).await;
        }
        follow_up
    }

    async fn deliver(
        self: &Arc<Self>,
        room_id: &RoomId,
        room: &Arc<RoomHandle>,
        event: &GameEvent,
    ) -> Vec<PrunedHandle<PlayerKey>> {
        let snapshot = room.callbacks.snapshot().await;
        match event {
            GameEvent::RoundStarted {
                round_index,
                total_rounds,
                round_seconds,
                drawer,
                drawer_name,
                song,
                generation,
            } => {
                self.schedule_round_timeout(room_id.clone(), *generation, *round_seconds);
                dispatcher::dispatch_to_all(snapshot, |key, handle| {
                    let notice = RoundStartedNotice {
                        round_index: *round_index,
                        total_rounds: *total_rounds,
                        round_seconds: *round_seconds,
                        drawer_name: drawer_name.clone(),
                        you_draw: &key == drawer,
                        hint: (&key == drawer).then(|| SongHint::from(song)),
                    };
                    async move { handle.round_started(&notice).await }
                })
                .await
            }
            GameEvent::PlayerGuessed { name, points } => {
                let points = *points;
                dispatcher::dispatch_to_all(snapshot, |_key, handle| {
                    let name = name.clone();
                    async move { handle.player_guessed(&name, points).await }
                })
                .await
            }
            GameEvent::ChatMessage { name, text } => {
                dispatcher::dispatch_to_all(snapshot, |_key, handle| {
                    let name = name.clone();
                    let text = text.clone();
                    async move { handle.chat_message(&name, &text).await }
                })
                .await
            }
            GameEvent::StrokeReceived { from, stroke } => {
                // The drawer already has the stroke on their own canvas.
                let others: Vec<_> = snapshot
                    .into_iter()
                    .filter(|(key, _, _)| key != from)
                    .collect();
                dispatcher::dispatch_to_all(others, |_key, handle| {
                    let stroke = stroke.clone();
                    async move { handle.stroke_received(&stroke).await }
                })
                .await
            }
            GameEvent::RoundEnded {
                timed_out,
                transition_seconds,
                generation,
            } => {
                self.schedule_advance(room_id.clone(), *generation, *transition_seconds);
                let timed_out = *timed_out;
                dispatcher::dispatch_to_all(snapshot, |_key, handle| async move {
                    handle.round_ended(timed_out).await
                })
                .await
            }
            GameEvent::ClearCanvas => {
                dispatcher::dispatch_to_all(snapshot, |_key, handle| async move {
                    handle.clear_canvas().await
                })
                .await
            }
            GameEvent::GameEnded { classification } => {
                if let Err(error) = self.results.persist_results(room_id, classification).await {
                    tracing::error!(room_id = %room_id, error = %error, "failed to persist classification");
                }
                self.directory.mark_finished(room_id).await;
                dispatcher::dispatch_to_all(snapshot, |_key, handle| {
                    let classification = classification.clone();
                    async move { handle.game_ended(&classification).await }
                })
                .await
            }
            GameEvent::PlayerDisconnected { name } => {
                // Membership changed; the directory propagates it to the
                // room/lobby layer regardless of why the player left.
                self.directory.notify_player_disconnected(room_id, name).await;
                dispatcher::dispatch_to_all(snapshot, |_key, handle| {
                    let name = name.clone();
                    async move { handle.player_disconnected(&name).await }
                })
                .await
            }
        }
    }

    fn schedule_round_timeout(self: &Arc<Self>, room_id: RoomId, generation: u64, seconds: u64) {
        let coordinator = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(seconds)).await;
            coordinator.round_timed_out(&room_id, generation).await;
        });
    }

    fn schedule_advance(self: &Arc<Self>, room_id: RoomId, generation: u64, seconds: u64) {
        let coordinator = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(seconds)).await;
            coordinator.advance_room(&room_id, generation).await;
        });
    }

    async fn round_timed_out(self: &Arc<Self>, room_id: &RoomId, generation: u64) {
        let Some(room) = self.room(room_id).await else {
            return;
        };
        let events = {
            let mut state = room.state.lock().await;
            match state.end_round(true, generation) {
                Ok(events) => events,
                Err(error) => {
                    tracing::error!(room_id = %room_id, error = %error, "round timeout failed");
                    return;
                }
            }
        };
        if !events.is_empty() {
            tracing::info!(room_id = %room_id, "round timed out");
        }
        self.publish(room_id, &room, events).await;
    }

    async fn advance_room(self: &Arc<Self>, room_id: &RoomId, generation: u64) {
        let Some(room) = self.room(room_id).await else {
            return;
        };
        let events = {
            let mut state = room.state.lock().await;
            match state.advance(generation) {
                Ok(events) => events,
                Err(error) => {
                    tracing::error!(room_id = %room_id, error = %error, "failed to advance to the next round");
                    return;
                }
            }
        };
        self.publish(room_id, &room, events).await;
    }

    async fn evict_if_abandoned(&self, room_id: &RoomId, room: &Arc<RoomHandle>) {
        let (finished, roster_empty) = {
            let state = room.state.lock().await;
            (state.phase() == Phase::Finished, state.is_empty())
        };
        if roster_empty || (finished && room.callbacks.is_empty().await) {
            self.rooms.lock().await.remove(room_id);
            tracing::info!(room_id = %room_id, "room evicted");
        }
    }
}

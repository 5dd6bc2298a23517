//! The per-room round state machine.
//!
//! Purely synchronous: every operation mutates the roster/phase under the
//! caller's lock and returns the list of [`GameEvent`]s to deliver. Timers
//! live outside; the coordinator schedules them and calls back in with the
//! round generation it captured, which makes late timer callbacks harmless.

use std::sync::Arc;

use crate::domain::error::DomainError;
use crate::domain::game::{GameEvent, Phase, PlayerState, RoomConfig, ScoreEntry, Song};
use crate::domain::ports::{GuessValidator, SongCatalog};
use crate::domain::values::{MessageContent, PlayerKey, PlayerName, RoomId};

const FIRST_GUESS_POINTS: u32 = 100;
const POINTS_STEP: u32 = 10;
const MIN_GUESS_POINTS: u32 = 10;
const MIN_PLAYERS_TO_START: usize = 2;

pub struct RoundStateMachine {
    room_id: RoomId,
    config: RoomConfig,
    catalog: Arc<dyn SongCatalog>,
    validator: Arc<dyn GuessValidator>,
    players: Vec<PlayerState>,
    phase: Phase,
    round_index: u32,
    /// Bumped on every phase transition; timer callbacks carry the value
    /// they observed and are ignored when it no longer matches.
    generation: u64,
    current_song: Option<Song>,
    correct_guesses: u32,
    /// Index of the next drawer in join order.
    drawer_cursor: usize,
}

impl RoundStateMachine {
    pub fn new(
        room_id: RoomId,
        config: RoomConfig,
        catalog: Arc<dyn SongCatalog>,
        validator: Arc<dyn GuessValidator>,
    ) -> Self {
        Self {
            room_id,
            config,
            catalog,
            validator,
            players: Vec::new(),
            phase: Phase::Lobby,
            round_index: 0,
            generation: 0,
            current_song: None,
            correct_guesses: 0,
            drawer_cursor: 0,
        }
    }

    pub fn room_id(&self) -> &RoomId {
        &self.room_id
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn round_index(&self) -> u32 {
        self.round_index
    }

    pub fn config(&self) -> &RoomConfig {
        &self.config
    }

    pub fn players(&self) -> &[PlayerState] {
        &self.players
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn player_name(&self, key: &PlayerKey) -> Option<PlayerName> {
        self.players
            .iter()
            .find(|p| &p.key == key)
            .map(|p| p.name.clone())
    }

    pub fn drawer_key(&self) -> Option<PlayerKey> {
        self.players.iter().find(|p| p.drawer).map(|p| p.key.clone())
    }

    pub fn is_host(&self, key: &PlayerKey) -> bool {
        self.players.iter().any(|p| &p.key == key && p.host)
    }

    /// Adds a player to the roster. The first player becomes host regardless
    /// of the flag. Rejected once the game has finished.
    pub fn add_player(
        &mut self,
        key: PlayerKey,
        name: PlayerName,
        host: bool,
    ) -> Result<Vec<GameEvent>, DomainError> {
        if self.phase == Phase::Finished {
            return Err(DomainError::RoomFinished(self.room_id.to_string()));
        }
        if self.players.iter().any(|p| p.key == key) {
            return Err(DomainError::InvalidInput(format!(
                "player key '{}' is already registered in the room",
                key
            )));
        }
        let host = host || self.players.is_empty();
        self.players.push(PlayerState {
            key,
            name,
            host,
            drawer: false,
            score: 0,
            guessed_current_round: false,
        });
        Ok(Vec::new())
    }

    /// Starts the first round. Host-only, lobby-only, and the roster must
    /// hold at least two players so there is someone to guess.
    pub fn start(&mut self, requesting_key: &PlayerKey) -> Result<Vec<GameEvent>, DomainError> {
        if self.phase != Phase::Lobby {
            return Err(DomainError::WrongPhase);
        }
        if !self.players.iter().any(|p| &p.key == requesting_key) {
            return Err(DomainError::UnknownPlayer(requesting_key.to_string()));
        }
        if !self.is_host(requesting_key) {
            return Err(DomainError::InvalidInput(
                "only the host can start the game".to_string(),
            ));
        }
        if self.players.len() < MIN_PLAYERS_TO_START {
            return Err(DomainError::InvalidInput(format!(
                "at least {} players are required to start",
                MIN_PLAYERS_TO_START
            )));
        }
        self.begin_round()
    }

    /// Records a guess. Wrong guesses and repeats from players who already
    /// scored are swallowed without an event.
    pub fn submit_guess(
        &mut self,
        key: &PlayerKey,
        text: &str,
    ) -> Result<Vec<GameEvent>, DomainError> {
        if text.trim().is_empty() {
            return Err(DomainError::InvalidInput(
                "guess must not be blank".to_string(),
            ));
        }
        if self.phase != Phase::RoundActive {
            return Err(DomainError::WrongPhase);
        }
        let index = self
            .players
            .iter()
            .position(|p| &p.key == key)
            .ok_or_else(|| DomainError::UnknownPlayer(key.to_string()))?;
        if self.players[index].drawer {
            return Err(DomainError::InvalidInput(
                "the drawer cannot guess".to_string(),
            ));
        }
        if self.players[index].guessed_current_round {
            return Ok(Vec::new());
        }
        let title = match &self.current_song {
            Some(song) => song.title.clone(),
            None => {
                return Err(DomainError::Internal(
                    "no song selected for the active round".to_string(),
                ));
            }
        };
        if !self.validator.is_correct_guess(text, &title) {
            return Ok(Vec::new());
        }
        Ok(self.record_correct_guess(index))
    }

    /// Relays a drawing increment. Strokes from anyone but the drawer are
    /// dropped silently; a racing stroke after round end is not a fault.
    pub fn submit_stroke(
        &mut self,
        key: &PlayerKey,
        stroke: crate::domain::game::Stroke,
    ) -> Result<Vec<GameEvent>, DomainError> {
        if self.phase != Phase::RoundActive {
            return Ok(Vec::new());
        }
        let player = self
            .players
            .iter()
            .find(|p| &p.key == key)
            .ok_or_else(|| DomainError::UnknownPlayer(key.to_string()))?;
        if !player.drawer {
            return Ok(Vec::new());
        }
        Ok(vec![GameEvent::StrokeReceived {
            from: key.clone(),
            stroke,
        }])
    }

    /// Relays a chat message. A non-drawer message matching the song title
    /// during an active round is never relayed, so the title cannot reach
    /// the other guessers through chat; it scores as a guess when the
    /// sender has not guessed yet, and is swallowed like a repeat guess
    /// otherwise.
    pub fn submit_chat(
        &mut self,
        key: &PlayerKey,
        text: &str,
    ) -> Result<Vec<GameEvent>, DomainError> {
        let content = MessageContent::new(text)?;
        let index = self
            .players
            .iter()
            .position(|p| &p.key == key)
            .ok_or_else(|| DomainError::UnknownPlayer(key.to_string()))?;
        let golden_message = self.phase == Phase::RoundActive
            && !self.players[index].drawer
            && match &self.current_song {
                Some(song) => self.validator.is_correct_guess(content.as_str(), &song.title),
                None => false,
            };
        if golden_message {
            if self.players[index].guessed_current_round {
                return Ok(Vec::new());
            }
            return Ok(self.record_correct_guess(index));
        }
        Ok(vec![GameEvent::ChatMessage {
            name: self.players[index].name.clone(),
            text: content.to_string(),
        }])
    }

    /// Ends the active round. A no-op unless the round identified by
    /// `generation` is still the active one, which makes the timer callback
    /// and the everyone-guessed path race-free.
    pub fn end_round(
        &mut self,
        timed_out: bool,
        generation: u64,
    ) -> Result<Vec<GameEvent>, DomainError> {
        if self.phase != Phase::RoundActive || generation != self.generation {
            return Ok(Vec::new());
        }
        Ok(self.close_round(timed_out))
    }

    /// Leaves the transition pause: either starts the next round or finishes
    /// the game. Stale generations are ignored.
    pub fn advance(&mut self, generation: u64) -> Result<Vec<GameEvent>, DomainError> {
        if self.phase != Phase::RoundTransition || generation != self.generation {
            return Ok(Vec::new());
        }
        if self.round_index >= self.config.total_rounds
            || self.players.len() < MIN_PLAYERS_TO_START
        {
            return Ok(self.finish());
        }
        self.begin_round()
    }

    /// Removes a player in any phase. Unknown keys are a no-op so that a
    /// prune cascade racing an explicit leave stays harmless. A drawer
    /// removal during an active round force-ends it like a timeout.
    pub fn remove_player(&mut self, key: &PlayerKey) -> Result<Vec<GameEvent>, DomainError> {
        let Some(index) = self.players.iter().position(|p| &p.key == key) else {
            return Ok(Vec::new());
        };
        let removed = self.players.remove(index);
        if index < self.drawer_cursor {
            self.drawer_cursor -= 1;
        }
        if removed.host {
            if let Some(next_host) = self.players.first_mut() {
                next_host.host = true;
            }
        }
        let mut events = vec![GameEvent::PlayerDisconnected {
            name: removed.name.clone(),
        }];
        if self.phase == Phase::RoundActive {
            if removed.drawer || self.players.len() < MIN_PLAYERS_TO_START {
                events.extend(self.close_round(true));
            } else if self.all_guessers_done() {
                events.extend(self.close_round(false));
            }
        }
        Ok(events)
    }

    fn begin_round(&mut self) -> Result<Vec<GameEvent>, DomainError> {
        // Pick the song before touching any state so a catalog failure
        // leaves the machine unchanged.
        let song = self
            .catalog
            .pick_song(self.config.difficulty, self.config.language)
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        let drawer_index = self.drawer_cursor % self.players.len();
        self.drawer_cursor = drawer_index + 1;
        for (i, player) in self.players.iter_mut().enumerate() {
            player.drawer = i == drawer_index;
            player.guessed_current_round = false;
        }
        self.correct_guesses = 0;
        self.round_index += 1;
        self.phase = Phase::RoundActive;
        self.generation += 1;
        self.current_song = Some(song.clone());

        let drawer = &self.players[drawer_index];
        Ok(vec![GameEvent::RoundStarted {
            round_index: self.round_index,
            total_rounds: self.config.total_rounds,
            round_seconds: self.config.round_seconds,
            drawer: drawer.key.clone(),
            drawer_name: drawer.name.clone(),
            song,
            generation: self.generation,
        }])
    }

    fn record_correct_guess(&mut self, index: usize) -> Vec<GameEvent> {
        let points = score_for_guess(self.correct_guesses);
        self.correct_guesses += 1;
        let player = &mut self.players[index];
        player.guessed_current_round = true;
        player.score += points;
        let name = player.name.clone();
        let mut events = vec![GameEvent::PlayerGuessed { name, points }];
        if self.all_guessers_done() {
            events.extend(self.close_round(false));
        }
        events
    }

    fn all_guessers_done(&self) -> bool {
        self.players
            .iter()
            .filter(|p| !p.drawer)
            .all(|p| p.guessed_current_round)
    }

    fn close_round(&mut self, timed_out: bool) -> Vec<GameEvent> {
        self.phase = Phase::RoundTransition;
        self.generation += 1;
        self.current_song = None;
        for player in &mut self.players {
            player.drawer = false;
        }
        vec![
            GameEvent::RoundEnded {
                timed_out,
                transition_seconds: self.config.transition_seconds,
                generation: self.generation,
            },
            GameEvent::ClearCanvas,
        ]
    }

    fn finish(&mut self) -> Vec<GameEvent> {
        self.phase = Phase::Finished;
        self.generation += 1;
        let mut ranked: Vec<&PlayerState> = self.players.iter().collect();
        // Stable sort keeps join order for equal scores.
        ranked.sort_by(|a, b| b.score.cmp(&a.score));
        let top_score = ranked.first().map(|p| p.score).unwrap_or(0);
        let classification: Vec<ScoreEntry> = ranked
            .into_iter()
            .map(|p| ScoreEntry {
                key: p.key.clone(),
                name: p.name.clone(),
                score: p.score,
                winner: p.score == top_score && top_score > 0,
            })
            .collect();
        vec![GameEvent::GameEnded { classification }]
    }
}

fn score_for_guess(correct_guesses_so_far: u32) -> u32 {
    FIRST_GUESS_POINTS
        .saturating_sub(POINTS_STEP * correct_guesses_so_far)
        .max(MIN_GUESS_POINTS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::CatalogError;
    use crate::domain::game::{Difficulty, SongLanguage, Stroke};

    struct FixedCatalog;

    impl SongCatalog for FixedCatalog {
        fn pick_song(
            &self,
            _difficulty: Difficulty,
            _language: SongLanguage,
        ) -> Result<Song, CatalogError> {
            Ok(Song {
                id: 1,
                title: "Volare".to_string(),
                artist: "Domenico Modugno".to_string(),
                genre: "pop".to_string(),
            })
        }

        fn song_by_id(&self, _id: u32) -> Option<Song> {
            None
        }
    }

    struct ExactValidator;

    impl GuessValidator for ExactValidator {
        fn is_correct_guess(&self, submitted: &str, title: &str) -> bool {
            submitted.trim().eq_ignore_ascii_case(title)
        }
    }

    fn key(s: &str) -> PlayerKey {
        PlayerKey::new(s).unwrap()
    }

    fn machine_with_players(names: &[&str]) -> RoundStateMachine {
        let mut machine = RoundStateMachine::new(
            RoomId::new("room-1").unwrap(),
            RoomConfig::default(),
            Arc::new(FixedCatalog),
            Arc::new(ExactValidator),
        );
        for name in names {
            machine
                .add_player(key(name), PlayerName::new(*name).unwrap(), false)
                .unwrap();
        }
        machine
    }

    fn started_machine(names: &[&str]) -> RoundStateMachine {
        let mut machine = machine_with_players(names);
        machine.start(&key(names[0])).unwrap();
        machine
    }

    fn drawer_count(machine: &RoundStateMachine) -> usize {
        machine.players().iter().filter(|p| p.drawer).count()
    }

    #[test]
    fn test_first_player_becomes_host() {
        // given:
        let machine = machine_with_players(&["alice", "bob"]);

        // then:
        assert!(machine.players()[0].host);
        assert!(!machine.players()[1].host);
    }

    #[test]
    fn test_start_requires_host() {
        // given:
        let mut machine = machine_with_players(&["alice", "bob"]);

        // when:
        let result = machine.start(&key("bob"));

        // then:
        assert!(matches!(result, Err(DomainError::InvalidInput(_))));
        assert_eq!(machine.phase(), Phase::Lobby);
    }

    #[test]
    fn test_start_assigns_exactly_one_drawer_in_join_order() {
        // given:
        let machine = started_machine(&["alice", "bob", "carol"]);

        // then:
        assert_eq!(machine.phase(), Phase::RoundActive);
        assert_eq!(drawer_count(&machine), 1);
        assert_eq!(machine.drawer_key(), Some(key("alice")));
    }

    #[test]
    fn test_start_twice_is_rejected() {
        // given:
        let mut machine = started_machine(&["alice", "bob"]);

        // when:
        let result = machine.start(&key("alice"));

        // then:
        assert!(matches!(result, Err(DomainError::WrongPhase)));
    }

    #[test]
    fn test_correct_guesses_score_in_decreasing_order() {
        // given:
        let mut machine = started_machine(&["alice", "bob", "carol", "dave"]);

        // when:
        let first = machine.submit_guess(&key("bob"), "Volare").unwrap();
        let second = machine.submit_guess(&key("carol"), "volare").unwrap();

        // then:
        assert!(matches!(
            first[0],
            GameEvent::PlayerGuessed { points: 100, .. }
        ));
        assert!(matches!(
            second[0],
            GameEvent::PlayerGuessed { points: 90, .. }
        ));
    }

    #[test]
    fn test_points_never_drop_below_the_floor() {
        // then:
        assert_eq!(score_for_guess(0), 100);
        assert_eq!(score_for_guess(9), 10);
        assert_eq!(score_for_guess(25), 10);
    }

    #[test]
    fn test_drawer_cannot_guess() {
        // given:
        let mut machine = started_machine(&["alice", "bob"]);

        // when:
        let result = machine.submit_guess(&key("alice"), "Volare");

        // then:
        assert!(matches!(result, Err(DomainError::InvalidInput(_))));
    }

    #[test]
    fn test_repeated_correct_guess_scores_once() {
        // given:
        let mut machine = started_machine(&["alice", "bob", "carol"]);
        machine.submit_guess(&key("bob"), "Volare").unwrap();

        // when:
        let repeat = machine.submit_guess(&key("bob"), "Volare").unwrap();

        // then:
        assert!(repeat.is_empty());
        assert_eq!(machine.players()[1].score, 100);
    }

    #[test]
    fn test_round_ends_when_every_guesser_has_guessed() {
        // given:
        let mut machine = started_machine(&["alice", "bob", "carol"]);
        machine.submit_guess(&key("bob"), "Volare").unwrap();

        // when:
        let events = machine.submit_guess(&key("carol"), "Volare").unwrap();

        // then: guess event followed by round end and canvas wipe
        assert!(matches!(events[0], GameEvent::PlayerGuessed { .. }));
        assert!(matches!(
            events[1],
            GameEvent::RoundEnded {
                timed_out: false,
                ..
            }
        ));
        assert!(matches!(events[2], GameEvent::ClearCanvas));
        assert_eq!(machine.phase(), Phase::RoundTransition);
        assert_eq!(drawer_count(&machine), 0);
    }

    #[test]
    fn test_stale_timeout_after_round_end_is_a_no_op() {
        // given: capture the active round's generation, then end by guesses
        let mut machine = started_machine(&["alice", "bob"]);
        let round_generation = machine.generation();
        machine.submit_guess(&key("bob"), "Volare").unwrap();
        let phase_after = machine.phase();
        let generation_after = machine.generation();

        // when: the round timer fires late with the old generation
        let events = machine.end_round(true, round_generation).unwrap();

        // then: nothing happens
        assert!(events.is_empty());
        assert_eq!(machine.phase(), phase_after);
        assert_eq!(machine.generation(), generation_after);
    }

    #[test]
    fn test_advance_rotates_the_drawer_round_robin() {
        // given:
        let mut machine = started_machine(&["alice", "bob", "carol"]);
        let end = machine.end_round(true, machine.generation()).unwrap();
        let transition_generation = match end[0] {
            GameEvent::RoundEnded { generation, .. } => generation,
            _ => panic!("expected RoundEnded"),
        };

        // when:
        let events = machine.advance(transition_generation).unwrap();

        // then:
        assert!(matches!(events[0], GameEvent::RoundStarted { .. }));
        assert_eq!(machine.drawer_key(), Some(key("bob")));
        assert_eq!(drawer_count(&machine), 1);
        assert_eq!(machine.round_index(), 2);
    }

    #[test]
    fn test_advance_with_stale_generation_is_a_no_op() {
        // given:
        let mut machine = started_machine(&["alice", "bob"]);
        machine.end_round(true, machine.generation()).unwrap();

        // when:
        let events = machine.advance(machine.generation() + 1).unwrap();

        // then:
        assert!(events.is_empty());
        assert_eq!(machine.phase(), Phase::RoundTransition);
    }

    #[test]
    fn test_game_finishes_after_the_last_round() {
        // given: a two-round game played to the end
        let config = RoomConfig {
            total_rounds: 2,
            ..RoomConfig::default()
        };
        let mut machine = RoundStateMachine::new(
            RoomId::new("room-1").unwrap(),
            config,
            Arc::new(FixedCatalog),
            Arc::new(ExactValidator),
        );
        machine
            .add_player(key("alice"), PlayerName::new("alice").unwrap(), false)
            .unwrap();
        machine
            .add_player(key("bob"), PlayerName::new("bob").unwrap(), false)
            .unwrap();
        machine.start(&key("alice")).unwrap();

        for _ in 0..2 {
            machine.end_round(true, machine.generation()).unwrap();
            let events = machine.advance(machine.generation()).unwrap();
            if let Some(GameEvent::GameEnded { classification }) = events.first() {
                // then:
                assert_eq!(machine.phase(), Phase::Finished);
                assert_eq!(classification.len(), 2);
                return;
            }
        }
        panic!("game never finished");
    }

    #[test]
    fn test_classification_ranks_by_score_with_join_order_ties() {
        // given: bob scores, alice and carol stay level at zero
        let config = RoomConfig {
            total_rounds: 1,
            ..RoomConfig::default()
        };
        let mut machine = RoundStateMachine::new(
            RoomId::new("room-1").unwrap(),
            config,
            Arc::new(FixedCatalog),
            Arc::new(ExactValidator),
        );
        for name in ["alice", "bob", "carol"] {
            machine
                .add_player(key(name), PlayerName::new(name).unwrap(), false)
                .unwrap();
        }
        machine.start(&key("alice")).unwrap();
        machine.submit_guess(&key("bob"), "Volare").unwrap();
        machine.end_round(true, machine.generation()).unwrap();

        // when:
        let events = machine.advance(machine.generation()).unwrap();

        // then:
        let GameEvent::GameEnded { classification } = &events[0] else {
            panic!("expected GameEnded");
        };
        assert_eq!(classification[0].name.as_str(), "bob");
        assert!(classification[0].winner);
        assert_eq!(classification[1].name.as_str(), "alice");
        assert_eq!(classification[2].name.as_str(), "carol");
        assert!(!classification[1].winner);
    }

    #[test]
    fn test_drawer_disconnect_ends_the_round_like_a_timeout() {
        // given:
        let mut machine = started_machine(&["alice", "bob", "carol"]);

        // when:
        let events = machine.remove_player(&key("alice")).unwrap();

        // then:
        assert!(matches!(events[0], GameEvent::PlayerDisconnected { .. }));
        assert!(matches!(
            events[1],
            GameEvent::RoundEnded { timed_out: true, .. }
        ));
        assert!(matches!(events[2], GameEvent::ClearCanvas));
        assert_eq!(machine.phase(), Phase::RoundTransition);
        assert_eq!(drawer_count(&machine), 0);
    }

    #[test]
    fn test_guesser_disconnect_keeps_the_round_running() {
        // given:
        let mut machine = started_machine(&["alice", "bob", "carol"]);

        // when:
        let events = machine.remove_player(&key("carol")).unwrap();

        // then:
        assert_eq!(events.len(), 1);
        assert_eq!(machine.phase(), Phase::RoundActive);
        assert_eq!(machine.drawer_key(), Some(key("alice")));
    }

    #[test]
    fn test_last_unguessed_player_disconnecting_ends_the_round() {
        // given: bob has guessed, carol has not
        let mut machine = started_machine(&["alice", "bob", "carol"]);
        machine.submit_guess(&key("bob"), "Volare").unwrap();

        // when:
        let events = machine.remove_player(&key("carol")).unwrap();

        // then:
        assert!(matches!(events[0], GameEvent::PlayerDisconnected { .. }));
        assert!(matches!(
            events[1],
            GameEvent::RoundEnded {
                timed_out: false,
                ..
            }
        ));
    }

    #[test]
    fn test_removing_an_unknown_player_is_a_no_op() {
        // given:
        let mut machine = started_machine(&["alice", "bob"]);

        // when:
        let events = machine.remove_player(&key("mallory")).unwrap();

        // then:
        assert!(events.is_empty());
        assert_eq!(machine.players().len(), 2);
    }

    #[test]
    fn test_host_transfers_when_the_host_leaves() {
        // given:
        let mut machine = machine_with_players(&["alice", "bob"]);

        // when:
        machine.remove_player(&key("alice")).unwrap();

        // then:
        assert!(machine.players()[0].host);
        assert_eq!(machine.players()[0].name.as_str(), "bob");
    }

    #[test]
    fn test_chat_matching_the_title_becomes_a_guess() {
        // given:
        let mut machine = started_machine(&["alice", "bob", "carol"]);

        // when:
        let events = machine.submit_chat(&key("bob"), "volare").unwrap();

        // then: scored as a guess, the title is not relayed as chat
        assert!(matches!(
            events[0],
            GameEvent::PlayerGuessed { points: 100, .. }
        ));
        assert!(!events
            .iter()
            .any(|e| matches!(e, GameEvent::ChatMessage { .. })));
    }

    #[test]
    fn test_ordinary_chat_is_relayed() {
        // given:
        let mut machine = started_machine(&["alice", "bob"]);

        // when:
        let events = machine.submit_chat(&key("bob"), "no idea, a bird?").unwrap();

        // then:
        assert!(
            matches!(&events[0], GameEvent::ChatMessage { name, text }
                if name.as_str() == "bob" && text == "no idea, a bird?")
        );
    }

    #[test]
    fn test_drawer_chat_with_the_title_is_relayed_not_scored() {
        // given:
        let mut machine = started_machine(&["alice", "bob"]);

        // when: the drawer types the title in chat
        let events = machine.submit_chat(&key("alice"), "Volare").unwrap();

        // then:
        assert!(matches!(events[0], GameEvent::ChatMessage { .. }));
    }

    #[test]
    fn test_title_in_chat_after_guessing_is_swallowed() {
        // given: bob has already guessed correctly
        let mut machine = started_machine(&["alice", "bob", "carol"]);
        machine.submit_guess(&key("bob"), "Volare").unwrap();

        // when: bob types the title in chat while carol is still guessing
        let events = machine.submit_chat(&key("bob"), "Volare").unwrap();

        // then: nothing is relayed and no extra points are awarded
        assert!(events.is_empty());
        assert_eq!(machine.players()[1].score, 100);
    }

    #[test]
    fn test_oversized_chat_is_rejected() {
        // given:
        let mut machine = started_machine(&["alice", "bob"]);

        // when:
        let result = machine.submit_chat(&key("bob"), &"x".repeat(501));

        // then:
        assert!(matches!(result, Err(DomainError::InvalidInput(_))));
    }

    #[test]
    fn test_stroke_from_a_guesser_is_dropped() {
        // given:
        let mut machine = started_machine(&["alice", "bob"]);
        let stroke = Stroke {
            points_x: vec![0.1],
            points_y: vec![0.2],
            color_hex: "#000000".to_string(),
            thickness: 2.0,
            erase: false,
            clear_all: false,
        };

        // when:
        let events = machine.submit_stroke(&key("bob"), stroke).unwrap();

        // then:
        assert!(events.is_empty());
    }

    #[test]
    fn test_stroke_from_the_drawer_is_relayed() {
        // given:
        let mut machine = started_machine(&["alice", "bob"]);
        let stroke = Stroke {
            points_x: vec![0.1, 0.3],
            points_y: vec![0.2, 0.4],
            color_hex: "#ff0000".to_string(),
            thickness: 2.0,
            erase: false,
            clear_all: false,
        };

        // when:
        let events = machine.submit_stroke(&key("alice"), stroke.clone()).unwrap();

        // then:
        assert!(matches!(
            &events[0],
            GameEvent::StrokeReceived { from, stroke: s } if from == &key("alice") && s == &stroke
        ));
    }

    #[test]
    fn test_join_after_finish_is_rejected() {
        // given: play a one-round game to the end
        let config = RoomConfig {
            total_rounds: 1,
            ..RoomConfig::default()
        };
        let mut machine = RoundStateMachine::new(
            RoomId::new("room-1").unwrap(),
            config,
            Arc::new(FixedCatalog),
            Arc::new(ExactValidator),
        );
        machine
            .add_player(key("alice"), PlayerName::new("alice").unwrap(), false)
            .unwrap();
        machine
            .add_player(key("bob"), PlayerName::new("bob").unwrap(), false)
            .unwrap();
        machine.start(&key("alice")).unwrap();
        machine.end_round(true, machine.generation()).unwrap();
        machine.advance(machine.generation()).unwrap();
        assert_eq!(machine.phase(), Phase::Finished);

        // when:
        let result = machine.add_player(key("late"), PlayerName::new("late").unwrap(), false);

        // then:
        assert!(matches!(result, Err(DomainError::RoomFinished(_))));
    }
}

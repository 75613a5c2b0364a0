//! The room table: rooms and their game states, mutated as one unit.
//!
//! # Concurrency note
//!
//! `RoomTable` is NOT thread-safe by itself. It uses plain `HashMap`s and
//! takes `&mut self` for every mutation. [`RoomRegistry`](crate::RoomRegistry)
//! wraps it in a reader-writer lock and holds that lock for the whole of
//! each composite operation, so check-then-insert (`create`) and
//! check-then-fill (`join`) are atomic.
//!
//! Every method takes `now` explicitly. The table never reads the clock
//! itself, which keeps it deterministic under test.

use std::collections::HashMap;

use parlor_protocol::{
    RoomId, RoomStatus, RoomTicket, RoomView, SessionToken, Slot, WaitStatus,
};
use tokio::time::Instant;

use crate::{GameEngine, GameStateStore, MoveRejected, Room, RoomConfig, RoomError};

/// All live rooms of one game type, paired with their game states.
pub struct RoomTable<G: GameEngine> {
    /// Room records, keyed by room id.
    rooms: HashMap<RoomId, Room>,

    /// Game states, keyed by the same ids. Kept in lockstep with `rooms`.
    states: GameStateStore<G::State>,

    config: RoomConfig,

    /// When the last sweep ran. `None` until the first one.
    last_sweep: Option<Instant>,

    /// Whether live rooms fill at least 90% of a bounded id space. Tracked
    /// so the warning fires once per crossing.
    near_full: bool,
}

impl<G: GameEngine> RoomTable<G> {
    /// Creates an empty table.
    pub fn new(config: RoomConfig) -> Self {
        Self {
            rooms: HashMap::new(),
            states: GameStateStore::new(),
            config,
            last_sweep: None,
            near_full: false,
        }
    }

    pub fn config(&self) -> &RoomConfig {
        &self.config
    }

    // -- Capability set -----------------------------------------------------

    /// Returns `true` iff the table holds an unexpired room with this id.
    pub fn exists(&self, room_id: &RoomId, now: Instant) -> bool {
        self.live_room(room_id, now).is_some()
    }

    /// Draws a room id that no live room is using.
    ///
    /// # Errors
    /// Returns [`RoomError::IdSpaceExhausted`] after
    /// `config.max_id_attempts` draws that all collided.
    pub fn generate_id(&self, now: Instant) -> Result<RoomId, RoomError> {
        let attempts = self.config.max_id_attempts.max(1);

        for attempt in 1..=attempts {
            let candidate = RoomId::new(self.config.id_space.draw());
            if !self.exists(&candidate, now) {
                tracing::debug!(
                    game = %G::KIND,
                    room_id = %candidate,
                    attempt,
                    "room id drawn"
                );
                return Ok(candidate);
            }
        }

        tracing::warn!(game = %G::KIND, attempts, "room id space exhausted");
        Err(RoomError::IdSpaceExhausted { attempts })
    }

    /// Removes every room whose expiry has passed, together with its game
    /// state. Returns the ids that were removed.
    pub fn sweep(&mut self, now: Instant) -> Vec<RoomId> {
        let expired: Vec<RoomId> = self
            .rooms
            .values()
            .filter(|room| room.is_expired(now))
            .map(|room| room.room_id().clone())
            .collect();

        for room_id in &expired {
            self.remove(room_id);
            tracing::info!(game = %G::KIND, %room_id, "expired room swept");
        }

        self.last_sweep = Some(now);
        self.update_id_pressure(now);
        expired
    }

    /// Returns `true` if the last sweep is older than `sweep_throttle`.
    pub fn sweep_due(&self, now: Instant) -> bool {
        match self.last_sweep {
            None => true,
            Some(last) => {
                now.duration_since(last) >= self.config.sweep_throttle
            }
        }
    }

    /// Sweeps only if [`sweep_due`](Self::sweep_due).
    pub fn sweep_if_due(&mut self, now: Instant) -> Vec<RoomId> {
        if self.sweep_due(now) {
            self.sweep(now)
        } else {
            Vec::new()
        }
    }

    /// Which slot `token` holds in the room, if any.
    ///
    /// Unknown and expired rooms resolve to `None`, same as a token that
    /// holds neither slot.
    pub fn resolve_slot(
        &self,
        room_id: &RoomId,
        token: &SessionToken,
        now: Instant,
    ) -> Option<Slot> {
        self.live_room(room_id, now)?.resolve_slot(token)
    }

    // -- Room protocol ------------------------------------------------------

    /// Creates a waiting room with `host` in `player1` and a fresh game
    /// state next to it.
    ///
    /// # Errors
    /// [`RoomError::IdSpaceExhausted`] if no free id could be drawn.
    pub fn create(
        &mut self,
        host: SessionToken,
        now: Instant,
    ) -> Result<RoomTicket, RoomError> {
        let room_id = self.generate_id(now)?;

        // An expired-but-unswept room may still sit under this id.
        self.remove(&room_id);

        tracing::info!(game = %G::KIND, %room_id, %host, "room created");

        let room = Room::new(room_id.clone(), host, now, self.config.ttl);
        self.rooms.insert(room_id.clone(), room);
        self.states.put(room_id.clone(), G::initial_state());
        self.update_id_pressure(now);

        Ok(RoomTicket {
            room_id,
            slot: Slot::Player1,
            status: RoomStatus::Waiting,
        })
    }

    /// Seats `token` in a room.
    ///
    /// A token that already holds a slot gets it back unchanged (a
    /// reloaded page). Otherwise `player2` is filled.
    ///
    /// # Errors
    /// - [`RoomError::NotFound`]: unknown or expired room
    /// - [`RoomError::RoomFull`]: both slots taken by other tokens
    pub fn join(
        &mut self,
        room_id: &RoomId,
        token: SessionToken,
        now: Instant,
    ) -> Result<RoomTicket, RoomError> {
        let room = self
            .rooms
            .get_mut(room_id)
            .filter(|room| !room.is_expired(now))
            .ok_or_else(|| RoomError::NotFound(room_id.clone()))?;

        if let Some(slot) = room.resolve_slot(&token) {
            tracing::debug!(game = %G::KIND, %room_id, %slot, "slot resumed");
            return Ok(RoomTicket {
                room_id: room_id.clone(),
                slot,
                status: room.status(),
            });
        }

        if !room.fill_player2(token) {
            return Err(RoomError::RoomFull(room_id.clone()));
        }

        tracing::info!(game = %G::KIND, %room_id, "second player joined");

        Ok(RoomTicket {
            room_id: room_id.clone(),
            slot: Slot::Player2,
            status: RoomStatus::Active,
        })
    }

    /// Polls a room's registry-level status on behalf of `token`.
    ///
    /// # Errors
    /// [`RoomError::NotFound`] for unknown or expired rooms.
    pub fn wait(
        &self,
        room_id: &RoomId,
        token: &SessionToken,
        now: Instant,
    ) -> Result<WaitStatus, RoomError> {
        let room = self
            .live_room(room_id, now)
            .ok_or_else(|| RoomError::NotFound(room_id.clone()))?;

        Ok(WaitStatus {
            room_id: room_id.clone(),
            slot: room.resolve_slot(token),
            status: room.status(),
        })
    }

    /// Reads the game state as `token` is allowed to see it.
    ///
    /// Callers holding no slot still get a view; the engine decides what
    /// a spectator sees.
    ///
    /// # Errors
    /// [`RoomError::NotFound`] for unknown or expired rooms.
    pub fn view(
        &self,
        room_id: &RoomId,
        token: &SessionToken,
        now: Instant,
    ) -> Result<RoomView<G::View>, RoomError> {
        let room = self
            .live_room(room_id, now)
            .ok_or_else(|| RoomError::NotFound(room_id.clone()))?;
        let state = self
            .states
            .get(room_id)
            .ok_or_else(|| RoomError::NotFound(room_id.clone()))?;

        Ok(render::<G>(room, state, room.resolve_slot(token)))
    }

    /// Applies a move from `token` and returns the caller's new view.
    ///
    /// When the move ends the game, the room's expiry is pulled in to
    /// `now + finished_grace`.
    ///
    /// # Errors
    /// - [`RoomError::NotFound`]: unknown or expired room
    /// - [`RoomError::NotSeated`]: `token` holds neither slot
    /// - [`RoomError::NotStarted`]: still waiting for player 2
    /// - [`RoomError::Rejected`]: the engine refused the move, or the
    ///   game is already over
    pub fn play(
        &mut self,
        room_id: &RoomId,
        token: &SessionToken,
        mv: G::Move,
        now: Instant,
    ) -> Result<RoomView<G::View>, RoomError> {
        let room = self
            .rooms
            .get_mut(room_id)
            .filter(|room| !room.is_expired(now))
            .ok_or_else(|| RoomError::NotFound(room_id.clone()))?;

        let slot = room
            .resolve_slot(token)
            .ok_or_else(|| RoomError::NotSeated(room_id.clone()))?;

        if room.status() == RoomStatus::Waiting {
            return Err(RoomError::NotStarted(room_id.clone()));
        }
        if room.is_finished() {
            return Err(MoveRejected::new("game is over").into());
        }

        let state = self
            .states
            .get(room_id)
            .ok_or_else(|| RoomError::NotFound(room_id.clone()))?;

        let next = G::apply_move(state, slot, mv).inspect_err(|rejected| {
            tracing::debug!(
                game = %G::KIND,
                %room_id,
                %slot,
                reason = %rejected.reason,
                "move rejected"
            );
        })?;

        if G::is_terminal(&next) {
            room.finish(now, self.config.finished_grace);
            tracing::info!(game = %G::KIND, %room_id, "game finished");
        }

        let view = render::<G>(room, &next, Some(slot));
        self.states.put(room_id.clone(), next);
        Ok(view)
    }

    // -- Introspection ------------------------------------------------------

    /// Returns a live room record.
    pub fn room(&self, room_id: &RoomId, now: Instant) -> Option<&Room> {
        self.live_room(room_id, now)
    }

    /// Number of rooms held, including expired ones not yet swept.
    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    /// Number of game states held. Equal to [`len`](Self::len) whenever
    /// the pairing invariant holds.
    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    pub fn room_ids(&self) -> Vec<RoomId> {
        self.rooms.keys().cloned().collect()
    }

    /// Returns `true` if every room has a game state and every game state
    /// has a room.
    pub fn is_consistent(&self) -> bool {
        self.rooms.len() == self.states.len()
            && self.states.keys().all(|id| self.rooms.contains_key(id))
    }

    // -- Internals ----------------------------------------------------------

    fn live_room(&self, room_id: &RoomId, now: Instant) -> Option<&Room> {
        self.rooms.get(room_id).filter(|room| !room.is_expired(now))
    }

    /// Recomputes `near_full` from live rooms, warning when it turns on.
    fn update_id_pressure(&mut self, now: Instant) {
        let Some(capacity) = self.config.id_space.capacity() else {
            return;
        };
        let live = self
            .rooms
            .values()
            .filter(|room| !room.is_expired(now))
            .count() as u64;
        let near_full = live.saturating_mul(10) >= capacity.saturating_mul(9);

        if near_full && !self.near_full {
            tracing::warn!(
                game = %G::KIND,
                live,
                capacity,
                "room id space is nearly full"
            );
        }
        self.near_full = near_full;
    }

    /// Removes a room and its state together.
    fn remove(&mut self, room_id: &RoomId) {
        self.rooms.remove(room_id);
        self.states.delete(room_id);
    }
}

fn render<G: GameEngine>(
    room: &Room,
    state: &G::State,
    slot: Option<Slot>,
) -> RoomView<G::View> {
    RoomView {
        room_id: room.room_id().clone(),
        slot,
        status: room.status(),
        finished: room.is_finished(),
        game: G::view(state, slot),
    }
}

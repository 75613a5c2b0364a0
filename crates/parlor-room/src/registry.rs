//! The shared registry handle: a [`RoomTable`] behind a reader-writer lock.

use std::sync::Arc;

use parlor_protocol::{
    RoomId, RoomTicket, RoomView, SessionToken, Slot, WaitStatus,
};
use tokio::sync::RwLock;
use tokio::time::Instant;

use crate::{GameEngine, Room, RoomConfig, RoomError, RoomTable};

/// Thread-safe registry of one game type's rooms.
///
/// Cheap to clone: every clone shares the same table. Each request task
/// holds a clone and calls into it; the sweeper task holds another.
///
/// ## Locking
///
/// Each operation takes the lock once and holds it for its whole
/// duration. Reads (`exists`, `resolve_slot`, `wait`, `view`) take the
/// read lock; anything that mutates takes the write lock. Rooms and game
/// states live under the same lock, so they can never be observed out of
/// step.
///
/// ## Sweeping
///
/// Expired rooms are removed lazily. Mutating operations sweep under
/// their write lock before doing anything else; reads sweep first only
/// when the last sweep is older than `RoomConfig::sweep_throttle`.
/// Reads never report an expired room either way.
pub struct RoomRegistry<G: GameEngine> {
    table: Arc<RwLock<RoomTable<G>>>,
}

impl<G: GameEngine> Clone for RoomRegistry<G> {
    fn clone(&self) -> Self {
        Self {
            table: Arc::clone(&self.table),
        }
    }
}

impl<G: GameEngine> RoomRegistry<G> {
    /// Creates an empty registry.
    pub fn new(config: RoomConfig) -> Self {
        Self {
            table: Arc::new(RwLock::new(RoomTable::new(config))),
        }
    }

    /// Returns `true` iff an unexpired room with this id exists.
    pub async fn exists(&self, room_id: &RoomId) -> bool {
        let now = self.sweep_if_due().await;
        self.table.read().await.exists(room_id, now)
    }

    /// Draws an id no live room is using.
    ///
    /// The id is not reserved: use [`create`](Self::create) to draw and
    /// insert atomically.
    ///
    /// # Errors
    /// [`RoomError::IdSpaceExhausted`] when every attempt collided.
    pub async fn generate_id(&self) -> Result<RoomId, RoomError> {
        let now = self.sweep_if_due().await;
        self.table.read().await.generate_id(now)
    }

    /// Removes every expired room and its game state, regardless of the
    /// sweep throttle. Returns the removed ids.
    pub async fn sweep(&self) -> Vec<RoomId> {
        let now = Instant::now();
        self.table.write().await.sweep(now)
    }

    /// Which slot `token` holds in the room. `None` for spectators,
    /// unknown rooms, and expired rooms.
    pub async fn resolve_slot(
        &self,
        room_id: &RoomId,
        token: &SessionToken,
    ) -> Option<Slot> {
        let now = self.sweep_if_due().await;
        self.table.read().await.resolve_slot(room_id, token, now)
    }

    /// Creates a waiting room hosted by `host`.
    ///
    /// # Errors
    /// [`RoomError::IdSpaceExhausted`] if no free id could be drawn.
    pub async fn create(
        &self,
        host: SessionToken,
    ) -> Result<RoomTicket, RoomError> {
        let now = Instant::now();
        let mut table = self.table.write().await;
        table.sweep(now);
        table.create(host, now)
    }

    /// Seats `token` in the room (or hands back the slot it already
    /// holds).
    ///
    /// # Errors
    /// [`RoomError::NotFound`] or [`RoomError::RoomFull`].
    pub async fn join(
        &self,
        room_id: &RoomId,
        token: SessionToken,
    ) -> Result<RoomTicket, RoomError> {
        let now = Instant::now();
        let mut table = self.table.write().await;
        table.sweep(now);
        table.join(room_id, token, now)
    }

    /// Polls whether the second player has arrived.
    ///
    /// # Errors
    /// [`RoomError::NotFound`] for unknown or expired rooms.
    pub async fn wait(
        &self,
        room_id: &RoomId,
        token: &SessionToken,
    ) -> Result<WaitStatus, RoomError> {
        let now = self.sweep_if_due().await;
        self.table.read().await.wait(room_id, token, now)
    }

    /// Reads the game state as `token` may see it.
    ///
    /// # Errors
    /// [`RoomError::NotFound`] for unknown or expired rooms.
    pub async fn view(
        &self,
        room_id: &RoomId,
        token: &SessionToken,
    ) -> Result<RoomView<G::View>, RoomError> {
        let now = self.sweep_if_due().await;
        self.table.read().await.view(room_id, token, now)
    }

    /// Applies a move from `token`.
    ///
    /// # Errors
    /// See [`RoomTable::play`].
    pub async fn play(
        &self,
        room_id: &RoomId,
        token: &SessionToken,
        mv: G::Move,
    ) -> Result<RoomView<G::View>, RoomError> {
        let now = Instant::now();
        let mut table = self.table.write().await;
        table.sweep(now);
        table.play(room_id, token, mv, now)
    }

    /// Returns a snapshot of a live room record.
    pub async fn room(&self, room_id: &RoomId) -> Option<Room> {
        let now = Instant::now();
        self.table.read().await.room(room_id, now).cloned()
    }

    /// Number of rooms held, including expired ones not yet swept.
    pub async fn len(&self) -> usize {
        self.table.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.table.read().await.is_empty()
    }

    /// Number of game states held.
    pub async fn state_count(&self) -> usize {
        self.table.read().await.state_count()
    }

    pub async fn room_ids(&self) -> Vec<RoomId> {
        self.table.read().await.room_ids()
    }

    /// Returns `true` if rooms and game states are paired one-to-one.
    pub async fn is_consistent(&self) -> bool {
        self.table.read().await.is_consistent()
    }

    /// Runs a throttled sweep if one is due and returns the `now` it used.
    ///
    /// Checks under the read lock first so polls don't queue behind each
    /// other for the write lock when no sweep is needed.
    async fn sweep_if_due(&self) -> Instant {
        let now = Instant::now();
        if self.table.read().await.sweep_due(now) {
            self.table.write().await.sweep_if_due(now);
        }
        now
    }
}

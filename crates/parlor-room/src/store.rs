//! The game-state half of a registry's table pair.

use std::collections::HashMap;

use parlor_protocol::RoomId;

/// Opaque per-room game state, keyed by the same id as the room.
///
/// The store is owned by a [`RoomTable`](crate::RoomTable) and only ever
/// touched in lockstep with the room map, so an entry here without a
/// room (or a room without an entry here) never survives an operation.
#[derive(Debug)]
pub struct GameStateStore<S> {
    states: HashMap<RoomId, S>,
}

impl<S> GameStateStore<S> {
    pub fn new() -> Self {
        Self {
            states: HashMap::new(),
        }
    }

    pub fn get(&self, room_id: &RoomId) -> Option<&S> {
        self.states.get(room_id)
    }

    /// Inserts or replaces the state for `room_id`.
    pub fn put(&mut self, room_id: RoomId, state: S) {
        self.states.insert(room_id, state);
    }

    /// Removes and returns the state for `room_id`.
    pub fn delete(&mut self, room_id: &RoomId) -> Option<S> {
        self.states.remove(room_id)
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &RoomId> {
        self.states.keys()
    }
}

impl<S> Default for GameStateStore<S> {
    fn default() -> Self {
        Self::new()
    }
}

//! The room record: two player slots and an expiry.

use std::time::Duration;

use parlor_protocol::{RoomId, RoomStatus, SessionToken, Slot};
use tokio::time::Instant;

/// Fallback lifetime when `now + ttl` doesn't fit in an `Instant`.
const FAR_FUTURE: Duration = Duration::from_secs(100 * 365 * 24 * 60 * 60);

/// One match between (up to) two session tokens.
///
/// Rooms are created and mutated only by [`RoomTable`](crate::RoomTable),
/// which upholds the slot invariants:
/// - `player2` goes from unset to set exactly once
/// - the same token never holds both slots
///
/// Expiry uses `tokio::time::Instant`, so tests can pause and advance the
/// clock instead of sleeping.
#[derive(Debug, Clone)]
pub struct Room {
    room_id: RoomId,
    player1: SessionToken,
    player2: Option<SessionToken>,
    created: Instant,
    expire: Instant,
    finished: bool,
}

impl Room {
    pub(crate) fn new(
        room_id: RoomId,
        host: SessionToken,
        now: Instant,
        ttl: Duration,
    ) -> Self {
        Self {
            room_id,
            player1: host,
            player2: None,
            created: now,
            expire: deadline(now, ttl),
            finished: false,
        }
    }

    pub fn room_id(&self) -> &RoomId {
        &self.room_id
    }

    pub fn player1(&self) -> &SessionToken {
        &self.player1
    }

    pub fn player2(&self) -> Option<&SessionToken> {
        self.player2.as_ref()
    }

    pub fn created(&self) -> Instant {
        self.created
    }

    /// The instant from which the room is eligible for removal.
    pub fn expire(&self) -> Instant {
        self.expire
    }

    /// `true` once the engine has reported a terminal state.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// `Waiting` until the second slot is filled.
    pub fn status(&self) -> RoomStatus {
        if self.player2.is_some() {
            RoomStatus::Active
        } else {
            RoomStatus::Waiting
        }
    }

    /// Returns `true` if `now` is at or past the room's expiry.
    pub fn is_expired(&self, now: Instant) -> bool {
        now >= self.expire
    }

    /// Which slot `token` occupies, if any.
    ///
    /// Never fails: a token holding neither slot (spectator, stale
    /// browser) is an ordinary `None`.
    pub fn resolve_slot(&self, token: &SessionToken) -> Option<Slot> {
        if *token == self.player1 {
            Some(Slot::Player1)
        } else if self.player2.as_ref() == Some(token) {
            Some(Slot::Player2)
        } else {
            None
        }
    }

    /// Seats `token` in the second slot. Returns `false` (and changes
    /// nothing) if the slot is taken or `token` is the host.
    pub(crate) fn fill_player2(&mut self, token: SessionToken) -> bool {
        if self.player2.is_some() || token == self.player1 {
            return false;
        }
        self.player2 = Some(token);
        true
    }

    /// Marks the game over and pulls the expiry in to `now + grace`.
    /// Never extends an expiry that is already sooner.
    pub(crate) fn finish(&mut self, now: Instant, grace: Duration) {
        self.finished = true;
        self.expire = self.expire.min(deadline(now, grace));
    }
}

fn deadline(now: Instant, ttl: Duration) -> Instant {
    now.checked_add(ttl).unwrap_or_else(|| now + FAR_FUTURE)
}

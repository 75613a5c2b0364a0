//! Core types shared by every Parlor layer.
//!
//! These are the values that end up in a browser: the session token in
//! a cookie, the room id in a URL, and the bodies returned from each
//! poll. Field names are camelCase because that's what the web client
//! reads.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ProtocolError;

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// An opaque per-browser identity.
///
/// The server never parses or checksums a token: whatever value the
/// browser presents is the identity. Two requests carrying the same
/// token are the same player.
///
/// This is a newtype around `String` so a token can't be passed where a
/// [`RoomId`] is expected, even though both are strings on the wire.
/// `#[serde(transparent)]` keeps the JSON form a plain string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionToken(String);

impl SessionToken {
    /// Wraps a raw token value.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the raw token value (what goes into the cookie).
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Tokens are secrets of a sort; logs only show a short prefix.
impl fmt::Display for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix: String = self.0.chars().take(6).collect();
        if prefix.len() < self.0.len() {
            write!(f, "T-{prefix}…")
        } else {
            write!(f, "T-{prefix}")
        }
    }
}

/// Identifies one room within a single game's registry.
///
/// Unique only among the rooms that are currently live: once a room is
/// swept, its id goes back into the pool and may be drawn again.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomId(String);

impl RoomId {
    /// Wraps a raw room identifier.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the raw identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "R-{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Slot
// ---------------------------------------------------------------------------

/// A player position in a two-seat room.
///
/// Serialized as `"player1"` / `"player2"`, the names the web client
/// switches on. A caller that holds neither slot is represented as
/// `Option<Slot>::None` (a spectator or an unrecognized session).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Slot {
    /// The room's creator.
    Player1,
    /// The second player to arrive.
    Player2,
}

impl Slot {
    /// Returns the other seat.
    pub fn opponent(self) -> Self {
        match self {
            Self::Player1 => Self::Player2,
            Self::Player2 => Self::Player1,
        }
    }

    /// Index into two-element per-slot arrays (`player1` = 0).
    pub fn index(self) -> usize {
        match self {
            Self::Player1 => 0,
            Self::Player2 => 1,
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Player1 => write!(f, "player1"),
            Self::Player2 => write!(f, "player2"),
        }
    }
}

// ---------------------------------------------------------------------------
// GameKind
// ---------------------------------------------------------------------------

/// The game types hosted by the lobby. Each one gets its own registry.
///
/// The variant names double as URL path segments
/// (`/Game/api/TicTacToeBox/Game`), so they're serialized verbatim.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
pub enum GameKind {
    FindAirplane,
    RockPaperScissor,
    TicTacToeBox,
}

impl GameKind {
    /// All hosted games, in route order.
    pub const ALL: [GameKind; 3] = [
        GameKind::FindAirplane,
        GameKind::RockPaperScissor,
        GameKind::TicTacToeBox,
    ];

    /// The path segment a transport routes on.
    pub fn path_segment(self) -> &'static str {
        match self {
            Self::FindAirplane => "FindAirplane",
            Self::RockPaperScissor => "RockPaperScissor",
            Self::TicTacToeBox => "TicTacToeBox",
        }
    }
}

impl fmt::Display for GameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path_segment())
    }
}

impl FromStr for GameKind {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.path_segment() == s)
            .ok_or_else(|| ProtocolError::UnknownGame(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// RoomStatus
// ---------------------------------------------------------------------------

/// Registry-level lifecycle of a room.
///
/// ```text
/// Waiting ──(second player joins)──→ Active ──(expire passes)──→ swept
/// ```
///
/// There is no `Finished` state here: a finished game is an active room
/// whose engine reports a terminal state. See `RoomView::finished`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomStatus {
    /// Only `player1` is seated.
    Waiting,
    /// Both slots are filled.
    Active,
}

impl fmt::Display for RoomStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Waiting => write!(f, "waiting"),
            Self::Active => write!(f, "active"),
        }
    }
}

// ---------------------------------------------------------------------------
// Response bodies
// ---------------------------------------------------------------------------

/// Returned when a caller creates or joins a room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomTicket {
    pub room_id: RoomId,
    pub slot: Slot,
    pub status: RoomStatus,
}

/// Returned by the "wait for player 2" poll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WaitStatus {
    pub room_id: RoomId,
    /// The caller's slot, or `None` for a spectator.
    pub slot: Option<Slot>,
    pub status: RoomStatus,
}

/// A slot-filtered read of a room's game state.
///
/// `game` is whatever the game's engine chose to expose to this caller;
/// the lobby never looks inside it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomView<V> {
    pub room_id: RoomId,
    pub slot: Option<Slot>,
    pub status: RoomStatus,
    /// `true` once the engine reported a terminal state. The room stays
    /// readable until its (shortened) expiry passes.
    pub finished: bool,
    pub game: V,
}

/// A client-visible error.
///
/// `code` follows HTTP conventions (404 = unknown room, 409 = room
/// full, 422 = move rejected, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: u16,
    pub message: String,
}

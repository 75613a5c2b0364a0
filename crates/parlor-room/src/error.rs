//! Error types for the room layer.

use parlor_protocol::RoomId;

/// A game engine refused a move. The game continues; the caller gets the
/// reason back.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("move rejected: {reason}")]
pub struct MoveRejected {
    pub reason: String,
}

impl MoveRejected {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Errors that can occur during room operations.
///
/// All of these are caller errors scoped to a single request. None of
/// them affects any other room.
#[derive(Debug, thiserror::Error)]
pub enum RoomError {
    /// The room does not exist, or has expired.
    #[error("room {0} not found")]
    NotFound(RoomId),

    /// Both player slots are taken.
    #[error("room {0} is full")]
    RoomFull(RoomId),

    /// The caller tried to move in a room where it holds no slot.
    #[error("caller holds no slot in room {0}")]
    NotSeated(RoomId),

    /// The caller tried to move before the second player arrived.
    #[error("room {0} is still waiting for a second player")]
    NotStarted(RoomId),

    /// The game engine refused the move.
    #[error(transparent)]
    Rejected(#[from] MoveRejected),

    /// Every candidate id drawn was already live. Fatal to the create
    /// request only.
    #[error("no free room id after {attempts} attempts")]
    IdSpaceExhausted { attempts: u32 },
}

//! Unified error type for the Parlor lobby.

use parlor_protocol::{ErrorBody, ProtocolError};
use parlor_room::RoomError;
use parlor_session::SessionError;

/// Top-level error that wraps all crate-specific errors.
///
/// When using the `parlor` meta-crate, you deal with this single error
/// type instead of importing errors from each sub-crate. The `#[from]`
/// attribute on each variant auto-generates `From` impls, so the `?`
/// operator converts sub-crate errors automatically.
///
/// Every variant is scoped to the request that hit it. A transport
/// answers with [`to_error_body`](Self::to_error_body) and carries on.
#[derive(Debug, thiserror::Error)]
pub enum ParlorError {
    /// A protocol-level error (malformed body, unknown game).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A session-level error (no credential). `Lobby::identify` always
    /// mints one, so this only comes from transports that insist on an
    /// existing cookie through `IdentityIssuer::read_token`.
    #[error(transparent)]
    Session(#[from] SessionError),

    /// A room-level error (not found, full, move rejected).
    #[error(transparent)]
    Room(#[from] RoomError),
}

impl ParlorError {
    /// The HTTP-style status a transport should answer with.
    pub fn status_code(&self) -> u16 {
        match self {
            ParlorError::Room(err) => match err {
                RoomError::NotFound(_) => 404,
                RoomError::RoomFull(_) | RoomError::NotStarted(_) => 409,
                RoomError::NotSeated(_) => 403,
                RoomError::Rejected(_) => 422,
                RoomError::IdSpaceExhausted { .. } => 503,
            },
            ParlorError::Protocol(ProtocolError::Encode(_)) => 500,
            ParlorError::Protocol(_) => 400,
            ParlorError::Session(_) => 400,
        }
    }

    /// The client-visible body for this error.
    pub fn to_error_body(&self) -> ErrorBody {
        ErrorBody {
            code: self.status_code(),
            message: self.to_string(),
        }
    }
}

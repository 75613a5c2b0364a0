//! Codec trait and implementations for serializing/deserializing bodies.
//!
//! The lobby doesn't care how responses are serialized; a transport
//! picks something that implements [`Codec`]. We ship [`JsonCodec`]
//! because the browser client speaks JSON.

use serde::{Serialize, de::DeserializeOwned};

use crate::ProtocolError;

/// A codec that can encode Rust types to bytes and decode bytes back.
///
/// ## Trait bounds
///
/// - `Send + Sync` → the lobby is shared by every request task, and the
///   codec lives inside it.
/// - `'static` → the codec owns everything it needs.
///
/// `decode` uses `DeserializeOwned` so the result never borrows from the
/// request body; the body buffer can be dropped right after decoding.
pub trait Codec: Send + Sync + 'static {
    /// Serializes a value into bytes.
    ///
    /// # Errors
    /// Returns `ProtocolError::Encode` if serialization fails.
    fn encode<T: Serialize>(
        &self,
        value: &T,
    ) -> Result<Vec<u8>, ProtocolError>;

    /// Deserializes bytes back into a value.
    ///
    /// # Errors
    /// Returns `ProtocolError::Decode` if the bytes are malformed,
    /// incomplete, or don't match the expected type.
    fn decode<T: DeserializeOwned>(
        &self,
        data: &[u8],
    ) -> Result<T, ProtocolError>;
}

// ---------------------------------------------------------------------------
// JsonCodec
// ---------------------------------------------------------------------------

/// A [`Codec`] that uses JSON (via `serde_json`).
///
/// This is behind the `json` feature flag (enabled by default).
///
/// ## Example
///
/// ```rust
/// use parlor_protocol::{Codec, JsonCodec, RoomId, RoomStatus, RoomTicket, Slot};
///
/// let codec = JsonCodec;
///
/// let ticket = RoomTicket {
///     room_id: RoomId::new("482913"),
///     slot: Slot::Player1,
///     status: RoomStatus::Waiting,
/// };
///
/// let bytes = codec.encode(&ticket).unwrap();
/// let decoded: RoomTicket = codec.decode(&bytes).unwrap();
/// assert_eq!(ticket, decoded);
/// ```
#[cfg(feature = "json")]
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

#[cfg(feature = "json")]
impl Codec for JsonCodec {
    fn encode<T: Serialize>(
        &self,
        value: &T,
    ) -> Result<Vec<u8>, ProtocolError> {
        serde_json::to_vec(value).map_err(ProtocolError::Encode)
    }

    fn decode<T: DeserializeOwned>(
        &self,
        data: &[u8],
    ) -> Result<T, ProtocolError> {
        serde_json::from_slice(data).map_err(ProtocolError::Decode)
    }
}

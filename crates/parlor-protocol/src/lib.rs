//! Wire types for Parlor.
//!
//! This crate defines what the lobby hands back to a browser:
//!
//! - **Identity types** ([`SessionToken`], [`RoomId`], [`Slot`],
//!   [`GameKind`]): the vocabulary every other layer speaks.
//! - **Envelopes** ([`RoomTicket`], [`WaitStatus`], [`RoomView`],
//!   [`ErrorBody`]): the bodies a transport serializes for each poll.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]): how those bodies and
//!   inbound moves are converted to/from bytes.
//! - **Errors** ([`ProtocolError`]): what can go wrong during
//!   encoding/decoding.
//!
//! # Architecture
//!
//! The protocol layer sits below everything else. It doesn't know about
//! cookies, registries or game rules, only how the shared types look on
//! the wire.
//!
//! ```text
//! Transport (HTTP) → Protocol (bodies) → Session (identity) → Room (registry)
//! ```

mod codec;
mod error;
mod types;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use types::{
    ErrorBody, GameKind, RoomId, RoomStatus, RoomTicket, RoomView,
    SessionToken, Slot, WaitStatus,
};

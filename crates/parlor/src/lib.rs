//! # Parlor
//!
//! Anonymous sessions and two-player rooms for small browser games.
//!
//! A [`Lobby`] owns one identity issuer and one room registry per hosted
//! game. A transport (HTTP handlers, a test, a demo) resolves the caller's
//! identity from its `Cookie` header, then calls the lobby's request-level
//! operations; the lobby never touches the network itself.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use parlor::prelude::*;
//!
//! # async fn demo() -> Result<(), ParlorError> {
//! let lobby = Lobby::builder().build();
//!
//! let host = lobby.identify(None);
//! let ticket = lobby.enter::<TicTacToeBox>(&host, None).await?;
//!
//! let guest = lobby.identify(None);
//! lobby.enter::<TicTacToeBox>(&guest, Some(&ticket.room_id)).await?;
//!
//! lobby
//!     .play::<TicTacToeBox>(&host, &ticket.room_id, Place { row: 1, col: 1 })
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod lobby;

pub use error::ParlorError;
pub use lobby::{HostedGame, Lobby, LobbyBuilder, RoomCounts};

use tracing_subscriber::EnvFilter;

/// Installs a `fmt` subscriber filtered by `RUST_LOG`, defaulting to
/// `parlor=info` (which also covers the `parlor_*` crates).
///
/// Does nothing if a global subscriber is already set.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("parlor=info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

pub mod prelude {
    pub use crate::{HostedGame, Lobby, LobbyBuilder, ParlorError, RoomCounts};
    pub use parlor_games::{
        AirplaneMove, Cell, FindAirplane, Place, RockPaperScissor,
        TicTacToeBox, Throw,
    };
    pub use parlor_protocol::{
        ErrorBody, GameKind, RoomId, RoomStatus, RoomTicket, RoomView,
        SessionToken, Slot, WaitStatus,
    };
    pub use parlor_room::{GameEngine, MoveRejected, RoomConfig, RoomError};
    pub use parlor_session::{Identity, IdentityConfig, IdSpace};
}

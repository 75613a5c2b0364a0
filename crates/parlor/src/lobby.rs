//! The lobby: identity plus one room registry per hosted game.
//!
//! This is what a transport holds (usually behind an `Arc`). Every
//! request-level operation takes the caller's [`Identity`] and returns a
//! serializable response or a [`ParlorError`].

use std::time::Duration;

use parlor_games::{FindAirplane, RockPaperScissor, TicTacToeBox};
use parlor_protocol::{
    Codec, GameKind, JsonCodec, RoomId, RoomTicket, RoomView, WaitStatus,
};
use parlor_room::{
    GameEngine, RoomConfig, RoomRegistry, SweeperHandle, spawn_sweeper,
};
use parlor_session::{Identity, IdentityConfig, IdentityIssuer};
use serde::Serialize;
use tokio::runtime::Handle;

use crate::ParlorError;

/// Runs `$body` with `$g` bound to the engine type for `$kind`.
macro_rules! with_game {
    ($kind:expr, $g:ident => $body:expr) => {
        match $kind {
            GameKind::FindAirplane => {
                type $g = FindAirplane;
                $body
            }
            GameKind::RockPaperScissor => {
                type $g = RockPaperScissor;
                $body
            }
            GameKind::TicTacToeBox => {
                type $g = TicTacToeBox;
                $body
            }
        }
    };
}

// ---------------------------------------------------------------------------
// HostedGame
// ---------------------------------------------------------------------------

/// A game the lobby has a registry for.
pub trait HostedGame: GameEngine + Sized {
    /// This game's registry inside `lobby`.
    fn registry(lobby: &Lobby) -> &RoomRegistry<Self>;
}

impl HostedGame for FindAirplane {
    fn registry(lobby: &Lobby) -> &RoomRegistry<Self> {
        &lobby.airplane
    }
}

impl HostedGame for RockPaperScissor {
    fn registry(lobby: &Lobby) -> &RoomRegistry<Self> {
        &lobby.rps
    }
}

impl HostedGame for TicTacToeBox {
    fn registry(lobby: &Lobby) -> &RoomRegistry<Self> {
        &lobby.tictactoe
    }
}

// ---------------------------------------------------------------------------
// LobbyBuilder
// ---------------------------------------------------------------------------

/// Builder for a [`Lobby`].
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use parlor::prelude::*;
///
/// let lobby = Lobby::builder()
///     .room_config(RoomConfig {
///         ttl: Duration::from_secs(30 * 60),
///         ..RoomConfig::default()
///     })
///     .build();
/// ```
pub struct LobbyBuilder {
    identity: IdentityConfig,
    rooms: RoomConfig,
    sweep_every: Option<Duration>,
}

impl LobbyBuilder {
    /// Creates a new builder with default settings and no background
    /// sweeping.
    pub fn new() -> Self {
        Self {
            identity: IdentityConfig::default(),
            rooms: RoomConfig::default(),
            sweep_every: None,
        }
    }

    /// Sets how session credentials are issued.
    pub fn identity_config(mut self, config: IdentityConfig) -> Self {
        self.identity = config;
        self
    }

    /// Sets the room config shared by every game's registry.
    pub fn room_config(mut self, config: RoomConfig) -> Self {
        self.rooms = config;
        self
    }

    /// Also sweeps every registry on a background task every `every`.
    ///
    /// Lazy sweeping on access happens either way.
    pub fn sweep_every(mut self, every: Duration) -> Self {
        self.sweep_every = Some(every);
        self
    }

    /// Builds the lobby.
    ///
    /// Background sweepers need a Tokio runtime. Built outside one, the
    /// lobby logs a warning and relies on lazy sweeping alone.
    pub fn build(self) -> Lobby {
        let mut lobby = Lobby {
            identity: IdentityIssuer::new(self.identity),
            airplane: RoomRegistry::new(self.rooms.clone()),
            rps: RoomRegistry::new(self.rooms.clone()),
            tictactoe: RoomRegistry::new(self.rooms),
            codec: JsonCodec,
            sweepers: Vec::new(),
        };

        if let Some(every) = self.sweep_every {
            if Handle::try_current().is_ok() {
                lobby.sweepers = vec![
                    spawn_sweeper(lobby.airplane.clone(), every),
                    spawn_sweeper(lobby.rps.clone(), every),
                    spawn_sweeper(lobby.tictactoe.clone(), every),
                ];
            } else {
                tracing::warn!(
                    "no tokio runtime; background sweeping disabled"
                );
            }
        }

        lobby
    }
}

impl Default for LobbyBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Lobby
// ---------------------------------------------------------------------------

/// Live room counts per game, for health checks and logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomCounts {
    pub find_airplane: usize,
    pub rock_paper_scissor: usize,
    pub tic_tac_toe_box: usize,
}

impl RoomCounts {
    pub fn total(&self) -> usize {
        self.find_airplane + self.rock_paper_scissor + self.tic_tac_toe_box
    }
}

/// The explicit context a transport passes to every handler.
///
/// Registries for different games are independent: traffic on one never
/// waits on another's lock. Dropping the lobby stops its background
/// sweepers.
pub struct Lobby {
    identity: IdentityIssuer,
    airplane: RoomRegistry<FindAirplane>,
    rps: RoomRegistry<RockPaperScissor>,
    tictactoe: RoomRegistry<TicTacToeBox>,
    codec: JsonCodec,
    sweepers: Vec<SweeperHandle>,
}

impl Lobby {
    /// Creates a new builder.
    pub fn builder() -> LobbyBuilder {
        LobbyBuilder::new()
    }

    /// The registry for game `G`.
    pub fn registry<G: HostedGame>(&self) -> &RoomRegistry<G> {
        G::registry(self)
    }

    /// Resolves the caller from a raw `Cookie` header, minting a new
    /// identity if it carries none. When `Identity::issued` is set, the
    /// transport must send it back as `Set-Cookie`.
    pub fn identify(&self, cookie_header: Option<&str>) -> Identity {
        self.identity.resolve_or_issue(cookie_header)
    }

    /// Create-or-resolve: with no room id, creates a waiting room hosted
    /// by the caller; with one, joins it (or hands back the caller's
    /// existing slot).
    ///
    /// # Errors
    /// `NotFound` and `RoomFull` on join, `IdSpaceExhausted` on create.
    pub async fn enter<G: HostedGame>(
        &self,
        who: &Identity,
        room_id: Option<&RoomId>,
    ) -> Result<RoomTicket, ParlorError> {
        let registry = G::registry(self);
        let ticket = match room_id {
            None => registry.create(who.token.clone()).await?,
            Some(id) => registry.join(id, who.token.clone()).await?,
        };
        Ok(ticket)
    }

    /// Polls whether the second player has arrived.
    ///
    /// # Errors
    /// `NotFound` for unknown or expired rooms.
    pub async fn wait<G: HostedGame>(
        &self,
        who: &Identity,
        room_id: &RoomId,
    ) -> Result<WaitStatus, ParlorError> {
        Ok(G::registry(self).wait(room_id, &who.token).await?)
    }

    /// Reads the room as the caller may see it. Spectators get the
    /// engine's spectator view.
    ///
    /// # Errors
    /// `NotFound` for unknown or expired rooms.
    pub async fn room<G: HostedGame>(
        &self,
        who: &Identity,
        room_id: &RoomId,
    ) -> Result<RoomView<G::View>, ParlorError> {
        Ok(G::registry(self).view(room_id, &who.token).await?)
    }

    /// Submits a move.
    ///
    /// # Errors
    /// `NotFound`, `NotSeated`, `NotStarted`, or the engine's rejection.
    pub async fn play<G: HostedGame>(
        &self,
        who: &Identity,
        room_id: &RoomId,
        mv: G::Move,
    ) -> Result<RoomView<G::View>, ParlorError> {
        Ok(G::registry(self).play(room_id, &who.token, mv).await?)
    }

    /// Submits a move given as a JSON request body.
    ///
    /// # Errors
    /// `ProtocolError::Decode` if the body isn't a move for `G`, then as
    /// [`play`](Self::play).
    pub async fn play_json<G: HostedGame>(
        &self,
        who: &Identity,
        room_id: &RoomId,
        body: &[u8],
    ) -> Result<RoomView<G::View>, ParlorError> {
        let mv: G::Move = self.codec.decode(body)?;
        self.play::<G>(who, room_id, mv).await
    }

    // -- Dispatch by game kind --------------------------------------------
    //
    // A transport routes on a path segment, so it knows the game only as
    // a `GameKind` value. These pick the registry at runtime and return
    // encoded bodies.

    /// [`enter`](Self::enter) for the game named by `kind`.
    pub async fn enter_kind(
        &self,
        kind: GameKind,
        who: &Identity,
        room_id: Option<&RoomId>,
    ) -> Result<RoomTicket, ParlorError> {
        with_game!(kind, G => self.enter::<G>(who, room_id).await)
    }

    /// [`wait`](Self::wait) for the game named by `kind`.
    pub async fn wait_kind(
        &self,
        kind: GameKind,
        who: &Identity,
        room_id: &RoomId,
    ) -> Result<WaitStatus, ParlorError> {
        with_game!(kind, G => self.wait::<G>(who, room_id).await)
    }

    /// [`room`](Self::room) for the game named by `kind`, encoded.
    pub async fn room_bytes(
        &self,
        kind: GameKind,
        who: &Identity,
        room_id: &RoomId,
    ) -> Result<Vec<u8>, ParlorError> {
        with_game!(kind, G => {
            let view = self.room::<G>(who, room_id).await?;
            self.encode(&view)
        })
    }

    /// [`play_json`](Self::play_json) for the game named by `kind`,
    /// encoded.
    pub async fn play_bytes(
        &self,
        kind: GameKind,
        who: &Identity,
        room_id: &RoomId,
        body: &[u8],
    ) -> Result<Vec<u8>, ParlorError> {
        with_game!(kind, G => {
            let view = self.play_json::<G>(who, room_id, body).await?;
            self.encode(&view)
        })
    }

    /// Encodes a response body with the lobby's codec.
    pub fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ParlorError> {
        Ok(self.codec.encode(value)?)
    }

    // -- Maintenance --------------------------------------------------------

    /// Sweeps every registry now. Returns how many rooms were removed.
    pub async fn sweep_all(&self) -> usize {
        let swept = self.airplane.sweep().await.len()
            + self.rps.sweep().await.len()
            + self.tictactoe.sweep().await.len();
        if swept > 0 {
            tracing::debug!(swept, "lobby sweep");
        }
        swept
    }

    /// Rooms held per game, including expired ones not yet swept.
    pub async fn room_counts(&self) -> RoomCounts {
        RoomCounts {
            find_airplane: self.airplane.len().await,
            rock_paper_scissor: self.rps.len().await,
            tic_tac_toe_box: self.tictactoe.len().await,
        }
    }

    /// Number of background sweepers running.
    pub fn sweeper_count(&self) -> usize {
        self.sweepers.iter().filter(|s| !s.is_finished()).count()
    }
}

impl Default for Lobby {
    fn default() -> Self {
        LobbyBuilder::new().build()
    }
}

#[cfg(test)]
mod tests {
    use parlor_games::Throw;
    use parlor_protocol::{RoomStatus, Slot};
    use parlor_room::RoomError;

    use super::*;

    fn lobby() -> Lobby {
        Lobby::builder().room_config(RoomConfig::for_tests()).build()
    }

    #[tokio::test]
    async fn test_enter_without_room_creates_waiting_room() {
        let lobby = lobby();
        let host = lobby.identify(None);

        let ticket = lobby.enter::<TicTacToeBox>(&host, None).await.unwrap();

        assert_eq!(ticket.slot, Slot::Player1);
        assert_eq!(ticket.status, RoomStatus::Waiting);
        assert_eq!(lobby.room_counts().await.tic_tac_toe_box, 1);
    }

    #[tokio::test]
    async fn test_registries_are_independent_per_game() {
        let lobby = lobby();
        let host = lobby.identify(None);
        let ticket = lobby.enter::<RockPaperScissor>(&host, None).await.unwrap();

        let guest = lobby.identify(None);
        let result = lobby
            .enter::<FindAirplane>(&guest, Some(&ticket.room_id))
            .await;

        // Same id space, but this room only exists in the RPS registry.
        assert!(matches!(
            result,
            Err(ParlorError::Room(RoomError::NotFound(_)))
        ));
        let counts = lobby.room_counts().await;
        assert_eq!(counts.rock_paper_scissor, 1);
        assert_eq!(counts.find_airplane, 0);
        assert_eq!(counts.total(), 1);
    }

    #[tokio::test]
    async fn test_play_json_bad_body_is_protocol_error() {
        let lobby = lobby();
        let host = lobby.identify(None);
        let guest = lobby.identify(None);
        let id = lobby.enter::<RockPaperScissor>(&host, None).await.unwrap().room_id;
        lobby.enter::<RockPaperScissor>(&guest, Some(&id)).await.unwrap();

        let err = lobby
            .play_json::<RockPaperScissor>(&host, &id, b"\"lizard\"")
            .await
            .unwrap_err();

        assert!(matches!(err, ParlorError::Protocol(_)));
        assert_eq!(err.status_code(), 400);
    }

    #[tokio::test]
    async fn test_play_json_decodes_move() {
        let lobby = lobby();
        let host = lobby.identify(None);
        let guest = lobby.identify(None);
        let id = lobby.enter::<RockPaperScissor>(&host, None).await.unwrap().room_id;
        lobby.enter::<RockPaperScissor>(&guest, Some(&id)).await.unwrap();

        let view = lobby
            .play_json::<RockPaperScissor>(&host, &id, b"\"rock\"")
            .await
            .unwrap();

        assert_eq!(view.game.your_throw, Some(Throw::Rock));
        assert_eq!(view.game.submitted, [true, false]);
    }

    #[tokio::test]
    async fn test_room_bytes_dispatches_on_kind() {
        let lobby = lobby();
        let host = lobby.identify(None);
        let id = lobby
            .enter_kind(GameKind::FindAirplane, &host, None)
            .await
            .unwrap()
            .room_id;

        let bytes = lobby
            .room_bytes(GameKind::FindAirplane, &host, &id)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(json["roomId"], id.as_str());
        assert_eq!(json["status"], "waiting");
        assert_eq!(json["game"]["phase"], "placing");
    }

    #[tokio::test]
    async fn test_sweep_every_spawns_one_sweeper_per_game() {
        let lobby = Lobby::builder()
            .sweep_every(Duration::from_secs(60))
            .build();
        assert_eq!(lobby.sweeper_count(), 3);
    }

    #[test]
    fn test_build_outside_runtime_skips_sweepers() {
        let lobby = Lobby::builder()
            .sweep_every(Duration::from_secs(60))
            .build();
        assert_eq!(lobby.sweeper_count(), 0);
    }
}

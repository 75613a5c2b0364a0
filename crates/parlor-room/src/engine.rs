//! The `GameEngine` trait: the seam between the registry and game rules.
//!
//! Each hosted game implements this once. The registry calls it at the
//! right time and never looks inside the state it stores.

use parlor_protocol::{GameKind, Slot};
use serde::{Serialize, de::DeserializeOwned};

use crate::MoveRejected;

/// A pure transition function over one game's state.
///
/// Each associated type defines the shape of the game's data:
/// - `State`: the full game state (board, scores, hidden choices)
/// - `Move`: what a seated player submits
/// - `View`: what a given caller is allowed to see of the state
///
/// Engines are stateless types; every method is an associated function.
/// That keeps them trivially `Send + Sync` and lets the registry be
/// generic over `G: GameEngine` with no engine instance to carry around.
pub trait GameEngine: Send + Sync + 'static {
    /// Which game this is. Used for logging and routing.
    const KIND: GameKind;

    /// The full game state. Stored by the registry, never inspected.
    type State: Clone + Send + Sync;

    /// A move submitted by a seated player.
    type Move: Send + DeserializeOwned;

    /// A caller-specific read of the state.
    type View: Send + Serialize;

    /// The state a freshly created room starts with.
    fn initial_state() -> Self::State;

    /// Applies a move by the player in `slot`.
    ///
    /// Returns the next state, or the reason the move is not allowed.
    /// The current state is left untouched either way.
    fn apply_move(
        state: &Self::State,
        slot: Slot,
        mv: Self::Move,
    ) -> Result<Self::State, MoveRejected>;

    /// Returns `true` once the game is over (win, draw, ...).
    ///
    /// Checked after every accepted move. The registry then shortens the
    /// room's expiry so it gets swept soon after the players have seen
    /// the result.
    fn is_terminal(state: &Self::State) -> bool;

    /// Renders the state for one caller.
    ///
    /// `viewer` is `None` for a caller holding neither slot. Hide whatever
    /// that caller shouldn't see (an opponent's pending throw, a hidden
    /// position).
    fn view(state: &Self::State, viewer: Option<Slot>) -> Self::View;
}

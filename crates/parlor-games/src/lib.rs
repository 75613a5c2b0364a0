//! Game engines for the three games a Parlor lobby hosts.
//!
//! Each engine is a zero-sized type implementing
//! [`GameEngine`](parlor_room::GameEngine): pure state transitions plus a
//! slot-filtered view. The registry owns storage and lifecycle.

pub mod airplane;
pub mod rps;
pub mod tictactoe;

pub use airplane::{
    AirplaneMove, AirplaneState, AirplaneView, Cell, FindAirplane, Phase, Shot,
};
pub use rps::{RockPaperScissor, RoundResult, RpsState, RpsView, Throw};
pub use tictactoe::{Mark, Outcome, Place, TicTacToeBox, TttState, TttView};

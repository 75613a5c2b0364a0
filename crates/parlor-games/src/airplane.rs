//! Find the airplane: hide a plane, then take turns probing for the
//! other player's.
//!
//! Each player first places their plane on a [`GRID`]×[`GRID`] grid.
//! Once both are placed, players alternate probes at the opponent's grid,
//! player 1 first. The first hit wins.

use parlor_protocol::{GameKind, Slot};
use parlor_room::{GameEngine, MoveRejected};
use serde::{Deserialize, Serialize};

/// Grid side length.
pub const GRID: u8 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub row: u8,
    pub col: u8,
}

impl Cell {
    fn in_bounds(self) -> bool {
        self.row < GRID && self.col < GRID
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Shot {
    #[serde(flatten)]
    pub cell: Cell,
    pub hit: bool,
}

/// Moves are tagged by `action`: `{"action":"place","row":1,"col":2}`.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum AirplaneMove {
    Place(Cell),
    Probe(Cell),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Placing,
    Hunting,
    Over,
}

#[derive(Debug, Clone)]
pub struct AirplaneState {
    planes: [Option<Cell>; 2],
    /// Shots fired by each slot, in order.
    shots: [Vec<Shot>; 2],
    turn: Slot,
    winner: Option<Slot>,
}

impl AirplaneState {
    fn phase(&self) -> Phase {
        if self.winner.is_some() {
            Phase::Over
        } else if self.planes.iter().all(Option::is_some) {
            Phase::Hunting
        } else {
            Phase::Placing
        }
    }
}

/// One caller's read. The opponent's plane never appears; the caller
/// sees their own plane, and everyone sees the shot history.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AirplaneView {
    pub phase: Phase,
    pub grid: u8,
    pub placed: [bool; 2],
    pub your_plane: Option<Cell>,
    pub shots: [Vec<Shot>; 2],
    pub turn: Option<Slot>,
    pub winner: Option<Slot>,
}

pub struct FindAirplane;

impl GameEngine for FindAirplane {
    const KIND: GameKind = GameKind::FindAirplane;
    type State = AirplaneState;
    type Move = AirplaneMove;
    type View = AirplaneView;

    fn initial_state() -> AirplaneState {
        AirplaneState {
            planes: [None, None],
            shots: [Vec::new(), Vec::new()],
            turn: Slot::Player1,
            winner: None,
        }
    }

    fn apply_move(
        state: &AirplaneState,
        slot: Slot,
        mv: AirplaneMove,
    ) -> Result<AirplaneState, MoveRejected> {
        let me = slot.index();
        let mut next = state.clone();

        match (state.phase(), mv) {
            (Phase::Over, _) => return Err(MoveRejected::new("game is over")),

            (_, AirplaneMove::Place(cell)) => {
                if state.planes[me].is_some() {
                    return Err(MoveRejected::new("plane already placed"));
                }
                if !cell.in_bounds() {
                    return Err(out_of_bounds());
                }
                next.planes[me] = Some(cell);
            }

            (Phase::Placing, AirplaneMove::Probe(_)) => {
                return Err(MoveRejected::new("both planes must be placed first"));
            }

            (Phase::Hunting, AirplaneMove::Probe(cell)) => {
                if state.turn != slot {
                    return Err(MoveRejected::new("not your turn"));
                }
                if !cell.in_bounds() {
                    return Err(out_of_bounds());
                }
                if state.shots[me].iter().any(|s| s.cell == cell) {
                    return Err(MoveRejected::new("cell already probed"));
                }

                let hit = state.planes[slot.opponent().index()] == Some(cell);
                next.shots[me].push(Shot { cell, hit });
                if hit {
                    next.winner = Some(slot);
                } else {
                    next.turn = slot.opponent();
                }
            }
        }
        Ok(next)
    }

    fn is_terminal(state: &AirplaneState) -> bool {
        state.winner.is_some()
    }

    fn view(state: &AirplaneState, viewer: Option<Slot>) -> AirplaneView {
        let phase = state.phase();
        AirplaneView {
            phase,
            grid: GRID,
            placed: state.planes.map(|p| p.is_some()),
            your_plane: viewer.and_then(|s| state.planes[s.index()]),
            shots: state.shots.clone(),
            turn: (phase == Phase::Hunting).then_some(state.turn),
            winner: state.winner,
        }
    }
}

fn out_of_bounds() -> MoveRejected {
    MoveRejected::new(format!("row and col must be below {GRID}"))
}

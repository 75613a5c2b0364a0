//! Tic-tac-toe. Player 1 is X and moves first.

use parlor_protocol::{GameKind, Slot};
use parlor_room::{GameEngine, MoveRejected};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Game types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mark {
    X,
    O,
}

impl Mark {
    pub fn of(slot: Slot) -> Self {
        match slot {
            Slot::Player1 => Mark::X,
            Slot::Player2 => Mark::O,
        }
    }
}

type Board = [[Option<Mark>; 3]; 3];

/// How a finished game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Won(Slot),
    Draw,
}

#[derive(Debug, Clone)]
pub struct TttState {
    board: Board,
    turn: Slot,
    outcome: Option<Outcome>,
}

/// A mark placed at `row`, `col` (both `0..3`).
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Place {
    pub row: usize,
    pub col: usize,
}

/// The whole board is public; the view adds which mark the caller plays.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TttView {
    pub board: Board,
    pub turn: Slot,
    pub your_mark: Option<Mark>,
    pub your_turn: bool,
    pub outcome: Option<Outcome>,
}

// ---------------------------------------------------------------------------
// Game logic
// ---------------------------------------------------------------------------

pub struct TicTacToeBox;

impl GameEngine for TicTacToeBox {
    const KIND: GameKind = GameKind::TicTacToeBox;
    type State = TttState;
    type Move = Place;
    type View = TttView;

    fn initial_state() -> TttState {
        TttState {
            board: [[None; 3]; 3],
            turn: Slot::Player1,
            outcome: None,
        }
    }

    fn apply_move(
        state: &TttState,
        slot: Slot,
        mv: Place,
    ) -> Result<TttState, MoveRejected> {
        if state.outcome.is_some() {
            return Err(MoveRejected::new("game is over"));
        }
        if state.turn != slot {
            return Err(MoveRejected::new("not your turn"));
        }
        if mv.row >= 3 || mv.col >= 3 {
            return Err(MoveRejected::new("row and col must be 0-2"));
        }
        if state.board[mv.row][mv.col].is_some() {
            return Err(MoveRejected::new("cell is occupied"));
        }

        let mark = Mark::of(slot);
        let mut next = state.clone();
        next.board[mv.row][mv.col] = Some(mark);

        if check_winner(&next.board, mark) {
            next.outcome = Some(Outcome::Won(slot));
        } else if board_full(&next.board) {
            next.outcome = Some(Outcome::Draw);
        } else {
            next.turn = slot.opponent();
        }
        Ok(next)
    }

    fn is_terminal(state: &TttState) -> bool {
        state.outcome.is_some()
    }

    fn view(state: &TttState, viewer: Option<Slot>) -> TttView {
        TttView {
            board: state.board,
            turn: state.turn,
            your_mark: viewer.map(Mark::of),
            your_turn: state.outcome.is_none() && viewer == Some(state.turn),
            outcome: state.outcome,
        }
    }
}

fn check_winner(b: &Board, m: Mark) -> bool {
    let is = |i: usize, j: usize| b[i][j] == Some(m);
    (0..3).any(|i| (0..3).all(|j| is(i, j)))         // rows
        || (0..3).any(|j| (0..3).all(|i| is(i, j)))  // cols
        || (0..3).all(|i| is(i, i))                  // diagonal
        || (0..3).all(|i| is(i, 2 - i))              // anti-diagonal
}

fn board_full(b: &Board) -> bool {
    b.iter().all(|row| row.iter().all(Option::is_some))
}

#[cfg(test)]
mod tests {
    use super::*;
    use Slot::{Player1 as P1, Player2 as P2};

    fn play(moves: &[(Slot, usize, usize)]) -> TttState {
        moves.iter().fold(TicTacToeBox::initial_state(), |s, &(slot, row, col)| {
            TicTacToeBox::apply_move(&s, slot, Place { row, col }).unwrap()
        })
    }

    #[test]
    fn test_apply_move_player2_first_rejected() {
        let state = TicTacToeBox::initial_state();
        let err = TicTacToeBox::apply_move(&state, P2, Place { row: 0, col: 0 })
            .unwrap_err();
        assert_eq!(err.reason, "not your turn");
    }

    #[test]
    fn test_apply_move_occupied_cell_rejected() {
        let state = play(&[(P1, 1, 1)]);
        let err = TicTacToeBox::apply_move(&state, P2, Place { row: 1, col: 1 })
            .unwrap_err();
        assert_eq!(err.reason, "cell is occupied");
    }

    #[test]
    fn test_apply_move_out_of_bounds_rejected() {
        let state = TicTacToeBox::initial_state();
        assert!(TicTacToeBox::apply_move(&state, P1, Place { row: 3, col: 0 }).is_err());
    }

    #[test]
    fn test_apply_move_row_completes_win() {
        let state = play(&[(P1, 0, 0), (P2, 1, 0), (P1, 0, 1), (P2, 1, 1), (P1, 0, 2)]);

        assert_eq!(state.outcome, Some(Outcome::Won(P1)));
        assert!(TicTacToeBox::is_terminal(&state));
        assert!(TicTacToeBox::apply_move(&state, P2, Place { row: 2, col: 2 }).is_err());
    }

    #[test]
    fn test_apply_move_anti_diagonal_wins_for_o() {
        let state = play(&[
            (P1, 0, 0),
            (P2, 0, 2),
            (P1, 0, 1),
            (P2, 1, 1),
            (P1, 2, 2),
            (P2, 2, 0),
        ]);
        assert_eq!(state.outcome, Some(Outcome::Won(P2)));
    }

    #[test]
    fn test_apply_move_full_board_draws() {
        // X O X
        // X O O
        // O X X
        let state = play(&[
            (P1, 0, 0),
            (P2, 0, 1),
            (P1, 0, 2),
            (P2, 1, 1),
            (P1, 1, 0),
            (P2, 1, 2),
            (P1, 2, 1),
            (P2, 2, 0),
            (P1, 2, 2),
        ]);
        assert_eq!(state.outcome, Some(Outcome::Draw));
    }

    #[test]
    fn test_view_marks_and_turn_per_viewer() {
        let state = play(&[(P1, 0, 0)]);

        let x = TicTacToeBox::view(&state, Some(P1));
        let o = TicTacToeBox::view(&state, Some(P2));
        let spectator = TicTacToeBox::view(&state, None);

        assert_eq!(x.your_mark, Some(Mark::X));
        assert!(!x.your_turn);
        assert!(o.your_turn);
        assert_eq!(spectator.your_mark, None);
        assert_eq!(spectator.board[0][0], Some(Mark::X));
    }

    #[test]
    fn test_view_json_shape() {
        let view = TicTacToeBox::view(&TicTacToeBox::initial_state(), Some(P1));
        let json = serde_json::to_value(&view).unwrap();

        assert_eq!(json["yourMark"], "X");
        assert_eq!(json["turn"], "player1");
        assert_eq!(json["yourTurn"], true);
        assert!(json["outcome"].is_null());
    }
}

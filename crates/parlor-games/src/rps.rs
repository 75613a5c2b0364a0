//! Rock-paper-scissors, best of three.
//!
//! Both players throw blind each round. A round resolves once both
//! throws are in; the first player to win [`WINS_NEEDED`] rounds takes the
//! match. Ties replay the round without scoring.

use parlor_protocol::{GameKind, Slot};
use parlor_room::{GameEngine, MoveRejected};
use serde::{Deserialize, Serialize};

/// Round wins needed to take the match.
pub const WINS_NEEDED: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Throw {
    Rock,
    Paper,
    Scissors,
}

impl Throw {
    pub fn beats(self, other: Throw) -> bool {
        matches!(
            (self, other),
            (Throw::Rock, Throw::Scissors)
                | (Throw::Paper, Throw::Rock)
                | (Throw::Scissors, Throw::Paper)
        )
    }
}

/// A resolved round. `winner` is `None` on a tie.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundResult {
    pub round: u32,
    pub throws: [Throw; 2],
    pub winner: Option<Slot>,
}

#[derive(Debug, Clone, Default)]
pub struct RpsState {
    round: u32,
    pending: [Option<Throw>; 2],
    scores: [u32; 2],
    last_round: Option<RoundResult>,
}

impl RpsState {
    fn winner(&self) -> Option<Slot> {
        if self.scores[0] >= WINS_NEEDED {
            Some(Slot::Player1)
        } else if self.scores[1] >= WINS_NEEDED {
            Some(Slot::Player2)
        } else {
            None
        }
    }
}

/// What one caller sees. Pending throws are never shown except the
/// caller's own; `submitted` only says who has thrown this round.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RpsView {
    pub round: u32,
    pub scores: [u32; 2],
    pub submitted: [bool; 2],
    pub your_throw: Option<Throw>,
    pub last_round: Option<RoundResult>,
    pub winner: Option<Slot>,
}

pub struct RockPaperScissor;

impl GameEngine for RockPaperScissor {
    const KIND: GameKind = GameKind::RockPaperScissor;
    type State = RpsState;
    type Move = Throw;
    type View = RpsView;

    fn initial_state() -> RpsState {
        RpsState {
            round: 1,
            ..RpsState::default()
        }
    }

    fn apply_move(
        state: &RpsState,
        slot: Slot,
        throw: Throw,
    ) -> Result<RpsState, MoveRejected> {
        if state.winner().is_some() {
            return Err(MoveRejected::new("match is over"));
        }
        if state.pending[slot.index()].is_some() {
            return Err(MoveRejected::new("already threw this round"));
        }

        let mut next = state.clone();
        next.pending[slot.index()] = Some(throw);

        if let [Some(first), Some(second)] = next.pending {
            let winner = if first.beats(second) {
                Some(Slot::Player1)
            } else if second.beats(first) {
                Some(Slot::Player2)
            } else {
                None
            };
            if let Some(w) = winner {
                next.scores[w.index()] += 1;
            }
            next.last_round = Some(RoundResult {
                round: next.round,
                throws: [first, second],
                winner,
            });
            next.pending = [None, None];
            next.round += 1;
        }
        Ok(next)
    }

    fn is_terminal(state: &RpsState) -> bool {
        state.winner().is_some()
    }

    fn view(state: &RpsState, viewer: Option<Slot>) -> RpsView {
        RpsView {
            round: state.round,
            scores: state.scores,
            submitted: state.pending.map(|t| t.is_some()),
            your_throw: viewer.and_then(|s| state.pending[s.index()]),
            last_round: state.last_round,
            winner: state.winner(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use Slot::{Player1 as P1, Player2 as P2};

    fn round(state: &RpsState, a: Throw, b: Throw) -> RpsState {
        let s = RockPaperScissor::apply_move(state, P1, a).unwrap();
        RockPaperScissor::apply_move(&s, P2, b).unwrap()
    }

    #[test]
    fn test_beats_cycle() {
        assert!(Throw::Rock.beats(Throw::Scissors));
        assert!(Throw::Scissors.beats(Throw::Paper));
        assert!(Throw::Paper.beats(Throw::Rock));
        assert!(!Throw::Rock.beats(Throw::Rock));
        assert!(!Throw::Rock.beats(Throw::Paper));
    }

    #[test]
    fn test_apply_move_second_throw_same_round_rejected() {
        let s = RockPaperScissor::apply_move(
            &RockPaperScissor::initial_state(),
            P1,
            Throw::Rock,
        )
        .unwrap();

        let err = RockPaperScissor::apply_move(&s, P1, Throw::Paper).unwrap_err();
        assert_eq!(err.reason, "already threw this round");
    }

    #[test]
    fn test_apply_move_round_resolves_when_both_thrown() {
        let s = round(&RockPaperScissor::initial_state(), Throw::Paper, Throw::Rock);

        assert_eq!(s.scores, [1, 0]);
        assert_eq!(s.round, 2);
        assert_eq!(s.pending, [None, None]);
        assert_eq!(
            s.last_round,
            Some(RoundResult {
                round: 1,
                throws: [Throw::Paper, Throw::Rock],
                winner: Some(P1),
            })
        );
    }

    #[test]
    fn test_apply_move_tie_scores_nothing() {
        let s = round(&RockPaperScissor::initial_state(), Throw::Rock, Throw::Rock);

        assert_eq!(s.scores, [0, 0]);
        assert_eq!(s.last_round.unwrap().winner, None);
        assert!(!RockPaperScissor::is_terminal(&s));
    }

    #[test]
    fn test_apply_move_two_wins_end_match() {
        let s = RockPaperScissor::initial_state();
        let s = round(&s, Throw::Rock, Throw::Paper);
        let s = round(&s, Throw::Rock, Throw::Scissors);
        assert!(!RockPaperScissor::is_terminal(&s));
        let s = round(&s, Throw::Scissors, Throw::Rock);

        assert!(RockPaperScissor::is_terminal(&s));
        assert_eq!(s.winner(), Some(P2));
        assert!(RockPaperScissor::apply_move(&s, P1, Throw::Rock).is_err());
    }

    #[test]
    fn test_view_hides_opponent_pending_throw() {
        let s = RockPaperScissor::apply_move(
            &RockPaperScissor::initial_state(),
            P1,
            Throw::Scissors,
        )
        .unwrap();

        let mine = RockPaperScissor::view(&s, Some(P1));
        let theirs = RockPaperScissor::view(&s, Some(P2));
        let spectator = RockPaperScissor::view(&s, None);

        assert_eq!(mine.your_throw, Some(Throw::Scissors));
        assert_eq!(theirs.your_throw, None);
        assert_eq!(theirs.submitted, [true, false]);
        assert_eq!(spectator.your_throw, None);

        let json = serde_json::to_string(&theirs).unwrap();
        assert!(!json.contains("scissors"));
    }

    #[test]
    fn test_move_decodes_from_lowercase_json() {
        let throw: Throw = serde_json::from_str("\"paper\"").unwrap();
        assert_eq!(throw, Throw::Paper);
    }
}

//! Turn invariant: the side to move follows from the mark counts.

use super::Invariant;
use crate::Snapshot;
use crate::types::Player;

/// Invariant: X moves when the counts are level, O when X is one ahead.
///
/// Only checked while the game is in progress. The turn still flips on
/// the final move, so a finished game says nothing extra here.
pub struct TurnMatchesMarks;

impl Invariant<Snapshot> for TurnMatchesMarks {
    fn holds(snapshot: &Snapshot) -> bool {
        if snapshot.outcome().is_over() {
            return true;
        }
        let x = snapshot.board().count(Player::X);
        let o = snapshot.board().count(Player::O);
        match snapshot.turn() {
            Player::X => x == o,
            Player::O => x == o + 1,
        }
    }

    fn description() -> &'static str {
        "Players alternate turns starting with X"
    }
}

//! Outcome invariant: a finished game is backed by the board.

use super::Invariant;
use crate::Snapshot;
use crate::rules::{find_winner, is_draw};
use crate::types::Outcome;

/// Invariant: the outcome agrees with the board.
///
/// `Won(p)` needs a complete line of `p`. `Draw` needs a full board with
/// no line. `InProgress` needs neither a line nor a full board.
pub struct OutcomeConsistent;

impl Invariant<Snapshot> for OutcomeConsistent {
    fn holds(snapshot: &Snapshot) -> bool {
        let winner = find_winner(snapshot.board());
        match snapshot.outcome() {
            Outcome::Won(player) => winner == Some(player),
            Outcome::Draw => winner.is_none() && is_draw(snapshot.board()),
            Outcome::InProgress => winner.is_none() && !is_draw(snapshot.board()),
        }
    }

    fn description() -> &'static str {
        "Outcome matches the board (winning line for Won, full board for Draw)"
    }
}

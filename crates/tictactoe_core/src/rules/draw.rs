//! Draw detection logic for tic-tac-toe.

use crate::types::{Board, Square};
use tracing::instrument;

/// Checks if every square is occupied.
///
/// This does not look for a winning line. A full board that also holds a
/// line still returns `true`, so callers check [`find_winner`] first.
///
/// [`find_winner`]: super::find_winner
#[instrument(skip(board))]
pub fn is_draw(board: &Board) -> bool {
    board.squares().iter().all(|s| *s != Square::Empty)
}

//! Game rules for tic-tac-toe.
//!
//! Pure functions over a board snapshot. Neither function mutates its
//! input, and `is_draw` is only meaningful after `find_winner` has come
//! back empty.

pub mod draw;
pub mod win;

pub use draw::is_draw;
pub use win::{WINNING_COMBINATIONS, find_winner};

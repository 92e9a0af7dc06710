//! Tic-tac-toe rules and a persistent game controller.
//!
//! # Architecture
//!
//! - **Rules**: pure win and draw detection over a 9-square board
//! - **Controller**: owns board, turn and outcome; applies moves
//! - **Persistence**: key-value store trait with memory and file backends
//! - **Notification**: fire-and-forget celebration hook on a win
//!
//! # Example
//!
//! ```
//! use tictactoe_core::{GameController, GameStorage, MemoryStore, Outcome, Player};
//!
//! let mut wins = 0;
//! let mut game = GameController::new(GameStorage::new(MemoryStore::new()), || wins += 1);
//! for index in [0, 3, 1, 4, 2] {
//!     game.apply_move(index);
//! }
//! assert_eq!(game.outcome(), Outcome::Won(Player::X));
//! assert!(!game.apply_move(8).is_applied());
//! # drop(game);
//! assert_eq!(wins, 1);
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod controller;
mod error;
mod notify;
mod persistence;
mod position;
mod types;

pub mod invariants;
pub mod rules;

pub use config::{GameConfig, RestorePolicy};
pub use controller::{GameController, MoveResult, Rejection};
pub use error::{ConfigError, StorageError};
pub use notify::{Notifier, Silent};
pub use persistence::{FileStore, GameStorage, KeyValueStore, MemoryStore};
pub use position::Position;
pub use rules::{WINNING_COMBINATIONS, find_winner, is_draw};
pub use types::{Board, Outcome, Player, Snapshot, Square};

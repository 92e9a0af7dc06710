//! Game state controller.
//!
//! [`GameController`] is the single owner of the board, the turn and the
//! outcome. Each accepted move is persisted, evaluated, and celebrated on a
//! win. Rejected moves leave everything untouched.

use crate::config::RestorePolicy;
use crate::invariants::{GameInvariants, InvariantSet};
use crate::notify::Notifier;
use crate::persistence::{GameStorage, KeyValueStore};
use crate::position::Position;
use crate::rules::{find_winner, is_draw};
use crate::types::{Board, Outcome, Player, Snapshot, Square};
use tracing::{debug, info, instrument, warn};

/// Why a move was ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum Rejection {
    /// The game has already been won or drawn.
    #[display("Game is already over")]
    GameOver,

    /// The square already holds a mark.
    #[display("{} is already occupied", _0)]
    Occupied(Position),

    /// The index is not a board cell.
    #[display("Cell {} is off the board", _0)]
    OutOfRange(usize),
}

/// Result of a move request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveResult {
    /// The mark was placed; carries the outcome after the move.
    Applied(Outcome),
    /// Nothing changed.
    Ignored(Rejection),
}

impl MoveResult {
    /// Returns true if the move changed the game.
    pub fn is_applied(self) -> bool {
        matches!(self, MoveResult::Applied(_))
    }
}

/// Owns and mutates the game in progress.
#[derive(Debug)]
pub struct GameController<S, N> {
    board: Board,
    turn: Player,
    outcome: Outcome,
    storage: GameStorage<S>,
    notifier: N,
}

impl<S: KeyValueStore, N: Notifier> GameController<S, N> {
    /// Starts a fresh game without reading storage.
    pub fn new(storage: GameStorage<S>, notifier: N) -> Self {
        Self {
            board: Board::new(),
            turn: Player::X,
            outcome: Outcome::InProgress,
            storage,
            notifier,
        }
    }

    /// Builds the initial game from whatever `storage` holds.
    ///
    /// A saved board is used as-is and a saved turn is honored; missing or
    /// unreadable entries fall back to an empty board and X to move. The
    /// outcome follows `policy`. A restored win is never celebrated again.
    #[instrument(skip(storage, notifier))]
    pub fn restore(storage: GameStorage<S>, notifier: N, policy: RestorePolicy) -> Self {
        let (board, turn) = storage.load().unwrap_or_else(|e| {
            warn!(error = %e, "Could not read saved game, starting fresh");
            (None, None)
        });
        let restored = board.is_some();
        let board = board.unwrap_or_default();
        let turn = turn.unwrap_or(Player::X);

        let outcome = match policy {
            RestorePolicy::Recompute => evaluate(&board),
            RestorePolicy::AssumeInProgress => Outcome::InProgress,
        };

        info!(restored, %turn, %outcome, "Game restored");
        Self {
            board,
            turn,
            outcome,
            storage,
            notifier,
        }
    }

    /// Places the current player's mark at `index` (0-8, row-major).
    ///
    /// Ignored without side effects when the game is over, the square is
    /// taken, or the index is off the board. Otherwise the turn flips, the
    /// new state is saved, and the outcome is re-evaluated.
    #[instrument(skip(self), fields(turn = %self.turn))]
    pub fn apply_move(&mut self, index: usize) -> MoveResult {
        if self.outcome.is_over() {
            return MoveResult::Ignored(Rejection::GameOver);
        }
        let Some(pos) = Position::from_index(index) else {
            return MoveResult::Ignored(Rejection::OutOfRange(index));
        };
        if !self.board.is_empty(pos) {
            return MoveResult::Ignored(Rejection::Occupied(pos));
        }

        let player = self.turn;
        self.board.set(pos, Square::Occupied(player));
        self.turn = player.opponent();
        debug!(%player, position = %pos, "Mark placed");

        if let Err(e) = self.storage.save(&self.board, self.turn) {
            warn!(error = %e, "Failed to save game, continuing in memory");
        }

        self.outcome = evaluate(&self.board);
        match self.outcome {
            Outcome::Won(winner) => {
                info!(%winner, "Game won");
                self.notifier.celebrate();
            }
            Outcome::Draw => info!("Game drawn"),
            Outcome::InProgress => {}
        }

        if cfg!(debug_assertions)
            && let Err(violations) = GameInvariants::check_all(&self.snapshot())
        {
            for violation in &violations {
                warn!(%violation, "Invariant violated after move");
            }
        }

        MoveResult::Applied(self.outcome)
    }

    /// Empties the board, gives X the move and clears saved state.
    #[instrument(skip(self))]
    pub fn reset(&mut self) {
        self.board = Board::new();
        self.turn = Player::X;
        self.outcome = Outcome::InProgress;
        if let Err(e) = self.storage.clear() {
            warn!(error = %e, "Failed to clear saved game");
        }
        info!("Game reset");
    }

    /// Returns a copy of the current state.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::new(self.board.clone(), self.turn, self.outcome)
    }

    /// Returns the board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Returns the player to move next.
    pub fn turn(&self) -> Player {
        self.turn
    }

    /// Returns the outcome.
    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    /// Returns the storage collaborator.
    pub fn storage(&self) -> &GameStorage<S> {
        &self.storage
    }
}

/// Winner first, then a full board; the order matters because `is_draw`
/// does not look for lines.
fn evaluate(board: &Board) -> Outcome {
    if let Some(winner) = find_winner(board) {
        Outcome::Won(winner)
    } else if is_draw(board) {
        Outcome::Draw
    } else {
        Outcome::InProgress
    }
}

//! Core domain types for tic-tac-toe.

use crate::position::Position;
use serde::{Deserialize, Serialize};

/// A player's mark.
///
/// Displays and parses as the bare letter, which is also the token used
/// when the turn is written to storage.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
pub enum Player {
    /// Player X (goes first).
    X,
    /// Player O (goes second).
    O,
}

impl Player {
    /// Returns the opponent player.
    pub fn opponent(self) -> Self {
        match self {
            Player::X => Player::O,
            Player::O => Player::X,
        }
    }
}

/// A square on the tic-tac-toe board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Square {
    /// Empty square.
    Empty,
    /// Square occupied by a player.
    Occupied(Player),
}

impl Square {
    /// Returns the occupying player, if any.
    pub fn player(self) -> Option<Player> {
        match self {
            Square::Empty => None,
            Square::Occupied(player) => Some(player),
        }
    }
}

impl From<Option<Player>> for Square {
    fn from(mark: Option<Player>) -> Self {
        mark.map_or(Square::Empty, Square::Occupied)
    }
}

/// 3x3 tic-tac-toe board.
///
/// Serializes as an array of nine marks in row-major order, with `null`
/// for empty squares: `["X",null,null,null,"O",null,null,null,null]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "[Option<Player>; 9]", into = "[Option<Player>; 9]")]
pub struct Board {
    squares: [Square; 9],
}

impl Board {
    /// Creates a new empty board.
    pub fn new() -> Self {
        Self {
            squares: [Square::Empty; 9],
        }
    }

    /// Gets the square at the given position.
    pub fn get(&self, pos: Position) -> Square {
        self.squares[pos.to_index()]
    }

    /// Gets the square at a raw index, or `None` when the index is off the board.
    pub fn square(&self, index: usize) -> Option<Square> {
        self.squares.get(index).copied()
    }

    /// Sets the square at the given position.
    pub fn set(&mut self, pos: Position, square: Square) {
        self.squares[pos.to_index()] = square;
    }

    /// Checks if a square is empty.
    pub fn is_empty(&self, pos: Position) -> bool {
        self.get(pos) == Square::Empty
    }

    /// Returns all squares in row-major order.
    pub fn squares(&self) -> &[Square; 9] {
        &self.squares
    }

    /// Counts the squares held by `player`.
    pub fn count(&self, player: Player) -> usize {
        self.squares
            .iter()
            .filter(|s| **s == Square::Occupied(player))
            .count()
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl From<[Option<Player>; 9]> for Board {
    fn from(marks: [Option<Player>; 9]) -> Self {
        Self {
            squares: marks.map(Square::from),
        }
    }
}

impl From<Board> for [Option<Player>; 9] {
    fn from(board: Board) -> Self {
        board.squares.map(Square::player)
    }
}

impl std::fmt::Display for Board {
    /// Grid form; empty squares show their 1-based cell number.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in 0..3 {
            for col in 0..3 {
                let pos = row * 3 + col;
                match self.squares[pos] {
                    Square::Empty => write!(f, "{}", pos + 1)?,
                    Square::Occupied(player) => write!(f, "{}", player)?,
                }
                if col < 2 {
                    f.write_str("|")?;
                }
            }
            if row < 2 {
                f.write_str("\n-+-+-\n")?;
            }
        }
        Ok(())
    }
}

/// Resolved status of the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// Game is ongoing.
    InProgress,
    /// Game ended in a win.
    Won(Player),
    /// Game ended in a draw.
    Draw,
}

impl Outcome {
    /// Returns true once the game has been won or drawn.
    pub fn is_over(self) -> bool {
        self != Outcome::InProgress
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::InProgress => f.write_str("In progress"),
            Outcome::Won(player) => write!(f, "{} wins!", player),
            Outcome::Draw => f.write_str("Draw!"),
        }
    }
}

/// Read-only copy of the controller's state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    board: Board,
    turn: Player,
    outcome: Outcome,
}

impl Snapshot {
    /// Creates a snapshot from its parts.
    pub fn new(board: Board, turn: Player, outcome: Outcome) -> Self {
        Self {
            board,
            turn,
            outcome,
        }
    }

    /// Returns the board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Returns the player to move next.
    pub fn turn(&self) -> Player {
        self.turn
    }

    /// Returns the game outcome.
    pub fn outcome(&self) -> Outcome {
        self.outcome
    }
}

impl Default for Snapshot {
    fn default() -> Self {
        Self::new(Board::new(), Player::X, Outcome::InProgress)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_parses_and_displays_as_letter() {
        assert_eq!(Player::X.to_string(), "X");
        assert_eq!("O".parse::<Player>(), Ok(Player::O));
        assert!("Z".parse::<Player>().is_err());
    }

    #[test]
    fn test_board_serializes_as_marks() {
        let mut board = Board::new();
        board.set(Position::TopLeft, Square::Occupied(Player::X));
        board.set(Position::Center, Square::Occupied(Player::O));

        let json = serde_json::to_string(&board).unwrap();
        assert_eq!(json, r#"["X",null,null,null,"O",null,null,null,null]"#);
    }

    #[test]
    fn test_board_rejects_wrong_length() {
        let short = r#"["X",null,null]"#;
        assert!(serde_json::from_str::<Board>(short).is_err());

        let long = r#"[null,null,null,null,null,null,null,null,null,null]"#;
        assert!(serde_json::from_str::<Board>(long).is_err());
    }

    #[test]
    fn test_board_rejects_unknown_token() {
        let json = r#"["Q",null,null,null,null,null,null,null,null]"#;
        assert!(serde_json::from_str::<Board>(json).is_err());
    }

    #[test]
    fn test_board_display() {
        let mut board = Board::new();
        board.set(Position::TopLeft, Square::Occupied(Player::X));
        board.set(Position::BottomRight, Square::Occupied(Player::O));
        assert_eq!(board.to_string(), "X|2|3\n-+-+-\n4|5|6\n-+-+-\n7|8|O");
    }

    #[test]
    fn test_square_index_out_of_range() {
        let board = Board::new();
        assert_eq!(board.square(8), Some(Square::Empty));
        assert_eq!(board.square(9), None);
    }
}

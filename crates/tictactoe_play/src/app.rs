//! Application state for the terminal front end.

use std::cell::Cell;
use std::rc::Rc;

use tictactoe_core::{
    GameConfig, GameController, GameStorage, KeyValueStore, MoveResult, Notifier, Outcome,
    Position, Snapshot,
};
use tracing::{debug, instrument};

use crate::input::{Action, move_cursor};

/// Number of redraw ticks the win banner flashes for.
pub const CELEBRATION_FRAMES: u8 = 12;

/// Flashes the win banner for a few frames.
#[derive(Debug)]
pub struct Celebration {
    enabled: bool,
    frames: Rc<Cell<u8>>,
}

impl Notifier for Celebration {
    fn celebrate(&mut self) {
        if self.enabled {
            debug!("Starting celebration");
            self.frames.set(CELEBRATION_FRAMES);
        }
    }
}

/// Terminal application state.
pub struct App<S> {
    game: GameController<S, Celebration>,
    cursor: Position,
    message: Option<String>,
    frames: Rc<Cell<u8>>,
}

impl<S: KeyValueStore> App<S> {
    /// Restores the saved game from `storage`.
    #[instrument(skip_all)]
    pub fn new(storage: GameStorage<S>, config: &GameConfig) -> Self {
        let frames = Rc::new(Cell::new(0));
        let celebration = Celebration {
            enabled: *config.celebrate(),
            frames: Rc::clone(&frames),
        };
        Self {
            game: GameController::restore(storage, celebration, *config.restore_policy()),
            cursor: Position::Center,
            message: None,
            frames,
        }
    }

    /// Applies a key action. Returns false when the user asked to quit.
    pub fn handle(&mut self, action: Action) -> bool {
        match action {
            Action::Place(index) => self.place(index),
            Action::PlaceAtCursor => self.place(self.cursor.to_index()),
            Action::Cursor(key) => self.cursor = move_cursor(self.cursor, key),
            Action::Reset => {
                self.game.reset();
                self.frames.set(0);
                self.message = Some("New game".to_string());
            }
            Action::Quit => return false,
        }
        true
    }

    fn place(&mut self, index: usize) {
        if let Some(pos) = Position::from_index(index) {
            self.cursor = pos;
        }
        self.message = match self.game.apply_move(index) {
            MoveResult::Applied(_) => None,
            MoveResult::Ignored(reason) => Some(reason.to_string()),
        };
    }

    /// Advances the celebration by one frame.
    pub fn tick(&mut self) {
        let frames = self.frames.get();
        if frames > 0 {
            self.frames.set(frames - 1);
        }
    }

    /// Returns the game state to draw.
    pub fn snapshot(&self) -> Snapshot {
        self.game.snapshot()
    }

    /// Returns the outcome.
    pub fn outcome(&self) -> Outcome {
        self.game.outcome()
    }

    /// Returns the cursor position.
    pub fn cursor(&self) -> Position {
        self.cursor
    }

    /// Returns the last feedback line, if any.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Returns the remaining celebration frames.
    pub fn celebration_frames(&self) -> u8 {
        self.frames.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyCode;
    use tictactoe_core::{MemoryStore, Player};

    fn app(config: &GameConfig) -> App<MemoryStore> {
        App::new(GameStorage::new(MemoryStore::new()), config)
    }

    #[test]
    fn test_win_starts_celebration() {
        let mut app = app(&GameConfig::default());
        for index in [0, 3, 1, 4, 2] {
            assert!(app.handle(Action::Place(index)));
        }
        assert_eq!(app.outcome(), Outcome::Won(Player::X));
        assert_eq!(app.celebration_frames(), CELEBRATION_FRAMES);

        app.tick();
        assert_eq!(app.celebration_frames(), CELEBRATION_FRAMES - 1);
    }

    #[test]
    fn test_celebration_can_be_disabled() {
        let config = GameConfig::from_toml("celebrate = false").unwrap();
        let mut app = app(&config);
        for index in [0, 3, 1, 4, 2] {
            app.handle(Action::Place(index));
        }
        assert_eq!(app.outcome(), Outcome::Won(Player::X));
        assert_eq!(app.celebration_frames(), 0);
    }

    #[test]
    fn test_cursor_placement_and_feedback() {
        let mut app = app(&GameConfig::default());
        app.handle(Action::Cursor(KeyCode::Up));
        app.handle(Action::PlaceAtCursor);
        assert_eq!(
            app.snapshot().board().square(1),
            Some(tictactoe_core::Square::Occupied(Player::X))
        );

        app.handle(Action::Place(1));
        assert_eq!(app.message(), Some("Top-center is already occupied"));
        assert_eq!(app.snapshot().turn(), Player::O);
    }

    #[test]
    fn test_reset_and_quit() {
        let mut app = app(&GameConfig::default());
        app.handle(Action::Place(4));
        app.handle(Action::Reset);
        assert_eq!(app.snapshot(), Snapshot::default());
        assert!(!app.handle(Action::Quit));
    }
}

//! Tests for the game controller lifecycle.

use std::cell::Cell;
use std::rc::Rc;

use tictactoe_core::{
    Board, GameController, GameStorage, KeyValueStore, MemoryStore, MoveResult, Outcome, Player,
    Position, Rejection, RestorePolicy, Silent, Snapshot, Square,
};

/// Notifier that counts celebrations through a shared cell.
fn counter() -> (Rc<Cell<usize>>, impl FnMut()) {
    let count = Rc::new(Cell::new(0));
    let handle = Rc::clone(&count);
    (count, move || handle.set(handle.get() + 1))
}

/// Store that counts writes and removals.
#[derive(Default)]
struct CountingStore {
    inner: MemoryStore,
    writes: usize,
}

impl KeyValueStore for CountingStore {
    fn get(&self, key: &str) -> Result<Option<String>, tictactoe_core::StorageError> {
        self.inner.get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), tictactoe_core::StorageError> {
        self.writes += 1;
        self.inner.set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<(), tictactoe_core::StorageError> {
        self.writes += 1;
        self.inner.remove(key)
    }
}

fn board_of(marks: [Option<Player>; 9]) -> Board {
    Board::from(marks)
}

#[test]
fn test_top_row_win() {
    let (wins, notifier) = counter();
    let mut game = GameController::new(GameStorage::new(MemoryStore::new()), notifier);

    for index in [0, 3, 1, 4] {
        assert_eq!(game.apply_move(index), MoveResult::Applied(Outcome::InProgress));
    }
    assert_eq!(game.apply_move(2), MoveResult::Applied(Outcome::Won(Player::X)));

    use Player::{O, X};
    assert_eq!(
        game.board(),
        &board_of([Some(X), Some(X), Some(X), Some(O), Some(O), None, None, None, None])
    );
    assert_eq!(game.outcome(), Outcome::Won(X));
    assert_eq!(wins.get(), 1);
}

#[test]
fn test_draw() {
    let (wins, notifier) = counter();
    let mut game = GameController::new(GameStorage::new(MemoryStore::new()), notifier);

    for index in [0, 1, 2, 4, 3, 5, 7, 6] {
        assert_eq!(game.apply_move(index), MoveResult::Applied(Outcome::InProgress));
    }
    assert_eq!(game.apply_move(8), MoveResult::Applied(Outcome::Draw));

    assert!(game.board().squares().iter().all(|s| *s != Square::Empty));
    assert_eq!(wins.get(), 0);
}

#[test]
fn test_turn_alternates_from_x() {
    let mut game = GameController::new(GameStorage::new(MemoryStore::new()), Silent);
    let mut expected = Player::X;

    for index in [4, 0, 8, 2, 1, 7] {
        assert_eq!(game.turn(), expected);
        assert!(game.apply_move(index).is_applied());
        assert_eq!(game.board().square(index), Some(Square::Occupied(expected)));
        expected = expected.opponent();
    }
    assert_eq!(game.turn(), expected);
}

#[test]
fn test_occupied_move_is_a_no_op() {
    let (wins, notifier) = counter();
    let mut game = GameController::new(GameStorage::new(CountingStore::default()), notifier);
    game.apply_move(4);

    let before = game.snapshot();
    let writes = game.storage().store().writes;

    assert_eq!(
        game.apply_move(4),
        MoveResult::Ignored(Rejection::Occupied(Position::Center))
    );
    assert_eq!(game.snapshot(), before);
    assert_eq!(game.storage().store().writes, writes);
    assert_eq!(wins.get(), 0);
}

#[test]
fn test_finished_game_rejects_every_index() {
    let (wins, notifier) = counter();
    let mut game = GameController::new(GameStorage::new(CountingStore::default()), notifier);
    for index in [0, 3, 1, 4, 2] {
        game.apply_move(index);
    }

    let before = game.snapshot();
    let writes = game.storage().store().writes;

    for index in 0..9 {
        assert_eq!(game.apply_move(index), MoveResult::Ignored(Rejection::GameOver));
    }
    assert_eq!(game.snapshot(), before);
    assert_eq!(game.storage().store().writes, writes);
    assert_eq!(wins.get(), 1);
}

#[test]
fn test_accepted_move_is_saved() {
    let mut game = GameController::new(GameStorage::new(MemoryStore::new()), Silent);
    game.apply_move(0);

    let store = game.storage().store();
    assert_eq!(
        store.get("board").unwrap().as_deref(),
        Some(r#"["X",null,null,null,null,null,null,null,null]"#)
    );
    assert_eq!(store.get("turn").unwrap().as_deref(), Some("O"));
}

#[test]
fn test_reset_clears_everything() {
    let mut game = GameController::new(GameStorage::new(MemoryStore::new()), Silent);
    for index in [0, 3, 1, 4, 2] {
        game.apply_move(index);
    }

    game.reset();
    assert_eq!(game.snapshot(), Snapshot::default());
    assert_eq!(game.storage().load().unwrap(), (None, None));

    game.reset();
    assert_eq!(game.snapshot(), Snapshot::default());
    assert!(game.apply_move(0).is_applied());
}

#[test]
fn test_restore_after_reload() {
    let mut storage = GameStorage::new(MemoryStore::new());
    let mut board = Board::new();
    board.set(Position::TopLeft, Square::Occupied(Player::X));
    storage.save(&board, Player::O).unwrap();

    let game = GameController::restore(storage, Silent, RestorePolicy::Recompute);

    assert_eq!(game.snapshot(), Snapshot::new(board, Player::O, Outcome::InProgress));
}

#[test]
fn test_restore_from_empty_store() {
    let game = GameController::restore(
        GameStorage::new(MemoryStore::new()),
        Silent,
        RestorePolicy::Recompute,
    );
    assert_eq!(game.snapshot(), Snapshot::default());
}

#[test]
fn test_restore_with_board_only_defaults_turn() {
    let mut store = MemoryStore::new();
    store
        .set("board", r#"[null,null,null,null,"X",null,null,null,null]"#)
        .unwrap();

    let game = GameController::restore(GameStorage::new(store), Silent, RestorePolicy::Recompute);
    assert_eq!(game.board().get(Position::Center), Square::Occupied(Player::X));
    assert_eq!(game.turn(), Player::X);
}

#[test]
fn test_restore_malformed_board_starts_fresh() {
    let mut store = MemoryStore::new();
    store.set("board", "[\"X\",null]").unwrap();
    store.set("turn", "O").unwrap();

    let game = GameController::restore(GameStorage::new(store), Silent, RestorePolicy::Recompute);
    assert_eq!(game.board(), &Board::new());
    assert_eq!(game.turn(), Player::O);
}

fn won_storage() -> GameStorage<MemoryStore> {
    use Player::{O, X};
    let mut storage = GameStorage::new(MemoryStore::new());
    let board = board_of([Some(O), Some(O), Some(O), Some(X), Some(X), None, Some(X), None, None]);
    storage.save(&board, X).unwrap();
    storage
}

#[test]
fn test_restore_recomputes_win_without_celebrating() {
    let (wins, notifier) = counter();
    let mut game = GameController::restore(won_storage(), notifier, RestorePolicy::Recompute);

    assert_eq!(game.outcome(), Outcome::Won(Player::O));
    assert_eq!(game.apply_move(8), MoveResult::Ignored(Rejection::GameOver));
    assert_eq!(wins.get(), 0);
}

#[test]
fn test_restore_assume_in_progress_keeps_playing_open_squares() {
    let (wins, notifier) = counter();
    let mut game =
        GameController::restore(won_storage(), notifier, RestorePolicy::AssumeInProgress);

    assert_eq!(game.outcome(), Outcome::InProgress);
    assert_eq!(game.apply_move(0), MoveResult::Ignored(Rejection::Occupied(Position::TopLeft)));
    // The next accepted move notices the existing line.
    assert_eq!(game.apply_move(8), MoveResult::Applied(Outcome::Won(Player::O)));
    assert_eq!(wins.get(), 1);
}

#[test]
fn test_restore_recomputes_draw() {
    use Player::{O, X};
    let mut storage = GameStorage::new(MemoryStore::new());
    let board = board_of([
        Some(X), Some(O), Some(X), Some(X), Some(O), Some(O), Some(O), Some(X), Some(X),
    ]);
    storage.save(&board, O).unwrap();

    let game = GameController::restore(storage, Silent, RestorePolicy::Recompute);
    assert_eq!(game.outcome(), Outcome::Draw);
}

//! Tic-tac-toe terminal front end.
//!
//! Renders the board, takes moves from the keyboard, and keeps the game in
//! a state file so it picks up where it left off.

#![warn(missing_docs)]

mod app;
mod cli;
mod input;
mod ui;

use std::fs::File;
use std::io;
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tictactoe_core::{FileStore, GameConfig, GameController, GameStorage, KeyValueStore, Silent};
use tracing::{info, instrument};
use tracing_subscriber::EnvFilter;

use app::App;
use cli::{Cli, Command};

fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(&cli)?;

    let config = load_config(&cli)?;
    let mut storage = GameStorage::with_keys(
        FileStore::new(config.storage_path()),
        config.board_key(),
        config.turn_key(),
    );
    info!(state_file = %config.storage_path().display(), "Using state file");

    match cli.command.unwrap_or(Command::Play) {
        Command::Play => run_play(storage, &config),
        Command::Show => run_show(storage, &config),
        Command::Reset => run_reset(&mut storage),
    }
}

/// Sends log output to a file so it does not draw over the board.
fn init_tracing(cli: &Cli) -> Result<()> {
    let log_file = File::create(&cli.log_file)
        .with_context(|| format!("Failed to open log file {}", cli.log_file.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(log_file))
        .with_ansi(false)
        .init();
    Ok(())
}

#[instrument(skip(cli))]
fn load_config(cli: &Cli) -> Result<GameConfig> {
    let config = match &cli.config {
        Some(path) => GameConfig::from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => GameConfig::default(),
    };
    Ok(match &cli.state_file {
        Some(path) => config.with_storage_path(path),
        None => config,
    })
}

/// Prints the saved game.
fn run_show(storage: GameStorage<FileStore>, config: &GameConfig) -> Result<()> {
    let game = GameController::restore(storage, Silent, *config.restore_policy());
    println!("{}\n", game.board());
    if game.outcome().is_over() {
        println!("{}", game.outcome());
    } else {
        println!("{} to move", game.turn());
    }
    Ok(())
}

/// Clears the saved game. Reports success only once both entries are gone.
fn run_reset<S: KeyValueStore>(storage: &mut GameStorage<S>) -> Result<()> {
    storage.clear().context("Failed to clear saved game")?;
    info!("Saved game cleared");
    println!("Saved game cleared");
    Ok(())
}

/// Runs the full-screen game until the user quits.
fn run_play(storage: GameStorage<FileStore>, config: &GameConfig) -> Result<()> {
    info!("Starting terminal game");
    let app = App::new(storage, config);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    mut app: App<FileStore>,
) -> Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, &app))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()?
                && key.kind == KeyEventKind::Press
                && let Some(action) = input::action_for(key.code)
                && !app.handle(action)
            {
                info!("Quitting");
                return Ok(());
            }
        } else {
            app.tick();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tictactoe_core::{Board, MemoryStore, Player, StorageError};

    /// Store that reads fine but refuses every change.
    struct ReadOnlyStore;

    impl KeyValueStore for ReadOnlyStore {
        fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Ok(Some("X".to_string()))
        }

        fn set(&mut self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::new("read-only"))
        }

        fn remove(&mut self, _key: &str) -> Result<(), StorageError> {
            Err(StorageError::new("read-only"))
        }
    }

    #[test]
    fn test_reset_fails_when_store_refuses() {
        let mut storage = GameStorage::new(ReadOnlyStore);
        let err = run_reset(&mut storage).unwrap_err();
        assert_eq!(err.to_string(), "Failed to clear saved game");
    }

    #[test]
    fn test_reset_clears_saved_game() {
        let mut storage = GameStorage::new(MemoryStore::new());
        storage.save(&Board::new(), Player::O).unwrap();

        run_reset(&mut storage).unwrap();

        assert_eq!(storage.load().unwrap(), (None, None));
    }
}

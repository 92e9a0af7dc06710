//! Command-line interface for the tic-tac-toe terminal.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Two-player tic-tac-toe that remembers the game between runs
#[derive(Parser, Debug)]
#[command(name = "tictactoe")]
#[command(about = "Two-player tic-tac-toe in the terminal", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run (defaults to play)
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Path to a TOML config file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// State file to use instead of the configured one
    #[arg(long, global = true)]
    pub state_file: Option<PathBuf>,

    /// File that receives log output
    #[arg(long, global = true, default_value = "tictactoe.log")]
    pub log_file: PathBuf,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Play in a full-screen board
    Play,

    /// Print the saved game and exit
    Show,

    /// Clear the saved game and exit
    Reset,
}

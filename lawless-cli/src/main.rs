//! Loyal and the Lawless CLI
//!
//! Commands:
//! - play: Run a game session in the terminal
//! - board: Print board geometry (with terrain) as JSON
//! - roster: List characters, optionally by alignment

mod board_cmd;
mod play;
mod roster_cmd;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "lawless")]
#[command(about = "Loyal and the Lawless - hex tactics")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a game session (input tokens on stdin or from --script)
    Play(play::PlayArgs),
    /// Print board geometry as JSON
    Board(board_cmd::BoardArgs),
    /// List roster entries
    Roster(roster_cmd::RosterArgs),
}

fn main() -> anyhow::Result<()> {
    // Logs go to stderr; stdout is the render surface
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Play(args) => play::run(args),
        Commands::Board(args) => board_cmd::run(args),
        Commands::Roster(args) => roster_cmd::run(args),
    }
}

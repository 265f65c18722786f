//! Terminal chess front end.
//!
//! Two players share the keyboard and enter moves in algebraic notation.
//! Games can be saved to and resumed from PGN movetext files.

mod ui;

use anyhow::Context;
use chess_rules::{pgn, Game};
use clap::Parser;
use std::fs;
use std::path::PathBuf;

/// Play chess in the terminal.
#[derive(Parser)]
#[command(name = "chess-cli")]
#[command(about = "Two-player chess with PGN save and load")]
struct Args {
    /// PGN movetext file to resume from
    #[arg(long)]
    load: Option<PathBuf>,

    /// Label the board with rank numbers and file letters
    #[arg(long)]
    hints: bool,

    /// Preserve terminal scrollback when redrawing
    #[arg(long)]
    scroll: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let game = match &args.load {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            let game = pgn::import(&text)
                .with_context(|| format!("failed to replay {}", path.display()))?;
            tracing::info!("Resumed {} moves from {:?}", game.moves().len(), path);
            game
        }
        None => Game::new(),
    };

    ui::Session::new(game, args.hints, args.scroll).run()
}

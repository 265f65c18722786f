//! The interactive turn loop and board rendering.

use anyhow::Result;
use chess_core::{Board, Color, Square};
use chess_rules::{pgn, Game};
use std::fs;
use std::io::{self, Write};

/// One sitting at the terminal: the game plus display preferences.
pub struct Session {
    game: Game,
    hints: bool,
    scroll: bool,
}

impl Session {
    pub fn new(game: Game, hints: bool, scroll: bool) -> Self {
        Session {
            game,
            hints,
            scroll,
        }
    }

    /// Runs the game to its end: a decisive result, an automatic or
    /// claimed draw, a resignation, or `quit`.
    pub fn run(mut self) -> Result<()> {
        loop {
            self.redraw();
            let player = to_move(&self.game);

            if self.game.checkmate(player) {
                println!("Checkmate! {} wins.", player.opposite());
                return Ok(());
            }
            if self.game.under_check(player) {
                println!("Check!");
            }
            if !self.game.has_moves(player) {
                println!("Stalemate.");
                return Ok(());
            }
            if self.game.dead_position() {
                println!("Draw. Dead position.");
                return Ok(());
            }
            if self.game.moves_since_capture_or_pawn_move() >= 75 {
                println!("Draw. 75 moves passed since last capture or pawn move.");
                return Ok(());
            }
            if self.game.nfold_repetition(5) {
                println!("Draw. Fivefold repetition.");
                return Ok(());
            }

            loop {
                let input = prompt(&format!("{player}'s move: "))?;
                match command(&input) {
                    Some(Command::Resign) => {
                        println!("{player} resigns.");
                        return Ok(());
                    }
                    Some(Command::Quit) => return Ok(()),
                    Some(Command::Draw) => {
                        if self.offer_draw(player)? {
                            return Ok(());
                        }
                        break;
                    }
                    Some(Command::Save(Some(path))) => {
                        self.save(&path)?;
                        continue;
                    }
                    Some(Command::Save(None)) => {
                        println!("Usage: save <file>");
                        continue;
                    }
                    None => {}
                }

                match self.game.make_move(&input, player) {
                    Ok(()) => break,
                    Err(error) => {
                        self.redraw();
                        println!("{error}");
                    }
                }
            }
        }
    }

    /// The draw command: an immediate claim when a threshold is already
    /// met, otherwise the player moves first and the claim is re-checked;
    /// failing that the opponent may still agree. Returns whether the
    /// game ended in a draw.
    fn offer_draw(&mut self, player: Color) -> Result<bool> {
        if self.announce_claimable() {
            return Ok(true);
        }

        println!("Make your move to claim/offer a draw");
        loop {
            let input = prompt(&format!("{player}'s move: "))?;
            match self.game.make_move(&input, player) {
                Ok(()) => break,
                Err(error) => {
                    self.redraw();
                    println!("{error}");
                }
            }
        }

        self.redraw();
        if self.announce_claimable() {
            return Ok(true);
        }

        let answer = prompt(&format!(
            "({}) Type in 'draw' to agree to the offered draw: ",
            player.opposite()
        ))?;
        if answer.eq_ignore_ascii_case("draw") {
            println!("Draw by agreement");
            return Ok(true);
        }
        Ok(false)
    }

    /// Prints and returns whether a draw can be claimed unilaterally.
    fn announce_claimable(&self) -> bool {
        if self.game.moves_since_capture_or_pawn_move() >= 50 {
            println!("Draw. 50 or more moves passed since last capture or pawn move.");
            true
        } else if self.game.nfold_repetition(3) {
            println!("Draw. Threefold repetition.");
            true
        } else {
            false
        }
    }

    fn save(&self, path: &str) -> Result<()> {
        let movetext = pgn::export(&self.game);
        fs::write(path, movetext + "\n")?;
        tracing::info!("Saved game to {path}");
        println!("Saved to {path}");
        Ok(())
    }

    fn redraw(&self) {
        // 2J clears the screen, 3J drops the scrollback, H homes the cursor.
        if self.scroll {
            print!("\x1b[2J\x1b[H");
        } else {
            print!("\x1b[2J\x1b[3J\x1b[H");
        }
        println!("{}", render_board(self.game.board(), self.hints));
        println!();
    }
}

/// The non-move inputs the turn loop understands. Anything else is
/// handed to the move parser.
#[derive(Debug, PartialEq, Eq)]
enum Command {
    Resign,
    Quit,
    Draw,
    Save(Option<String>),
}

fn command(input: &str) -> Option<Command> {
    match input {
        "resign" => Some(Command::Resign),
        "quit" => Some(Command::Quit),
        "draw" => Some(Command::Draw),
        "save" => Some(Command::Save(None)),
        _ => input
            .strip_prefix("save ")
            .map(|path| Command::Save(Some(path.trim().to_string()))),
    }
}

/// Whose turn it is, derived from the recorded history.
fn to_move(game: &Game) -> Color {
    match game.moves().last() {
        Some(pair) if pair.black.is_none() => Color::Black,
        _ => Color::White,
    }
}

/// Renders the board from White's side on a checkered ANSI background.
fn render_board(board: &Board, hints: bool) -> String {
    let mut out = String::new();
    for rank in (0..8u8).rev() {
        if hints {
            out.push_str(&format!("{} ", rank + 1));
        }
        out.push_str("\x1b[30m");
        for file in 0..8u8 {
            let light = (rank + file) % 2 == 1;
            out.push_str(if light { "\x1b[47m" } else { "\x1b[48;5;35m" });
            let square = Square::new(rank, file).expect("indices in range");
            match board.piece_at(square) {
                Some(piece) => out.push(piece.symbol()),
                None => out.push(' '),
            }
            out.push(' ');
        }
        out.push_str("\x1b[0m");
        if rank > 0 {
            out.push('\n');
        }
    }
    if hints {
        out.push_str("\n  a b c d e f g h");
    }
    out
}

fn prompt(text: &str) -> Result<String> {
    print!("{text}");
    io::stdout().flush()?;

    let mut line = String::new();
    if io::stdin().read_line(&mut line)? == 0 {
        // Stdin closed; treat it as quitting.
        return Ok("quit".to_string());
    }
    Ok(line.trim().to_string())
}

//! PGN movetext import and export.
//!
//! Only the movetext body is understood. Tag-pair header lines,
//! `{comments}`, `(variations)`, and the result token are discarded on
//! import; export produces the bare dotted movetext without them.

use crate::game::{Game, MoveError};
use chess_core::Color;
use thiserror::Error;

/// Errors produced while reconstructing a game from movetext.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PgnError {
    /// A half-move was rejected during replay. Reconstruction is atomic:
    /// no partially replayed game is ever returned.
    #[error("incompatible notation at move {number} ({half}): {source}")]
    IncompatibleNotation {
        number: usize,
        half: String,
        source: MoveError,
    },
}

/// Reconstructs a game by replaying the given movetext from the standard
/// starting position.
pub fn import(text: &str) -> Result<Game, PgnError> {
    replay(&half_moves(text))
}

/// Renders the game's history as movetext: `1. e4 e5 2. Nf3 ...` with
/// castles written as `O-O`/`O-O-O` and promotions with a reinserted `=`.
///
/// A history that starts with a black move (possible only in games set up
/// from a custom position) exports its `...` placeholder verbatim;
/// [`import`] skips the placeholder but always replays from the standard
/// starting position, so such games do not round-trip.
pub fn export(game: &Game) -> String {
    game.moves()
        .iter()
        .enumerate()
        .map(|(index, pair)| {
            let white = pgn_half(&pair.white);
            match &pair.black {
                Some(black) => format!("{}. {} {}", index + 1, white, pgn_half(black)),
                None => format!("{}. {}", index + 1, white),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Extracts the half-move tokens from a movetext body.
fn half_moves(text: &str) -> Vec<String> {
    let without_tags: Vec<&str> = text
        .lines()
        .filter(|line| !line.trim_start().starts_with('['))
        .collect();
    let cleaned = erase_balanced(&without_tags.join("\n"), '{', '}');
    let cleaned = erase_balanced(&cleaned, '(', ')');

    let mut halves: Vec<String> = Vec::new();
    for raw in cleaned.split_whitespace() {
        if is_result_token(raw) {
            continue;
        }
        let token = strip_move_number(raw);
        if token.is_empty() || token == "..." {
            continue;
        }
        // A detached en passant annotation belongs to the previous half.
        if token == "e.p." {
            if let Some(previous) = halves.last_mut() {
                previous.push_str(" e.p.");
            }
            continue;
        }
        halves.push(normalize_half(token));
    }
    halves
}

/// Erases `open`..`close` spans, tracking start offsets on a stack so
/// nesting works and only balanced ranges are removed; stray unmatched
/// delimiters are left in place.
fn erase_balanced(text: &str, open: char, close: char) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut keep = vec![true; chars.len()];
    let mut starts: Vec<usize> = Vec::new();

    for (index, &c) in chars.iter().enumerate() {
        if c == open {
            starts.push(index);
        } else if c == close {
            if let Some(start) = starts.pop() {
                for flag in &mut keep[start..=index] {
                    *flag = false;
                }
            }
        }
    }

    chars
        .iter()
        .zip(&keep)
        .filter_map(|(&c, &kept)| kept.then_some(c))
        .collect()
}

fn is_result_token(token: &str) -> bool {
    matches!(token, "1-0" | "0-1" | "1/2-1/2" | "*")
}

/// Drops a leading `<digits>.` move-number marker (including the `...`
/// continuation form), leaving any attached half-move in place.
fn strip_move_number(token: &str) -> &str {
    let digits = token.len() - token.trim_start_matches(|c: char| c.is_ascii_digit()).len();
    if digits == 0 || !token[digits..].starts_with('.') {
        return token;
    }
    token[digits..].trim_start_matches('.')
}

/// Translates a PGN half-move into the engine's internal notation:
/// castle letters become zeros and the promotion `=` is dropped.
fn normalize_half(token: &str) -> String {
    if token.starts_with("O-O") {
        return token.replace('O', "0");
    }
    token.replace('=', "")
}

fn pgn_half(half: &str) -> String {
    if half.starts_with("0-0") {
        return half.replace('0', "O");
    }

    let core_end = half.find(['+', '#']).unwrap_or(half.len());
    let (core, suffix) = half.split_at(core_end);
    let bytes = core.as_bytes();
    if bytes.len() >= 3 {
        let last = bytes[bytes.len() - 1] as char;
        let is_promotion = matches!(last, 'Q' | 'R' | 'B' | 'N')
            && bytes[bytes.len() - 2].is_ascii_digit()
            && bytes[bytes.len() - 3].is_ascii_lowercase();
        if is_promotion {
            return format!("{}={}{}", &core[..core.len() - 1], last, suffix);
        }
    }
    half.to_string()
}

fn replay(halves: &[String]) -> Result<Game, PgnError> {
    let mut game = Game::new();
    let mut color = Color::White;
    for (index, half) in halves.iter().enumerate() {
        game.make_move(half, color)
            .map_err(|source| PgnError::IncompatibleNotation {
                number: index / 2 + 1,
                half: half.clone(),
                source,
            })?;
        color = color.opposite();
    }
    Ok(game)
}

//! Algebraic-notation parsing.
//!
//! A single move token is interpreted into a [`MoveIntent`]: the shape of
//! the move, before any board state is consulted. Resolution against the
//! actual position (which piece, whether the move is legal) happens in
//! [`crate::Game`].
//!
//! Dispatch order, first match wins: castles, promotion shape, pawn
//! shapes, piece-letter moves, otherwise invalid. A trailing `+`/`#` or
//! `e.p.` annotation is accepted on input but ignored; the game layer
//! recomputes both when it records the move.

use chess_core::{Color, PieceKind, Square};
use thiserror::Error;

/// Errors produced while interpreting a move token.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NotationError {
    #[error("invalid move: {0}")]
    InvalidMove(String),

    #[error("promotion must specify the new piece, e.g. {0}=Q")]
    MissingPromotionPiece(String),
}

/// The interpreted shape of a move token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveIntent {
    CastleKingside,
    CastleQueenside,
    /// A pawn reaching the mover's promotion rank.
    Promotion {
        from_file: Option<u8>,
        to: Square,
        piece: PieceKind,
    },
    /// A bare destination (`e4`) or a file-qualified capture (`exd5`).
    PawnMove {
        from_file: Option<u8>,
        to: Square,
    },
    /// A piece-letter move with up to two characters of disambiguation.
    PieceMove {
        kind: PieceKind,
        from_file: Option<u8>,
        from_rank: Option<u8>,
        to: Square,
    },
}

/// Interprets a single move token for the given mover.
///
/// The mover's color is needed to recognise promotion shapes, whose
/// destination must sit on that color's promotion rank.
pub fn parse_move(token: &str, mover: Color) -> Result<MoveIntent, NotationError> {
    let trimmed = token.trim();
    let stripped = strip_annotations(trimmed);
    let invalid = || NotationError::InvalidMove(trimmed.to_string());

    match stripped {
        "" => return Err(invalid()),
        "0-0" | "O-O" => return Ok(MoveIntent::CastleKingside),
        "0-0-0" | "O-O-O" => return Ok(MoveIntent::CastleQueenside),
        _ => {}
    }

    if let Some(intent) = parse_promotion(stripped, mover)? {
        return Ok(intent);
    }
    if let Some(intent) = parse_pawn_move(stripped) {
        return Ok(intent);
    }
    if let Some(intent) = parse_piece_move(stripped)? {
        return Ok(intent);
    }
    Err(invalid())
}

/// Drops a trailing check/mate marker and an `e.p.` annotation.
fn strip_annotations(token: &str) -> &str {
    let token = token
        .trim_end_matches("e.p.")
        .trim_end()
        .trim_end_matches(['+', '#']);
    token.trim_end()
}

fn file_index(c: char) -> Option<u8> {
    match c {
        'a'..='h' => Some(c as u8 - b'a'),
        _ => None,
    }
}

fn rank_index(c: char) -> Option<u8> {
    match c {
        '1'..='8' => Some(c as u8 - b'1'),
        _ => None,
    }
}

/// Promotion shape: optional source file, optional `x`, a destination on
/// the mover's promotion rank, then the new piece's letter (an `=` right
/// before it is accepted and dropped). A matching shape with no piece
/// letter is the "specify a promotion piece" error rather than a fall
/// through, so the caller can guide the user instead of rejecting.
fn parse_promotion(token: &str, mover: Color) -> Result<Option<MoveIntent>, NotationError> {
    let chars: Vec<char> = token.chars().collect();

    let (body, piece) = match chars.last().and_then(|&c| PieceKind::from_san_char(c)) {
        Some(kind) if kind.is_promotion_target() => (&chars[..chars.len() - 1], Some(kind)),
        _ => (&chars[..], None),
    };
    let body = match body.last() {
        Some('=') if piece.is_some() => &body[..body.len() - 1],
        _ => body,
    };

    if body.len() < 2 {
        return Ok(None);
    }
    let destination: String = body[body.len() - 2..].iter().collect();
    let to = match Square::from_notation(&destination) {
        Ok(square) => square,
        Err(_) => return Ok(None),
    };
    if to.rank() != mover.promotion_rank() {
        return Ok(None);
    }

    let from_file = match &body[..body.len() - 2] {
        [] | ['x'] => None,
        [file] | [file, 'x'] => match file_index(*file) {
            Some(index) => Some(index),
            None => return Ok(None),
        },
        _ => return Ok(None),
    };

    match piece {
        Some(piece) => Ok(Some(MoveIntent::Promotion {
            from_file,
            to,
            piece,
        })),
        None => Err(NotationError::MissingPromotionPiece(token.to_string())),
    }
}

/// Pawn shape: a bare two-character destination, or `<file>x<square>`.
fn parse_pawn_move(token: &str) -> Option<MoveIntent> {
    let chars: Vec<char> = token.chars().collect();

    match chars.as_slice() {
        [_, _] => Square::from_notation(token)
            .ok()
            .map(|to| MoveIntent::PawnMove {
                from_file: None,
                to,
            }),
        [file, 'x', d1, d2] => {
            let from_file = file_index(*file)?;
            let destination: String = [*d1, *d2].iter().collect();
            Square::from_notation(&destination)
                .ok()
                .map(|to| MoveIntent::PawnMove {
                    from_file: Some(from_file),
                    to,
                })
        }
        _ => None,
    }
}

/// Piece-letter shape: the kind, then (with any `x` removed) a
/// destination square preceded by 0-2 characters of disambiguation.
fn parse_piece_move(token: &str) -> Result<Option<MoveIntent>, NotationError> {
    let mut chars = token.chars();
    let kind = match chars.next().and_then(PieceKind::from_san_char) {
        Some(kind) => kind,
        None => return Ok(None),
    };

    let invalid = || NotationError::InvalidMove(token.to_string());
    let rest: Vec<char> = chars.filter(|&c| c != 'x').collect();
    if rest.len() < 2 {
        return Err(invalid());
    }

    let destination: String = rest[rest.len() - 2..].iter().collect();
    let to = Square::from_notation(&destination).map_err(|_| invalid())?;

    let (from_file, from_rank) = match &rest[..rest.len() - 2] {
        [] => (None, None),
        [c] => {
            if let Some(file) = file_index(*c) {
                (Some(file), None)
            } else if let Some(rank) = rank_index(*c) {
                (None, Some(rank))
            } else {
                return Err(invalid());
            }
        }
        [f, r] => match (file_index(*f), rank_index(*r)) {
            (Some(file), Some(rank)) => (Some(file), Some(rank)),
            _ => return Err(invalid()),
        },
        _ => return Err(invalid()),
    };

    Ok(Some(MoveIntent::PieceMove {
        kind,
        from_file,
        from_rank,
        to,
    }))
}

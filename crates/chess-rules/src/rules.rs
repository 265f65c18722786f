//! Check detection, the legality filter, and terminal-position queries.
//!
//! Legality is defined by simulation: a pseudo-legal move is legal iff
//! applying it on a cloned board leaves the mover's own king unattacked.
//! That single mechanism covers pins, discovered checks, and moving into
//! check, so it is kept as-is rather than replaced with an incremental
//! attack map.

use crate::movegen::{pseudo_legal_destinations, LastMove};
use chess_core::{Board, Color, PieceKind, Square};
use std::collections::HashSet;

/// True iff any opposing piece's pseudo-legal destinations include the
/// given color's king square.
///
/// Works on pseudo-legal sets on purpose: filtering them for legality
/// would recurse straight back into this function.
pub fn under_check(board: &Board, color: Color) -> bool {
    let king = board.king_square(color);
    board
        .pieces(color.opposite())
        .into_iter()
        .any(|(square, _)| pseudo_legal_destinations(board, square, None).contains(&king))
}

/// Applies a move without any legality checking: relocates the piece,
/// removes a directly captured piece, and removes an en-passant-captured
/// pawn from its actual square (beside the mover's origin, not the
/// destination). Shared by legality simulation and real application.
pub fn apply_unchecked(board: &mut Board, from: Square, to: Square) {
    let mut piece = board
        .take(from)
        .expect("applying a move from an empty square");

    // A pawn changing file onto an empty square is an en passant capture.
    if piece.kind == PieceKind::Pawn && from.file() != to.file() && board.piece_at(to).is_none() {
        let captured = Square::new(from.rank(), to.file()).expect("indices in range");
        board.set(captured, None);
    }

    piece.moved = true;
    board.set(to, Some(piece));
}

/// Returns the check-safe destinations for the piece on `from`: its
/// pseudo-legal destinations minus any that leave its own king in check,
/// determined by cloning the board and applying the candidate.
///
/// Castling destinations are not included; see [`crate::Game::legal_moves`].
pub fn legal_destinations(
    board: &Board,
    from: Square,
    last_move: Option<LastMove>,
) -> HashSet<Square> {
    let color = board
        .piece_at(from)
        .expect("legality check from an empty square")
        .color;

    pseudo_legal_destinations(board, from, last_move)
        .into_iter()
        .filter(|&to| {
            let mut simulated = board.clone();
            apply_unchecked(&mut simulated, from, to);
            !under_check(&simulated, color)
        })
        .collect()
}

/// True iff the color has at least one legal move.
pub fn has_moves(board: &Board, color: Color, last_move: Option<LastMove>) -> bool {
    // Castling can be ignored here: whenever castling is legal, the
    // king's plain step toward the rook is legal too.
    board
        .pieces(color)
        .into_iter()
        .any(|(square, _)| !legal_destinations(board, square, last_move).is_empty())
}

/// True iff the color is in check with no legal reply.
pub fn checkmate(board: &Board, color: Color, last_move: Option<LastMove>) -> bool {
    under_check(board, color) && !has_moves(board, color, last_move)
}

/// True iff the color is not in check but has no legal move.
pub fn stalemate(board: &Board, color: Color, last_move: Option<LastMove>) -> bool {
    !under_check(board, color) && !has_moves(board, color, last_move)
}

/// True for the common insufficient-material endings: king against king,
/// or king against king plus a single bishop or knight.
///
/// Deliberately partial; blocked-pawn fortresses and other theoretically
/// dead positions are not detected.
pub fn dead_position(board: &Board) -> bool {
    let white = non_king_material(board, Color::White);
    let black = non_king_material(board, Color::Black);

    match (white.as_slice(), black.as_slice()) {
        ([], []) => true,
        ([], [kind]) | ([kind], []) => {
            matches!(kind, PieceKind::Bishop | PieceKind::Knight)
        }
        _ => false,
    }
}

fn non_king_material(board: &Board, color: Color) -> Vec<PieceKind> {
    board
        .pieces(color)
        .into_iter()
        .map(|(_, piece)| piece.kind)
        .filter(|&kind| kind != PieceKind::King)
        .collect()
}

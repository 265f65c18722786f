//! Position snapshots for repetition detection.
//!
//! A snapshot is a comparable record of the position after a move: the
//! piece layout, the color that just moved, both sides' castling rights,
//! and both sides' en passant capture squares. Two positions repeat only
//! when all four agree, so a position where a castling or en passant
//! right has lapsed never compares equal to its earlier look-alike.

use crate::movegen::{en_passant_destinations, LastMove};
use chess_core::{Board, Color, PieceKind, Square};

/// One side's remaining castling options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CastlingRights {
    pub kingside: bool,
    pub queenside: bool,
}

/// Derives a color's castling rights from the board: the king and the
/// respective rook must still stand on their starting squares without
/// ever having moved.
pub fn castling_rights(board: &Board, color: Color) -> CastlingRights {
    let home = color.home_rank();
    let unmoved = |file: u8, kind: PieceKind| {
        let square = Square::new(home, file).expect("indices in range");
        matches!(
            board.piece_at(square),
            Some(piece) if piece.kind == kind && piece.color == color && !piece.moved
        )
    };

    let king = unmoved(4, PieceKind::King);
    CastlingRights {
        kingside: king && unmoved(7, PieceKind::Rook),
        queenside: king && unmoved(0, PieceKind::Rook),
    }
}

/// A comparable record of the position after a move.
///
/// The layout stores piece kind and color only; the `moved` flag is
/// represented through the castling-rights fields instead, so a rook
/// that returned to its corner still counts as the same layout while the
/// lost castling right keeps the snapshots distinct.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    layout: [[Option<(PieceKind, Color)>; 8]; 8],
    moved: Color,
    castling: [CastlingRights; 2],
    en_passant: [Vec<Square>; 2],
}

impl Snapshot {
    /// Captures the position after `moved` made the given last move.
    pub fn capture(board: &Board, moved: Color, last_move: Option<LastMove>) -> Self {
        let mut layout = [[None; 8]; 8];
        for color in [Color::White, Color::Black] {
            for (square, piece) in board.pieces(color) {
                layout[square.rank() as usize][square.file() as usize] =
                    Some((piece.kind, piece.color));
            }
        }

        Snapshot {
            layout,
            moved,
            castling: [
                castling_rights(board, Color::White),
                castling_rights(board, Color::Black),
            ],
            en_passant: [
                en_passant_squares(board, Color::White, last_move),
                en_passant_squares(board, Color::Black, last_move),
            ],
        }
    }
}

fn en_passant_squares(board: &Board, color: Color, last_move: Option<LastMove>) -> Vec<Square> {
    let mut squares: Vec<Square> = board
        .pieces(color)
        .into_iter()
        .filter(|(_, piece)| piece.kind == PieceKind::Pawn)
        .flat_map(|(square, _)| en_passant_destinations(board, square, last_move))
        .collect();
    squares.sort();
    squares
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_core::Piece;

    fn sq(notation: &str) -> Square {
        Square::from_notation(notation).unwrap()
    }

    #[test]
    fn starting_position_has_full_castling_rights() {
        let board = Board::starting();
        for color in [Color::White, Color::Black] {
            let rights = castling_rights(&board, color);
            assert!(rights.kingside);
            assert!(rights.queenside);
        }
    }

    #[test]
    fn moving_a_rook_drops_one_side() {
        let mut board = Board::starting();
        let mut rook = board.take(sq("h1")).unwrap();
        rook.moved = true;
        board.set(sq("h1"), Some(rook));

        let rights = castling_rights(&board, Color::White);
        assert!(!rights.kingside);
        assert!(rights.queenside);
    }

    #[test]
    fn moving_the_king_drops_both_sides() {
        let mut board = Board::starting();
        let mut king = board.take(sq("e1")).unwrap();
        king.moved = true;
        board.set(sq("e1"), Some(king));

        let rights = castling_rights(&board, Color::White);
        assert!(!rights.kingside);
        assert!(!rights.queenside);
    }

    #[test]
    fn identical_positions_compare_equal() {
        let board = Board::starting();
        let a = Snapshot::capture(&board, Color::Black, None);
        let b = Snapshot::capture(&board, Color::Black, None);
        assert_eq!(a, b);
    }

    #[test]
    fn mover_color_distinguishes_snapshots() {
        let board = Board::starting();
        let white_moved = Snapshot::capture(&board, Color::White, None);
        let black_moved = Snapshot::capture(&board, Color::Black, None);
        assert_ne!(white_moved, black_moved);
    }

    #[test]
    fn lapsed_castling_rights_distinguish_snapshots() {
        let board = Board::starting();
        let before = Snapshot::capture(&board, Color::Black, None);

        let mut after_board = board.clone();
        let mut rook = after_board.take(sq("a1")).unwrap();
        rook.moved = true;
        after_board.set(sq("a1"), Some(rook));
        let after = Snapshot::capture(&after_board, Color::Black, None);

        assert_ne!(before, after);
    }

    #[test]
    fn en_passant_availability_distinguishes_snapshots() {
        let mut board = Board::empty();
        board.set(sq("e1"), Some(Piece::new(PieceKind::King, Color::White)));
        board.set(sq("e8"), Some(Piece::new(PieceKind::King, Color::Black)));
        let mut white_pawn = Piece::new(PieceKind::Pawn, Color::White);
        white_pawn.moved = true;
        board.set(sq("e5"), Some(white_pawn));
        board.set(sq("d5"), Some(Piece::new(PieceKind::Pawn, Color::Black)));

        let double_step = LastMove {
            kind: PieceKind::Pawn,
            color: Color::Black,
            from: sq("d7"),
            to: sq("d5"),
        };
        let with_capture = Snapshot::capture(&board, Color::Black, Some(double_step));
        let without = Snapshot::capture(&board, Color::Black, None);
        assert_ne!(with_capture, without);
    }
}

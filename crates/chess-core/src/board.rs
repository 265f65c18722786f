//! The 8x8 board grid.

use crate::{Color, Piece, PieceKind, Square};
use std::fmt;

/// An 8x8 grid of optional pieces, rank-major with rank 0 as White's back
/// rank.
///
/// `Clone` deep-copies every piece, including its `moved` flag, so a
/// cloned board can be mutated for legality simulation without touching
/// the live game state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    squares: [[Option<Piece>; 8]; 8],
}

impl Board {
    /// Creates a board with no pieces. Useful for setting up test and
    /// analysis positions.
    pub const fn empty() -> Self {
        Board {
            squares: [[None; 8]; 8],
        }
    }

    /// Creates a board with the standard starting layout.
    pub fn starting() -> Self {
        const BACK_RANK: [PieceKind; 8] = [
            PieceKind::Rook,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Queen,
            PieceKind::King,
            PieceKind::Bishop,
            PieceKind::Knight,
            PieceKind::Rook,
        ];

        let mut board = Board::empty();
        for color in [Color::White, Color::Black] {
            for (file, &kind) in BACK_RANK.iter().enumerate() {
                board.squares[color.home_rank() as usize][file] = Some(Piece::new(kind, color));
            }
            for file in 0..8 {
                board.squares[color.pawn_rank() as usize][file] =
                    Some(Piece::new(PieceKind::Pawn, color));
            }
        }
        board
    }

    /// Returns the piece on the given square, if any.
    #[inline]
    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        self.squares[square.rank() as usize][square.file() as usize]
    }

    /// Places (or clears) a square.
    #[inline]
    pub fn set(&mut self, square: Square, piece: Option<Piece>) {
        self.squares[square.rank() as usize][square.file() as usize] = piece;
    }

    /// Removes and returns the piece on the given square.
    #[inline]
    pub fn take(&mut self, square: Square) -> Option<Piece> {
        self.squares[square.rank() as usize][square.file() as usize].take()
    }

    /// Returns every piece of the given color with its square.
    pub fn pieces(&self, color: Color) -> Vec<(Square, Piece)> {
        let mut found = Vec::new();
        for rank in 0..8u8 {
            for file in 0..8u8 {
                let square = Square::new(rank, file).expect("indices in range");
                if let Some(piece) = self.piece_at(square) {
                    if piece.color == color {
                        found.push((square, piece));
                    }
                }
            }
        }
        found
    }

    /// Returns the square of the given color's king.
    ///
    /// # Panics
    ///
    /// Panics if the board has no king of that color. The engine only
    /// operates on positions reachable from a legal setup, where both
    /// kings always exist.
    pub fn king_square(&self, color: Color) -> Square {
        self.pieces(color)
            .into_iter()
            .find(|(_, piece)| piece.kind == PieceKind::King)
            .map(|(square, _)| square)
            .expect("board has no king of the requested color")
    }
}

impl Default for Board {
    fn default() -> Self {
        Board::starting()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in (0..8u8).rev() {
            write!(f, "{} ", rank + 1)?;
            for file in 0..8u8 {
                let square = Square::new(rank, file).expect("indices in range");
                match self.piece_at(square) {
                    Some(piece) => write!(f, "{} ", piece.symbol())?,
                    None => write!(f, ". ")?,
                }
            }
            writeln!(f)?;
        }
        write!(f, "  a b c d e f g h")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(notation: &str) -> Square {
        Square::from_notation(notation).unwrap()
    }

    #[test]
    fn starting_layout() {
        let board = Board::starting();
        assert_eq!(
            board.piece_at(sq("e1")),
            Some(Piece::new(PieceKind::King, Color::White))
        );
        assert_eq!(
            board.piece_at(sq("d8")),
            Some(Piece::new(PieceKind::Queen, Color::Black))
        );
        assert_eq!(
            board.piece_at(sq("a2")),
            Some(Piece::new(PieceKind::Pawn, Color::White))
        );
        assert_eq!(board.piece_at(sq("e4")), None);
        assert_eq!(board.pieces(Color::White).len(), 16);
        assert_eq!(board.pieces(Color::Black).len(), 16);
    }

    #[test]
    fn set_and_take() {
        let mut board = Board::empty();
        let rook = Piece::new(PieceKind::Rook, Color::Black);
        board.set(sq("d5"), Some(rook));
        assert_eq!(board.piece_at(sq("d5")), Some(rook));
        assert_eq!(board.take(sq("d5")), Some(rook));
        assert_eq!(board.piece_at(sq("d5")), None);
    }

    #[test]
    fn king_square_finds_the_king() {
        let board = Board::starting();
        assert_eq!(board.king_square(Color::White), sq("e1"));
        assert_eq!(board.king_square(Color::Black), sq("e8"));
    }

    #[test]
    #[should_panic(expected = "no king")]
    fn king_square_panics_without_a_king() {
        Board::empty().king_square(Color::White);
    }

    #[test]
    fn clone_is_independent() {
        let board = Board::starting();
        let mut clone = board.clone();
        clone.take(sq("e2"));
        assert!(board.piece_at(sq("e2")).is_some());
        assert!(clone.piece_at(sq("e2")).is_none());
    }
}

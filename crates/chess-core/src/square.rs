//! Board square representation.
//!
//! A square is a (rank, file) pair, both indexed 0-7. Rank 0 is the row
//! printed as "1" and file 0 is the column printed as "a", so `a1` is
//! `(0, 0)` and `h8` is `(7, 7)`.

use std::fmt;
use thiserror::Error;

/// Errors produced when converting to or from square notation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SquareError {
    #[error("invalid notation for chessboard square: {0}")]
    InvalidNotation(String),

    #[error("invalid indices for chessboard square: ({0}, {1})")]
    InvalidIndices(i8, i8),
}

/// A square on the chess board.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Square {
    rank: u8,
    file: u8,
}

impl Square {
    /// Creates a square from rank and file indices, if both are in 0-7.
    #[inline]
    pub const fn new(rank: u8, file: u8) -> Option<Self> {
        if rank < 8 && file < 8 {
            Some(Square { rank, file })
        } else {
            None
        }
    }

    /// Creates a square from possibly-signed indices, reporting the
    /// offending pair on failure.
    pub fn from_indices(rank: i8, file: i8) -> Result<Self, SquareError> {
        u8::try_from(rank)
            .ok()
            .zip(u8::try_from(file).ok())
            .and_then(|(r, f)| Square::new(r, f))
            .ok_or(SquareError::InvalidIndices(rank, file))
    }

    /// Parses two-character algebraic notation such as `"e4"`.
    ///
    /// Wrong length, an unknown file letter, or an out-of-range rank digit
    /// is a recoverable [`SquareError`], never a panic.
    pub fn from_notation(notation: &str) -> Result<Self, SquareError> {
        let invalid = || SquareError::InvalidNotation(notation.to_string());

        let mut chars = notation.chars();
        let (file_char, rank_char) = match (chars.next(), chars.next(), chars.next()) {
            (Some(f), Some(r), None) => (f, r),
            _ => return Err(invalid()),
        };

        let file = match file_char.to_ascii_lowercase() {
            c @ 'a'..='h' => c as u8 - b'a',
            _ => return Err(invalid()),
        };
        let rank = match rank_char {
            c @ '1'..='8' => c as u8 - b'1',
            _ => return Err(invalid()),
        };

        Ok(Square { rank, file })
    }

    /// Returns the rank index (0-7).
    #[inline]
    pub const fn rank(self) -> u8 {
        self.rank
    }

    /// Returns the file index (0-7).
    #[inline]
    pub const fn file(self) -> u8 {
        self.file
    }

    /// Returns the square shifted by the given rank and file deltas, or
    /// `None` when the result falls off the board.
    #[inline]
    pub fn offset(self, rank_delta: i8, file_delta: i8) -> Option<Self> {
        Square::from_indices(self.rank as i8 + rank_delta, self.file as i8 + file_delta).ok()
    }

    /// Returns the file letter ('a'-'h').
    #[inline]
    pub const fn file_char(self) -> char {
        (b'a' + self.file) as char
    }

    /// Returns the rank digit ('1'-'8').
    #[inline]
    pub const fn rank_char(self) -> char {
        (b'1' + self.rank) as char
    }

    /// Returns the two-character algebraic notation.
    pub fn to_notation(self) -> String {
        format!("{}{}", self.file_char(), self.rank_char())
    }
}

impl fmt::Debug for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Square({}{})", self.file_char(), self.rank_char())
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.file_char(), self.rank_char())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn notation_to_square() {
        assert_eq!(Square::from_notation("a1").unwrap(), Square::new(0, 0).unwrap());
        assert_eq!(Square::from_notation("d5").unwrap(), Square::new(4, 3).unwrap());
        assert_eq!(Square::from_notation("h8").unwrap(), Square::new(7, 7).unwrap());
    }

    #[test]
    fn notation_rejects_bad_input() {
        for bad in ["de5", "t1", "e9", "3d", "", "e"] {
            assert_eq!(
                Square::from_notation(bad),
                Err(SquareError::InvalidNotation(bad.to_string()))
            );
        }
    }

    #[test]
    fn indices_rejects_out_of_range() {
        assert_eq!(
            Square::from_indices(8, 4),
            Err(SquareError::InvalidIndices(8, 4))
        );
        assert_eq!(
            Square::from_indices(0, -1),
            Err(SquareError::InvalidIndices(0, -1))
        );
    }

    #[test]
    fn square_to_notation() {
        assert_eq!(Square::new(0, 0).unwrap().to_notation(), "a1");
        assert_eq!(Square::new(4, 3).unwrap().to_notation(), "d5");
        assert_eq!(Square::new(7, 7).unwrap().to_notation(), "h8");
    }

    #[test]
    fn offset_stays_on_board() {
        let e4 = Square::from_notation("e4").unwrap();
        assert_eq!(e4.offset(1, 0), Some(Square::from_notation("e5").unwrap()));
        assert_eq!(e4.offset(-3, -4), Some(Square::from_notation("a1").unwrap()));
        assert_eq!(e4.offset(5, 0), None);
        assert_eq!(e4.offset(0, -5), None);
    }

    proptest! {
        #[test]
        fn notation_round_trips(rank in 0u8..8, file in 0u8..8) {
            let square = Square::new(rank, file).unwrap();
            let back = Square::from_notation(&square.to_notation()).unwrap();
            prop_assert_eq!(square, back);
        }
    }
}

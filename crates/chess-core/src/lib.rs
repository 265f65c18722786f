//! Core types for chess.
//!
//! This crate provides the fundamental types shared by the rules engine
//! and its callers:
//! - [`Color`] for the two sides
//! - [`Square`] for board coordinates with algebraic-notation conversion
//! - [`PieceKind`] and [`Piece`] for piece representation
//! - [`Board`] as the 8x8 grid that owns every piece

mod board;
mod color;
mod piece;
mod square;

pub use board::Board;
pub use color::Color;
pub use piece::{Piece, PieceKind};
pub use square::{Square, SquareError};

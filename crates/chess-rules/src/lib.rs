//! Rules of chess on top of [`chess_core`]'s board primitives.
//!
//! The crate is layered bottom-up:
//!
//! - [`movegen`] produces pseudo-legal destination sets per piece,
//!   including en passant offers derived from the previous move.
//! - [`rules`] filters them for legality by clone-and-simulate, and
//!   answers the check / checkmate / stalemate / dead-position queries.
//! - [`san`] interprets algebraic move tokens into shapes, independent
//!   of any board state.
//! - [`Game`] ties it all together: it resolves tokens against the
//!   position, applies moves, records normalized history, and tracks
//!   the draw machinery (half-move clocks, repetition snapshots).
//! - [`pgn`] imports and exports the history as PGN movetext.

pub mod movegen;
pub mod pgn;
pub mod rules;
pub mod san;

mod game;
mod snapshot;

pub use game::{Game, MoveError, MovePair};
pub use movegen::LastMove;
pub use pgn::PgnError;
pub use san::{MoveIntent, NotationError};
pub use snapshot::{CastlingRights, Snapshot};

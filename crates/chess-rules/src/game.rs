//! Full game state: move application, history, clocks, and snapshots.

use crate::movegen::LastMove;
use crate::rules;
use crate::san::{self, MoveIntent, NotationError};
use crate::snapshot::{castling_rights, Snapshot};
use chess_core::{Board, Color, Piece, PieceKind, Square};
use std::collections::HashSet;
use thiserror::Error;

/// Errors returned by [`Game::make_move`]. The game state is untouched
/// whenever one of these is returned.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MoveError {
    /// The token could not be interpreted at all.
    #[error(transparent)]
    Notation(#[from] NotationError),

    /// The move is well-formed but no piece can legally perform it.
    #[error("illegal move: {0}")]
    Illegal(String),

    /// More than one piece satisfies the notation; the caller must
    /// resupply the move with disambiguation.
    #[error("ambiguous move: more than one {kind} can reach {target}")]
    Ambiguous { kind: PieceKind, target: Square },
}

/// One full move of history: White's notation and, once played, Black's.
///
/// A black move recorded without a preceding white move (possible only in
/// games set up from a custom position) stores the PGN ellipsis in the
/// white slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovePair {
    pub white: String,
    pub black: Option<String>,
}

/// A successfully applied move, before history bookkeeping.
struct Applied {
    notation: String,
    kind: PieceKind,
    from: Square,
    to: Square,
    resets_clock: bool,
}

/// A complete chess game.
///
/// The board, history, half-move clocks, and position snapshots are owned
/// exclusively by this aggregate and mutate only through [`make_move`]
/// (history is append-only). Every query runs to completion on the live
/// board; legality checks simulate on clones and never touch it.
///
/// [`make_move`]: Game::make_move
#[derive(Debug, Clone)]
pub struct Game {
    board: Board,
    moves: Vec<MovePair>,
    clocks: [u32; 2],
    last_move: Option<LastMove>,
    snapshots: Vec<Snapshot>,
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl Game {
    /// Creates a game from the standard starting position.
    pub fn new() -> Self {
        let mut game = Self::from_board(Board::starting());
        // The initial position counts as its first occurrence for
        // repetition purposes. White to move is recorded as Black having
        // "just moved".
        game.snapshots
            .push(Snapshot::capture(&game.board, Color::Black, None));
        game
    }

    /// Creates a game from a custom position. The board must contain one
    /// king per color.
    pub fn from_board(board: Board) -> Self {
        Game {
            board,
            moves: Vec::new(),
            clocks: [0, 0],
            last_move: None,
            snapshots: Vec::new(),
        }
    }

    /// Returns the current board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Returns the recorded move pairs, oldest first.
    pub fn moves(&self) -> &[MovePair] {
        &self.moves
    }

    /// Attempts to apply one half-move given in algebraic notation.
    ///
    /// On success the move is applied atomically: the piece is relocated,
    /// any captured piece removed (an en-passant victim from its actual
    /// square), castling moves king and rook together, and a promotion
    /// replaces the pawn. The recorded notation is normalized: minimal
    /// disambiguation, a derived ` e.p.` annotation, and a recomputed
    /// `+`/`#` suffix regardless of what the caller supplied.
    pub fn make_move(&mut self, input: &str, color: Color) -> Result<(), MoveError> {
        let token = input.trim();
        let applied = match san::parse_move(token, color)? {
            MoveIntent::CastleKingside => self.apply_castle(color, true)?,
            MoveIntent::CastleQueenside => self.apply_castle(color, false)?,
            MoveIntent::Promotion {
                from_file,
                to,
                piece,
            } => self.apply_pawn(token, color, from_file, to, Some(piece))?,
            MoveIntent::PawnMove { from_file, to } => {
                self.apply_pawn(token, color, from_file, to, None)?
            }
            MoveIntent::PieceMove {
                kind,
                from_file,
                from_rank,
                to,
            } => self.apply_piece(token, color, kind, from_file, from_rank, to)?,
        };
        self.finish(color, applied);
        Ok(())
    }

    /// True iff the color's king is attacked.
    pub fn under_check(&self, color: Color) -> bool {
        rules::under_check(&self.board, color)
    }

    /// True iff the color is in check with no legal reply.
    pub fn checkmate(&self, color: Color) -> bool {
        rules::checkmate(&self.board, color, self.last_move)
    }

    /// True iff the color is not in check but has no legal move.
    pub fn stalemate(&self, color: Color) -> bool {
        rules::stalemate(&self.board, color, self.last_move)
    }

    /// True iff the color has at least one legal move.
    pub fn has_moves(&self, color: Color) -> bool {
        rules::has_moves(&self.board, color, self.last_move)
    }

    /// Returns the check-safe destinations for the piece on `from`,
    /// including castling destinations for an eligible king. An empty
    /// square has no moves.
    pub fn legal_moves(&self, from: Square) -> HashSet<Square> {
        let piece = match self.board.piece_at(from) {
            Some(piece) => piece,
            None => return HashSet::new(),
        };

        let mut moves = rules::legal_destinations(&self.board, from, self.last_move);
        if piece.kind == PieceKind::King {
            for kingside in [true, false] {
                if let Ok(plan) = self.castle_plan(piece.color, kingside) {
                    moves.insert(plan.king_to);
                }
            }
        }
        moves
    }

    /// Full moves since either side last captured or pushed a pawn: the
    /// smaller of the two per-color counters. The 50-move (offerable)
    /// and 75-move (automatic) thresholds belong to the caller.
    pub fn moves_since_capture_or_pawn_move(&self) -> u32 {
        self.clocks[0].min(self.clocks[1])
    }

    /// True iff the latest position has occurred at least `n` times in
    /// total, comparing layout, mover, castling rights, and en passant
    /// availability.
    pub fn nfold_repetition(&self, n: usize) -> bool {
        let (latest, earlier) = match self.snapshots.split_last() {
            Some(split) => split,
            None => return false,
        };
        let recurrences = 1 + earlier.iter().filter(|&s| s == latest).count();
        recurrences >= n
    }

    /// True for the common insufficient-material endings (K v K, K+B v K,
    /// K+N v K).
    pub fn dead_position(&self) -> bool {
        rules::dead_position(&self.board)
    }

    fn apply_pawn(
        &mut self,
        token: &str,
        color: Color,
        from_file: Option<u8>,
        to: Square,
        promotion: Option<PieceKind>,
    ) -> Result<Applied, MoveError> {
        let file = from_file.unwrap_or_else(|| to.file());
        let candidates: Vec<Square> = self
            .board
            .pieces(color)
            .into_iter()
            .filter(|(square, piece)| piece.kind == PieceKind::Pawn && square.file() == file)
            .map(|(square, _)| square)
            .filter(|&square| {
                rules::legal_destinations(&self.board, square, self.last_move).contains(&to)
            })
            .collect();

        let from = match candidates.as_slice() {
            [] => return Err(MoveError::Illegal(token.to_string())),
            [only] => *only,
            _ => {
                return Err(MoveError::Ambiguous {
                    kind: PieceKind::Pawn,
                    target: to,
                })
            }
        };

        let en_passant = from.file() != to.file() && self.board.piece_at(to).is_none();
        let capture = en_passant || self.board.piece_at(to).is_some();

        rules::apply_unchecked(&mut self.board, from, to);
        if let Some(kind) = promotion {
            let mut promoted = Piece::new(kind, color);
            promoted.moved = true;
            self.board.set(to, Some(promoted));
        }

        let mut notation = String::new();
        if capture {
            notation.push(from.file_char());
            notation.push('x');
        }
        notation.push_str(&to.to_notation());
        if let Some(kind) = promotion {
            notation.push(kind.san_char().expect("promotion targets have letters"));
        }
        if en_passant {
            notation.push_str(" e.p.");
        }

        Ok(Applied {
            notation,
            kind: PieceKind::Pawn,
            from,
            to,
            resets_clock: true,
        })
    }

    fn apply_piece(
        &mut self,
        token: &str,
        color: Color,
        kind: PieceKind,
        from_file: Option<u8>,
        from_rank: Option<u8>,
        to: Square,
    ) -> Result<Applied, MoveError> {
        let reachers = self.reachers(color, kind, to);
        let candidates: Vec<Square> = reachers
            .iter()
            .copied()
            .filter(|square| {
                from_file.map_or(true, |f| square.file() == f)
                    && from_rank.map_or(true, |r| square.rank() == r)
            })
            .collect();

        let from = match candidates.as_slice() {
            [] => return Err(MoveError::Illegal(token.to_string())),
            [only] => *only,
            _ => return Err(MoveError::Ambiguous { kind, target: to }),
        };

        let disambiguation = minimal_disambiguation(&reachers, from);
        let capture = self.board.piece_at(to).is_some();
        rules::apply_unchecked(&mut self.board, from, to);

        let mut notation = String::new();
        notation.push(kind.san_char().expect("pawns never take this path"));
        notation.push_str(&disambiguation);
        if capture {
            notation.push('x');
        }
        notation.push_str(&to.to_notation());

        Ok(Applied {
            notation,
            kind,
            from,
            to,
            resets_clock: capture,
        })
    }

    fn apply_castle(&mut self, color: Color, kingside: bool) -> Result<Applied, MoveError> {
        let plan = self.castle_plan(color, kingside)?;

        rules::apply_unchecked(&mut self.board, plan.king_from, plan.king_to);
        rules::apply_unchecked(&mut self.board, plan.rook_from, plan.rook_to);

        Ok(Applied {
            notation: if kingside { "0-0" } else { "0-0-0" }.to_string(),
            kind: PieceKind::King,
            from: plan.king_from,
            to: plan.king_to,
            resets_clock: false,
        })
    }

    /// Validates every castling condition: rights intact, the squares
    /// between king and rook empty, the king not in check, and neither
    /// the transit square nor the destination attacked.
    fn castle_plan(&self, color: Color, kingside: bool) -> Result<CastlePlan, MoveError> {
        let token = if kingside { "0-0" } else { "0-0-0" };
        let illegal = || MoveError::Illegal(token.to_string());
        let home = color.home_rank();
        let at = |file: u8| Square::new(home, file).expect("indices in range");

        let rights = castling_rights(&self.board, color);
        let allowed = if kingside {
            rights.kingside
        } else {
            rights.queenside
        };
        if !allowed {
            return Err(illegal());
        }

        let (rook_file, transit_file, king_file, between): (u8, u8, u8, &[u8]) = if kingside {
            (7, 5, 6, &[5, 6])
        } else {
            (0, 3, 2, &[1, 2, 3])
        };

        if between
            .iter()
            .any(|&file| self.board.piece_at(at(file)).is_some())
        {
            return Err(illegal());
        }
        if rules::under_check(&self.board, color) {
            return Err(illegal());
        }

        let king_from = at(4);
        for &file in &[transit_file, king_file] {
            let mut simulated = self.board.clone();
            rules::apply_unchecked(&mut simulated, king_from, at(file));
            if rules::under_check(&simulated, color) {
                return Err(illegal());
            }
        }

        Ok(CastlePlan {
            king_from,
            king_to: at(king_file),
            rook_from: at(rook_file),
            rook_to: at(transit_file),
        })
    }

    /// Every piece of the given kind and color whose legal destinations
    /// include `to`, before any disambiguation filtering.
    fn reachers(&self, color: Color, kind: PieceKind, to: Square) -> Vec<Square> {
        self.board
            .pieces(color)
            .into_iter()
            .filter(|(_, piece)| piece.kind == kind)
            .map(|(square, _)| square)
            .filter(|&square| {
                rules::legal_destinations(&self.board, square, self.last_move).contains(&to)
            })
            .collect()
    }

    /// Records history, clocks, the last move, and a fresh snapshot, and
    /// appends the recomputed check/mate suffix.
    fn finish(&mut self, color: Color, applied: Applied) {
        let last = LastMove {
            kind: applied.kind,
            color,
            from: applied.from,
            to: applied.to,
        };

        let mut notation = applied.notation;
        let opponent = color.opposite();
        if rules::under_check(&self.board, opponent) {
            if rules::has_moves(&self.board, opponent, Some(last)) {
                notation.push('+');
            } else {
                notation.push('#');
            }
        }

        match color {
            Color::White => self.moves.push(MovePair {
                white: notation,
                black: None,
            }),
            Color::Black => match self.moves.last_mut() {
                Some(pair) if pair.black.is_none() => pair.black = Some(notation),
                _ => self.moves.push(MovePair {
                    white: "...".to_string(),
                    black: Some(notation),
                }),
            },
        }

        if applied.resets_clock {
            self.clocks[color.index()] = 0;
        } else {
            self.clocks[color.index()] += 1;
        }

        self.last_move = Some(last);
        self.snapshots
            .push(Snapshot::capture(&self.board, color, self.last_move));
    }
}

struct CastlePlan {
    king_from: Square,
    king_to: Square,
    rook_from: Square,
    rook_to: Square,
}

/// Re-derives the shortest disambiguation that still singles out `from`
/// among the pieces that can reach the target: none, then file only,
/// then the full source square.
fn minimal_disambiguation(reachers: &[Square], from: Square) -> String {
    if reachers.len() <= 1 {
        return String::new();
    }
    let same_file = reachers
        .iter()
        .filter(|square| square.file() == from.file())
        .count();
    if same_file == 1 {
        return from.file_char().to_string();
    }
    from.to_notation()
}

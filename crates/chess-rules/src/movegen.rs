//! Pseudo-legal move generation.
//!
//! A pseudo-legal destination obeys the piece's movement pattern and the
//! occupancy rules but may still leave the mover's own king in check; the
//! legality filter in [`crate::rules`] removes those by simulation.
//!
//! Castling destinations are deliberately not produced here. The king
//! only reports its eight adjacent squares; the legality layer computes
//! castling, because castling safety needs "is this square attacked",
//! which in turn needs pseudo-legal generation.

use chess_core::{Board, Color, Piece, PieceKind, Square};
use std::collections::HashSet;

const ORTHOGONAL: [(i8, i8); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];
const DIAGONAL: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];
const KNIGHT_JUMPS: [(i8, i8); 8] = [
    (2, 1),
    (2, -1),
    (-2, 1),
    (-2, -1),
    (1, 2),
    (1, -2),
    (-1, 2),
    (-1, -2),
];
const KING_STEPS: [(i8, i8); 8] = [
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
    (0, -1),
    (1, -1),
];

/// The most recently applied move, which a pawn needs to recognise an en
/// passant opportunity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LastMove {
    pub kind: PieceKind,
    pub color: Color,
    pub from: Square,
    pub to: Square,
}

impl LastMove {
    /// True when this move was a pawn advancing two squares.
    pub fn is_double_step(&self) -> bool {
        self.kind == PieceKind::Pawn
            && (self.from.rank() as i8 - self.to.rank() as i8).abs() == 2
    }
}

/// Returns every pseudo-legal destination for the piece on `from`.
///
/// # Panics
///
/// Panics if `from` is empty; callers resolve the piece first.
pub fn pseudo_legal_destinations(
    board: &Board,
    from: Square,
    last_move: Option<LastMove>,
) -> HashSet<Square> {
    let piece = board
        .piece_at(from)
        .expect("pseudo-legal generation from an empty square");

    match piece.kind {
        PieceKind::Pawn => pawn_destinations(board, from, piece, last_move),
        PieceKind::Knight => leaper_destinations(board, from, piece.color, &KNIGHT_JUMPS),
        PieceKind::Bishop => slider_destinations(board, from, piece.color, &DIAGONAL),
        PieceKind::Rook => slider_destinations(board, from, piece.color, &ORTHOGONAL),
        PieceKind::Queen => {
            let mut moves = slider_destinations(board, from, piece.color, &ORTHOGONAL);
            moves.extend(slider_destinations(board, from, piece.color, &DIAGONAL));
            moves
        }
        PieceKind::King => leaper_destinations(board, from, piece.color, &KING_STEPS),
    }
}

/// Returns the en passant capture destinations for the pawn on `from`,
/// given the opponent's last move. Empty unless that move was an enemy
/// pawn double-step landing directly beside this pawn.
pub fn en_passant_destinations(
    board: &Board,
    from: Square,
    last_move: Option<LastMove>,
) -> Vec<Square> {
    let piece = match board.piece_at(from) {
        Some(piece) if piece.kind == PieceKind::Pawn => piece,
        _ => return Vec::new(),
    };
    let last = match last_move {
        Some(last) if last.color != piece.color && last.is_double_step() => last,
        _ => return Vec::new(),
    };

    let mut captures = Vec::new();
    if last.to.rank() == from.rank() {
        for file_delta in [-1i8, 1] {
            if let Some(beside) = from.offset(0, file_delta) {
                if beside == last.to {
                    if let Some(target) = from.offset(piece.color.pawn_direction(), file_delta) {
                        captures.push(target);
                    }
                }
            }
        }
    }
    captures
}

fn pawn_destinations(
    board: &Board,
    from: Square,
    piece: Piece,
    last_move: Option<LastMove>,
) -> HashSet<Square> {
    let mut moves = HashSet::new();
    let direction = piece.color.pawn_direction();

    if let Some(one_ahead) = from.offset(direction, 0) {
        if board.piece_at(one_ahead).is_none() {
            moves.insert(one_ahead);

            if !piece.moved {
                if let Some(two_ahead) = from.offset(2 * direction, 0) {
                    if board.piece_at(two_ahead).is_none() {
                        moves.insert(two_ahead);
                    }
                }
            }
        }
    }

    for file_delta in [-1i8, 1] {
        if let Some(target) = from.offset(direction, file_delta) {
            if let Some(occupant) = board.piece_at(target) {
                if occupant.color != piece.color {
                    moves.insert(target);
                }
            }
        }
    }

    moves.extend(en_passant_destinations(board, from, last_move));
    moves
}

fn leaper_destinations(
    board: &Board,
    from: Square,
    color: Color,
    offsets: &[(i8, i8)],
) -> HashSet<Square> {
    offsets
        .iter()
        .filter_map(|&(rank_delta, file_delta)| from.offset(rank_delta, file_delta))
        .filter(|&target| match board.piece_at(target) {
            Some(occupant) => occupant.color != color,
            None => true,
        })
        .collect()
}

fn slider_destinations(
    board: &Board,
    from: Square,
    color: Color,
    directions: &[(i8, i8)],
) -> HashSet<Square> {
    let mut moves = HashSet::new();
    for &(rank_delta, file_delta) in directions {
        let mut current = from;
        while let Some(target) = current.offset(rank_delta, file_delta) {
            match board.piece_at(target) {
                None => {
                    moves.insert(target);
                    current = target;
                }
                Some(occupant) => {
                    if occupant.color != color {
                        moves.insert(target);
                    }
                    break;
                }
            }
        }
    }
    moves
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(notation: &str) -> Square {
        Square::from_notation(notation).unwrap()
    }

    fn squares(notations: &[&str]) -> HashSet<Square> {
        notations.iter().map(|n| sq(n)).collect()
    }

    fn lone(kind: PieceKind, color: Color, at: &str) -> (Board, Square) {
        let mut board = Board::empty();
        let square = sq(at);
        board.set(square, Some(Piece::new(kind, color)));
        (board, square)
    }

    #[test]
    fn rook_in_the_corner() {
        let (board, from) = lone(PieceKind::Rook, Color::White, "a1");
        let expected = squares(&[
            "a2", "a3", "a4", "a5", "a6", "a7", "a8", "b1", "c1", "d1", "e1", "f1", "g1", "h1",
        ]);
        assert_eq!(pseudo_legal_destinations(&board, from, None), expected);
    }

    #[test]
    fn rook_blocked_by_friend_captures_enemy() {
        let (mut board, from) = lone(PieceKind::Rook, Color::White, "d4");
        board.set(sq("d6"), Some(Piece::new(PieceKind::Pawn, Color::White)));
        board.set(sq("f4"), Some(Piece::new(PieceKind::Pawn, Color::Black)));
        let moves = pseudo_legal_destinations(&board, from, None);
        assert!(moves.contains(&sq("d5")));
        assert!(!moves.contains(&sq("d6")));
        assert!(!moves.contains(&sq("d7")));
        assert!(moves.contains(&sq("f4")));
        assert!(!moves.contains(&sq("g4")));
    }

    #[test]
    fn bishop_in_the_centre() {
        let (board, from) = lone(PieceKind::Bishop, Color::Black, "d4");
        let expected = squares(&[
            "c3", "b2", "a1", "e5", "f6", "g7", "h8", "c5", "b6", "a7", "e3", "f2", "g1",
        ]);
        assert_eq!(pseudo_legal_destinations(&board, from, None), expected);
    }

    #[test]
    fn queen_unions_rook_and_bishop_rays() {
        let (board, from) = lone(PieceKind::Queen, Color::White, "d4");
        let moves = pseudo_legal_destinations(&board, from, None);
        assert_eq!(moves.len(), 27);
        assert!(moves.contains(&sq("d8")));
        assert!(moves.contains(&sq("h8")));
        assert!(moves.contains(&sq("a1")));
        assert!(moves.contains(&sq("a4")));
    }

    #[test]
    fn knight_on_the_edge() {
        let (board, from) = lone(PieceKind::Knight, Color::White, "a4");
        let expected = squares(&["b6", "c5", "c3", "b2"]);
        assert_eq!(pseudo_legal_destinations(&board, from, None), expected);
    }

    #[test]
    fn knight_jumps_over_but_never_lands_on_friends() {
        let board = Board::starting();
        let moves = pseudo_legal_destinations(&board, sq("g1"), None);
        assert_eq!(moves, squares(&["f3", "h3"]));
    }

    #[test]
    fn king_steps_one_square() {
        let (board, from) = lone(PieceKind::King, Color::Black, "h8");
        assert_eq!(
            pseudo_legal_destinations(&board, from, None),
            squares(&["g8", "g7", "h7"])
        );
    }

    #[test]
    fn pawn_first_move_may_double_step() {
        let board = Board::starting();
        assert_eq!(
            pseudo_legal_destinations(&board, sq("e2"), None),
            squares(&["e3", "e4"])
        );
        assert_eq!(
            pseudo_legal_destinations(&board, sq("d7"), None),
            squares(&["d6", "d5"])
        );
    }

    #[test]
    fn pawn_after_moving_steps_once() {
        let mut board = Board::starting();
        let mut pawn = board.take(sq("e2")).unwrap();
        pawn.moved = true;
        board.set(sq("e4"), Some(pawn));
        assert_eq!(
            pseudo_legal_destinations(&board, sq("e4"), None),
            squares(&["e5"])
        );
    }

    #[test]
    fn pawn_blocked_directly_ahead_cannot_move() {
        let mut board = Board::starting();
        board.set(sq("e3"), Some(Piece::new(PieceKind::Bishop, Color::Black)));
        assert!(pseudo_legal_destinations(&board, sq("e2"), None).is_empty());
    }

    #[test]
    fn pawn_blocked_two_ahead_steps_once() {
        let mut board = Board::starting();
        board.set(sq("e4"), Some(Piece::new(PieceKind::Bishop, Color::Black)));
        assert_eq!(
            pseudo_legal_destinations(&board, sq("e2"), None),
            squares(&["e3"])
        );
    }

    #[test]
    fn pawn_captures_diagonally_not_own_pieces() {
        let mut board = Board::starting();
        board.set(sq("d3"), Some(Piece::new(PieceKind::Knight, Color::Black)));
        board.set(sq("f3"), Some(Piece::new(PieceKind::Knight, Color::White)));
        assert_eq!(
            pseudo_legal_destinations(&board, sq("e2"), None),
            squares(&["e3", "e4", "d3"])
        );
    }

    #[test]
    fn en_passant_offered_right_after_the_double_step() {
        let mut board = Board::empty();
        let mut white = Piece::new(PieceKind::Pawn, Color::White);
        white.moved = true;
        let mut black = Piece::new(PieceKind::Pawn, Color::Black);
        black.moved = true;
        board.set(sq("e5"), Some(white));
        board.set(sq("d5"), Some(black));

        let double_step = LastMove {
            kind: PieceKind::Pawn,
            color: Color::Black,
            from: sq("d7"),
            to: sq("d5"),
        };
        let moves = pseudo_legal_destinations(&board, sq("e5"), Some(double_step));
        assert!(moves.contains(&sq("d6")));
        assert!(moves.contains(&sq("e6")));

        // A single step to the same square offers nothing.
        let single_step = LastMove {
            kind: PieceKind::Pawn,
            color: Color::Black,
            from: sq("d6"),
            to: sq("d5"),
        };
        let moves = pseudo_legal_destinations(&board, sq("e5"), Some(single_step));
        assert!(!moves.contains(&sq("d6")));
    }

    #[test]
    fn en_passant_never_targets_own_color() {
        let mut board = Board::empty();
        let mut pawn = Piece::new(PieceKind::Pawn, Color::White);
        pawn.moved = true;
        board.set(sq("d4"), Some(pawn));
        board.set(sq("e4"), Some(pawn));

        let own_double = LastMove {
            kind: PieceKind::Pawn,
            color: Color::White,
            from: sq("e2"),
            to: sq("e4"),
        };
        assert!(en_passant_destinations(&board, sq("d4"), Some(own_double)).is_empty());
    }
}

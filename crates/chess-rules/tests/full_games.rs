//! Whole-game replays through the public API.

use chess_core::Color;
use chess_rules::{pgn, Game};

const OPERA_GAME: &str = "1. e4 e5 2. Nf3 d6 3. d4 Bg4 4. dxe5 Bxf3 5. Qxf3 dxe5 \
    6. Bc4 Nf6 7. Qb3 Qe7 8. Nc3 c6 9. Bg5 b5 10. Nxb5 cxb5 11. Bxb5+ Nbd7 \
    12. O-O-O Rd8 13. Rxd7 Rxd7 14. Rd1 Qe6 15. Bxd7+ Nxd7 16. Qb8+ Nxb8 17. Rd8#";

#[test]
fn the_opera_game_replays_to_checkmate() {
    let game = pgn::import(OPERA_GAME).unwrap();
    assert!(game.checkmate(Color::Black));
    assert!(game.under_check(Color::Black));
    assert!(!game.has_moves(Color::Black));
}

#[test]
fn the_opera_game_exports_in_normalized_form() {
    // Every supplied suffix and disambiguation in the source happens to be
    // minimal already, so the export reproduces the input verbatim.
    let game = pgn::import(OPERA_GAME).unwrap();
    assert_eq!(pgn::export(&game), OPERA_GAME);
}

#[test]
fn annotated_pgn_round_trips_to_bare_movetext() {
    let annotated = "[Event \"Opera\"]\n[White \"Morphy\"]\n[Result \"1-0\"]\n\n\
        1. e4 {the open game} e5 2. Nf3 (2. f4 exf4) d6 3. d4 Bg4 1-0";
    let game = pgn::import(annotated).unwrap();
    assert_eq!(pgn::export(&game), "1. e4 e5 2. Nf3 d6 3. d4 Bg4");
}

#[test]
fn moves_are_normalized_as_they_are_played() {
    let mut game = Game::new();
    let moves = ["e4", "e5", "Ng1f3", "Nc6", "Bc4", "Bc5", "O-O"];
    let mut color = Color::White;
    for half in moves {
        game.make_move(half, color).unwrap();
        color = color.opposite();
    }

    // Redundant disambiguation is dropped and castles are recorded in the
    // engine's zero form; export restores the PGN letter form.
    assert_eq!(game.moves()[1].white, "Nf3");
    assert_eq!(game.moves()[3].white, "0-0");
    assert_eq!(
        pgn::export(&game),
        "1. e4 e5 2. Nf3 Nc6 3. Bc4 Bc5 4. O-O"
    );
}

#[test]
fn fifty_move_counter_and_repetition_track_a_shuffle() {
    let mut game = Game::new();
    let shuffle = ["Nf3", "Nf6", "Ng1", "Ng8"];
    for _ in 0..2 {
        let mut color = Color::White;
        for half in shuffle {
            game.make_move(half, color).unwrap();
            color = color.opposite();
        }
    }

    assert!(game.nfold_repetition(3));
    assert_eq!(game.moves_since_capture_or_pawn_move(), 4);
    assert!(!game.dead_position());
}

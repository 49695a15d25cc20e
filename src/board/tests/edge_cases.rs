//! Move generation edge cases that perft counts alone would not localize.

use crate::board::{Board, Color};

fn has_move(board: &Board, uci: &str) -> bool {
    board.generate_moves().iter().any(|m| m.to_string() == uci)
}

#[test]
fn test_en_passant_pin_on_fifth_rank() {
    // Removing both pawns exposes the king to the h5 rook: b5xc6 ep must
    // not be generated, everything else stays intact
    let board = Board::from_fen("8/8/8/KPp4r/8/8/8/7k w - c6 0 2");
    assert!(!has_move(&board, "b5c6"));
    assert!(has_move(&board, "b5b6"));
}

#[test]
fn test_en_passant_capture_resolving_check() {
    // The double-pushed pawn gives check; capturing it en passant is the
    // only pawn answer
    let board = Board::from_fen("4k3/8/8/3pP3/4K3/8/8/8 w - d6 0 2");
    assert!(board.is_in_check(Color::White));
    assert!(has_move(&board, "e5d6"));
}

#[test]
fn test_en_passant_blocked_by_vertical_pin() {
    // The e5 pawn is pinned to the e-file; exd6 would expose the king
    let board = Board::from_fen("4r2k/8/8/3pP3/8/8/8/4K3 w - d6 0 2");
    assert!(!has_move(&board, "e5d6"));
    assert!(has_move(&board, "e5e6"));
}

#[test]
fn test_promotion_does_not_answer_check() {
    // White in check from the rook on e8: promoting on a8 resolves nothing
    // and must not be generated
    let board = Board::from_fen("4r2k/P7/8/8/8/8/8/4K3 w - - 0 1");
    assert!(board.is_in_check(Color::White));
    assert!(!has_move(&board, "a7a8q"));
    assert!(has_move(&board, "e1d1"));
    assert!(has_move(&board, "e1f2"));
}

#[test]
fn test_capture_promotion_resolves_check() {
    // The b8 rook checks the king on b1; capturing it with promotion is
    // legal, promoting straight ahead is not
    let board = Board::from_fen("1r5k/2P5/8/8/8/8/8/1K6 w - - 0 1");
    assert!(board.is_in_check(Color::White));
    assert!(has_move(&board, "c7b8q"));
    assert!(has_move(&board, "c7b8n"));
    assert!(!has_move(&board, "c7c8q"));
}

#[test]
fn test_double_check_forces_king_move() {
    let board = Board::from_fen("4r2k/8/8/8/8/3n4/8/4K3 w - - 0 1");
    let moves = board.generate_moves();
    assert!(moves.iter().all(|m| m.from() == board.king_square(Color::White)));
    assert!(!moves.is_empty());
}

#[test]
fn test_checkmate_has_no_moves() {
    // Back-rank mate
    let board = Board::from_fen("R5k1/5ppp/8/8/8/8/8/4K3 b - - 0 1");
    assert!(board.is_in_check(Color::Black));
    assert!(board.generate_moves().is_empty());
}

#[test]
fn test_stalemate_has_no_moves_and_no_check() {
    let board = Board::from_fen("k7/2Q5/8/8/8/8/8/2K5 b - - 0 1");
    assert!(!board.is_in_check(Color::Black));
    assert!(board.generate_moves().is_empty());
}

#[test]
fn test_castling_rights_lost_after_rook_moves() {
    let mut board = Board::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1");
    board.make_move_uci("h1g1").unwrap();
    board.make_move_uci("a8b8").unwrap();
    // White lost kingside, black lost queenside
    assert!(!board.castling_rights().has(Color::White, true));
    assert!(board.castling_rights().has(Color::White, false));
    assert!(!board.castling_rights().has(Color::Black, false));
    assert!(board.castling_rights().has(Color::Black, true));
}

#[test]
fn test_contact_queen_check_capture_or_mate() {
    // An unprotected queen on g2 smothers every flight square: capturing
    // it is the one legal move
    let board = Board::from_fen("6k1/8/8/8/8/8/6q1/6K1 w - - 0 1");
    assert!(board.is_in_check(Color::White));
    let moves = board.generate_moves();
    assert_eq!(moves.len(), 1);
    assert!(has_move(&board, "g1g2"));

    // The same queen backed by a bishop is mate
    let mated = Board::from_fen("6k1/1b6/8/8/8/8/6q1/6K1 w - - 0 1");
    assert!(mated.is_in_check(Color::White));
    assert!(mated.generate_moves().is_empty());
}

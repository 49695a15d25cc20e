//! Legal move generation.
//!
//! Strictly legal by construction: the pin/check analyzer restricts every
//! piece before a move is emitted, so no make-then-test filtering is needed.
//! Bulk bitboard operations produce the candidate target sets; per-piece
//! isolation applies the pin and check masks.

mod kings;
mod knights;
mod pawns;
mod sliders;

use super::attack_tables::{
    bishop_attacks, king_attacks, knight_attacks, pawn_attacks, rook_attacks,
};
use super::pins::KingPinThreats;
use super::state::Board;
use super::types::{Bitboard, Color, Move, MoveList, Piece, Square};

/// Which subset of legal moves to emit.
#[derive(Clone, Copy, PartialEq, Eq)]
pub(crate) enum GenMode {
    /// Every legal move
    All,
    /// Captures and promotions only (quiescence)
    Tactical,
}

impl Board {
    /// Generate every legal move for the side to move, each exactly once.
    #[must_use]
    pub fn generate_moves(&self) -> MoveList {
        self.generate(GenMode::All)
    }

    /// Generate legal captures and promotions only.
    #[must_use]
    pub(crate) fn generate_tactical_moves(&self) -> MoveList {
        self.generate(GenMode::Tactical)
    }

    fn generate(&self, mode: GenMode) -> MoveList {
        let us = self.side_to_move();
        let threats = KingPinThreats::analyze(self, us);
        let mut moves = MoveList::new();

        self.generate_king_moves(us, &threats, mode, &mut moves);

        // In double check only the king may move
        if threats.in_double_check() {
            return moves;
        }

        // Non-king targets: never own pieces; in single check, only squares
        // that capture the checker or block its ray; tactical mode narrows
        // to enemy pieces
        let mut allowed = threats.check_mask() & !self.occupancy(us);
        if mode == GenMode::Tactical {
            allowed &= self.occupancy(us.opponent());
        }

        self.generate_pawn_moves(us, &threats, mode, &mut moves);
        self.generate_knight_moves(us, &threats, allowed, &mut moves);
        self.generate_slider_moves(us, &threats, allowed, &mut moves);

        moves
    }

    /// True if `mv` is legal in the current position.
    #[must_use]
    pub fn is_legal_move(&self, mv: Move) -> bool {
        self.generate_moves().contains(mv)
    }

    /// True if `color`'s king is attacked.
    #[must_use]
    pub fn is_in_check(&self, color: Color) -> bool {
        let king_sq = self.king_square(color);
        self.is_square_attacked(king_sq, color.opponent())
    }

    /// True if `by` attacks `sq` under the current occupancy.
    #[must_use]
    pub fn is_square_attacked(&self, sq: Square, by: Color) -> bool {
        let occupancy = self.all_occupancy();

        // A pawn of `by` attacks sq iff it stands on a square that a pawn of
        // the opposite color would attack from sq
        if (pawn_attacks(by.opponent(), sq) & self.pieces_of(by, Piece::Pawn)).any() {
            return true;
        }
        if (knight_attacks(sq) & self.pieces_of(by, Piece::Knight)).any() {
            return true;
        }
        if (king_attacks(sq) & self.pieces_of(by, Piece::King)).any() {
            return true;
        }

        let queens = self.pieces_of(by, Piece::Queen);
        if (rook_attacks(sq, occupancy) & (self.pieces_of(by, Piece::Rook) | queens)).any() {
            return true;
        }
        (bishop_attacks(sq, occupancy) & (self.pieces_of(by, Piece::Bishop) | queens)).any()
    }

    /// Every square attacked by `by`, computed over the given occupancy.
    /// Passing an occupancy with the defending king removed lets the king
    /// generator reject steps backward along a checking ray.
    pub(crate) fn attacked_squares(&self, by: Color, occupancy: Bitboard) -> Bitboard {
        let mut attacks = Bitboard::EMPTY;

        let pawns = self.pieces_of(by, Piece::Pawn);
        attacks |= match by {
            Color::White => pawns.shift_north_east() | pawns.shift_north_west(),
            Color::Black => pawns.shift_south_east() | pawns.shift_south_west(),
        };

        for sq in self.pieces_of(by, Piece::Knight).iter() {
            attacks |= knight_attacks(sq);
        }
        attacks |= king_attacks(self.king_square(by));

        let queens = self.pieces_of(by, Piece::Queen);
        for sq in (self.pieces_of(by, Piece::Rook) | queens).iter() {
            attacks |= rook_attacks(sq, occupancy);
        }
        for sq in (self.pieces_of(by, Piece::Bishop) | queens).iter() {
            attacks |= bishop_attacks(sq, occupancy);
        }

        attacks
    }

    /// Count leaf nodes of the legal game tree to `depth`.
    #[must_use]
    pub fn perft(&mut self, depth: usize) -> u64 {
        if depth == 0 {
            return 1;
        }

        let moves = self.generate_moves();
        if depth == 1 {
            return moves.len() as u64;
        }

        let mut nodes = 0;
        for m in &moves {
            let info = self.make_move(*m);
            nodes += self.perft(depth - 1);
            self.unmake_move(*m, info);
        }

        nodes
    }

    /// Perft split by root move, for debugging against reference counts.
    #[must_use]
    pub fn perft_divide(&mut self, depth: usize) -> Vec<(Move, u64)> {
        let moves = self.generate_moves();
        let mut results = Vec::with_capacity(moves.len());
        for m in &moves {
            let info = self.make_move(*m);
            let nodes = if depth <= 1 { 1 } else { self.perft(depth - 1) };
            self.unmake_move(*m, info);
            results.push((*m, nodes));
        }
        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn move_strings(board: &Board) -> Vec<String> {
        let mut v: Vec<String> = board.generate_moves().iter().map(|m| m.to_string()).collect();
        v.sort();
        v
    }

    #[test]
    fn test_startpos_has_twenty_moves() {
        let board = Board::new();
        assert_eq!(board.generate_moves().len(), 20);
    }

    #[test]
    fn test_no_duplicate_moves() {
        let fens = [
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
            "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
        ];
        for fen in fens {
            let board = Board::from_fen(fen);
            let moves = move_strings(&board);
            let mut deduped = moves.clone();
            deduped.dedup();
            assert_eq!(moves, deduped, "duplicate moves in {fen}");
        }
    }

    #[test]
    fn test_all_generated_moves_leave_king_safe() {
        let fens = [
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
            "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8",
            "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 b - - 0 1",
        ];
        for fen in fens {
            let mut board = Board::from_fen(fen);
            let us = board.side_to_move();
            for m in &board.generate_moves() {
                let info = board.make_move(*m);
                assert!(
                    !board.is_in_check(us),
                    "move {m} leaves the king in check in {fen}"
                );
                board.unmake_move(*m, info);
            }
        }
    }

    #[test]
    fn test_double_check_only_king_moves() {
        // Knight d3 and rook e8 check the king on e1 simultaneously
        let board = Board::from_fen("4r2k/8/8/8/8/3n4/8/4K3 w - - 0 1");
        let moves = board.generate_moves();
        assert!(!moves.is_empty());
        for m in &moves {
            assert_eq!(m.from(), Square::new(0, 4), "non-king move {m} in double check");
        }
    }

    #[test]
    fn test_pinned_knight_cannot_move() {
        let board = Board::from_fen("4r2k/8/8/8/4N3/8/8/4K3 w - - 0 1");
        for m in &board.generate_moves() {
            assert_ne!(m.from(), Square::new(3, 4), "pinned knight moved: {m}");
        }
    }

    #[test]
    fn test_is_square_attacked() {
        let board = Board::new();
        // e3 is covered by white pieces (pawns d2/f2), not by black
        assert!(board.is_square_attacked(Square::new(2, 4), Color::White));
        assert!(!board.is_square_attacked(Square::new(2, 4), Color::Black));
        // f6 is covered by black
        assert!(board.is_square_attacked(Square::new(5, 5), Color::Black));
    }

    #[test]
    fn test_tactical_moves_are_captures_or_promotions() {
        let board =
            Board::from_fen("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1");
        let tactical = board.generate_tactical_moves();
        assert!(!tactical.is_empty());
        let all = board.generate_moves();
        for m in &tactical {
            assert!(m.is_capture() || m.is_promotion(), "{m} is quiet");
            assert!(all.contains(*m), "{m} not in the full move list");
        }
        // Every capture/promotion of the full list is in the tactical list
        for m in &all {
            if m.is_capture() || m.is_promotion() {
                assert!(tactical.contains(*m), "{m} missing from tactical list");
            }
        }
    }

    #[test]
    fn test_perft_divide_sums_to_perft() {
        let mut board = Board::new();
        let split = board.perft_divide(3);
        let total: u64 = split.iter().map(|(_, n)| n).sum();
        assert_eq!(total, board.perft(3));
        assert_eq!(split.len(), 20);
    }
}

//! King move and castling generation.

use super::super::attack_tables::king_attacks;
use super::super::pins::KingPinThreats;
use super::super::state::Board;
use super::super::types::{
    bit_for_square, Bitboard, Color, Move, MoveList, Piece, Square, CASTLE_BLACK_K,
    CASTLE_BLACK_Q, CASTLE_WHITE_K, CASTLE_WHITE_Q,
};
use super::GenMode;

impl Board {
    pub(super) fn generate_king_moves(
        &self,
        us: Color,
        threats: &KingPinThreats,
        mode: GenMode,
        moves: &mut MoveList,
    ) {
        let them = us.opponent();
        let king_sq = self.king_square(us);

        // Enemy attacks are computed with our king lifted off the board so
        // the king cannot retreat along the ray that checks it
        let occupancy_without_king = self.all_occupancy() ^ bit_for_square(king_sq);
        let danger = self.attacked_squares(them, occupancy_without_king);

        let enemy = self.occupancy(them);
        let mut targets = king_attacks(king_sq) & !self.occupancy(us) & !danger;
        if mode == GenMode::Tactical {
            targets &= enemy;
        }

        for to in targets.iter() {
            if enemy.contains(to) {
                moves.push(Move::capture(king_sq, to));
            } else {
                moves.push(Move::quiet(king_sq, to));
            }
        }

        if mode == GenMode::All && !threats.in_check() {
            self.generate_castling(us, danger, moves);
        }
    }

    /// Castling: the right must be held, the rook on its home square, the
    /// squares between king and rook empty, and the king's start, transit
    /// and destination squares unattacked. Only called when not in check.
    fn generate_castling(&self, us: Color, danger: Bitboard, moves: &mut MoveList) {
        let (rank, kingside_right, queenside_right) = match us {
            Color::White => (0, CASTLE_WHITE_K, CASTLE_WHITE_Q),
            Color::Black => (7, CASTLE_BLACK_K, CASTLE_BLACK_Q),
        };
        let occupancy = self.all_occupancy();
        let rooks = self.pieces_of(us, Piece::Rook);
        let king_from = Square::new(rank, 4);

        // Rights in a hand-written FEN may lie about piece placement
        if self.king_square(us) != king_from {
            return;
        }

        if self.castling_rights & kingside_right != 0 && rooks.contains(Square::new(rank, 7)) {
            let f = Square::new(rank, 5);
            let g = Square::new(rank, 6);
            let path_clear = !occupancy.contains(f) && !occupancy.contains(g);
            let path_safe = !danger.contains(f) && !danger.contains(g);
            if path_clear && path_safe {
                moves.push(Move::castle_kingside(king_from, g));
            }
        }

        if self.castling_rights & queenside_right != 0 && rooks.contains(Square::new(rank, 0)) {
            let b = Square::new(rank, 1);
            let c = Square::new(rank, 2);
            let d = Square::new(rank, 3);
            let path_clear =
                !occupancy.contains(b) && !occupancy.contains(c) && !occupancy.contains(d);
            // b1/b8 may be attacked; only the king's own path matters
            let path_safe = !danger.contains(c) && !danger.contains(d);
            if path_clear && path_safe {
                moves.push(Move::castle_queenside(king_from, c));
            }
        }
    }
}

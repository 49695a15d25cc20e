//! Knight move generation.

use super::super::attack_tables::knight_attacks;
use super::super::pins::KingPinThreats;
use super::super::state::Board;
use super::super::types::{Bitboard, Color, Move, MoveList, Piece};

impl Board {
    pub(super) fn generate_knight_moves(
        &self,
        us: Color,
        threats: &KingPinThreats,
        allowed: Bitboard,
        moves: &mut MoveList,
    ) {
        // A pinned knight can never stay on its pin ray
        let knights = self.pieces_of(us, Piece::Knight) & !threats.pinned();
        let enemy = self.occupancy(us.opponent());

        for from in knights.iter() {
            for to in (knight_attacks(from) & allowed).iter() {
                if enemy.contains(to) {
                    moves.push(Move::capture(from, to));
                } else {
                    moves.push(Move::quiet(from, to));
                }
            }
        }
    }
}

//! Bishop, rook and queen move generation via magic attack lookups.

use super::super::attack_tables::{bishop_attacks, queen_attacks, rook_attacks};
use super::super::pins::KingPinThreats;
use super::super::state::Board;
use super::super::types::{Bitboard, Color, Move, MoveList, Piece, Square};

impl Board {
    pub(super) fn generate_slider_moves(
        &self,
        us: Color,
        threats: &KingPinThreats,
        allowed: Bitboard,
        moves: &mut MoveList,
    ) {
        let occupancy = self.all_occupancy();
        let enemy = self.occupancy(us.opponent());

        let mut emit = |from: Square, targets: Bitboard, moves: &mut MoveList| {
            // A pinned slider keeps to its pin ray, up to capturing the pinner
            let targets = targets & threats.pin_mask(from);
            for to in targets.iter() {
                if enemy.contains(to) {
                    moves.push(Move::capture(from, to));
                } else {
                    moves.push(Move::quiet(from, to));
                }
            }
        };

        for from in self.pieces_of(us, Piece::Bishop).iter() {
            emit(from, bishop_attacks(from, occupancy) & allowed, moves);
        }
        for from in self.pieces_of(us, Piece::Rook).iter() {
            emit(from, rook_attacks(from, occupancy) & allowed, moves);
        }
        for from in self.pieces_of(us, Piece::Queen).iter() {
            emit(from, queen_attacks(from, occupancy) & allowed, moves);
        }
    }
}

//! Pawn move generation: pushes, captures, promotions, en passant.

use super::super::attack_tables::pawn_attacks;
use super::super::pins::KingPinThreats;
use super::super::state::Board;
use super::super::types::{
    bit_for_square, Bitboard, Color, Move, MoveList, Piece, Square, PROMOTION_PIECES,
};
use super::GenMode;

impl Board {
    pub(super) fn generate_pawn_moves(
        &self,
        us: Color,
        threats: &KingPinThreats,
        mode: GenMode,
        moves: &mut MoveList,
    ) {
        let them = us.opponent();
        let pawns = self.pieces_of(us, Piece::Pawn);
        if pawns.is_empty() {
            return;
        }

        let empty = !self.all_occupancy();
        let enemy = self.occupancy(them);
        let check_mask = threats.check_mask();

        // Bulk push targets; the double push reuses the single-push set so
        // the transit square is known to be empty
        let (single_targets, double_targets, promo_rank) = match us {
            Color::White => {
                let single = pawns.shift_north() & empty;
                let double = (single & Bitboard::RANK_3).shift_north() & empty;
                (single, double, Bitboard::RANK_8)
            }
            Color::Black => {
                let single = pawns.shift_south() & empty;
                let double = (single & Bitboard::RANK_6).shift_south() & empty;
                (single, double, Bitboard::RANK_1)
            }
        };

        let push_origin = |to: Square| match us {
            Color::White => Square::from_index(to.index() - 8),
            Color::Black => Square::from_index(to.index() + 8),
        };

        for to in (single_targets & check_mask).iter() {
            let from = push_origin(to);
            // A pinned pawn may push only along its file pin
            if !threats.pin_mask(from).contains(to) {
                continue;
            }
            if promo_rank.contains(to) {
                for promo in PROMOTION_PIECES {
                    moves.push(Move::promotion(from, to, promo));
                }
            } else if mode == GenMode::All {
                moves.push(Move::quiet(from, to));
            }
        }

        if mode == GenMode::All {
            for to in (double_targets & check_mask).iter() {
                let from = push_origin(push_origin(to));
                if !threats.pin_mask(from).contains(to) {
                    continue;
                }
                moves.push(Move::double_pawn_push(from, to));
            }
        }

        for from in pawns.iter() {
            let captures = pawn_attacks(us, from) & enemy & check_mask & threats.pin_mask(from);
            for to in captures.iter() {
                if promo_rank.contains(to) {
                    for promo in PROMOTION_PIECES {
                        moves.push(Move::promotion_capture(from, to, promo));
                    }
                } else {
                    moves.push(Move::capture(from, to));
                }
            }
        }

        if let Some(ep) = self.en_passant_target {
            let victim_sq = match us {
                Color::White => Square::new(ep.rank() - 1, ep.file()),
                Color::Black => Square::new(ep.rank() + 1, ep.file()),
            };
            // The capture must land on the check mask or remove the checker
            // itself; exposure pins are handled by the analyzer's simulation
            let resolves_check =
                check_mask.contains(ep) || threats.checkers() == bit_for_square(victim_sq);
            if resolves_check {
                let candidates = pawns & pawn_attacks(them, ep);
                for from in candidates.iter() {
                    if threats.ep_forbidden().contains(from) {
                        continue;
                    }
                    moves.push(Move::en_passant(from, ep));
                }
            }
        }
    }
}

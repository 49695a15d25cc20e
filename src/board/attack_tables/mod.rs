//! Attack tables for move generation.
//!
//! Leaper attacks (knight, king, pawn) come from precomputed per-square
//! tables; sliding attacks (rook, bishop, queen) from magic bitboards; the
//! ray/between/line tables support the pin and check analysis.

mod magics;
mod tables;

pub(crate) use magics::{bishop_attacks, queen_attacks, rook_attacks};
pub(crate) use tables::{between, line, ray, Direction};

use crate::board::types::{Bitboard, Color, Square};

/// Knight attack set from a square
#[inline]
pub(crate) fn knight_attacks(sq: Square) -> Bitboard {
    tables::KNIGHT_ATTACKS[sq.index()]
}

/// King attack set from a square
#[inline]
pub(crate) fn king_attacks(sq: Square) -> Bitboard {
    tables::KING_ATTACKS[sq.index()]
}

/// Squares attacked by a pawn of `color` standing on `sq`
#[inline]
pub(crate) fn pawn_attacks(color: Color, sq: Square) -> Bitboard {
    tables::PAWN_ATTACKS[color.index()][sq.index()]
}

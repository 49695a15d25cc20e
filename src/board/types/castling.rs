//! Castling rights mask and per-square update table.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::piece::Color;

pub(crate) const CASTLE_WHITE_K: u8 = 1 << 0;
pub(crate) const CASTLE_WHITE_Q: u8 = 1 << 1;
pub(crate) const CASTLE_BLACK_K: u8 = 1 << 2;
pub(crate) const CASTLE_BLACK_Q: u8 = 1 << 3;

/// All castling rights combined
pub(crate) const ALL_CASTLING_RIGHTS: u8 =
    CASTLE_WHITE_K | CASTLE_WHITE_Q | CASTLE_BLACK_K | CASTLE_BLACK_Q;

/// Rights that survive a piece moving from (or being captured on) each square.
///
/// `new_rights = old & UPDATE_MASK[from] & UPDATE_MASK[to]` covers king moves,
/// rook moves off their home squares, and captures of home-square rooks.
pub(crate) const CASTLING_UPDATE_MASK: [u8; 64] = {
    let mut masks = [ALL_CASTLING_RIGHTS; 64];
    masks[0] = ALL_CASTLING_RIGHTS & !CASTLE_WHITE_Q; // a1
    masks[4] = ALL_CASTLING_RIGHTS & !(CASTLE_WHITE_K | CASTLE_WHITE_Q); // e1
    masks[7] = ALL_CASTLING_RIGHTS & !CASTLE_WHITE_K; // h1
    masks[56] = ALL_CASTLING_RIGHTS & !CASTLE_BLACK_Q; // a8
    masks[60] = ALL_CASTLING_RIGHTS & !(CASTLE_BLACK_K | CASTLE_BLACK_Q); // e8
    masks[63] = ALL_CASTLING_RIGHTS & !CASTLE_BLACK_K; // h8
    masks
};

/// Castling rights represented as a 4-bit mask
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CastlingRights(u8);

impl CastlingRights {
    /// No castling rights
    #[must_use]
    pub const fn none() -> Self {
        CastlingRights(0)
    }

    /// All castling rights (both sides can castle both ways)
    #[must_use]
    pub const fn all() -> Self {
        CastlingRights(ALL_CASTLING_RIGHTS)
    }

    /// Check if a specific castling right is set
    #[inline]
    #[must_use]
    pub const fn has(self, color: Color, kingside: bool) -> bool {
        self.0 & Self::bit_for(color, kingside) != 0
    }

    /// Set a specific castling right
    #[inline]
    pub fn set(&mut self, color: Color, kingside: bool) {
        self.0 |= Self::bit_for(color, kingside);
    }

    /// Get the raw bitmask value (indexes the Zobrist castling-key table)
    #[inline]
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self.0
    }

    /// Create from raw bitmask value
    #[inline]
    #[must_use]
    pub const fn from_u8(value: u8) -> Self {
        CastlingRights(value & ALL_CASTLING_RIGHTS)
    }

    #[inline]
    const fn bit_for(color: Color, kingside: bool) -> u8 {
        match (color, kingside) {
            (Color::White, true) => CASTLE_WHITE_K,
            (Color::White, false) => CASTLE_WHITE_Q,
            (Color::Black, true) => CASTLE_BLACK_K,
            (Color::Black, false) => CASTLE_BLACK_Q,
        }
    }
}

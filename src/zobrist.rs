//! Zobrist hashing for chess positions.
//!
//! Provides incrementally-updatable 64-bit position fingerprints for the
//! transposition table and repetition detection.

use once_cell::sync::Lazy;
use rand::prelude::*;

use crate::board::{Color, Piece, Square};

pub(crate) struct ZobristKeys {
    /// piece_keys[color][piece][square]
    pub(crate) piece_keys: [[[u64; 64]; 6]; 2],
    pub(crate) side_key: u64,
    /// Indexed by the 4-bit castling mask, so a rights transition hashes as
    /// `key ^= castling_keys[old] ^ castling_keys[new]`
    pub(crate) castling_keys: [u64; 16],
    /// Only the file of the en-passant target matters
    pub(crate) en_passant_keys: [u64; 8],
}

impl ZobristKeys {
    fn new() -> Self {
        // Fixed seed keeps hashes reproducible across runs
        let mut rng = StdRng::seed_from_u64(0x1B5A_D1CE_5EED_u64);
        let mut piece_keys = [[[0u64; 64]; 6]; 2];
        let mut castling_keys = [0u64; 16];
        let mut en_passant_keys = [0u64; 8];

        for color in &mut piece_keys {
            for piece in color.iter_mut() {
                for key in piece.iter_mut() {
                    *key = rng.gen();
                }
            }
        }

        let side_key = rng.gen();

        // The empty mask hashes to zero so that "no rights" contributes
        // nothing; every other mask gets an independent key
        for key in castling_keys.iter_mut().skip(1) {
            *key = rng.gen();
        }

        for key in &mut en_passant_keys {
            *key = rng.gen();
        }

        ZobristKeys {
            piece_keys,
            side_key,
            castling_keys,
            en_passant_keys,
        }
    }

    #[inline]
    pub(crate) fn piece(&self, color: Color, piece: Piece, sq: Square) -> u64 {
        self.piece_keys[color.index()][piece.index()][sq.index()]
    }

    #[inline]
    pub(crate) fn castling(&self, rights_mask: u8) -> u64 {
        self.castling_keys[(rights_mask & 0xF) as usize]
    }

    #[inline]
    pub(crate) fn en_passant_file(&self, file: usize) -> u64 {
        self.en_passant_keys[file]
    }
}

pub(crate) static ZOBRIST: Lazy<ZobristKeys> = Lazy::new(ZobristKeys::new);

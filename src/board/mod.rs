//! Board representation and move generation.
//!
//! Bitboard-based position with magic-bitboard sliding attacks, a pin-aware
//! strictly-legal move generator, incremental Zobrist hashing and a tapered
//! evaluation.
//!
//! # Example
//! ```
//! use ironclad::board::Board;
//!
//! let board = Board::new();
//! let moves = board.generate_moves();
//! assert_eq!(moves.len(), 20);
//! ```

mod attack_tables;
mod error;
mod eval;
mod fen;
mod make_unmake;
mod masks;
mod movegen;
mod pins;
mod pst;
mod state;
mod types;

#[cfg(test)]
mod tests;

// Public API
pub use error::{FenError, MoveParseError, SquareError};
pub use make_unmake::UnmakeInfo;
pub use state::Board;
pub use types::{
    Bitboard, BitboardIter, CastlingRights, Color, Move, MoveList, Piece, RankedMove,
    RankedMoveList, Square,
};

// Crate-internal surface for the search
pub(crate) use attack_tables::{
    bishop_attacks, knight_attacks, line, pawn_attacks, queen_attacks, rook_attacks,
};
pub(crate) use types::MAX_PLY;

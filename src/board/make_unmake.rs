//! Applying and reverting moves with incremental hash maintenance.

use crate::zobrist::ZOBRIST;

use super::state::Board;
use super::types::{
    bit_for_square, Color, Move, Piece, Square, CASTLING_UPDATE_MASK,
};

/// Everything needed to revert one made move.
///
/// Plain value; lives on the search stack between `make_move` and
/// `unmake_move`.
#[derive(Clone, Debug)]
pub struct UnmakeInfo {
    pub(crate) captured: Option<(Color, Piece)>,
    pub(crate) prev_en_passant: Option<Square>,
    pub(crate) prev_castling: u8,
    pub(crate) prev_hash: u64,
    pub(crate) prev_halfmove: u32,
    pub(crate) made_hash: u64,
    pub(crate) prev_repetition: u32,
}

/// Restore data for a null move (side swap without touching material).
#[derive(Clone, Debug)]
pub struct NullMoveInfo {
    pub(crate) prev_en_passant: Option<Square>,
    pub(crate) prev_hash: u64,
}

impl Board {
    pub(crate) fn set_piece(&mut self, sq: Square, color: Color, piece: Piece) {
        let bit = bit_for_square(sq);
        let c_idx = color.index();
        self.pieces[c_idx][piece.index()] |= bit;
        self.occupied[c_idx] |= bit;
        self.all_occupied |= bit;
    }

    pub(crate) fn remove_piece(&mut self, sq: Square, color: Color, piece: Piece) {
        let bit = bit_for_square(sq);
        let c_idx = color.index();
        self.pieces[c_idx][piece.index()] &= !bit;
        self.occupied[c_idx] &= !bit;
        self.all_occupied &= !bit;
    }

    /// The piece standing on a square, with its color
    #[must_use]
    pub fn piece_at(&self, sq: Square) -> Option<(Color, Piece)> {
        let bit = bit_for_square(sq);
        if !self.all_occupied.intersects(bit) {
            return None;
        }

        let color = if self.occupied[0].intersects(bit) {
            Color::White
        } else {
            Color::Black
        };
        let c_idx = color.index();
        for p_idx in 0..6 {
            if self.pieces[c_idx][p_idx].intersects(bit) {
                return Some((color, Piece::from_index(p_idx)));
            }
        }

        None
    }

    /// The piece kind on a square, ignoring color
    #[must_use]
    pub fn piece_on(&self, sq: Square) -> Option<Piece> {
        self.piece_at(sq).map(|(_, piece)| piece)
    }

    /// Recompute the Zobrist hash from scratch.
    ///
    /// The incremental hash must always agree with this; it is the oracle
    /// for the hash round-trip tests.
    #[must_use]
    pub(crate) fn calculate_hash(&self) -> u64 {
        let mut hash = 0u64;

        for color in Color::BOTH {
            for piece in Piece::ALL {
                for sq in self.pieces_of(color, piece).iter() {
                    hash ^= ZOBRIST.piece(color, piece, sq);
                }
            }
        }

        if !self.white_to_move {
            hash ^= ZOBRIST.side_key;
        }

        hash ^= ZOBRIST.castling(self.castling_rights);

        if let Some(ep) = self.en_passant_target {
            hash ^= ZOBRIST.en_passant_file(ep.file());
        }

        hash
    }

    /// The square of the pawn captured by an en-passant move to `to`
    #[inline]
    fn en_passant_victim_square(to: Square, mover: Color) -> Square {
        match mover {
            Color::White => Square::new(to.rank() - 1, to.file()),
            Color::Black => Square::new(to.rank() + 1, to.file()),
        }
    }

    /// Apply a legal move, returning the data needed to revert it.
    pub fn make_move(&mut self, m: Move) -> UnmakeInfo {
        let prev_hash = self.hash;
        let prev_en_passant = self.en_passant_target;
        let prev_castling = self.castling_rights;
        let prev_halfmove = self.halfmove_clock;

        let color = self.side_to_move();
        let them = color.opponent();

        let mut hash = self.hash ^ ZOBRIST.side_key;
        if let Some(old_ep) = self.en_passant_target {
            hash ^= ZOBRIST.en_passant_file(old_ep.file());
        }

        // Remove the captured piece first so the target square is free
        let captured = if m.is_en_passant() {
            let victim_sq = Self::en_passant_victim_square(m.to(), color);
            self.remove_piece(victim_sq, them, Piece::Pawn);
            hash ^= ZOBRIST.piece(them, Piece::Pawn, victim_sq);
            Some((them, Piece::Pawn))
        } else if m.is_capture() {
            let (cap_color, cap_piece) = self
                .piece_at(m.to())
                .expect("capture move with empty target");
            self.remove_piece(m.to(), cap_color, cap_piece);
            hash ^= ZOBRIST.piece(cap_color, cap_piece, m.to());
            Some((cap_color, cap_piece))
        } else {
            None
        };

        let (_, mover) = self.piece_at(m.from()).expect("move with empty source");
        self.remove_piece(m.from(), color, mover);
        hash ^= ZOBRIST.piece(color, mover, m.from());

        if m.is_castling() {
            self.set_piece(m.to(), color, Piece::King);
            hash ^= ZOBRIST.piece(color, Piece::King, m.to());

            let (rook_from_file, rook_to_file) = if m.to().file() == 6 { (7, 5) } else { (0, 3) };
            let rook_from = Square::new(m.to().rank(), rook_from_file);
            let rook_to = Square::new(m.to().rank(), rook_to_file);
            self.remove_piece(rook_from, color, Piece::Rook);
            self.set_piece(rook_to, color, Piece::Rook);
            hash ^= ZOBRIST.piece(color, Piece::Rook, rook_from)
                ^ ZOBRIST.piece(color, Piece::Rook, rook_to);
        } else {
            let placed = m.promotion_piece().unwrap_or(mover);
            self.set_piece(m.to(), color, placed);
            hash ^= ZOBRIST.piece(color, placed, m.to());
        }

        // New en-passant target only after a double pawn push
        self.en_passant_target = None;
        if m.is_double_pawn_push() {
            let ep_rank = (m.from().rank() + m.to().rank()) / 2;
            let ep = Square::new(ep_rank, m.from().file());
            self.en_passant_target = Some(ep);
            hash ^= ZOBRIST.en_passant_file(ep.file());
        }

        // Castling rights: one table lookup covers king moves, rook moves
        // off home squares and captures of home-square rooks
        let new_rights = self.castling_rights
            & CASTLING_UPDATE_MASK[m.from().index()]
            & CASTLING_UPDATE_MASK[m.to().index()];
        if new_rights != self.castling_rights {
            hash ^= ZOBRIST.castling(self.castling_rights) ^ ZOBRIST.castling(new_rights);
            self.castling_rights = new_rights;
        }

        if mover == Piece::Pawn || m.is_capture() {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock = self.halfmove_clock.saturating_add(1);
        }
        if color == Color::Black {
            self.fullmove_number += 1;
        }

        self.white_to_move = !self.white_to_move;
        self.hash = hash;

        let prev_repetition = self.repetition_counts.get(hash);
        self.repetition_counts.increment(hash);

        UnmakeInfo {
            captured,
            prev_en_passant,
            prev_castling,
            prev_hash,
            prev_halfmove,
            made_hash: hash,
            prev_repetition,
        }
    }

    /// Revert the most recent `make_move`.
    pub fn unmake_move(&mut self, m: Move, info: UnmakeInfo) {
        self.repetition_counts
            .set(info.made_hash, info.prev_repetition);

        self.white_to_move = !self.white_to_move;
        self.en_passant_target = info.prev_en_passant;
        self.castling_rights = info.prev_castling;
        self.hash = info.prev_hash;
        self.halfmove_clock = info.prev_halfmove;

        let color = self.side_to_move();
        if color == Color::Black {
            self.fullmove_number -= 1;
        }

        if m.is_castling() {
            self.remove_piece(m.to(), color, Piece::King);
            self.set_piece(m.from(), color, Piece::King);

            let (rook_home_file, rook_castled_file) =
                if m.to().file() == 6 { (7, 5) } else { (0, 3) };
            let rook_castled = Square::new(m.to().rank(), rook_castled_file);
            let rook_home = Square::new(m.to().rank(), rook_home_file);
            self.remove_piece(rook_castled, color, Piece::Rook);
            self.set_piece(rook_home, color, Piece::Rook);
            return;
        }

        let (_, piece_at_to) = self
            .piece_at(m.to())
            .expect("unmake with empty target square");
        self.remove_piece(m.to(), color, piece_at_to);
        let original = if m.is_promotion() {
            Piece::Pawn
        } else {
            piece_at_to
        };
        self.set_piece(m.from(), color, original);

        if let Some((cap_color, cap_piece)) = info.captured {
            let cap_sq = if m.is_en_passant() {
                Self::en_passant_victim_square(m.to(), color)
            } else {
                m.to()
            };
            self.set_piece(cap_sq, cap_color, cap_piece);
        }
    }

    /// Pass the turn: flip side to move and clear the en-passant target.
    /// Used by null-move pruning.
    pub(crate) fn make_null_move(&mut self) -> NullMoveInfo {
        let prev_hash = self.hash;
        let prev_en_passant = self.en_passant_target;

        let mut hash = self.hash ^ ZOBRIST.side_key;
        if let Some(old_ep) = self.en_passant_target {
            hash ^= ZOBRIST.en_passant_file(old_ep.file());
        }

        self.en_passant_target = None;
        self.white_to_move = !self.white_to_move;
        self.hash = hash;

        NullMoveInfo {
            prev_en_passant,
            prev_hash,
        }
    }

    pub(crate) fn unmake_null_move(&mut self, info: NullMoveInfo) {
        self.white_to_move = !self.white_to_move;
        self.en_passant_target = info.prev_en_passant;
        self.hash = info.prev_hash;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_piece_at_start() {
        let board = Board::new();
        assert_eq!(
            board.piece_at(Square::new(0, 4)),
            Some((Color::White, Piece::King))
        );
        assert_eq!(
            board.piece_at(Square::new(7, 3)),
            Some((Color::Black, Piece::Queen))
        );
        assert_eq!(board.piece_at(Square::new(4, 4)), None);
    }

    #[test]
    fn test_quiet_move_round_trip() {
        let mut board = Board::new();
        let before = board.clone();
        let mv = Move::quiet(Square::new(0, 6), Square::new(2, 5)); // Ng1f3
        let info = board.make_move(mv);

        assert_eq!(
            board.piece_at(Square::new(2, 5)),
            Some((Color::White, Piece::Knight))
        );
        assert!(!board.white_to_move());
        assert_eq!(board.halfmove_clock(), 1);
        assert_eq!(board.hash(), board.calculate_hash());

        board.unmake_move(mv, info);
        assert_eq!(board, before);
    }

    #[test]
    fn test_double_push_sets_en_passant() {
        let mut board = Board::new();
        let mv = Move::double_pawn_push(Square::new(1, 4), Square::new(3, 4)); // e2e4
        let info = board.make_move(mv);
        assert_eq!(board.en_passant_target(), Some(Square::new(2, 4)));
        assert_eq!(board.hash(), board.calculate_hash());
        board.unmake_move(mv, info);
        assert_eq!(board.en_passant_target(), None);
    }

    #[test]
    fn test_capture_resets_halfmove_clock() {
        let mut board =
            Board::from_fen("rnbqkbnr/ppp1pppp/8/3p4/4P3/8/PPPP1PPP/RNBQKBNR w KQkq - 5 3");
        let mv = Move::capture(Square::new(3, 4), Square::new(4, 3)); // exd5
        let info = board.make_move(mv);
        assert_eq!(board.halfmove_clock(), 0);
        assert_eq!(info.captured, Some((Color::Black, Piece::Pawn)));
        assert_eq!(board.hash(), board.calculate_hash());
        board.unmake_move(mv, info);
        assert_eq!(board.halfmove_clock(), 5);
    }

    #[test]
    fn test_en_passant_capture_round_trip() {
        let mut board =
            Board::from_fen("rnbqkbnr/ppp1p1pp/8/3pPp2/8/8/PPPP1PPP/RNBQKBNR w KQkq f6 0 3");
        let before = board.clone();
        let mv = Move::en_passant(Square::new(4, 4), Square::new(5, 5)); // exf6
        let info = board.make_move(mv);

        // Victim pawn disappears from f5
        assert_eq!(board.piece_at(Square::new(4, 5)), None);
        assert_eq!(
            board.piece_at(Square::new(5, 5)),
            Some((Color::White, Piece::Pawn))
        );
        assert_eq!(board.hash(), board.calculate_hash());

        board.unmake_move(mv, info);
        assert_eq!(board, before);
    }

    #[test]
    fn test_promotion_round_trip() {
        let mut board = Board::from_fen("8/P7/8/8/8/8/8/K1k5 w - - 0 1");
        let before = board.clone();
        let mv = Move::promotion(Square::new(6, 0), Square::new(7, 0), Piece::Queen);
        let info = board.make_move(mv);

        assert_eq!(
            board.piece_at(Square::new(7, 0)),
            Some((Color::White, Piece::Queen))
        );
        assert_eq!(board.hash(), board.calculate_hash());

        board.unmake_move(mv, info);
        assert_eq!(board, before);
    }

    #[test]
    fn test_castling_round_trip_both_sides() {
        let mut board = Board::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1");
        let before = board.clone();

        let ks = Move::castle_kingside(Square::new(0, 4), Square::new(0, 6));
        let info = board.make_move(ks);
        assert_eq!(
            board.piece_at(Square::new(0, 6)),
            Some((Color::White, Piece::King))
        );
        assert_eq!(
            board.piece_at(Square::new(0, 5)),
            Some((Color::White, Piece::Rook))
        );
        assert!(!board.castling_rights().has(Color::White, true));
        assert!(!board.castling_rights().has(Color::White, false));
        assert_eq!(board.hash(), board.calculate_hash());
        board.unmake_move(ks, info);
        assert_eq!(board, before);

        let qs = Move::castle_queenside(Square::new(0, 4), Square::new(0, 2));
        let info = board.make_move(qs);
        assert_eq!(
            board.piece_at(Square::new(0, 2)),
            Some((Color::White, Piece::King))
        );
        assert_eq!(
            board.piece_at(Square::new(0, 3)),
            Some((Color::White, Piece::Rook))
        );
        assert_eq!(board.hash(), board.calculate_hash());
        board.unmake_move(qs, info);
        assert_eq!(board, before);
    }

    #[test]
    fn test_rook_capture_clears_opponent_right() {
        let mut board = Board::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1");
        // Rxa8 takes the rook that guards black's queenside right
        let mv = Move::capture(Square::new(0, 0), Square::new(7, 0));
        let info = board.make_move(mv);
        assert!(!board.castling_rights().has(Color::Black, false));
        assert!(board.castling_rights().has(Color::Black, true));
        assert!(!board.castling_rights().has(Color::White, false));
        assert_eq!(board.hash(), board.calculate_hash());
        board.unmake_move(mv, info);
        assert!(board.castling_rights().has(Color::Black, false));
    }

    #[test]
    fn test_fullmove_number_counts_black_moves() {
        let mut board = Board::new();
        let e4 = Move::double_pawn_push(Square::new(1, 4), Square::new(3, 4));
        let info1 = board.make_move(e4);
        assert_eq!(board.fullmove_number(), 1);

        let e5 = Move::double_pawn_push(Square::new(6, 4), Square::new(4, 4));
        let info2 = board.make_move(e5);
        assert_eq!(board.fullmove_number(), 2);

        board.unmake_move(e5, info2);
        assert_eq!(board.fullmove_number(), 1);
        board.unmake_move(e4, info1);
        assert_eq!(board.fullmove_number(), 1);
    }

    #[test]
    fn test_null_move_round_trip() {
        let mut board =
            Board::from_fen("rnbqkbnr/ppp1p1pp/8/3pPp2/8/8/PPPP1PPP/RNBQKBNR w KQkq f6 0 3");
        let prev_hash = board.hash();
        let prev_ep = board.en_passant_target();

        let info = board.make_null_move();
        assert_eq!(board.en_passant_target(), None);
        assert!(!board.white_to_move());
        assert_ne!(board.hash(), prev_hash);
        assert_eq!(board.hash(), board.calculate_hash());

        board.unmake_null_move(info);
        assert_eq!(board.hash(), prev_hash);
        assert_eq!(board.en_passant_target(), prev_ep);
        assert!(board.white_to_move());
    }

    #[test]
    fn test_repetition_detected_after_shuffle() {
        let mut board = Board::new();
        let moves = [
            Move::quiet(Square::new(0, 6), Square::new(2, 5)), // Nf3
            Move::quiet(Square::new(7, 6), Square::new(5, 5)), // Nf6
            Move::quiet(Square::new(2, 5), Square::new(0, 6)), // Ng1
            Move::quiet(Square::new(5, 5), Square::new(7, 6)), // Ng8
        ];
        for mv in moves {
            board.make_move(mv);
        }
        // Back to the starting placement with the start side to move
        assert!(board.is_repetition());
    }
}

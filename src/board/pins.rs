//! King pin and check analysis.
//!
//! One pass over the eight rays from the king classifies every absolute pin
//! and every slider check, and resolves the en-passant exposure edge case.
//! The move generator consumes the result to emit only legal moves.

use super::attack_tables::{
    between, bishop_attacks, knight_attacks, pawn_attacks, ray, rook_attacks, Direction,
};
use super::state::Board;
use super::types::{bit_for_square, Bitboard, Color, Piece, Square};

/// Pin and check state for one side's king.
pub(crate) struct KingPinThreats {
    /// Per-direction ray from the king (exclusive) to the relevant enemy
    /// slider (inclusive). Holds the pin ray when the direction pins one of
    /// our pieces, the check ray when it checks the king, empty otherwise.
    rays: [Bitboard; 8],
    /// Own pieces restricted to their pin ray
    pinned: Bitboard,
    /// Enemy pieces giving check
    checkers: Bitboard,
    /// A knight or pawn is among the checkers
    contact_check: bool,
    /// Squares that resolve a single check (capture the checker or block
    /// its ray); `ALL` when not in check, empty in double check
    check_mask: Bitboard,
    /// Own pawns whose en-passant capture this ply would expose the king
    ep_forbidden: Bitboard,
}

impl KingPinThreats {
    /// Analyze pins and checks against the king of `us`.
    pub(crate) fn analyze(board: &Board, us: Color) -> Self {
        let king_sq = board.king_square(us);
        let them = us.opponent();
        let occupancy = board.all_occupancy();
        let own = board.occupancy(us);

        let enemy_orthogonal =
            board.pieces_of(them, Piece::Rook) | board.pieces_of(them, Piece::Queen);
        let enemy_diagonal =
            board.pieces_of(them, Piece::Bishop) | board.pieces_of(them, Piece::Queen);

        let mut rays = [Bitboard::EMPTY; 8];
        let mut pinned = Bitboard::EMPTY;
        let mut checkers = Bitboard::EMPTY;

        for dir in Direction::ALL {
            let open_ray = ray(dir, king_sq);
            let sliders = if dir.is_orthogonal() {
                enemy_orthogonal
            } else {
                enemy_diagonal
            };
            if !open_ray.intersects(sliders) {
                continue;
            }

            let blockers = open_ray & occupancy;
            let first = if dir.is_increasing() {
                blockers.lsb()
            } else {
                blockers.msb()
            };
            let first_bb = bit_for_square(first);

            if sliders.intersects(first_bb) {
                // Nothing between the king and the slider: check ray
                rays[dir.index()] = between(king_sq, first) | first_bb;
                checkers |= first_bb;
            } else if own.intersects(first_bb) {
                // Own piece nearest; pinned if the next blocker is a slider
                let beyond = blockers ^ first_bb;
                if beyond.any() {
                    let second = if dir.is_increasing() {
                        beyond.lsb()
                    } else {
                        beyond.msb()
                    };
                    let second_bb = bit_for_square(second);
                    if sliders.intersects(second_bb) {
                        pinned |= first_bb;
                        rays[dir.index()] = between(king_sq, second) | second_bb;
                    }
                }
            }
        }

        let knight_checkers = knight_attacks(king_sq) & board.pieces_of(them, Piece::Knight);
        let pawn_checkers = pawn_attacks(us, king_sq) & board.pieces_of(them, Piece::Pawn);
        let contact = knight_checkers | pawn_checkers;
        checkers |= contact;

        let check_mask = match checkers.popcount() {
            0 => Bitboard::ALL,
            1 => between(king_sq, checkers.lsb()) | checkers,
            _ => Bitboard::EMPTY,
        };

        let ep_forbidden = Self::en_passant_exposures(
            board,
            us,
            king_sq,
            enemy_orthogonal,
            enemy_diagonal,
        );

        KingPinThreats {
            rays,
            pinned,
            checkers,
            contact_check: contact.any(),
            check_mask,
            ep_forbidden,
        }
    }

    /// Pawns that may not play the available en-passant capture.
    ///
    /// Simulates the capture on the occupancy alone: lift the capturing pawn
    /// and the victim, drop the pawn on the target square, then test whether
    /// an enemy slider now reaches the king. This covers the rank pin that
    /// only appears when both pawns leave the rank, as well as every
    /// ordinary pin of the capturing pawn.
    fn en_passant_exposures(
        board: &Board,
        us: Color,
        king_sq: Square,
        enemy_orthogonal: Bitboard,
        enemy_diagonal: Bitboard,
    ) -> Bitboard {
        let Some(ep) = board.en_passant_target() else {
            return Bitboard::EMPTY;
        };

        let victim_sq = match us {
            Color::White => Square::new(ep.rank() - 1, ep.file()),
            Color::Black => Square::new(ep.rank() + 1, ep.file()),
        };
        let victim_bb = bit_for_square(victim_sq);
        let ep_bb = bit_for_square(ep);

        let candidates =
            board.pieces_of(us, Piece::Pawn) & pawn_attacks(us.opponent(), ep);

        let mut forbidden = Bitboard::EMPTY;
        for from in candidates.iter() {
            let after = (board.all_occupancy() ^ bit_for_square(from) ^ victim_bb) | ep_bb;
            let exposed = (rook_attacks(king_sq, after) & enemy_orthogonal).any()
                || (bishop_attacks(king_sq, after) & enemy_diagonal).any();
            if exposed {
                forbidden |= bit_for_square(from);
            }
        }
        forbidden
    }

    #[inline]
    pub(crate) fn checkers(&self) -> Bitboard {
        self.checkers
    }

    #[inline]
    pub(crate) fn in_check(&self) -> bool {
        self.checkers.any()
    }

    #[inline]
    pub(crate) fn in_double_check(&self) -> bool {
        self.checkers.popcount() >= 2
    }

    #[inline]
    pub(crate) fn contact_check(&self) -> bool {
        self.contact_check
    }

    /// Capture-or-block targets that resolve a single check
    #[inline]
    pub(crate) fn check_mask(&self) -> Bitboard {
        self.check_mask
    }

    #[inline]
    pub(crate) fn pinned(&self) -> Bitboard {
        self.pinned
    }

    #[inline]
    pub(crate) fn ep_forbidden(&self) -> Bitboard {
        self.ep_forbidden
    }

    /// Squares a pinned piece may still move to: its pin ray, including the
    /// capture of the pinning slider. `ALL` for unpinned pieces.
    pub(crate) fn pin_mask(&self, sq: Square) -> Bitboard {
        if !self.pinned.contains(sq) {
            return Bitboard::ALL;
        }
        let bb = bit_for_square(sq);
        for ray in self.rays {
            if ray.intersects(bb) {
                return ray;
            }
        }
        // A pinned piece always sits on exactly one stored ray
        Bitboard::ALL
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_threats_in_start_position() {
        let board = Board::new();
        let threats = KingPinThreats::analyze(&board, Color::White);
        assert!(!threats.in_check());
        assert!(threats.pinned().is_empty());
        assert_eq!(threats.check_mask(), Bitboard::ALL);
        assert!(threats.ep_forbidden().is_empty());
    }

    #[test]
    fn test_orthogonal_pin() {
        // Black rook on e8 pins the white knight on e4 against the king on e1
        let board = Board::from_fen("4r2k/8/8/8/4N3/8/8/4K3 w - - 0 1");
        let threats = KingPinThreats::analyze(&board, Color::White);

        let knight_sq = Square::new(3, 4);
        assert!(!threats.in_check());
        assert!(threats.pinned().contains(knight_sq));

        let mask = threats.pin_mask(knight_sq);
        assert!(mask.contains(Square::new(7, 4))); // may capture the rook
        assert!(mask.contains(Square::new(4, 4))); // may stand on the ray
        assert!(!mask.contains(Square::new(5, 2))); // knight jumps leave the ray
    }

    #[test]
    fn test_diagonal_pin_allows_capture_of_pinner() {
        // The a4 queen pins the c2 bishop along the a4-d1 diagonal
        let board = Board::from_fen("7k/8/8/8/q7/8/2B5/3K4 w - - 0 1");
        let threats = KingPinThreats::analyze(&board, Color::White);

        let bishop_sq = Square::new(1, 2); // c2
        assert!(threats.pinned().contains(bishop_sq));
        let mask = threats.pin_mask(bishop_sq);
        assert!(mask.contains(Square::new(3, 0))); // capture the queen on a4
        assert!(mask.contains(Square::new(2, 1))); // b3 stays on the ray
        assert!(!mask.contains(Square::new(2, 3))); // d3 leaves the ray
    }

    #[test]
    fn test_blocked_ray_is_no_pin() {
        // Two own pieces between king and rook: neither is pinned
        let board = Board::from_fen("4r2k/8/8/4N3/4N3/8/8/4K3 w - - 0 1");
        let threats = KingPinThreats::analyze(&board, Color::White);
        assert!(threats.pinned().is_empty());
        assert!(!threats.in_check());
    }

    #[test]
    fn test_slider_check_mask_includes_block_and_capture() {
        // Rook e8 checks the king on e1; e2..e7 block, e8 captures
        let board = Board::from_fen("4r2k/8/8/8/8/8/8/4K3 w - - 0 1");
        let threats = KingPinThreats::analyze(&board, Color::White);

        assert!(threats.in_check());
        assert!(!threats.in_double_check());
        assert!(!threats.contact_check());
        let mask = threats.check_mask();
        assert_eq!(mask.popcount(), 7);
        assert!(mask.contains(Square::new(7, 4)));
        assert!(mask.contains(Square::new(1, 4)));
        assert!(!mask.contains(Square::new(0, 4)));
    }

    #[test]
    fn test_knight_check_mask_is_capture_only() {
        let board = Board::from_fen("7k/8/8/8/8/3n4/8/4K3 w - - 0 1");
        let threats = KingPinThreats::analyze(&board, Color::White);

        assert!(threats.in_check());
        assert!(threats.contact_check());
        assert_eq!(threats.check_mask(), Bitboard::from_square(Square::new(2, 3)));
    }

    #[test]
    fn test_pawn_check() {
        let board = Board::from_fen("7k/8/8/8/8/3p4/4K3/8 w - - 0 1");
        let threats = KingPinThreats::analyze(&board, Color::White);
        assert!(threats.in_check());
        assert!(threats.contact_check());
        assert_eq!(threats.check_mask(), Bitboard::from_square(Square::new(2, 3)));
    }

    #[test]
    fn test_double_check() {
        // Rook on e8 and bishop on a5 both check the king on e1
        let board = Board::from_fen("4r2k/8/8/q7/8/8/8/4K3 w - - 0 1");
        let threats = KingPinThreats::analyze(&board, Color::White);
        assert!(threats.in_double_check());
        assert_eq!(threats.check_mask(), Bitboard::EMPTY);
    }

    #[test]
    fn test_en_passant_rank_exposure_forbidden() {
        // The classic case: both pawns leave rank 5 and the rook hits the king
        let board = Board::from_fen("8/8/8/KPp4r/8/8/8/7k w - c6 0 2");
        let threats = KingPinThreats::analyze(&board, Color::White);
        assert!(threats.ep_forbidden().contains(Square::new(4, 1)));
    }

    #[test]
    fn test_en_passant_allowed_without_exposure() {
        let board =
            Board::from_fen("rnbqkbnr/ppp1p1pp/8/3pPp2/8/8/PPPP1PPP/RNBQKBNR w KQkq f6 0 3");
        let threats = KingPinThreats::analyze(&board, Color::White);
        assert!(threats.ep_forbidden().is_empty());
    }

    #[test]
    fn test_en_passant_file_exposure_forbidden() {
        // Capturing exd6 would pull the e5 pawn off the e-file and expose
        // the king on e1 to the rook on e8
        let board = Board::from_fen("4r2k/8/8/3pP3/8/8/8/4K3 w - d6 0 2");
        let threats = KingPinThreats::analyze(&board, Color::White);
        assert!(threats.ep_forbidden().contains(Square::new(4, 4)));
    }

    #[test]
    fn test_en_passant_along_pin_ray_stays_legal() {
        // The bishop on b8 pins the e5 pawn against the king on g3, but the
        // capture exd6 travels along that same diagonal and keeps the king
        // covered: the landing pawn blocks the ray the victim vacated
        let board = Board::from_fen("1b5k/8/8/3pP3/8/6K1/8/8 w - d6 0 2");
        let threats = KingPinThreats::analyze(&board, Color::White);
        assert!(threats.pinned().contains(Square::new(4, 4)));
        assert!(threats.ep_forbidden().is_empty());
    }
}

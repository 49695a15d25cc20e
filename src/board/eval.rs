//! Tapered position evaluation.
//!
//! Material, piece-square tables, pawn structure, a light king-safety term
//! and a mop-up term for won endgames, blended between middlegame and
//! endgame by the remaining non-pawn material. Pure function of the
//! position; the score is from the side to move's perspective.

use super::masks::{ADJACENT_FILES, FILES, PASSED_PAWN_MASK};
use super::pst::{pst_index, PHASE_TOTAL, PHASE_WEIGHTS, PST_EG, PST_MG};
use super::state::Board;
use super::types::{Color, Piece};

/// Side-to-move bonus
const TEMPO_BONUS: i32 = 15;

/// Per extra pawn on a file
const DOUBLED_PAWN_PENALTY: i32 = 12;

/// Pawn with no friendly pawns on adjacent files
const ISOLATED_PAWN_PENALTY: i32 = 15;

/// Passed-pawn bonus by rank of advancement (rank from own side)
const PASSED_PAWN_MG: [i32; 8] = [0, 5, 10, 20, 35, 60, 100, 0];
const PASSED_PAWN_EG: [i32; 8] = [0, 10, 20, 40, 70, 120, 200, 0];

/// King standing on a fully open file (no pawns of either color)
const KING_OPEN_FILE_PENALTY: i32 = 25;

/// King standing on a semi-open file (no own pawns)
const KING_SEMI_OPEN_FILE_PENALTY: i32 = 15;

/// Endgame king activity: per point of distance from the center
const KING_ACTIVITY_PENALTY: i32 = 8;

/// Material edge required before the mop-up term kicks in
const MOP_UP_MATERIAL_EDGE: i32 = 400;

/// Accumulated middlegame/endgame score pair.
#[derive(Clone, Copy, Default)]
struct TaperedScore {
    mg: i32,
    eg: i32,
}

impl TaperedScore {
    #[inline]
    fn add(&mut self, mg: i32, eg: i32) {
        self.mg += mg;
        self.eg += eg;
    }
}

impl Board {
    /// Evaluate the position in centipawns from the side to move's
    /// perspective.
    #[must_use]
    pub fn evaluate(&self) -> i32 {
        let mut score = TaperedScore::default();
        let mut phase = 0i32;

        for color in Color::BOTH {
            let sign = if color == Color::White { 1 } else { -1 };
            let is_white = color == Color::White;

            for piece in Piece::ALL {
                let value = piece.value();
                let p_idx = piece.index();
                for sq in self.pieces_of(color, piece).iter() {
                    let cell = pst_index(sq.index(), is_white);
                    score.add(
                        sign * (value + PST_MG[p_idx][cell]),
                        sign * (value + PST_EG[p_idx][cell]),
                    );
                    phase += PHASE_WEIGHTS[p_idx];
                }
            }

            let (pawn_mg, pawn_eg) = self.pawn_structure(color);
            score.add(sign * pawn_mg, sign * pawn_eg);

            let (king_mg, king_eg) = self.king_terms(color);
            score.add(sign * king_mg, sign * king_eg);
        }

        let phase = phase.min(PHASE_TOTAL);

        // Mop-up: reward driving the losing king to the edge in endgames
        // decided on material
        if phase <= 8 {
            let material_balance = self.material_balance();
            if material_balance.abs() >= MOP_UP_MATERIAL_EDGE {
                let winner = if material_balance > 0 {
                    Color::White
                } else {
                    Color::Black
                };
                let sign = if winner == Color::White { 1 } else { -1 };
                score.add(0, sign * self.mop_up(winner));
            }
        }

        let blended = (score.mg * phase + score.eg * (PHASE_TOTAL - phase)) / PHASE_TOTAL;
        let white_score = blended;

        let stm_score = if self.white_to_move() {
            white_score
        } else {
            -white_score
        };
        stm_score + TEMPO_BONUS
    }

    /// Material count difference, White minus Black
    fn material_balance(&self) -> i32 {
        let mut balance = 0;
        for piece in Piece::ALL {
            balance += piece.value()
                * (self.pieces_of(Color::White, piece).popcount() as i32
                    - self.pieces_of(Color::Black, piece).popcount() as i32);
        }
        balance
    }

    /// Doubled/isolated penalties and passed-pawn bonuses for one side
    fn pawn_structure(&self, color: Color) -> (i32, i32) {
        let own_pawns = self.pieces_of(color, Piece::Pawn);
        let enemy_pawns = self.pieces_of(color.opponent(), Piece::Pawn);
        let mut mg = 0;
        let mut eg = 0;

        for file in 0..8 {
            let on_file = (own_pawns & FILES[file]).popcount() as i32;
            if on_file > 1 {
                mg -= DOUBLED_PAWN_PENALTY * (on_file - 1);
                eg -= DOUBLED_PAWN_PENALTY * (on_file - 1);
            }
            if on_file > 0 && (own_pawns & ADJACENT_FILES[file]).is_empty() {
                mg -= ISOLATED_PAWN_PENALTY * on_file;
                eg -= ISOLATED_PAWN_PENALTY * on_file;
            }
        }

        for sq in own_pawns.iter() {
            if (enemy_pawns & PASSED_PAWN_MASK[color.index()][sq.index()]).is_empty() {
                let advancement = match color {
                    Color::White => sq.rank(),
                    Color::Black => 7 - sq.rank(),
                };
                mg += PASSED_PAWN_MG[advancement];
                eg += PASSED_PAWN_EG[advancement];
            }
        }

        (mg, eg)
    }

    /// Open-file exposure in the middlegame, activity in the endgame
    fn king_terms(&self, color: Color) -> (i32, i32) {
        let king_sq = self.king_square(color);
        let own_pawns = self.pieces_of(color, Piece::Pawn);
        let enemy_pawns = self.pieces_of(color.opponent(), Piece::Pawn);
        let king_file = FILES[king_sq.file()];

        let mut mg = 0;
        if (own_pawns & king_file).is_empty() {
            if (enemy_pawns & king_file).is_empty() {
                mg -= KING_OPEN_FILE_PENALTY;
            } else {
                mg -= KING_SEMI_OPEN_FILE_PENALTY;
            }
        }

        let eg = -KING_ACTIVITY_PENALTY * king_sq.manhattan_center_distance();

        (mg, eg)
    }

    /// Bonus for the winning side: losing king near the edge, kings close
    fn mop_up(&self, winner: Color) -> i32 {
        let winner_king = self.king_square(winner);
        let loser_king = self.king_square(winner.opponent());
        let edge_drive = 10 * loser_king.manhattan_center_distance();
        let king_approach = 4 * (14 - winner_king.manhattan_distance(loser_king));
        edge_drive + king_approach
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_position_is_balanced() {
        let board = Board::new();
        // Symmetric position: only the tempo bonus remains
        assert_eq!(board.evaluate(), TEMPO_BONUS);
    }

    #[test]
    fn test_evaluation_is_symmetric_in_sign() {
        // Mirrored sides to move on a symmetric position agree
        let white = Board::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1");
        let black = Board::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR b KQkq - 0 1");
        assert_eq!(white.evaluate(), black.evaluate());
    }

    #[test]
    fn test_material_advantage_dominates() {
        // White is up a queen
        let board = Board::from_fen("4k3/8/8/8/8/8/8/Q3K3 w - - 0 1");
        assert!(board.evaluate() > 800);

        // Same position from Black's perspective is lost
        let board = Board::from_fen("4k3/8/8/8/8/8/8/Q3K3 b - - 0 1");
        assert!(board.evaluate() < -800);
    }

    #[test]
    fn test_evaluation_is_pure() {
        let board =
            Board::from_fen("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1");
        let first = board.evaluate();
        assert_eq!(board.evaluate(), first);
        assert_eq!(board.evaluate(), first);
    }

    #[test]
    fn test_doubled_pawns_penalized() {
        // Tripled e-pawns vs a healthy structure, otherwise symmetric kings
        let doubled = Board::from_fen("4k3/8/8/8/4P3/4P3/4P3/4K3 w - - 0 1");
        let healthy = Board::from_fen("4k3/8/8/8/8/2P5/3PP3/4K3 w - - 0 1");
        assert!(healthy.evaluate() > doubled.evaluate());
    }

    #[test]
    fn test_passed_pawn_rewarded() {
        // A far-advanced passed pawn vs the same pawn at home
        let advanced = Board::from_fen("4k3/8/1P6/8/8/8/8/4K3 w - - 0 1");
        let home = Board::from_fen("4k3/8/8/8/8/8/1P6/4K3 w - - 0 1");
        assert!(advanced.evaluate() > home.evaluate());
    }

    #[test]
    fn test_mop_up_drives_king_to_edge() {
        // KQ vs K: the losing king cornered scores better for White than
        // the losing king in the center, with kings equally far apart
        let cornered = Board::from_fen("7k/8/5K2/8/8/8/8/Q7 w - - 0 1");
        let central = Board::from_fen("8/8/4k3/8/4K3/8/8/Q7 w - - 0 1");
        assert!(cornered.evaluate() > central.evaluate() - 100);
    }
}

//! Null-move pruning.

use super::constants::{MATE_BOUND, NMP_MIN_DEPTH};
use super::negamax::SearchContext;

impl SearchContext<'_> {
    /// Give the opponent a free move; if the reduced search still fails
    /// high, this node is good enough to prune.
    ///
    /// Skipped in check (illegal), at low depth, with mate-bound windows
    /// (mate distances shift), and without non-pawn material (zugzwang).
    /// The caller guarantees the side to move is not in check and that the
    /// previous move was not itself a null move.
    pub(super) fn try_null_move(&mut self, depth: i32, ply: usize, beta: i32) -> Option<i32> {
        if ply == 0
            || depth < NMP_MIN_DEPTH
            || beta.abs() >= MATE_BOUND
            || !self.board.has_non_pawn_material(self.board.side_to_move())
        {
            return None;
        }

        let reduction = if depth >= 6 { 3 } else { 2 };

        let info = self.board.make_null_move();
        let score = -self.negamax(depth - 1 - reduction, ply + 1, -beta, -beta + 1, false);
        self.board.unmake_null_move(info);

        if self.aborted {
            return None;
        }

        if score >= beta {
            return Some(beta);
        }

        None
    }
}

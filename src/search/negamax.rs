//! The negamax node function: alpha-beta with PVS, check extension,
//! null-move pruning and late-move reductions.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use crate::board::{Board, Move, Square, MAX_PLY};
use crate::tt::BoundType;

use super::constants::{
    score_from_tt, score_to_tt, DRAW_SCORE, LMR_MIN_DEPTH, LMR_MOVE_THRESHOLD, MATE_SCORE,
};
use super::{order, SearchState};

/// Mutable state for one search invocation.
pub(crate) struct SearchContext<'a> {
    pub(crate) board: &'a mut Board,
    pub(crate) state: &'a mut SearchState,
    pub(crate) stop: &'a AtomicBool,
    pub(crate) start_time: Instant,
    /// 0 = no time limit
    pub(crate) budget_ms: u64,
    /// 0 = no node limit
    pub(crate) node_limit: u64,
    pub(crate) nodes: u64,
    pub(crate) seldepth: u32,
    pub(crate) tt_hits: u64,
    /// Target square of the move made at each ply, for recapture ordering
    pub(crate) move_targets: [Option<Square>; MAX_PLY],
    /// Set once a limit fires; interrupted nodes unwind with their best
    /// score found so far
    pub(crate) aborted: bool,
}

impl SearchContext<'_> {
    pub(crate) fn new<'a>(
        board: &'a mut Board,
        state: &'a mut SearchState,
        stop: &'a AtomicBool,
        budget_ms: u64,
        node_limit: u64,
    ) -> SearchContext<'a> {
        SearchContext {
            board,
            state,
            stop,
            start_time: Instant::now(),
            budget_ms,
            node_limit,
            nodes: 0,
            seldepth: 0,
            tt_hits: 0,
            move_targets: [None; MAX_PLY],
            aborted: false,
        }
    }

    pub(crate) fn elapsed_ms(&self) -> u64 {
        self.start_time.elapsed().as_millis() as u64
    }

    /// Poll the stop conditions. Time is only checked every 1024 nodes.
    #[inline]
    pub(crate) fn should_stop(&mut self) -> bool {
        if self.aborted {
            return true;
        }
        if self.stop.load(Ordering::Relaxed) {
            self.aborted = true;
            return true;
        }
        if self.node_limit > 0 && self.nodes >= self.node_limit {
            self.aborted = true;
            return true;
        }
        if self.budget_ms > 0
            && self.nodes.trailing_zeros() >= 10
            && self.elapsed_ms() >= self.budget_ms
        {
            self.aborted = true;
            return true;
        }
        false
    }

    #[inline]
    pub(super) fn bump_seldepth(&mut self, ply: usize) {
        let reached = ply as u32 + 1;
        if reached > self.seldepth {
            self.seldepth = reached;
        }
    }

    /// Alpha-beta search to `depth` plies below this node.
    pub(crate) fn negamax(
        &mut self,
        mut depth: i32,
        ply: usize,
        mut alpha: i32,
        beta: i32,
        allow_null: bool,
    ) -> i32 {
        let is_root = ply == 0;

        // Draws by repetition or the fifty-move rule end the line
        if !is_root
            && (self.board.is_repetition() || self.board.halfmove_clock() >= 100)
        {
            return DRAW_SCORE;
        }

        if ply >= MAX_PLY - 1 {
            return self.board.evaluate();
        }

        // Probe the table. The stored move orders first even when the entry
        // cannot cut; mate scores are re-anchored to this ply.
        let mut tt_move = Move::null();
        if let Some(entry) = self.state.tt.probe(self.board.hash()) {
            tt_move = entry.best_move;
            if !is_root && entry.depth as i32 >= depth {
                let score = score_from_tt(entry.score, ply);
                let cutoff = match entry.bound {
                    BoundType::Exact => true,
                    BoundType::LowerBound => score >= beta,
                    BoundType::UpperBound => score <= alpha,
                    BoundType::None => false,
                };
                if cutoff {
                    self.tt_hits += 1;
                    return score;
                }
            }
        }

        if depth <= 0 {
            return self.quiesce(alpha, beta, ply, 0);
        }

        self.nodes += 1;
        self.bump_seldepth(ply);
        if self.should_stop() {
            return alpha;
        }

        let us = self.board.side_to_move();
        let in_check = self.board.is_in_check(us);
        if in_check {
            depth += 1;
        }

        if allow_null && !in_check {
            if let Some(score) = self.try_null_move(depth, ply, beta) {
                return score;
            }
        }

        let moves = self.board.generate_moves();
        if moves.is_empty() {
            return if in_check {
                -MATE_SCORE + ply as i32
            } else {
                DRAW_SCORE
            };
        }

        let prev_target = if ply > 0 { self.move_targets[ply - 1] } else { None };
        let mut ranked =
            order::order_moves(self.board, self.state, &moves, tt_move, ply, prev_target);

        let mut best_move = Move::null();
        let mut raised_alpha = false;

        let mut index = 0;
        while let Some(ranked_move) = ranked.pick_best(index) {
            let mv = ranked_move.mv;
            let gives_check = ranked_move.gives_check;

            let info = self.board.make_move(mv);
            self.move_targets[ply] = Some(mv.to());

            let score = if index == 0 {
                -self.negamax(depth - 1, ply + 1, -beta, -alpha, true)
            } else {
                // Late-move reduction: quiet, non-checking, non-killer moves
                // deep in the ordering get a one-ply reduced probe first
                let reduce = depth >= LMR_MIN_DEPTH
                    && index >= LMR_MOVE_THRESHOLD
                    && mv.is_quiet()
                    && !in_check
                    && !gives_check
                    && !self.state.is_killer(ply, mv);

                let mut score = if reduce {
                    -self.negamax(depth - 2, ply + 1, -alpha - 1, -alpha, true)
                } else {
                    -self.negamax(depth - 1, ply + 1, -alpha - 1, -alpha, true)
                };

                // Reduced probe beat alpha: repeat at full depth
                if reduce && score > alpha {
                    score = -self.negamax(depth - 1, ply + 1, -alpha - 1, -alpha, true);
                }
                // Null-window search found an improvement inside an open
                // window: re-search with the full window
                if score > alpha && score < beta {
                    score = -self.negamax(depth - 1, ply + 1, -beta, -alpha, true);
                }
                score
            };

            self.board.unmake_move(mv, info);

            // Abandon the line but keep the best score found so far
            if self.aborted {
                return alpha;
            }

            if score >= beta {
                if !self.should_stop() {
                    self.state.tt.store(
                        self.board.hash(),
                        mv,
                        score_to_tt(beta, ply),
                        depth.max(0) as u32,
                        BoundType::LowerBound,
                    );
                }
                if mv.is_quiet() {
                    self.state.update_killers(ply, mv);
                    self.state.update_history(us, mv, depth);
                }
                return beta;
            }

            if score > alpha {
                alpha = score;
                best_move = mv;
                raised_alpha = true;
            }

            index += 1;
        }

        if !self.should_stop() {
            let bound = if raised_alpha {
                BoundType::Exact
            } else {
                BoundType::UpperBound
            };
            self.state.tt.store(
                self.board.hash(),
                best_move,
                score_to_tt(alpha, ply),
                depth.max(0) as u32,
                bound,
            );
        }

        alpha
    }
}

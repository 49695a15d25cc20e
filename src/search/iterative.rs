//! Iterative deepening driver and principal-variation extraction.

use std::sync::atomic::AtomicBool;

use crate::board::{Board, Move};

use super::constants::{is_mate_score, mate_in, SCORE_INFINITE};
use super::negamax::SearchContext;
use super::{
    SearchConfig, SearchInfoCallback, SearchIterationInfo, SearchResult, SearchState,
};

/// Run an iterative-deepening search on `board`.
///
/// Deepens one ply at a time with a full window at the root; after each
/// completed iteration the best move is read back from the transposition
/// table and validated against the root move list. Results of an iteration
/// interrupted by time, nodes or `stop` are discarded, so the returned move
/// always comes from a fully-searched depth.
pub fn search(
    board: &mut Board,
    state: &mut SearchState,
    config: &SearchConfig,
    stop: &AtomicBool,
    info: Option<&SearchInfoCallback>,
) -> SearchResult {
    state.new_search();

    let root_moves = board.generate_moves();
    if root_moves.is_empty() {
        return SearchResult {
            best_move: None,
            ponder_move: None,
            score: 0,
            mate_in: None,
        };
    }

    let mut ctx = SearchContext::new(board, state, stop, config.budget_ms, config.node_limit);

    let mut best_move = root_moves.first();
    let mut best_score = 0;
    let mut pv: Vec<Move> = Vec::new();

    let max_depth = config.max_depth.max(1);
    for depth in 1..=max_depth {
        let score = ctx.negamax(depth as i32, 0, -SCORE_INFINITE, SCORE_INFINITE, true);

        // Partial iterations are unreliable past depth 1; a cut-short first
        // iteration is kept only once a root move has actually been scored
        if ctx.aborted && (depth > 1 || score <= -SCORE_INFINITE) {
            break;
        }

        best_score = score;
        if let Some(entry) = ctx.state.tt.probe(ctx.board.hash()) {
            if !entry.best_move.is_null() && root_moves.contains(entry.best_move) {
                best_move = Some(entry.best_move);
            }
        }

        pv = extract_pv(&mut ctx, best_move, depth as usize);

        if let Some(callback) = info {
            let elapsed = ctx.elapsed_ms();
            let nps = if elapsed > 0 {
                ctx.nodes * 1000 / elapsed
            } else {
                0
            };
            callback(&SearchIterationInfo {
                depth,
                seldepth: ctx.seldepth,
                score,
                mate_in: mate_in(score),
                nodes: ctx.nodes,
                nps,
                time_ms: elapsed,
                hashfull: ctx.state.tt.hashfull_per_mille(),
                pv: format_pv(&pv),
            });
        }

        // A forced mate cannot improve with more depth
        if is_mate_score(score) {
            break;
        }

        if ctx.aborted {
            break;
        }
        if config.budget_ms > 0 && ctx.elapsed_ms() >= config.budget_ms {
            break;
        }
    }

    ctx.state.stats.nodes = ctx.nodes;
    ctx.state.stats.seldepth = ctx.seldepth;
    ctx.state.stats.tt_hits = ctx.tt_hits;

    let ponder_move = pv.get(1).copied();

    SearchResult {
        best_move,
        ponder_move,
        score: best_score,
        mate_in: mate_in(best_score),
    }
}

/// Walk the transposition table from the root, following best moves while
/// they stay legal, to reconstruct the principal variation.
fn extract_pv(ctx: &mut SearchContext<'_>, first: Option<Move>, max_len: usize) -> Vec<Move> {
    let mut pv = Vec::with_capacity(max_len);
    let mut undo_stack = Vec::with_capacity(max_len);
    let mut seen_hashes = Vec::with_capacity(max_len);

    // The validated root move leads; the table fills in the rest
    if let Some(first_move) = first {
        if ctx.board.is_legal_move(first_move) {
            seen_hashes.push(ctx.board.hash());
            pv.push(first_move);
            let info = ctx.board.make_move(first_move);
            undo_stack.push((first_move, info));
        }
    }

    while pv.len() < max_len {
        let hash = ctx.board.hash();
        // Table cycles would loop forever
        if seen_hashes.contains(&hash) {
            break;
        }

        let Some(entry) = ctx.state.tt.probe(hash) else {
            break;
        };
        let mv = entry.best_move;
        if mv.is_null() || !ctx.board.is_legal_move(mv) {
            break;
        }

        seen_hashes.push(hash);
        pv.push(mv);
        let info = ctx.board.make_move(mv);
        undo_stack.push((mv, info));
    }

    while let Some((mv, info)) = undo_stack.pop() {
        ctx.board.unmake_move(mv, info);
    }

    pv
}

fn format_pv(pv: &[Move]) -> String {
    pv.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicBool;

    fn run(fen: &str, depth: u32) -> SearchResult {
        let mut board = Board::from_fen(fen);
        let mut state = SearchState::new(8);
        let stop = AtomicBool::new(false);
        search(&mut board, &mut state, &SearchConfig::depth(depth), &stop, None)
    }

    #[test]
    fn test_search_returns_legal_move_from_startpos() {
        let result = run("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1", 3);
        let best = result.best_move.expect("startpos has moves");
        assert!(Board::new().is_legal_move(best));
    }

    #[test]
    fn test_search_restores_board() {
        let fen = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";
        let mut board = Board::from_fen(fen);
        let before = board.clone();
        let mut state = SearchState::new(8);
        let stop = AtomicBool::new(false);
        let _ = search(&mut board, &mut state, &SearchConfig::depth(4), &stop, None);
        assert_eq!(board, before);
    }

    #[test]
    fn test_mate_in_one_found() {
        // Back-rank mate: Ra8#
        let result = run("6k1/5ppp/8/8/8/8/8/R3K3 w - - 0 1", 3);
        assert_eq!(result.best_move.unwrap().to_string(), "a1a8");
        assert_eq!(result.mate_in, Some(1));
    }

    #[test]
    fn test_mated_position_reports_negative_mate() {
        // Whatever White plays, the queen and rook mate next move, so the
        // score is a negative mate score
        let result = run("7k/8/8/8/8/5q2/7r/K7 w - - 0 1", 4);
        assert!(result.best_move.is_some());
        assert!(result.mate_in.map_or(false, |m| m < 0));
    }

    #[test]
    fn test_stalemate_position_has_no_moves() {
        // The c7 queen boxes in the a8 king without checking it
        let result = run("k7/2Q5/8/8/8/8/8/2K5 b - - 0 1", 3);
        assert!(result.best_move.is_none());
    }

    #[test]
    fn test_node_limit_stops_search() {
        let mut board = Board::new();
        let mut state = SearchState::new(8);
        let stop = AtomicBool::new(false);
        let config = SearchConfig::depth(64).with_nodes(2_000);
        let result = search(&mut board, &mut state, &config, &stop, None);
        assert!(result.best_move.is_some());
        // Node accounting stays in the same order of magnitude as the limit
        assert!(state.stats.nodes < 200_000);
    }

    #[test]
    fn test_time_budget_stops_search() {
        let mut board = Board::new();
        let mut state = SearchState::new(8);
        let stop = AtomicBool::new(false);
        let start = std::time::Instant::now();
        let result = search(&mut board, &mut state, &SearchConfig::budget(50), &stop, None);
        assert!(result.best_move.is_some());
        // Depth 64 would take ages; the budget has to cut in well before
        assert!(start.elapsed().as_secs() < 30);
    }

    #[test]
    fn test_preset_stop_flag_still_yields_a_move() {
        let mut board = Board::new();
        let mut state = SearchState::new(8);
        let stop = AtomicBool::new(true);
        let result = search(&mut board, &mut state, &SearchConfig::depth(6), &stop, None);
        assert!(result.best_move.is_some());
    }
}

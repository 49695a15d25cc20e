//! The engine controller: owns the position and the search state, runs
//! searches on a worker thread, and relays results to the UCI layer.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;

use log::debug;
use parking_lot::Mutex;

use crate::board::Board;
use crate::search::{
    search, SearchConfig, SearchInfoCallback, SearchIterationInfo, SearchState,
    DEFAULT_MAX_DEPTH,
};

use super::time::{TimeControl, TimeManager, DEFAULT_MOVE_OVERHEAD_MS};
use super::GoParams;

pub struct Engine {
    board: Board,
    /// Shared with the worker thread for the duration of a search; the
    /// transposition table inside persists across `go` commands
    state: Arc<Mutex<SearchState>>,
    stop: Arc<AtomicBool>,
    worker: Option<JoinHandle<()>>,
    move_overhead_ms: u64,
}

impl Engine {
    #[must_use]
    pub fn new(hash_mb: usize) -> Self {
        Engine {
            board: Board::new(),
            state: Arc::new(Mutex::new(SearchState::new(hash_mb))),
            stop: Arc::new(AtomicBool::new(false)),
            worker: None,
            move_overhead_ms: DEFAULT_MOVE_OVERHEAD_MS,
        }
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Replace the current position. Any running search is stopped first.
    pub fn set_position(&mut self, board: Board) {
        self.abort_search();
        self.board = board;
    }

    /// Reset for a new game: fresh position, cleared tables.
    pub fn new_game(&mut self) {
        self.abort_search();
        self.board = Board::new();
        self.state.lock().clear();
    }

    /// Resize the transposition table to `hash_mb` megabytes.
    pub fn set_hash_size(&mut self, hash_mb: usize) {
        self.abort_search();
        self.state.lock().resize_tt(hash_mb);
    }

    pub fn set_move_overhead(&mut self, overhead_ms: u64) {
        self.move_overhead_ms = overhead_ms;
    }

    /// Start a search for the `go` parameters; `bestmove` is printed by the
    /// worker thread when the search ends.
    pub fn go(&mut self, params: GoParams) {
        self.abort_search();

        let control = Self::time_control(&self.board, &params);
        let manager = TimeManager::start(control, self.move_overhead_ms);

        let max_depth = params
            .depth
            // A mate-in-K request needs 2K plies of depth
            .or(params.mate.map(|k| 2 * k))
            .unwrap_or(DEFAULT_MAX_DEPTH);
        let config = SearchConfig {
            max_depth,
            budget_ms: manager.budget_for_search(),
            node_limit: params.nodes.unwrap_or(0),
        };
        debug!(
            "go: depth {} budget {}ms nodes {}",
            config.max_depth, config.budget_ms, config.node_limit
        );

        self.stop.store(false, Ordering::Relaxed);

        let mut board = self.board.clone();
        let state = Arc::clone(&self.state);
        let stop = Arc::clone(&self.stop);

        self.worker = Some(std::thread::spawn(move || {
            let info: SearchInfoCallback = Arc::new(print_info_line);
            let result = {
                let mut state = state.lock();
                search(&mut board, &mut state, &config, &stop, Some(&info))
            };

            match (result.best_move, result.ponder_move) {
                (Some(best), Some(ponder)) => println!("bestmove {best} ponder {ponder}"),
                (Some(best), None) => println!("bestmove {best}"),
                // Terminal position: only the null move remains
                (None, _) => println!("bestmove 0000"),
            }
        }));
    }

    /// Raise the stop flag and wait for the worker to print its bestmove.
    pub fn stop_search(&mut self) {
        self.abort_search();
    }

    /// Stop and discard the worker. Used before mutating shared state.
    fn abort_search(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(handle) = self.worker.take() {
            let _ = handle.join();
        }
    }

    /// True while a search thread is running.
    #[must_use]
    pub fn is_searching(&self) -> bool {
        self.worker
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    fn time_control(board: &Board, params: &GoParams) -> TimeControl {
        if params.infinite {
            return TimeControl::Infinite;
        }
        if let Some(time_ms) = params.movetime_ms {
            return TimeControl::MoveTime { time_ms };
        }

        let (remaining, increment) = if board.white_to_move() {
            (params.wtime_ms, params.winc_ms)
        } else {
            (params.btime_ms, params.binc_ms)
        };
        if let Some(remaining_ms) = remaining {
            return TimeControl::Incremental {
                remaining_ms,
                increment_ms: increment.unwrap_or(0),
                moves_to_go: params.movestogo,
            };
        }

        if params.depth.is_some() || params.mate.is_some() || params.nodes.is_some() {
            TimeControl::FixedDepth
        } else {
            // Bare `go`: run until `stop`
            TimeControl::Infinite
        }
    }
}

impl Drop for Engine {
    fn drop(&mut self) {
        self.abort_search();
    }
}

/// One `info` line per completed iteration, per the UCI protocol.
fn print_info_line(info: &SearchIterationInfo) {
    let score = match info.mate_in {
        Some(mate) => format!("mate {mate}"),
        None => format!("cp {}", info.score),
    };
    println!(
        "info depth {} seldepth {} score {} nodes {} nps {} time {} hashfull {} pv {}",
        info.depth,
        info.seldepth,
        score,
        info.nodes,
        info.nps,
        info.time_ms,
        info.hashfull,
        info.pv
    );
}

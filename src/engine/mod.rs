//! Engine orchestration: search thread control and time management.

mod controller;
mod time;

pub use controller::Engine;
pub use time::{TimeControl, TimeManager, DEFAULT_MOVES_TO_GO, DEFAULT_MOVE_OVERHEAD_MS};

/// Parameters of a UCI `go` command, already tokenized.
#[derive(Debug, Clone, Copy, Default)]
pub struct GoParams {
    pub depth: Option<u32>,
    pub movetime_ms: Option<u64>,
    pub wtime_ms: Option<u64>,
    pub btime_ms: Option<u64>,
    pub winc_ms: Option<u64>,
    pub binc_ms: Option<u64>,
    pub movestogo: Option<u64>,
    pub nodes: Option<u64>,
    pub mate: Option<u32>,
    pub infinite: bool,
}

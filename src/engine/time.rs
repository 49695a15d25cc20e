//! Per-move time budgeting.
//!
//! Turns the UCI clock parameters into a single millisecond budget and a
//! cancellation predicate the search polls.

use std::time::Instant;

/// Fallback when the GUI does not send `movestogo`
pub const DEFAULT_MOVES_TO_GO: u64 = 30;

/// Reserve for I/O latency between engine and GUI
pub const DEFAULT_MOVE_OVERHEAD_MS: u64 = 50;

/// Time control for one `go` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeControl {
    /// Search until stopped externally
    #[default]
    Infinite,
    /// Depth-limited search; no clock involved
    FixedDepth,
    /// Exactly this long per move
    MoveTime { time_ms: u64 },
    /// Remaining clock plus increment
    Incremental {
        remaining_ms: u64,
        increment_ms: u64,
        moves_to_go: Option<u64>,
    },
}

impl TimeControl {
    /// Compute the millisecond budget for this move. `None` means no time
    /// limit applies.
    ///
    /// For incremental clocks the budget is an even slice of the remaining
    /// time plus the increment, less the overhead reserve, clamped between
    /// 1 ms and 40% of the remaining clock.
    #[must_use]
    pub fn budget_ms(&self, overhead_ms: u64) -> Option<u64> {
        match *self {
            TimeControl::Infinite | TimeControl::FixedDepth => None,
            TimeControl::MoveTime { time_ms } => {
                Some(time_ms.saturating_sub(overhead_ms).max(1))
            }
            TimeControl::Incremental {
                remaining_ms,
                increment_ms,
                moves_to_go,
            } => {
                let slices = moves_to_go.unwrap_or(DEFAULT_MOVES_TO_GO).max(1);
                let base = remaining_ms / slices + increment_ms;
                let budget = base.saturating_sub(overhead_ms);
                let ceiling = (remaining_ms * 2 / 5).max(1);
                Some(budget.clamp(1, ceiling))
            }
        }
    }
}

/// Owns the budget for one search and answers "should we stop?".
#[derive(Debug)]
pub struct TimeManager {
    start: Instant,
    budget_ms: Option<u64>,
}

impl TimeManager {
    #[must_use]
    pub fn start(control: TimeControl, overhead_ms: u64) -> Self {
        TimeManager {
            start: Instant::now(),
            budget_ms: control.budget_ms(overhead_ms),
        }
    }

    /// The budget in milliseconds, 0 when unlimited (search convention)
    #[must_use]
    pub fn budget_for_search(&self) -> u64 {
        self.budget_ms.unwrap_or(0)
    }

    /// Cancellation predicate on an externally measured elapsed time
    #[must_use]
    pub fn should_stop(&self, elapsed_ms: u64) -> bool {
        self.budget_ms.is_some_and(|budget| elapsed_ms >= budget)
    }

    /// Milliseconds since this manager was started
    #[must_use]
    pub fn elapsed_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }
}

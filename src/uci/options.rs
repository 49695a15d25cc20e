//! UCI option registry and `setoption` handling.

use log::warn;

use crate::search::DEFAULT_TT_MB;

/// `Hash` upper bound in megabytes
pub const MAX_HASH_MB: usize = 1024;

/// Action the engine controller must take after an option change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionAction {
    ResizeHash(usize),
    SetMoveOverhead(u64),
    None,
}

/// Current option values.
pub struct UciOptions {
    pub hash_mb: usize,
    pub threads: usize,
    pub move_overhead_ms: u64,
}

impl UciOptions {
    #[must_use]
    pub fn new() -> Self {
        UciOptions {
            hash_mb: DEFAULT_TT_MB,
            threads: 1,
            move_overhead_ms: crate::engine::DEFAULT_MOVE_OVERHEAD_MS,
        }
    }

    /// Print the handshake block: identity, options, `uciok`.
    pub fn print_handshake(&self) {
        println!("id name {} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
        println!("id author the ironclad developers");
        println!(
            "option name Hash type spin default {} min 1 max {}",
            DEFAULT_TT_MB, MAX_HASH_MB
        );
        println!("option name Threads type spin default 1 min 1 max 1");
        println!(
            "option name Move Overhead type spin default {} min 0 max 1000",
            crate::engine::DEFAULT_MOVE_OVERHEAD_MS
        );
        println!("uciok");
    }

    /// Apply a `setoption`. Out-of-range values clamp with a warning;
    /// unknown options are reported and skipped.
    pub fn apply(&mut self, name: &str, value: Option<&str>) -> OptionAction {
        match name.trim().to_ascii_lowercase().as_str() {
            "hash" => {
                let requested = value
                    .and_then(|v| v.parse::<usize>().ok())
                    .unwrap_or(DEFAULT_TT_MB);
                let clamped = requested.clamp(1, MAX_HASH_MB);
                if clamped != requested {
                    warn!("Hash {requested} MB out of range, clamped to {clamped}");
                    println!("info string Hash clamped to {clamped} MB");
                }
                self.hash_mb = clamped;
                OptionAction::ResizeHash(clamped)
            }
            "threads" => {
                // Single-threaded engine: accept only 1
                let requested = value.and_then(|v| v.parse::<usize>().ok()).unwrap_or(1);
                if requested != 1 {
                    println!("info string Threads fixed at 1");
                }
                self.threads = 1;
                OptionAction::None
            }
            "move overhead" => {
                let overhead = value
                    .and_then(|v| v.parse::<u64>().ok())
                    .unwrap_or(crate::engine::DEFAULT_MOVE_OVERHEAD_MS)
                    .min(1000);
                self.move_overhead_ms = overhead;
                OptionAction::SetMoveOverhead(overhead)
            }
            other => {
                println!("info string unknown option '{other}'");
                OptionAction::None
            }
        }
    }
}

impl Default for UciOptions {
    fn default() -> Self {
        UciOptions::new()
    }
}

//! Universal Chess Interface adapter.
//!
//! Reads commands from stdin on the calling thread, forwards them to the
//! engine controller, and recovers locally from malformed input: a bad FEN
//! or an illegal move discards the offending command and the loop goes on.

mod command;
mod options;

pub use command::{parse_command, UciCommand};
pub use options::{OptionAction, UciOptions, MAX_HASH_MB};

use std::fmt;
use std::io::BufRead;

use log::warn;

use crate::board::{Board, FenError, MoveParseError};
use crate::engine::Engine;

/// Error type for UCI position handling
#[derive(Debug, Clone)]
pub enum UciError {
    /// Invalid FEN string
    InvalidFen(FenError),
    /// Invalid or illegal move in the move list
    InvalidMove {
        move_str: String,
        error: MoveParseError,
    },
}

impl fmt::Display for UciError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UciError::InvalidFen(e) => write!(f, "invalid fen: {e}"),
            UciError::InvalidMove { move_str, error } => {
                write!(f, "illegal move {move_str}: {error}")
            }
        }
    }
}

impl std::error::Error for UciError {}

impl From<FenError> for UciError {
    fn from(e: FenError) -> Self {
        UciError::InvalidFen(e)
    }
}

/// Build the position a `position` command describes.
pub fn build_position(fen: Option<&str>, moves: &[String]) -> Result<Board, UciError> {
    let mut board = match fen {
        Some(fen) => Board::try_from_fen(fen)?,
        None => Board::new(),
    };

    for move_str in moves {
        board
            .make_move_uci(move_str)
            .map_err(|error| UciError::InvalidMove {
                move_str: move_str.clone(),
                error,
            })?;
    }

    Ok(board)
}

/// Run the UCI loop until `quit` or end of input. Returns the process exit
/// code.
pub fn run() -> i32 {
    let mut options = UciOptions::new();
    let mut engine = Engine::new(options.hash_mb);

    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        let Ok(line) = line else { break };

        let Some(cmd) = parse_command(&line) else {
            if !line.trim().is_empty() {
                println!("info string unknown command '{}'", line.trim());
            }
            continue;
        };

        match cmd {
            UciCommand::Uci => options.print_handshake(),
            UciCommand::IsReady => println!("readyok"),
            UciCommand::UciNewGame => engine.new_game(),
            UciCommand::Position { fen, moves } => {
                match build_position(fen.as_deref(), &moves) {
                    Ok(board) => engine.set_position(board),
                    Err(e) => {
                        warn!("position rejected: {e}");
                        println!("info string {e}");
                    }
                }
            }
            UciCommand::SetOption { name, value } => {
                match options.apply(&name, value.as_deref()) {
                    OptionAction::ResizeHash(mb) => engine.set_hash_size(mb),
                    OptionAction::SetMoveOverhead(ms) => engine.set_move_overhead(ms),
                    OptionAction::None => {}
                }
            }
            UciCommand::Go(params) => engine.go(params),
            UciCommand::Stop => engine.stop_search(),
            UciCommand::Display => print!("{}", engine.board()),
            UciCommand::Quit => {
                engine.stop_search();
                return 0;
            }
        }
    }

    0
}

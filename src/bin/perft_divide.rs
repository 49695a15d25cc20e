//! Perft divide utility: per-root-move node counts for a position.
//!
//! Usage: `perft_divide <depth> [fen]` (defaults to the starting position).

use std::process::ExitCode;

use ironclad::board::Board;

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();

    let Some(depth) = args.first().and_then(|d| d.parse::<usize>().ok()) else {
        eprintln!("usage: perft_divide <depth> [fen]");
        return ExitCode::FAILURE;
    };

    let mut board = if args.len() > 1 {
        let fen = args[1..].join(" ");
        match Board::try_from_fen(&fen) {
            Ok(board) => board,
            Err(e) => {
                eprintln!("bad fen: {e}");
                return ExitCode::FAILURE;
            }
        }
    } else {
        Board::new()
    };

    let mut total = 0u64;
    for (mv, nodes) in board.perft_divide(depth) {
        println!("{mv}: {nodes}");
        total += nodes;
    }
    println!();
    println!("Nodes searched: {total}");

    ExitCode::SUCCESS
}

//! UCI line decoding.

use crate::engine::GoParams;

/// A parsed GUI-to-engine command.
#[derive(Debug, Clone)]
pub enum UciCommand {
    Uci,
    IsReady,
    UciNewGame,
    Position {
        fen: Option<String>,
        moves: Vec<String>,
    },
    Go(GoParams),
    SetOption {
        name: String,
        value: Option<String>,
    },
    Stop,
    Quit,
    Display,
}

/// Parse one input line. Returns `None` for empty or unknown commands.
#[must_use]
pub fn parse_command(line: &str) -> Option<UciCommand> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    let first = parts.first()?;

    match *first {
        "uci" => Some(UciCommand::Uci),
        "isready" => Some(UciCommand::IsReady),
        "ucinewgame" => Some(UciCommand::UciNewGame),
        "position" => parse_position(&parts),
        "go" => Some(UciCommand::Go(parse_go(&parts))),
        "setoption" => parse_setoption(&parts),
        "stop" => Some(UciCommand::Stop),
        "quit" => Some(UciCommand::Quit),
        "d" | "display" => Some(UciCommand::Display),
        _ => None,
    }
}

fn parse_position(parts: &[&str]) -> Option<UciCommand> {
    let mut i = 1;
    let fen = match parts.get(i)? {
        &"startpos" => {
            i += 1;
            None
        }
        &"fen" => {
            // A FEN is six space-separated fields
            if i + 6 >= parts.len() {
                return None;
            }
            let fen = parts[i + 1..i + 7].join(" ");
            i += 7;
            Some(fen)
        }
        _ => return None,
    };

    let mut moves = Vec::new();
    if parts.get(i) == Some(&"moves") {
        i += 1;
        while i < parts.len() {
            moves.push(parts[i].to_string());
            i += 1;
        }
    }

    Some(UciCommand::Position { fen, moves })
}

fn parse_go(parts: &[&str]) -> GoParams {
    let mut params = GoParams::default();

    let mut i = 1;
    while i < parts.len() {
        let value = parts.get(i + 1);
        match parts[i] {
            "depth" => {
                params.depth = value.and_then(|v| v.parse().ok());
                i += 2;
            }
            "movetime" => {
                params.movetime_ms = value.and_then(|v| v.parse().ok());
                i += 2;
            }
            "wtime" => {
                params.wtime_ms = value.and_then(|v| v.parse().ok());
                i += 2;
            }
            "btime" => {
                params.btime_ms = value.and_then(|v| v.parse().ok());
                i += 2;
            }
            "winc" => {
                params.winc_ms = value.and_then(|v| v.parse().ok());
                i += 2;
            }
            "binc" => {
                params.binc_ms = value.and_then(|v| v.parse().ok());
                i += 2;
            }
            "movestogo" => {
                params.movestogo = value.and_then(|v| v.parse().ok());
                i += 2;
            }
            "nodes" => {
                params.nodes = value.and_then(|v| v.parse().ok());
                i += 2;
            }
            "mate" => {
                params.mate = value.and_then(|v| v.parse().ok());
                i += 2;
            }
            "infinite" => {
                params.infinite = true;
                i += 1;
            }
            _ => i += 1,
        }
    }

    params
}

/// `setoption name <tokens...> [value <tokens...>]`; option names may
/// contain spaces.
fn parse_setoption(parts: &[&str]) -> Option<UciCommand> {
    let mut name_parts: Vec<&str> = Vec::new();
    let mut value_parts: Vec<&str> = Vec::new();
    let mut mode = "";

    for part in parts.iter().skip(1) {
        match *part {
            "name" => mode = "name",
            "value" => mode = "value",
            _ => match mode {
                "name" => name_parts.push(part),
                "value" => value_parts.push(part),
                _ => {}
            },
        }
    }

    if name_parts.is_empty() {
        return None;
    }

    Some(UciCommand::SetOption {
        name: name_parts.join(" "),
        value: if value_parts.is_empty() {
            None
        } else {
            Some(value_parts.join(" "))
        },
    })
}

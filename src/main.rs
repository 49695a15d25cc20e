use std::process::ExitCode;

fn main() -> ExitCode {
    env_logger::init();
    let code = ironclad::uci::run();
    ExitCode::from(code as u8)
}

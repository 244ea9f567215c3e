//! Jott CLI - Compose, publish, and share structured card documents

use std::process::ExitCode;

fn main() -> ExitCode {
    if let Err(e) = jframe::cli::run() {
        eprintln!("Error: {:#}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

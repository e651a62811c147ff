use std::process::ExitCode;

use tracing::error;

fn main() -> ExitCode {
    match asa_cli::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

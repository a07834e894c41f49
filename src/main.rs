use std::process::ExitCode;

fn main() -> ExitCode {
    simon_mask::init_logging();

    match simon_mask::cli::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

use std::process::ExitCode;

use cbom_scanner::cli::Arguments;
use clap::Parser;

fn main() -> ExitCode {
    let args = Arguments::parse();
    match cbom_scanner::cli::run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

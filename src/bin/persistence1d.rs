//! Run persistence on a text file of samples, one value per line.
//!
//! Usage: `persistence1d <filename> [threshold] [-MATLAB]`

use std::process::ExitCode;

use persistence1d::cli::{self, DriverArgs};
use persistence1d::PersistenceError;

fn main() -> ExitCode {
    let result = DriverArgs::parse(std::env::args().skip(1)).and_then(|args| cli::run(&args));

    match result {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            if matches!(
                e,
                PersistenceError::Usage(_) | PersistenceError::InvalidThreshold { .. }
            ) {
                eprintln!("Usage: {}", cli::USAGE);
            }
            ExitCode::from(e.exit_code())
        }
    }
}

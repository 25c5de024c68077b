// src/main.rs
#![allow(clippy::multiple_crate_versions)]

use std::process::ExitCode;

use bundle_import::{cli, logging};

fn main() -> ExitCode {
    let args = cli::parse_args();
    logging::init(args.verbose);

    match bundle_import::run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

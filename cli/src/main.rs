//! hemolog entrypoint.

use std::process::ExitCode;

use clap::Parser;
use hemolog_cli::{cli::Cli, logging, run};

fn main() -> ExitCode {
    logging::init_tracing();
    match run(Cli::parse()) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("❌ Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

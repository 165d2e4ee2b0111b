//! Command-line entry point for `spec-inspect`.

use std::process::ExitCode;

use clap::Parser;

mod cli;
use cli::{Cli, terminal::Colorize};

fn main() -> ExitCode {
    match Cli::parse().run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {e:#}", "error:".error());
            ExitCode::FAILURE
        }
    }
}

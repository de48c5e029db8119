mod classes;
mod cli;
mod client;
mod config;
mod duplicate;
mod error;
mod format;
mod graph;
mod logging;
mod request;

use std::process::ExitCode;

use clap::Parser;

use crate::cli::{Cli, Commands};

fn main() -> ExitCode {
    // Preprocess argv: if first arg is not a known subcommand or flag, insert "duplicate"
    let mut args: Vec<String> = std::env::args().collect();
    if let Some(first) = args.get(1) {
        if !matches!(
            first.as_str(),
            "config" | "duplicate" | "help" | "--help" | "-h" | "--version" | "-V"
        ) {
            args.insert(1, "duplicate".to_string());
        }
    }

    let cli = match Cli::try_parse_from(&args) {
        Ok(c) => c,
        Err(e) => {
            e.print().ok();
            return ExitCode::from(if e.use_stderr() { 2 } else { 0 });
        }
    };

    logging::init();

    let result = match cli.command {
        Commands::Duplicate(duplicate_args) => cli::handle_duplicate(duplicate_args),
        Commands::Config { action } => cli::handle_config(action),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::debug!(error = ?e, "command failed");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

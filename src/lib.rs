pub mod catalog;
pub mod cli;
pub mod commands;
pub mod config;
pub mod core;
pub mod error;
pub mod error_suggestions;
pub mod installer;
pub mod linker;
pub mod project_identity;
pub mod remote;
pub mod resolver;
pub mod state;
pub mod traits;
pub mod ui;
pub mod uninstaller;
pub mod updater;
pub mod utils;

use clap::Parser;
use std::process::exit;

/// Run the workshop-manager CLI entrypoint.
pub fn run_cli() {
    // 1. Signal handling. Steps already done are not rolled back.
    ctrlc::set_handler(move || {
        eprintln!();
        ui::warning("Operation cancelled by user.");
        exit(130);
    })
    .expect("Error setting Ctrl-C handler");

    // 2. Parse & Run
    let args = cli::args::Cli::parse();
    ui::set_quiet(args.global.quiet);
    ui::set_verbose(args.global.verbose);

    if let Err(e) = cli::dispatcher::dispatch(&args) {
        error_suggestions::display_error_with_suggestion(&e);
        exit(1);
    }
}

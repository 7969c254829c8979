//! Command dispatcher
//!
//! Routes CLI commands to their appropriate handlers.

use crate::cli::args::{Cli, Command};
use crate::commands;
use crate::config::settings::Settings;
use crate::error::Result;
use crate::project_identity;
use crate::traits::AppContext;
use crate::ui as output;
use crate::utils::paths::ManagerPaths;

/// Dispatch the parsed CLI command to the appropriate handler
pub fn dispatch(args: &Cli) -> Result<()> {
    let Some(command) = &args.command else {
        output::info("No command provided.");
        output::info("Quick start:");
        output::indent(&project_identity::cli_with("search php"), 2);
        output::indent(&project_identity::cli_with("install learnyouphp"), 2);
        output::info(&format!(
            "Run '{}' for all commands.",
            project_identity::cli_with("--help")
        ));
        return Ok(());
    };

    if let Command::Completions { shell } = command {
        return commands::completions::run(*shell);
    }

    let ctx = build_context()?;

    match command {
        Command::Install { code, branch, repo } => {
            commands::install::run(
                &ctx,
                commands::install::InstallOptions {
                    code: code.clone(),
                    branch: branch.clone(),
                    repository: repo.clone(),
                },
            )
        }
        Command::Uninstall { code } => commands::uninstall::run(&ctx, code),
        Command::Update { code } => commands::update::run(&ctx, code),
        Command::Search { term } => commands::search::run(&ctx, term),
        Command::Installed { check_updates } => commands::installed::run(&ctx, *check_updates),
        Command::Link { code } => commands::link::run_link(&ctx, code),
        Command::Unlink { code } => commands::link::run_unlink(&ctx, code),
        Command::Verify => commands::verify::run(&ctx),
        Command::Settings => commands::settings::run(&ctx),
        Command::Completions { .. } => Ok(()),
    }
}

fn build_context() -> Result<AppContext> {
    let paths = ManagerPaths::discover()?;
    let settings = Settings::load(&paths)?;
    output::verbose(&format!("Home: {}", paths.home().display()));
    AppContext::from_settings(paths, settings)
}

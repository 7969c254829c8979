//! Install command
//!
//! Installs the latest release of a workshop, or a branch with `--branch`
//! (optionally from a fork with `--repo`).

use crate::commands::{open_store, with_pipeline};
use crate::core::types::BranchSpec;
use crate::error::{Result, WorkshopError};
use crate::traits::AppContext;
use crate::ui as output;
use colored::Colorize;

pub struct InstallOptions {
    pub code: String,
    pub branch: Option<String>,
    pub repository: Option<String>,
}

pub fn run(ctx: &AppContext, options: InstallOptions) -> Result<()> {
    let branch = branch_spec(options.branch, options.repository.as_deref())?;
    let mut store = open_store(ctx)?;

    match &branch {
        Some(spec) => output::info(&format!(
            "Installing {} from branch {}",
            options.code.cyan(),
            spec.to_string().yellow()
        )),
        None => output::info(&format!("Installing {}", options.code.cyan())),
    }

    let installed = with_pipeline(ctx, |_, installer, _| {
        installer.install(&mut store, &options.code, branch)
    })?;

    output::success(&format!(
        "Installed {} ({})",
        installed.workshop.display_name.bold(),
        installed.version.to_string().green()
    ));
    output::indent(
        &format!("Run '{}' to get started", installed.code().cyan()),
        2,
    );
    Ok(())
}

fn branch_spec(branch: Option<String>, repository: Option<&str>) -> Result<Option<BranchSpec>> {
    match (branch, repository) {
        (Some(branch), Some(url)) => BranchSpec::with_repository(branch, url).map(Some),
        (Some(branch), None) => Ok(Some(BranchSpec::new(branch))),
        (None, Some(_)) => Err(WorkshopError::Other(
            "--repo can only be used together with --branch".to_string(),
        )),
        (None, None) => Ok(None),
    }
}

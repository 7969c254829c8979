//! Environment check
//!
//! Reports whether the manager can write to its home, reach the catalog,
//! run the dependency command and expose linked workshops on `PATH`.

use crate::error::{Result, WorkshopError};
use crate::installer::dependencies::CommandDependencyInstaller;
use crate::linker::is_on_search_path;
use crate::state::InstalledWorkshops;
use crate::traits::AppContext;
use crate::ui as output;
use colored::Colorize;
use std::env;
use std::fs;

struct Check {
    name: &'static str,
    passed: bool,
    detail: String,
}

impl Check {
    fn new(name: &'static str, outcome: std::result::Result<String, String>) -> Self {
        match outcome {
            Ok(detail) => Self {
                name,
                passed: true,
                detail,
            },
            Err(detail) => Self {
                name,
                passed: false,
                detail,
            },
        }
    }
}

pub fn run(ctx: &AppContext) -> Result<()> {
    output::header("Verifying environment");

    let checks = vec![
        Check::new("home directory", check_home(ctx)),
        Check::new("state file", check_state(ctx)),
        Check::new("dependency command", check_dependency_command(ctx)),
        Check::new("catalog", check_catalog(ctx)),
        Check::new("bin directory on PATH", check_search_path(ctx)),
    ];

    let mut failed = 0;
    for check in &checks {
        if check.passed {
            println!("{} {}: {}", "✓".green().bold(), check.name, check.detail);
        } else {
            failed += 1;
            println!("{} {}: {}", "✗".red().bold(), check.name, check.detail);
        }
    }

    if failed > 0 {
        return Err(WorkshopError::Other(format!(
            "{} of {} checks failed",
            failed,
            checks.len()
        )));
    }

    output::success("Everything looks good");
    Ok(())
}

fn check_home(ctx: &AppContext) -> std::result::Result<String, String> {
    let home = ctx.paths.home();
    fs::create_dir_all(home).map_err(|e| format!("{}: {}", home.display(), e))?;

    let write_test = home.join(".write-test");
    fs::write(&write_test, b"").map_err(|e| format!("{} is not writable: {}", home.display(), e))?;
    let _ = fs::remove_file(&write_test);

    Ok(home.display().to_string())
}

fn check_state(ctx: &AppContext) -> std::result::Result<String, String> {
    let store = InstalledWorkshops::load(ctx.paths.state_file()).map_err(|e| e.to_string())?;
    Ok(format!("{} workshop(s) installed", store.len()))
}

fn check_dependency_command(ctx: &AppContext) -> std::result::Result<String, String> {
    let installer = CommandDependencyInstaller::from_command_line(&ctx.settings.dependency_command)
        .map_err(|e| e.to_string())?;
    which::which(installer.program())
        .map(|path| path.display().to_string())
        .map_err(|_| format!("'{}' not found on PATH", installer.program()))
}

fn check_catalog(ctx: &AppContext) -> std::result::Result<String, String> {
    ctx.catalog
        .all()
        .map(|workshops| format!("{} workshop(s) available", workshops.len()))
        .map_err(|e| e.to_string())
}

fn check_search_path(ctx: &AppContext) -> std::result::Result<String, String> {
    let bin_dir = ctx.paths.bin_dir();
    let path = env::var_os("PATH");
    if is_on_search_path(&bin_dir, path.as_deref()) {
        Ok(bin_dir.display().to_string())
    } else {
        Err(format!(
            "add it with: export PATH=\"$PATH:{}\"",
            bin_dir.display()
        ))
    }
}

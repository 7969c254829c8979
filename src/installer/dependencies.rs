use crate::error::{DependencyFailure, Result, WorkshopError};
use crate::traits::{DependencyInstaller, DependencyOutput};
use crate::ui;
use regex::Regex;
use std::path::Path;
use std::process::{Command, Stdio};
use std::sync::LazyLock;

static MISSING_EXTENSION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"the requested PHP extension ([A-Za-z0-9_-]+) is missing from your system")
        .expect("Invalid regex pattern")
});

const UNRESOLVABLE_MARKER: &str =
    "Your requirements could not be resolved to an installable set of packages";

/// Translate a dependency install attempt into the failure the user sees.
pub(crate) fn check_dependency_result(
    result: Result<DependencyOutput>,
) -> std::result::Result<(), DependencyFailure> {
    let output = result.map_err(|e| DependencyFailure::Failed {
        output: e.to_string(),
    })?;
    match classify_failure(&output) {
        Some(failure) => Err(failure),
        None => Ok(()),
    }
}

/// `None` when the run succeeded.
pub(crate) fn classify_failure(result: &DependencyOutput) -> Option<DependencyFailure> {
    if result.succeeded() {
        return None;
    }

    let mut missing: Vec<String> = Vec::new();
    for line in result.output.lines() {
        for captures in MISSING_EXTENSION.captures_iter(line) {
            let name = captures[1].to_string();
            if !missing.contains(&name) {
                missing.push(name);
            }
        }
    }
    if !missing.is_empty() {
        return Some(DependencyFailure::MissingExtensions(missing));
    }

    if result.output.contains(UNRESOLVABLE_MARKER) {
        return Some(DependencyFailure::CouldNotResolve);
    }

    Some(DependencyFailure::Failed {
        output: result.output.clone(),
    })
}

/// Runs a configured command (by default `composer install`) inside the
/// workshop directory and captures its combined output.
#[derive(Debug, Clone)]
pub struct CommandDependencyInstaller {
    program: String,
    args: Vec<String>,
}

impl CommandDependencyInstaller {
    pub fn from_command_line(command_line: &str) -> Result<Self> {
        let mut words = shlex::split(command_line)
            .filter(|words| !words.is_empty())
            .ok_or_else(|| {
                WorkshopError::ConfigError(format!(
                    "Invalid dependency command: '{}'",
                    command_line
                ))
            })?;
        let program = words.remove(0);
        Ok(Self {
            program,
            args: words,
        })
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

impl DependencyInstaller for CommandDependencyInstaller {
    fn install(&self, workshop_dir: &Path) -> Result<DependencyOutput> {
        let program = which::which(&self.program)
            .map_err(|_| WorkshopError::DependencyMissing(self.program.clone()))?;

        ui::verbose(&format!(
            "Running {} {} in {}",
            self.program,
            self.args.join(" "),
            workshop_dir.display()
        ));

        let output = Command::new(&program)
            .args(&self.args)
            .current_dir(workshop_dir)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| WorkshopError::io_at(&program, e))?;

        let mut captured = String::from_utf8_lossy(&output.stdout).into_owned();
        captured.push_str(&String::from_utf8_lossy(&output.stderr));

        Ok(DependencyOutput {
            exit_code: output.status.code().unwrap_or(-1),
            output: captured,
        })
    }
}

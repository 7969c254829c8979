//! Error suggestions and helpful messages
//!
//! Maps each pipeline error to the remediation shown under it.

use crate::error::{DependencyFailure, WorkshopError};
use crate::project_identity::cli_with;
use colored::Colorize;

/// Extension trait to add suggestions to errors
pub trait ErrorSuggestions {
    /// Get a helpful suggestion for this error
    fn suggestion(&self) -> Option<String>;

    /// Display the error with its suggestion
    fn display_with_suggestion(&self) -> String;
}

impl ErrorSuggestions for WorkshopError {
    fn suggestion(&self) -> Option<String> {
        match self {
            WorkshopError::AlreadyInstalled { code } => Some(format!(
                "Use '{}' to get the latest release, or '{}' first to reinstall",
                cli_with(&format!("update {}", code)).cyan(),
                cli_with(&format!("uninstall {}", code)).cyan()
            )),
            WorkshopError::NotFound { code } => Some(format!(
                "Check the code, or look for it with: {}",
                cli_with(&format!("search {}", code)).cyan()
            )),
            WorkshopError::NotInstalled { .. } => Some(format!(
                "List installed workshops with: {}",
                cli_with("installed").cyan()
            )),
            WorkshopError::InvalidRepositoryUrl { .. } => Some(
                "Pass a GitHub repository URL such as https://github.com/<owner>/<repo>"
                    .to_string(),
            ),
            WorkshopError::NoTaggedRelease { .. } | WorkshopError::RequiresNetworkAccess { .. } => {
                Some(
                    "Check your internet connection. If GitHub rate limits you, set GITHUB_TOKEN."
                        .to_string(),
                )
            }
            WorkshopError::DownloadFailure(_) => {
                Some("The download can be retried; partial files are cleaned up on the next attempt.".to_string())
            }
            WorkshopError::FailedToMoveWorkshop { src, dest, .. } => Some(format!(
                "Make sure you can write to both {} and {}",
                src.display().to_string().cyan(),
                dest.display().to_string().cyan()
            )),
            WorkshopError::DependencyInstall(failure) => Some(dependency_suggestion(failure)),
            WorkshopError::NoUpdateAvailable { .. } => None,
            WorkshopError::DependencyMissing(program) => Some(format!(
                "Install '{}' and make sure it is on your PATH, or change the '{}' setting",
                program.cyan(),
                "dependency-command".cyan()
            )),
            WorkshopError::StateCorrupted { path, .. } => Some(format!(
                "Fix or remove {} and reinstall your workshops",
                path.display().to_string().cyan()
            )),
            WorkshopError::ConfigError(_) | WorkshopError::KdlError(_) => Some(format!(
                "Review your settings with: {}",
                cli_with("settings").cyan()
            )),
            _ => None,
        }
    }

    fn display_with_suggestion(&self) -> String {
        let base_msg = format!("{}", self);

        if let Some(suggestion) = self.suggestion() {
            format!("{}\n\n{}", base_msg.red().bold(), suggestion)
        } else {
            base_msg.red().bold().to_string()
        }
    }
}

fn dependency_suggestion(failure: &DependencyFailure) -> String {
    match failure {
        DependencyFailure::MissingExtensions(extensions) => format!(
            "This workshop needs the following PHP extensions: {}\nEnable them in your php.ini and try again.",
            extensions.join(", ").cyan()
        ),
        DependencyFailure::CouldNotResolve => {
            "The workshop's dependencies conflict with your PHP version. Check the workshop's requirements.".to_string()
        }
        DependencyFailure::Failed { .. } => format!(
            "Re-run with {} to see every step",
            "--verbose".cyan()
        ),
    }
}

/// Display an error with its suggestion to the user
pub fn display_error_with_suggestion(error: &WorkshopError) {
    eprintln!("{}", error.display_with_suggestion());
}

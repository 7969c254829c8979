//! Update command
//!
//! An update that finds the workshop already on its latest release reports
//! it and exits successfully.

use crate::commands::{open_store, with_pipeline};
use crate::error::{Result, WorkshopError};
use crate::traits::AppContext;
use crate::ui as output;
use crate::updater::Updater;
use colored::Colorize;

pub fn run(ctx: &AppContext, code: &str) -> Result<()> {
    let mut store = open_store(ctx)?;

    let result = with_pipeline(ctx, |resolver, installer, uninstaller| {
        Updater::new(resolver, uninstaller, installer).update(&mut store, code)
    });

    match result {
        Ok(version) => {
            output::success(&format!("Updated {} to {}", code.cyan(), version.green()));
            Ok(())
        }
        Err(WorkshopError::NoUpdateAvailable { code, version }) => {
            output::info(&format!(
                "{} is already on the latest release ({})",
                code.cyan(),
                version
            ));
            Ok(())
        }
        Err(e) => Err(e),
    }
}

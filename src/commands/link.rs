//! Link and unlink commands
//!
//! Repair or remove the `{home}/bin/{code}` link of an installed workshop
//! without touching its files or state entry.

use crate::commands::open_store;
use crate::error::{Result, WorkshopError};
use crate::linker::{LinkOutcome, Linker, UnlinkOutcome};
use crate::traits::AppContext;
use crate::ui as output;

pub fn run_link(ctx: &AppContext, code: &str) -> Result<()> {
    let store = open_store(ctx)?;
    let installed = store.get(code)?;

    match Linker::new(&ctx.paths).link(installed) {
        LinkOutcome::Linked => {
            output::success(&format!(
                "Linked {}",
                ctx.paths.bin_link(code).display()
            ));
            Ok(())
        }
        LinkOutcome::Blocked | LinkOutcome::Failed => Err(WorkshopError::Other(format!(
            "Could not link '{}'",
            code
        ))),
    }
}

pub fn run_unlink(ctx: &AppContext, code: &str) -> Result<()> {
    let store = open_store(ctx)?;
    let installed = store.get(code)?;

    match Linker::new(&ctx.paths).unlink(installed) {
        UnlinkOutcome::Unlinked => {
            output::success(&format!("Unlinked {}", code));
            Ok(())
        }
        UnlinkOutcome::NotLinked => {
            output::info(&format!("{} was not linked", code));
            Ok(())
        }
        UnlinkOutcome::Blocked | UnlinkOutcome::Failed => Err(WorkshopError::Other(format!(
            "Could not unlink '{}'",
            code
        ))),
    }
}

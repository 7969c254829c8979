use crate::commands::{open_store, with_pipeline};
use crate::error::Result;
use crate::traits::AppContext;
use crate::ui as output;
use colored::Colorize;

pub fn run(ctx: &AppContext, code: &str) -> Result<()> {
    let mut store = open_store(ctx)?;
    let removed = with_pipeline(ctx, |_, _, uninstaller| uninstaller.uninstall(&mut store, code))?;

    output::success(&format!(
        "Removed {} ({})",
        removed.workshop.display_name.bold(),
        removed.version
    ));
    Ok(())
}

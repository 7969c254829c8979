//! Catalog search command
//!
//! Matches on code and display name, tolerating small typos. Results keep
//! catalog order.

use crate::catalog::RemoteCatalog;
use crate::core::types::Workshop;
use crate::error::Result;
use crate::state::InstalledWorkshops;
use crate::traits::AppContext;
use crate::ui as output;
use colored::Colorize;
use std::path::Path;

pub fn run(ctx: &AppContext, term: &str) -> Result<()> {
    let store = installed_markers(&ctx.paths.state_file());
    let results = search(&ctx.catalog, term)?;

    if results.is_empty() {
        output::info(&format!("No workshops match '{}'", term));
        return Ok(());
    }

    output::header(&format!("Workshops matching '{}'", term));
    for workshop in results {
        println!("{}", format_result(workshop, store.as_ref()));
        if !workshop.description.is_empty() {
            output::indent(&workshop.description.dimmed().to_string(), 2);
        }
    }
    Ok(())
}

fn search<'c>(catalog: &'c RemoteCatalog, term: &str) -> Result<Vec<&'c Workshop>> {
    catalog.find(term)
}

/// Installed state for the `[installed]` markers. An unreadable state file
/// only costs the markers.
fn installed_markers(state_file: &Path) -> Option<InstalledWorkshops> {
    match InstalledWorkshops::load(state_file) {
        Ok(store) => Some(store),
        Err(e) => {
            output::warning(&format!("Installed markers unavailable: {}", e));
            None
        }
    }
}

fn format_result(workshop: &Workshop, store: Option<&InstalledWorkshops>) -> String {
    let marker = match store.and_then(|store| store.get(&workshop.code).ok()) {
        Some(installed) => format!(" {}", format!("[installed {}]", installed.version).green()),
        None => String::new(),
    };
    format!(
        "{} {}{}",
        workshop.code.cyan().bold(),
        workshop.display_name,
        marker
    )
}

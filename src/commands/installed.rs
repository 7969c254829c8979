//! Installed workshops command
//!
//! Lists the state store. With `--check-updates` each install is compared
//! against its latest tagged release.

use crate::commands::open_store;
use crate::core::types::{InstalledWorkshop, WorkshopVersion};
use crate::error::Result;
use crate::project_identity;
use crate::resolver::ReleaseResolver;
use crate::traits::AppContext;
use crate::ui as output;
use colored::Colorize;

pub fn run(ctx: &AppContext, check_updates: bool) -> Result<()> {
    let store = open_store(ctx)?;

    if store.is_empty() {
        output::info("No workshops installed.");
        output::indent(
            &format!(
                "Find one with '{}'",
                project_identity::cli_with("search <term>").cyan()
            ),
            2,
        );
        return Ok(());
    }

    output::header(&format!("Installed workshops ({})", store.len()));

    let resolver = ReleaseResolver::new(ctx.github.as_ref());
    for installed in store.all() {
        let hint = if check_updates {
            update_hint(&resolver, installed)
        } else {
            None
        };
        println!("{}", format_entry(installed, hint.as_deref()));
    }
    Ok(())
}

/// Latest tag when it differs from the installed version, i.e. when
/// `update` would reinstall.
fn update_hint(resolver: &ReleaseResolver<'_>, installed: &InstalledWorkshop) -> Option<String> {
    match resolver.get_latest_release(&installed.workshop) {
        Ok(release) if !installed.version.matches_tag(&release.tag) => Some(release.tag),
        Ok(_) => None,
        Err(e) => {
            output::verbose(&format!(
                "Could not check {} for updates: {}",
                installed.code(),
                e
            ));
            None
        }
    }
}

fn format_entry(installed: &InstalledWorkshop, latest: Option<&str>) -> String {
    let version = match &installed.version {
        WorkshopVersion::Release(tag) => tag.green().to_string(),
        WorkshopVersion::Branch(spec) => format!("branch {}", spec).yellow().to_string(),
    };
    let mut line = format!(
        "{} {} {}",
        installed.code().cyan().bold(),
        installed.workshop.display_name,
        version
    );
    if let Some(latest) = latest {
        line.push_str(&format!(" {}", format!("(update available: {})", latest).bold()));
    }
    line
}

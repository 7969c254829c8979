//! Update = uninstall + install, guarded by a latest-release check.

use crate::error::{Result, WorkshopError};
use crate::installer::Installer;
use crate::resolver::ReleaseResolver;
use crate::state::InstalledWorkshops;
use crate::uninstaller::Uninstaller;
use crate::ui;

pub struct Updater<'a> {
    resolver: &'a ReleaseResolver<'a>,
    uninstaller: &'a Uninstaller<'a>,
    installer: &'a Installer<'a>,
}

impl<'a> Updater<'a> {
    pub fn new(
        resolver: &'a ReleaseResolver<'a>,
        uninstaller: &'a Uninstaller<'a>,
        installer: &'a Installer<'a>,
    ) -> Self {
        Self {
            resolver,
            uninstaller,
            installer,
        }
    }

    /// Move `code` to its latest release and return the new version.
    ///
    /// Not transactional: if the reinstall fails the workshop stays
    /// uninstalled. Branch installs are moved to the release track unless the
    /// stored version string is already the latest tag.
    pub fn update(&self, store: &mut InstalledWorkshops, code: &str) -> Result<String> {
        let installed = store.get(code)?;
        let release = self.resolver.get_latest_release(&installed.workshop)?;

        if installed.version.matches_tag(&release.tag) {
            return Err(WorkshopError::NoUpdateAvailable {
                code: code.to_string(),
                version: release.tag,
            });
        }

        ui::info(&format!(
            "Updating {} from {} to {}",
            code, installed.version, release.tag
        ));

        self.uninstaller.uninstall(store, code)?;
        let reinstalled = self.installer.install(store, code, None)?;

        Ok(reinstalled.version.to_string())
    }
}

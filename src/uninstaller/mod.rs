//! Uninstall pipeline.

use crate::core::types::InstalledWorkshop;
use crate::error::{Result, WorkshopError};
use crate::linker::Linker;
use crate::state::InstalledWorkshops;
use crate::ui;
use crate::utils::paths::ManagerPaths;
use std::fs;
use std::io::ErrorKind;

pub struct Uninstaller<'a> {
    paths: &'a ManagerPaths,
    linker: &'a Linker<'a>,
}

impl<'a> Uninstaller<'a> {
    pub fn new(paths: &'a ManagerPaths, linker: &'a Linker<'a>) -> Self {
        Self { paths, linker }
    }

    /// Remove the workshop directory, then its state entry, then its link.
    ///
    /// A failure to delete the directory is returned as the raw
    /// [`WorkshopError::Io`] and leaves the state entry in place.
    pub fn uninstall(
        &self,
        store: &mut InstalledWorkshops,
        code: &str,
    ) -> Result<InstalledWorkshop> {
        let installed = store.get(code)?.clone();

        let dir = self.paths.workshop_dir(code);
        match fs::remove_dir_all(&dir) {
            Ok(()) => ui::verbose(&format!("Removed {}", dir.display())),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                ui::verbose(&format!("{} was already gone", dir.display()));
            }
            Err(e) => return Err(WorkshopError::Io(e)),
        }

        store.remove(code)?;
        store.save()?;

        self.linker.unlink(&installed);

        Ok(installed)
    }
}

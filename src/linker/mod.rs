//! Exposes installed workshops as commands through `{home}/bin` symlinks.
//!
//! Neither operation returns an error: problems are reported to the user and
//! summarized in the returned outcome. A regular file at the link location
//! is never removed.

use crate::core::types::InstalledWorkshop;
use crate::ui;
use crate::utils::paths::ManagerPaths;
use std::env;
use std::ffi::{OsStr, OsString};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkOutcome {
    Linked,
    /// Something other than a symlink occupies the link location.
    Blocked,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnlinkOutcome {
    Unlinked,
    NotLinked,
    /// Something other than a symlink occupies the link location.
    Blocked,
    Failed,
}

pub struct Linker<'a> {
    paths: &'a ManagerPaths,
    search_path: Option<OsString>,
}

impl<'a> Linker<'a> {
    /// Linker that checks the process `PATH` after linking.
    pub fn new(paths: &'a ManagerPaths) -> Self {
        Self::with_search_path(paths, env::var_os("PATH"))
    }

    pub fn with_search_path(paths: &'a ManagerPaths, search_path: Option<OsString>) -> Self {
        Self { paths, search_path }
    }

    pub fn link(&self, workshop: &InstalledWorkshop) -> LinkOutcome {
        let code = workshop.code();
        let bin_dir = self.paths.bin_dir();
        let dest = self.paths.bin_link(code);
        let src = self.paths.workshop_entrypoint(code);

        if let Err(e) = fs::create_dir_all(&bin_dir) {
            ui::error(&format!(
                "Could not create bin directory {}: {}",
                bin_dir.display(),
                e
            ));
            return LinkOutcome::Failed;
        }

        if let Ok(meta) = fs::symlink_metadata(&dest) {
            if !meta.file_type().is_symlink() {
                ui::error(&format!(
                    "Cannot link {}: {} exists and is not a symlink",
                    code,
                    dest.display()
                ));
                ui::indent_err("Remove or rename that file, then run the link command again.", 1);
                return LinkOutcome::Blocked;
            }

            if let Err(e) = fs::remove_file(&dest) {
                ui::error(&format!(
                    "Could not remove existing symlink {}: {}",
                    dest.display(),
                    e
                ));
                return LinkOutcome::Failed;
            }
        }

        if let Err(e) = create_symlink(&src, &dest) {
            ui::error(&format!(
                "Could not link {} -> {}: {}",
                dest.display(),
                src.display(),
                e
            ));
            return LinkOutcome::Failed;
        }

        if let Err(e) = make_executable(&src) {
            ui::error(&format!(
                "Could not make {} executable: {}",
                src.display(),
                e
            ));
            ui::indent_err(&format!("Fix it manually with: chmod +x {}", src.display()), 1);
            return LinkOutcome::Failed;
        }

        ui::verbose(&format!("Linked {} -> {}", dest.display(), src.display()));

        if !is_on_search_path(&bin_dir, self.search_path.as_deref()) {
            ui::warning(&format!(
                "{} is not in your PATH, so '{}' cannot be run directly.",
                bin_dir.display(),
                code
            ));
            ui::indent_err("Add it to your shell profile (e.g. ~/.bashrc or ~/.zshrc):", 1);
            ui::indent_err(&format!("export PATH=\"$PATH:{}\"", bin_dir.display()), 2);
        }

        LinkOutcome::Linked
    }

    pub fn unlink(&self, workshop: &InstalledWorkshop) -> UnlinkOutcome {
        let dest = self.paths.bin_link(workshop.code());

        let meta = match fs::symlink_metadata(&dest) {
            Ok(meta) => meta,
            Err(_) => return UnlinkOutcome::NotLinked,
        };

        if !meta.file_type().is_symlink() {
            ui::warning(&format!(
                "{} is not a symlink, leaving it in place",
                dest.display()
            ));
            return UnlinkOutcome::Blocked;
        }

        match fs::remove_file(&dest) {
            Ok(()) => {
                ui::verbose(&format!("Removed {}", dest.display()));
                UnlinkOutcome::Unlinked
            }
            Err(e) => {
                ui::error(&format!("Could not remove {}: {}", dest.display(), e));
                UnlinkOutcome::Failed
            }
        }
    }
}

/// Whether `dir` is one of the entries of a `PATH`-style variable.
pub fn is_on_search_path(dir: &Path, search_path: Option<&OsStr>) -> bool {
    let Some(search_path) = search_path else {
        return false;
    };
    let wanted = dir.components().collect::<Vec<_>>();
    env::split_paths(search_path).any(|entry| entry.components().collect::<Vec<_>>() == wanted)
}

#[cfg(unix)]
fn create_symlink(src: &Path, dest: &Path) -> std::io::Result<()> {
    std::os::unix::fs::symlink(src, dest)
}

#[cfg(not(unix))]
fn create_symlink(_src: &Path, _dest: &Path) -> std::io::Result<()> {
    Err(std::io::Error::new(
        std::io::ErrorKind::Unsupported,
        "symlinks are only supported on unix platforms",
    ))
}

#[cfg(unix)]
fn make_executable(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o755))
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) -> std::io::Result<()> {
    Ok(())
}

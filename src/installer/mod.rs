//! Install pipeline.
//!
//! Steps run strictly in order and the state store is only written once the
//! workshop is in place and its dependencies are installed. Files moved by an
//! earlier step are not cleaned up when a later step fails; a retry removes
//! the stale scratch archive and destination directory before reusing them.

mod archive;
pub mod dependencies;

use crate::catalog::RemoteCatalog;
use crate::core::types::{BranchSpec, InstalledWorkshop, WorkshopVersion};
use crate::error::{Result, WorkshopError};
use crate::linker::Linker;
use crate::resolver::ReleaseResolver;
use crate::state::InstalledWorkshops;
use crate::traits::{DependencyInstaller, GitHubApi, InstallNotifier};
use crate::ui;
use crate::utils::paths::ManagerPaths;
use std::fs;
use std::path::PathBuf;

/// Where the archive is downloaded from and what gets recorded as the version.
struct DownloadTarget {
    owner: String,
    repo: String,
    reference: String,
    version: WorkshopVersion,
}

pub struct Installer<'a> {
    paths: &'a ManagerPaths,
    catalog: &'a RemoteCatalog,
    resolver: &'a ReleaseResolver<'a>,
    github: &'a dyn GitHubApi,
    dependencies: &'a dyn DependencyInstaller,
    notifier: &'a dyn InstallNotifier,
    linker: &'a Linker<'a>,
}

impl<'a> Installer<'a> {
    pub fn new(
        paths: &'a ManagerPaths,
        catalog: &'a RemoteCatalog,
        resolver: &'a ReleaseResolver<'a>,
        github: &'a dyn GitHubApi,
        dependencies: &'a dyn DependencyInstaller,
        notifier: &'a dyn InstallNotifier,
        linker: &'a Linker<'a>,
    ) -> Self {
        Self {
            paths,
            catalog,
            resolver,
            github,
            dependencies,
            notifier,
            linker,
        }
    }

    /// Install `code` from its latest release, or from `branch` when given.
    pub fn install(
        &self,
        store: &mut InstalledWorkshops,
        code: &str,
        branch: Option<BranchSpec>,
    ) -> Result<InstalledWorkshop> {
        if store.has(code) {
            return Err(WorkshopError::AlreadyInstalled {
                code: code.to_string(),
            });
        }

        let workshop = self.catalog.get_by_code(code)?;

        let target = match branch {
            Some(spec) => {
                let (owner, repo) = match spec.repository() {
                    Some(repo) => (repo.owner.clone(), repo.repo.clone()),
                    None => (
                        workshop.github_owner.clone(),
                        workshop.github_repo_name.clone(),
                    ),
                };
                DownloadTarget {
                    owner,
                    repo,
                    reference: spec.branch().to_string(),
                    version: WorkshopVersion::Branch(spec),
                }
            }
            None => {
                let release = self.resolver.get_latest_release(workshop)?;
                DownloadTarget {
                    owner: workshop.github_owner.clone(),
                    repo: workshop.github_repo_name.clone(),
                    reference: release.sha,
                    version: WorkshopVersion::Release(release.tag),
                }
            }
        };

        ui::info(&format!(
            "Downloading {} ({}) from {}/{}",
            workshop.display_name, target.version, target.owner, target.repo
        ));
        let bytes = self
            .github
            .archive(&target.owner, &target.repo, &target.reference)
            .map_err(|e| WorkshopError::DownloadFailure(e.to_string()))?;

        let archive_path = self.write_scratch_archive(code, &bytes)?;
        let extracted = archive::extract_archive(&archive_path, &self.paths.temp_dir())?;
        if let Err(e) = fs::remove_file(&archive_path) {
            ui::verbose(&format!(
                "Could not remove {}: {}",
                archive_path.display(),
                e
            ));
        }

        let dest = self.place_workshop(code, extracted)?;

        ui::info("Installing workshop dependencies...");
        dependencies::check_dependency_result(self.dependencies.install(&dest))
            .map_err(WorkshopError::DependencyInstall)?;

        let installed = InstalledWorkshop::new(workshop.clone(), target.version);
        store.add(installed.clone());
        store.save()?;

        self.linker.link(&installed);

        if let Err(e) = self
            .notifier
            .notify(installed.code(), &installed.version.to_string())
        {
            ui::verbose(&format!("Install notification failed: {}", e));
        }

        Ok(installed)
    }

    fn write_scratch_archive(&self, code: &str, bytes: &[u8]) -> Result<PathBuf> {
        let temp_dir = self.paths.temp_dir();
        let archive_path = temp_dir.join(format!("{}.zip", code));
        let write_failure = |e: std::io::Error| {
            WorkshopError::DownloadFailure(format!(
                "Cannot write {}: {}",
                archive_path.display(),
                e
            ))
        };

        fs::create_dir_all(&temp_dir).map_err(write_failure)?;
        if archive_path.exists() {
            fs::remove_file(&archive_path).map_err(write_failure)?;
        }
        fs::write(&archive_path, bytes).map_err(write_failure)?;

        ui::verbose(&format!(
            "Saved {} bytes to {}",
            bytes.len(),
            archive_path.display()
        ));
        Ok(archive_path)
    }

    fn place_workshop(&self, code: &str, extracted: PathBuf) -> Result<PathBuf> {
        let workshops_dir = self.paths.workshops_dir();
        fs::create_dir_all(&workshops_dir).map_err(|e| WorkshopError::io_at(&workshops_dir, e))?;

        let dest = self.paths.workshop_dir(code);
        if dest.exists() {
            ui::verbose(&format!("Removing stale {}", dest.display()));
            fs::remove_dir_all(&dest).map_err(|e| WorkshopError::io_at(&dest, e))?;
        }

        fs::rename(&extracted, &dest).map_err(|source| WorkshopError::FailedToMoveWorkshop {
            src: extracted.clone(),
            dest: dest.clone(),
            source,
        })?;

        Ok(dest)
    }
}

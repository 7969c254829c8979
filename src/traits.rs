//! Collaborator traits for dependency injection and testability
//!
//! The orchestrator never talks to the network or spawns processes
//! directly. It goes through these seams, so tests can substitute
//! in-memory fakes and no component relies on global state.

use crate::catalog::RemoteCatalog;
use crate::config::settings::Settings;
use crate::error::Result;
use crate::installer::dependencies::CommandDependencyInstaller;
use crate::remote::catalog_source::HttpCatalogSource;
use crate::remote::github::GitHubClient;
use crate::remote::notify::HttpInstallNotifier;
use crate::utils::paths::ManagerPaths;
use std::path::Path;

/// Source of the raw catalog document.
pub trait CatalogSource {
    /// Host the catalog is served from, used in error messages.
    fn host(&self) -> String;

    /// Whether the catalog host resolves at all.
    fn is_reachable(&self) -> bool;

    /// Fetch the catalog document body.
    fn fetch(&self) -> Result<String>;
}

/// One `refs/tags/*` entry from the upstream tag API.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
pub struct TagRef {
    #[serde(rename = "ref")]
    pub reference: String,
    pub object: TagObject,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
pub struct TagObject {
    pub sha: String,
}

/// GitHub access needed to resolve and download workshops.
pub trait GitHubApi {
    /// All tag refs of `owner/repo`.
    fn tags(&self, owner: &str, repo: &str) -> Result<Vec<TagRef>>;

    /// Zip archive of `owner/repo` at `reference` (sha or branch).
    fn archive(&self, owner: &str, repo: &str, reference: &str) -> Result<Vec<u8>>;
}

/// Exit status and captured output of a dependency install run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyOutput {
    pub exit_code: i32,
    pub output: String,
}

impl DependencyOutput {
    pub fn succeeded(&self) -> bool {
        self.exit_code == 0
    }
}

/// Installs a downloaded workshop's own dependencies.
pub trait DependencyInstaller {
    fn install(&self, workshop_dir: &Path) -> Result<DependencyOutput>;
}

/// Install notification endpoint. Callers ignore the result.
pub trait InstallNotifier {
    fn notify(&self, code: &str, version: &str) -> Result<()>;
}

/// Application context holding all collaborators
///
/// Commands borrow from this to build the installer, uninstaller and
/// updater for a single invocation.
pub struct AppContext {
    pub paths: ManagerPaths,
    pub settings: Settings,
    pub catalog: RemoteCatalog,
    pub github: Box<dyn GitHubApi>,
    pub dependencies: Box<dyn DependencyInstaller>,
    pub notifier: Box<dyn InstallNotifier>,
}

impl AppContext {
    pub fn new(
        paths: ManagerPaths,
        settings: Settings,
        catalog: RemoteCatalog,
        github: Box<dyn GitHubApi>,
        dependencies: Box<dyn DependencyInstaller>,
        notifier: Box<dyn InstallNotifier>,
    ) -> Self {
        Self {
            paths,
            settings,
            catalog,
            github,
            dependencies,
            notifier,
        }
    }

    /// Context backed by the real HTTP endpoints and dependency command.
    pub fn from_settings(paths: ManagerPaths, settings: Settings) -> Result<Self> {
        let catalog = RemoteCatalog::new(Box::new(HttpCatalogSource::new(&settings.catalog_url)?));
        let github = Box::new(GitHubClient::new(
            &settings.github_api_url,
            settings.github_token.clone(),
        )?);
        let dependencies = Box::new(CommandDependencyInstaller::from_command_line(
            &settings.dependency_command,
        )?);
        let notifier = Box::new(HttpInstallNotifier::new(
            &settings.notify_url,
            settings.notify,
        )?);

        Ok(Self::new(
            paths,
            settings,
            catalog,
            github,
            dependencies,
            notifier,
        ))
    }
}

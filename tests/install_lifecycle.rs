//! Install, uninstall and update against in-memory collaborators.

use std::cell::{Cell, RefCell};
use std::ffi::OsString;
use std::fs;
use std::io::{Cursor, Write};
use std::path::Path;

use tempfile::TempDir;
use workshop_manager::catalog::RemoteCatalog;
use workshop_manager::core::types::{BranchSpec, WorkshopVersion};
use workshop_manager::error::{DependencyFailure, Result, WorkshopError};
use workshop_manager::installer::Installer;
use workshop_manager::linker::Linker;
use workshop_manager::resolver::ReleaseResolver;
use workshop_manager::state::InstalledWorkshops;
use workshop_manager::traits::{
    CatalogSource, DependencyInstaller, DependencyOutput, GitHubApi, InstallNotifier, TagObject,
    TagRef,
};
use workshop_manager::uninstaller::Uninstaller;
use workshop_manager::updater::Updater;
use workshop_manager::utils::paths::ManagerPaths;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

const CATALOG: &str = r#"{
    "workshops": [
        {"workshop_code": "learnyouphp", "display_name": "Learn You PHP!", "github_owner": "php-school",
         "github_repo_name": "learn-you-php", "description": "An introduction to PHP", "type": "Core"},
        {"workshop_code": "php7", "display_name": "PHP 7", "github_owner": "php-school",
         "github_repo_name": "php7way", "description": "What's new in PHP 7", "type": "Core"}
    ]
}"#;

struct StaticCatalog;

impl CatalogSource for StaticCatalog {
    fn host(&self) -> String {
        "catalog.test".to_string()
    }

    fn is_reachable(&self) -> bool {
        true
    }

    fn fetch(&self) -> Result<String> {
        Ok(CATALOG.to_string())
    }
}

/// Serves tags from memory and builds a zipball for every archive request.
#[derive(Default)]
struct FakeGitHub {
    tags: RefCell<Vec<TagRef>>,
    downloads: RefCell<Vec<(String, String, String)>>,
    archive_unavailable: Cell<bool>,
}

impl FakeGitHub {
    fn with_tags(tags: &[(&str, &str)]) -> Self {
        let github = Self::default();
        for (tag, sha) in tags {
            github.push_tag(tag, sha);
        }
        github
    }

    fn push_tag(&self, tag: &str, sha: &str) {
        self.tags.borrow_mut().push(TagRef {
            reference: format!("refs/tags/{}", tag),
            object: TagObject {
                sha: sha.to_string(),
            },
        });
    }

    fn download_count(&self) -> usize {
        self.downloads.borrow().len()
    }
}

impl GitHubApi for FakeGitHub {
    fn tags(&self, _owner: &str, _repo: &str) -> Result<Vec<TagRef>> {
        Ok(self.tags.borrow().clone())
    }

    fn archive(&self, owner: &str, repo: &str, reference: &str) -> Result<Vec<u8>> {
        self.downloads.borrow_mut().push((
            owner.to_string(),
            repo.to_string(),
            reference.to_string(),
        ));
        if self.archive_unavailable.get() {
            return Err(WorkshopError::RemoteFetchError(
                "HTTP 502 Bad Gateway".to_string(),
            ));
        }
        let code = if repo == "php7way" { "php7" } else { "learnyouphp" };
        Ok(zipball(&format!("{}-{}", repo, reference), code))
    }
}

fn zipball(root: &str, code: &str) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();
    writer.add_directory(format!("{}/", root), options).unwrap();
    writer.add_directory(format!("{}/bin/", root), options).unwrap();
    writer
        .start_file(format!("{}/bin/{}", root, code), options)
        .unwrap();
    writer.write_all(b"#!/usr/bin/env php\n<?php\n").unwrap();
    writer
        .start_file(format!("{}/composer.json", root), options)
        .unwrap();
    writer.write_all(b"{}\n").unwrap();
    writer.finish().unwrap().into_inner()
}

struct FakeDependencies {
    result: DependencyOutput,
    runs: Cell<usize>,
}

impl FakeDependencies {
    fn succeeding() -> Self {
        Self::with_output(0, "Generating autoload files")
    }

    fn with_output(exit_code: i32, output: &str) -> Self {
        Self {
            result: DependencyOutput {
                exit_code,
                output: output.to_string(),
            },
            runs: Cell::new(0),
        }
    }
}

impl DependencyInstaller for FakeDependencies {
    fn install(&self, workshop_dir: &Path) -> Result<DependencyOutput> {
        assert!(workshop_dir.join("composer.json").exists());
        self.runs.set(self.runs.get() + 1);
        Ok(self.result.clone())
    }
}

#[derive(Default)]
struct RecordingNotifier {
    sent: RefCell<Vec<(String, String)>>,
}

impl InstallNotifier for RecordingNotifier {
    fn notify(&self, code: &str, version: &str) -> Result<()> {
        self.sent
            .borrow_mut()
            .push((code.to_string(), version.to_string()));
        Err(WorkshopError::RemoteFetchError("notify endpoint down".to_string()))
    }
}

struct Harness {
    _home: TempDir,
    paths: ManagerPaths,
    catalog: RemoteCatalog,
    github: FakeGitHub,
    dependencies: FakeDependencies,
    notifier: RecordingNotifier,
}

impl Harness {
    fn new(github: FakeGitHub, dependencies: FakeDependencies) -> Self {
        let home = tempfile::tempdir().unwrap();
        let paths = ManagerPaths::new(home.path().join(".php-school"));
        Self {
            _home: home,
            paths,
            catalog: RemoteCatalog::new(Box::new(StaticCatalog)),
            github,
            dependencies,
            notifier: RecordingNotifier::default(),
        }
    }

    fn store(&self) -> InstalledWorkshops {
        InstalledWorkshops::load(self.paths.state_file()).unwrap()
    }

    fn run<T>(
        &self,
        f: impl FnOnce(&ReleaseResolver<'_>, &Installer<'_>, &Uninstaller<'_>) -> T,
    ) -> T {
        let resolver = ReleaseResolver::new(&self.github);
        let search_path = OsString::from(self.paths.bin_dir());
        let linker = Linker::with_search_path(&self.paths, Some(search_path));
        let installer = Installer::new(
            &self.paths,
            &self.catalog,
            &resolver,
            &self.github,
            &self.dependencies,
            &self.notifier,
            &linker,
        );
        let uninstaller = Uninstaller::new(&self.paths, &linker);
        f(&resolver, &installer, &uninstaller)
    }

    fn install(&self, store: &mut InstalledWorkshops, code: &str) -> Result<WorkshopVersion> {
        self.run(|_, installer, _| installer.install(store, code, None))
            .map(|installed| installed.version)
    }
}

fn release_harness() -> Harness {
    Harness::new(
        FakeGitHub::with_tags(&[("1.0.0", "aaa111"), ("2.0.0", "ccc333"), ("1.5.0", "bbb222")]),
        FakeDependencies::succeeding(),
    )
}

#[test]
fn install_places_records_and_links_latest_release() {
    let harness = release_harness();
    let mut store = harness.store();

    let version = harness.install(&mut store, "learnyouphp").unwrap();
    assert_eq!(version, WorkshopVersion::Release("2.0.0".to_string()));

    let downloads = harness.github.downloads.borrow();
    assert_eq!(
        downloads.as_slice(),
        &[(
            "php-school".to_string(),
            "learn-you-php".to_string(),
            "ccc333".to_string()
        )]
    );

    let entrypoint = harness.paths.workshop_entrypoint("learnyouphp");
    assert!(entrypoint.is_file());
    assert!(!harness.paths.temp_dir().join("learnyouphp.zip").exists());
    assert!(!harness.paths.temp_dir().join("learn-you-php-ccc333").exists());
    assert_eq!(harness.dependencies.runs.get(), 1);

    let reloaded = harness.store();
    assert_eq!(reloaded.len(), 1);
    assert_eq!(
        reloaded.get("learnyouphp").unwrap().version.to_string(),
        "2.0.0"
    );

    assert_eq!(
        harness.notifier.sent.borrow().as_slice(),
        &[("learnyouphp".to_string(), "2.0.0".to_string())]
    );
}

#[cfg(unix)]
#[test]
fn install_links_entrypoint_as_executable() {
    use std::os::unix::fs::PermissionsExt;

    let harness = release_harness();
    let mut store = harness.store();
    harness.install(&mut store, "learnyouphp").unwrap();

    let link = harness.paths.bin_link("learnyouphp");
    let entrypoint = harness.paths.workshop_entrypoint("learnyouphp");
    assert!(fs::symlink_metadata(&link).unwrap().file_type().is_symlink());
    assert_eq!(fs::read_link(&link).unwrap(), entrypoint);

    let mode = fs::metadata(&entrypoint).unwrap().permissions().mode();
    assert_eq!(mode & 0o755, 0o755);
}

#[test]
fn already_installed_is_rejected_without_side_effects() {
    let harness = release_harness();
    let mut store = harness.store();
    harness.install(&mut store, "learnyouphp").unwrap();
    let before = fs::read_to_string(harness.paths.state_file()).unwrap();

    let err = harness.install(&mut store, "learnyouphp").unwrap_err();
    assert!(matches!(err, WorkshopError::AlreadyInstalled { ref code } if code == "learnyouphp"));
    assert_eq!(harness.github.download_count(), 1);
    assert_eq!(fs::read_to_string(harness.paths.state_file()).unwrap(), before);
}

#[test]
fn unknown_workshop_fails_before_download() {
    let harness = release_harness();
    let mut store = harness.store();

    let err = harness.install(&mut store, "not-a-workshop").unwrap_err();
    assert!(matches!(err, WorkshopError::NotFound { .. }));
    assert_eq!(harness.github.download_count(), 0);
    assert!(!harness.paths.workshops_dir().exists());
    assert!(!harness.paths.state_file().exists());
}

#[test]
fn workshop_without_tags_has_no_release() {
    let harness = Harness::new(FakeGitHub::default(), FakeDependencies::succeeding());
    let mut store = harness.store();

    let err = harness.install(&mut store, "php7").unwrap_err();
    assert!(matches!(err, WorkshopError::NoTaggedRelease { .. }));
    assert_eq!(harness.github.download_count(), 0);
}

#[test]
fn missing_extension_leaves_state_untouched() {
    let harness = Harness::new(
        FakeGitHub::with_tags(&[("1.0.0", "aaa111")]),
        FakeDependencies::with_output(
            2,
            "Problem 1\n    - the requested PHP extension mbstring is missing from your system.\n",
        ),
    );
    let mut store = harness.store();

    let err = harness.install(&mut store, "learnyouphp").unwrap_err();
    match err {
        WorkshopError::DependencyInstall(DependencyFailure::MissingExtensions(extensions)) => {
            assert_eq!(extensions, vec!["mbstring".to_string()]);
        }
        other => panic!("unexpected error: {other:?}"),
    }

    assert!(!store.has("learnyouphp"));
    assert!(harness.store().is_empty());
    assert!(harness.notifier.sent.borrow().is_empty());
    assert!(fs::symlink_metadata(harness.paths.bin_link("learnyouphp")).is_err());
}

#[test]
fn archive_error_is_a_download_failure() {
    let harness = release_harness();
    let mut store = harness.store();
    harness.install(&mut store, "php7").unwrap();
    let before = fs::read_to_string(harness.paths.state_file()).unwrap();

    harness.github.archive_unavailable.set(true);
    let err = harness.install(&mut store, "learnyouphp").unwrap_err();
    match err {
        WorkshopError::DownloadFailure(message) => assert!(message.contains("502")),
        other => panic!("unexpected error: {other:?}"),
    }

    assert!(!harness.paths.workshop_dir("learnyouphp").exists());
    assert!(!store.has("learnyouphp"));
    assert_eq!(fs::read_to_string(harness.paths.state_file()).unwrap(), before);
}

#[test]
fn stale_scratch_archive_is_replaced() {
    let harness = release_harness();
    let scratch = harness.paths.temp_dir().join("learnyouphp.zip");
    fs::create_dir_all(harness.paths.temp_dir()).unwrap();
    fs::write(&scratch, "truncated download from an earlier run").unwrap();

    let mut store = harness.store();
    harness.install(&mut store, "learnyouphp").unwrap();

    assert!(!scratch.exists());
    assert!(harness.paths.workshop_entrypoint("learnyouphp").is_file());
    assert!(harness.store().has("learnyouphp"));
}

#[cfg(unix)]
#[test]
fn blocked_destination_reports_both_paths() {
    let harness = release_harness();
    let mut store = harness.store();
    harness.install(&mut store, "php7").unwrap();
    let before = fs::read_to_string(harness.paths.state_file()).unwrap();

    // A dangling symlink is not seen as a stale directory, and a directory
    // cannot be renamed over it.
    let dest = harness.paths.workshop_dir("learnyouphp");
    std::os::unix::fs::symlink("/nonexistent/workshop", &dest).unwrap();

    let err = harness.install(&mut store, "learnyouphp").unwrap_err();
    match &err {
        WorkshopError::FailedToMoveWorkshop { src, dest: to, .. } => {
            assert_eq!(src, &harness.paths.temp_dir().join("learn-you-php-ccc333"));
            assert_eq!(to, &dest);
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(err.to_string().contains("learn-you-php-ccc333"));

    assert!(!store.has("learnyouphp"));
    assert_eq!(harness.dependencies.runs.get(), 1);
    assert_eq!(fs::read_to_string(harness.paths.state_file()).unwrap(), before);
}

#[test]
fn non_version_tag_is_not_reinstalled_after_reload() {
    let harness = Harness::new(
        FakeGitHub::with_tags(&[("release-2020", "aaa111")]),
        FakeDependencies::succeeding(),
    );
    let mut store = harness.store();
    harness.install(&mut store, "learnyouphp").unwrap();

    let mut reloaded = harness.store();
    assert_eq!(
        reloaded.get("learnyouphp").unwrap().version.to_string(),
        "release-2020"
    );

    let err = harness
        .run(|resolver, installer, uninstaller| {
            Updater::new(resolver, uninstaller, installer).update(&mut reloaded, "learnyouphp")
        })
        .unwrap_err();
    assert!(
        matches!(err, WorkshopError::NoUpdateAvailable { ref version, .. } if version == "release-2020")
    );
    assert_eq!(harness.github.download_count(), 1);
    assert!(harness.paths.workshop_entrypoint("learnyouphp").exists());
}

#[test]
fn unresolvable_dependencies_are_reported() {
    let harness = Harness::new(
        FakeGitHub::with_tags(&[("1.0.0", "aaa111")]),
        FakeDependencies::with_output(
            2,
            "Your requirements could not be resolved to an installable set of packages.",
        ),
    );
    let mut store = harness.store();

    let err = harness.install(&mut store, "learnyouphp").unwrap_err();
    assert!(matches!(
        err,
        WorkshopError::DependencyInstall(DependencyFailure::CouldNotResolve)
    ));
    assert!(store.is_empty());
}

#[test]
fn branch_install_downloads_from_fork() {
    let harness = release_harness();
    let mut store = harness.store();
    let branch =
        BranchSpec::with_repository("feature", "https://github.com/someone/learn-you-php").unwrap();

    let installed = harness
        .run(|_, installer, _| installer.install(&mut store, "learnyouphp", Some(branch)))
        .unwrap();

    assert_eq!(
        harness.github.downloads.borrow()[0],
        (
            "someone".to_string(),
            "learn-you-php".to_string(),
            "feature".to_string()
        )
    );
    assert!(installed.version.is_branch());

    let reloaded = harness.store();
    let version = &reloaded.get("learnyouphp").unwrap().version;
    assert_eq!(
        version.to_string(),
        "https://github.com/someone/learn-you-php:feature"
    );
    match version {
        WorkshopVersion::Branch(spec) => {
            assert_eq!(spec.branch(), "feature");
            assert_eq!(spec.repository().unwrap().owner, "someone");
        }
        other => panic!("expected a branch version, got {other:?}"),
    }
}

#[test]
fn stale_destination_is_replaced() {
    let harness = release_harness();
    let stale = harness.paths.workshop_dir("learnyouphp");
    fs::create_dir_all(&stale).unwrap();
    fs::write(stale.join("leftover.txt"), "old").unwrap();

    let mut store = harness.store();
    harness.install(&mut store, "learnyouphp").unwrap();

    assert!(!stale.join("leftover.txt").exists());
    assert!(harness.paths.workshop_entrypoint("learnyouphp").exists());
}

#[test]
fn uninstall_removes_files_entry_and_link() {
    let harness = release_harness();
    let mut store = harness.store();
    harness.install(&mut store, "learnyouphp").unwrap();

    let removed = harness
        .run(|_, _, uninstaller| uninstaller.uninstall(&mut store, "learnyouphp"))
        .unwrap();
    assert_eq!(removed.code(), "learnyouphp");

    assert!(!harness.paths.workshop_dir("learnyouphp").exists());
    assert!(fs::symlink_metadata(harness.paths.bin_link("learnyouphp")).is_err());
    assert!(!store.has("learnyouphp"));
    assert!(harness.store().is_empty());
}

#[test]
fn uninstall_of_unknown_workshop_changes_nothing() {
    let harness = release_harness();
    let mut store = harness.store();
    harness.install(&mut store, "learnyouphp").unwrap();

    let err = harness
        .run(|_, _, uninstaller| uninstaller.uninstall(&mut store, "php7"))
        .unwrap_err();
    assert!(matches!(err, WorkshopError::NotInstalled { ref code } if code == "php7"));
    assert_eq!(harness.store().len(), 1);
    assert!(harness.paths.workshop_dir("learnyouphp").exists());
}

#[test]
fn update_on_latest_release_does_nothing() {
    let harness = release_harness();
    let mut store = harness.store();
    harness.install(&mut store, "learnyouphp").unwrap();

    let err = harness
        .run(|resolver, installer, uninstaller| {
            Updater::new(resolver, uninstaller, installer).update(&mut store, "learnyouphp")
        })
        .unwrap_err();

    assert!(
        matches!(err, WorkshopError::NoUpdateAvailable { ref version, .. } if version == "2.0.0")
    );
    assert_eq!(harness.github.download_count(), 1);
    assert!(harness.paths.workshop_entrypoint("learnyouphp").exists());
}

#[test]
fn update_moves_to_newer_release() {
    let harness = Harness::new(
        FakeGitHub::with_tags(&[("1.0.0", "aaa111")]),
        FakeDependencies::succeeding(),
    );
    let mut store = harness.store();
    harness.install(&mut store, "learnyouphp").unwrap();

    harness.github.push_tag("1.1.0", "ddd444");
    let version = harness
        .run(|resolver, installer, uninstaller| {
            Updater::new(resolver, uninstaller, installer).update(&mut store, "learnyouphp")
        })
        .unwrap();

    assert_eq!(version, "1.1.0");
    assert_eq!(harness.github.download_count(), 2);
    assert_eq!(harness.github.downloads.borrow()[1].2, "ddd444");
    assert_eq!(
        harness.store().get("learnyouphp").unwrap().version.to_string(),
        "1.1.0"
    );
}

#[test]
fn update_of_unknown_workshop_is_not_installed() {
    let harness = release_harness();
    let mut store = harness.store();

    let err = harness
        .run(|resolver, installer, uninstaller| {
            Updater::new(resolver, uninstaller, installer).update(&mut store, "php7")
        })
        .unwrap_err();
    assert!(matches!(err, WorkshopError::NotInstalled { .. }));
    assert_eq!(harness.github.download_count(), 0);
}

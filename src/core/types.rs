use crate::core::versioning;
use crate::error::{Result, WorkshopError};
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::sync::LazyLock;

static GITHUB_REPO_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https?://(?:www\.)?github\.com/([A-Za-z0-9_.-]+)/([A-Za-z0-9_.-]+?)(?:\.git)?/?$")
        .expect("Invalid regex pattern")
});

/// Catalog record for an installable workshop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workshop {
    #[serde(rename = "workshop_code")]
    pub code: String,
    pub display_name: String,
    pub github_owner: String,
    pub github_repo_name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: String,
}

/// A workshop present in the local state document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstalledWorkshop {
    #[serde(flatten)]
    pub workshop: Workshop,
    pub version: WorkshopVersion,
}

impl InstalledWorkshop {
    pub fn new(workshop: Workshop, version: WorkshopVersion) -> Self {
        Self { workshop, version }
    }

    pub fn code(&self) -> &str {
        &self.workshop.code
    }
}

/// Latest tagged release of an upstream repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Release {
    pub tag: String,
    pub sha: String,
}

/// Source repository that replaces a workshop's own upstream for a branch install.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryOverride {
    pub url: String,
    pub owner: String,
    pub repo: String,
}

/// A branch to install from, optionally in another GitHub repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchSpec {
    branch: String,
    repository: Option<RepositoryOverride>,
}

impl BranchSpec {
    pub fn new(branch: impl Into<String>) -> Self {
        Self {
            branch: branch.into(),
            repository: None,
        }
    }

    /// Branch in another repository. The URL must be a GitHub repository URL.
    pub fn with_repository(branch: impl Into<String>, url: &str) -> Result<Self> {
        let captures =
            GITHUB_REPO_URL
                .captures(url.trim())
                .ok_or_else(|| WorkshopError::InvalidRepositoryUrl {
                    url: url.to_string(),
                })?;

        Ok(Self {
            branch: branch.into(),
            repository: Some(RepositoryOverride {
                url: url.trim().to_string(),
                owner: captures[1].to_string(),
                repo: captures[2].to_string(),
            }),
        })
    }

    pub fn branch(&self) -> &str {
        &self.branch
    }

    pub fn repository(&self) -> Option<&RepositoryOverride> {
        self.repository.as_ref()
    }

    /// Parse the `<repo-url>:<branch>` descriptor form.
    fn from_descriptor(descriptor: &str) -> Option<Self> {
        let (url, branch) = descriptor.rsplit_once(':')?;
        if branch.is_empty() || !GITHUB_REPO_URL.is_match(url) {
            return None;
        }
        Self::with_repository(branch, url).ok()
    }
}

impl fmt::Display for BranchSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.repository {
            Some(repo) => write!(f, "{}:{}", repo.url, self.branch),
            None => f.write_str(&self.branch),
        }
    }
}

/// Installed version: a release tag or the branch it was installed from.
///
/// Stored as a single string in the state document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkshopVersion {
    Release(String),
    Branch(BranchSpec),
}

impl WorkshopVersion {
    pub fn parse(raw: &str) -> Self {
        if let Some(spec) = BranchSpec::from_descriptor(raw) {
            return WorkshopVersion::Branch(spec);
        }
        if versioning::is_version_like(raw) {
            return WorkshopVersion::Release(raw.to_string());
        }
        WorkshopVersion::Branch(BranchSpec::new(raw))
    }

    /// Whether the stored version string is exactly `tag`.
    ///
    /// Compares the persisted form, so a release tag that reloads as a
    /// branch (`release-2020`) still matches itself.
    pub fn matches_tag(&self, tag: &str) -> bool {
        match self {
            WorkshopVersion::Release(current) => current == tag,
            WorkshopVersion::Branch(spec) => spec.repository.is_none() && spec.branch == tag,
        }
    }

    pub fn is_branch(&self) -> bool {
        matches!(self, WorkshopVersion::Branch(_))
    }
}

impl fmt::Display for WorkshopVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkshopVersion::Release(tag) => f.write_str(tag),
            WorkshopVersion::Branch(spec) => fmt::Display::fmt(spec, f),
        }
    }
}

impl Serialize for WorkshopVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for WorkshopVersion {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(WorkshopVersion::parse(&raw))
    }
}

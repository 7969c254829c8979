use std::path::PathBuf;
use thiserror::Error;

/// Why the dependency installer could not prepare a downloaded workshop.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DependencyFailure {
    #[error("missing PHP extensions: {}", .0.join(", "))]
    MissingExtensions(Vec<String>),

    #[error("the workshop's dependencies could not be resolved to an installable set")]
    CouldNotResolve,

    #[error("dependency installation failed: {output}")]
    Failed { output: String },
}

#[derive(Error, Debug)]
pub enum WorkshopError {
    #[error("Workshop '{code}' is already installed")]
    AlreadyInstalled { code: String },

    #[error("Workshop '{code}' was not found in the catalog")]
    NotFound { code: String },

    #[error("Workshop '{code}' is not installed")]
    NotInstalled { code: String },

    #[error("Invalid repository URL: '{url}' (expected https://github.com/<owner>/<repo>)")]
    InvalidRepositoryUrl { url: String },

    #[error("No tagged release found for {owner}/{repo} (network access may be required)")]
    NoTaggedRelease { owner: String, repo: String },

    #[error("Network access is required: could not resolve {host}")]
    RequiresNetworkAccess { host: String },

    #[error("Failed to download workshop: {0}")]
    DownloadFailure(String),

    #[error("Failed to move workshop from '{}' to '{}'", .src.display(), .dest.display())]
    FailedToMoveWorkshop {
        src: PathBuf,
        dest: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to install workshop dependencies: {0}")]
    DependencyInstall(DependencyFailure),

    #[error("No update available for '{code}' (already at {version})")]
    NoUpdateAvailable { code: String, version: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("IO error at '{}': {source}", .path.display())]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("State file '{}' is corrupted: {reason}", .path.display())]
    StateCorrupted { path: PathBuf, reason: String },

    /// Remote resource fetch error (HTTP, network, etc.)
    #[error("Failed to fetch remote resource: {0}")]
    RemoteFetchError(String),

    /// Serialization/Deserialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("System dependency missing: {0}")]
    DependencyMissing(String),

    #[error(transparent)]
    JsonError(#[from] serde_json::Error),

    #[error("KDL parse error: {0}")]
    KdlError(#[from] kdl::KdlError),

    #[error("{0}")]
    Other(String),
}

impl WorkshopError {
    pub fn io_at(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        WorkshopError::IoError {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, WorkshopError>;

use crate::error::{Result, WorkshopError};
use crate::project_identity;
use directories::UserDirs;
use std::env;
use std::path::{Path, PathBuf};

/// Filesystem layout under the manager home directory.
///
/// ```text
/// {home}/.temp/                      scratch downloads and extraction
/// {home}/workshops/{code}/           installed workshop root
/// {home}/workshops/{code}/bin/{code} workshop entrypoint
/// {home}/bin/{code}                  symlink exposed on PATH
/// {home}/installed.json              local state document
/// {home}/settings.kdl                user settings
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagerPaths {
    home: PathBuf,
}

impl ManagerPaths {
    pub fn new(home: impl Into<PathBuf>) -> Self {
        Self { home: home.into() }
    }

    /// Resolve the home from `WORKSHOP_MANAGER_HOME`, falling back to `~/.php-school`.
    pub fn discover() -> Result<Self> {
        if let Some(home) = env::var_os(project_identity::env_key("HOME"))
            && !home.is_empty()
        {
            return Ok(Self::new(expand_home(Path::new(&home))?));
        }

        let user_dirs = UserDirs::new().ok_or_else(|| {
            WorkshopError::Other("Could not determine user home directory".to_string())
        })?;
        Ok(Self::new(
            user_dirs.home_dir().join(project_identity::HOME_DIR_NAME),
        ))
    }

    pub fn home(&self) -> &Path {
        &self.home
    }

    pub fn temp_dir(&self) -> PathBuf {
        self.home.join(".temp")
    }

    pub fn workshops_dir(&self) -> PathBuf {
        self.home.join("workshops")
    }

    pub fn workshop_dir(&self, code: &str) -> PathBuf {
        self.workshops_dir().join(code)
    }

    pub fn workshop_entrypoint(&self, code: &str) -> PathBuf {
        self.workshop_dir(code).join("bin").join(code)
    }

    pub fn bin_dir(&self) -> PathBuf {
        self.home.join("bin")
    }

    pub fn bin_link(&self, code: &str) -> PathBuf {
        self.bin_dir().join(code)
    }

    pub fn state_file(&self) -> PathBuf {
        self.home.join(project_identity::STATE_FILE_BASENAME)
    }

    pub fn settings_file(&self) -> PathBuf {
        self.home.join(project_identity::SETTINGS_FILE_BASENAME)
    }
}

pub fn expand_home(path: &Path) -> Result<PathBuf> {
    let path_str = path.to_string_lossy();

    if !path_str.starts_with('~') {
        return Ok(path.to_path_buf());
    }

    let user_dirs = UserDirs::new().ok_or_else(|| {
        WorkshopError::Other("Could not determine user home directory".to_string())
    })?;

    let home = user_dirs.home_dir();

    if path_str == "~" {
        return Ok(home.to_path_buf());
    }

    let stripped = path_str
        .strip_prefix("~/")
        .ok_or_else(|| WorkshopError::Other(format!("Invalid path format: {}", path_str)))?;

    Ok(home.join(stripped))
}

//! Settings Module
//!
//! Endpoints and the dependency command, read from `{home}/settings.kdl` and
//! overridden by `WORKSHOP_MANAGER_*` environment variables.
//!
//! ```kdl
//! settings {
//!     catalog-url "https://www.phpschool.io/api/workshops"
//!     notify #false
//!     dependency-command "composer install --no-interaction --no-dev"
//! }
//! ```

use crate::error::{Result, WorkshopError};
use crate::project_identity;
use crate::utils::paths::ManagerPaths;
use kdl::{KdlDocument, KdlNode};
use std::env;
use std::fs;
use std::path::Path;

const VALID_KEYS: [&str; 6] = [
    "catalog-url",
    "github-api-url",
    "notify-url",
    "notify",
    "github-token",
    "dependency-command",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub catalog_url: String,
    pub github_api_url: String,
    pub notify_url: String,
    pub notify: bool,
    pub github_token: Option<String>,
    pub dependency_command: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            catalog_url: project_identity::DEFAULT_CATALOG_URL.to_string(),
            github_api_url: project_identity::DEFAULT_GITHUB_API_URL.to_string(),
            notify_url: project_identity::DEFAULT_NOTIFY_URL.to_string(),
            notify: true,
            github_token: None,
            dependency_command: project_identity::DEFAULT_DEPENDENCY_COMMAND.to_string(),
        }
    }
}

impl Settings {
    /// Load settings for `paths`, then apply environment overrides.
    pub fn load(paths: &ManagerPaths) -> Result<Self> {
        let mut settings = Self::from_file(&paths.settings_file())?;
        settings.apply_overrides(|key| env::var(key).ok())?;
        if settings.github_token.is_none() {
            settings.github_token = env::var("GITHUB_TOKEN").ok().filter(|t| !t.is_empty());
        }
        Ok(settings)
    }

    /// Defaults merged with the settings file, if it exists.
    pub fn from_file(path: &Path) -> Result<Self> {
        let mut settings = Self::default();
        if !path.exists() {
            return Ok(settings);
        }

        let content = fs::read_to_string(path).map_err(|e| WorkshopError::io_at(path, e))?;
        settings.apply_kdl(&content)?;
        Ok(settings)
    }

    fn apply_kdl(&mut self, content: &str) -> Result<()> {
        let doc: KdlDocument = content.parse()?;
        let Some(children) = doc.get("settings").and_then(KdlNode::children) else {
            return Ok(());
        };

        for node in children.nodes() {
            let key = node.name().value();
            let value = first_value(node).ok_or_else(|| {
                WorkshopError::ConfigError(format!("Setting '{}' has no value", key))
            })?;
            self.set(key, &value)?;
        }
        Ok(())
    }

    /// Apply `WORKSHOP_MANAGER_<KEY>` overrides, e.g. `WORKSHOP_MANAGER_CATALOG_URL`.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        for key in VALID_KEYS {
            let env_name = project_identity::env_key(&key.replace('-', "_").to_uppercase());
            if let Some(value) = lookup(&env_name) {
                self.set(key, &value)?;
            }
        }
        Ok(())
    }

    /// Set a setting by its file key.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        validate_key(key)?;
        match key {
            "catalog-url" => self.catalog_url = non_empty(key, value)?,
            "github-api-url" => self.github_api_url = non_empty(key, value)?,
            "notify-url" => self.notify_url = non_empty(key, value)?,
            "notify" => self.notify = parse_bool(key, value)?,
            "github-token" => {
                self.github_token = Some(value.trim().to_string()).filter(|t| !t.is_empty())
            }
            "dependency-command" => self.dependency_command = non_empty(key, value)?,
            _ => {}
        }
        Ok(())
    }

    /// Effective values for display; the token is masked.
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        vec![
            ("catalog-url", self.catalog_url.clone()),
            ("github-api-url", self.github_api_url.clone()),
            ("notify-url", self.notify_url.clone()),
            ("notify", self.notify.to_string()),
            (
                "github-token",
                match &self.github_token {
                    Some(_) => "********".to_string(),
                    None => "(not set)".to_string(),
                },
            ),
            ("dependency-command", self.dependency_command.clone()),
        ]
    }
}

fn validate_key(key: &str) -> Result<()> {
    if !VALID_KEYS.contains(&key) {
        return Err(WorkshopError::ConfigError(format!(
            "Unknown setting: '{}'. Valid settings: {}",
            key,
            VALID_KEYS.join(", ")
        )));
    }
    Ok(())
}

fn non_empty(key: &str, value: &str) -> Result<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(WorkshopError::ConfigError(format!(
            "Setting '{}' cannot be empty",
            key
        )));
    }
    Ok(value.to_string())
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.trim() {
        "true" | "on" | "1" => Ok(true),
        "false" | "off" | "0" => Ok(false),
        other => Err(WorkshopError::ConfigError(format!(
            "Invalid value for '{}': '{}'. Valid: true, false",
            key, other
        ))),
    }
}

fn first_value(node: &KdlNode) -> Option<String> {
    let entry = node.entries().first()?;
    let value = entry.value();
    if let Some(s) = value.as_string() {
        return Some(s.to_string());
    }
    value.as_bool().map(|b| b.to_string())
}

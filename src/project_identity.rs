//! Central project identity contract.
//!
//! This module is the single source of truth for runtime identity values:
//! binary name, home directory name, environment prefix and the default
//! remote endpoints.

pub const DISPLAY_NAME: &str = "Workshop Manager";
pub const BINARY_NAME: &str = "workshop-manager";
pub const HOME_DIR_NAME: &str = ".php-school";
pub const ENV_PREFIX: &str = "WORKSHOP_MANAGER";
pub const STATE_FILE_BASENAME: &str = "installed.json";
pub const SETTINGS_FILE_BASENAME: &str = "settings.kdl";

pub const DEFAULT_CATALOG_URL: &str = "https://www.phpschool.io/api/workshops";
pub const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";
pub const DEFAULT_NOTIFY_URL: &str = "https://www.phpschool.io/api/workshops/install";
pub const DEFAULT_DEPENDENCY_COMMAND: &str = "composer install --no-interaction";

pub fn env_key(suffix: &str) -> String {
    format!("{}_{}", ENV_PREFIX, suffix)
}

pub fn user_agent() -> String {
    format!("{}-cli", BINARY_NAME)
}

pub fn cli_with(args: &str) -> String {
    format!("{} {}", BINARY_NAME, args)
}

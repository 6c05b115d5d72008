use std::path::Path;
use std::{env, fs};

use super::SeasonConfig;
use crate::error::ConfigError;

pub const SEASON_CONFIG_PATH_ENV: &str = "CFB_SEASON_CONFIG_PATH";

/// Reads and validates a JSON config file.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<SeasonConfig, ConfigError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)
        .map_err(|source| ConfigError::Read { path: path.display().to_string(), source })?;
    SeasonConfig::from_json(&content)
}

/// Loads a config override from `CFB_SEASON_CONFIG_PATH`.
///
/// Returns `Ok(None)` when the variable is unset or blank.
pub fn load_from_env() -> Result<Option<SeasonConfig>, ConfigError> {
    let Ok(path) = env::var(SEASON_CONFIG_PATH_ENV) else {
        return Ok(None);
    };

    let path = path.trim();
    if path.is_empty() {
        return Ok(None);
    }

    let config = load_from_path(path)?;
    tracing::info!("Loaded season config override from {SEASON_CONFIG_PATH_ENV}='{path}'");
    Ok(Some(config))
}

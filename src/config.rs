//! Runtime configuration: environment variables with defaults.
//!
//! The binary layers its command-line flags on top of [`AppConfig::from_env`].

use std::env;
use std::path::PathBuf;

use thiserror::Error;

use crate::engine::ControllerConfig;
use crate::types::{GridSize, GridSizeError, DEFAULT_EMOJI_MAX_GRID};

pub const ENV_GRID_SIZE: &str = "MEMORY_GRID_SIZE";
pub const ENV_USE_EMOJI: &str = "MEMORY_USE_EMOJI";
pub const ENV_SEED: &str = "MEMORY_SEED";
pub const ENV_RECORDS_PATH: &str = "MEMORY_RECORDS_PATH";
pub const ENV_NO_SAVE: &str = "MEMORY_NO_SAVE";
pub const ENV_LOG_PATH: &str = "MEMORY_LOG_PATH";
pub const ENV_LOG_FILTER: &str = "MEMORY_LOG";
pub const ENV_EMOJI_MAX_GRID: &str = "MEMORY_EMOJI_MAX_GRID";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid grid size {0:?}: expected a number")]
    NotANumber(String),
    #[error(transparent)]
    GridSize(#[from] GridSizeError),
}

/// Parse a grid dimension as typed by a user (`"6"`, `" 8 "`).
pub fn parse_grid_size(raw: &str) -> Result<GridSize, ConfigError> {
    let n: u8 = raw
        .trim()
        .parse()
        .map_err(|_| ConfigError::NotANumber(raw.to_string()))?;
    Ok(GridSize::try_from(n)?)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub grid_size: GridSize,
    pub use_emoji: bool,
    /// Largest board that still uses emoji faces.
    pub emoji_max_grid: u8,
    /// Deal seed; `None` seeds from OS entropy.
    pub seed: Option<u64>,
    /// Records file; `None` means the default location.
    pub records_path: Option<PathBuf>,
    /// Keep records in memory only.
    pub no_save: bool,
    pub log_path: Option<PathBuf>,
    pub log_filter: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            grid_size: GridSize::default(),
            use_emoji: true,
            emoji_max_grid: DEFAULT_EMOJI_MAX_GRID,
            seed: None,
            records_path: None,
            no_save: false,
            log_path: None,
            log_filter: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Create from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) over any variable source.
    ///
    /// Only a malformed grid size is an error; other unparsable values fall
    /// back to their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let var = |key: &str| {
            lookup(key)
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        };

        let grid_size = match var(ENV_GRID_SIZE) {
            Some(raw) => parse_grid_size(&raw)?,
            None => defaults.grid_size,
        };

        let use_emoji = var(ENV_USE_EMOJI)
            .and_then(|s| parse_flag(&s))
            .unwrap_or(defaults.use_emoji);

        let emoji_max_grid = var(ENV_EMOJI_MAX_GRID)
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.emoji_max_grid);

        let seed = var(ENV_SEED).and_then(|s| s.parse().ok());

        let no_save = var(ENV_NO_SAVE)
            .and_then(|s| parse_flag(&s))
            .unwrap_or(defaults.no_save);

        Ok(Self {
            grid_size,
            use_emoji,
            emoji_max_grid,
            seed,
            records_path: var(ENV_RECORDS_PATH).map(PathBuf::from),
            no_save,
            log_path: var(ENV_LOG_PATH).map(PathBuf::from),
            log_filter: var(ENV_LOG_FILTER).unwrap_or(defaults.log_filter),
        })
    }

    pub fn controller_config(&self) -> ControllerConfig {
        ControllerConfig {
            grid_size: self.grid_size,
            use_emoji: self.use_emoji,
            emoji_max_grid: self.emoji_max_grid,
        }
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_without_env() {
        let config = AppConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.grid_size.n(), 4);
        assert!(config.use_emoji);
    }

    #[test]
    fn test_reads_all_variables() {
        let config = AppConfig::from_lookup(lookup(&[
            (ENV_GRID_SIZE, "6"),
            (ENV_USE_EMOJI, "off"),
            (ENV_SEED, "42"),
            (ENV_RECORDS_PATH, "/tmp/r.json"),
            (ENV_NO_SAVE, "1"),
            (ENV_LOG_PATH, " /tmp/memory.log "),
            (ENV_LOG_FILTER, "debug"),
            (ENV_EMOJI_MAX_GRID, "12"),
        ]))
        .unwrap();

        assert_eq!(config.grid_size.n(), 6);
        assert!(!config.use_emoji);
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.records_path, Some(PathBuf::from("/tmp/r.json")));
        assert!(config.no_save);
        assert_eq!(config.log_path, Some(PathBuf::from("/tmp/memory.log")));
        assert_eq!(config.log_filter, "debug");
        assert_eq!(config.controller_config().emoji_max_grid, 12);
    }

    #[test]
    fn test_invalid_grid_size_is_rejected() {
        assert_eq!(
            AppConfig::from_lookup(lookup(&[(ENV_GRID_SIZE, "5")])),
            Err(ConfigError::GridSize(GridSizeError::Odd(5)))
        );
        assert_eq!(
            AppConfig::from_lookup(lookup(&[(ENV_GRID_SIZE, "big")])),
            Err(ConfigError::NotANumber("big".to_string()))
        );
    }

    #[test]
    fn test_unparsable_optional_values_fall_back() {
        let config = AppConfig::from_lookup(lookup(&[
            (ENV_USE_EMOJI, "maybe"),
            (ENV_SEED, "-3"),
            (ENV_LOG_PATH, "   "),
        ]))
        .unwrap();
        assert!(config.use_emoji);
        assert_eq!(config.seed, None);
        assert_eq!(config.log_path, None);
    }
}

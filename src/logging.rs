//! File-only tracing setup.
//!
//! Stdout belongs to the game screen, so logs go to a file or nowhere.
//! Failures surface as errors before the terminal enters raw mode.

use std::fs::{self, File, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::AppConfig;

/// Open `path` for appending, creating missing parent directories.
pub fn open_log_file(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create log directory {}", parent.display()))?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open log file {}", path.display()))
}

/// Install the global subscriber when a log file is configured.
pub fn init(config: &AppConfig) -> Result<()> {
    let Some(path) = config.log_path.as_deref() else {
        return Ok(());
    };

    let env_filter = EnvFilter::try_new(&config.log_filter)
        .with_context(|| format!("invalid log filter {:?}", config.log_filter))?;
    let file = open_log_file(path)?;

    tracing_subscriber::registry()
        .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
        .with(env_filter)
        .try_init()
        .context("failed to install tracing subscriber")?;

    info!(path = %path.display(), "logging initialized");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_open_log_file_creates_parents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a").join("b").join("memory.log");

        let mut file = open_log_file(&path).unwrap();
        writeln!(file, "first").unwrap();
        drop(file);
        let mut file = open_log_file(&path).unwrap();
        writeln!(file, "second").unwrap();
        drop(file);

        assert_eq!(fs::read_to_string(&path).unwrap(), "first\nsecond\n");
    }

    #[test]
    fn test_open_log_file_reports_blocked_directory() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        fs::write(&blocker, "x").unwrap();

        let err = open_log_file(&blocker.join("memory.log")).unwrap_err();
        assert!(err.to_string().contains("log directory"), "{err:#}");
    }

    #[test]
    fn test_init_without_log_path_is_noop() {
        let config = AppConfig {
            log_path: None,
            ..AppConfig::default()
        };
        assert!(init(&config).is_ok());
    }

    #[test]
    fn test_init_rejects_bad_filter() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig {
            log_path: Some(dir.path().join("memory.log")),
            log_filter: "memory=loud".to_string(),
            ..AppConfig::default()
        };
        assert!(init(&config).is_err());
    }
}

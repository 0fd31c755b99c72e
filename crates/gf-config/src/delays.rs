use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Pacing parameters for worker loops, all in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelayConfig {
    /// Lower bound of the wait between iterations.
    pub min_delay_ms: u64,
    /// Upper bound of the wait between iterations.
    pub max_delay_ms: u64,
    /// Upper bound of the per-account startup jitter.
    pub initial_delay_max_ms: u64,
}

impl Default for DelayConfig {
    fn default() -> Self {
        Self {
            min_delay_ms: 30_000,
            max_delay_ms: 120_000,
            initial_delay_max_ms: 15_000,
        }
    }
}

/// Result of loading an external source.
///
/// Distinguishes "file absent" from "file present but unusable" so callers
/// can log the right branch before falling back to defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome<T> {
    Loaded(T),
    Missing,
    Invalid(String),
}

impl<T> LoadOutcome<T> {
    pub fn loaded(self) -> Option<T> {
        match self {
            Self::Loaded(value) => Some(value),
            Self::Missing | Self::Invalid(_) => None,
        }
    }
}

/// Load the delay config from a TOML record.
///
/// `Invalid` covers unreadable files, parse failures, and records violating
/// the `min_delay_ms <= max_delay_ms` invariant.
pub fn load_delay_config(path: &Path) -> LoadOutcome<DelayConfig> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return LoadOutcome::Missing,
        Err(err) => return LoadOutcome::Invalid(format!("read failed: {err}")),
    };

    let config: DelayConfig = match toml::from_str(&content) {
        Ok(config) => config,
        Err(err) => return LoadOutcome::Invalid(format!("parse failed: {err}")),
    };

    if config.min_delay_ms > config.max_delay_ms {
        return LoadOutcome::Invalid(format!(
            "min_delay_ms ({}) exceeds max_delay_ms ({})",
            config.min_delay_ms, config.max_delay_ms
        ));
    }

    LoadOutcome::Loaded(config)
}

/// Persist the delay config as TOML.
pub fn store_delay_config(path: &Path, config: &DelayConfig) -> Result<()> {
    let content = toml::to_string_pretty(config).context("Failed to serialize delay config")?;
    std::fs::write(path, content)
        .with_context(|| format!("Failed to write delay config: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let config = DelayConfig::default();
        assert_eq!(config.min_delay_ms, 30_000);
        assert_eq!(config.max_delay_ms, 120_000);
        assert_eq!(config.initial_delay_max_ms, 15_000);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let outcome = load_delay_config(&dir.path().join("delays.toml"));
        assert_eq!(outcome, LoadOutcome::Missing);
    }

    #[test]
    fn test_load_valid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("delays.toml");
        std::fs::write(
            &path,
            "min_delay_ms = 1000\nmax_delay_ms = 2000\ninitial_delay_max_ms = 500\n",
        )
        .unwrap();

        match load_delay_config(&path) {
            LoadOutcome::Loaded(config) => {
                assert_eq!(config.min_delay_ms, 1000);
                assert_eq!(config.max_delay_ms, 2000);
                assert_eq!(config.initial_delay_max_ms, 500);
            }
            other => panic!("Expected Loaded, got {:?}", other),
        }
    }

    #[test]
    fn test_load_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("delays.toml");
        std::fs::write(&path, "min_delay_ms = \"not a number\"").unwrap();

        match load_delay_config(&path) {
            LoadOutcome::Invalid(reason) => assert!(reason.contains("parse failed")),
            other => panic!("Expected Invalid, got {:?}", other),
        }
    }

    #[test]
    fn test_load_rejects_inverted_bounds() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("delays.toml");
        std::fs::write(
            &path,
            "min_delay_ms = 5000\nmax_delay_ms = 1000\ninitial_delay_max_ms = 500\n",
        )
        .unwrap();

        match load_delay_config(&path) {
            LoadOutcome::Invalid(reason) => assert!(reason.contains("exceeds")),
            other => panic!("Expected Invalid, got {:?}", other),
        }
    }

    #[test]
    fn test_store_then_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("delays.toml");
        let config = DelayConfig {
            min_delay_ms: 10,
            max_delay_ms: 20,
            initial_delay_max_ms: 5,
        };

        store_delay_config(&path, &config).unwrap();
        assert_eq!(load_delay_config(&path), LoadOutcome::Loaded(config));
    }

    #[test]
    fn test_loaded_helper() {
        assert_eq!(LoadOutcome::Loaded(7u64).loaded(), Some(7));
        assert_eq!(LoadOutcome::<u64>::Missing.loaded(), None);
        assert_eq!(LoadOutcome::<u64>::Invalid("x".into()).loaded(), None);
    }
}

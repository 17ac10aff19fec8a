//! Worker configuration loaded from environment variables.

use std::time::Duration;

use anyhow::{bail, Context};

/// Default number of writes allowed per batch.
pub const DEFAULT_BATCH_SIZE: u32 = 10;

/// Default pause between batches, in milliseconds.
pub const DEFAULT_BATCH_PAUSE_MS: u64 = 1000;

/// Runtime configuration of the worker.
///
/// | Env Var          | Default |
/// |------------------|---------|
/// | `DATABASE_URL`   | required |
/// | `BATCH_SIZE`     | `10`    |
/// | `BATCH_PAUSE_MS` | `1000`  |
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    pub database_url: String,
    pub batch_size: u32,
    pub batch_pause_ms: u64,
}

impl WorkerConfig {
    /// Load from the process environment.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = match lookup("DATABASE_URL") {
            Some(url) if !url.trim().is_empty() => url,
            _ => bail!("DATABASE_URL must be set"),
        };

        let batch_size = match lookup("BATCH_SIZE") {
            Some(v) => v
                .parse::<u32>()
                .with_context(|| format!("BATCH_SIZE must be a positive integer, got '{v}'"))?,
            None => DEFAULT_BATCH_SIZE,
        };
        if batch_size == 0 {
            bail!("BATCH_SIZE must be at least 1");
        }

        let batch_pause_ms = match lookup("BATCH_PAUSE_MS") {
            Some(v) => v
                .parse::<u64>()
                .with_context(|| format!("BATCH_PAUSE_MS must be an integer, got '{v}'"))?,
            None => DEFAULT_BATCH_PAUSE_MS,
        };

        Ok(Self {
            database_url,
            batch_size,
            batch_pause_ms,
        })
    }

    /// Apply command-line overrides.
    pub fn with_overrides(mut self, batch_size: Option<u32>, pause_ms: Option<u64>) -> Self {
        if let Some(size) = batch_size {
            self.batch_size = size.max(1);
        }
        if let Some(ms) = pause_ms {
            self.batch_pause_ms = ms;
        }
        self
    }

    pub fn batch_pause(&self) -> Duration {
        Duration::from_millis(self.batch_pause_ms)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> anyhow::Result<WorkerConfig> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        WorkerConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn missing_database_url_is_an_error() {
        let err = load(&[]).unwrap_err();
        assert!(err.to_string().contains("DATABASE_URL"));
        assert!(load(&[("DATABASE_URL", "  ")]).is_err());
    }

    #[test]
    fn defaults_apply() {
        let config = load(&[("DATABASE_URL", "postgres://localhost/talentops")]).unwrap();
        assert_eq!(config.batch_size, DEFAULT_BATCH_SIZE);
        assert_eq!(config.batch_pause(), Duration::from_secs(1));
    }

    #[test]
    fn env_values_parsed() {
        let config = load(&[
            ("DATABASE_URL", "postgres://localhost/talentops"),
            ("BATCH_SIZE", "25"),
            ("BATCH_PAUSE_MS", "0"),
        ])
        .unwrap();
        assert_eq!(config.batch_size, 25);
        assert_eq!(config.batch_pause_ms, 0);
    }

    #[test]
    fn invalid_numbers_rejected() {
        assert!(load(&[("DATABASE_URL", "postgres://x"), ("BATCH_SIZE", "ten")]).is_err());
        assert!(load(&[("DATABASE_URL", "postgres://x"), ("BATCH_SIZE", "0")]).is_err());
        assert!(load(&[("DATABASE_URL", "postgres://x"), ("BATCH_PAUSE_MS", "-5")]).is_err());
    }

    #[test]
    fn cli_overrides_win() {
        let config = load(&[("DATABASE_URL", "postgres://x")])
            .unwrap()
            .with_overrides(Some(0), Some(250));
        assert_eq!(config.batch_size, 1);
        assert_eq!(config.batch_pause_ms, 250);
    }
}

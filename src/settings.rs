//! Process-level runtime settings.
//!
//! Settings are read from an optional file and `SHIORI_*` environment
//! variables (e.g. `SHIORI_WORKER_THREADS=8`); every field has a default, so
//! an empty environment yields [`Settings::default`].

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

const ENV_PREFIX: &str = "SHIORI";

/// Tunables shared by the worker pool and the HTTP transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Worker threads of a dedicated pool
    #[serde(default = "default_worker_threads")]
    pub worker_threads: usize,

    /// Default User-Agent for sources that do not override it
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Minimum delay between two requests to the same source
    #[serde(default = "default_request_delay_ms")]
    pub request_delay_ms: u64,

    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            worker_threads: default_worker_threads(),
            user_agent: default_user_agent(),
            request_delay_ms: default_request_delay_ms(),
            max_retries: default_max_retries(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_worker_threads() -> usize {
    4
}

fn default_user_agent() -> String {
    concat!("Shiori/", env!("CARGO_PKG_VERSION")).to_string()
}

fn default_request_delay_ms() -> u64 {
    200
}

fn default_max_retries() -> u32 {
    3
}

fn default_timeout_secs() -> u64 {
    30
}

impl Settings {
    /// Loads settings from the environment only.
    pub fn from_env() -> Result<Self> {
        let settings = ::config::Config::builder()
            .add_source(::config::Environment::with_prefix(ENV_PREFIX))
            .build()?;
        Ok(settings.try_deserialize()?)
    }

    /// Loads settings from a file, with environment variables taking precedence.
    pub fn load(path: &Path) -> Result<Self> {
        let settings = ::config::Config::builder()
            .add_source(::config::File::from(path))
            .add_source(::config::Environment::with_prefix(ENV_PREFIX))
            .build()?;
        Ok(settings.try_deserialize()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let settings = Settings::default();
        assert!(settings.worker_threads > 0);
        assert!(settings.user_agent.starts_with("Shiori/"));
        assert_eq!(settings.max_retries, 3);
    }

    #[test]
    fn partial_source_uses_field_defaults() {
        let settings: Settings = ::config::Config::builder()
            .set_override("worker_threads", 2)
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();
        assert_eq!(settings.worker_threads, 2);
        assert_eq!(settings.timeout_secs, 30);
    }

    #[test]
    fn load_reads_file_and_fills_defaults() {
        let path = std::env::temp_dir()
            .join(format!("shiori-settings-{}.toml", std::process::id()));
        std::fs::write(&path, "worker_threads = 6\nrequest_delay_ms = 1000\n").unwrap();

        let settings = Settings::load(&path);
        std::fs::remove_file(&path).unwrap();

        let settings = settings.unwrap();
        assert_eq!(settings.worker_threads, 6);
        assert_eq!(settings.request_delay_ms, 1000);
        assert_eq!(settings.max_retries, 3);
    }

    #[test]
    fn load_missing_file_is_config_error() {
        let path = std::env::temp_dir().join("shiori-no-such-settings.toml");
        assert!(matches!(Settings::load(&path), Err(crate::Error::Config(_))));
    }

    #[test]
    fn from_env_without_variables_is_default_sized() {
        let settings = Settings::from_env().unwrap();
        assert!(settings.worker_threads > 0);
        assert!(!settings.user_agent.is_empty());
    }
}

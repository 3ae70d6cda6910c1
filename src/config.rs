//! Runtime configuration
//!
//! Everything is read from environment variables so the MCP client that
//! launches the server can configure it:
//!
//! | Variable                   | Meaning                                  |
//! |----------------------------|------------------------------------------|
//! | `SARC_DATABASE_PATH`       | SQLite file (default `<project>/data/sarcopenia.db`) |
//! | `SARC_REMOTE_URL`          | Base URL of the remote store; unset disables pushing |
//! | `SARC_REMOTE_API_KEY`      | Key sent to the remote store             |
//! | `SARC_REMOTE_TIMEOUT_SECS` | Request timeout, default 10              |

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

use crate::remote::{DisabledStore, PostgrestStore, RemoteError, RemoteStore};

pub const DATABASE_PATH_VAR: &str = "SARC_DATABASE_PATH";
pub const REMOTE_URL_VAR: &str = "SARC_REMOTE_URL";
pub const REMOTE_API_KEY_VAR: &str = "SARC_REMOTE_API_KEY";
pub const REMOTE_TIMEOUT_VAR: &str = "SARC_REMOTE_TIMEOUT_SECS";

const DEFAULT_REMOTE_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} is set but {1} is missing")]
    MissingCompanion(&'static str, &'static str),

    #[error("{var} must be a positive whole number of seconds, got {value:?}")]
    InvalidTimeout { var: &'static str, value: String },

    #[error("Could not build the remote store client: {0}")]
    Remote(#[from] RemoteError),
}

/// Remote store connection settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteConfig {
    pub url: String,
    pub api_key: String,
    pub timeout: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub database_path: PathBuf,
    pub remote: Option<RemoteConfig>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build from any variable source; blank values count as unset
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());

        let database_path = get(DATABASE_PATH_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(default_database_path);

        let remote = match get(REMOTE_URL_VAR) {
            None => None,
            Some(url) => {
                let api_key = get(REMOTE_API_KEY_VAR)
                    .ok_or(ConfigError::MissingCompanion(REMOTE_URL_VAR, REMOTE_API_KEY_VAR))?;
                let timeout_secs = match get(REMOTE_TIMEOUT_VAR) {
                    None => DEFAULT_REMOTE_TIMEOUT_SECS,
                    Some(value) => match value.trim().parse::<u64>() {
                        Ok(secs) if secs > 0 => secs,
                        _ => {
                            return Err(ConfigError::InvalidTimeout {
                                var: REMOTE_TIMEOUT_VAR,
                                value,
                            })
                        }
                    },
                };
                Some(RemoteConfig {
                    url,
                    api_key,
                    timeout: Duration::from_secs(timeout_secs),
                })
            }
        };

        Ok(Self {
            database_path,
            remote,
        })
    }

    /// The remote store this configuration selects
    pub fn remote_store(&self) -> Result<Arc<dyn RemoteStore>, ConfigError> {
        match &self.remote {
            Some(remote) => {
                let store = PostgrestStore::new(&remote.url, &remote.api_key, remote.timeout)?;
                Ok(Arc::new(store))
            }
            None => Ok(Arc::new(DisabledStore)),
        }
    }
}

/// `<project>/data/sarcopenia.db`, where the project root is found by walking up
/// out of `target/{debug,release}` when run from a cargo build.
pub fn default_database_path() -> PathBuf {
    let mut path = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|p| p.to_path_buf()))
        .unwrap_or_else(|| PathBuf::from("."));

    if path.ends_with("release") || path.ends_with("debug") {
        if let Some(grandparent) = path.parent().and_then(|p| p.parent()) {
            path = grandparent.to_path_buf();
        }
    }

    path.push("data");
    path.push("sarcopenia.db");
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |var| map.get(var).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert!(config.database_path.ends_with("data/sarcopenia.db"));
        assert_eq!(config.remote, None);
    }

    #[test]
    fn test_remote_settings() {
        let config = Config::from_lookup(lookup(&[
            (DATABASE_PATH_VAR, "/tmp/sarc.db"),
            (REMOTE_URL_VAR, "https://db.example.org"),
            (REMOTE_API_KEY_VAR, "anon"),
            (REMOTE_TIMEOUT_VAR, "3"),
        ]))
        .unwrap();

        assert_eq!(config.database_path, PathBuf::from("/tmp/sarc.db"));
        let remote = config.remote.unwrap();
        assert_eq!(remote.url, "https://db.example.org");
        assert_eq!(remote.timeout, Duration::from_secs(3));
    }

    #[test]
    fn test_blank_url_disables_remote() {
        let config = Config::from_lookup(lookup(&[(REMOTE_URL_VAR, "  ")])).unwrap();
        assert_eq!(config.remote, None);
        assert!(!config.remote_store().unwrap().is_enabled());
    }

    #[test]
    fn test_url_without_key_is_an_error() {
        let err = Config::from_lookup(lookup(&[(REMOTE_URL_VAR, "https://db.example.org")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::MissingCompanion(_, _)));
    }

    #[test]
    fn test_invalid_timeout() {
        for bad in ["0", "-1", "ten"] {
            let err = Config::from_lookup(lookup(&[
                (REMOTE_URL_VAR, "https://db.example.org"),
                (REMOTE_API_KEY_VAR, "anon"),
                (REMOTE_TIMEOUT_VAR, bad),
            ]))
            .unwrap_err();
            assert!(matches!(err, ConfigError::InvalidTimeout { .. }));
        }
    }
}

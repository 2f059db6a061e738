//! Settings read from the environment.
//!
//! | variable           | effect                                        |
//! |--------------------|-----------------------------------------------|
//! | `B2R_HOST`         | backend host, giving `http://{host}:8000/api` |
//! | `B2R_API_URL`      | full base URL; wins over `B2R_HOST`           |
//! | `B2R_TIMEOUT_SECS` | request timeout                               |
//! | `B2R_STORE_PATH`   | file holding the local trip draft             |

use crate::api::ApiConfig;
use crate::cache::CacheConfig;
use crate::draft::StoreConfig;

/// Errors from reading settings.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {value:?}")]
    Invalid { var: &'static str, value: String },
}

/// Everything the client needs to run.
#[derive(Debug, Clone, Default)]
pub struct Settings {
    pub api: ApiConfig,
    pub store: StoreConfig,
    pub cache: CacheConfig,
}

impl Settings {
    /// Read settings from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Read settings through `lookup`, which maps a variable name to its value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut settings = Settings::default();

        if let Some(host) = lookup("B2R_HOST").filter(|h| !h.is_empty()) {
            settings.api = ApiConfig::for_host(&host);
        }

        if let Some(url) = lookup("B2R_API_URL").filter(|u| !u.is_empty()) {
            settings.api = settings.api.with_base_url(url);
        }

        if let Some(value) = lookup("B2R_TIMEOUT_SECS") {
            let secs = value
                .trim()
                .parse()
                .map_err(|_| ConfigError::Invalid {
                    var: "B2R_TIMEOUT_SECS",
                    value: value.clone(),
                })?;
            settings.api = settings.api.with_timeout(secs);
        }

        if let Some(path) = lookup("B2R_STORE_PATH").filter(|p| !p.is_empty()) {
            settings.store = StoreConfig::new(path);
        }

        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::path::Path;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |var| map.get(var).cloned()
    }

    #[test]
    fn defaults_without_environment() {
        let settings = Settings::from_lookup(lookup(&[])).unwrap();
        assert_eq!(settings.api.base_url, "http://localhost:8000/api");
        assert_eq!(settings.api.timeout_secs, 30);
        assert_eq!(settings.store.path, Path::new("born2ride_store.json"));
    }

    #[test]
    fn host_builds_base_url() {
        let settings = Settings::from_lookup(lookup(&[("B2R_HOST", "10.0.0.5")])).unwrap();
        assert_eq!(settings.api.base_url, "http://10.0.0.5:8000/api");
    }

    #[test]
    fn explicit_url_wins() {
        let settings = Settings::from_lookup(lookup(&[
            ("B2R_HOST", "10.0.0.5"),
            ("B2R_API_URL", "https://ride.example/api"),
            ("B2R_TIMEOUT_SECS", "5"),
            ("B2R_STORE_PATH", "/tmp/draft.json"),
        ]))
        .unwrap();

        assert_eq!(settings.api.base_url, "https://ride.example/api");
        assert_eq!(settings.api.timeout_secs, 5);
        assert_eq!(settings.store.path, Path::new("/tmp/draft.json"));
    }

    #[test]
    fn bad_timeout_is_rejected() {
        let err = Settings::from_lookup(lookup(&[("B2R_TIMEOUT_SECS", "soon")])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::Invalid {
                var: "B2R_TIMEOUT_SECS",
                value: "soon".to_string(),
            }
        );
    }
}

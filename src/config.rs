//! # Tracker configuration
//!
//! [`TrackerConfig`] gathers everything the tracker needs at startup. It is read from a
//! TOML document in which every section and every field may be omitted:
//!
//! ```toml
//! [space_track]
//! identity = "user@example.org"
//! password = "secret"
//! lookback_days = 30
//! limit = 1000
//! format = "tle"          # or "3le"
//! timeout_secs = 30
//!
//! [cache]
//! ttl_secs = 3600
//! failure_cooldown_secs = 0
//!
//! [earth]
//! use_ut1 = false
//! ```
//!
//! The environment variables `SPACETRACK_USER`, `SPACETRACK_PASS` and
//! `DEBRIS_CACHE_TTL_SECS` take precedence over the file.
use std::fs;
use std::path::Path;

use hifitime::Duration;
use serde::Deserialize;

use crate::constants::{
    DEFAULT_CACHE_TTL_SECS, DEFAULT_CATALOG_LIMIT, DEFAULT_LOOKBACK_DAYS, SPACE_TRACK_BASE_URL,
};
use crate::debris_errors::ConfigError;
use crate::tle::CatalogFormat;

pub const ENV_SPACETRACK_USER: &str = "SPACETRACK_USER";
pub const ENV_SPACETRACK_PASS: &str = "SPACETRACK_PASS";
pub const ENV_CACHE_TTL_SECS: &str = "DEBRIS_CACHE_TTL_SECS";

#[derive(Clone, Debug, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    pub space_track: SpaceTrackConfig,
    pub cache: CacheConfig,
    pub earth: EarthConfig,
}

#[derive(Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SpaceTrackConfig {
    pub identity: Option<String>,
    pub password: Option<String>,
    pub base_url: String,
    pub lookback_days: u32,
    pub limit: u32,
    pub format: CatalogFormat,
    pub timeout_secs: u64,
}

impl Default for SpaceTrackConfig {
    fn default() -> Self {
        SpaceTrackConfig {
            identity: None,
            password: None,
            base_url: SPACE_TRACK_BASE_URL.to_string(),
            lookback_days: DEFAULT_LOOKBACK_DAYS,
            limit: DEFAULT_CATALOG_LIMIT,
            format: CatalogFormat::default(),
            timeout_secs: 30,
        }
    }
}

// the password never reaches the logs
impl std::fmt::Debug for SpaceTrackConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpaceTrackConfig")
            .field("identity", &self.identity)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .field("base_url", &self.base_url)
            .field("lookback_days", &self.lookback_days)
            .field("limit", &self.limit)
            .field("format", &self.format)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub ttl_secs: u64,
    pub failure_cooldown_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        CacheConfig {
            ttl_secs: DEFAULT_CACHE_TTL_SECS,
            failure_cooldown_secs: 0,
        }
    }
}

impl CacheConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_seconds(self.ttl_secs as f64)
    }

    /// `None` when the cooldown is disabled.
    pub fn failure_cooldown(&self) -> Option<Duration> {
        (self.failure_cooldown_secs > 0)
            .then(|| Duration::from_seconds(self.failure_cooldown_secs as f64))
    }
}

#[derive(Clone, Debug, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct EarthConfig {
    pub use_ut1: bool,
}

impl TrackerConfig {
    /// Parse a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Read and parse a TOML file.
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        TrackerConfig::from_toml_str(&content)
    }

    /// Defaults overridden by the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        TrackerConfig::default().with_env_overrides()
    }

    /// Apply the process environment on top of this configuration.
    pub fn with_env_overrides(self) -> Result<Self, ConfigError> {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides looked up by variable name.
    ///
    /// Empty values are ignored. A TTL that is not an integer is rejected.
    pub fn with_overrides_from<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(user) = lookup(ENV_SPACETRACK_USER) {
            self.space_track.identity = Some(user);
        }
        if let Some(pass) = lookup(ENV_SPACETRACK_PASS) {
            self.space_track.password = Some(pass);
        }
        if let Some(ttl) = lookup(ENV_CACHE_TTL_SECS) {
            self.cache.ttl_secs =
                ttl.trim()
                    .parse()
                    .map_err(|err: std::num::ParseIntError| ConfigError::InvalidValue {
                        field: "cache.ttl_secs",
                        reason: format!("{ENV_CACHE_TTL_SECS}={ttl}: {err}"),
                    })?;
        }
        Ok(self)
    }

    /// Check the values the tracker cannot run with.
    ///
    /// Credentials are only required when the Space-Track source is used, see
    /// [`TrackerConfig::validate_credentials`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |field, reason: &str| {
            Err(ConfigError::InvalidValue {
                field,
                reason: reason.to_string(),
            })
        };

        if self.cache.ttl_secs == 0 {
            return invalid("cache.ttl_secs", "must be positive");
        }
        if self.space_track.limit == 0 {
            return invalid("space_track.limit", "must be positive");
        }
        if self.space_track.lookback_days == 0 {
            return invalid("space_track.lookback_days", "must be positive");
        }
        if self.space_track.timeout_secs == 0 {
            return invalid("space_track.timeout_secs", "must be positive");
        }
        if !self.space_track.base_url.starts_with("http://")
            && !self.space_track.base_url.starts_with("https://")
        {
            return invalid("space_track.base_url", "must be an http(s) URL");
        }
        Ok(())
    }

    /// [`TrackerConfig::validate`], plus non-empty Space-Track credentials.
    pub fn validate_credentials(&self) -> Result<(), ConfigError> {
        self.validate()?;
        let present = |value: &Option<String>| value.as_deref().is_some_and(|v| !v.is_empty());
        if !present(&self.space_track.identity) || !present(&self.space_track.password) {
            return Err(ConfigError::MissingCredentials);
        }
        Ok(())
    }
}

#[cfg(test)]
mod config_test {
    use super::*;
    use std::collections::HashMap;

    fn env(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = TrackerConfig::from_toml_str("").unwrap();
        assert_eq!(config, TrackerConfig::default());
        assert_eq!(config.space_track.base_url, "https://www.space-track.org");
        assert_eq!(config.space_track.lookback_days, 30);
        assert_eq!(config.space_track.limit, 1000);
        assert_eq!(config.space_track.format, CatalogFormat::Tle);
        assert_eq!(config.cache.ttl(), Duration::from_seconds(3600.0));
        assert_eq!(config.cache.failure_cooldown(), None);
        assert!(!config.earth.use_ut1);
    }

    #[test]
    fn test_partial_document() {
        let config = TrackerConfig::from_toml_str(
            r#"
            [space_track]
            identity = "user@example.org"
            format = "3le"
            limit = 200

            [cache]
            failure_cooldown_secs = 60
            "#,
        )
        .unwrap();

        assert_eq!(
            config.space_track.identity.as_deref(),
            Some("user@example.org")
        );
        assert_eq!(config.space_track.format, CatalogFormat::ThreeLe);
        assert_eq!(config.space_track.limit, 200);
        assert_eq!(config.space_track.lookback_days, 30);
        assert_eq!(config.cache.ttl_secs, 3600);
        assert_eq!(
            config.cache.failure_cooldown(),
            Some(Duration::from_seconds(60.0))
        );
    }

    #[test]
    fn test_invalid_toml() {
        assert!(matches!(
            TrackerConfig::from_toml_str("[cache]\nttl_secs = \"one hour\""),
            Err(ConfigError::TomlError(_))
        ));
        assert!(matches!(
            TrackerConfig::from_toml_file("does/not/exist.toml"),
            Err(ConfigError::IoError(_))
        ));
    }

    #[test]
    fn test_env_overrides() {
        let config = TrackerConfig::default()
            .with_overrides_from(env(&[
                ("SPACETRACK_USER", "env-user"),
                ("SPACETRACK_PASS", "env-pass"),
                ("DEBRIS_CACHE_TTL_SECS", " 120 "),
            ]))
            .unwrap();
        assert_eq!(config.space_track.identity.as_deref(), Some("env-user"));
        assert_eq!(config.space_track.password.as_deref(), Some("env-pass"));
        assert_eq!(config.cache.ttl_secs, 120);
        assert!(config.validate_credentials().is_ok());

        // empty values leave the file settings alone
        let config = TrackerConfig::from_toml_str("[space_track]\nidentity = \"file-user\"")
            .unwrap()
            .with_overrides_from(env(&[("SPACETRACK_USER", "")]))
            .unwrap();
        assert_eq!(config.space_track.identity.as_deref(), Some("file-user"));

        assert!(matches!(
            TrackerConfig::default().with_overrides_from(env(&[("DEBRIS_CACHE_TTL_SECS", "1h")])),
            Err(ConfigError::InvalidValue {
                field: "cache.ttl_secs",
                ..
            })
        ));
    }

    #[test]
    fn test_validate() {
        assert!(TrackerConfig::default().validate().is_ok());
        assert!(matches!(
            TrackerConfig::default().validate_credentials(),
            Err(ConfigError::MissingCredentials)
        ));

        let mut config = TrackerConfig::default();
        config.cache.ttl_secs = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue {
                field: "cache.ttl_secs",
                ..
            })
        ));

        let mut config = TrackerConfig::default();
        config.space_track.limit = 0;
        assert!(config.validate().is_err());

        let mut config = TrackerConfig::default();
        config.space_track.base_url = "ftp://space-track.org".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_password_is_not_printed() {
        let mut config = TrackerConfig::default();
        config.space_track.password = Some("hunter2".into());
        assert!(!format!("{config:?}").contains("hunter2"));
    }
}

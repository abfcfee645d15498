//! # Tracker environment state
//!
//! [`TrackerEnv`] holds the long-lived external resources of a tracker:
//!
//! - a persistent **HTTP client**, shared by the catalog source,
//! - an optional **UT1 provider** from [hifitime](https://docs.rs/hifitime), built from JPL's
//!   `latest_eop2.long` Earth orientation file, used for the sidereal angle.
//!
//! ```text
//! TrackerEnv
//! ├── http_client  (reqwest::Client)
//! └── ut1_provider (Option<hifitime::Ut1Provider>)
//! ```
//!
//! The UT1 table is downloaded once, at construction, and only when
//! `[earth] use_ut1 = true`. Without it, UTC stands in for UT1 (error below 0.9 s).
use std::time::Duration;

use hifitime::ut1::Ut1Provider;
use reqwest::Client;

use crate::config::TrackerConfig;
use crate::debris_errors::ConfigError;
use crate::geodetic::GeodeticTransformer;

const UT1_FILE: &str = "latest_eop2.long";

#[derive(Debug, Clone)]
pub struct TrackerEnv {
    pub http_client: Client,
    pub ut1_provider: Option<Ut1Provider>,
}

impl TrackerEnv {
    /// Build the environment described by `config`.
    ///
    /// When `config.earth.use_ut1` is set, this performs a blocking download: call it
    /// before entering the async runtime, or from `spawn_blocking`.
    pub fn from_config(config: &TrackerConfig) -> Result<Self, ConfigError> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.space_track.timeout_secs))
            .build()?;

        let ut1_provider = if config.earth.use_ut1 {
            Some(TrackerEnv::initialize_ut1_provider()?)
        } else {
            None
        };

        Ok(TrackerEnv {
            http_client,
            ut1_provider,
        })
    }

    fn initialize_ut1_provider() -> Result<Ut1Provider, ConfigError> {
        let provider = Ut1Provider::download_from_jpl(UT1_FILE)
            .map_err(|err| ConfigError::Ut1Download(err.to_string()))?;
        tracing::info!(file = UT1_FILE, "UT1 table downloaded from JPL");
        Ok(provider)
    }

    /// Geodetic transformer using the UT1 table when there is one.
    pub fn geodetic_transformer(&self) -> GeodeticTransformer {
        match &self.ut1_provider {
            Some(provider) => GeodeticTransformer::with_ut1(provider.clone()),
            None => GeodeticTransformer::new(),
        }
    }
}

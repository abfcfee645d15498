//! # Debris tracker
//!
//! [`DebrisTracker`] is the entry point of the crate. It wires a catalog source, a
//! propagator, the geodetic transformer and a clock around one [`FreshnessCache`], and
//! exposes the queries a serving layer needs:
//!
//! - [`get_positions`](DebrisTracker::get_positions): the cached positions, at the
//!   instant of the last refresh,
//! - [`get_positions_at`](DebrisTracker::get_positions_at): the cached catalog propagated
//!   to an arbitrary instant,
//! - [`get_predicted_positions`](DebrisTracker::get_predicted_positions): the same, a
//!   number of minutes after now,
//! - [`get_stats`](DebrisTracker::get_stats): altitude statistics of the cached positions.
//!
//! Every query may refresh the cache, and fails with the error of that refresh.
//!
//! ## Typical usage
//!
//! ```rust, no_run
//! use debris_tracker::config::TrackerConfig;
//! use debris_tracker::tracker::DebrisTracker;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = TrackerConfig::from_env()?;
//! let tracker = DebrisTracker::from_config(&config)?;
//!
//! for record in tracker.get_positions(25).await? {
//!     println!("{} {:.3} {:.3} {:.1}", record.name, record.lat, record.lon, record.alt_km);
//! }
//! let in_half_an_hour = tracker.get_predicted_positions(30.0, 25).await?;
//! let stats = tracker.get_stats(100).await?;
//! # Ok(())
//! # }
//! ```
use std::sync::Arc;

use hifitime::{Epoch, Unit};

use crate::cache::{CacheSettings, FreshnessCache};
use crate::catalog::{CatalogSource, SpaceTrackClient};
use crate::config::TrackerConfig;
use crate::debris_errors::{ConfigError, DebrisError};
use crate::env_state::TrackerEnv;
use crate::filter::DebrisRecord;
use crate::geodetic::GeodeticTransformer;
use crate::pipeline::DebrisPipeline;
use crate::propagator::{Propagator, Sgp4Propagator};
use crate::stats::{compute_stats, StatsSummary};
use crate::time::{Clock, SystemClock};

pub struct DebrisTracker<S, P = Sgp4Propagator> {
    cache: FreshnessCache<S, P>,
}

impl<S, P> Clone for DebrisTracker<S, P> {
    fn clone(&self) -> Self {
        DebrisTracker {
            cache: self.cache.clone(),
        }
    }
}

impl DebrisTracker<SpaceTrackClient, Sgp4Propagator> {
    /// Tracker reading the Space-Track catalog, with the SGP4 propagator and the wall clock.
    ///
    /// Arguments
    /// ---------
    /// * `config`: the tracker configuration, credentials included
    ///
    /// Return
    /// ------
    /// * The tracker, or a [`ConfigError`] for invalid settings, missing credentials or a
    ///   failed UT1 download.
    ///
    /// See also
    /// --------
    /// * [`TrackerEnv::from_config`]: blocks while downloading the UT1 table, if enabled.
    pub fn from_config(config: &TrackerConfig) -> Result<Self, ConfigError> {
        config.validate_credentials()?;
        let env = TrackerEnv::from_config(config)?;
        let source =
            SpaceTrackClient::with_http_client(&config.space_track, env.http_client.clone())?;

        tracing::debug!(
            space_track = ?config.space_track,
            ttl_secs = config.cache.ttl_secs,
            use_ut1 = config.earth.use_ut1,
            "debris tracker configured"
        );

        Ok(DebrisTracker::new(
            source,
            Sgp4Propagator,
            env.geodetic_transformer(),
            Arc::new(SystemClock),
            CacheSettings {
                ttl: config.cache.ttl(),
                failure_cooldown: config.cache.failure_cooldown(),
            },
        ))
    }
}

impl<S: CatalogSource, P: Propagator> DebrisTracker<S, P> {
    pub fn new(
        source: S,
        propagator: P,
        transformer: GeodeticTransformer,
        clock: Arc<dyn Clock>,
        settings: CacheSettings,
    ) -> Self {
        DebrisTracker {
            cache: FreshnessCache::new(
                source,
                DebrisPipeline::new(propagator, transformer),
                clock,
                settings,
            ),
        }
    }

    pub fn cache(&self) -> &FreshnessCache<S, P> {
        &self.cache
    }

    /// Up to `max_count` positions of the current generation.
    pub async fn get_positions(&self, max_count: usize) -> Result<Vec<DebrisRecord>, DebrisError> {
        self.cache.get(max_count).await
    }

    /// Up to `max_count` positions of the current generation's catalog at `target`.
    pub async fn get_positions_at(
        &self,
        target: Epoch,
        max_count: usize,
    ) -> Result<Vec<DebrisRecord>, DebrisError> {
        self.cache.get_at(target, max_count).await
    }

    /// Up to `max_count` positions, `minutes_ahead` minutes after the tracker's clock.
    pub async fn get_predicted_positions(
        &self,
        minutes_ahead: f64,
        max_count: usize,
    ) -> Result<Vec<DebrisRecord>, DebrisError> {
        let target = self.cache.now() + Unit::Minute * minutes_ahead;
        self.get_positions_at(target, max_count).await
    }

    /// Altitude statistics of the first `max_count` positions.
    pub async fn get_stats(&self, max_count: usize) -> Result<StatsSummary, DebrisError> {
        let records = self.get_positions(max_count).await?;
        Ok(compute_stats(&records))
    }
}

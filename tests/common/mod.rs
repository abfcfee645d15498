#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use debris_tracker::cache::CacheSettings;
use debris_tracker::catalog::CatalogSource;
use debris_tracker::debris_errors::DebrisError;
use debris_tracker::geodetic::GeodeticTransformer;
use debris_tracker::propagator::Sgp4Propagator;
use debris_tracker::time::ManualClock;
use debris_tracker::tle::{CatalogFormat, TlePair};
use debris_tracker::tracker::DebrisTracker;
use hifitime::{Epoch, Unit};
use tokio::sync::Semaphore;

pub const ISS_LINE1: &str =
    "1 25544U 98067A   24001.50000000  .00016717  00000-0  30270-3 0  9999";
pub const ISS_LINE2: &str =
    "2 25544  51.6416 247.4627 0006703 130.5360 325.0288 15.50377579432658";

pub fn data_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("data")
        .join(name)
}

pub fn read_fixture(name: &str) -> String {
    std::fs::read_to_string(data_path(name)).unwrap()
}

/// Epoch of the ISS element set, close to every fixture epoch.
pub fn reference_epoch() -> Epoch {
    TlePair::new(ISS_LINE1, ISS_LINE2).epoch().unwrap()
}

pub fn one_hour_ttl() -> CacheSettings {
    CacheSettings {
        ttl: Unit::Hour * 1.0,
        failure_cooldown: None,
    }
}

#[derive(Debug)]
struct ScriptState {
    text: Mutex<String>,
    failure: Mutex<Option<DebrisError>>,
    fetches: AtomicUsize,
    gate: Option<Semaphore>,
    panic_next: AtomicBool,
}

/// Catalog source whose answers are driven by the test.
///
/// Clones share their state, so the test keeps a handle on the source owned by the
/// tracker.
#[derive(Debug, Clone)]
pub struct ScriptedSource {
    state: Arc<ScriptState>,
    format: CatalogFormat,
}

impl ScriptedSource {
    pub fn new(text: impl Into<String>, format: CatalogFormat) -> Self {
        ScriptedSource::build(text.into(), format, None)
    }

    /// A source whose fetches block until [`ScriptedSource::open_gate`] is called.
    pub fn gated(text: impl Into<String>, format: CatalogFormat) -> Self {
        ScriptedSource::build(text.into(), format, Some(Semaphore::new(0)))
    }

    fn build(text: String, format: CatalogFormat, gate: Option<Semaphore>) -> Self {
        ScriptedSource {
            state: Arc::new(ScriptState {
                text: Mutex::new(text),
                failure: Mutex::new(None),
                fetches: AtomicUsize::new(0),
                gate,
                panic_next: AtomicBool::new(false),
            }),
            format,
        }
    }

    pub fn fetches(&self) -> usize {
        self.state.fetches.load(Ordering::SeqCst)
    }

    pub fn open_gate(&self) {
        if let Some(gate) = &self.state.gate {
            gate.add_permits(1);
        }
    }

    pub fn set_text(&self, text: impl Into<String>) {
        *self.state.text.lock().unwrap() = text.into();
    }

    pub fn fail_with(&self, err: Option<DebrisError>) {
        *self.state.failure.lock().unwrap() = err;
    }

    pub fn panic_on_next_fetch(&self) {
        self.state.panic_next.store(true, Ordering::SeqCst);
    }
}

impl CatalogSource for ScriptedSource {
    async fn fetch_catalog(&self) -> Result<String, DebrisError> {
        self.state.fetches.fetch_add(1, Ordering::SeqCst);

        if let Some(gate) = &self.state.gate {
            let _permit = gate
                .acquire()
                .await
                .map_err(|_| DebrisError::UpstreamUnavailable("gate closed".into()))?;
        }

        if self.state.panic_next.swap(false, Ordering::SeqCst) {
            panic!("catalog source crashed");
        }

        let failure = self.state.failure.lock().unwrap().clone();
        match failure {
            Some(err) => Err(err),
            None => Ok(self.state.text.lock().unwrap().clone()),
        }
    }

    fn format(&self) -> CatalogFormat {
        self.format
    }
}

pub fn scripted_tracker(
    source: ScriptedSource,
    clock: Arc<ManualClock>,
    settings: CacheSettings,
) -> DebrisTracker<ScriptedSource> {
    DebrisTracker::new(
        source,
        Sgp4Propagator,
        GeodeticTransformer::new(),
        clock,
        settings,
    )
}

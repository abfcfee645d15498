//! # Freshness cache
//!
//! [`FreshnessCache`] keeps the most recent validated batch of debris positions and
//! recomputes it from the catalog source once it is older than its time-to-live.
//!
//! ## States
//!
//! ```text
//!            first caller                  success
//!   Stale ───────────────▶ Refreshing ───────────────▶ Fresh
//!     ▲                        │                         │
//!     └──────── failure ───────┘◀──── TTL elapsed ───────┘
//! ```
//!
//! - **Fresh**: an entry younger than the TTL is served without recomputation.
//! - **Stale**: no entry, or the entry has expired. The first caller to observe it
//!   starts a refresh.
//! - **Refreshing**: a refresh is in flight. Every caller arriving in this state waits
//!   for that refresh instead of starting its own (single flight).
//!
//! A failed refresh drops the previous entry: expired data is never served as a fallback,
//! and every waiter of that refresh receives the same error.
//!
//! ## Refresh task
//!
//! The refresh is detached from the caller that started it: it runs on its own tokio task
//! and publishes its outcome through a [`watch`] channel. A caller that stops waiting
//! (e.g. a dropped HTTP request) does not cancel the refresh the other waiters depend on.
//! Propagation of the catalog is CPU-bound and runs on the blocking pool.
//!
//! If the refresh task ends without publishing an outcome, its waiters receive
//! [`DebrisError::RefreshAborted`] and the next call starts a new refresh.
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Instant;

use hifitime::{Duration, Epoch};
use tokio::sync::watch;
use tokio::task;

use crate::catalog::CatalogSource;
use crate::debris_errors::DebrisError;
use crate::filter::{DebrisRecord, FilterReport};
use crate::pipeline::DebrisPipeline;
use crate::propagator::Propagator;
use crate::time::Clock;
use crate::tle::TlePair;

/// One generation of computed positions.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry {
    /// Every valid record of the catalog, in catalog order.
    pub data: Vec<DebrisRecord>,
    /// The parsed catalog `data` was computed from.
    pub catalog: Vec<TlePair>,
    /// Evaluation epoch of `data`, which is also the start of its lifetime.
    pub computed_at: Epoch,
    pub report: FilterReport,
}

/// Externally observable state of the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CachePhase {
    Fresh,
    Stale,
    Refreshing,
}

type RefreshOutcome = Option<Result<Arc<CacheEntry>, DebrisError>>;

enum CacheState {
    Stale {
        last_failure: Option<(Epoch, DebrisError)>,
    },
    Fresh(Arc<CacheEntry>),
    Refreshing(watch::Receiver<RefreshOutcome>),
}

/// Lifetime settings of a [`FreshnessCache`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CacheSettings {
    pub ttl: Duration,
    /// Failed refreshes are reported again, without contacting the source, for this long.
    pub failure_cooldown: Option<Duration>,
}

struct Shared<S, P> {
    source: S,
    pipeline: DebrisPipeline<P>,
    clock: Arc<dyn Clock>,
    settings: CacheSettings,
    state: Mutex<CacheState>,
}

/// Time-bounded, single-flight cache of debris positions.
///
/// Cloning the cache is cheap and every clone shares the same state.
pub struct FreshnessCache<S, P> {
    shared: Arc<Shared<S, P>>,
}

impl<S, P> Clone for FreshnessCache<S, P> {
    fn clone(&self) -> Self {
        FreshnessCache {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<S: CatalogSource, P: Propagator> FreshnessCache<S, P> {
    pub fn new(
        source: S,
        pipeline: DebrisPipeline<P>,
        clock: Arc<dyn Clock>,
        settings: CacheSettings,
    ) -> Self {
        FreshnessCache {
            shared: Arc::new(Shared {
                source,
                pipeline,
                clock,
                settings,
                state: Mutex::new(CacheState::Stale { last_failure: None }),
            }),
        }
    }

    pub fn settings(&self) -> CacheSettings {
        self.shared.settings
    }

    pub fn now(&self) -> Epoch {
        self.shared.clock.now()
    }

    /// Up to `max_count` records of the current generation, refreshing it if needed.
    ///
    /// Return
    /// ------
    /// * A prefix of the cached batch, or the error of the refresh this call waited on:
    ///   [`DebrisError::UpstreamUnavailable`], [`DebrisError::NoValidResults`] or
    ///   [`DebrisError::RefreshAborted`].
    pub async fn get(&self, max_count: usize) -> Result<Vec<DebrisRecord>, DebrisError> {
        let entry = self.current_entry().await?;
        Ok(entry.data.iter().take(max_count).cloned().collect())
    }

    /// Up to `max_count` valid records of the current generation's catalog, propagated
    /// to `target`.
    ///
    /// The catalog comes from the cache (refreshing it if needed), so this never
    /// contacts the source more than [`FreshnessCache::get`] does. Propagation stops as
    /// soon as `max_count` records are accepted.
    pub async fn get_at(
        &self,
        target: Epoch,
        max_count: usize,
    ) -> Result<Vec<DebrisRecord>, DebrisError> {
        let entry = self.current_entry().await?;
        if max_count == 0 {
            return Ok(Vec::new());
        }

        let shared = Arc::clone(&self.shared);
        let positions = task::spawn_blocking(move || {
            shared
                .pipeline
                .positions(&entry.catalog, target, Some(max_count))
        })
        .await;

        match positions {
            Ok(result) => result.map(|(records, _)| records),
            Err(err) if err.is_panic() => std::panic::resume_unwind(err.into_panic()),
            Err(_) => Err(DebrisError::RefreshAborted),
        }
    }

    /// The current entry, even if expired. `None` when there is no entry.
    pub fn snapshot(&self) -> Option<Arc<CacheEntry>> {
        match &*self.shared.lock_state() {
            CacheState::Fresh(entry) => Some(Arc::clone(entry)),
            _ => None,
        }
    }

    /// Drop the current entry and any remembered failure, so that the next call refreshes.
    ///
    /// An in-flight refresh is left alone and still installs its result.
    pub fn invalidate(&self) {
        let mut state = self.shared.lock_state();
        if !matches!(*state, CacheState::Refreshing(_)) {
            *state = CacheState::Stale { last_failure: None };
        }
    }

    pub fn phase(&self) -> CachePhase {
        let now = self.shared.clock.now();
        match &*self.shared.lock_state() {
            CacheState::Fresh(entry) if self.shared.is_fresh(entry, now) => CachePhase::Fresh,
            CacheState::Refreshing(_) => CachePhase::Refreshing,
            _ => CachePhase::Stale,
        }
    }

    /// A fresh generation, from the cache or from the refresh this call joins or starts.
    async fn current_entry(&self) -> Result<Arc<CacheEntry>, DebrisError> {
        let mut rx = {
            let now = self.shared.clock.now();
            let mut state = self.shared.lock_state();
            match &*state {
                CacheState::Fresh(entry) if self.shared.is_fresh(entry, now) => {
                    return Ok(Arc::clone(entry));
                }
                CacheState::Stale {
                    last_failure: Some((failed_at, err)),
                } if self.shared.in_cooldown(*failed_at, now) => {
                    return Err(err.clone());
                }
                // a closed channel means the refresh task died
                CacheState::Refreshing(rx) if rx.has_changed().is_ok() => rx.clone(),
                _ => {
                    let (tx, rx) = watch::channel(None);
                    *state = CacheState::Refreshing(rx.clone());
                    drop(state);
                    self.spawn_refresh(tx);
                    rx
                }
            }
        };

        let outcome = rx
            .wait_for(Option::is_some)
            .await
            .ok()
            .and_then(|outcome| (*outcome).clone());

        match outcome {
            Some(outcome) => outcome,
            None => {
                let mut state = self.shared.lock_state();
                if matches!(&*state, CacheState::Refreshing(current) if current.same_channel(&rx))
                {
                    *state = CacheState::Stale { last_failure: None };
                }
                tracing::warn!("catalog refresh ended without a result");
                Err(DebrisError::RefreshAborted)
            }
        }
    }

    fn spawn_refresh(&self, tx: watch::Sender<RefreshOutcome>) {
        let shared = Arc::clone(&self.shared);
        tokio::spawn(async move {
            let outcome = Shared::refresh(&shared).await;
            shared.settle(&outcome);
            tx.send_replace(Some(outcome));
        });
    }
}

impl<S: CatalogSource, P: Propagator> Shared<S, P> {
    fn lock_state(&self) -> MutexGuard<'_, CacheState> {
        // the state is replaced wholesale, a poisoned lock still holds a consistent value
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn is_fresh(&self, entry: &CacheEntry, now: Epoch) -> bool {
        now - entry.computed_at < self.settings.ttl
    }

    fn in_cooldown(&self, failed_at: Epoch, now: Epoch) -> bool {
        self.settings
            .failure_cooldown
            .is_some_and(|cooldown| now - failed_at < cooldown)
    }

    /// Fetch, parse and propagate the whole catalog at the current instant.
    async fn refresh(shared: &Arc<Self>) -> Result<Arc<CacheEntry>, DebrisError> {
        let started = Instant::now();
        let format = shared.source.format();
        tracing::debug!(%format, "refreshing debris catalog");

        let raw = shared.source.fetch_catalog().await?;
        let computed_at = shared.clock.now();

        let worker = Arc::clone(shared);
        let computed = task::spawn_blocking(move || {
            worker
                .pipeline
                .positions_from_text(&raw, format, computed_at)
        })
        .await;

        let (catalog, data, report) = match computed {
            Ok(result) => result?,
            Err(err) if err.is_panic() => std::panic::resume_unwind(err.into_panic()),
            Err(_) => return Err(DebrisError::RefreshAborted),
        };

        tracing::info!(
            catalog = catalog.len(),
            accepted = report.accepted,
            skipped = report.skipped(),
            malformed = report.malformed,
            diverged = report.diverged,
            degenerate = report.degenerate,
            non_finite = report.non_finite,
            elapsed_ms = started.elapsed().as_millis() as u64,
            %computed_at,
            "debris catalog refreshed"
        );

        Ok(Arc::new(CacheEntry {
            data,
            catalog,
            computed_at,
            report,
        }))
    }

    /// Install the outcome of a refresh.
    fn settle(&self, outcome: &Result<Arc<CacheEntry>, DebrisError>) {
        let next = match outcome {
            Ok(entry) => CacheState::Fresh(Arc::clone(entry)),
            Err(err) => {
                tracing::warn!(error = %err, "debris catalog refresh failed");
                CacheState::Stale {
                    last_failure: Some((self.clock.now(), err.clone())),
                }
            }
        };
        *self.lock_state() = next;
    }
}

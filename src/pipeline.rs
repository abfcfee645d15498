//! # Position pipeline
//!
//! Wires the stages that turn element sets into validated positions:
//!
//! ```text
//! raw text ──parse──▶ [TlePair] ──propagate──▶ OrbitalState ──to_geodetic──▶ Candidate ──filter──▶ [DebrisRecord]
//! ```
//!
//! Every stage after parsing works per object and reports failures as
//! [`SkipReason`](crate::debris_errors::SkipReason); only the filter decides what
//! reaches the caller. The stages are evaluated lazily, in catalog order, so a capped
//! request stops propagating as soon as enough records are accepted.
use hifitime::Epoch;

use crate::debris_errors::{DebrisError, SkipReason};
use crate::filter::{select_valid, Candidate, DebrisRecord, FilterReport};
use crate::geodetic::GeodeticTransformer;
use crate::propagator::Propagator;
use crate::tle::{CatalogFormat, TlePair};

#[derive(Debug, Clone)]
pub struct DebrisPipeline<P> {
    propagator: P,
    transformer: GeodeticTransformer,
}

impl<P: Propagator> DebrisPipeline<P> {
    pub fn new(propagator: P, transformer: GeodeticTransformer) -> Self {
        DebrisPipeline {
            propagator,
            transformer,
        }
    }

    pub fn transformer(&self) -> &GeodeticTransformer {
        &self.transformer
    }

    /// Propagate and transform one element set.
    pub fn evaluate_one(&self, tle: &TlePair, epoch: Epoch) -> Result<Candidate, SkipReason> {
        let state = self.propagator.propagate(tle, epoch)?;
        let geodetic = self.transformer.to_geodetic(&state)?;
        Ok(Candidate {
            name: state.name,
            lat: geodetic.lat,
            lon: geodetic.lon,
            alt_km: geodetic.alt_km,
        })
    }

    /// Lazily evaluate every element set at `epoch`, in order.
    pub fn evaluate<'a>(
        &'a self,
        pairs: &'a [TlePair],
        epoch: Epoch,
    ) -> impl Iterator<Item = Result<Candidate, SkipReason>> + 'a {
        pairs.iter().map(move |tle| self.evaluate_one(tle, epoch))
    }

    /// Valid positions of the catalog at `epoch`.
    ///
    /// Arguments
    /// ---------
    /// * `pairs`: the parsed catalog, in catalog order
    /// * `epoch`: evaluation instant
    /// * `max_count`: cap on the number of records, `None` to evaluate the whole catalog
    ///
    /// Return
    /// ------
    /// * The accepted records and the filtering counts, or
    ///   [`DebrisError::NoValidResults`].
    pub fn positions(
        &self,
        pairs: &[TlePair],
        epoch: Epoch,
        max_count: Option<usize>,
    ) -> Result<(Vec<DebrisRecord>, FilterReport), DebrisError> {
        select_valid(self.evaluate(pairs, epoch), max_count)
    }

    /// Parse a raw catalog dump, then compute its valid positions at `epoch`.
    ///
    /// An empty catalog is reported as [`DebrisError::NoValidResults`], which is what the
    /// caller sees for "nothing to show".
    pub fn positions_from_text(
        &self,
        raw: &str,
        format: CatalogFormat,
        epoch: Epoch,
    ) -> Result<(Vec<TlePair>, Vec<DebrisRecord>, FilterReport), DebrisError> {
        let pairs = format.parse(raw).map_err(|err| match err {
            DebrisError::EmptyCatalog => DebrisError::NoValidResults,
            other => other,
        })?;
        let (records, report) = self.positions(&pairs, epoch, None)?;
        Ok((pairs, records, report))
    }
}

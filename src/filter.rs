//! # Validity filter
//!
//! Reduces a stream of per-object outcomes to the records that may be shown:
//!
//! - failed outcomes ([`SkipReason`]) are dropped and counted,
//! - candidates whose latitude or longitude is not a finite number are dropped,
//! - the first `N` accepted records are kept, in input (catalog) order.
//!
//! The input is consumed lazily: once `N` records are accepted, the remaining outcomes
//! are never pulled, so no propagation work is spent on them.
//!
//! Accepted records are named after the catalog name when there is one, and
//! `DEBRIS-<k>` otherwise, where `k` is the 1-based rank among accepted records.
use serde::Serialize;

use crate::constants::{Degree, Kilometer, SYNTHETIC_NAME_PREFIX};
use crate::debris_errors::{DebrisError, SkipReason};

/// Externally visible position of one object.
///
/// `lat` lies in [-90, 90] and `lon` in [-180, 180), both finite; `alt_km` is finite
/// but may be negative for decaying objects.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DebrisRecord {
    pub name: String,
    pub lat: Degree,
    pub lon: Degree,
    pub alt_km: Kilometer,
}

/// A propagated and transformed object, not yet checked.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub name: Option<String>,
    pub lat: Degree,
    pub lon: Degree,
    pub alt_km: Kilometer,
}

impl Candidate {
    fn has_finite_coordinates(&self) -> bool {
        self.lat.is_finite() && self.lon.is_finite()
    }
}

/// Counts gathered while filtering, for logging.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterReport {
    pub accepted: usize,
    pub malformed: usize,
    pub diverged: usize,
    pub degenerate: usize,
    pub non_finite: usize,
}

impl FilterReport {
    pub fn skipped(&self) -> usize {
        self.malformed + self.diverged + self.degenerate + self.non_finite
    }

    fn count_skip(&mut self, reason: &SkipReason) {
        match reason {
            SkipReason::MalformedElements(_) => self.malformed += 1,
            SkipReason::PropagationDivergence(_) => self.diverged += 1,
            SkipReason::DegenerateGeometry => self.degenerate += 1,
        }
    }
}

/// Keep the first `max_count` valid candidates, in order.
///
/// Arguments
/// ---------
/// * `outcomes`: per-object outcomes, in catalog order
/// * `max_count`: cap on the number of accepted records, `None` for no cap
///
/// Return
/// ------
/// * The accepted records with the filtering counts, or
///   [`DebrisError::NoValidResults`] if nothing was accepted.
pub fn select_valid<I>(
    outcomes: I,
    max_count: Option<usize>,
) -> Result<(Vec<DebrisRecord>, FilterReport), DebrisError>
where
    I: IntoIterator<Item = Result<Candidate, SkipReason>>,
{
    let cap = max_count.unwrap_or(usize::MAX);
    let mut report = FilterReport::default();
    let mut records = Vec::new();

    if cap == 0 {
        return Err(DebrisError::NoValidResults);
    }

    for outcome in outcomes {
        let candidate = match outcome {
            Ok(candidate) if candidate.has_finite_coordinates() => candidate,
            Ok(_) => {
                report.non_finite += 1;
                continue;
            }
            Err(reason) => {
                tracing::debug!(%reason, "object skipped");
                report.count_skip(&reason);
                continue;
            }
        };

        let rank = records.len() + 1;
        let name = candidate
            .name
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| format!("{SYNTHETIC_NAME_PREFIX}-{rank}"));

        records.push(DebrisRecord {
            name,
            lat: candidate.lat,
            lon: candidate.lon,
            alt_km: candidate.alt_km,
        });

        if records.len() >= cap {
            break;
        }
    }

    report.accepted = records.len();
    if records.is_empty() {
        return Err(DebrisError::NoValidResults);
    }
    Ok((records, report))
}

#[cfg(test)]
mod filter_test {
    use super::*;

    fn candidate(lat: f64, lon: f64, alt_km: f64) -> Result<Candidate, SkipReason> {
        Ok(Candidate {
            name: None,
            lat,
            lon,
            alt_km,
        })
    }

    #[test]
    fn test_non_finite_latitude_is_dropped() {
        let outcomes = vec![
            candidate(10.0, 20.0, 420.1),
            candidate(f64::NAN, 30.0, 415.0),
            candidate(-5.0, 100.0, 410.5),
        ];
        let (records, report) = select_valid(outcomes, Some(3)).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].alt_km, 420.1);
        assert_eq!(records[1].alt_km, 410.5);
        assert_eq!(report.non_finite, 1);
        assert_eq!(report.accepted, 2);
    }

    #[test]
    fn test_failures_do_not_count_toward_cap() {
        let outcomes = vec![
            Err(SkipReason::MalformedElements("checksum".into())),
            candidate(1.0, 1.0, 500.0),
            Err(SkipReason::PropagationDivergence("decayed".into())),
            candidate(f64::INFINITY, 1.0, 500.0),
            candidate(2.0, 2.0, 600.0),
            Err(SkipReason::DegenerateGeometry),
            candidate(3.0, 3.0, 700.0),
        ];
        let (records, report) = select_valid(outcomes, Some(2)).unwrap();

        assert_eq!(
            records.iter().map(|r| r.alt_km).collect::<Vec<_>>(),
            vec![500.0, 600.0]
        );
        assert_eq!(report.malformed, 1);
        assert_eq!(report.diverged, 1);
        assert_eq!(report.non_finite, 1);
        // stopped before the degenerate outcome
        assert_eq!(report.degenerate, 0);
        assert_eq!(report.skipped(), 3);
    }

    #[test]
    fn test_short_circuit_stops_pulling() {
        let mut pulled = 0;
        let outcomes = (0..1_000).map(|i| {
            pulled += 1;
            candidate(i as f64 / 100.0, 0.0, 400.0)
        });
        let (records, _) = select_valid(outcomes, Some(5)).unwrap();
        assert_eq!(records.len(), 5);
        assert_eq!(pulled, 5);
    }

    #[test]
    fn test_naming_rule() {
        let outcomes = vec![
            Ok(Candidate {
                name: Some("COSMOS 2251 DEB".into()),
                lat: 1.0,
                lon: 1.0,
                alt_km: 790.0,
            }),
            candidate(f64::NAN, 1.0, 1.0),
            candidate(2.0, 2.0, 800.0),
            Ok(Candidate {
                name: Some("  ".into()),
                lat: 3.0,
                lon: 3.0,
                alt_km: 810.0,
            }),
        ];
        let (records, _) = select_valid(outcomes, None).unwrap();
        let names: Vec<_> = records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["COSMOS 2251 DEB", "DEBRIS-2", "DEBRIS-3"]);
    }

    #[test]
    fn test_no_valid_results() {
        let outcomes = vec![
            Err(SkipReason::DegenerateGeometry),
            candidate(f64::NAN, f64::NAN, 0.0),
        ];
        assert_eq!(
            select_valid(outcomes, None),
            Err(DebrisError::NoValidResults)
        );
        assert_eq!(
            select_valid(Vec::new(), Some(10)),
            Err(DebrisError::NoValidResults)
        );
    }

    #[test]
    fn test_negative_altitude_is_kept() {
        let (records, _) = select_valid(vec![candidate(0.0, 0.0, -12.5)], None).unwrap();
        assert_eq!(records[0].alt_km, -12.5);
    }

    #[test]
    fn test_record_serialization() {
        let record = DebrisRecord {
            name: "DEBRIS-1".into(),
            lat: 12.5,
            lon: -45.25,
            alt_km: 420.0,
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"name": "DEBRIS-1", "lat": 12.5, "lon": -45.25, "alt_km": 420.0})
        );
    }
}

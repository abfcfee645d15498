use serde::Serialize;

use crate::constants::Kilometer;
use crate::filter::DebrisRecord;

/// Altitude summary of a batch of records.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StatsSummary {
    pub count: usize,
    pub min_alt: Kilometer,
    pub max_alt: Kilometer,
    pub avg_alt: Kilometer,
}

impl StatsSummary {
    pub const EMPTY: StatsSummary = StatsSummary {
        count: 0,
        min_alt: 0.0,
        max_alt: 0.0,
        avg_alt: 0.0,
    };
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// Count, extrema and mean of the altitudes of `records`, rounded to 2 decimals.
///
/// Rounding the extrema along with the mean keeps `min_alt <= avg_alt <= max_alt`
/// after rounding. An empty batch gives [`StatsSummary::EMPTY`].
pub fn compute_stats(records: &[DebrisRecord]) -> StatsSummary {
    if records.is_empty() {
        return StatsSummary::EMPTY;
    }

    let (min, max, sum) = records.iter().map(|r| r.alt_km).fold(
        (f64::INFINITY, f64::NEG_INFINITY, 0.0),
        |(min, max, sum), alt| (min.min(alt), max.max(alt), sum + alt),
    );
    let mean = (sum / records.len() as f64).clamp(min, max);

    StatsSummary {
        count: records.len(),
        min_alt: round2(min),
        max_alt: round2(max),
        avg_alt: round2(mean),
    }
}

//! # debris_tracker
//!
//! Ground positions of orbital debris, computed from two-line element sets and served
//! from a time-bounded, single-flight cache.
//!
//! ```text
//! CatalogSource ──text──▶ tle ──▶ propagator ──▶ geodetic ──▶ filter ──▶ cache ──▶ tracker
//!                                  (SGP4/SDP4)    (WGS-84)                 │
//!                                                                          └──▶ stats
//! ```
//!
//! Start from [`tracker::DebrisTracker`]; the other modules are its building blocks and
//! can be used on their own (e.g. [`pipeline::DebrisPipeline`] to propagate a catalog
//! without caching).
pub mod cache;
pub mod catalog;
pub mod config;
pub mod constants;
pub mod debris_errors;
pub mod env_state;
pub mod filter;
pub mod geodetic;
pub mod logger;
pub mod pipeline;
pub mod propagator;
pub mod ref_system;
pub mod stats;
pub mod time;
pub mod tle;
pub mod tracker;

#[cfg(test)]
pub(crate) mod test_fixtures {
    use crate::tle::TlePair;

    pub(crate) const ISS_LINE1: &str =
        "1 25544U 98067A   24001.50000000  .00016717  00000-0  30270-3 0  9999";
    pub(crate) const ISS_LINE2: &str =
        "2 25544  51.6416 247.4627 0006703 130.5360 325.0288 15.50377579432658";

    /// Five debris-like objects, the last one geostationary.
    pub(crate) const SAMPLE_TLE: &str = "\
1 25544U 98067A   24001.50000000  .00016717  00000-0  30270-3 0  9999
2 25544  51.6416 247.4627 0006703 130.5360 325.0288 15.50377579432658
1 29228U 99025AB  24001.41234567  .00000512  00000-0  21345-3 0  9993
2 29228  98.7652  45.1234 0071234 210.4567 149.1234 14.31234567890123
1 34427U 93036SX  24001.62345678  .00000234  00000-0  98765-4 0  9997
2 34427  74.0312 120.5678 0021456  88.9012 271.3456 14.40123456789017
1 33774U 97051L   24001.35678901  .00000123  00000-0  45678-4 0  9992
2 33774  86.3921 300.2345 0009876  12.3456 347.7890 14.35987654765438
1 40001U 10012C   24001.20000000 -.00000012  00000-0  00000+0 0  9991
2 40001   0.0512  85.4321 0003456 265.4321  94.5678  1.00271234 50126
";

    /// [`SAMPLE_TLE`] with its name lines.
    pub(crate) const SAMPLE_3LE: &str = "\
0 ISS (ZARYA)
1 25544U 98067A   24001.50000000  .00016717  00000-0  30270-3 0  9999
2 25544  51.6416 247.4627 0006703 130.5360 325.0288 15.50377579432658
0 FENGYUN 1C DEB
1 29228U 99025AB  24001.41234567  .00000512  00000-0  21345-3 0  9993
2 29228  98.7652  45.1234 0071234 210.4567 149.1234 14.31234567890123
0 COSMOS 2251 DEB
1 34427U 93036SX  24001.62345678  .00000234  00000-0  98765-4 0  9997
2 34427  74.0312 120.5678 0021456  88.9012 271.3456 14.40123456789017
0 IRIDIUM 33 DEB
1 33774U 97051L   24001.35678901  .00000123  00000-0  45678-4 0  9992
2 33774  86.3921 300.2345 0009876  12.3456 347.7890 14.35987654765438
0 SL-12 R/B(2) DEB
1 40001U 10012C   24001.20000000 -.00000012  00000-0  00000+0 0  9991
2 40001   0.0512  85.4321 0003456 265.4321  94.5678  1.00271234 50126
";

    pub(crate) fn sample_pairs() -> Vec<TlePair> {
        SAMPLE_TLE
            .lines()
            .collect::<Vec<_>>()
            .chunks_exact(2)
            .map(|pair| TlePair::new(pair[0], pair[1]))
            .collect()
    }
}

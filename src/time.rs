//! # Time utilities
//!
//! Instants are [`hifitime::Epoch`] values in UTC throughout the crate. This module
//! provides:
//!
//! - [`tle_epoch`]: conversion of the `YYDDD.DDDDDDDD` epoch field of an element set,
//! - [`gmst`]: the Greenwich Mean Sidereal Time used to rotate inertial positions
//!   into the Earth-fixed frame,
//! - the [`Clock`] seam used by the freshness cache, with a wall clock
//!   ([`SystemClock`]) and a settable one ([`ManualClock`]).
use std::sync::RwLock;
use std::time::{SystemTime, UNIX_EPOCH};

use hifitime::{Epoch, Unit};

use crate::constants::{Radian, DPI, MJD, SECONDS_PER_DAY, SIDEREAL_RATE, T2000};

/// Convert the two-digit year and fractional day-of-year of an element set to an [`Epoch`].
///
/// Two-digit years 57..=99 map to 1957..=1999, everything else to 20xx, following the
/// convention of the catalog format. Day 1.0 is January 1st, 00:00 UTC.
///
/// Arguments
/// ---------
/// * `two_digit_year`: the `YY` field
/// * `day_of_year`: the `DDD.DDDDDDDD` field
///
/// Return
/// ------
/// * The epoch in the UTC time scale
pub fn tle_epoch(two_digit_year: u32, day_of_year: f64) -> Epoch {
    let year = if two_digit_year >= 57 {
        1900 + two_digit_year as i32
    } else {
        2000 + two_digit_year as i32
    };

    Epoch::from_gregorian_utc_at_midnight(year, 1, 1) + Unit::Day * (day_of_year - 1.0)
}

/// Minutes elapsed from `origin` to `target` (negative when `target` is earlier).
pub fn minutes_between(origin: Epoch, target: Epoch) -> f64 {
    (target - origin).to_unit(Unit::Minute)
}

/// Compute the Greenwich Mean Sidereal Time (GMST) in radians
/// for a given Modified Julian Date (UT1 time scale).
///
/// IAU 1982 polynomial for the mean sidereal time at 0h UT1, plus the rotation
/// accumulated during the fraction of the day. This is the angle expected by the
/// TEME frame produced by SGP4.
///
/// # Arguments
/// * `tjm` - Modified Julian Date (MJD, UT1 time scale; UTC is an acceptable approximation)
///
/// # Returns
/// * GMST angle in radians, normalized to the interval [0, 2π).
pub fn gmst(tjm: MJD) -> Radian {
    // Polynomial coefficients for GMST at 0h UT1 (in seconds)
    const C0: f64 = 24110.54841;
    const C1: f64 = 8640184.812866;
    const C2: f64 = 9.3104e-2;
    const C3: f64 = -6.2e-6;

    let itjm = tjm.floor();
    let t = (itjm - T2000) / 36525.0;

    let gmst0 = (((C3 * t + C2) * t + C1) * t + C0) * DPI / SECONDS_PER_DAY;

    let h = tjm.fract() * DPI;
    (gmst0 + h * SIDEREAL_RATE).rem_euclid(DPI)
}

/// Source of the current instant.
///
/// The freshness cache asks its clock for "now" instead of reading the system time,
/// so that expiry can be driven deterministically.
pub trait Clock: Send + Sync + 'static {
    fn now(&self) -> Epoch;
}

/// Wall clock, in UTC.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Epoch {
        let since_unix = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();
        Epoch::from_unix_seconds(since_unix.as_secs_f64())
    }
}

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    now: RwLock<Epoch>,
}

impl ManualClock {
    pub fn new(start: Epoch) -> Self {
        ManualClock {
            now: RwLock::new(start),
        }
    }

    pub fn set(&self, epoch: Epoch) {
        let mut now = self.now.write().unwrap_or_else(|e| e.into_inner());
        *now = epoch;
    }

    pub fn advance(&self, by: hifitime::Duration) {
        let mut now = self.now.write().unwrap_or_else(|e| e.into_inner());
        *now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Epoch {
        *self.now.read().unwrap_or_else(|e| e.into_inner())
    }
}

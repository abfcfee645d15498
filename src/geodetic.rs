//! # Geodetic subpoint
//!
//! Conversion of an inertial [`OrbitalState`] into the point of the WGS-84 ellipsoid
//! directly below the object, plus the object's height above that ellipsoid.
//!
//! ## Pipeline
//!
//! ```text
//! TEME  --(rotation by −GMST about z)-->  Earth-fixed  --(ellipsoidal inversion)-->  (φ, λ, h)
//! ```
//!
//! 1. The sidereal angle is the IAU-82 GMST ([`gmst`](crate::time::gmst)) of the state
//!    epoch, read in UT1 when a [`Ut1Provider`] is available and in UTC otherwise. The
//!    difference is below one second of time, i.e. under 0.5 km of ground track.
//! 2. The Earth-fixed vector is inverted to geodetic coordinates by fixed-point iteration
//!    on the latitude, which converges to 1e-12 rad within a handful of steps for
//!    any altitude above a few kilometers below the surface.
//!
//! ## Conventions
//!
//! - Latitude is **geodetic** (normal to the ellipsoid), in degrees, within [-90, 90].
//! - Longitude is east positive, in degrees, wrapped to [-180, 180).
//! - Altitude is in kilometers and may be negative.
use hifitime::ut1::Ut1Provider;
use hifitime::Epoch;
use nalgebra::Vector3;
use serde::Serialize;

use crate::constants::{Degree, Kilometer, WGS84_ECC_SQUARED, WGS84_MAJOR_AXIS_KM};
use crate::debris_errors::SkipReason;
use crate::propagator::OrbitalState;
use crate::ref_system::{rotpn, RefSystem};
use crate::time::gmst;

const MAX_ITERATIONS: usize = 20;
const LATITUDE_TOLERANCE: f64 = 1e-12;

/// Geodetic coordinates of a subpoint.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Geodetic {
    pub lat: Degree,
    pub lon: Degree,
    pub alt_km: Kilometer,
}

/// Inertial → geodetic conversion, with an optional UT1 correction.
#[derive(Debug, Clone, Default)]
pub struct GeodeticTransformer {
    ut1_provider: Option<Ut1Provider>,
}

impl GeodeticTransformer {
    /// Transformer reading Earth rotation in UTC.
    pub fn new() -> Self {
        GeodeticTransformer { ut1_provider: None }
    }

    /// Transformer reading Earth rotation in UT1 from the given table.
    pub fn with_ut1(ut1_provider: Ut1Provider) -> Self {
        GeodeticTransformer {
            ut1_provider: Some(ut1_provider),
        }
    }

    pub fn uses_ut1(&self) -> bool {
        self.ut1_provider.is_some()
    }

    /// Greenwich mean sidereal angle at `epoch`, in radians.
    pub fn sidereal_angle(&self, epoch: &Epoch) -> f64 {
        let tut = match &self.ut1_provider {
            Some(provider) => epoch.to_ut1(provider).to_mjd_tai_days(),
            None => epoch.to_mjd_utc_days(),
        };
        gmst(tut)
    }

    /// Rotate a TEME position into the Earth-fixed frame at `epoch`.
    pub fn to_earth_fixed(&self, position: &Vector3<f64>, epoch: &Epoch) -> Vector3<f64> {
        rotpn(
            RefSystem::Teme,
            RefSystem::EarthFixed,
            self.sidereal_angle(epoch),
        ) * position
    }

    /// Compute the geodetic subpoint of an orbital state.
    ///
    /// Arguments
    /// ---------
    /// * `state`: TEME position (km) and evaluation epoch
    ///
    /// Return
    /// ------
    /// * The subpoint, or [`SkipReason::DegenerateGeometry`] when the position vector is
    ///   zero or not finite.
    pub fn to_geodetic(&self, state: &OrbitalState) -> Result<Geodetic, SkipReason> {
        let radius = state.position.norm();
        if radius == 0.0 || !radius.is_finite() {
            return Err(SkipReason::DegenerateGeometry);
        }

        let earth_fixed = self.to_earth_fixed(&state.position, &state.epoch);
        Ok(earth_fixed_to_geodetic(&earth_fixed))
    }
}

/// Invert an Earth-fixed Cartesian position (km) to WGS-84 geodetic coordinates.
pub fn earth_fixed_to_geodetic(position: &Vector3<f64>) -> Geodetic {
    let (x, y, z) = (position.x, position.y, position.z);
    let p = x.hypot(y);

    let lon = wrap_longitude(y.atan2(x).to_degrees());

    // start from the geocentric latitude, corrected for the flattening
    let mut lat = z.atan2(p * (1.0 - WGS84_ECC_SQUARED));
    for _ in 0..MAX_ITERATIONS {
        let sin_lat = lat.sin();
        let n = WGS84_MAJOR_AXIS_KM / (1.0 - WGS84_ECC_SQUARED * sin_lat * sin_lat).sqrt();
        let next = (z + WGS84_ECC_SQUARED * n * sin_lat).atan2(p);
        let converged = (next - lat).abs() < LATITUDE_TOLERANCE;
        lat = next;
        if converged {
            break;
        }
    }

    let (sin_lat, cos_lat) = lat.sin_cos();
    // h = p·cosφ + z·sinφ − a·√(1 − e²·sin²φ), valid at the poles as well
    let alt_km = p * cos_lat + z * sin_lat
        - WGS84_MAJOR_AXIS_KM * (1.0 - WGS84_ECC_SQUARED * sin_lat * sin_lat).sqrt();

    Geodetic {
        lat: lat.to_degrees(),
        lon,
        alt_km,
    }
}

/// Wrap a longitude in degrees to [-180, 180).
pub fn wrap_longitude(lon: Degree) -> Degree {
    (lon + 180.0).rem_euclid(360.0) - 180.0
}

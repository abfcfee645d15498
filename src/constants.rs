//! # Constants and type definitions for the debris tracker
//!
//! This module centralizes the **physical constants**, **reference ellipsoid parameters**,
//! **service defaults** and **common type aliases** used throughout the crate.
//!
//! ## Overview
//!
//! - Angular and time constants of the sidereal-time computation
//! - WGS-84 reference ellipsoid, expressed in kilometers
//! - Default values of the catalog query and of the freshness cache
//! - Type aliases documenting the unit carried by a bare `f64`

// -------------------------------------------------------------------------------------------------
// Physical constants and unit conversions
// -------------------------------------------------------------------------------------------------

/// 2π, useful for trigonometric conversions
pub const DPI: f64 = 2. * std::f64::consts::PI;

/// Number of seconds in a Julian day
pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// MJD epoch of J2000.0 (2000-01-01 12:00:00)
pub const T2000: f64 = 51544.5;

/// Ratio of the sidereal day to the solar day
pub const SIDEREAL_RATE: f64 = 1.00273790934;

// -------------------------------------------------------------------------------------------------
// WGS-84 reference ellipsoid
// -------------------------------------------------------------------------------------------------

/// Earth equatorial radius in kilometers (WGS-84)
pub const WGS84_MAJOR_AXIS_KM: f64 = 6_378.137;

/// Inverse flattening of the WGS-84 ellipsoid
pub const WGS84_INV_FLATTENING: f64 = 298.257223563;

/// Flattening of the WGS-84 ellipsoid
pub const WGS84_FLATTENING: f64 = 1.0 / WGS84_INV_FLATTENING;

/// First eccentricity squared of the WGS-84 ellipsoid, e² = f(2 − f)
pub const WGS84_ECC_SQUARED: f64 = WGS84_FLATTENING * (2.0 - WGS84_FLATTENING);

// -------------------------------------------------------------------------------------------------
// Service defaults
// -------------------------------------------------------------------------------------------------

/// Default time-to-live of a cached batch, in seconds
pub const DEFAULT_CACHE_TTL_SECS: u64 = 3_600;

/// Only element sets whose epoch is within this many days are requested
pub const DEFAULT_LOOKBACK_DAYS: u32 = 30;

/// Server-side bound on the number of element sets returned by one catalog query
pub const DEFAULT_CATALOG_LIMIT: u32 = 1_000;

/// Default Space-Track endpoint
pub const SPACE_TRACK_BASE_URL: &str = "https://www.space-track.org";

/// Prefix of the synthetic name given to an object without a catalog name
pub const SYNTHETIC_NAME_PREFIX: &str = "DEBRIS";

// -------------------------------------------------------------------------------------------------
// Type aliases
// -------------------------------------------------------------------------------------------------

/// Angle in degrees
pub type Degree = f64;
/// Angle in radians
pub type Radian = f64;
/// Distance in kilometers
pub type Kilometer = f64;
/// Modified Julian Date (days)
pub type MJD = f64;
/// NORAD catalog number of a tracked object
pub type NoradId = u32;

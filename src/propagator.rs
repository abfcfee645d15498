//! # Orbital propagation
//!
//! The [`Propagator`] trait is the narrow port through which the pipeline obtains an
//! inertial position for one element set at one instant. The default adapter,
//! [`Sgp4Propagator`], delegates to the [`sgp4`] crate, a vetted implementation of the
//! SGP4 model which switches to the SDP4 deep-space branch on its own for orbital
//! periods of 225 minutes or more.
//!
//! ## Frames & units
//!
//! Positions are expressed in the **TEME** frame (True Equator, Mean Equinox of date),
//! in **kilometers**; velocities in **km/s**. The propagation origin is always the
//! element set's own epoch, never the evaluation instant.
//!
//! ## Errors
//!
//! Failures are per object and map to [`SkipReason`]:
//! - element parsing (checksum, field layout) → [`SkipReason::MalformedElements`],
//! - model initialisation or propagation (decayed orbit, eccentricity leaving its
//!   domain) → [`SkipReason::PropagationDivergence`].
use hifitime::Epoch;
use nalgebra::Vector3;

use crate::debris_errors::SkipReason;
use crate::time::minutes_between;
use crate::tle::TlePair;

/// Inertial state of one object at one instant.
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitalState {
    /// Catalog name, when the element set carried one.
    pub name: Option<String>,
    /// TEME position, km.
    pub position: Vector3<f64>,
    /// TEME velocity, km/s.
    pub velocity: Vector3<f64>,
    /// Instant at which the state is evaluated (UTC).
    pub epoch: Epoch,
}

/// Compute the inertial state of an element set at a target instant.
///
/// Implementations must be pure: the same inputs always give the same output, and a
/// failure only concerns the element set at hand.
pub trait Propagator: Send + Sync + 'static {
    fn propagate(&self, tle: &TlePair, epoch: Epoch) -> Result<OrbitalState, SkipReason>;
}

/// SGP4/SDP4 propagation through the [`sgp4`] crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sgp4Propagator;

impl Propagator for Sgp4Propagator {
    fn propagate(&self, tle: &TlePair, epoch: Epoch) -> Result<OrbitalState, SkipReason> {
        let elements =
            sgp4::Elements::from_tle(tle.name.clone(), tle.line1.as_bytes(), tle.line2.as_bytes())
                .map_err(|err| SkipReason::MalformedElements(err.to_string()))?;

        let constants = sgp4::Constants::from_elements(&elements)
            .map_err(|err| SkipReason::PropagationDivergence(err.to_string()))?;

        let minutes_since_epoch = minutes_between(tle.epoch()?, epoch);

        let prediction = constants
            .propagate(sgp4::MinutesSinceEpoch(minutes_since_epoch))
            .map_err(|err| SkipReason::PropagationDivergence(err.to_string()))?;

        Ok(OrbitalState {
            name: elements.object_name,
            position: Vector3::from(prediction.position),
            velocity: Vector3::from(prediction.velocity),
            epoch,
        })
    }
}

#[cfg(test)]
mod propagator_test {
    use super::*;
    use crate::test_fixtures::{sample_pairs, ISS_LINE1, ISS_LINE2};
    use hifitime::Unit;

    fn iss() -> TlePair {
        TlePair::new(ISS_LINE1, ISS_LINE2)
    }

    #[test]
    fn test_iss_radius_at_epoch() {
        let tle = iss();
        let state = Sgp4Propagator.propagate(&tle, tle.epoch().unwrap()).unwrap();

        // mean motion 15.50 rev/day ⇒ a ≈ 6796 km, e ≈ 0.0007
        let radius = state.position.norm();
        assert!((6780.0..6815.0).contains(&radius), "radius = {radius}");

        let speed = state.velocity.norm();
        assert!((7.6..7.75).contains(&speed), "speed = {speed}");
    }

    #[test]
    fn test_shifted_epoch_moves_the_object() {
        let tle = iss();
        let t0 = tle.epoch().unwrap();
        let now = Sgp4Propagator.propagate(&tle, t0).unwrap();
        let later = Sgp4Propagator
            .propagate(&tle, t0 + Unit::Minute * 30.0)
            .unwrap();

        assert_eq!(later.epoch, t0 + Unit::Minute * 30.0);
        // a third of an orbit apart: the chord is thousands of kilometers long
        assert!((later.position - now.position).norm() > 5_000.0);

        // one full period later the object is back close to its starting point
        let period = Unit::Minute * (1440.0 / 15.50377579);
        let back = Sgp4Propagator.propagate(&tle, t0 + period).unwrap();
        assert!((back.position - now.position).norm() < 250.0);
    }

    #[test]
    fn test_deep_space_branch() {
        let geo = sample_pairs().pop().unwrap();
        let state = Sgp4Propagator.propagate(&geo, geo.epoch().unwrap()).unwrap();
        let radius = state.position.norm();
        assert!((42_000.0..42_330.0).contains(&radius), "radius = {radius}");
    }

    #[test]
    fn test_corrupt_field_is_malformed() {
        // inclination field " 51.6416" becomes "X51.6416"
        let line2 = format!("{}X{}", &ISS_LINE2[..8], &ISS_LINE2[9..]);
        let tle = TlePair::new(ISS_LINE1, line2);
        let err = Sgp4Propagator
            .propagate(&tle, iss().epoch().unwrap())
            .unwrap_err();
        assert!(matches!(err, SkipReason::MalformedElements(_)), "{err:?}");
    }

    #[test]
    fn test_garbage_is_malformed() {
        let tle = TlePair::new("hello", "world");
        let err = Sgp4Propagator
            .propagate(&tle, iss().epoch().unwrap())
            .unwrap_err();
        assert!(matches!(err, SkipReason::MalformedElements(_)));
    }

    #[test]
    fn test_name_is_carried() {
        let tle = iss().with_name("ISS (ZARYA)");
        let state = Sgp4Propagator.propagate(&tle, tle.epoch().unwrap()).unwrap();
        assert_eq!(state.name.as_deref(), Some("ISS (ZARYA)"));
    }
}

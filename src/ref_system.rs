use nalgebra::{Matrix3, Rotation3, Unit as AxisUnit, Vector3};

use crate::constants::Radian;

/// Coordinate frames handled by the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefSystem {
    // True Equator, Mean Equinox of date: the inertial output frame of SGP4
    Teme,
    // Pseudo Earth-fixed: TEME rotated by the sidereal angle about the polar axis
    // (polar motion neglected)
    EarthFixed,
}

/// Elementary rotation axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    fn unit(self) -> AxisUnit<Vector3<f64>> {
        match self {
            Axis::X => Vector3::x_axis(),
            Axis::Y => Vector3::y_axis(),
            Axis::Z => Vector3::z_axis(),
        }
    }
}

/// Rotation matrix of angle `alpha` about one of the coordinate axes.
///
/// The matrix rotates a vector counter-clockwise by `alpha`; use `-alpha` to express
/// a fixed vector in a frame rotated by `alpha`.
pub fn rotmt(alpha: Radian, axis: Axis) -> Matrix3<f64> {
    Rotation3::from_axis_angle(&axis.unit(), alpha).into()
}

/// Rotation matrix between two frames at an instant described by its sidereal angle.
///
/// Arguments
/// ---------
/// * `from`: source frame
/// * `to`: target frame
/// * `sidereal_angle`: Greenwich sidereal angle of the instant, in radians
///
/// Return
/// ------
/// * `rot` such that `x_to = rot · x_from`
pub fn rotpn(from: RefSystem, to: RefSystem, sidereal_angle: Radian) -> Matrix3<f64> {
    match (from, to) {
        (RefSystem::Teme, RefSystem::EarthFixed) => rotmt(-sidereal_angle, Axis::Z),
        (RefSystem::EarthFixed, RefSystem::Teme) => rotmt(sidereal_angle, Axis::Z),
        _ => Matrix3::identity(),
    }
}

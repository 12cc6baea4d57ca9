//! Core types for the attitude fusion library

use nalgebra::{Quaternion, Vector3};
use serde::{Deserialize, Serialize};

use crate::error::SettingsError;
use crate::quaternion;

/// Default integration step: 30 samples per second
pub const DEFAULT_DT: f64 = 1.0 / 30.0;
/// Default complementary filter gain
pub const DEFAULT_ALPHA: f64 = 0.9;
/// Default number of cycles between whole-quaternion renormalizations
pub const DEFAULT_RENORMALIZE_INTERVAL: u32 = 30;

/// Rotation expressed as an angle about an axis
///
/// Derived from a unit quaternion every cycle. The null rotation has no
/// meaningful axis and is kept as its own variant instead of a `NaN` axis.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum AngleAxis {
    /// Rotation angle of zero
    #[default]
    NullRotation,
    /// Rotation of `theta_degrees` about the unit vector `axis`
    Rotation {
        theta_degrees: f64,
        axis: Vector3<f64>,
    },
}

impl AngleAxis {
    /// Flatten to `(theta_degrees, ax, ay, az)`, the form a renderer consumes
    ///
    /// The null rotation becomes `(0, 1, 0, 0)`.
    pub fn as_tuple(&self) -> (f64, f64, f64, f64) {
        match *self {
            AngleAxis::NullRotation => (0.0, 1.0, 0.0, 0.0),
            AngleAxis::Rotation { theta_degrees, axis } => (theta_degrees, axis.x, axis.y, axis.z),
        }
    }

    /// Rotation angle in degrees
    pub fn theta_degrees(&self) -> f64 {
        self.as_tuple().0
    }

    /// Rebuild the quaternion this rotation was derived from
    pub fn to_quaternion(&self) -> Quaternion<f64> {
        match *self {
            AngleAxis::NullRotation => quaternion::identity(),
            AngleAxis::Rotation { theta_degrees, axis } => {
                quaternion::from_angle_axis(theta_degrees.to_radians(), axis)
            }
        }
    }
}

/// One fused input reading
///
/// Angular rate is always present, in radians per second. Acceleration is
/// only present when the source provides it; its scale is irrelevant since
/// only its direction is used.
///
/// # Example
/// ```
/// use attitude_fusion::Sample;
/// use nalgebra::Vector3;
///
/// let gyro_only = Sample::gyro(Vector3::new(0.0, 0.0, 0.5));
/// let with_tilt = Sample::with_acceleration(
///     Vector3::new(0.0, 0.0, 0.5),
///     Vector3::new(0.0, 0.0, -1.0),
/// );
/// assert!(gyro_only.acceleration.is_none());
/// assert!(with_tilt.acceleration.is_some());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    /// Angular rate in rad/s
    pub angular_rate: Vector3<f64>,
    /// Acceleration, any unit
    pub acceleration: Option<Vector3<f64>>,
}

impl Sample {
    /// Sample without an accelerometer reading
    pub fn gyro(angular_rate: Vector3<f64>) -> Self {
        Self {
            angular_rate,
            acceleration: None,
        }
    }

    /// Sample carrying both readings
    pub fn with_acceleration(angular_rate: Vector3<f64>, acceleration: Vector3<f64>) -> Self {
        Self {
            angular_rate,
            acceleration: Some(acceleration),
        }
    }
}

/// Fusion settings
///
/// # Example
/// ```
/// use attitude_fusion::FusionSettings;
///
/// let settings = FusionSettings {
///     dt: 0.01,                 // 100 Hz
///     alpha: 0.98,              // lean harder on the gyroscope
///     ..Default::default()
/// };
/// assert!(settings.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FusionSettings {
    /// Seconds per integration step
    pub dt: f64,
    /// Complementary filter gain in `[0, 1]`
    ///
    /// Share of each step given to the gyro-integrated estimate; the
    /// accelerometer correction receives `1 - alpha`.
    pub alpha: f64,
    /// Orientation at session start and after a reset, as `[w, x, y, z]`
    pub initial_orientation: [f64; 4],
    /// Cycles between renormalizations of the whole quaternion. 0 disables.
    pub renormalize_interval: u32,
}

impl FusionSettings {
    /// Check ranges
    pub fn validate(&self) -> Result<(), SettingsError> {
        if !(self.dt.is_finite() && self.dt > 0.0) {
            return Err(SettingsError::InvalidTimeStep(self.dt));
        }
        if !(0.0..=1.0).contains(&self.alpha) {
            return Err(SettingsError::InvalidAlpha(self.alpha));
        }
        let norm = self.initial_orientation.iter().map(|c| c * c).sum::<f64>().sqrt();
        if norm == 0.0 || !norm.is_finite() {
            return Err(SettingsError::DegenerateInitialOrientation);
        }
        Ok(())
    }

    /// Initial orientation scaled to unit length
    pub fn initial_quaternion(&self) -> Quaternion<f64> {
        let [w, x, y, z] = self.initial_orientation;
        quaternion::normalize(Quaternion::new(w, x, y, z))
    }
}

impl Default for FusionSettings {
    fn default() -> Self {
        Self {
            dt: DEFAULT_DT,
            alpha: DEFAULT_ALPHA,
            initial_orientation: [1.0, 0.0, 0.0, 0.0],
            renormalize_interval: DEFAULT_RENORMALIZE_INTERVAL,
        }
    }
}

/// Outcome of the tilt correction sub-step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CorrectionStatus {
    /// Sample carried no acceleration
    #[default]
    NotRequested,
    /// A correction rotation was applied
    Applied,
    /// Acceleration vector of zero length
    ZeroAcceleration,
    /// Orientation could not be inverted or mapped gravity to zero
    DegenerateOrientation,
    /// Measured gravity parallel or anti-parallel to the reference
    AmbiguousAxis,
}

/// Diagnostic state of a fusion session
///
/// # Example
/// ```
/// use attitude_fusion::{CorrectionStatus, FusionSession};
///
/// let session = FusionSession::new();
/// let states = session.internal_states();
/// assert_eq!(states.cycles, 0);
/// assert_eq!(states.correction_status, CorrectionStatus::NotRequested);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FusionStates {
    /// Cycles run since creation or the last reset
    pub cycles: u64,
    /// Cycles that received no usable sample
    pub held_cycles: u64,
    /// Whether the last cycle skipped integration because angular rate was zero
    pub integration_skipped: bool,
    /// Result of the last tilt correction
    pub correction_status: CorrectionStatus,
    /// Angle of the last applied correction in degrees
    pub correction_angle: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = FusionSettings::default();
        assert_eq!(settings.dt, 1.0 / 30.0);
        assert_eq!(settings.alpha, 0.9);
        assert_eq!(settings.initial_quaternion(), Quaternion::identity());
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_settings_validation() {
        let bad_dt = FusionSettings {
            dt: 0.0,
            ..Default::default()
        };
        assert_eq!(bad_dt.validate(), Err(SettingsError::InvalidTimeStep(0.0)));

        let bad_alpha = FusionSettings {
            alpha: 1.5,
            ..Default::default()
        };
        assert_eq!(bad_alpha.validate(), Err(SettingsError::InvalidAlpha(1.5)));

        let nan_alpha = FusionSettings {
            alpha: f64::NAN,
            ..Default::default()
        };
        assert!(nan_alpha.validate().is_err());

        let zero_orientation = FusionSettings {
            initial_orientation: [0.0; 4],
            ..Default::default()
        };
        assert_eq!(
            zero_orientation.validate(),
            Err(SettingsError::DegenerateInitialOrientation)
        );
    }

    #[test]
    fn test_gain_bounds_are_inclusive() {
        for alpha in [0.0, 1.0] {
            let settings = FusionSettings {
                alpha,
                ..Default::default()
            };
            assert!(settings.validate().is_ok());
        }
    }

    #[test]
    fn test_null_rotation_tuple() {
        assert_eq!(AngleAxis::default().as_tuple(), (0.0, 1.0, 0.0, 0.0));
        assert_eq!(AngleAxis::NullRotation.theta_degrees(), 0.0);
    }
}

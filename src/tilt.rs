//! Accelerometer tilt correction
//!
//! Compares the measured gravity direction, mapped into the world frame by
//! the current orientation, with the reference gravity vector and returns a
//! fraction of the rotation that would align the two.

use nalgebra::{Quaternion, Vector3};
use tracing::debug;

use crate::math::{Vector3Ext, clamp_unit};
use crate::quaternion;
use crate::types::CorrectionStatus;

/// Gravity direction in the world frame
pub const GRAVITY_REFERENCE: [f64; 3] = [0.0, 0.0, -1.0];

/// Cross products shorter than this leave the correction axis undefined
pub const AXIS_EPSILON: f64 = 1e-12;

/// Result of a tilt correction
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TiltCorrection {
    /// Rotate the world frame by `quaternion`, an angle of `angle` radians
    Rotation {
        quaternion: Quaternion<f64>,
        angle: f64,
    },
    /// No correction available this step
    Skipped(CorrectionStatus),
}

impl TiltCorrection {
    /// Correction quaternion, identity when skipped
    pub fn quaternion(&self) -> Quaternion<f64> {
        match *self {
            TiltCorrection::Rotation { quaternion, .. } => quaternion,
            TiltCorrection::Skipped(_) => quaternion::identity(),
        }
    }

    pub fn status(&self) -> CorrectionStatus {
        match *self {
            TiltCorrection::Rotation { .. } => CorrectionStatus::Applied,
            TiltCorrection::Skipped(status) => status,
        }
    }
}

/// Fixed-gain tilt corrector
#[derive(Debug, Clone, Copy)]
pub struct TiltCorrector {
    alpha: f64,
}

impl TiltCorrector {
    /// `alpha` is the share trusted to the gyro estimate, in `[0, 1]`
    pub fn new(alpha: f64) -> Self {
        Self { alpha }
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Correction for `orientation` given a raw accelerometer reading
    ///
    /// `orientation` must be unit length; it is inverted with the norm-only
    /// inverse. The returned quaternion is meant to be applied on the left,
    /// in the world frame.
    pub fn correct(&self, orientation: Quaternion<f64>, acceleration: Vector3<f64>) -> TiltCorrection {
        let Some(acc) = acceleration.try_unit() else {
            debug!("zero acceleration, skipping tilt correction");
            return TiltCorrection::Skipped(CorrectionStatus::ZeroAcceleration);
        };

        let Some(inverse) = quaternion::inverse(orientation) else {
            debug!("orientation has no inverse, skipping tilt correction");
            return TiltCorrection::Skipped(CorrectionStatus::DegenerateOrientation);
        };

        let acc_q = Quaternion::from_imag(acc);
        let world = quaternion::multiply(quaternion::multiply(orientation, acc_q), inverse);
        let Some(measured) = world.imag().try_unit() else {
            debug!("measured gravity vanished in world frame, skipping tilt correction");
            return TiltCorrection::Skipped(CorrectionStatus::DegenerateOrientation);
        };

        let reference = Vector3::from(GRAVITY_REFERENCE);
        let axis = measured.cross(&reference);
        let axis_norm = axis.norm();
        if axis_norm < AXIS_EPSILON {
            debug!(z = measured.z, "gravity axis ambiguous, skipping tilt correction");
            return TiltCorrection::Skipped(CorrectionStatus::AmbiguousAxis);
        }

        // acos(-G_z) for the downward reference
        let phi = clamp_unit(measured.dot(&reference)).acos();
        let angle = (1.0 - self.alpha) * phi;

        TiltCorrection::Rotation {
            quaternion: quaternion::normalize(quaternion::from_angle_axis(angle, axis / axis_norm)),
            angle,
        }
    }
}

//! Gyroscope integration
//!
//! Treats the angular rate as constant over one step and composes the
//! resulting incremental rotation onto the orientation in the body frame.

use nalgebra::{Quaternion, Vector3};

use crate::math::clamp_unit;
use crate::quaternion;

/// Advances an orientation by one time step of angular rate
#[derive(Debug, Clone, Copy, Default)]
pub struct GyroIntegrator;

impl GyroIntegrator {
    pub fn new() -> Self {
        Self
    }

    /// Incremental rotation for `angular_rate` (rad/s) held over `dt` seconds
    ///
    /// Returns `None` for a zero angular rate: there is nothing to rotate
    /// about and the orientation stays put.
    pub fn increment(&self, angular_rate: Vector3<f64>, dt: f64) -> Option<Quaternion<f64>> {
        let norm_w = angular_rate.norm();
        if norm_w == 0.0 || !norm_w.is_finite() {
            return None;
        }

        let half_angle = 0.5 * dt * norm_w;
        Some(Quaternion::from_parts(
            half_angle.cos(),
            (angular_rate / norm_w) * half_angle.sin(),
        ))
    }

    /// Orientation after one step, or `None` when the angular rate is zero
    ///
    /// The increment is composed on the right. Only the scalar part is
    /// clamped into `[-1, 1]` afterwards; renormalizing the whole quaternion
    /// is left to the caller.
    pub fn integrate(
        &self,
        orientation: Quaternion<f64>,
        angular_rate: Vector3<f64>,
        dt: f64,
    ) -> Option<Quaternion<f64>> {
        let dq = self.increment(angular_rate, dt)?;
        let mut updated = quaternion::multiply(orientation, dq);
        updated.w = clamp_unit(updated.w);
        Some(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::f64::consts::{FRAC_PI_2, PI};

    #[test]
    fn test_zero_rate_leaves_orientation_unchanged() {
        let integrator = GyroIntegrator::new();
        let orientation = quaternion::from_angle_axis(0.4, Vector3::new(0.0, 1.0, 0.0));

        for dt in [0.0, 1.0 / 30.0, 1.0, 1e6] {
            assert!(integrator.integrate(orientation, Vector3::zeros(), dt).is_none());
        }
    }

    #[test]
    fn test_half_turn_in_one_step() {
        let integrator = GyroIntegrator::new();
        let q = integrator
            .integrate(quaternion::identity(), Vector3::new(0.0, 0.0, PI), 1.0)
            .unwrap();

        let expected = Quaternion::new(0.0, 0.0, 0.0, 1.0);
        assert!((q.coords - expected.coords).norm() < 1e-12, "{q:?}");
    }

    #[test]
    fn test_increment_is_unit_length() {
        let integrator = GyroIntegrator::new();
        let dq = integrator
            .increment(Vector3::new(0.3, -1.2, 2.5), 0.02)
            .unwrap();
        assert!((dq.norm() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_increment_composes_in_body_frame() {
        let integrator = GyroIntegrator::new();
        // Pitched up a quarter turn about y, then spinning about the body x axis
        let orientation = quaternion::from_angle_axis(FRAC_PI_2, Vector3::y());
        let omega = Vector3::new(1.0, 0.0, 0.0);

        let q = integrator.integrate(orientation, omega, 0.1).unwrap();
        let expected = orientation * quaternion::from_angle_axis(0.1, Vector3::x());
        assert!((q.coords - expected.coords).norm() < 1e-12);
    }

    #[test]
    fn test_scalar_part_is_clamped() {
        let integrator = GyroIntegrator::new();
        // A slightly over-length orientation pushes w past 1 after composition
        let orientation = Quaternion::new(1.0 + 1e-9, 0.0, 0.0, 0.0);
        let q = integrator
            .integrate(orientation, Vector3::new(1e-9, 0.0, 0.0), 1e-3)
            .unwrap();
        assert!(q.w <= 1.0);
    }
}

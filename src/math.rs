//! Mathematical utilities and nalgebra extensions

use nalgebra::Vector3;

/// Mathematical constants
pub const DEG_TO_RAD: f64 = core::f64::consts::PI / 180.0;
pub const RAD_TO_DEG: f64 = 180.0 / core::f64::consts::PI;

/// Extension trait for Vector3 operations
pub trait Vector3Ext {
    /// Normalize the vector, returning `None` if its magnitude is zero
    fn try_unit(&self) -> Option<Vector3<f64>>;

    /// Normalize the vector, returning zero vector if magnitude is zero
    fn safe_normalize(&self) -> Vector3<f64>;

    /// Convert degrees to radians
    fn deg_to_rad(&self) -> Vector3<f64>;

    /// Convert radians to degrees
    fn rad_to_deg(&self) -> Vector3<f64>;
}

impl Vector3Ext for Vector3<f64> {
    fn try_unit(&self) -> Option<Vector3<f64>> {
        let mag = self.norm();
        if mag > 0.0 && mag.is_finite() {
            Some(*self / mag)
        } else {
            None
        }
    }

    fn safe_normalize(&self) -> Vector3<f64> {
        self.try_unit().unwrap_or_else(Vector3::zeros)
    }

    fn deg_to_rad(&self) -> Vector3<f64> {
        *self * DEG_TO_RAD
    }

    fn rad_to_deg(&self) -> Vector3<f64> {
        *self * RAD_TO_DEG
    }
}

/// Clamp a cosine into `[-1, 1]` before it reaches `acos`
pub(crate) fn clamp_unit(value: f64) -> f64 {
    value.clamp(-1.0, 1.0)
}

//! Quaternion algebra used by the fusion pipeline
//!
//! All functions are pure and take their operands by value. Quaternions are
//! `nalgebra::Quaternion<f64>` in `(w, i, j, k)` order, where `(i, j, k)` is
//! the vector part `(x, y, z)`.

use nalgebra::{Quaternion, Vector3};

use crate::math::clamp_unit;
use crate::types::AngleAxis;

/// The null rotation `(1, 0, 0, 0)`
#[inline]
pub fn identity() -> Quaternion<f64> {
    Quaternion::identity()
}

/// Hamilton product `p ⊗ q`
///
/// Not commutative. For rotation quaternions acting by conjugation the result
/// applies `q` first, then `p`.
///
/// ```
/// use attitude_fusion::quaternion::{identity, multiply};
/// use nalgebra::Quaternion;
///
/// let q = Quaternion::new(0.5, 0.5, 0.5, 0.5);
/// assert_eq!(multiply(q, identity()), q);
/// ```
#[inline]
pub fn multiply(p: Quaternion<f64>, q: Quaternion<f64>) -> Quaternion<f64> {
    p * q
}

/// Inverse of a unit quaternion
///
/// Computed as the conjugate divided by the norm rather than the squared
/// norm, which is exact only when `q` is unit length. Every orientation in
/// the pipeline is kept normalized, so callers must uphold that precondition
/// instead of relying on a general inverse.
///
/// Returns `None` when the norm is zero.
pub fn inverse(q: Quaternion<f64>) -> Option<Quaternion<f64>> {
    let norm = q.norm();
    if norm == 0.0 || !norm.is_finite() {
        return None;
    }
    Some(q.conjugate() / norm)
}

/// Scale `q` to unit length, falling back to identity for a zero quaternion
pub fn normalize(q: Quaternion<f64>) -> Quaternion<f64> {
    let norm = q.norm();
    if norm == 0.0 || !norm.is_finite() {
        return identity();
    }
    q / norm
}

/// Convert a unit quaternion to an angle-axis rotation
///
/// The scalar part is clamped into `[-1, 1]` before `acos`. A scalar of
/// exactly ±1 is the null rotation, whose axis is undefined.
pub fn to_angle_axis(q: Quaternion<f64>) -> AngleAxis {
    if !q.w.is_finite() {
        return AngleAxis::NullRotation;
    }

    let w = clamp_unit(q.w);
    if w * w == 1.0 {
        return AngleAxis::NullRotation;
    }

    let factor = (1.0 - w * w).sqrt();
    AngleAxis::Rotation {
        theta_degrees: (2.0 * w.acos()).to_degrees(),
        axis: q.imag() / factor,
    }
}

/// Build the quaternion rotating by `theta` radians about `axis`
///
/// The axis is used as given; pass a unit vector to get a unit quaternion.
pub fn from_angle_axis(theta: f64, axis: Vector3<f64>) -> Quaternion<f64> {
    let half = 0.5 * theta;
    Quaternion::from_parts(half.cos(), axis * half.sin())
}

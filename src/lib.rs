//! Attitude Fusion - gyroscope and accelerometer fusion into a unit quaternion
//!
//! This library estimates the 3D orientation of a sensor board from a stream
//! of angular-rate and acceleration samples using a fixed-gain complementary
//! filter, and converts the result to an angle-axis rotation for rendering.
//!
//! Every sample runs one cycle:
//!
//! 1. the gyroscope reading is integrated into the orientation (body frame),
//! 2. when an accelerometer reading is present, a fraction `1 - alpha` of the
//!    rotation that aligns measured gravity with `(0, 0, -1)` is applied in
//!    the world frame,
//! 3. the orientation is normalized and published as a quaternion and an
//!    angle-axis rotation.
//!
//! Degenerate readings never fail a cycle: a zero angular rate skips
//! integration, a zero or gravity-aligned acceleration skips correction and a
//! malformed record holds the previous orientation.
//!
//! # Quick Start
//!
//! ```rust
//! use nalgebra::Vector3;
//! use attitude_fusion::{FusionSession, Sample};
//!
//! let mut session = FusionSession::new(); // dt = 1/30 s, alpha = 0.9
//!
//! let angular_rate = Vector3::new(0.0, 0.0, 0.5);  // rad/s
//! let acceleration = Vector3::new(0.0, 0.0, -1.0); // any unit
//!
//! let output = session.update(&Sample::with_acceleration(angular_rate, acceleration));
//!
//! let (theta, ax, ay, az) = output.angle_axis.as_tuple();
//! ```

pub mod config;
mod error;
mod fusion;
pub mod integrator;
mod math;
pub mod quaternion;
pub mod source;
pub mod tilt;
mod types;

// Re-export all public types and functions
pub use config::{load_settings, save_settings};
pub use error::{ConfigError, RecordError, SettingsError};
pub use fusion::{FusionOutput, FusionSession, OrientationSink, run};
pub use integrator::GyroIntegrator;
pub use math::{DEG_TO_RAD, RAD_TO_DEG, Vector3Ext};
pub use source::{LineSource, SampleSource, parse_record};
pub use tilt::{GRAVITY_REFERENCE, TiltCorrection, TiltCorrector};
pub use types::*;

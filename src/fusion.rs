//! Fusion loop: integrate, correct, blend and emit once per sample

use nalgebra::Quaternion;
use tracing::{debug, info, trace, warn};

use crate::error::{RecordError, SettingsError};
use crate::integrator::GyroIntegrator;
use crate::quaternion;
use crate::source::SampleSource;
use crate::tilt::{TiltCorrection, TiltCorrector};
use crate::types::{AngleAxis, CorrectionStatus, FusionSettings, FusionStates, Sample};

/// Orientation published at the end of every cycle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FusionOutput {
    /// Current orientation
    ///
    /// Normalized after every tilt correction; on gyro-only cycles it may
    /// drift slightly until the next periodic renormalization.
    pub quaternion: Quaternion<f64>,
    /// The same orientation as an angle-axis rotation
    pub angle_axis: AngleAxis,
}

impl FusionOutput {
    fn from_orientation(quaternion: Quaternion<f64>) -> Self {
        Self {
            quaternion,
            angle_axis: quaternion::to_angle_axis(quaternion),
        }
    }
}

impl Default for FusionOutput {
    fn default() -> Self {
        Self::from_orientation(quaternion::identity())
    }
}

/// Consumer of fused orientations, typically a renderer
pub trait OrientationSink {
    fn emit(&mut self, output: &FusionOutput);
}

impl<F: FnMut(&FusionOutput)> OrientationSink for F {
    fn emit(&mut self, output: &FusionOutput) {
        self(output)
    }
}

/// One attitude estimation session
///
/// Owns the orientation estimate for its whole lifetime. Each call to
/// [`update`](Self::update) runs one complete cycle; nothing is shared with
/// other sessions.
///
/// # Example
/// ```
/// use attitude_fusion::{FusionSession, Sample};
/// use nalgebra::Vector3;
///
/// let mut session = FusionSession::new();
/// let sample = Sample::with_acceleration(
///     Vector3::new(0.0, 0.0, 0.5),  // rad/s
///     Vector3::new(0.0, 0.0, -1.0),
/// );
/// let output = session.update(&sample);
/// let (theta, ax, ay, az) = output.angle_axis.as_tuple();
/// println!("rotate {theta:.2} deg about ({ax:.2}, {ay:.2}, {az:.2})");
/// ```
#[derive(Debug, Clone)]
pub struct FusionSession {
    settings: FusionSettings,
    orientation: Quaternion<f64>,
    integrator: GyroIntegrator,
    corrector: TiltCorrector,
    /// Cycles since the last whole-quaternion renormalization
    since_renormalize: u32,
    states: FusionStates,
    output: FusionOutput,
}

impl FusionSession {
    /// Session with default settings
    pub fn new() -> Self {
        Self::build(FusionSettings::default())
    }

    /// Session with the given settings
    pub fn with_settings(settings: FusionSettings) -> Result<Self, SettingsError> {
        settings.validate()?;
        Ok(Self::build(settings))
    }

    fn build(settings: FusionSettings) -> Self {
        let mut session = Self {
            settings,
            orientation: quaternion::identity(),
            integrator: GyroIntegrator::new(),
            corrector: TiltCorrector::new(settings.alpha),
            since_renormalize: 0,
            states: FusionStates::default(),
            output: FusionOutput::default(),
        };
        session.reset();
        info!(dt = settings.dt, alpha = settings.alpha, "fusion session started");
        session
    }

    /// Return to the configured initial orientation and clear diagnostics
    pub fn reset(&mut self) {
        self.orientation = self.settings.initial_quaternion();
        self.since_renormalize = 0;
        self.states = FusionStates::default();
        self.output = FusionOutput::from_orientation(self.orientation);
        info!(orientation = ?self.orientation, "fusion session reset");
    }

    /// Replace the settings; the orientation is kept
    pub fn set_settings(&mut self, settings: FusionSettings) -> Result<(), SettingsError> {
        settings.validate()?;
        self.settings = settings;
        self.corrector = TiltCorrector::new(settings.alpha);
        info!(dt = settings.dt, alpha = settings.alpha, "fusion settings updated");
        Ok(())
    }

    pub fn settings(&self) -> FusionSettings {
        self.settings
    }

    /// Current orientation estimate
    pub fn orientation(&self) -> Quaternion<f64> {
        self.orientation
    }

    /// Overwrite the orientation estimate; it is normalized first
    pub fn set_orientation(&mut self, orientation: Quaternion<f64>) {
        self.orientation = quaternion::normalize(orientation);
        self.output = FusionOutput::from_orientation(self.orientation);
    }

    /// Angle-axis view of the current orientation
    pub fn angle_axis(&self) -> AngleAxis {
        self.output.angle_axis
    }

    /// Output of the most recent cycle
    pub fn output(&self) -> FusionOutput {
        self.output
    }

    pub fn internal_states(&self) -> FusionStates {
        self.states
    }

    /// Run one cycle with the configured time step
    pub fn update(&mut self, sample: &Sample) -> FusionOutput {
        self.update_with_dt(sample, self.settings.dt)
    }

    /// Run one cycle with a measured time step
    ///
    /// A zero `dt` means no time elapsed and the gyro adds no rotation. A
    /// negative or non-finite `dt` falls back to the configured one.
    pub fn update_with_dt(&mut self, sample: &Sample, dt: f64) -> FusionOutput {
        let dt = if dt.is_finite() && dt >= 0.0 {
            dt
        } else {
            self.settings.dt
        };
        self.states.cycles += 1;

        match self.integrator.integrate(self.orientation, sample.angular_rate, dt) {
            Some(orientation) => {
                self.orientation = orientation;
                self.states.integration_skipped = false;
            }
            None => {
                debug!("zero angular rate, skipping integration");
                self.states.integration_skipped = true;
            }
        }

        self.states.correction_status = CorrectionStatus::NotRequested;
        self.states.correction_angle = 0.0;
        if let Some(acceleration) = sample.acceleration {
            let correction = self.corrector.correct(self.orientation, acceleration);
            if let TiltCorrection::Rotation { angle, .. } = correction {
                self.states.correction_angle = angle.to_degrees();
            }
            self.states.correction_status = correction.status();
            self.orientation =
                quaternion::normalize(quaternion::multiply(correction.quaternion(), self.orientation));
        }

        self.renormalize_if_due();

        self.output = FusionOutput::from_orientation(self.orientation);
        trace!(
            cycle = self.states.cycles,
            w = self.orientation.w,
            x = self.orientation.i,
            y = self.orientation.j,
            z = self.orientation.k,
            "fusion cycle"
        );
        self.output
    }

    /// Run a cycle that received no usable sample
    ///
    /// The orientation is held and the previous output is returned unchanged.
    pub fn hold(&mut self) -> FusionOutput {
        self.states.cycles += 1;
        self.states.held_cycles += 1;
        self.output
    }

    /// Update from a source result, holding on a malformed record
    pub fn process(&mut self, record: Result<Sample, RecordError>) -> FusionOutput {
        match record {
            Ok(sample) => self.update(&sample),
            Err(e) => {
                warn!(error = %e, "discarding malformed sample");
                self.hold()
            }
        }
    }

    fn renormalize_if_due(&mut self) {
        let interval = self.settings.renormalize_interval;
        if interval == 0 {
            return;
        }
        self.since_renormalize += 1;
        if self.since_renormalize >= interval {
            self.orientation = quaternion::normalize(self.orientation);
            self.since_renormalize = 0;
        }
    }
}

impl Default for FusionSession {
    fn default() -> Self {
        Self::new()
    }
}

/// Drive `session` from `source` until the source closes
///
/// Every cycle emits exactly one output to `sink`, including cycles whose
/// record was malformed. Returns the number of cycles run.
pub fn run<S, K>(session: &mut FusionSession, source: &mut S, sink: &mut K) -> u64
where
    S: SampleSource + ?Sized,
    K: OrientationSink + ?Sized,
{
    let mut cycles = 0;
    while let Some(record) = source.next_sample() {
        let output = session.process(record);
        sink.emit(&output);
        cycles += 1;
    }
    info!(cycles, held = session.internal_states().held_cycles, "sample source closed");
    cycles
}

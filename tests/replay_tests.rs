use attitude_fusion::{
    AngleAxis, CorrectionStatus, FusionOutput, FusionSession, LineSource, Sample, Vector3Ext, run,
};
use nalgebra::{Quaternion, Vector3};
use serde::Deserialize;
use std::error::Error;
use std::fs::File;
use std::io::BufReader;

#[derive(Debug, Deserialize)]
struct SensorData {
    #[serde(rename = "Time (s)")]
    time: f64,
    #[serde(rename = "Gyroscope X (deg/s)")]
    gyro_x: f64,
    #[serde(rename = "Gyroscope Y (deg/s)")]
    gyro_y: f64,
    #[serde(rename = "Gyroscope Z (deg/s)")]
    gyro_z: f64,
    #[serde(rename = "Accelerometer X (g)")]
    accel_x: f64,
    #[serde(rename = "Accelerometer Y (g)")]
    accel_y: f64,
    #[serde(rename = "Accelerometer Z (g)")]
    accel_z: f64,
}

impl SensorData {
    fn sample(&self) -> Sample {
        Sample::with_acceleration(
            Vector3::new(self.gyro_x, self.gyro_y, self.gyro_z).deg_to_rad(),
            Vector3::new(self.accel_x, self.accel_y, self.accel_z),
        )
    }
}

fn load_csv(path: &str) -> Result<Vec<SensorData>, Box<dyn Error>> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut sensor_data = Vec::new();
    for result in reader.deserialize() {
        let record: SensorData = result?;
        sensor_data.push(record);
    }
    Ok(sensor_data)
}

fn gravity_error_degrees(orientation: Quaternion<f64>, acceleration: Vector3<f64>) -> f64 {
    let world = (orientation * Quaternion::from_imag(acceleration.normalize()) * orientation.conjugate()).imag();
    world
        .normalize()
        .dot(&Vector3::new(0.0, 0.0, -1.0))
        .clamp(-1.0, 1.0)
        .acos()
        .to_degrees()
}

/// Half a turn per second about z, level board, timestamps as the time step
#[test]
fn test_spin_recording_with_measured_time_steps() -> Result<(), Box<dyn Error>> {
    let sensor_data = load_csv("testdata/spin_z.csv")?;
    assert_eq!(sensor_data.len(), 31);

    let mut session = FusionSession::new();
    for pair in sensor_data.windows(2) {
        let delta_time = pair[1].time - pair[0].time;
        session.update_with_dt(&pair[1].sample(), delta_time);

        // Rotation about z keeps the sensed gravity on the reference axis
        assert_eq!(
            session.internal_states().correction_status,
            CorrectionStatus::AmbiguousAxis
        );
    }

    let AngleAxis::Rotation { theta_degrees, axis } = session.angle_axis() else {
        panic!("expected a rotation");
    };
    assert!((theta_degrees - 180.0).abs() < 1e-3, "theta = {theta_degrees}");
    assert!((axis.z.abs() - 1.0).abs() < 1e-6, "axis = {axis:?}");
    Ok(())
}

/// Serial capture of a board tilted 30 degrees about x with a few bad lines
#[test]
fn test_tilted_capture_converges_and_holds_on_glitches() -> Result<(), Box<dyn Error>> {
    let file = File::open("testdata/tilted_still.txt")?;
    let mut source = LineSource::new(BufReader::new(file));
    let mut session = FusionSession::new();

    let mut outputs: Vec<FusionOutput> = Vec::new();
    let cycles = run(&mut session, &mut source, &mut |output: &FusionOutput| {
        outputs.push(*output)
    });

    assert_eq!(cycles, 90);
    assert_eq!(outputs.len(), 90);
    assert_eq!(session.internal_states().held_cycles, 4);

    // Lines 10, 11, 40 and 41 are unusable and repeat the previous output
    for held in [10, 11, 40, 41] {
        assert_eq!(outputs[held], outputs[held - 1], "line {held}");
    }

    let acceleration = Vector3::new(0.0, -0.5, -0.866);
    let first = gravity_error_degrees(outputs[0].quaternion, acceleration);
    let last = gravity_error_degrees(session.orientation(), acceleration);
    assert!((first - 27.0).abs() < 0.01, "first correction left {first} degrees");
    assert!(last < 0.01, "residual tilt {last} degrees");

    // The estimate settles on a roll of about 30 degrees
    let theta = session.angle_axis().theta_degrees();
    assert!((theta - 30.0).abs() < 0.05, "theta = {theta}");
    Ok(())
}

#[test]
fn test_csv_and_line_records_agree() -> Result<(), Box<dyn Error>> {
    let sensor_data = load_csv("testdata/spin_z.csv")?;
    let row = &sensor_data[1];
    let line = format!(
        "{}, {}, {}, {}, {}, {}",
        row.accel_x, row.accel_y, row.accel_z, row.gyro_x, row.gyro_y, row.gyro_z
    );
    assert_eq!(attitude_fusion::parse_record(&line)?, row.sample());
    Ok(())
}

use attitude_fusion::{FusionSession, Sample};
use nalgebra::Vector3;

const SAMPLE_PERIOD: f64 = 1.0 / 30.0; // 30 Hz sample period

fn main() {
    let mut session = FusionSession::new();

    for _ in 0..30 {
        // this loop should repeat each time new sensor data is available
        let angular_rate = Vector3::new(0.0, 0.0, 90.0_f64.to_radians()); // replace this with actual gyroscope data in rad/s
        let acceleration = Vector3::new(0.0, 0.0, -1.0); // replace this with actual accelerometer data

        let output =
            session.update_with_dt(&Sample::with_acceleration(angular_rate, acceleration), SAMPLE_PERIOD);

        let (theta, ax, ay, az) = output.angle_axis.as_tuple();
        println!("Theta: {theta:.2}, Axis: ({ax:.2}, {ay:.2}, {az:.2})");
    }
}

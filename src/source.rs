//! Sample sources
//!
//! The sensor side speaks comma-separated text records, one per line:
//!
//! - `wx, wy, wz`: angular rate in deg/s
//! - `ax, ay, az, wx, wy, wz`: acceleration followed by angular rate
//!
//! Angular rate is converted to rad/s on the way in.

use std::io::BufRead;

use nalgebra::Vector3;
use tracing::error;

use crate::error::RecordError;
use crate::math::Vector3Ext;
use crate::types::Sample;

/// Pull-based supplier of samples
///
/// `None` means the stream is closed. `Some(Err(_))` is a cycle without
/// usable data; the session holds its orientation and keeps going.
pub trait SampleSource {
    fn next_sample(&mut self) -> Option<Result<Sample, RecordError>>;
}

impl<I> SampleSource for I
where
    I: Iterator<Item = Result<Sample, RecordError>>,
{
    fn next_sample(&mut self) -> Option<Result<Sample, RecordError>> {
        self.next()
    }
}

/// Parse one text record into a sample
///
/// ```
/// use attitude_fusion::source::parse_record;
///
/// let sample = parse_record("0.0, -1.0, 0.0, 0.0, 0.0, 90.0").unwrap();
/// assert_eq!(sample.acceleration.unwrap().y, -1.0);
/// assert!((sample.angular_rate.z - core::f64::consts::FRAC_PI_2).abs() < 1e-12);
/// ```
pub fn parse_record(line: &str) -> Result<Sample, RecordError> {
    let line = line.trim();
    if line.is_empty() {
        return Err(RecordError::Empty);
    }

    let fields: Vec<&str> = line.split(',').map(str::trim).collect();
    if fields.len() != 3 && fields.len() != 6 {
        return Err(RecordError::FieldCount(fields.len()));
    }

    let values = fields
        .iter()
        .enumerate()
        .map(|(index, field)| parse_field(index, field))
        .collect::<Result<Vec<f64>, RecordError>>()?;

    match values.as_slice() {
        [wx, wy, wz] => Ok(Sample::gyro(Vector3::new(*wx, *wy, *wz).deg_to_rad())),
        [ax, ay, az, wx, wy, wz] => Ok(Sample::with_acceleration(
            Vector3::new(*wx, *wy, *wz).deg_to_rad(),
            Vector3::new(*ax, *ay, *az),
        )),
        other => Err(RecordError::FieldCount(other.len())),
    }
}

fn parse_field(index: usize, field: &str) -> Result<f64, RecordError> {
    let value: f64 = field.parse().map_err(|_| RecordError::InvalidNumber {
        index,
        value: field.to_string(),
    })?;
    if !value.is_finite() {
        return Err(RecordError::NonFinite { index });
    }
    Ok(value)
}

/// Reads one record per line from any buffered reader
///
/// A line that is not valid UTF-8 is a malformed record like any other. A
/// read error closes the stream just like end of input.
///
/// ```
/// use attitude_fusion::source::LineSource;
///
/// let input = "0, 0, 90\nbad line\n0, 0, -1, 0, 0, 0\n";
/// let results: Vec<_> = LineSource::new(input.as_bytes()).collect();
/// assert_eq!(results.len(), 3);
/// assert!(results[1].is_err());
/// ```
pub struct LineSource<R> {
    reader: R,
    line: Vec<u8>,
    lines_read: u64,
}

impl<R: BufRead> LineSource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line: Vec::new(),
            lines_read: 0,
        }
    }

    /// Lines consumed so far
    pub fn lines_read(&self) -> u64 {
        self.lines_read
    }
}

impl<R: BufRead> Iterator for LineSource<R> {
    type Item = Result<Sample, RecordError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.line.clear();
        match self.reader.read_until(b'\n', &mut self.line) {
            Ok(0) => None,
            Ok(_) => {
                self.lines_read += 1;
                Some(
                    std::str::from_utf8(&self.line)
                        .map_err(|_| RecordError::InvalidEncoding)
                        .and_then(parse_record),
                )
            }
            Err(e) => {
                error!(?e, line = self.lines_read + 1, "sample stream read error");
                None
            }
        }
    }
}

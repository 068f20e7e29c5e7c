use hardmon_protocol::Metrics;

use crate::error::Result;

/// A reader for one hardware domain.
pub trait MetricSource {
    /// Short name used in logs and error messages.
    fn name(&self) -> &'static str;

    /// Read the source once and return every metric it exposes.
    ///
    /// Missing interfaces surface as [`SensorError::Io`](crate::SensorError::Io);
    /// unexpected text as [`SensorError::Malformed`](crate::SensorError::Malformed).
    fn read(&mut self) -> Result<Metrics>;
}

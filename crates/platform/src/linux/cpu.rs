use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use hardmon_protocol::{MetricValue, Metrics};
use tracing::debug;

use crate::energy::EnergyCounter;
use crate::error::{read_interface, Result, SensorError};
use crate::paths::SensorPaths;

const READER: &str = "cpu";

/// Per-processor clocks, package temperature, load average and power draw.
#[derive(Debug, Clone)]
pub struct CpuReader {
    cpuinfo: PathBuf,
    loadavg: PathBuf,
    temperature: PathBuf,
    energy: Option<PathBuf>,
}

impl CpuReader {
    /// `powercap` gates the energy counter read; without it `cpu_power` is
    /// never reported.
    pub fn new(paths: &SensorPaths, powercap: bool) -> Self {
        Self {
            cpuinfo: paths.cpuinfo.clone(),
            loadavg: paths.loadavg.clone(),
            temperature: paths.cpu_temp.clone(),
            energy: powercap.then(|| paths.energy.clone()),
        }
    }

    pub fn name(&self) -> &'static str {
        READER
    }

    pub fn read(&self, energy: &mut EnergyCounter) -> Result<Metrics> {
        let cpuinfo = read_interface(&self.cpuinfo)?;
        let temperature = read_interface(&self.temperature)?;
        let loadavg = read_interface(&self.loadavg)?;

        let mut metrics = parse_cpuinfo(&cpuinfo)?;
        metrics.insert(
            "cpu_temp".to_string(),
            MetricValue::Float(parse_temperature(&temperature)?),
        );
        metrics.insert(
            "cpu_load".to_string(),
            MetricValue::Text(parse_loadavg(&loadavg)?),
        );

        if let Some(watts) = self.read_power(energy) {
            metrics.insert("cpu_power".to_string(), MetricValue::Float(watts));
        }

        Ok(metrics)
    }

    fn read_power(&self, energy: &mut EnergyCounter) -> Option<f64> {
        let path = self.energy.as_ref()?;

        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                debug!(path = %path.display(), error = %e, "Energy counter unavailable");
                return None;
            }
        };

        match content.trim().parse::<u64>() {
            Ok(energy_uj) => energy.update(energy_uj, Instant::now()),
            Err(e) => {
                debug!(path = %path.display(), error = %e, "Energy counter unreadable");
                None
            }
        }
    }
}

/// Extract `cpu{N}_clk` for every processor block in cpuinfo text.
///
/// Single forward scan: the processor index changes only on a `processor`
/// line, and clock lines seen before the first one belong to index 0.
/// Clock values are passed through as text.
pub fn parse_cpuinfo(content: &str) -> Result<Metrics> {
    let mut metrics = Metrics::new();
    let mut current_cpu = "0";

    for line in content.lines() {
        if line.starts_with("processor") {
            current_cpu = field_value(line)?;
        }
        if line.starts_with("cpu MHz") {
            metrics.insert(
                format!("cpu{}_clk", current_cpu),
                MetricValue::Text(field_value(line)?.to_string()),
            );
        }
    }

    Ok(metrics)
}

/// Convert a millidegree hwmon reading to degrees Celsius.
pub fn parse_temperature(content: &str) -> Result<f64> {
    let trimmed = content.trim();
    let millidegrees = trimmed.parse::<i64>().map_err(|_| {
        SensorError::malformed(READER, format!("temperature {:?} is not an integer", trimmed))
    })?;
    Ok(millidegrees as f64 / 1000.0)
}

/// First field of the load-average line, as text.
pub fn parse_loadavg(content: &str) -> Result<String> {
    content
        .split_whitespace()
        .next()
        .map(str::to_string)
        .ok_or_else(|| SensorError::malformed(READER, "empty load average"))
}

fn field_value(line: &str) -> Result<&str> {
    line.split(':')
        .nth(1)
        .map(str::trim)
        .ok_or_else(|| SensorError::malformed(READER, format!("missing ':' in {:?}", line)))
}

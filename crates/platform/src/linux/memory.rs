use std::path::PathBuf;

use hardmon_protocol::{MetricValue, Metrics};

use crate::error::{read_interface, Result, SensorError};
use crate::paths::SensorPaths;
use crate::source::MetricSource;

const READER: &str = "meminfo";

/// `mem_available` and the derived `mem_used`, in kB.
#[derive(Debug, Clone)]
pub struct MemoryReader {
    meminfo: PathBuf,
}

impl MemoryReader {
    pub fn new(paths: &SensorPaths) -> Self {
        Self {
            meminfo: paths.meminfo.clone(),
        }
    }
}

impl MetricSource for MemoryReader {
    fn name(&self) -> &'static str {
        READER
    }

    fn read(&mut self) -> Result<Metrics> {
        parse_meminfo(&read_interface(&self.meminfo)?)
    }
}

pub fn parse_meminfo(content: &str) -> Result<Metrics> {
    let mut total = None;
    let mut available = None;

    for line in content.lines() {
        if line.starts_with("MemTotal") {
            total = Some(parse_kb(line)?);
        }
        if line.starts_with("MemAvailable") {
            available = Some(parse_kb(line)?);
        }
    }

    let total = total.ok_or_else(|| SensorError::malformed(READER, "missing MemTotal"))?;
    let available =
        available.ok_or_else(|| SensorError::malformed(READER, "missing MemAvailable"))?;

    let used = total
        .checked_sub(available)
        .ok_or_else(|| SensorError::malformed(READER, "MemTotal - MemAvailable overflows"))?;

    let mut metrics = Metrics::new();
    metrics.insert("mem_available".to_string(), MetricValue::Int(available));
    metrics.insert("mem_used".to_string(), MetricValue::Int(used));
    Ok(metrics)
}

fn parse_kb(line: &str) -> Result<i64> {
    line.split_whitespace()
        .nth(1)
        .and_then(|token| token.parse::<i64>().ok())
        .ok_or_else(|| SensorError::malformed(READER, format!("no value in {:?}", line)))
}

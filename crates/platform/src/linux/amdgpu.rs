use std::path::PathBuf;

use hardmon_protocol::{MetricValue, Metrics};

use crate::error::{read_interface, Result, SensorError};
use crate::paths::SensorPaths;
use crate::source::MetricSource;

const READER: &str = "amdgpu";

/// Labelled lines recognized anywhere in the dump, by prefix.
const LABELLED_METRICS: [(&str, &str); 3] = [
    ("GPU Temperature", "gpu_temp"),
    ("GPU Load", "gpu_load"),
    ("MEM Load", "vram_load"),
];

/// Reads the amdgpu power-management debugfs dump.
#[derive(Debug, Clone)]
pub struct AmdGpuReader {
    pm_info: PathBuf,
}

impl AmdGpuReader {
    pub fn new(paths: &SensorPaths) -> Self {
        Self {
            pm_info: paths.amdgpu_pm_info.clone(),
        }
    }
}

impl MetricSource for AmdGpuReader {
    fn name(&self) -> &'static str {
        READER
    }

    fn read(&mut self) -> Result<Metrics> {
        parse_pm_info(&read_interface(&self.pm_info)?)
    }
}

/// Parse an `amdgpu_pm_info` dump.
///
/// Indented `<value> <unit> (<label>)` lines in the leading clocks section
/// become `<label>` → `"<value> <unit>"`. The section ends at the first
/// empty line and is never re-entered.
pub fn parse_pm_info(content: &str) -> Result<Metrics> {
    let mut metrics = Metrics::new();
    let mut in_clocks_section = true;

    for line in content.lines() {
        if line.is_empty() {
            in_clocks_section = false;
        }

        if in_clocks_section && line.starts_with(char::is_whitespace) {
            let (key, value) = parse_clock_line(line)?;
            metrics.insert(key, MetricValue::Text(value));
        }

        for (prefix, key) in LABELLED_METRICS {
            if line.starts_with(prefix) {
                let value = line.split(':').nth(1).ok_or_else(|| {
                    SensorError::malformed(READER, format!("missing ':' in {:?}", line))
                })?;
                metrics.insert(key.to_string(), MetricValue::Text(value.trim().to_string()));
            }
        }
    }

    Ok(metrics)
}

fn parse_clock_line(line: &str) -> Result<(String, String)> {
    let malformed = || SensorError::malformed(READER, format!("bad clock line {:?}", line));

    let rest = line.trim_start();
    let (value, rest) = rest.split_once(char::is_whitespace).ok_or_else(malformed)?;
    let rest = rest.trim_start();
    let (unit, label) = rest.split_once(char::is_whitespace).ok_or_else(malformed)?;
    let label = label.trim().trim_matches(|c| c == '(' || c == ')');

    if label.is_empty() {
        return Err(malformed());
    }

    let key = label.replace(' ', "_").to_lowercase();
    Ok((key, format!("{} {}", value, unit)))
}

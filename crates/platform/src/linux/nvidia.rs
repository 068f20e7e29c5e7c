use std::path::PathBuf;
use std::process::Command;

use hardmon_protocol::{MetricValue, Metrics};

use crate::error::{Result, SensorError};
use crate::source::MetricSource;

const READER: &str = "nvidia";

/// Query fields, in request order, and the metric key each one is reported
/// under.
pub const QUERY_FIELDS: [(&str, &str); 8] = [
    ("clocks.current.graphics", "clocks.gpu.graphics"),
    ("clocks.current.memory", "clocks.gpu.memory"),
    ("temperature.gpu", "gpu_temp"),
    ("utilization.gpu", "gpu_load"),
    ("utilization.memory", "vram_load"),
    ("power.draw", "average_gpu"),
    ("memory.used", "vram_used"),
    ("memory.total", "vram_total"),
];

/// Queries `nvidia-smi` once per read.
///
/// Without a resolved tool the reader reports no metrics at all.
#[derive(Debug, Clone)]
pub struct NvidiaReader {
    tool: Option<PathBuf>,
}

impl NvidiaReader {
    pub fn new(tool: Option<PathBuf>) -> Self {
        Self { tool }
    }

    fn query_arg() -> String {
        let fields: Vec<&str> = QUERY_FIELDS.iter().map(|(field, _)| *field).collect();
        format!("--query-gpu={}", fields.join(","))
    }
}

impl MetricSource for NvidiaReader {
    fn name(&self) -> &'static str {
        READER
    }

    fn read(&mut self) -> Result<Metrics> {
        let Some(tool) = &self.tool else {
            return Ok(Metrics::new());
        };

        let tool_error = |detail: String| SensorError::Tool {
            tool: tool.display().to_string(),
            detail,
        };

        let output = Command::new(tool)
            .arg(Self::query_arg())
            .arg("--format=csv")
            .output()
            .map_err(|e| tool_error(e.to_string()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(tool_error(format!("{}: {}", output.status, stderr.trim())));
        }

        parse_query_output(&String::from_utf8_lossy(&output.stdout))
    }
}

/// Map CSV query output onto metric keys.
///
/// The header must list the requested fields in order (units in brackets
/// are ignored); anything else means the columns cannot be trusted. Only the
/// first data row is used. Values are kept verbatim, surrounding whitespace
/// and units included.
pub fn parse_query_output(output: &str) -> Result<Metrics> {
    let mut lines = output.lines();

    let header = lines
        .next()
        .ok_or_else(|| SensorError::malformed(READER, "empty query output"))?;
    check_header(header)?;

    let row = lines
        .find(|line| !line.trim().is_empty())
        .ok_or_else(|| SensorError::malformed(READER, "no data row"))?;

    let values: Vec<&str> = row.split(',').collect();
    if values.len() != QUERY_FIELDS.len() {
        return Err(SensorError::malformed(
            READER,
            format!(
                "expected {} columns, got {} in {:?}",
                QUERY_FIELDS.len(),
                values.len(),
                row
            ),
        ));
    }

    Ok(QUERY_FIELDS
        .iter()
        .zip(values)
        .map(|((_, key), value)| (key.to_string(), MetricValue::Text(value.to_string())))
        .collect())
}

fn check_header(header: &str) -> Result<()> {
    let columns: Vec<&str> = header
        .split(',')
        .map(|column| column.split(" [").next().unwrap_or(column).trim())
        .collect();

    let expected = QUERY_FIELDS.iter().map(|(field, _)| *field);
    if columns.len() != QUERY_FIELDS.len() || !columns.iter().copied().eq(expected) {
        return Err(SensorError::malformed(
            READER,
            format!("unexpected header {:?}", header),
        ));
    }
    Ok(())
}

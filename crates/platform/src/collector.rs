use hardmon_protocol::{MetricRecord, Metrics};
use tracing::{debug, info, trace, warn};

use crate::capabilities::HardwareCapabilities;
use crate::energy::EnergyCounter;
use crate::error::{Result, SensorError};
use crate::linux::{AmdGpuReader, CpuReader, MemoryReader, NvidiaReader};
use crate::paths::SensorPaths;
use crate::source::MetricSource;

/// Samples every applicable reader and merges the results into one record.
///
/// Construction performs capability detection once; readers for hardware
/// that was not found are never built. The collector owns the energy
/// counter used for `cpu_power`, so it must stay on a single thread.
pub struct Collector {
    capabilities: HardwareCapabilities,
    gpu_sources: Vec<Box<dyn MetricSource>>,
    cpu: CpuReader,
    memory: MemoryReader,
    energy: EnergyCounter,
}

impl Collector {
    /// Detect hardware and build the readers.
    ///
    /// Fails if any of the CPU or memory baseline interfaces is missing.
    pub fn new(paths: &SensorPaths) -> Result<Self> {
        let capabilities = HardwareCapabilities::detect(paths);
        Self::with_capabilities(paths, capabilities)
    }

    pub fn with_capabilities(
        paths: &SensorPaths,
        capabilities: HardwareCapabilities,
    ) -> Result<Self> {
        for path in paths.required() {
            if !path.exists() {
                return Err(SensorError::MissingInterface { path: path.clone() });
            }
        }

        let mut gpu_sources: Vec<Box<dyn MetricSource>> = Vec::new();
        if capabilities.amd_gpu {
            gpu_sources.push(Box::new(AmdGpuReader::new(paths)));
        }
        if capabilities.nvidia_gpu {
            if capabilities.nvidia_tool.is_none() {
                info!(
                    tool = %paths.nvidia_tool.display(),
                    "NVIDIA device present but query tool not found, skipping GPU metrics"
                );
            }
            gpu_sources.push(Box::new(NvidiaReader::new(capabilities.nvidia_tool.clone())));
        }
        if !capabilities.powercap {
            info!(path = %paths.energy.display(), "No power-capping interface, cpu_power disabled");
        }

        debug!(
            amd_gpu = capabilities.amd_gpu,
            nvidia_gpu = capabilities.nvidia_gpu,
            powercap = capabilities.powercap,
            "Collector initialized"
        );

        Ok(Self {
            cpu: CpuReader::new(paths, capabilities.powercap),
            memory: MemoryReader::new(paths),
            capabilities,
            gpu_sources,
            energy: EnergyCounter::new(),
        })
    }

    pub fn capabilities(&self) -> &HardwareCapabilities {
        &self.capabilities
    }

    /// Collect one record stamped with the current time.
    pub fn collect(&mut self) -> Result<MetricRecord> {
        self.collect_into(MetricRecord::now())
    }

    /// Collect one record with an explicit timestamp.
    pub fn collect_at(&mut self, time: i64) -> Result<MetricRecord> {
        self.collect_into(MetricRecord::new(time))
    }

    // GPU sources merge first so CPU and memory keys win any collision.
    fn collect_into(&mut self, mut record: MetricRecord) -> Result<MetricRecord> {
        for source in &mut self.gpu_sources {
            let result = source.read();
            merge_output(&mut record, source.name(), result)?;
        }

        let cpu = self.cpu.read(&mut self.energy);
        merge_output(&mut record, self.cpu.name(), cpu)?;

        let memory = self.memory.read();
        merge_output(&mut record, self.memory.name(), memory)?;

        trace!(metrics = record.len(), "Collected sample");
        Ok(record)
    }
}

fn merge_output(record: &mut MetricRecord, reader: &str, result: Result<Metrics>) -> Result<()> {
    match result {
        Ok(metrics) => {
            record.merge(metrics);
            Ok(())
        }
        Err(e) if e.is_soft() => {
            warn!(reader, error = %e, "Dropping reader output for this tick");
            Ok(())
        }
        Err(e) => Err(e),
    }
}

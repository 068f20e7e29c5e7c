use std::path::PathBuf;

use serde::{Deserialize, Serialize};

const CPUINFO_PATH: &str = "/proc/cpuinfo";
const LOADAVG_PATH: &str = "/proc/loadavg";
const MEMINFO_PATH: &str = "/proc/meminfo";
const CPU_TEMP_PATH: &str = "/sys/class/hwmon/hwmon1/temp1_input";
const RAPL_ENERGY_PATH: &str = "/sys/class/powercap/intel-rapl/intel-rapl:0/energy_uj";
const AMDGPU_PM_INFO_PATH: &str = "/sys/kernel/debug/dri/0/amdgpu_pm_info";
const NVIDIA_DEVICE_PATH: &str = "/dev/nvidia0";
const NVIDIA_TOOL: &str = "nvidia-smi";

/// Locations of every interface the readers touch.
///
/// The defaults match a typical single-socket Linux machine. The hwmon index
/// and RAPL socket differ between machines, so all of these can be
/// overridden from the `[sensors]` table of the config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SensorPaths {
    pub cpuinfo: PathBuf,
    pub loadavg: PathBuf,
    pub meminfo: PathBuf,
    /// hwmon input reporting millidegrees Celsius.
    pub cpu_temp: PathBuf,
    /// Cumulative RAPL package energy in microjoules.
    pub energy: PathBuf,
    pub amdgpu_pm_info: PathBuf,
    /// Only tested for existence.
    pub nvidia_device: PathBuf,
    /// Bare names are looked up on `PATH`.
    pub nvidia_tool: PathBuf,
}

impl Default for SensorPaths {
    fn default() -> Self {
        Self {
            cpuinfo: PathBuf::from(CPUINFO_PATH),
            loadavg: PathBuf::from(LOADAVG_PATH),
            meminfo: PathBuf::from(MEMINFO_PATH),
            cpu_temp: PathBuf::from(CPU_TEMP_PATH),
            energy: PathBuf::from(RAPL_ENERGY_PATH),
            amdgpu_pm_info: PathBuf::from(AMDGPU_PM_INFO_PATH),
            nvidia_device: PathBuf::from(NVIDIA_DEVICE_PATH),
            nvidia_tool: PathBuf::from(NVIDIA_TOOL),
        }
    }
}

impl SensorPaths {
    /// Interfaces that must exist for the sampler to start at all.
    pub fn required(&self) -> [&PathBuf; 4] {
        [&self.cpuinfo, &self.loadavg, &self.meminfo, &self.cpu_temp]
    }
}

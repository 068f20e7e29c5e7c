//! Readers for Linux `/proc` and `/sys` interfaces and the NVIDIA query tool.

mod amdgpu;
mod cpu;
mod memory;
mod nvidia;

pub use amdgpu::{parse_pm_info, AmdGpuReader};
pub use cpu::{parse_cpuinfo, parse_loadavg, parse_temperature, CpuReader};
pub use memory::{parse_meminfo, MemoryReader};
pub use nvidia::{parse_query_output, NvidiaReader, QUERY_FIELDS};

//! Hardware metric sources for hardmon.
//!
//! Each reader turns one loosely structured operating-system interface
//! (`/proc` and `/sys` pseudo-files, the `nvidia-smi` CSV query output) into
//! a flat [`Metrics`] map. The [`Collector`] detects which readers apply
//! once at startup and merges their output into a [`MetricRecord`] per tick.
//!
//! # Example
//!
//! ```ignore
//! use hardmon_platform::{Collector, SensorPaths};
//!
//! let mut collector = Collector::new(&SensorPaths::default())?;
//! let record = collector.collect()?;
//! println!("{}", record.to_json()?);
//! ```

mod capabilities;
mod collector;
mod energy;
mod error;
mod paths;
mod source;

pub mod linux;

pub use capabilities::{resolve_tool, HardwareCapabilities};
pub use collector::Collector;
pub use energy::EnergyCounter;
pub use error::{Result, SensorError};
pub use paths::SensorPaths;
pub use source::MetricSource;

pub use hardmon_protocol::{MetricRecord, MetricValue, Metrics};

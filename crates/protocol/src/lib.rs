//! Normalized record types shared by the hardmon collector, the emission
//! loop and the history store.

mod record;
mod value;

pub use record::{MetricRecord, Metrics, TIME_KEY};
pub use value::MetricValue;

pub mod history_store;
pub mod report;

pub use history_store::{window_start, HistoryStore, WindowAverage};

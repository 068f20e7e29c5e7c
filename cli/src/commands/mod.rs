pub mod config;
pub mod debug;
pub mod history;
pub mod ingest;
pub mod logs;
pub mod pipe;

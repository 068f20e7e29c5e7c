use std::io::{self, BufRead};

use color_eyre::eyre::Result;
use hardmon_protocol::MetricRecord;
use tracing::{debug, warn};

use crate::config::UserConfig;
use crate::data::HistoryStore;

/// Persist records piped in from `hardmon pipe` (or anything emitting the
/// same line format).
pub fn run(config: &UserConfig) -> Result<()> {
    let store = HistoryStore::open(&config.history.database_path())?;
    let stored = ingest(&store, io::stdin().lock())?;
    debug!(stored, "Input closed");
    Ok(())
}

/// Store every parseable line from `input`, returning how many were stored.
pub fn ingest(store: &HistoryStore, input: impl BufRead) -> Result<usize> {
    let mut stored = 0;

    for (number, line) in input.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match MetricRecord::from_json(line) {
            Ok(record) => {
                store.record(&record)?;
                stored += 1;
            }
            Err(e) => warn!(line = number + 1, error = %e, "Skipping unparseable record"),
        }
    }

    Ok(stored)
}

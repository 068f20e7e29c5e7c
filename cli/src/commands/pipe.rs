use std::io::{self, Write};
use std::time::Duration;

use color_eyre::eyre::Result;
use hardmon_platform::Collector;
use tracing::{debug, error, info};

use crate::config::UserConfig;
use crate::data::HistoryStore;

pub fn run(
    config: &UserConfig,
    samples: u32,
    interval_ms: Option<u64>,
    pretty: bool,
    record: bool,
) -> Result<()> {
    let interval = Duration::from_millis(interval_ms.unwrap_or(config.interval_ms));
    let mut collector = Collector::new(&config.sensors)?;

    let store = if record {
        let path = config.history.database_path();
        info!(path = %path.display(), "Recording samples");
        Some(HistoryStore::open(&path)?)
    } else {
        None
    };

    debug!(interval_ms = interval.as_millis() as u64, samples, "Starting sampler");

    let stdout = io::stdout();
    let mut budget = SampleBudget::new(samples);

    loop {
        let sample = collector.collect()?;

        let line = if pretty {
            sample.to_json_pretty()?
        } else {
            sample.to_json()?
        };

        {
            let mut out = stdout.lock();
            writeln!(out, "{}", line)?;
            out.flush()?;
        }

        if let Some(store) = &store {
            if let Err(e) = store.record(&sample) {
                error!(error = %e, "Failed to persist sample");
            }
        }

        if budget.spend() {
            break;
        }

        std::thread::sleep(interval);
    }

    Ok(())
}

/// Emissions left before the loop stops; unbounded when started with zero.
struct SampleBudget(Option<u32>);

impl SampleBudget {
    fn new(samples: u32) -> Self {
        Self((samples > 0).then_some(samples))
    }

    /// Count one emission and report whether the budget is used up.
    fn spend(&mut self) -> bool {
        match &mut self.0 {
            Some(left) => {
                *left = left.saturating_sub(1);
                *left == 0
            }
            None => false,
        }
    }
}

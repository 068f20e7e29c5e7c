use std::io::{self, Write};

use chrono::{Local, TimeZone, Utc};
use color_eyre::eyre::{eyre, Result};

use crate::cli::HistoryCommands;
use crate::config::UserConfig;
use crate::data::{report, window_start, HistoryStore};

pub fn run(config: &UserConfig, command: Option<HistoryCommands>) -> Result<()> {
    let cmd = command.unwrap_or(HistoryCommands::Averages {
        windows: Vec::new(),
        json: false,
    });

    let path = config.history.database_path();
    if !path.exists() {
        println!("No history database at {}", path.display());
        println!("\nRecord samples first:");
        println!("  hardmon pipe --record");
        return Ok(());
    }

    let store = HistoryStore::open(&path)?;

    match cmd {
        HistoryCommands::Averages { windows, json } => {
            let windows = if windows.is_empty() {
                config.history.windows.clone()
            } else {
                windows
            };
            let durations = report::parse_windows(&windows)
                .map_err(|e| eyre!("invalid window in {:?}: {}", windows, e))?;

            let rows = store.windowed_average(&durations)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&rows)?);
                return Ok(());
            }

            let now_label = Local::now().format("%Y%m%d %H%M%S ").to_string();

            for line in report::render(&now_label, &rows) {
                println!("{}", line);
            }
        }
        HistoryCommands::Export { since } => {
            let now = Utc::now().timestamp();
            let from = match since {
                Some(window) => {
                    let window = humantime::parse_duration(&window)
                        .map_err(|e| eyre!("invalid window {:?}: {}", window, e))?;
                    window_start(now, window)
                }
                None => 0,
            };

            let stdout = io::stdout();
            let mut out = stdout.lock();
            for sample in store.get_samples(from, now)? {
                writeln!(out, "{}", sample.data)?;
            }
        }
        HistoryCommands::Stats => {
            let stats = store.get_stats()?;

            println!("History Database");
            println!("{}", "=".repeat(50));
            if let Some(db_path) = store.path() {
                println!("Path:          {}", db_path.display());
            }
            println!("Size:          {}", stats.size_formatted());
            println!("Samples:       {}", stats.sample_count);
            println!("Oldest sample: {}", format_timestamp(stats.oldest_sample));
            println!("Newest sample: {}", format_timestamp(stats.newest_sample));
        }
    }

    Ok(())
}

fn format_timestamp(timestamp: Option<i64>) -> String {
    timestamp
        .and_then(|ts| Local.timestamp_opt(ts, 0).single())
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| "-".to_string())
}

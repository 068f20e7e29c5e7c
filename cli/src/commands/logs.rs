use std::os::unix::process::CommandExt;
use std::path::PathBuf;

use color_eyre::eyre::Result;

use crate::config;
use crate::logging::LOG_FILE_PREFIX;

pub fn run(lines: usize, follow: bool) -> Result<()> {
    let log_dir = config::runtime_dir();

    let Some(path) = newest_log_file(&log_dir) else {
        println!("No log files found in {:?}", log_dir);
        println!("Set log_to_file = true in the config to write them.");
        return Ok(());
    };

    if follow {
        let err = std::process::Command::new("tail")
            .args(["-f", "-n", &lines.to_string()])
            .arg(&path)
            .exec();
        return Err(err.into());
    }

    let content = std::fs::read_to_string(&path)?;
    for line in last_lines(&content, lines) {
        println!("{}", line);
    }

    Ok(())
}

/// Daily-rotated files sort by date suffix, so the last name is the newest.
fn newest_log_file(log_dir: &std::path::Path) -> Option<PathBuf> {
    let prefix = format!("{}.", LOG_FILE_PREFIX);

    std::fs::read_dir(log_dir)
        .ok()?
        .filter_map(|e| e.ok())
        .filter(|e| {
            let name = e.file_name();
            let name = name.to_string_lossy();
            name.starts_with(&prefix) && name.ends_with(".log")
        })
        .map(|e| e.path())
        .max()
}

fn last_lines(content: &str, count: usize) -> Vec<&str> {
    let lines: Vec<&str> = content.lines().collect();
    let start = lines.len().saturating_sub(count);
    lines[start..].to_vec()
}

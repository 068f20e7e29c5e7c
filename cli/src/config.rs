use std::fs;
use std::path::PathBuf;

use hardmon_platform::SensorPaths;
use serde::{Deserialize, Serialize};
use tracing::Level;

const APP_DIR: &str = "hardmon";
const DATABASE_NAME: &str = "history.db";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Off,
    Error,
    #[default]
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "off" => LogLevel::Off,
            "error" => LogLevel::Error,
            "info" => LogLevel::Info,
            "debug" => LogLevel::Debug,
            "trace" => LogLevel::Trace,
            _ => LogLevel::Warn,
        }
    }

    pub fn as_tracing_level(&self) -> Option<Level> {
        match self {
            LogLevel::Off => None,
            LogLevel::Error => Some(Level::ERROR),
            LogLevel::Warn => Some(Level::WARN),
            LogLevel::Info => Some(Level::INFO),
            LogLevel::Debug => Some(Level::DEBUG),
            LogLevel::Trace => Some(Level::TRACE),
        }
    }
}

fn default_windows() -> Vec<String> {
    ["1m", "5m", "15m", "1h"]
        .iter()
        .map(|w| w.to_string())
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Overrides the database location under the data directory.
    pub database_path: Option<PathBuf>,
    /// Report windows as humantime durations ("5m", "1h").
    pub windows: Vec<String>,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            database_path: None,
            windows: default_windows(),
        }
    }
}

impl HistoryConfig {
    pub fn database_path(&self) -> PathBuf {
        self.database_path
            .clone()
            .unwrap_or_else(|| data_dir().join(DATABASE_NAME))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserConfig {
    pub log_level: LogLevel,
    pub log_to_file: bool,
    pub interval_ms: u64,
    pub sensors: SensorPaths,
    pub history: HistoryConfig,
}

impl Default for UserConfig {
    fn default() -> Self {
        Self {
            log_level: LogLevel::default(),
            log_to_file: false,
            interval_ms: 1000,
            sensors: SensorPaths::default(),
            history: HistoryConfig::default(),
        }
    }
}

pub fn config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("~/.config"))
        .join(APP_DIR)
}

pub fn data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("~/.local/share"))
        .join(APP_DIR)
}

pub fn runtime_dir() -> PathBuf {
    dirs::runtime_dir()
        .or_else(dirs::cache_dir)
        .unwrap_or_else(|| PathBuf::from("/tmp"))
        .join(APP_DIR)
}

pub fn config_path() -> PathBuf {
    config_dir().join("config.toml")
}

pub fn ensure_dirs() -> std::io::Result<()> {
    fs::create_dir_all(config_dir())?;
    Ok(())
}

impl UserConfig {
    pub fn load() -> Self {
        let path = config_path();
        if !path.exists() {
            return Self::default();
        }

        match fs::read_to_string(&path) {
            Ok(content) => Self::parse(&content),
            Err(_) => Self::default(),
        }
    }

    /// Parse config text, falling back to defaults when it is invalid.
    pub fn parse(content: &str) -> Self {
        toml::from_str(content).unwrap_or_default()
    }

    pub fn save(&self) -> std::io::Result<()> {
        let _ = ensure_dirs();
        let path = config_path();
        let content = toml::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))?;
        fs::write(path, content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config = UserConfig::parse(
            r#"
            interval_ms = 2000

            [sensors]
            cpu_temp = "/sys/class/hwmon/hwmon3/temp1_input"
            "#,
        );

        assert_eq!(config.interval_ms, 2000);
        assert_eq!(
            config.sensors.cpu_temp,
            PathBuf::from("/sys/class/hwmon/hwmon3/temp1_input")
        );
        assert_eq!(config.sensors.meminfo, PathBuf::from("/proc/meminfo"));
        assert_eq!(config.history, HistoryConfig::default());
        assert_eq!(config.log_level, LogLevel::Warn);
    }

    #[test]
    fn test_invalid_config_falls_back() {
        assert_eq!(UserConfig::parse("interval_ms = \"soon\""), UserConfig::default());
    }

    #[test]
    fn test_config_round_trips_through_toml() {
        let config = UserConfig {
            log_level: LogLevel::Debug,
            log_to_file: true,
            ..UserConfig::default()
        };
        let text = toml::to_string_pretty(&config).unwrap();
        assert_eq!(UserConfig::parse(&text), config);
    }

    #[test]
    fn test_log_level_from_str() {
        assert_eq!(LogLevel::from_str("TRACE"), LogLevel::Trace);
        assert_eq!(LogLevel::from_str("off"), LogLevel::Off);
        assert_eq!(LogLevel::from_str("bogus"), LogLevel::Warn);
        assert_eq!(LogLevel::Off.as_tracing_level(), None);
    }
}

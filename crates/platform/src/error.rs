use std::fs;
use std::path::{Path, PathBuf};

/// Errors produced while reading hardware interfaces.
#[derive(Debug, thiserror::Error)]
pub enum SensorError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("required interface {} is missing", path.display())]
    MissingInterface { path: PathBuf },

    #[error("malformed {reader} data: {detail}")]
    Malformed { reader: &'static str, detail: String },

    #[error("{tool} failed: {detail}")]
    Tool { tool: String, detail: String },
}

pub type Result<T> = std::result::Result<T, SensorError>;

impl SensorError {
    pub fn malformed(reader: &'static str, detail: impl Into<String>) -> Self {
        SensorError::Malformed {
            reader,
            detail: detail.into(),
        }
    }

    /// Whether the failure is confined to one reader for one tick.
    ///
    /// Unreadable or missing interfaces are fatal; bad output is not.
    pub fn is_soft(&self) -> bool {
        matches!(self, SensorError::Malformed { .. } | SensorError::Tool { .. })
    }
}

pub(crate) fn read_interface(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|source| SensorError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_soft_failures() {
        assert!(SensorError::malformed("meminfo", "missing MemTotal").is_soft());
        assert!(SensorError::Tool {
            tool: "nvidia-smi".to_string(),
            detail: "exit status 9".to_string(),
        }
        .is_soft());
        assert!(!SensorError::MissingInterface {
            path: PathBuf::from("/proc/cpuinfo"),
        }
        .is_soft());
    }

    #[test]
    fn test_read_missing_interface() {
        let err = read_interface(Path::new("/nonexistent/hardmon/energy_uj")).unwrap_err();
        assert!(matches!(err, SensorError::Io { .. }));
        assert!(err.to_string().contains("/nonexistent/hardmon/energy_uj"));
    }
}

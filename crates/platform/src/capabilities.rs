use std::env;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use crate::paths::SensorPaths;

/// Hardware detected once at startup.
///
/// Readers for anything reported absent here are never constructed, so a
/// missing GPU never turns into an I/O error mid-run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HardwareCapabilities {
    pub amd_gpu: bool,
    pub nvidia_gpu: bool,
    pub powercap: bool,
    /// Resolved location of the NVIDIA query tool, if a device was found.
    pub nvidia_tool: Option<PathBuf>,
}

impl HardwareCapabilities {
    pub fn detect(paths: &SensorPaths) -> Self {
        let nvidia_gpu = paths.nvidia_device.exists();
        let nvidia_tool = if nvidia_gpu {
            resolve_tool(&paths.nvidia_tool)
        } else {
            None
        };

        Self {
            amd_gpu: paths.amdgpu_pm_info.exists(),
            nvidia_gpu,
            powercap: paths.energy.exists(),
            nvidia_tool,
        }
    }

    pub fn has_gpu(&self) -> bool {
        self.amd_gpu || self.nvidia_gpu
    }
}

/// Locate an executable.
///
/// A name containing a path separator is used as-is; a bare name is searched
/// for on `PATH`.
pub fn resolve_tool(tool: &Path) -> Option<PathBuf> {
    if tool.components().count() > 1 {
        return is_executable(tool).then(|| tool.to_path_buf());
    }
    let search_path = env::var_os("PATH")?;
    resolve_tool_in(tool, &search_path)
}

fn resolve_tool_in(tool: &Path, search_path: &OsStr) -> Option<PathBuf> {
    env::split_paths(search_path)
        .map(|dir| dir.join(tool))
        .find(|candidate| is_executable(candidate))
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    path.metadata()
        .map(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

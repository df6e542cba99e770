use std::path::{Path, PathBuf};
use std::process::Command;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use pep508_rs::{MarkerEnvironment, MarkerEnvironmentBuilder};

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("Failed to run `{}`", interpreter.display())]
    PythonSubcommandLaunch {
        interpreter: PathBuf,
        #[source]
        err: std::io::Error,
    },
    #[error("{message}:\n--- stdout:\n{stdout}\n--- stderr:\n{stderr}\n---")]
    PythonSubcommandOutput {
        message: String,
        stdout: String,
        stderr: String,
    },
    #[error("Failed to parse marker values from `{}`", path.display())]
    MarkersFile {
        path: PathBuf,
        #[source]
        err: serde_json::Error,
    },
    #[error("Invalid marker values: {0}")]
    InvalidMarkers(String),
    #[error("No Python interpreter found; searched for `python3` and `python` in `PATH`")]
    NoPython,
}

/// The raw values of the PEP 508 environment markers, as reported by an interpreter.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct MarkerValues {
    pub implementation_name: String,
    pub implementation_version: String,
    pub os_name: String,
    pub platform_machine: String,
    pub platform_python_implementation: String,
    pub platform_release: String,
    pub platform_system: String,
    pub platform_version: String,
    pub python_full_version: String,
    pub python_version: String,
    pub sys_platform: String,
}

impl MarkerValues {
    /// Convert the raw values into a [`MarkerEnvironment`] against which markers can be evaluated.
    pub fn to_marker_environment(&self) -> Result<MarkerEnvironment, Error> {
        MarkerEnvironment::try_from(MarkerEnvironmentBuilder {
            implementation_name: &self.implementation_name,
            implementation_version: &self.implementation_version,
            os_name: &self.os_name,
            platform_machine: &self.platform_machine,
            platform_python_implementation: &self.platform_python_implementation,
            platform_release: &self.platform_release,
            platform_system: &self.platform_system,
            platform_version: &self.platform_version,
            python_full_version: &self.python_full_version,
            python_version: &self.python_version,
            sys_platform: &self.sys_platform,
        })
        .map_err(|err| Error::InvalidMarkers(err.to_string()))
    }
}

/// Return the [`MarkerEnvironment`] of the given Python executable.
pub fn query_markers(interpreter: &Path) -> Result<MarkerEnvironment, Error> {
    debug!("Detecting markers for: {}", interpreter.display());
    let output = Command::new(interpreter)
        .args(["-c", CAPTURE_MARKERS_SCRIPT])
        .output()
        .map_err(|err| Error::PythonSubcommandLaunch {
            interpreter: interpreter.to_path_buf(),
            err,
        })?;

    if !output.status.success() {
        return Err(Error::PythonSubcommandOutput {
            message: format!(
                "Querying Python at `{}` failed with {}",
                interpreter.display(),
                output.status,
            ),
            stdout: String::from_utf8_lossy(&output.stdout).trim().to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    let values = serde_json::from_slice::<MarkerValues>(&output.stdout).map_err(|err| {
        Error::PythonSubcommandOutput {
            message: format!(
                "Querying Python at `{}` did not return the expected data: {err}",
                interpreter.display(),
            ),
            stdout: String::from_utf8_lossy(&output.stdout).trim().to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        }
    })?;
    values.to_marker_environment()
}

/// Read a [`MarkerEnvironment`] from a JSON file in the format printed by the capture script.
pub fn read_markers(path: &Path) -> Result<MarkerEnvironment, Error> {
    let contents = fs_err::read(path)?;
    let values =
        serde_json::from_slice::<MarkerValues>(&contents).map_err(|err| Error::MarkersFile {
            path: path.to_path_buf(),
            err,
        })?;
    values.to_marker_environment()
}

/// Find a Python interpreter on the `PATH`.
pub fn find_python() -> Result<PathBuf, Error> {
    ["python3", "python"]
        .into_iter()
        .find_map(|name| which::which(name).ok())
        .ok_or(Error::NoPython)
}

/// The path to the Python executable inside a virtual environment.
pub fn venv_python(root: &Path) -> PathBuf {
    if cfg!(windows) {
        root.join("Scripts").join("python.exe")
    } else {
        root.join("bin").join("python")
    }
}

const CAPTURE_MARKERS_SCRIPT: &str = "
import json
import os
import platform
import sys

def format_full_version(info):
    version = '{0.major}.{0.minor}.{0.micro}'.format(info)
    kind = info.releaselevel
    if kind != 'final':
        version += kind[0] + str(info.serial)
    return version

json.dump({
    'implementation_name': sys.implementation.name,
    'implementation_version': format_full_version(sys.implementation.version),
    'os_name': os.name,
    'platform_machine': platform.machine(),
    'platform_python_implementation': platform.python_implementation(),
    'platform_release': platform.release(),
    'platform_system': platform.system(),
    'platform_version': platform.version(),
    'python_full_version': platform.python_version(),
    'python_version': '.'.join(platform.python_version_tuple()[:2]),
    'sys_platform': sys.platform,
}, sys.stdout)
sys.stdout.flush()
";

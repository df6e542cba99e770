use std::path::{Path, PathBuf};
use std::process::ExitStatus;

use thiserror::Error;

pub use pip::PipInstaller;
pub use reinstall::ReinstallSignal;
pub use strategy::{InstallContext, InstallOutcome, InstallStrategy};

mod pip;
mod reinstall;
mod strategy;

#[derive(Debug, Error)]
pub enum InstallError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("Failed to run `{}`", python.display())]
    Launch {
        python: PathBuf,
        #[source]
        err: std::io::Error,
    },
    #[error("`pip install {args}` failed with {status}\n--- stdout:\n{stdout}\n--- stderr:\n{stderr}\n---")]
    Failed {
        args: String,
        status: ExitStatus,
        stdout: String,
        stderr: String,
    },
}

/// Installs requirements into a Python environment.
pub trait Installer {
    /// Run the installer with the given arguments (options, requirements, or local paths) using
    /// the environment's interpreter.
    fn install(&self, python: &Path, args: &[String]) -> Result<(), InstallError>;
}

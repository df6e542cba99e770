//! Install the minimum permitted versions of a package's dependencies into test environments.
//!
//! The [`MinVersionsPlugin`] hooks into a [`Host`]'s environment setup: it switches the package
//! install to `--no-deps`, then reads the package's `PKG-INFO` and installs each dependency pinned
//! to the lower bound of its version specifier.

use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

use minversions_installer::InstallError;
use minversions_metadata::MetadataError;
use minversions_resolver::ResolveError;

pub use env::{RunOptions, TestEnv};
pub use host::Host;
pub use plugin::{MinVersionsPlugin, Plugin};

mod env;
mod host;
mod plugin;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("No package to install into `{0}`; pass `--package` or set `TOX_PACKAGE`")]
    MissingPackage(String),

    #[error("Failed to read the metadata of `{}`", package.display())]
    Extract {
        package: PathBuf,
        #[source]
        err: minversions_extract::Error,
    },

    #[error(transparent)]
    Metadata(#[from] MetadataError),

    #[error(transparent)]
    Interpreter(#[from] minversions_interpreter::Error),

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    Install(#[from] InstallError),

    #[error("Failed to create the environment at `{}`", root.display())]
    CreateEnvironment {
        root: PathBuf,
        #[source]
        err: std::io::Error,
    },

    #[error("`{} -m venv {}` failed with {status}:\n{stderr}", python.display(), root.display())]
    Venv {
        python: PathBuf,
        root: PathBuf,
        status: ExitStatus,
        stderr: String,
    },
}

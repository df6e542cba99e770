use std::collections::BTreeMap;
use std::path::PathBuf;

use pep508_rs::ExtraName;

use minversions_installer::{InstallContext, InstallStrategy};
use minversions_interpreter::venv_python;
use minversions_static::EnvVars;

/// Settings that apply to every environment in a run.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Whether minimum-version mode was requested for all environments.
    pub minversions: bool,
    /// The source distribution passed on the command line.
    pub package: Option<PathBuf>,
    /// The project directory, installed in develop mode.
    pub project: PathBuf,
    pub verbosity: u8,
}

/// A single test environment and its configuration.
#[derive(Debug, Clone)]
pub struct TestEnv {
    pub name: String,
    /// The environment directory.
    pub root: PathBuf,
    /// The interpreter the environment is created from.
    pub base_python: PathBuf,
    /// The environment's own interpreter.
    pub python: PathBuf,
    pub deps: Vec<String>,
    pub extras: Vec<ExtraName>,
    pub skip_install: bool,
    pub usedevelop: bool,
    /// Whether minimum-version mode was requested for this environment.
    pub minversions: bool,
    pub setenv: BTreeMap<String, String>,
    /// Set when the environment was created during this run.
    pub just_created: bool,
    pub strategy: InstallStrategy,
}

impl TestEnv {
    pub fn new(name: impl Into<String>, root: PathBuf, base_python: PathBuf) -> Self {
        Self {
            name: name.into(),
            python: venv_python(&root),
            root,
            base_python,
            deps: Vec::new(),
            extras: Vec::new(),
            skip_install: false,
            usedevelop: false,
            minversions: false,
            setenv: BTreeMap::new(),
            just_created: false,
            strategy: InstallStrategy::default(),
        }
    }

    /// The source distribution under test: `TOX_PACKAGE` from `setenv`, then from the process
    /// environment, then `--package`.
    pub fn package(&self, options: &RunOptions) -> Option<PathBuf> {
        self.setenv
            .get(EnvVars::TOX_PACKAGE)
            .map(PathBuf::from)
            .or_else(|| std::env::var_os(EnvVars::TOX_PACKAGE).map(PathBuf::from))
            .or_else(|| options.package.clone())
    }

    pub(crate) fn install_context(&self, verbosity: u8) -> InstallContext<'_> {
        InstallContext {
            env: &self.name,
            root: &self.root,
            python: &self.python,
            extras: &self.extras,
            just_created: self.just_created,
            verbosity,
        }
    }
}

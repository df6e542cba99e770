use pep508_rs::MarkerEnvironment;
use tracing::debug;

use minversions_diagnostics::Reporter;
use minversions_installer::{InstallStrategy, Installer};
use minversions_metadata::Headers;
use minversions_resolver::compute_install_set;

use crate::{Error, RunOptions, TestEnv};

/// Hooks called by the [`Host`](crate::Host) while it sets up an environment.
pub trait Plugin {
    fn name(&self) -> &str;

    /// Called once the environment's `deps` are installed, before the package is installed.
    fn install_deps(&self, _env: &mut TestEnv, _options: &RunOptions) {}

    /// Called once the package is installed, before any tests run.
    fn runtest_pre(
        &self,
        _env: &TestEnv,
        _options: &RunOptions,
        _installer: &dyn Installer,
        _reporter: &dyn Reporter,
    ) -> Result<(), Error> {
        Ok(())
    }
}

/// Installs the minimum permitted versions of the package's dependencies.
#[derive(Debug, Default, Clone)]
pub struct MinVersionsPlugin {
    /// Markers to evaluate requirements against, in place of querying the environment.
    markers: Option<MarkerEnvironment>,
}

impl MinVersionsPlugin {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_markers(self, markers: MarkerEnvironment) -> Self {
        Self {
            markers: Some(markers),
        }
    }

    fn enabled(env: &TestEnv, options: &RunOptions) -> bool {
        options.minversions || env.minversions
    }
}

impl Plugin for MinVersionsPlugin {
    fn name(&self) -> &str {
        "minversions"
    }

    fn install_deps(&self, env: &mut TestEnv, options: &RunOptions) {
        if env.skip_install || !Self::enabled(env, options) {
            return;
        }
        // The dependencies are installed separately, at their minimum versions.
        env.strategy = InstallStrategy::NoDeps;
    }

    fn runtest_pre(
        &self,
        env: &TestEnv,
        options: &RunOptions,
        installer: &dyn Installer,
        reporter: &dyn Reporter,
    ) -> Result<(), Error> {
        if env.skip_install || !Self::enabled(env, options) {
            return Ok(());
        }

        let package = env
            .package(options)
            .ok_or_else(|| Error::MissingPackage(env.name.clone()))?;
        let content =
            minversions_extract::read_pkg_info(&package).map_err(|err| Error::Extract {
                package: package.clone(),
                err,
            })?;
        let (metadata, _description) = Headers::parse(&content)?;
        debug!(
            "Read metadata for {} {}",
            metadata.get_first("Name").unwrap_or("<unknown>"),
            metadata.get_first("Version").unwrap_or("<unknown>"),
        );

        let markers = match &self.markers {
            Some(markers) => markers.clone(),
            None => minversions_interpreter::query_markers(&env.python)?,
        };

        let deps = compute_install_set(&metadata, &env.extras, &markers, reporter)?;
        if deps.is_empty() {
            return Ok(());
        }

        reporter.activity(&env.name, "install-minversions", &deps.join(","));
        installer.install(&env.python, &deps)?;

        Ok(())
    }
}

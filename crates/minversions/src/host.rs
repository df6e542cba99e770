use std::process::Command;

use tracing::{debug, info_span};

use minversions_diagnostics::Reporter;
use minversions_installer::{InstallOutcome, Installer};

use crate::{Error, Plugin, RunOptions, TestEnv};

/// Prepares test environments, calling each registered [`Plugin`] along the way.
pub struct Host {
    options: RunOptions,
    installer: Box<dyn Installer>,
    plugins: Vec<Box<dyn Plugin>>,
}

impl Host {
    pub fn new(options: RunOptions, installer: Box<dyn Installer>) -> Self {
        Self {
            options,
            installer,
            plugins: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_plugin(mut self, plugin: Box<dyn Plugin>) -> Self {
        self.plugins.push(plugin);
        self
    }

    pub fn options(&self) -> &RunOptions {
        &self.options
    }

    /// Create the environment if needed, then install its `deps` and the package under test.
    pub fn setup(&self, env: &mut TestEnv, reporter: &dyn Reporter) -> Result<(), Error> {
        let _span = info_span!("setup", env = %env.name).entered();

        if !env.python.exists() {
            self.create(env, reporter)?;
        }

        if env.just_created && !env.deps.is_empty() {
            reporter.activity(&env.name, "installdeps", &env.deps.join(", "));
            self.installer.install(&env.python, &env.deps)?;
        }

        for plugin in &self.plugins {
            debug!("Calling `install_deps` of `{}`", plugin.name());
            plugin.install_deps(env, &self.options);
        }

        if env.skip_install {
            debug!("Skipping package install for `{}`", env.name);
        } else {
            self.install_package(env, reporter)?;
        }

        for plugin in &self.plugins {
            debug!("Calling `runtest_pre` of `{}`", plugin.name());
            plugin.runtest_pre(env, &self.options, self.installer.as_ref(), reporter)?;
        }

        Ok(())
    }

    fn create(&self, env: &mut TestEnv, reporter: &dyn Reporter) -> Result<(), Error> {
        reporter.activity(&env.name, "create", &env.root.display().to_string());
        let output = Command::new(&env.base_python)
            .args(["-m", "venv"])
            .arg(&env.root)
            .output()
            .map_err(|err| Error::CreateEnvironment {
                root: env.root.clone(),
                err,
            })?;
        if !output.status.success() {
            return Err(Error::Venv {
                python: env.base_python.clone(),
                root: env.root.clone(),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        env.just_created = true;
        Ok(())
    }

    fn install_package(&self, env: &TestEnv, reporter: &dyn Reporter) -> Result<(), Error> {
        let target = if env.usedevelop {
            self.options.project.clone()
        } else {
            env.package(&self.options)
                .ok_or_else(|| Error::MissingPackage(env.name.clone()))?
        };

        let outcome = env.strategy.install_package(
            &env.install_context(self.options.verbosity),
            &target,
            env.usedevelop,
            self.installer.as_ref(),
            reporter,
        )?;
        if outcome == InstallOutcome::Unchanged {
            debug!("`{}` is up to date", target.display());
        }
        Ok(())
    }
}

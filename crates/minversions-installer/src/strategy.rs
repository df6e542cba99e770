use std::path::Path;

use itertools::Itertools;
use pep508_rs::ExtraName;
use tracing::debug;

use minversions_diagnostics::Reporter;

use crate::{InstallError, Installer, ReinstallSignal};

/// The most `-v` flags forwarded to the installer.
const MAX_INSTALLER_VERBOSITY: u8 = 3;

/// How the package under test is installed into its environment.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum InstallStrategy {
    /// Install the package along with its dependencies when the environment is fresh.
    #[default]
    Default,
    /// Never install dependencies alongside the package, as they're provided separately.
    NoDeps,
}

/// The environment the package is installed into.
#[derive(Debug, Clone, Copy)]
pub struct InstallContext<'a> {
    /// The environment name, used to label activities.
    pub env: &'a str,
    /// The environment directory, where the reinstall signal is kept.
    pub root: &'a Path,
    /// The environment's interpreter.
    pub python: &'a Path,
    pub extras: &'a [ExtraName],
    /// Whether the environment was created during this run.
    pub just_created: bool,
    pub verbosity: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallOutcome {
    Installed,
    /// A develop install whose project hasn't changed since it was last installed.
    Unchanged,
}

impl InstallStrategy {
    /// Install the package at `target` (an archive, or a project directory if `develop`).
    pub fn install_package(
        self,
        context: &InstallContext,
        target: &Path,
        develop: bool,
        installer: &dyn Installer,
        reporter: &dyn Reporter,
    ) -> Result<InstallOutcome, InstallError> {
        let signal = if develop {
            ReinstallSignal::from_project(context.root, target)?
        } else {
            ReinstallSignal::from_archive(context.root, target)?
        };

        let name = if develop { "develop-inst" } else { "inst" };
        let mut args = Vec::new();

        let activity = if context.just_created {
            args.push("--exists-action".to_string());
            args.push("w".to_string());
            match self {
                Self::Default => name.to_string(),
                Self::NoDeps => {
                    args.extend(no_deps_flags(develop));
                    format!("{name}-nodeps")
                }
            }
        } else {
            if develop && !signal.needs_reinstall()? {
                debug!("Skipping install of unchanged project: {}", target.display());
                reporter.activity(
                    context.env,
                    &format!("{name}-noop"),
                    &target.display().to_string(),
                );
                return Ok(InstallOutcome::Unchanged);
            }
            args.extend(no_deps_flags(develop));
            format!("{name}-nodeps")
        };

        let verbose = context
            .verbosity
            .saturating_sub(2)
            .min(MAX_INSTALLER_VERBOSITY);
        args.extend((0..verbose).map(|_| "-v".to_string()));

        let mut target_arg = target.display().to_string();
        if !context.extras.is_empty() {
            target_arg = format!("{target_arg}[{}]", context.extras.iter().join(","));
        }
        if develop {
            args.push("-e".to_string());
        }
        args.push(target_arg);

        reporter.activity(context.env, &activity, &target.display().to_string());
        installer.install(context.python, &args)?;
        signal.record()?;

        Ok(InstallOutcome::Installed)
    }
}

/// `--no-deps`, plus `-U` so that an archive replaces an installed copy of the same version.
fn no_deps_flags(develop: bool) -> impl Iterator<Item = String> {
    std::iter::once("--no-deps".to_string()).chain((!develop).then(|| "-U".to_string()))
}

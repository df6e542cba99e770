use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result, bail};
use pep508_rs::ExtraName;
use tracing::debug;

use minversions::{Host, MinVersionsPlugin, RunOptions, TestEnv};
use minversions_cli::RunArgs;
use minversions_installer::PipInstaller;
use minversions_interpreter::find_python;
use minversions_settings::{FilesystemOptions, Options};
use minversions_static::EnvVars;

use crate::commands::ExitStatus;
use crate::printer::Printer;
use crate::reporter::TerminalReporter;

/// Prepare the selected test environments.
pub(crate) fn run(
    args: RunArgs,
    config_file: Option<&Path>,
    verbosity: u8,
    printer: Printer,
) -> Result<ExitStatus> {
    let cwd = std::env::current_dir()?;
    let filesystem = match config_file {
        Some(path) => Some(FilesystemOptions::from_file(path)?),
        None => FilesystemOptions::find(&cwd)?,
    };
    let (options, root) = match filesystem {
        Some(filesystem) => {
            let root = filesystem.root().to_path_buf();
            (filesystem.into_options().relative_to(&root), root)
        }
        None => (Options::default(), cwd),
    };

    let names = if args.envs.is_empty() {
        options.env.keys().cloned().collect::<Vec<_>>()
    } else {
        args.envs
    };
    if names.is_empty() {
        bail!(
            "No environments to run; define one as `[env.<name>]` in `minversions.toml`, or pass `--env`"
        );
    }

    let run_options = RunOptions {
        minversions: args.minversions || options.minversions.unwrap_or(false),
        package: args.package.or_else(|| options.package.clone()),
        project: root.clone(),
        verbosity,
    };
    let host = Host::new(run_options, Box::new(PipInstaller::new()))
        .with_plugin(Box::new(MinVersionsPlugin::new()));
    let reporter = TerminalReporter::new(printer);

    for name in names {
        let mut env = test_env(&name, &options, &root)?;
        if args.recreate && env.root.exists() {
            debug!("Removing existing environment: {}", env.root.display());
            fs_err::remove_dir_all(&env.root)?;
        }
        host.setup(&mut env, &reporter)
            .with_context(|| format!("Failed to set up environment `{name}`"))?;
    }

    Ok(ExitStatus::Success)
}

/// Build a [`TestEnv`] from its settings.
fn test_env(name: &str, options: &Options, root: &Path) -> Result<TestEnv> {
    let settings = options.environment(name);

    let base_python = match settings.python.or_else(|| options.python.clone()) {
        Some(python) => python,
        None => match std::env::var_os(EnvVars::MINVERSIONS_PYTHON) {
            Some(python) => PathBuf::from(python),
            None => find_python()?,
        },
    };
    let envdir = settings
        .envdir
        .unwrap_or_else(|| root.join(".minversions").join(name));

    let extras = settings
        .extras
        .unwrap_or_default()
        .iter()
        .map(|extra| {
            ExtraName::from_str(extra)
                .with_context(|| format!("Invalid extra `{extra}` in environment `{name}`"))
        })
        .collect::<Result<Vec<_>>>()?;

    let mut env = TestEnv::new(name, envdir, base_python);
    env.deps = settings.deps.unwrap_or_default();
    env.extras = extras;
    env.skip_install = settings.skip_install.unwrap_or(false);
    env.usedevelop = settings.usedevelop.unwrap_or(false);
    env.minversions = settings.minversions.unwrap_or(false);
    env.setenv = settings.setenv.unwrap_or_default();
    Ok(env)
}

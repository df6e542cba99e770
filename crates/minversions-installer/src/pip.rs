use std::path::Path;
use std::process::Command;

use itertools::Itertools;
use tracing::debug;

use minversions_static::EnvVars;

use crate::{InstallError, Installer};

/// An [`Installer`] that runs `python -m pip install`.
#[derive(Debug, Default, Clone)]
pub struct PipInstaller {
    /// Extra options passed to every invocation, e.g. `--index-url`.
    options: Vec<String>,
}

impl PipInstaller {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pass the given options to every `pip install` invocation.
    #[must_use]
    pub fn with_options(self, options: Vec<String>) -> Self {
        Self { options }
    }

    fn command(&self, python: &Path, args: &[String]) -> Command {
        let mut command = Command::new(python);
        command
            .args(["-m", "pip", "install"])
            .args(&self.options)
            .args(args)
            .env(EnvVars::PIP_DISABLE_PIP_VERSION_CHECK, "1");
        // `<venv>/bin/python` -> `<venv>`
        if let Some(root) = python.parent().and_then(Path::parent) {
            command.env(EnvVars::VIRTUAL_ENV, root);
        }
        command
    }
}

impl Installer for PipInstaller {
    fn install(&self, python: &Path, args: &[String]) -> Result<(), InstallError> {
        debug!("Running `pip install {}`", args.iter().join(" "));
        let output = self
            .command(python, args)
            .output()
            .map_err(|err| InstallError::Launch {
                python: python.to_path_buf(),
                err,
            })?;

        if !output.status.success() {
            return Err(InstallError::Failed {
                args: args.iter().join(" "),
                status: output.status,
                stdout: String::from_utf8_lossy(&output.stdout).trim().to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::ffi::OsStr;
    use std::path::Path;

    use super::PipInstaller;

    #[test]
    fn command_line() {
        let installer = PipInstaller::new().with_options(vec![
            "--index-url".to_string(),
            "https://example.com/simple".to_string(),
        ]);
        let command = installer.command(
            Path::new("/envs/py312/bin/python"),
            &["--no-deps".to_string(), "demo-1.0.tar.gz".to_string()],
        );
        assert_eq!(command.get_program(), "/envs/py312/bin/python");
        assert_eq!(
            command.get_args().collect::<Vec<_>>(),
            vec![
                "-m",
                "pip",
                "install",
                "--index-url",
                "https://example.com/simple",
                "--no-deps",
                "demo-1.0.tar.gz",
            ]
        );
        assert!(
            command
                .get_envs()
                .any(|(key, value)| key == "VIRTUAL_ENV" && value == Some(OsStr::new("/envs/py312")))
        );
    }
}

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

/// A `pyproject.toml` with an (optional) `[tool.minversions]` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct PyProjectToml {
    pub(crate) tool: Option<Tools>,
}

/// A `[tool]` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct Tools {
    pub(crate) minversions: Option<Options>,
}

/// A `[tool.minversions]` section, or the contents of a `minversions.toml` file.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct Options {
    /// Install the minimum permitted version of each dependency, in every environment.
    pub minversions: Option<bool>,
    /// The source distribution under test.
    pub package: Option<PathBuf>,
    /// The interpreter used to create environments.
    pub python: Option<PathBuf>,
    /// The test environments, by name.
    #[serde(default)]
    pub env: BTreeMap<String, EnvironmentOptions>,
}

/// An `[env.<name>]` table.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct EnvironmentOptions {
    /// Requirements installed before the package, e.g. test runners.
    pub deps: Option<Vec<String>>,
    /// Install the minimum permitted version of each dependency, in this environment.
    pub minversions: Option<bool>,
    /// Extras of the package to activate.
    pub extras: Option<Vec<String>>,
    /// Don't install the package (or its dependencies) at all.
    pub skip_install: Option<bool>,
    /// Install the project in editable mode rather than from the archive.
    pub usedevelop: Option<bool>,
    /// Where the environment lives; defaults to `.minversions/<name>`.
    pub envdir: Option<PathBuf>,
    pub setenv: Option<BTreeMap<String, String>>,
    pub python: Option<PathBuf>,
}

impl Options {
    /// The options for the named environment, or the defaults if it isn't configured.
    pub fn environment(&self, name: &str) -> EnvironmentOptions {
        self.env.get(name).cloned().unwrap_or_default()
    }

    /// Resolve relative paths against the directory the options were loaded from.
    #[must_use]
    pub fn relative_to(self, root: &Path) -> Self {
        Self {
            package: self.package.map(|path| root.join(path)),
            python: self.python.map(|path| resolve_python(root, path)),
            env: self
                .env
                .into_iter()
                .map(|(name, env)| (name, env.relative_to(root)))
                .collect(),
            ..self
        }
    }
}

impl EnvironmentOptions {
    #[must_use]
    fn relative_to(self, root: &Path) -> Self {
        Self {
            envdir: self.envdir.map(|path| root.join(path)),
            python: self.python.map(|path| resolve_python(root, path)),
            ..self
        }
    }
}

/// Bare interpreter names (e.g. `python3.12`) are looked up on the `PATH`; only paths are
/// resolved.
fn resolve_python(root: &Path, python: PathBuf) -> PathBuf {
    if python.components().count() > 1 {
        root.join(python)
    } else {
        python
    }
}

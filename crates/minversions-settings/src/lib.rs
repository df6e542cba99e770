use std::ops::Deref;
use std::path::{Path, PathBuf};

pub use crate::settings::*;

mod settings;

pub const CONFIG_FILENAME: &str = "minversions.toml";

/// The [`Options`] as loaded from a configuration file on disk.
#[derive(Debug, Clone)]
pub struct FilesystemOptions {
    options: Options,
    /// The directory the configuration was found in; relative paths resolve against it.
    root: PathBuf,
}

impl FilesystemOptions {
    /// Convert the [`FilesystemOptions`] into [`Options`].
    pub fn into_options(self) -> Options {
        self.options
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Find the [`FilesystemOptions`] for the given path.
    ///
    /// The search starts at the given path and goes up the directory tree until a
    /// `minversions.toml` file, or a `pyproject.toml` file with a `[tool.minversions]` table, is
    /// found.
    pub fn find(path: &Path) -> Result<Option<Self>, Error> {
        for ancestor in path.ancestors() {
            match Self::from_directory(ancestor) {
                Ok(Some(options)) => return Ok(Some(options)),
                Ok(None) => {}
                Err(Error::PyprojectToml(path, err)) => {
                    // An unrelated `pyproject.toml` may be broken; keep looking.
                    tracing::warn!(
                        "Failed to parse `{}` during settings discovery: {err}",
                        path.display()
                    );
                }
                Err(err) => return Err(err),
            }
        }
        Ok(None)
    }

    /// Load a [`FilesystemOptions`] from a directory, preferring a `minversions.toml` file over a
    /// `pyproject.toml` file.
    pub fn from_directory(dir: &Path) -> Result<Option<Self>, Error> {
        let root = std::path::absolute(dir)?;

        let path = dir.join(CONFIG_FILENAME);
        match fs_err::read_to_string(&path) {
            Ok(content) => {
                let options = toml::from_str::<Options>(&content)
                    .map_err(|err| Error::MinversionsToml(path.clone(), Box::new(err)))?;
                tracing::debug!("Found configuration at `{}`", path.display());
                return Ok(Some(Self { options, root }));
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
            Err(err) => return Err(err.into()),
        }

        let path = dir.join("pyproject.toml");
        match fs_err::read_to_string(&path) {
            Ok(content) => {
                let pyproject: PyProjectToml = toml::from_str(&content)
                    .map_err(|err| Error::PyprojectToml(path.clone(), Box::new(err)))?;
                let Some(options) = pyproject.tool.and_then(|tool| tool.minversions) else {
                    tracing::debug!(
                        "Skipping `pyproject.toml` in `{}` (no `[tool.minversions]` section)",
                        dir.display()
                    );
                    return Ok(None);
                };
                tracing::debug!("Found configuration at `{}`", path.display());
                return Ok(Some(Self { options, root }));
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
            Err(err) => return Err(err.into()),
        }

        Ok(None)
    }

    /// Load a [`FilesystemOptions`] from an explicit `minversions.toml` file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        tracing::debug!("Reading configuration from: `{}`", path.display());

        let content = fs_err::read_to_string(path)?;
        let options = toml::from_str::<Options>(&content)
            .map_err(|err| Error::MinversionsToml(path.to_path_buf(), Box::new(err)))?;
        let absolute = std::path::absolute(path)?;
        let root = absolute
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or(absolute);
        Ok(Self { options, root })
    }
}

impl Deref for FilesystemOptions {
    type Target = Options;

    fn deref(&self) -> &Self::Target {
        &self.options
    }
}

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to parse: `{}`", _0.display())]
    PyprojectToml(PathBuf, #[source] Box<toml::de::Error>),

    #[error("Failed to parse: `{}`", _0.display())]
    MinversionsToml(PathBuf, #[source] Box<toml::de::Error>),
}

#[cfg(test)]
mod tests;

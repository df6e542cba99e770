use std::io;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use tracing::debug;

/// Project files whose contents decide whether a develop install is stale.
const PROJECT_FILES: &[&str] = &["pyproject.toml", "setup.py", "setup.cfg"];

/// Detects whether the package installed in an environment has changed since it was last
/// installed.
///
/// The digest of the install target is stored alongside the environment; a mismatch (or a
/// missing record) means the package needs to be reinstalled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReinstallSignal {
    record: PathBuf,
    digest: String,
}

impl ReinstallSignal {
    pub const FILENAME: &'static str = ".minversions-package";

    /// Compute the signal for a source archive, from its bytes.
    pub fn from_archive(env_root: &Path, archive: &Path) -> io::Result<Self> {
        let mut hasher = Sha256::new();
        hasher.update(fs_err::read(archive)?);
        Ok(Self::new(env_root, hasher))
    }

    /// Compute the signal for a project directory, from its build configuration files.
    pub fn from_project(env_root: &Path, project: &Path) -> io::Result<Self> {
        let mut hasher = Sha256::new();
        for name in PROJECT_FILES {
            let path = project.join(name);
            if !path.is_file() {
                continue;
            }
            hasher.update(name.as_bytes());
            hasher.update(fs_err::read(&path)?);
        }
        Ok(Self::new(env_root, hasher))
    }

    fn new(env_root: &Path, hasher: Sha256) -> Self {
        Self {
            record: env_root.join(Self::FILENAME),
            digest: hex::encode(hasher.finalize()),
        }
    }

    pub fn digest(&self) -> &str {
        &self.digest
    }

    pub fn needs_reinstall(&self) -> io::Result<bool> {
        match fs_err::read_to_string(&self.record) {
            Ok(previous) => {
                let changed = previous.trim() != self.digest;
                debug!(
                    "Package digest {} (recorded: {})",
                    self.digest,
                    previous.trim()
                );
                Ok(changed)
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(true),
            Err(err) => Err(err),
        }
    }

    /// Persist the digest, marking the current target as installed.
    pub fn record(&self) -> io::Result<()> {
        if let Some(parent) = self.record.parent() {
            fs_err::create_dir_all(parent)?;
        }
        fs_err::write(&self.record, &self.digest)
    }
}

#[cfg(test)]
mod tests {
    use super::ReinstallSignal;

    #[test]
    fn archive_changes() -> std::io::Result<()> {
        let env = tempfile::tempdir()?;
        let dist = tempfile::tempdir()?;
        let archive = dist.path().join("demo-1.0.tar.gz");
        fs_err::write(&archive, b"first")?;

        let signal = ReinstallSignal::from_archive(env.path(), &archive)?;
        assert!(signal.needs_reinstall()?);
        signal.record()?;
        assert!(!ReinstallSignal::from_archive(env.path(), &archive)?.needs_reinstall()?);

        fs_err::write(&archive, b"second")?;
        let changed = ReinstallSignal::from_archive(env.path(), &archive)?;
        assert_ne!(changed.digest(), signal.digest());
        assert!(changed.needs_reinstall()?);
        Ok(())
    }

    #[test]
    fn project_files() -> std::io::Result<()> {
        let env = tempfile::tempdir()?;
        let project = tempfile::tempdir()?;
        fs_err::write(project.path().join("pyproject.toml"), "[project]\nname = \"demo\"\n")?;

        let signal = ReinstallSignal::from_project(env.path(), project.path())?;
        signal.record()?;

        // Unrelated files don't count.
        fs_err::write(project.path().join("README.md"), "demo")?;
        assert!(!ReinstallSignal::from_project(env.path(), project.path())?.needs_reinstall()?);

        fs_err::write(project.path().join("setup.cfg"), "[metadata]\n")?;
        assert!(ReinstallSignal::from_project(env.path(), project.path())?.needs_reinstall()?);
        Ok(())
    }
}

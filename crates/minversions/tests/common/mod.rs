#![allow(dead_code)]

use std::borrow::BorrowMut;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Output};

use assert_fs::fixture::{ChildPath, PathChild};
use flate2::Compression;
use flate2::write::GzEncoder;
use regex::Regex;

pub(crate) const BIN_NAME: &str = "minversions";

pub(crate) struct TestContext {
    pub(crate) temp_dir: assert_fs::TempDir,
    filters: Vec<(String, String)>,
}

impl TestContext {
    pub(crate) fn new() -> Self {
        let temp_dir = assert_fs::TempDir::new().expect("Failed to create temporary directory");

        let mut filters = Vec::new();
        if let Ok(canonical) = temp_dir.path().canonicalize() {
            filters.push((
                regex::escape(&canonical.display().to_string()),
                "[TEMP_DIR]".to_string(),
            ));
        }
        filters.push((
            regex::escape(&temp_dir.path().display().to_string()),
            "[TEMP_DIR]".to_string(),
        ));

        Self { temp_dir, filters }
    }

    pub(crate) fn filters(&self) -> Vec<(&str, &str)> {
        self.filters
            .iter()
            .map(|(pattern, replacement)| (pattern.as_str(), replacement.as_str()))
            .collect()
    }

    /// A `minversions` invocation in the temporary directory, isolated from the caller's
    /// environment.
    pub(crate) fn command(&self) -> Command {
        let mut command = Command::new(assert_cmd::cargo::cargo_bin(BIN_NAME));
        command
            .current_dir(self.temp_dir.path())
            .env_remove("MINVERSIONS")
            .env_remove("MINVERSIONS_CONFIG_FILE")
            .env_remove("MINVERSIONS_PYTHON")
            .env_remove("TOX_PACKAGE")
            .env_remove("RUST_LOG");
        command
    }

    pub(crate) fn requirements(&self) -> Command {
        let mut command = self.command();
        command.arg("requirements");
        command
    }

    pub(crate) fn run(&self) -> Command {
        let mut command = self.command();
        command.arg("run");
        command
    }

    /// Write a source distribution with the given `PKG-INFO`, if any.
    pub(crate) fn sdist(&self, filename: &str, pkg_info: Option<&str>) -> ChildPath {
        let sdist = self.temp_dir.child(filename);
        let file = fs_err::File::create(sdist.path()).expect("Failed to create archive");
        let mut archive = tar::Builder::new(GzEncoder::new(file, Compression::default()));

        let stem = filename.trim_end_matches(".tar.gz");
        let mut entries = vec![(format!("{stem}/setup.cfg"), String::new())];
        if let Some(pkg_info) = pkg_info {
            entries.push((format!("{stem}/PKG-INFO"), pkg_info.to_string()));
        }
        for (path, content) in entries {
            let mut header = tar::Header::new_gnu();
            header.set_size(content.len() as u64);
            header.set_mode(0o644);
            header.set_cksum();
            archive
                .append_data(&mut header, path, content.as_bytes())
                .expect("Failed to append entry");
        }
        archive
            .into_inner()
            .and_then(GzEncoder::finish)
            .and_then(|mut file| file.flush())
            .expect("Failed to write archive");

        sdist
    }

    /// Write the marker values of a CPython 3.12 interpreter on Linux.
    pub(crate) fn linux_markers(&self) -> ChildPath {
        let markers = self.temp_dir.child("markers.json");
        let values = serde_json::json!({
            "implementation_name": "cpython",
            "implementation_version": "3.12.1",
            "os_name": "posix",
            "platform_machine": "x86_64",
            "platform_python_implementation": "CPython",
            "platform_release": "6.5.0",
            "platform_system": "Linux",
            "platform_version": "#1 SMP",
            "python_full_version": "3.12.1",
            "python_version": "3.12",
            "sys_platform": "linux",
        });
        fs_err::write(markers.path(), values.to_string()).expect("Failed to write markers");
        markers
    }

    /// Create an environment directory with a placeholder interpreter, so that it's treated as
    /// existing.
    pub(crate) fn existing_env(&self, root: impl AsRef<Path>) {
        let python = self.temp_dir.child(root).child("bin").child("python");
        fs_err::create_dir_all(python.path().parent().expect("interpreter has a parent"))
            .expect("Failed to create environment");
        fs_err::write(python.path(), "").expect("Failed to create interpreter");
    }
}

pub(crate) fn apply_filters<T: AsRef<str>>(
    mut snapshot: String,
    filters: impl AsRef<[(T, T)]>,
) -> String {
    for (matcher, replacement) in filters.as_ref() {
        let re = Regex::new(matcher.as_ref()).expect("Do you need to regex::escape your filter?");
        if re.is_match(&snapshot) {
            snapshot = re.replace_all(&snapshot, replacement.as_ref()).to_string();
        }
    }
    snapshot
}

/// Execute the command and format its output status, stdout and stderr into a snapshot string.
pub(crate) fn run_and_format<T: AsRef<str>>(
    mut command: impl BorrowMut<Command>,
    filters: impl AsRef<[(T, T)]>,
) -> (String, Output) {
    let program = command
        .borrow_mut()
        .get_program()
        .to_string_lossy()
        .to_string();
    let output = command
        .borrow_mut()
        .output()
        .unwrap_or_else(|err| panic!("Failed to spawn {program}: {err}"));

    let snapshot = apply_filters(
        format!(
            "success: {:?}\nexit_code: {}\n----- stdout -----\n{}\n----- stderr -----\n{}",
            output.status.success(),
            output.status.code().unwrap_or(!0),
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        ),
        filters,
    );

    (snapshot, output)
}

/// Run a command and snapshot its status and output, with the given filters applied.
#[allow(unused_macros)]
macro_rules! minversions_snapshot {
    ($filters:expr, $spawnable:expr, @$snapshot:literal) => {{
        let (snapshot, output) = $crate::common::run_and_format($spawnable, &$filters);
        ::insta::assert_snapshot!(snapshot, @$snapshot);
        output
    }};
}

#[allow(unused_imports)]
pub(crate) use minversions_snapshot;

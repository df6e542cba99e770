use std::io::Read;
use std::path::{Path, PathBuf};
use std::string::FromUtf8Error;

use tracing::debug;

/// The file name of the core metadata file in a source distribution.
pub const PKG_INFO: &str = "PKG-INFO";

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("Unsupported archive type: {}", .0.display())]
    UnsupportedArchive(PathBuf),
    #[error("`PKG-INFO` file not found in the package: {}", .0.display())]
    MissingPkgInfo(PathBuf),
    #[error("`{entry}` is truncated: expected {expected} bytes, found {actual}")]
    Truncated {
        entry: String,
        expected: u64,
        actual: u64,
    },
    #[error("`{entry}` is not valid UTF-8")]
    Encoding {
        entry: String,
        #[source]
        err: FromUtf8Error,
    },
}

/// Returns `true` if the path looks like a `.tar.gz` archive.
pub fn is_tar_gz(path: &Path) -> bool {
    let Some(ext) = path.extension() else {
        return false;
    };
    if ext.eq_ignore_ascii_case("tgz") {
        return true;
    }
    ext.eq_ignore_ascii_case("gz")
        && path.file_stem().is_some_and(|stem| {
            Path::new(stem)
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("tar"))
        })
}

/// Read the `PKG-INFO` file out of a `.tar.gz` source distribution.
///
/// The archive is opened and closed within this call.
pub fn read_pkg_info(source: impl AsRef<Path>) -> Result<String, Error> {
    let source = source.as_ref();
    if !is_tar_gz(source) {
        return Err(Error::UnsupportedArchive(source.to_path_buf()));
    }
    let file = fs_err::File::open(source)?;
    read_entry_with_suffix(flate2::read::GzDecoder::new(file), PKG_INFO)?
        .ok_or_else(|| Error::MissingPkgInfo(source.to_path_buf()))
}

/// Read the first entry of a tar stream whose path ends with the given suffix, decoded as UTF-8.
///
/// Returns `None` if no entry matches.
pub fn read_entry_with_suffix<R: Read>(reader: R, suffix: &str) -> Result<Option<String>, Error> {
    let mut archive = tar::Archive::new(reader);
    for entry in archive.entries()? {
        let mut entry = entry?;
        let path = entry.path()?.to_string_lossy().into_owned();
        if !path.ends_with(suffix) {
            continue;
        }
        debug!("Reading `{path}` from archive");
        let expected = entry.size();
        let mut contents = Vec::new();
        entry.read_to_end(&mut contents)?;
        if contents.len() as u64 != expected {
            return Err(Error::Truncated {
                entry: path,
                expected,
                actual: contents.len() as u64,
            });
        }
        return String::from_utf8(contents)
            .map(Some)
            .map_err(|err| Error::Encoding { entry: path, err });
    }
    Ok(None)
}

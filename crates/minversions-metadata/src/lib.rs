//! Parse Python core metadata, as found in the `PKG-INFO` file of a source distribution.
//!
//! The format is a loose dialect of RFC 5322 email headers:
//! <https://packaging.python.org/en/latest/specifications/core-metadata/>
use thiserror::Error;

pub use headers::Headers;

mod headers;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MetadataError {
    #[error("Metadata field is missing a `:` separator: `{0}`")]
    MissingSeparator(String),
}

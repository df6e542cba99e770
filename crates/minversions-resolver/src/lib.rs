//! Compute the set of requirements to install so that every direct dependency of a project is
//! installed at the lowest version its declared range admits.
use thiserror::Error;

use pep508_rs::{Pep508Error, VerbatimUrl};

pub use install_set::{NO_REQUIREMENTS, compute_install_set};
pub use specifier::{SpecifierKind, classify, rewrite_requirement};

mod install_set;
mod specifier;

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("Failed to parse `Requires-Dist` entry: `{requirement}`")]
    Requirement {
        requirement: String,
        #[source]
        err: Box<Pep508Error<VerbatimUrl>>,
    },
}

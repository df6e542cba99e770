use std::str::FromStr;

use tracing::debug;

use minversions_diagnostics::Reporter;
use minversions_metadata::Headers;
use pep508_rs::{ExtraName, MarkerEnvironment, Requirement, VerbatimUrl};

use crate::{ResolveError, SpecifierKind, rewrite_requirement};

/// Reported when the metadata yields nothing to install.
pub const NO_REQUIREMENTS: &str = "No requirements to install. Your build backend may not be including the 'Requires-Dist' field in the PKG-INFO file.";

/// Compute the requirements to install for a project, given its core metadata.
///
/// Each `Requires-Dist` entry that applies to the marker environment (with the given extras
/// active) is included, in file order. Entries with a lower bound are pinned to it; all others
/// are included exactly as written. Only the project's direct dependencies are considered.
pub fn compute_install_set(
    metadata: &Headers,
    extras: &[ExtraName],
    markers: &MarkerEnvironment,
    reporter: &dyn Reporter,
) -> Result<Vec<String>, ResolveError> {
    let provides_extras = metadata
        .get_all("Provides-Extra")
        .filter_map(|extra| ExtraName::from_str(extra).ok())
        .collect::<Vec<_>>();
    for extra in extras {
        if !provides_extras.contains(extra) {
            reporter.warning(&format!(
                "The project does not provide the extra '{extra}'"
            ));
        }
    }

    let mut requirements = Vec::new();
    for requires_dist in metadata.get_all("Requires-Dist") {
        let mut requirement = Requirement::<VerbatimUrl>::from_str(requires_dist).map_err(|err| {
            ResolveError::Requirement {
                requirement: requires_dist.to_string(),
                err: Box::new(err),
            }
        })?;

        if !requirement.marker.evaluate(markers, extras) {
            debug!("Skipping `{requires_dist}`: markers don't match");
            continue;
        }

        match rewrite_requirement(&mut requirement) {
            SpecifierKind::Pinned => {
                requirements.push(requires_dist.to_string());
            }
            SpecifierKind::Unbounded => {
                reporter.warning(&format!(
                    "Cannot determine minimum version for {requires_dist}"
                ));
                requirements.push(requires_dist.to_string());
            }
            SpecifierKind::Minimizable(version) => {
                debug!("Pinning `{}` to its minimum version: {version}", requirement.name);
                requirements.push(requirement.to_string());
            }
        }
    }

    if requirements.is_empty() {
        reporter.error(NO_REQUIREMENTS);
    }

    Ok(requirements)
}

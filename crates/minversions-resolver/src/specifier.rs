use tracing::debug;

use pep508_rs::pep440_rs::{Operator, Version, VersionSpecifier, VersionSpecifiers};
use pep508_rs::{Requirement, VerbatimUrl, VersionOrUrl};

/// How a version specifier relates to the minimum version of a requirement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecifierKind {
    /// Every constraint is an exact pin, or there are no constraints at all (including direct
    /// URL requirements). Installed as declared.
    Pinned,
    /// No deterministic minimum can be derived, e.g. `<2.0` or `!=1.3`.
    Unbounded,
    /// The lowest version admitted by the specifier's lower bounds.
    Minimizable(Version),
}

/// Classify a set of version specifiers.
///
/// The minimum is taken from the `>=` and `~=` constraints; if there are several, the greatest
/// of their versions is the lowest one satisfying all of them. A minimum that is excluded by the
/// remaining constraints (e.g. `>=1.0, !=1.0`) can't be pinned, and is treated as unbounded.
pub fn classify(specifiers: &VersionSpecifiers) -> SpecifierKind {
    if specifiers.iter().all(|specifier| {
        matches!(
            specifier.operator(),
            Operator::Equal | Operator::EqualStar | Operator::ExactEqual
        )
    }) {
        return SpecifierKind::Pinned;
    }

    let minimum = specifiers
        .iter()
        .filter(|specifier| {
            matches!(
                specifier.operator(),
                Operator::GreaterThanEqual | Operator::TildeEqual
            )
        })
        .map(VersionSpecifier::version)
        .max();

    match minimum {
        Some(version) if specifiers.contains(version) => {
            SpecifierKind::Minimizable(version.clone())
        }
        Some(version) => {
            debug!("Minimum version {version} is excluded by `{specifiers}`");
            SpecifierKind::Unbounded
        }
        None => SpecifierKind::Unbounded,
    }
}

/// Collapse the version specifier of a requirement into an exact pin on its minimum version.
///
/// The requirement is only modified if its specifier is [`SpecifierKind::Minimizable`].
pub fn rewrite_requirement(requirement: &mut Requirement<VerbatimUrl>) -> SpecifierKind {
    let Some(VersionOrUrl::VersionSpecifier(specifiers)) = &requirement.version_or_url else {
        return SpecifierKind::Pinned;
    };
    let kind = classify(specifiers);
    if let SpecifierKind::Minimizable(version) = &kind {
        let pin = VersionSpecifier::equals_version(version.clone());
        requirement.version_or_url = Some(VersionOrUrl::VersionSpecifier(
            std::iter::once(pin).collect(),
        ));
    }
    kind
}

#[cfg(test)]
mod tests;

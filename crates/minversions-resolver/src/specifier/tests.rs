use std::str::FromStr;

use pep508_rs::pep440_rs::{Version, VersionSpecifiers};
use pep508_rs::{Requirement, VerbatimUrl};

use super::{SpecifierKind, classify, rewrite_requirement};

fn kind(specifiers: &str) -> SpecifierKind {
    classify(&VersionSpecifiers::from_str(specifiers).unwrap())
}

fn minimum(version: &str) -> SpecifierKind {
    SpecifierKind::Minimizable(Version::from_str(version).unwrap())
}

#[test]
fn pinned() {
    assert_eq!(kind("==1.0"), SpecifierKind::Pinned);
    assert_eq!(kind("==1.*"), SpecifierKind::Pinned);
    assert_eq!(kind("===1.0"), SpecifierKind::Pinned);
    assert_eq!(kind("==1.0, ==1.0.0"), SpecifierKind::Pinned);
    assert_eq!(kind(""), SpecifierKind::Pinned);
}

#[test]
fn unbounded() {
    assert_eq!(kind("<2.0"), SpecifierKind::Unbounded);
    assert_eq!(kind("<=2.0"), SpecifierKind::Unbounded);
    assert_eq!(kind("!=1.3"), SpecifierKind::Unbounded);
    assert_eq!(kind("!=1.*"), SpecifierKind::Unbounded);
    assert_eq!(kind(">1.0"), SpecifierKind::Unbounded);
    assert_eq!(kind(">1.0, <2.0, !=1.5"), SpecifierKind::Unbounded);
    // A pin mixed with other operators has no lower bound to take.
    assert_eq!(kind("==1.0, <2"), SpecifierKind::Unbounded);
}

#[test]
fn minimizable() {
    assert_eq!(kind(">=1.2"), minimum("1.2"));
    assert_eq!(kind(">=1.2,<2.0"), minimum("1.2"));
    assert_eq!(kind("~=1.4.2"), minimum("1.4.2"));
    assert_eq!(kind("<3, >=2.1, !=2.5"), minimum("2.1"));
    assert_eq!(kind(">=0.3.0, >0.1"), minimum("0.3.0"));
}

#[test]
fn greatest_lower_bound() {
    assert_eq!(kind(">=1.0, ~=1.2"), minimum("1.2"));
    assert_eq!(kind("~=1.2, >=1.0"), minimum("1.2"));
    assert_eq!(kind(">=2.0, >=1.5"), minimum("2.0"));
}

#[test]
fn excluded_minimum() {
    assert_eq!(kind(">=1.0, !=1.0"), SpecifierKind::Unbounded);
    assert_eq!(kind(">=1.0, >1.0"), SpecifierKind::Unbounded);
    assert_eq!(kind(">=2.0, <2.0"), SpecifierKind::Unbounded);
}

#[test]
fn rewrite() {
    let mut requirement = Requirement::<VerbatimUrl>::from_str("dom_toml>=0.3.0").unwrap();
    assert_eq!(rewrite_requirement(&mut requirement), minimum("0.3.0"));
    assert_eq!(requirement.to_string(), "dom-toml==0.3.0");

    let mut requirement = Requirement::<VerbatimUrl>::from_str("attrs >=1.2, <2.0").unwrap();
    rewrite_requirement(&mut requirement);
    assert_eq!(requirement.to_string(), "attrs==1.2");

    let mut requirement = Requirement::<VerbatimUrl>::from_str("requests[socks]~=2.28").unwrap();
    rewrite_requirement(&mut requirement);
    assert_eq!(requirement.to_string(), "requests[socks]==2.28");
}

#[test]
fn rewrite_leaves_others_untouched() {
    for input in ["numpy<2.0", "numpy==1.26.4", "numpy"] {
        let mut requirement = Requirement::<VerbatimUrl>::from_str(input).unwrap();
        let before = requirement.clone();
        assert!(
            !matches!(
                rewrite_requirement(&mut requirement),
                SpecifierKind::Minimizable(_)
            ),
            "{input}"
        );
        assert_eq!(requirement, before, "{input}");
    }
}

#[test]
fn rewrite_url() {
    let mut requirement = Requirement::<VerbatimUrl>::from_str(
        "demo @ https://files.example.com/demo-1.0.tar.gz",
    )
    .unwrap();
    assert_eq!(rewrite_requirement(&mut requirement), SpecifierKind::Pinned);
}

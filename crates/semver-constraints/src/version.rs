//! Semantic version value type

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;

lazy_static! {
    static ref VERSION_RE: Regex = Regex::new(
        r"^\s*v?(\d+)(?:\.(\d+))?(?:\.(\d+))?(?:-([0-9A-Za-z-]+(?:\.[0-9A-Za-z-]+)*))?(?:\+([0-9A-Za-z-]+(?:\.[0-9A-Za-z-]+)*))?\s*$"
    )
    .unwrap();
}

/// Error type for version parsing
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VersionError {
    #[error("invalid version string \"{0}\"")]
    Malformed(String),
}

/// A single dot-separated prerelease identifier.
///
/// Numeric identifiers compare numerically and rank below alphanumeric ones.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum Identifier {
    Numeric(u64),
    AlphaNumeric(String),
}

impl Identifier {
    pub(crate) fn parse(s: &str) -> Identifier {
        if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(n) = s.parse::<u64>() {
                return Identifier::Numeric(n);
            }
        }
        Identifier::AlphaNumeric(s.to_string())
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Identifier::Numeric(n) => write!(f, "{}", n),
            Identifier::AlphaNumeric(s) => write!(f, "{}", s),
        }
    }
}

/// An immutable semantic version.
///
/// Ordering follows semver precedence: numeric components first, then
/// prerelease identifiers (a version with a prerelease orders below the same
/// version without one). Build metadata is ignored by both equality and
/// ordering.
#[derive(Debug, Clone)]
pub struct Version {
    major: u64,
    minor: u64,
    patch: u64,
    pre: Vec<Identifier>,
    build: Option<String>,
}

impl Version {
    /// Parse a version string. Missing minor/patch components default to 0.
    pub fn new(version: &str) -> Result<Self, VersionError> {
        let caps = VERSION_RE
            .captures(version)
            .ok_or_else(|| VersionError::Malformed(version.to_string()))?;

        let numeric = |i: usize| -> Result<u64, VersionError> {
            match caps.get(i) {
                Some(m) => m
                    .as_str()
                    .parse()
                    .map_err(|_| VersionError::Malformed(version.to_string())),
                None => Ok(0),
            }
        };

        let pre = caps
            .get(4)
            .map(|m| m.as_str().split('.').map(Identifier::parse).collect())
            .unwrap_or_default();

        Ok(Version {
            major: numeric(1)?,
            minor: numeric(2)?,
            patch: numeric(3)?,
            pre,
            build: caps.get(5).map(|m| m.as_str().to_string()),
        })
    }

    pub(crate) fn from_parts(major: u64, minor: u64, patch: u64, pre: Vec<Identifier>) -> Self {
        Version {
            major,
            minor,
            patch,
            pre,
            build: None,
        }
    }

    pub fn major(&self) -> u64 {
        self.major
    }

    pub fn minor(&self) -> u64 {
        self.minor
    }

    pub fn patch(&self) -> u64 {
        self.patch
    }

    /// The prerelease identifiers, empty for a release version.
    pub fn pre(&self) -> &[Identifier] {
        &self.pre
    }

    /// The build metadata, if any. Ignored by comparisons.
    pub fn build(&self) -> Option<&str> {
        self.build.as_deref()
    }

    pub fn is_prerelease(&self) -> bool {
        !self.pre.is_empty()
    }
}

impl FromStr for Version {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Version::new(s)
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Version {}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        self.major
            .cmp(&other.major)
            .then_with(|| self.minor.cmp(&other.minor))
            .then_with(|| self.patch.cmp(&other.patch))
            .then_with(|| compare_prerelease(&self.pre, &other.pre))
    }
}

fn compare_prerelease(a: &[Identifier], b: &[Identifier]) -> Ordering {
    match (a.is_empty(), b.is_empty()) {
        (true, true) => Ordering::Equal,
        // A release outranks any prerelease of the same numeric version
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => a.cmp(b),
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if !self.pre.is_empty() {
            let pre: Vec<String> = self.pre.iter().map(|i| i.to_string()).collect();
            write!(f, "-{}", pre.join("."))?;
        }
        if let Some(ref build) = self.build {
            write!(f, "+{}", build)?;
        }
        Ok(())
    }
}

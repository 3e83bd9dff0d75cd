//! Expansion of `(predicate, version pattern)` pairs into constraint values

use super::algebra::Constraint;
use super::predicate::Predicate;
use super::range::Range;
use crate::version::{Identifier, Version};

/// A version pattern as written in a clause: each numeric component may be a
/// wildcard (`x`, `X`, `*`), and an omitted component behaves exactly like a
/// wildcard in that position.
#[derive(Debug, Clone)]
pub(crate) struct VersionPattern {
    pub(crate) major: Option<u64>,
    pub(crate) minor: Option<u64>,
    pub(crate) patch: Option<u64>,
    pub(crate) pre: Vec<Identifier>,
}

impl VersionPattern {
    /// The anchor version: concrete components with wildcards zero-filled.
    fn anchor(&self) -> Version {
        Version::from_parts(
            self.major.unwrap_or(0),
            self.minor.unwrap_or(0),
            self.patch.unwrap_or(0),
            self.pre.clone(),
        )
    }

    /// Whether any component position is a wildcard.
    pub(crate) fn is_wild(&self) -> bool {
        self.major.is_none() || self.minor.is_none() || self.patch.is_none()
    }
}

/// Expand a parsed clause into its canonical constraint value.
///
/// A wildcard major means the pattern denotes every version, regardless of
/// predicate, since there is no concrete anchor to bound a range against.
pub(crate) fn expand(predicate: Predicate, pattern: &VersionPattern) -> Constraint {
    if pattern.major.is_none() {
        return Constraint::Any;
    }

    let wild_minor = pattern.minor.is_none();
    let wild_patch = wild_minor || pattern.patch.is_none();
    let anchor = pattern.anchor();

    match predicate {
        Predicate::Caret => expand_caret(anchor),
        Predicate::Tilde => expand_tilde(anchor, wild_minor),
        Predicate::NotEqual => expand_not_equal(anchor, wild_minor, wild_patch),
        Predicate::Equal => {
            if wild_patch {
                // Equalling a wildcard has the same behavior as a tilde
                expand_tilde(anchor, wild_minor)
            } else {
                Constraint::Exact(anchor)
            }
        }
        Predicate::GreaterThan => Range::at_least(anchor, false).into(),
        Predicate::GreaterThanOrEqual => Range::at_least(anchor, true).into(),
        Predicate::LessThan | Predicate::LessThanOrEqual => {
            let inclusive = predicate == Predicate::LessThanOrEqual;
            if wild_patch {
                let max = if wild_minor {
                    bump_major(&anchor)
                } else {
                    bump_minor(&anchor)
                };
                Range::at_most(max, inclusive).into()
            } else {
                Range::at_most(anchor, inclusive).into()
            }
        }
    }
}

/// `^1.2.3` admits `[1.2.3, 2.0.0)`: same major, at or above the anchor.
fn expand_caret(anchor: Version) -> Constraint {
    let max = bump_major(&anchor);
    Range::bounded(anchor, true, max, false).into()
}

/// `~1.2.3` admits `[1.2.3, 1.3.0)`. With a wildcard minor the next major is
/// the ceiling instead, which is exactly the caret expansion.
fn expand_tilde(anchor: Version, wild_minor: bool) -> Constraint {
    if wild_minor {
        return expand_caret(anchor);
    }
    let max = bump_minor(&anchor);
    Range::bounded(anchor, true, max, false).into()
}

/// Without wildcards, `!=` is a point exclusion in an unbounded range. With
/// a wildcard it excludes a whole band, which is the union of everything
/// below the anchor and everything from the bumped anchor up.
fn expand_not_equal(anchor: Version, wild_minor: bool, wild_patch: bool) -> Constraint {
    if !wild_minor && !wild_patch {
        return Range::excluding(anchor).into();
    }

    let floor = if wild_minor {
        bump_major(&anchor)
    } else {
        bump_minor(&anchor)
    };

    Constraint::union([
        Range::at_most(anchor, false).into(),
        Range::at_least(floor, true).into(),
    ])
}

fn bump_major(version: &Version) -> Version {
    Version::from_parts(version.major().saturating_add(1), 0, 0, Vec::new())
}

fn bump_minor(version: &Version) -> Version {
    Version::from_parts(version.major(), version.minor().saturating_add(1), 0, Vec::new())
}

//! Constraint expression parsing and evaluation

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;

use crate::constraint::expand::{expand, VersionPattern};
use crate::constraint::{Constraint, Predicate};
use crate::version::{Identifier, Version};

lazy_static! {
    static ref PREDICATE_FRAGMENT: &'static str = r"\^|~>|~|!=|>=|=>|<=|=<|>|<|=";

    // A version pattern without capture groups, for the hyphen-range rewrite
    static ref PATTERN_FRAGMENT: String = format!(
        r"v?(?:{c})(?:\.(?:{c}))?(?:\.(?:{c}))?(?:-[0-9A-Za-z-]+(?:\.[0-9A-Za-z-]+)*)?(?:\+[0-9A-Za-z-]+(?:\.[0-9A-Za-z-]+)*)?",
        c = r"[0-9]+|[xX*]"
    );

    // One constraint clause: optional predicate followed by a version
    // pattern. An absent pattern is a full wildcard.
    static ref CLAUSE_RE: Regex = Regex::new(&format!(
        r"^\s*(?P<op>{})?\s*(?P<pattern>v?(?P<major>{c})(?:\.(?P<minor>{c}))?(?:\.(?P<patch>{c}))?(?:-(?P<pre>[0-9A-Za-z-]+(?:\.[0-9A-Za-z-]+)*))?(?:\+[0-9A-Za-z-]+(?:\.[0-9A-Za-z-]+)*)?)?\s*$",
        *PREDICATE_FRAGMENT,
        c = r"[0-9]+|[xX*]"
    ))
    .unwrap();

    // Hyphen range: "A - B", rewritten to ">= A, <= B" before splitting
    static ref HYPHEN_RANGE_RE: Regex = Regex::new(&format!(
        r"(?P<from>{0}) +- +(?P<to>{0})",
        *PATTERN_FRAGMENT
    ))
    .unwrap();
}

/// Error type for constraint parsing
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConstraintError {
    /// The clause text does not match the constraint grammar. Fatal to
    /// construction; no partial result is produced.
    #[error("improper constraint: {0}")]
    Malformed(String),
}

/// One parsed clause of a comma-joined group. The predicate and original
/// pattern text are kept for `validate` messages; membership semantics live
/// entirely in the expanded constraint value.
#[derive(Debug, Clone)]
struct Clause {
    constraint: Constraint,
    predicate: Predicate,
    wildcard: bool,
    orig: String,
}

impl Clause {
    fn check(&self, version: &Version) -> bool {
        self.constraint.satisfies(version)
    }

    fn failure_reason(&self, version: &Version) -> String {
        self.predicate
            .failure_message(self.wildcard)
            .replacen("{}", &version.to_string(), 1)
            .replacen("{}", &self.orig, 1)
    }
}

/// One comma-joined AND group: satisfied when every clause holds.
#[derive(Debug, Clone)]
struct ConstraintGroup {
    clauses: Vec<Clause>,
}

/// A parsed constraint expression: `||`-separated groups of comma-joined
/// clauses, checked against a [`Version`].
///
/// The groups are folded into a single [`Constraint`] at parse time
/// (intersection within a group, union across groups), so repeated
/// [`check`](Constraints::check) calls run against the reduced algebra value.
#[derive(Debug, Clone)]
pub struct Constraints {
    groups: Vec<ConstraintGroup>,
    folded: Constraint,
    text: String,
}

impl Constraints {
    /// Parse a constraint expression.
    ///
    /// Hyphen-range sub-expressions are rewritten to bound comparisons
    /// first, then the input is split on `||` into groups and on `,` into
    /// clauses. Any clause that fails the grammar aborts construction.
    pub fn new(text: &str) -> Result<Self, ConstraintError> {
        let rewritten = rewrite_hyphen_ranges(text);

        let mut groups = Vec::new();
        for group_text in rewritten.split("||") {
            let mut clauses = Vec::new();
            for clause_text in group_text.split(',') {
                clauses.push(parse_clause(clause_text)?);
            }
            groups.push(ConstraintGroup { clauses });
        }

        let folded = Constraint::union(groups.iter().map(|group| {
            Constraint::intersection(group.clauses.iter().map(|c| c.constraint.clone()))
        }));

        Ok(Constraints {
            groups,
            folded,
            text: text.trim().to_string(),
        })
    }

    /// Test whether a version satisfies the constraints. Never fails: a
    /// structurally impossible constraint simply matches nothing.
    pub fn check(&self, version: &Version) -> bool {
        self.folded.satisfies(version)
    }

    /// Like [`check`](Constraints::check), but collects a human-readable
    /// reason for every failing clause of every group inspected. Succeeds
    /// with no reasons as soon as one group is fully satisfied.
    pub fn validate(&self, version: &Version) -> (bool, Vec<String>) {
        let mut reasons = Vec::new();
        for group in &self.groups {
            let mut satisfied = true;
            for clause in &group.clauses {
                if !clause.check(version) {
                    reasons.push(clause.failure_reason(version));
                    satisfied = false;
                }
            }
            if satisfied {
                return (true, Vec::new());
            }
        }
        (false, reasons)
    }

    /// The folded algebra value backing [`check`](Constraints::check).
    pub fn constraint(&self) -> &Constraint {
        &self.folded
    }

    /// Whether the expression reduced to a constraint no version can
    /// satisfy, e.g. the intersection of disjoint ranges. Distinct from "no
    /// known version matches": this is decided from the representation
    /// alone.
    pub fn is_impossible(&self) -> bool {
        self.folded.is_none()
    }
}

impl FromStr for Constraints {
    type Err = ConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Constraints::new(s)
    }
}

impl fmt::Display for Constraints {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}

/// Rewrite every hyphen-range sub-expression `A - B` into `>= A, <= B` so
/// the clause grammar never sees hyphen ranges directly.
fn rewrite_hyphen_ranges(input: &str) -> Cow<'_, str> {
    HYPHEN_RANGE_RE.replace_all(input, ">= ${from}, <= ${to}")
}

fn parse_clause(text: &str) -> Result<Clause, ConstraintError> {
    if text.trim().is_empty() {
        return Err(ConstraintError::Malformed(text.to_string()));
    }

    let caps = CLAUSE_RE
        .captures(text)
        .ok_or_else(|| ConstraintError::Malformed(text.to_string()))?;

    let symbol = caps.name("op").map_or("", |m| m.as_str());
    let predicate = Predicate::from_symbol(symbol)
        .expect("clause grammar and predicate table out of sync");

    let pattern = VersionPattern {
        major: wildcard_component(caps.name("major").map(|m| m.as_str()), text)?,
        minor: wildcard_component(caps.name("minor").map(|m| m.as_str()), text)?,
        patch: wildcard_component(caps.name("patch").map(|m| m.as_str()), text)?,
        pre: caps
            .name("pre")
            .map(|m| m.as_str().split('.').map(Identifier::parse).collect())
            .unwrap_or_default(),
    };

    Ok(Clause {
        constraint: expand(predicate, &pattern),
        predicate,
        wildcard: pattern.is_wild(),
        orig: caps
            .name("pattern")
            .map_or("", |m| m.as_str())
            .to_string(),
    })
}

/// A component is concrete digits, a wildcard token, or absent (which means
/// the same as a wildcard). Numeric overflow is a malformed clause, not a
/// panic.
fn wildcard_component(
    component: Option<&str>,
    clause: &str,
) -> Result<Option<u64>, ConstraintError> {
    match component {
        None | Some("x") | Some("X") | Some("*") => Ok(None),
        Some(digits) => digits
            .parse()
            .map(Some)
            .map_err(|_| ConstraintError::Malformed(clause.to_string())),
    }
}

//! Semantic version constraint parsing and matching
//!
//! This crate parses version-constraint expressions (`^1.2.3`, `~>2.0`,
//! `1.2.x`, hyphen ranges, `||`-separated groups) into a normalized range
//! algebra and answers whether a version satisfies them.

pub mod constraint;
mod constraints;
mod version;

pub use constraint::{Constraint, Predicate, Range};
pub use constraints::{ConstraintError, Constraints};
pub use version::{Identifier, Version, VersionError};

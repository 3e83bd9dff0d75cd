//! Version range with optional bounds and point exclusions

use std::fmt;

use crate::version::Version;

/// A constraint defined by optional inclusive/exclusive lower and upper
/// bounds plus a set of excluded exact versions. Either bound may be absent,
/// leaving that side unbounded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Range {
    min: Option<Version>,
    include_min: bool,
    max: Option<Version>,
    include_max: bool,
    excluded: Vec<Version>,
}

impl Range {
    pub fn bounded(min: Version, include_min: bool, max: Version, include_max: bool) -> Self {
        Range {
            min: Some(min),
            include_min,
            max: Some(max),
            include_max,
            excluded: Vec::new(),
        }
    }

    pub fn at_least(min: Version, inclusive: bool) -> Self {
        Range {
            min: Some(min),
            include_min: inclusive,
            max: None,
            include_max: false,
            excluded: Vec::new(),
        }
    }

    pub fn at_most(max: Version, inclusive: bool) -> Self {
        Range {
            min: None,
            include_min: false,
            max: Some(max),
            include_max: inclusive,
            excluded: Vec::new(),
        }
    }

    /// An unbounded range that rejects exactly the given version.
    pub fn excluding(version: Version) -> Self {
        Range {
            min: None,
            include_min: false,
            max: None,
            include_max: false,
            excluded: vec![version],
        }
    }

    pub(crate) fn point(version: Version) -> Self {
        Range {
            min: Some(version.clone()),
            include_min: true,
            max: Some(version),
            include_max: true,
            excluded: Vec::new(),
        }
    }

    pub fn min(&self) -> Option<&Version> {
        self.min.as_ref()
    }

    pub fn include_min(&self) -> bool {
        self.include_min
    }

    pub fn max(&self) -> Option<&Version> {
        self.max.as_ref()
    }

    pub fn include_max(&self) -> bool {
        self.include_max
    }

    pub fn excluded(&self) -> &[Version] {
        &self.excluded
    }

    /// Bounds check only, ignoring the exclusion list.
    fn within_bounds(&self, version: &Version) -> bool {
        if let Some(ref min) = self.min {
            if version < min || (version == min && !self.include_min) {
                return false;
            }
        }
        if let Some(ref max) = self.max {
            if version > max || (version == max && !self.include_max) {
                return false;
            }
        }
        true
    }

    /// Check whether a version lies within the bounds and is not excluded.
    pub fn satisfies(&self, version: &Version) -> bool {
        self.within_bounds(version) && !self.excluded.contains(version)
    }

    /// A range that admits no version at all. Degenerate ranges (inverted
    /// bounds, or a point whose only member is excluded) are valid values;
    /// they just never match.
    pub fn is_empty(&self) -> bool {
        if let (Some(min), Some(max)) = (&self.min, &self.max) {
            if min > max {
                return true;
            }
            if min == max {
                if !(self.include_min && self.include_max) {
                    return true;
                }
                return self.excluded.contains(min);
            }
        }
        false
    }

    /// The single version this range admits, when the bounds pin one down.
    pub fn as_point(&self) -> Option<&Version> {
        match (&self.min, &self.max) {
            (Some(min), Some(max))
                if min == max
                    && self.include_min
                    && self.include_max
                    && !self.excluded.contains(min) =>
            {
                Some(min)
            }
            _ => None,
        }
    }

    /// Intersect two ranges: keep the tighter bound on each side (on a tie a
    /// bound is inclusive only if both operands are), merge the exclusion
    /// lists, and drop exclusions that fall outside the new bounds. The
    /// result may be empty; callers normalize via [`Range::is_empty`].
    pub fn intersect(&self, other: &Range) -> Range {
        let (min, include_min) = tighter(
            (&self.min, self.include_min),
            (&other.min, other.include_min),
            true,
        );
        let (max, include_max) = tighter(
            (&self.max, self.include_max),
            (&other.max, other.include_max),
            false,
        );

        let mut merged = Range {
            min,
            include_min,
            max,
            include_max,
            excluded: Vec::new(),
        };

        for version in self.excluded.iter().chain(other.excluded.iter()) {
            if merged.within_bounds(version) && !merged.excluded.contains(version) {
                merged.excluded.push(version.clone());
            }
        }

        merged
    }
}

/// Pick the tighter of two optional bounds. For lower bounds the tighter one
/// is the greater, for upper bounds the lesser; equal versions combine to an
/// inclusive bound only when both sides are inclusive.
fn tighter(
    a: (&Option<Version>, bool),
    b: (&Option<Version>, bool),
    lower: bool,
) -> (Option<Version>, bool) {
    match (a.0, b.0) {
        (None, None) => (None, false),
        (Some(v), None) => (Some(v.clone()), a.1),
        (None, Some(v)) => (Some(v.clone()), b.1),
        (Some(av), Some(bv)) => {
            if av == bv {
                (Some(av.clone()), a.1 && b.1)
            } else if (av > bv) == lower {
                (Some(av.clone()), a.1)
            } else {
                (Some(bv.clone()), b.1)
            }
        }
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if let Some(ref min) = self.min {
            let op = if self.include_min { ">=" } else { ">" };
            parts.push(format!("{}{}", op, min));
        }
        if let Some(ref max) = self.max {
            let op = if self.include_max { "<=" } else { "<" };
            parts.push(format!("{}{}", op, max));
        }
        for version in &self.excluded {
            parts.push(format!("!={}", version));
        }
        if parts.is_empty() {
            return write!(f, "*");
        }
        write!(f, "{}", parts.join(", "))
    }
}

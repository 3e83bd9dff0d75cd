//! Constraint value type and the union/intersection algebra over it

use std::fmt;

use super::range::Range;
use crate::version::Version;

/// A normalized version constraint.
///
/// `Any` and `None` are first-class values: `Any` is the identity element
/// for intersection and absorbs unions, `None` is the identity element for
/// union and absorbs intersections. The [`Constraint::union`] and
/// [`Constraint::intersection`] constructors fold them at construction time,
/// so the members of a `Union`/`Intersection` are never trivially reducible.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Constraint {
    /// Satisfied by every version.
    Any,
    /// Satisfied by no version.
    None,
    /// Satisfied only by versions equal to the given one. Equivalent to a
    /// closed single-point range, kept distinct as a fast path.
    Exact(Version),
    /// Satisfied by versions within the bounds and not excluded.
    Range(Range),
    /// Satisfied if any member is satisfied.
    Union(Vec<Constraint>),
    /// Satisfied if all members are satisfied.
    Intersection(Vec<Constraint>),
}

impl Constraint {
    /// Check whether a version satisfies this constraint.
    pub fn satisfies(&self, version: &Version) -> bool {
        match self {
            Constraint::Any => true,
            Constraint::None => false,
            Constraint::Exact(v) => version == v,
            Constraint::Range(r) => r.satisfies(version),
            Constraint::Union(members) => members.iter().any(|m| m.satisfies(version)),
            Constraint::Intersection(members) => members.iter().all(|m| m.satisfies(version)),
        }
    }

    /// Combine constraints with logical OR.
    ///
    /// `None` members are dropped, any `Any` member collapses the whole
    /// union to `Any`, nested unions are flattened, and a union of zero
    /// members is `None`. The operation is associative and commutative in
    /// effect: member order never changes the satisfaction result.
    pub fn union(members: impl IntoIterator<Item = Constraint>) -> Constraint {
        let mut out = Vec::new();
        for member in members {
            match member {
                Constraint::None => continue,
                Constraint::Any => return Constraint::Any,
                Constraint::Union(inner) => out.extend(inner),
                other => out.push(other),
            }
        }
        match out.len() {
            0 => Constraint::None,
            1 => out.pop().unwrap(),
            _ => Constraint::Union(out),
        }
    }

    /// Combine constraints with logical AND.
    ///
    /// `Any` members are dropped, any `None` member collapses the whole
    /// intersection to `None`, nested intersections are flattened, and an
    /// intersection of zero members is `Any`. Exact and range members are
    /// folded pairwise into a single range; when the folded range is
    /// provably empty (disjoint operands) the result is the literal `None`,
    /// and when it pins down a single version the result is `Exact`.
    /// Members that are not exact/range (e.g. the union a wildcard `!=`
    /// expands to) are kept as residual intersection members.
    pub fn intersection(members: impl IntoIterator<Item = Constraint>) -> Constraint {
        let mut folded: Option<Range> = None;
        let mut rest = Vec::new();

        let fold = |range: Range, folded: &mut Option<Range>| {
            *folded = Some(match folded.take() {
                Some(acc) => acc.intersect(&range),
                None => range,
            });
        };

        let mut queue: Vec<Constraint> = members.into_iter().collect();
        queue.reverse();
        while let Some(member) = queue.pop() {
            match member {
                Constraint::Any => continue,
                Constraint::None => return Constraint::None,
                Constraint::Intersection(inner) => {
                    queue.extend(inner.into_iter().rev());
                }
                Constraint::Exact(v) => fold(Range::point(v), &mut folded),
                Constraint::Range(r) => fold(r, &mut folded),
                other => rest.push(other),
            }
        }

        if let Some(range) = folded {
            match Constraint::from(range) {
                Constraint::Any => {}
                Constraint::None => return Constraint::None,
                reduced => rest.insert(0, reduced),
            }
        }

        match rest.len() {
            0 => Constraint::Any,
            1 => rest.pop().unwrap(),
            _ => Constraint::Intersection(rest),
        }
    }

    pub fn is_any(&self) -> bool {
        matches!(self, Constraint::Any)
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Constraint::None)
    }
}

impl From<Range> for Constraint {
    /// Normalize a range: an empty range is `None`, a single-point range is
    /// `Exact`, a fully unconstrained range is `Any`.
    fn from(range: Range) -> Constraint {
        if range.is_empty() {
            return Constraint::None;
        }
        if let Some(point) = range.as_point() {
            return Constraint::Exact(point.clone());
        }
        if range.min().is_none() && range.max().is_none() && range.excluded().is_empty() {
            return Constraint::Any;
        }
        Constraint::Range(range)
    }
}

impl From<Version> for Constraint {
    fn from(version: Version) -> Constraint {
        Constraint::Exact(version)
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constraint::Any => write!(f, "*"),
            Constraint::None => write!(f, "none"),
            Constraint::Exact(v) => write!(f, "={}", v),
            Constraint::Range(r) => write!(f, "{}", r),
            Constraint::Union(members) => {
                let parts: Vec<String> = members.iter().map(|m| m.to_string()).collect();
                write!(f, "{}", parts.join(" || "))
            }
            Constraint::Intersection(members) => {
                let parts: Vec<String> = members.iter().map(|m| m.to_string()).collect();
                write!(f, "{}", parts.join(", "))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> Version {
        Version::new(s).unwrap()
    }

    fn sample_versions() -> Vec<Version> {
        ["0.0.1", "1.0.0", "1.2.3", "1.5.0", "2.0.0", "2.0.1", "3.0.0", "1.2.3-alpha"]
            .iter()
            .map(|s| v(s))
            .collect()
    }

    #[test]
    fn test_any_and_none() {
        for version in sample_versions() {
            assert!(Constraint::Any.satisfies(&version));
            assert!(!Constraint::None.satisfies(&version));
        }
    }

    #[test]
    fn test_exact() {
        let exact = Constraint::Exact(v("1.2.3"));
        assert!(exact.satisfies(&v("1.2.3")));
        assert!(exact.satisfies(&v("1.2.3+build")));
        assert!(!exact.satisfies(&v("1.2.4")));
        assert!(!exact.satisfies(&v("1.2.3-alpha")));
    }

    #[test]
    fn test_union_identities() {
        assert_eq!(Constraint::union([]), Constraint::None);
        assert_eq!(
            Constraint::union([Constraint::None, Constraint::None]),
            Constraint::None
        );
        assert_eq!(
            Constraint::union([Constraint::Exact(v("1.0.0")), Constraint::Any]),
            Constraint::Any
        );
        // A single surviving member is unwrapped
        assert_eq!(
            Constraint::union([Constraint::None, Constraint::Exact(v("1.0.0"))]),
            Constraint::Exact(v("1.0.0"))
        );
    }

    #[test]
    fn test_intersection_identities() {
        assert_eq!(Constraint::intersection([]), Constraint::Any);
        assert_eq!(
            Constraint::intersection([Constraint::Any, Constraint::Any]),
            Constraint::Any
        );
        assert_eq!(
            Constraint::intersection([Constraint::Exact(v("1.0.0")), Constraint::None]),
            Constraint::None
        );
        assert_eq!(
            Constraint::intersection([Constraint::Any, Constraint::Exact(v("1.0.0"))]),
            Constraint::Exact(v("1.0.0"))
        );
    }

    #[test]
    fn test_union_matches_disjunction() {
        let a = Constraint::from(Range::bounded(v("1.0.0"), true, v("2.0.0"), false));
        let b = Constraint::Exact(v("3.0.0"));
        let u = Constraint::union([a.clone(), b.clone()]);
        for version in sample_versions() {
            assert_eq!(
                u.satisfies(&version),
                a.satisfies(&version) || b.satisfies(&version),
                "version {}",
                version
            );
        }
    }

    #[test]
    fn test_intersection_matches_conjunction() {
        let a = Constraint::from(Range::at_least(v("1.0.0"), true));
        let b = Constraint::from(Range::at_most(v("2.0.0"), false));
        let i = Constraint::intersection([a.clone(), b.clone()]);
        for version in sample_versions() {
            assert_eq!(
                i.satisfies(&version),
                a.satisfies(&version) && b.satisfies(&version),
                "version {}",
                version
            );
        }
    }

    #[test]
    fn test_union_associative_commutative() {
        let a = Constraint::Exact(v("1.0.0"));
        let b = Constraint::from(Range::bounded(v("1.5.0"), true, v("2.0.0"), false));
        let c = Constraint::from(Range::at_least(v("3.0.0"), true));

        let left = Constraint::union([
            Constraint::union([a.clone(), b.clone()]),
            c.clone(),
        ]);
        let right = Constraint::union([
            a.clone(),
            Constraint::union([b.clone(), c.clone()]),
        ]);
        let reversed = Constraint::union([c, b, a]);

        for version in sample_versions() {
            let expected = left.satisfies(&version);
            assert_eq!(right.satisfies(&version), expected, "version {}", version);
            assert_eq!(reversed.satisfies(&version), expected, "version {}", version);
        }
    }

    #[test]
    fn test_disjoint_intersection_reduces_to_none() {
        let a = Constraint::from(Range::at_least(v("2.0.0"), false));
        let b = Constraint::from(Range::at_most(v("1.0.0"), false));
        assert_eq!(Constraint::intersection([a, b]), Constraint::None);
    }

    #[test]
    fn test_intersection_reduces_to_exact() {
        // >=1.0.0 and <=1.0.0 pin down a single version
        let a = Constraint::from(Range::at_least(v("1.0.0"), true));
        let b = Constraint::from(Range::at_most(v("1.0.0"), true));
        assert_eq!(
            Constraint::intersection([a, b]),
            Constraint::Exact(v("1.0.0"))
        );
    }

    #[test]
    fn test_exact_inside_range() {
        let range = Constraint::from(Range::bounded(v("1.0.0"), true, v("2.0.0"), false));
        assert_eq!(
            Constraint::intersection([range.clone(), Constraint::Exact(v("1.5.0"))]),
            Constraint::Exact(v("1.5.0"))
        );
        assert_eq!(
            Constraint::intersection([range, Constraint::Exact(v("2.5.0"))]),
            Constraint::None
        );
    }

    #[test]
    fn test_excluded_point_intersection() {
        let exclude = Constraint::from(Range::excluding(v("1.0.0")));
        assert_eq!(
            Constraint::intersection([exclude, Constraint::Exact(v("1.0.0"))]),
            Constraint::None
        );
    }

    #[test]
    fn test_union_kept_as_residual_member() {
        let neq_wild = Constraint::union([
            Constraint::from(Range::at_most(v("1.2.0"), false)),
            Constraint::from(Range::at_least(v("1.3.0"), true)),
        ]);
        let bound = Constraint::from(Range::at_least(v("1.0.0"), true));
        let combined = Constraint::intersection([neq_wild, bound]);

        assert!(combined.satisfies(&v("1.0.0")));
        assert!(combined.satisfies(&v("1.3.0")));
        assert!(!combined.satisfies(&v("1.2.5")));
        assert!(!combined.satisfies(&v("0.9.0")));
    }

    #[test]
    fn test_range_normalization() {
        assert_eq!(
            Constraint::from(Range::bounded(v("2.0.0"), true, v("1.0.0"), true)),
            Constraint::None
        );
        assert_eq!(
            Constraint::from(Range::point(v("1.2.3"))),
            Constraint::Exact(v("1.2.3"))
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(Constraint::Any.to_string(), "*");
        assert_eq!(Constraint::None.to_string(), "none");
        assert_eq!(Constraint::Exact(v("1.2.3")).to_string(), "=1.2.3");
        let u = Constraint::Union(vec![
            Constraint::Exact(v("1.2.3")),
            Constraint::Range(Range::at_least(v("2.0.0"), true)),
        ]);
        assert_eq!(u.to_string(), "=1.2.3 || >=2.0.0");
    }
}

//! Predicate vocabulary for constraint clauses

use std::fmt;

/// The comparison operator token on a constraint clause.
///
/// The symbol aliases (`=>` for `>=`, `=<` for `<=`, `~>` for `~`, a bare
/// version for `=`) collapse onto one variant each; the original spelling is
/// kept on the parsed clause, not here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Predicate {
    /// `=`, or no predicate at all
    Equal,
    /// `!=`
    NotEqual,
    /// `>`
    GreaterThan,
    /// `>=` or `=>`
    GreaterThanOrEqual,
    /// `<`
    LessThan,
    /// `<=` or `=<`
    LessThanOrEqual,
    /// `~` or `~>`
    Tilde,
    /// `^`
    Caret,
}

impl Predicate {
    /// Map a predicate symbol from the clause grammar onto its variant.
    pub fn from_symbol(symbol: &str) -> Option<Predicate> {
        match symbol {
            "" | "=" => Some(Predicate::Equal),
            "!=" => Some(Predicate::NotEqual),
            ">" => Some(Predicate::GreaterThan),
            ">=" | "=>" => Some(Predicate::GreaterThanOrEqual),
            "<" => Some(Predicate::LessThan),
            "<=" | "=<" => Some(Predicate::LessThanOrEqual),
            "~" | "~>" => Some(Predicate::Tilde),
            "^" => Some(Predicate::Caret),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Predicate::Equal => "=",
            Predicate::NotEqual => "!=",
            Predicate::GreaterThan => ">",
            Predicate::GreaterThanOrEqual => ">=",
            Predicate::LessThan => "<",
            Predicate::LessThanOrEqual => "<=",
            Predicate::Tilde => "~",
            Predicate::Caret => "^",
        }
    }

    /// The failure-message template for `validate`, formatted with the
    /// version under test and the clause's original text.
    ///
    /// `wildcard` reports whether the clause's version pattern contained a
    /// wildcard component; an equality clause with a wildcard behaves like a
    /// tilde clause and fails with the tilde wording.
    pub(crate) fn failure_message(&self, wildcard: bool) -> &'static str {
        match self {
            Predicate::Equal if wildcard => Predicate::Tilde.failure_message(false),
            Predicate::Equal => "{} is not equal to {}",
            Predicate::NotEqual => "{} is equal to {}",
            Predicate::GreaterThan => "{} is less than or equal to {}",
            Predicate::GreaterThanOrEqual => "{} is less than {}",
            Predicate::LessThan => "{} is greater than or equal to {}",
            Predicate::LessThanOrEqual => "{} is greater than {}",
            Predicate::Tilde => "{} does not have same major and minor version as {}",
            Predicate::Caret => "{} does not have same major version as {}",
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_symbol() {
        assert_eq!(Predicate::from_symbol(""), Some(Predicate::Equal));
        assert_eq!(Predicate::from_symbol("="), Some(Predicate::Equal));
        assert_eq!(Predicate::from_symbol("!="), Some(Predicate::NotEqual));
        assert_eq!(Predicate::from_symbol(">"), Some(Predicate::GreaterThan));
        assert_eq!(Predicate::from_symbol(">="), Some(Predicate::GreaterThanOrEqual));
        assert_eq!(Predicate::from_symbol("=>"), Some(Predicate::GreaterThanOrEqual));
        assert_eq!(Predicate::from_symbol("<"), Some(Predicate::LessThan));
        assert_eq!(Predicate::from_symbol("<="), Some(Predicate::LessThanOrEqual));
        assert_eq!(Predicate::from_symbol("=<"), Some(Predicate::LessThanOrEqual));
        assert_eq!(Predicate::from_symbol("~"), Some(Predicate::Tilde));
        assert_eq!(Predicate::from_symbol("~>"), Some(Predicate::Tilde));
        assert_eq!(Predicate::from_symbol("^"), Some(Predicate::Caret));
        assert_eq!(Predicate::from_symbol(">>"), None);
    }

    #[test]
    fn test_equality_wildcard_uses_tilde_message() {
        assert_eq!(
            Predicate::Equal.failure_message(true),
            Predicate::Tilde.failure_message(false)
        );
        assert_ne!(
            Predicate::Equal.failure_message(false),
            Predicate::Equal.failure_message(true)
        );
    }
}

//! Composable match predicates over indexed attributes.
//!
//! All comparisons are case-insensitive text comparisons. A missing attribute never
//! satisfies an atomic test, which is what makes a negated field match items that lack
//! the attribute entirely.

use crate::model::Item;
use serde::Serialize;

/// Anything exposing per-field indexed attributes.
pub trait Indexed {
    fn indexed(&self, field: &str) -> Option<&str>;
}

impl Indexed for Item {
    fn indexed(&self, field: &str) -> Option<&str> {
        self.attr(field)
    }
}

impl Indexed for std::collections::BTreeMap<String, String> {
    fn indexed(&self, field: &str) -> Option<&str> {
        self.get(field).map(String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum Predicate {
    /// Matches everything.
    All,
    /// The field's attribute contains `word`. `word` is stored lowercased.
    Contains { field: String, word: String },
    /// The field's attribute equals `value`. `value` is stored lowercased.
    Equals { field: String, value: String },
    And { all: Vec<Predicate> },
    Not { inner: Box<Predicate> },
}

impl Predicate {
    pub fn contains(field: impl Into<String>, word: &str) -> Self {
        Predicate::Contains {
            field: field.into(),
            word: word.to_lowercase(),
        }
    }

    pub fn equals(field: impl Into<String>, value: &str) -> Self {
        Predicate::Equals {
            field: field.into(),
            value: value.to_lowercase(),
        }
    }

    /// Conjunction that drops `All` members and unwraps single members.
    pub fn and(predicates: Vec<Predicate>) -> Self {
        let mut all: Vec<Predicate> = predicates.into_iter().filter(|p| !p.is_all()).collect();
        match all.len() {
            0 => Predicate::All,
            1 => all.remove(0),
            _ => Predicate::And { all },
        }
    }

    pub fn negate(predicate: Predicate) -> Self {
        match predicate {
            Predicate::Not { inner } => *inner,
            other => Predicate::Not {
                inner: Box::new(other),
            },
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Predicate::All)
    }

    pub fn matches<I: Indexed + ?Sized>(&self, item: &I) -> bool {
        match self {
            Predicate::All => true,
            Predicate::Contains { field, word } => item
                .indexed(field)
                .is_some_and(|attr| attr.to_lowercase().contains(word.as_str())),
            Predicate::Equals { field, value } => item
                .indexed(field)
                .is_some_and(|attr| attr.to_lowercase() == *value),
            Predicate::And { all } => all.iter().all(|p| p.matches(item)),
            Predicate::Not { inner } => !inner.matches(item),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(attr: &str, value: &str) -> Item {
        Item::new("").with_attr(attr, value)
    }

    #[test]
    fn test_all_matches_anything() {
        assert!(Predicate::All.matches(&Item::new("x")));
    }

    #[test]
    fn test_contains_is_case_insensitive() {
        let p = Predicate::contains("title", "RED");
        assert!(p.matches(&item("title", "Large red box")));
        assert!(!p.matches(&item("title", "blue")));
        assert!(!p.matches(&Item::new("red")));
    }

    #[test]
    fn test_equals_is_whole_value() {
        let p = Predicate::equals("kind", "Cat");
        assert!(p.matches(&item("kind", "cat")));
        assert!(!p.matches(&item("kind", "category")));
    }

    #[test]
    fn test_negation_matches_missing_attribute() {
        let p = Predicate::negate(Predicate::contains("status", "urgent"));
        assert!(p.matches(&Item::new("")));
        assert!(p.matches(&item("status", "open")));
        assert!(!p.matches(&item("status", "open urgent")));
    }

    #[test]
    fn test_and_simplifies() {
        assert_eq!(Predicate::and(vec![]), Predicate::All);
        assert_eq!(
            Predicate::and(vec![Predicate::All, Predicate::contains("a", "x")]),
            Predicate::contains("a", "x")
        );
    }

    #[test]
    fn test_double_negation_unwraps() {
        let p = Predicate::contains("a", "x");
        assert_eq!(Predicate::negate(Predicate::negate(p.clone())), p);
    }
}

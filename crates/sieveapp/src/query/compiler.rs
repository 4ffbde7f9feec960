//! # Query Compiler
//!
//! Turns a [`Snapshot`] into one composite [`Predicate`].
//!
//! ## Per-field Compilation
//!
//! 1. Split the value on whitespace into words.
//! 2. One atomic test per word: "the attribute for this field contains the word".
//!    - `exact`: a single test "the attribute equals the whole value" instead.
//!    - `fuzzy`: forces word splitting, even when `exact` is also set.
//! 3. AND the atomic tests: an item must contain **every** word.
//! 4. `not`: negate the field's contribution. Items without the attribute satisfy the
//!    negation.
//!
//! ## Composition
//!
//! Field contributions are ANDed. An empty snapshot compiles to [`Predicate::All`].
//!
//! Negation applies per encoded entry: `status:not` negates only its own words and
//! leaves a sibling `status` entry untouched.
//!
//! ## Highlights
//!
//! Fields flagged `hilite` additionally expose their atomic tests as a [`Highlight`],
//! without AND or negation. They still take part in filtering like any other field.
//!
//! ## Rejected Fields
//!
//! A field whose base name fails [validation](crate::fields::validation) is left out
//! of the composite and reported in [`CompiledQuery::rejected`]. The other fields still
//! compile.

use super::predicate::{Indexed, Predicate};
use crate::fields::{validate_field_name, FieldEntry, FieldFlag, FieldNameError, Snapshot};
use crate::fields::DEFAULT_DELIMITER;
use serde::Serialize;

/// The compiled contribution of one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldQuery {
    pub field: String,
    pub raw_name: String,
    pub predicate: Predicate,
    pub highlight: Option<Highlight>,
}

/// Per-word atomic tests of a `hilite` field. An item is marked when any term matches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Highlight {
    pub field: String,
    pub terms: Vec<Predicate>,
}

impl Highlight {
    pub fn matches<I: Indexed + ?Sized>(&self, item: &I) -> bool {
        self.terms.iter().any(|t| t.matches(item))
    }

    /// The lowercased words (or whole values) this highlight looks for.
    pub fn needles(&self) -> Vec<&str> {
        self.terms
            .iter()
            .filter_map(|t| match t {
                Predicate::Contains { word, .. } => Some(word.as_str()),
                Predicate::Equals { value, .. } => Some(value.as_str()),
                _ => None,
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RejectedField {
    pub raw_name: String,
    #[serde(serialize_with = "serialize_display")]
    pub error: FieldNameError,
}

fn serialize_display<S: serde::Serializer>(
    error: &FieldNameError,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_str(error)
}

/// Everything a filter pass needs from one snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompiledQuery {
    pub predicate: Predicate,
    pub fields: Vec<FieldQuery>,
    pub highlights: Vec<Highlight>,
    pub rejected: Vec<RejectedField>,
}

impl CompiledQuery {
    pub fn matches<I: Indexed + ?Sized>(&self, item: &I) -> bool {
        self.predicate.matches(item)
    }

    pub fn is_unfiltered(&self) -> bool {
        self.predicate.is_all()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryCompiler {
    delimiter: char,
}

impl Default for QueryCompiler {
    fn default() -> Self {
        Self::new(DEFAULT_DELIMITER)
    }
}

impl QueryCompiler {
    pub fn new(delimiter: char) -> Self {
        Self { delimiter }
    }

    pub fn compile_field(&self, entry: &FieldEntry) -> Result<FieldQuery, FieldNameError> {
        validate_field_name(&entry.name, self.delimiter)?;

        let value = entry.value.trim();
        let exact = entry.has_flag(FieldFlag::Exact) && !entry.has_flag(FieldFlag::Fuzzy);

        let terms: Vec<Predicate> = if value.is_empty() {
            Vec::new()
        } else if exact {
            vec![Predicate::equals(&entry.name, value)]
        } else {
            entry
                .words()
                .map(|word| Predicate::contains(&entry.name, word))
                .collect()
        };

        if terms.is_empty() {
            return Ok(FieldQuery {
                field: entry.name.clone(),
                raw_name: entry.raw_name.clone(),
                predicate: Predicate::All,
                highlight: None,
            });
        }

        let highlight = entry.has_flag(FieldFlag::Hilite).then(|| Highlight {
            field: entry.name.clone(),
            terms: terms.clone(),
        });

        let all_words = Predicate::and(terms);
        let predicate = if entry.has_flag(FieldFlag::Not) {
            Predicate::negate(all_words)
        } else {
            all_words
        };

        Ok(FieldQuery {
            field: entry.name.clone(),
            raw_name: entry.raw_name.clone(),
            predicate,
            highlight,
        })
    }

    pub fn compile_snapshot(&self, snapshot: &Snapshot) -> CompiledQuery {
        let mut fields = Vec::with_capacity(snapshot.len());
        let mut rejected = Vec::new();

        for entry in snapshot {
            match self.compile_field(entry) {
                Ok(query) => fields.push(query),
                Err(error) => {
                    tracing::warn!(field = %entry.raw_name, %error, "dropping field from query");
                    rejected.push(RejectedField {
                        raw_name: entry.raw_name.clone(),
                        error,
                    });
                }
            }
        }

        let predicate = Predicate::and(fields.iter().map(|f| f.predicate.clone()).collect());
        let highlights = fields.iter().filter_map(|f| f.highlight.clone()).collect();

        CompiledQuery {
            predicate,
            fields,
            highlights,
            rejected,
        }
    }
}

pub fn compile_field(entry: &FieldEntry) -> Result<FieldQuery, FieldNameError> {
    QueryCompiler::default().compile_field(entry)
}

pub fn compile_snapshot(snapshot: &Snapshot) -> CompiledQuery {
    QueryCompiler::default().compile_snapshot(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Item;

    fn indexed(field: &str, value: &str) -> Item {
        Item::new("").with_attr(field, value)
    }

    #[test]
    fn test_all_words_must_match() {
        let query = compile_field(&FieldEntry::new("title", "red large")).unwrap();

        assert!(query.predicate.matches(&indexed("title", "large red box")));
        assert!(!query.predicate.matches(&indexed("title", "large")));
    }

    #[test]
    fn test_exact_vs_substring() {
        let exact = compile_field(&FieldEntry::new("kind", "cat").with_flag(FieldFlag::Exact))
            .unwrap();
        let loose = compile_field(&FieldEntry::new("kind", "cat")).unwrap();

        assert!(exact.predicate.matches(&indexed("kind", "cat")));
        assert!(!exact.predicate.matches(&indexed("kind", "category")));
        assert!(loose.predicate.matches(&indexed("kind", "cat")));
        assert!(loose.predicate.matches(&indexed("kind", "category")));
    }

    #[test]
    fn test_exact_takes_value_whole() {
        let query =
            compile_field(&FieldEntry::new("title", "big cat").with_flag(FieldFlag::Exact))
                .unwrap();
        assert_eq!(query.predicate, Predicate::equals("title", "big cat"));
        assert!(!query.predicate.matches(&indexed("title", "cat big")));
    }

    #[test]
    fn test_fuzzy_overrides_exact() {
        let entry = FieldEntry::new("title", "big cat")
            .with_flag(FieldFlag::Exact)
            .with_flag(FieldFlag::Fuzzy);
        let query = compile_field(&entry).unwrap();
        assert!(query.predicate.matches(&indexed("title", "cat big")));
    }

    #[test]
    fn test_not_negates_whole_field() {
        let query =
            compile_field(&FieldEntry::new("status", "open urgent").with_flag(FieldFlag::Not))
                .unwrap();

        assert!(!query.predicate.matches(&indexed("status", "urgent open")));
        assert!(query.predicate.matches(&indexed("status", "urgent")));
        assert!(query.predicate.matches(&Item::new("no attribute")));
    }

    #[test]
    fn test_empty_snapshot_matches_everything() {
        let compiled = compile_snapshot(&Snapshot::default());
        assert!(compiled.is_unfiltered());
        assert!(compiled.matches(&Item::new("anything")));
    }

    #[test]
    fn test_fields_are_anded() {
        let snapshot: Snapshot = vec![
            FieldEntry::new("color", "red"),
            FieldEntry::new("size", "large"),
        ]
        .into_iter()
        .collect();
        let compiled = compile_snapshot(&snapshot);

        let both = Item::new("")
            .with_attr("color", "red")
            .with_attr("size", "large");
        assert!(compiled.matches(&both));
        assert!(!compiled.matches(&indexed("color", "red")));
    }

    #[test]
    fn test_hilite_exposes_atomic_terms() {
        let entry = FieldEntry::new("title", "red box").with_flag(FieldFlag::Hilite);
        let compiled = compile_snapshot(&Snapshot::new(vec![entry]));

        assert_eq!(compiled.highlights.len(), 1);
        let highlight = &compiled.highlights[0];
        assert_eq!(highlight.needles(), vec!["red", "box"]);
        // marking is any-word, filtering is all-words
        assert!(highlight.matches(&indexed("title", "red car")));
        assert!(!compiled.matches(&indexed("title", "red car")));
    }

    #[test]
    fn test_invalid_field_is_rejected_without_aborting() {
        let snapshot = Snapshot::new(vec![
            FieldEntry::new("", "x").with_flag(FieldFlag::Not),
            FieldEntry::new("color", "red"),
        ]);
        let compiled = compile_snapshot(&snapshot);

        assert_eq!(compiled.rejected.len(), 1);
        assert_eq!(compiled.rejected[0].error, FieldNameError::Empty);
        assert_eq!(compiled.predicate, Predicate::contains("color", "red"));
    }

    #[test]
    fn test_custom_delimiter_is_validated() {
        let compiler = QueryCompiler::new('|');
        assert!(compiler.compile_field(&FieldEntry::new("a|b", "x")).is_err());
        assert!(compiler.compile_field(&FieldEntry::new("a:b", "x")).is_ok());
    }
}

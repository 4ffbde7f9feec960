//! # Fields and Flags
//!
//! A field is one named, valued criterion read from a field source. Field names may
//! carry modifier flags encoded as delimiter-separated suffixes:
//!
//! | Raw name | Base name | Flags |
//! |----------|-----------|-------|
//! | `status` | `status` | none |
//! | `status:not` | `status` | `Not` |
//! | `title:exact` | `title` | `Exact` |
//! | `title:exact:fuzzy` | `title` | `Exact`, `Fuzzy` |
//! | `tags:hi` | `tags` | `Hilite` |
//!
//! Encoded names are split **once**, by the [`reader`], into a base name and a typed
//! [`FieldFlags`] set. Nothing downstream looks at the raw suffixes again.
//!
//! Unknown flags are dropped (and logged at debug level) so that newer flag names do
//! not break older engines.
//!
//! ## Flag Aliases
//!
//! - `fuzzy` and `includes` both map to [`FieldFlag::Fuzzy`]
//! - `hilite`, `hi` and `highlight` all map to [`FieldFlag::Hilite`]

pub mod reader;
pub mod validation;

use crate::model::{ControlId, Form};
use serde::Serialize;

pub use reader::{read, ReadOptions};
pub use validation::{validate_field_name, FieldNameError};

/// Separator between a base field name and its flags.
pub const DEFAULT_DELIMITER: char = ':';

/// A modifier changing how a field compiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldFlag {
    /// Negate the whole field.
    Not,
    /// Compare the whole value for equality instead of word containment.
    Exact,
    /// Force word splitting, overriding `Exact`.
    Fuzzy,
    /// Mark matching items, independent of filtering.
    Hilite,
}

impl FieldFlag {
    pub const ALL: [FieldFlag; 4] = [
        FieldFlag::Not,
        FieldFlag::Exact,
        FieldFlag::Fuzzy,
        FieldFlag::Hilite,
    ];

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "not" => Some(FieldFlag::Not),
            "exact" => Some(FieldFlag::Exact),
            "fuzzy" | "includes" => Some(FieldFlag::Fuzzy),
            "hilite" | "hi" | "highlight" => Some(FieldFlag::Hilite),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FieldFlag::Not => "not",
            FieldFlag::Exact => "exact",
            FieldFlag::Fuzzy => "fuzzy",
            FieldFlag::Hilite => "hilite",
        }
    }

    const fn bit(self) -> u8 {
        match self {
            FieldFlag::Not => 1,
            FieldFlag::Exact => 1 << 1,
            FieldFlag::Fuzzy => 1 << 2,
            FieldFlag::Hilite => 1 << 3,
        }
    }
}

impl std::fmt::Display for FieldFlag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A set of [`FieldFlag`]s.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct FieldFlags(u8);

impl FieldFlags {
    pub const fn empty() -> Self {
        Self(0)
    }

    pub fn with(mut self, flag: FieldFlag) -> Self {
        self.insert(flag);
        self
    }

    pub fn insert(&mut self, flag: FieldFlag) {
        self.0 |= flag.bit();
    }

    pub fn contains(self, flag: FieldFlag) -> bool {
        self.0 & flag.bit() != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn iter(self) -> impl Iterator<Item = FieldFlag> {
        FieldFlag::ALL.into_iter().filter(move |f| self.contains(*f))
    }
}

impl FromIterator<FieldFlag> for FieldFlags {
    fn from_iter<T: IntoIterator<Item = FieldFlag>>(iter: T) -> Self {
        iter.into_iter().fold(Self::empty(), Self::with)
    }
}

impl Serialize for FieldFlags {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

/// The result of splitting an encoded field name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedName {
    pub base: String,
    pub flags: FieldFlags,
    pub unknown: Vec<String>,
}

/// Splits `raw` into a base name and flags.
///
/// Empty suffixes (`a::not`) are skipped. The base name is returned as written, even
/// when empty; validation happens at compile time.
pub fn parse_field_name(raw: &str, delimiter: char) -> ParsedName {
    let mut parts = raw.split(delimiter);
    let base = parts.next().unwrap_or_default().trim().to_string();
    let mut flags = FieldFlags::empty();
    let mut unknown = Vec::new();

    for part in parts.map(str::trim).filter(|p| !p.is_empty()) {
        match FieldFlag::parse(part) {
            Some(flag) => flags.insert(flag),
            None => unknown.push(part.to_string()),
        }
    }

    ParsedName {
        base,
        flags,
        unknown,
    }
}

/// One criterion of a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldEntry {
    /// Base field name, flags removed.
    pub name: String,
    /// Trimmed, non-empty value.
    pub value: String,
    pub flags: FieldFlags,
    /// The name as it appeared in the field source.
    pub raw_name: String,
}

impl FieldEntry {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            raw_name: name.clone(),
            name,
            value: value.into(),
            flags: FieldFlags::empty(),
        }
    }

    pub fn with_flag(mut self, flag: FieldFlag) -> Self {
        self.flags.insert(flag);
        self.raw_name = format!("{}{}{}", self.raw_name, DEFAULT_DELIMITER, flag);
        self
    }

    pub fn has_flag(&self, flag: FieldFlag) -> bool {
        self.flags.contains(flag)
    }

    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.value.split_whitespace()
    }
}

/// An ordered, per-pass view of every field contributing a value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Snapshot {
    entries: Vec<FieldEntry>,
}

impl Snapshot {
    pub fn new(entries: Vec<FieldEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[FieldEntry] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FieldEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, raw_name: &str) -> Option<&FieldEntry> {
        self.entries.iter().find(|e| e.raw_name == raw_name)
    }
}

impl FromIterator<FieldEntry> for Snapshot {
    fn from_iter<T: IntoIterator<Item = FieldEntry>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Snapshot {
    type Item = &'a FieldEntry;
    type IntoIter = std::slice::Iter<'a, FieldEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Anything that can supply raw `(name, value)` field pairs.
pub trait FieldSource {
    /// Current pairs, in source order. Repeated names are allowed.
    fn entries(&self) -> Vec<(String, String)>;

    /// Whether the control belongs to this source.
    fn owns(&self, control: ControlId) -> bool;
}

impl FieldSource for Form {
    fn entries(&self) -> Vec<(String, String)> {
        self.controls
            .iter()
            .filter(|c| c.contributes())
            .map(|c| (c.name.clone(), c.value.clone()))
            .collect()
    }

    fn owns(&self, control: ControlId) -> bool {
        self.control(control).is_some()
    }
}

impl FieldSource for [(&str, &str)] {
    fn entries(&self) -> Vec<(String, String)> {
        self.iter()
            .map(|(n, v)| (n.to_string(), v.to_string()))
            .collect()
    }

    fn owns(&self, _control: ControlId) -> bool {
        false
    }
}

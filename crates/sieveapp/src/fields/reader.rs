//! Field snapshot reader.
//!
//! Converts a [`FieldSource`] into a [`Snapshot`]:
//!
//! 1. Pairs with empty or whitespace-only values are dropped.
//! 2. Raw names are split into base name and flags.
//! 3. `include` keeps only the listed base names, then `exclude` drops the listed ones.
//! 4. Pairs sharing a raw name are merged into one entry, values space-joined, at the
//!    position of the first occurrence. `status` and `status:not` stay separate entries.

use super::{parse_field_name, FieldEntry, FieldSource, Snapshot, DEFAULT_DELIMITER};
use std::collections::HashMap;

/// Allow-list and deny-list of base field names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadOptions {
    pub include: Option<Vec<String>>,
    pub exclude: Option<Vec<String>>,
    pub delimiter: char,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            include: None,
            exclude: None,
            delimiter: DEFAULT_DELIMITER,
        }
    }
}

impl ReadOptions {
    pub fn include<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.include = Some(names.into_iter().map(Into::into).collect());
        self
    }

    pub fn exclude<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude = Some(names.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Whether a base field name passes the include/exclude lists.
    pub fn allows(&self, base: &str) -> bool {
        if let Some(include) = &self.include {
            if !include.iter().any(|n| n == base) {
                return false;
            }
        }
        if let Some(exclude) = &self.exclude {
            if exclude.iter().any(|n| n == base) {
                return false;
            }
        }
        true
    }
}

pub fn read<S: FieldSource + ?Sized>(source: &S, options: &ReadOptions) -> Snapshot {
    let mut entries: Vec<FieldEntry> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();

    for (raw_name, value) in source.entries() {
        let value = value.trim();
        if value.is_empty() {
            continue;
        }

        if let Some(&pos) = positions.get(&raw_name) {
            let entry = &mut entries[pos];
            entry.value.push(' ');
            entry.value.push_str(value);
            continue;
        }

        let parsed = parse_field_name(&raw_name, options.delimiter);
        if !options.allows(&parsed.base) {
            continue;
        }
        for flag in &parsed.unknown {
            tracing::debug!(field = %raw_name, flag = %flag, "ignoring unknown field flag");
        }

        positions.insert(raw_name.clone(), entries.len());
        entries.push(FieldEntry {
            name: parsed.base,
            value: value.to_string(),
            flags: parsed.flags,
            raw_name,
        });
    }

    Snapshot::new(entries)
}

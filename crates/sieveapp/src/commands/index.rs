//! Attribute indexer.
//!
//! Copies each direct child's text content into `attributes[field]` so the matcher can
//! run attribute tests against plain text. The stored value is trimmed with inner
//! whitespace runs collapsed to a single space. Both modes are idempotent.
//!
//! [`activate`] and [`deactivate`] are the component's index transitions. Activation
//! records each item's prior value in an [`IndexStash`], and deactivation puts it back,
//! so an author-supplied attribute of the same name survives an on/off cycle.

use crate::error::{Result, SieveError};
use crate::model::{Collection, ItemId};
use crate::store::DocumentStore;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexMode {
    Add,
    Remove,
}

pub fn normalize_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Indexes (or un-indexes) `field` on every direct child and returns how many children
/// changed.
pub fn index_collection(collection: &mut Collection, field: &str, mode: IndexMode) -> usize {
    let mut changed = 0;
    for item in &mut collection.items {
        match mode {
            IndexMode::Add => {
                let text = normalize_text(&item.text_content());
                if item.attr(field) != Some(text.as_str()) {
                    item.attributes.insert(field.to_string(), text);
                    changed += 1;
                }
            }
            IndexMode::Remove => {
                if item.attributes.remove(field).is_some() {
                    changed += 1;
                }
            }
        }
    }
    changed
}

/// Values an activation replaced, keyed by item. `None` means the item had no value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexStash {
    prior: HashMap<ItemId, Option<String>>,
}

impl IndexStash {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.prior.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prior.is_empty()
    }
}

/// Writes the derived value of `field` on every direct child, stashing what was there.
/// Items already in the stash keep their first recorded value.
pub fn activate(collection: &mut Collection, field: &str, stash: &mut IndexStash) -> usize {
    for item in &collection.items {
        stash
            .prior
            .entry(item.id)
            .or_insert_with(|| item.attributes.get(field).cloned());
    }
    index_collection(collection, field, IndexMode::Add)
}

/// Restores the stashed value of `field` on every direct child that [`activate`]
/// touched. Items it never touched are left alone.
pub fn deactivate(collection: &mut Collection, field: &str, stash: &mut IndexStash) -> usize {
    let mut changed = 0;
    for item in &mut collection.items {
        let Some(prior) = stash.prior.remove(&item.id) else {
            continue;
        };
        let current = item.attributes.get(field);
        if current == prior.as_ref() {
            continue;
        }
        match prior {
            Some(value) => {
                item.attributes.insert(field.to_string(), value);
            }
            None => {
                item.attributes.remove(field);
            }
        }
        changed += 1;
    }
    changed
}

/// Runs [`activate`] (`Add`) or [`deactivate`] (`Remove`) over the named targets.
pub fn transition<S: DocumentStore + ?Sized>(
    store: &mut S,
    targets: &[String],
    field: &str,
    mode: IndexMode,
    stash: &mut IndexStash,
) -> Result<usize> {
    let document = store.document_mut();
    let mut changed = 0;
    for target in targets {
        let collection = document
            .collection_mut(target)
            .ok_or_else(|| SieveError::TargetNotFound(target.clone()))?;
        changed += match mode {
            IndexMode::Add => activate(collection, field, stash),
            IndexMode::Remove => deactivate(collection, field, stash),
        };
    }
    tracing::debug!(field, ?mode, changed, stashed = stash.len(), "index transition");
    Ok(changed)
}

/// Runs the indexer over the named targets of the store's document.
pub fn run<S: DocumentStore + ?Sized>(
    store: &mut S,
    targets: &[String],
    field: &str,
    mode: IndexMode,
) -> Result<usize> {
    let document = store.document_mut();
    let mut changed = 0;
    for target in targets {
        let collection = document
            .collection_mut(target)
            .ok_or_else(|| SieveError::TargetNotFound(target.clone()))?;
        changed += index_collection(collection, field, mode);
    }
    tracing::debug!(field, ?mode, changed, "indexed targets");
    Ok(changed)
}

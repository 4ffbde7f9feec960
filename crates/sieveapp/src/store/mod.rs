//! # Storage Layer
//!
//! The [`DocumentStore`] trait gives commands access to the host [`Document`]: the forms
//! that supply field values and the collections that get filtered.
//!
//! ## What Gets Stored
//!
//! Only host state. Filter state (snapshots, compiled queries) is never persisted; it is
//! recomputed on every pass. The durable effects of a pass are the `hidden` flags and,
//! while an index is active, the indexed attributes.
//!
//! ## Implementations
//!
//! - [`fs::FileStore`]: a JSON document on disk, saved atomically
//! - [`memory::InMemoryStore`]: for testing logic without filesystem I/O
//!
//! ## Storage Layout
//!
//! ```text
//! document.json
//! {
//!   "forms":       [{ "name", "owner"?, "controls": [...] }],
//!   "collections": [{ "id", "items": [{ "id"?, "text", "attributes", "hidden"?, "children"? }] }]
//! }
//! ```

use crate::error::Result;
use crate::model::Document;

pub mod fs;
pub mod memory;

pub trait DocumentStore {
    fn document(&self) -> &Document;

    fn document_mut(&mut self) -> &mut Document;

    /// Persists the current document. A no-op for stores without a backing file.
    fn save(&mut self) -> Result<()>;

    /// Ids of live collections for `ids`, falling back to `host` when `ids` is empty.
    fn resolve_targets(&self, ids: &[String], host: Option<&str>) -> Vec<String> {
        self.document().resolve_targets(ids, host)
    }
}

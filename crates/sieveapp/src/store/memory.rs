use super::DocumentStore;
use crate::error::Result;
use crate::model::Document;

#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    document: Document,
    saves: usize,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(document: Document) -> Self {
        Self { document, saves: 0 }
    }

    /// How many times [`DocumentStore::save`] was called.
    pub fn save_count(&self) -> usize {
        self.saves
    }
}

impl DocumentStore for InMemoryStore {
    fn document(&self) -> &Document {
        &self.document
    }

    fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    fn save(&mut self) -> Result<()> {
        self.saves += 1;
        Ok(())
    }
}

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::*;
    use crate::model::{Collection, Control, Form, Item, ItemId};

    pub struct DocumentFixture {
        pub store: InMemoryStore,
    }

    impl Default for DocumentFixture {
        fn default() -> Self {
            Self::new()
        }
    }

    impl DocumentFixture {
        pub fn new() -> Self {
            Self {
                store: InMemoryStore::new(),
            }
        }

        pub fn with_form(mut self, form: Form) -> Self {
            self.store.document.forms.push(form);
            self
        }

        /// A form named `name` with one empty text control per field name.
        pub fn with_text_form(self, name: &str, fields: &[&str]) -> Self {
            let form = fields
                .iter()
                .fold(Form::new(name), |form, field| form.with_control(Control::new(*field, "")));
            self.with_form(form)
        }

        pub fn with_collection(mut self, collection: Collection) -> Self {
            self.store.document.collections.push(collection);
            self
        }

        /// A collection of plain-text items, not indexed.
        pub fn with_texts(self, id: &str, texts: &[&str]) -> Self {
            let collection = texts
                .iter()
                .fold(Collection::new(id), |c, text| c.with_item(Item::new(*text)));
            self.with_collection(collection)
        }

        /// A collection whose items carry `field` = each value, already indexed.
        pub fn with_indexed(self, id: &str, field: &str, values: &[&str]) -> Self {
            let collection = values.iter().fold(Collection::new(id), |c, value| {
                c.with_item(Item::new(*value).with_attr(field, *value))
            });
            self.with_collection(collection)
        }

        pub fn item_ids(&self, collection: &str) -> Vec<ItemId> {
            self.store
                .document
                .collection(collection)
                .map(|c| c.items.iter().map(|i| i.id).collect())
                .unwrap_or_default()
        }

        pub fn build(self) -> InMemoryStore {
            self.store
        }
    }
}

//! # Domain Model: Documents, Forms and Collections
//!
//! This module defines the host-side data sieve operates on. A [`Document`] holds the
//! [`Form`]s that supply field values and the [`Collection`]s whose direct children are
//! shown or hidden.
//!
//! ## Identity
//!
//! Items and controls are addressed by identity ([`ItemId`], [`ControlId`]), never by
//! position. Documents loaded from JSON without ids get fresh v4 UUIDs, so two loads of
//! the same file produce different ids. Hosts that need stable ids must store them.
//!
//! ## Items and Text Content
//!
//! An [`Item`] is the unit of show/hide. Its `children` are nested content only: they
//! contribute to [`Item::text_content`] but are never filtered themselves.
//!
//! ## Form Data Semantics
//!
//! A [`Control`] contributes a `(name, value)` pair the way an HTML form would:
//! - disabled controls and unnamed controls contribute nothing
//! - checkboxes and radios contribute only while checked
//! - every other kind always contributes its current value

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub Uuid);

impl ItemId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ItemId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ControlId(pub Uuid);

impl ControlId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ControlId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ControlId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ControlKind {
    #[default]
    Text,
    Search,
    Select,
    Checkbox,
    Radio,
    Hidden,
}

impl ControlKind {
    pub fn is_checkable(self) -> bool {
        matches!(self, ControlKind::Checkbox | ControlKind::Radio)
    }
}

/// A single input of a form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Control {
    #[serde(default)]
    pub id: ControlId,
    pub name: String,
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub kind: ControlKind,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub checked: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub disabled: bool,
}

impl Control {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            id: ControlId::new(),
            name: name.into(),
            value: value.into(),
            kind: ControlKind::Text,
            checked: false,
            disabled: false,
        }
    }

    pub fn checkbox(name: impl Into<String>, value: impl Into<String>, checked: bool) -> Self {
        Self {
            kind: ControlKind::Checkbox,
            checked,
            ..Self::new(name, value)
        }
    }

    pub fn radio(name: impl Into<String>, value: impl Into<String>, checked: bool) -> Self {
        Self {
            kind: ControlKind::Radio,
            checked,
            ..Self::new(name, value)
        }
    }

    /// Whether this control currently contributes a `(name, value)` pair.
    pub fn contributes(&self) -> bool {
        if self.disabled || self.name.is_empty() {
            return false;
        }
        !self.kind.is_checkable() || self.checked
    }
}

/// A named field source.
///
/// `owner` is the id of the collection the form is nested in, if any. It is used to
/// find a component's own form when none is configured by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Form {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    #[serde(default)]
    pub controls: Vec<Control>,
}

impl Form {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            owner: None,
            controls: Vec::new(),
        }
    }

    pub fn owned_by(mut self, collection: impl Into<String>) -> Self {
        self.owner = Some(collection.into());
        self
    }

    pub fn with_control(mut self, control: Control) -> Self {
        self.controls.push(control);
        self
    }

    pub fn control(&self, id: ControlId) -> Option<&Control> {
        self.controls.iter().find(|c| c.id == id)
    }

    /// Applies a user input the way a browser would.
    ///
    /// A checkable control named `name` whose value equals `value` becomes checked (a
    /// radio unchecks its siblings). Otherwise the first non-checkable control named
    /// `name` takes `value`. Returns the id of the control that changed.
    pub fn apply_input(&mut self, name: &str, value: &str) -> Option<ControlId> {
        let checkable = self
            .controls
            .iter()
            .position(|c| c.name == name && c.kind.is_checkable() && c.value == value);

        if let Some(pos) = checkable {
            if self.controls[pos].kind == ControlKind::Radio {
                for control in self
                    .controls
                    .iter_mut()
                    .filter(|c| c.name == name && c.kind == ControlKind::Radio)
                {
                    control.checked = false;
                }
            }
            let control = &mut self.controls[pos];
            control.checked = true;
            return Some(control.id);
        }

        let control = self
            .controls
            .iter_mut()
            .find(|c| c.name == name && !c.kind.is_checkable())?;
        control.value = value.to_string();
        Some(control.id)
    }

    /// Like [`Form::apply_input`], but appends a text control when none named `name`
    /// takes the value.
    pub fn set_field(&mut self, name: &str, value: &str) -> ControlId {
        if let Some(id) = self.apply_input(name, value) {
            return id;
        }
        let control = Control::new(name, value);
        let id = control.id;
        self.controls.push(control);
        id
    }
}

/// The unit of show/hide: a direct child of a [`Collection`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    #[serde(default)]
    pub id: ItemId,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub hidden: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Item>,
}

impl Item {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: ItemId::new(),
            text: text.into(),
            attributes: BTreeMap::new(),
            hidden: false,
            children: Vec::new(),
        }
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn with_child(mut self, child: Item) -> Self {
        self.children.push(child);
        self
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Own text followed by the text of every descendant, depth first, space separated.
    pub fn text_content(&self) -> String {
        let mut parts = Vec::new();
        collect_text(self, &mut parts);
        parts.join(" ")
    }
}

fn collect_text<'a>(item: &'a Item, parts: &mut Vec<&'a str>) {
    if !item.text.is_empty() {
        parts.push(&item.text);
    }
    for child in &item.children {
        collect_text(child, parts);
    }
}

/// A filter target: an identified, flat list of items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collection {
    pub id: String,
    #[serde(default)]
    pub items: Vec<Item>,
}

impl Collection {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            items: Vec::new(),
        }
    }

    pub fn with_item(mut self, item: Item) -> Self {
        self.items.push(item);
        self
    }

    pub fn item(&self, id: ItemId) -> Option<&Item> {
        self.items.iter().find(|i| i.id == id)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub forms: Vec<Form>,
    #[serde(default)]
    pub collections: Vec<Collection>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_form(mut self, form: Form) -> Self {
        self.forms.push(form);
        self
    }

    pub fn with_collection(mut self, collection: Collection) -> Self {
        self.collections.push(collection);
        self
    }

    pub fn form(&self, name: &str) -> Option<&Form> {
        self.forms.iter().find(|f| f.name == name)
    }

    pub fn form_mut(&mut self, name: &str) -> Option<&mut Form> {
        self.forms.iter_mut().find(|f| f.name == name)
    }

    pub fn collection(&self, id: &str) -> Option<&Collection> {
        self.collections.iter().find(|c| c.id == id)
    }

    pub fn collection_mut(&mut self, id: &str) -> Option<&mut Collection> {
        self.collections.iter_mut().find(|c| c.id == id)
    }

    /// Resolves the field source of a component.
    ///
    /// Fallback chain: the form named `name`, then the first form nested in the `host`
    /// collection, then the first form of the document.
    pub fn resolve_form(&self, name: Option<&str>, host: Option<&str>) -> Option<&Form> {
        self.resolve_form_name(name, host)
            .and_then(|resolved| self.form(&resolved))
    }

    /// Like [`Document::resolve_form`], but returns the resolved form's name.
    pub fn resolve_form_name(&self, name: Option<&str>, host: Option<&str>) -> Option<String> {
        if let Some(form) = name.and_then(|n| self.form(n)) {
            return Some(form.name.clone());
        }
        if let Some(name) = name {
            tracing::debug!(form = name, "named form not found, falling back");
        }
        host.and_then(|h| self.forms.iter().find(|f| f.owner.as_deref() == Some(h)))
            .or_else(|| self.forms.first())
            .map(|f| f.name.clone())
    }

    /// Resolves target identifiers to the ids of live collections.
    ///
    /// With no identifiers, falls back to the `host` collection. Unknown identifiers are
    /// skipped. Duplicates are dropped, keeping the first occurrence.
    pub fn resolve_targets<I: AsRef<str>>(&self, ids: &[I], host: Option<&str>) -> Vec<String> {
        if ids.is_empty() {
            return host
                .filter(|h| self.collection(h).is_some())
                .map(|h| vec![h.to_string()])
                .unwrap_or_default();
        }

        let mut seen = HashSet::new();
        let mut resolved = Vec::new();
        for id in ids {
            let id = id.as_ref();
            if self.collection(id).is_none() {
                tracing::warn!(target_id = id, "target collection not found, skipping");
                continue;
            }
            if seen.insert(id.to_string()) {
                resolved.push(id.to_string());
            }
        }
        resolved
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unchecked_checkbox_does_not_contribute() {
        assert!(!Control::checkbox("tag", "red", false).contributes());
        assert!(Control::checkbox("tag", "red", true).contributes());
        assert!(Control::new("q", "").contributes());
    }

    #[test]
    fn test_disabled_control_does_not_contribute() {
        let mut control = Control::new("q", "open");
        control.disabled = true;
        assert!(!control.contributes());
    }

    #[test]
    fn test_text_content_includes_descendants() {
        let item = Item::new("Large")
            .with_child(Item::new("red").with_child(Item::new("box")))
            .with_child(Item::new(""));
        assert_eq!(item.text_content(), "Large red box");
    }

    #[test]
    fn test_apply_input_checks_radio_and_unchecks_siblings() {
        let mut form = Form::new("f")
            .with_control(Control::radio("size", "s", true))
            .with_control(Control::radio("size", "m", false));

        let changed = form.apply_input("size", "m").unwrap();

        assert_eq!(form.control(changed).unwrap().value, "m");
        assert!(!form.controls[0].checked);
        assert!(form.controls[1].checked);
    }

    #[test]
    fn test_apply_input_sets_text_value() {
        let mut form = Form::new("f").with_control(Control::new("q", ""));
        assert!(form.apply_input("q", "hello").is_some());
        assert_eq!(form.controls[0].value, "hello");
        assert!(form.apply_input("missing", "x").is_none());
    }

    #[test]
    fn test_set_field_adds_missing_control() {
        let mut form = Form::new("f").with_control(Control::new("q", ""));
        let existing = form.set_field("q", "a");
        let added = form.set_field("status", "open");

        assert_eq!(existing, form.controls[0].id);
        assert_eq!(form.control(added).unwrap().value, "open");
        assert_eq!(form.controls.len(), 2);
    }

    #[test]
    fn test_resolve_form_fallback_chain() {
        let doc = Document::new()
            .with_form(Form::new("first"))
            .with_form(Form::new("nested").owned_by("list"));

        assert_eq!(doc.resolve_form(Some("first"), None).unwrap().name, "first");
        assert_eq!(doc.resolve_form(Some("nope"), Some("list")).unwrap().name, "nested");
        assert_eq!(doc.resolve_form(None, Some("other")).unwrap().name, "first");
        assert!(Document::new().resolve_form(None, None).is_none());
    }

    #[test]
    fn test_resolve_targets_falls_back_to_host() {
        let doc = Document::new()
            .with_collection(Collection::new("host"))
            .with_collection(Collection::new("a"));

        let none: [&str; 0] = [];
        assert_eq!(doc.resolve_targets(&none, Some("host")), vec!["host"]);
        assert!(doc.resolve_targets(&none, Some("missing")).is_empty());
        assert_eq!(
            doc.resolve_targets(&["a", "missing", "a", "host"], Some("host")),
            vec!["a", "host"]
        );
    }

    #[test]
    fn test_item_ids_are_generated_when_missing() {
        let json = r#"{"collections":[{"id":"list","items":[{"text":"a"},{"text":"b"}]}]}"#;
        let doc: Document = serde_json::from_str(json).unwrap();
        let items = &doc.collections[0].items;
        assert_ne!(items[0].id, items[1].id);
        assert!(!items[0].hidden);
    }
}

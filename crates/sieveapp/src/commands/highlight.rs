//! Highlight marking for `hilite` fields.
//!
//! Marking is emitted, never painted: a pass produces the set of marked items per
//! target, [`MatchSegment`]s of each marked item's text, and a rendered style rule the
//! host may install. An item is marked when **any** highlight term matches it,
//! regardless of whether the item ends up found or hidden.

use crate::model::{Collection, Item, ItemId};
use crate::query::{Highlight, SelectorRenderer};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "text", rename_all = "lowercase")]
pub enum MatchSegment {
    Plain(String),
    Match(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MarkedItem {
    pub id: ItemId,
    pub segments: Vec<MatchSegment>,
}

/// Splits `text` into plain and matching segments for any of the lowercased `needles`.
///
/// Matching is case-insensitive and the returned segments keep the original casing.
/// Overlapping and adjacent matches merge into one segment.
pub fn highlight_matches(text: &str, needles: &[&str]) -> Vec<MatchSegment> {
    // `offsets[i]` is the byte offset in `text` of the char that produced byte `i` of
    // `lower`
    let mut lower = String::with_capacity(text.len());
    let mut offsets = Vec::with_capacity(text.len() + 1);
    for (idx, ch) in text.char_indices() {
        for low in ch.to_lowercase() {
            for _ in 0..low.len_utf8() {
                offsets.push(idx);
            }
            lower.push(low);
        }
    }
    offsets.push(text.len());

    let mut ranges: Vec<(usize, usize)> = needles
        .iter()
        .filter(|n| !n.is_empty())
        .flat_map(|needle| {
            lower
                .match_indices(needle)
                .map(|(start, m)| (offsets[start], offsets[start + m.len()]))
                .collect::<Vec<_>>()
        })
        .filter(|(start, end)| start < end)
        .collect();
    ranges.sort_unstable();

    let mut merged: Vec<(usize, usize)> = Vec::new();
    for (start, end) in ranges {
        match merged.last_mut() {
            Some(last) if start <= last.1 => last.1 = last.1.max(end),
            _ => merged.push((start, end)),
        }
    }

    let mut segments = Vec::new();
    let mut last_idx = 0;
    for (start, end) in merged {
        if start > last_idx {
            segments.push(MatchSegment::Plain(text[last_idx..start].to_string()));
        }
        segments.push(MatchSegment::Match(text[start..end].to_string()));
        last_idx = end;
    }
    if last_idx < text.len() {
        segments.push(MatchSegment::Plain(text[last_idx..].to_string()));
    }
    segments
}

fn mark_item(item: &Item, highlights: &[Highlight]) -> Option<MarkedItem> {
    let hits: Vec<&Highlight> = highlights.iter().filter(|h| h.matches(item)).collect();
    if hits.is_empty() {
        return None;
    }
    let needles: Vec<&str> = hits.iter().flat_map(|h| h.needles()).collect();
    Some(MarkedItem {
        id: item.id,
        segments: highlight_matches(&item.text_content(), &needles),
    })
}

/// Marks the direct children of `collection` that any highlight term matches.
pub fn mark(collection: &Collection, highlights: &[Highlight]) -> Vec<MarkedItem> {
    if highlights.is_empty() {
        return Vec::new();
    }
    collection
        .items
        .iter()
        .filter_map(|item| mark_item(item, highlights))
        .collect()
}

/// Per-component highlight state, created on the first pass that has highlights.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HighlightSheet {
    tag: String,
    rows: String,
    rule: Option<String>,
    marked: BTreeMap<String, Vec<MarkedItem>>,
}

impl HighlightSheet {
    pub fn new(tag: impl Into<String>, rows: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            rows: rows.into(),
            rule: None,
            marked: BTreeMap::new(),
        }
    }

    /// Renders the style rule for `highlights`, or `None` when there is nothing to mark.
    pub fn render_rule(&self, highlights: &[Highlight]) -> Option<String> {
        let is = SelectorRenderer::new(&self.tag).render_highlights(highlights)?;
        let tag = &self.tag;
        Some(format!(
            "{tag} {} {is} {{ color: var(--{tag}-marktext, MarkText); background: var(--{tag}-mark, Mark); }}",
            self.rows
        ))
    }

    /// Replaces the rule and every target's marks with the result of a new pass.
    pub fn update(&mut self, highlights: &[Highlight], marked: BTreeMap<String, Vec<MarkedItem>>) {
        self.rule = self.render_rule(highlights);
        self.marked = marked;
    }

    pub fn clear(&mut self) {
        self.rule = None;
        self.marked.clear();
    }

    pub fn rule(&self) -> Option<&str> {
        self.rule.as_deref()
    }

    pub fn marked(&self, target: &str) -> &[MarkedItem] {
        self.marked.get(target).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_marked(&self, target: &str, id: ItemId) -> bool {
        self.marked(target).iter().any(|m| m.id == id)
    }
}

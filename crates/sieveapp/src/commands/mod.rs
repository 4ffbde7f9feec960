//! # Command Layer
//!
//! This module contains the **core logic** of sieve. Each step of a filter pass lives in
//! its own submodule as plain functions over the domain types.
//!
//! ## Role and Responsibilities
//!
//! - [`matcher`]: partition a collection's direct children into found and hidden
//! - [`visibility`]: write the partition back as `hidden` flags
//! - [`index`]: maintain the per-item indexed attribute for a field
//! - [`highlight`]: mark items and text segments for `hilite` fields
//! - [`filter`]: orchestrate a whole pass over a [`DocumentStore`](crate::store::DocumentStore)
//!
//! ## What Commands Do NOT Do
//!
//! - **Any I/O**: no stdout, no terminal concerns
//! - **Scheduling**: when a pass runs is the [`api`](crate::api) layer's decision
//! - **Hard failures on bad input**: a missing form or target skips the pass and says
//!   so in the report
//!
//! ## Structured Returns
//!
//! A pass returns a [`PassReport`], not strings. It carries the outcome, the found/hidden
//! partition of every target, the rendered highlight rule, rejected fields and leveled
//! messages. The host decides how to render it.
//!
//! ## Testing Strategy
//!
//! Command tests use [`InMemoryStore`](crate::store::memory::InMemoryStore) and the
//! fixture builders, never the filesystem.

use crate::model::ItemId;
use crate::query::RejectedField;
use serde::Serialize;

pub mod filter;
pub mod highlight;
pub mod index;
pub mod matcher;
pub mod visibility;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageLevel {
    Info,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }
}

/// Why a pass did nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    NoFieldSource,
    NoTargets,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "status", content = "reason")]
pub enum PassOutcome {
    Completed,
    Skipped(SkipReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "status")]
pub enum TargetOutcome {
    /// Visibility was reconciled; `changed` items flipped state.
    Applied { changed: usize },
    /// A listener vetoed the change. Nothing was touched.
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TargetReport {
    pub target: String,
    pub found: Vec<ItemId>,
    pub hidden: Vec<ItemId>,
    pub marked: Vec<ItemId>,
    pub outcome: TargetOutcome,
}

/// Structured result of one filter pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PassReport {
    pub outcome: PassOutcome,
    pub form: Option<String>,
    pub targets: Vec<TargetReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub highlight_rule: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub rejected: Vec<RejectedField>,
    pub messages: Vec<CmdMessage>,
}

impl PassReport {
    pub fn skipped(reason: SkipReason, form: Option<String>) -> Self {
        Self {
            outcome: PassOutcome::Skipped(reason),
            form,
            targets: Vec::new(),
            highlight_rule: None,
            rejected: Vec::new(),
            messages: Vec::new(),
        }
    }

    pub fn completed(form: String) -> Self {
        Self {
            outcome: PassOutcome::Completed,
            ..Self::skipped(SkipReason::NoTargets, Some(form))
        }
    }

    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self.outcome, PassOutcome::Skipped(_))
    }

    pub fn target(&self, id: &str) -> Option<&TargetReport> {
        self.targets.iter().find(|t| t.target == id)
    }
}

//! # Sieve Architecture
//!
//! Sieve is a **UI-agnostic filtering engine**. A form-like field source supplies named
//! values, and sieve decides which items of one or more target collections satisfy every
//! active criterion. It then hides the rest, after giving listeners a chance to veto the
//! change.
//!
//! The engine never paints anything. It reads item text and attributes, writes a single
//! `hidden` flag per item, and hands the host a structured [`commands::PassReport`].
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - One SieveApi per filtering component                     │
//! │  - Owns config, debouncer, subscription, highlight sheet    │
//! │  - Turns host events into filter passes                     │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - filter pass: read → compile → match → notify → apply     │
//! │  - attribute indexer, highlight marking                     │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Query Layer (fields/, query/)                              │
//! │  - Field snapshot reader and flag parsing                   │
//! │  - Predicate compiler and selector rendering                │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (store/)                                     │
//! │  - Abstract DocumentStore trait                             │
//! │  - FileStore (JSON documents), InMemoryStore (testing)      │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Key Principle: No Ambient Runtime
//!
//! There are no timers, threads or global registries in the core. Time is passed in as
//! [`std::time::Instant`] values, so the host decides when to [`api::SieveApi::tick`] the
//! debouncer. A filter pass runs synchronously from start to finish.
//!
//! ## Module Overview
//!
//! - [`api`]: The component facade, entry point for hosts
//! - [`commands`]: Filter pass, indexer, matcher, visibility, highlighting
//! - [`fields`]: Field snapshot reader, flags and field name validation
//! - [`query`]: Predicates, the query compiler and selector rendering
//! - [`notify`]: Cancelable filter notifications
//! - [`schedule`]: Debouncer and listener subscription lifecycle
//! - [`store`]: Document storage abstraction and implementations
//! - [`model`]: Forms, controls, collections and items
//! - [`config`]: Configuration management
//! - [`error`]: Error types

pub mod api;
pub mod commands;
pub mod config;
pub mod error;
pub mod fields;
pub mod model;
pub mod notify;
pub mod query;
pub mod schedule;
pub mod store;

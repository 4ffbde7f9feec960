//! Scheduling: when a filter pass runs.
//!
//! - [`debounce`]: trailing-edge debouncer over injected time
//! - [`subscription`]: attach/detach of the trigger listener, and trigger relevance

pub mod debounce;
pub mod subscription;

pub use debounce::{Debouncer, DEFAULT_WINDOW, LEGACY_WINDOW};
pub use subscription::{FieldEvent, FieldEventKind, Subscription};

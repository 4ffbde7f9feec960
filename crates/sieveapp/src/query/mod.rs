//! Query layer: predicates, the compiler and selector rendering.
//!
//! - [`predicate`]: the composable [`Predicate`] tree and its evaluation
//! - [`compiler`]: [`Snapshot`](crate::fields::Snapshot) → [`CompiledQuery`]
//! - [`selector`]: predicate → CSS selector text

pub mod compiler;
pub mod predicate;
pub mod selector;

pub use compiler::{
    compile_field, compile_snapshot, CompiledQuery, FieldQuery, Highlight, QueryCompiler,
    RejectedField,
};
pub use predicate::{Indexed, Predicate};
pub use selector::SelectorRenderer;

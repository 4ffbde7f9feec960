//! # CLI Behavior
//!
//! This is **one possible UI client** for sieve. The CLI is the only place that knows
//! about terminal I/O, exit codes and output formatting.
//!
//! ## Commands
//!
//! - `sieve filter <doc>`: set fields, run one pass, print found/hidden per target
//! - `sieve index <doc> <field>`: add (or `--remove`) the indexed text attribute
//! - `sieve query`: show the selector a set of fields compiles to
//! - `sieve config`: show the effective configuration
//!
//! ## Module Structure
//!
//! - `setup`: argument parsing via clap
//! - `commands`: per-command handlers that call the API and print output
//! - `render`: output formatting
//! - `logging`: tracing subscriber

mod commands;
mod logging;
mod render;
pub mod setup;

pub use commands::run;

//! # Sieve CLI
//!
//! The binary is intentionally thin: the CLI lives in `src/cli/`, while this file only
//! invokes `cli::run()` and handles process termination.
//!
//! ## Workspace Structure
//!
//! - `crates/sieveapp/`: the filtering engine, UI agnostic
//! - `crates/sieve/`: this CLI, a client of `sieveapp`
//!
//! ## Layering
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (crates/sieve/src/cli/)                          │
//! │  - clap argument parsing (setup.rs)                         │
//! │  - Command dispatch + config layering (commands.rs)         │
//! │  - Terminal rendering via console styles (render.rs)        │
//! │  - tracing subscriber setup (logging.rs)                    │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (crates/sieveapp/src/api.rs)                     │
//! │  - One SieveApi per filtering component                     │
//! │  - Returns structured `PassReport` values                   │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! A document is a JSON file of forms and collections. The CLI sets control values
//! from `-f name=value` arguments, runs one pass and prints what was found.

mod cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

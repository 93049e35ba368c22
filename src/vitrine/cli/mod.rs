//! # CLI Layer
//!
//! This is **one possible host** for the engine, not the engine itself. It is
//! the only place that knows about terminal I/O, exit codes, files on disk
//! and output formatting.
//!
//! ## How a Command Runs
//!
//! 1. `setup`: clap parses arguments into [`setup::Cli`]
//! 2. `commands`: loads settings, the schema and the data file, builds a
//!    `MemorySource` and an `Explorer`, and drives the interaction the
//!    command stands for
//! 3. `render`: flattens the resulting view model into template data
//! 4. `templates` + `styles`: the theme crate turns it into styled text
//!
//! Explorer events are applied the way a web host would apply them: a
//! `PageChange` or `FilterChange` becomes a new query against the data
//! source, and `save_detail` writes the record back to the data file.
//!
//! ## Module Structure
//!
//! - `commands`: per-command handlers
//! - `render`: view model to terminal text
//! - `setup`: argument parsing via clap
//! - `styles`: terminal styles
//! - `templates`: output templates

mod commands;
mod render;
pub mod setup;
mod styles;
mod templates;

pub use commands::run;

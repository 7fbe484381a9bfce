//! tdo - plain-text task tracking library
//!
//! This library provides the core functionality for the tdo CLI tool:
//! tasks stored one per file under a `TASKS/` directory meant to be
//! committed to version control.
//!
//! # Core Concepts
//!
//! - **Storage root**: the nearest ancestor `TASKS/` directory
//! - **Task file**: optional `by:` / `tags:` header, a title line, free text
//! - **Status**: which of `todo/` or `done/` holds the file
//! - **Ordinal**: 1-based position in one enumeration; not persistent
//!
//! # Module Organization
//!
//! - `cli`: Command-line interface using clap
//! - `config`: `TASKS/.config` loading and saving
//! - `error`: Error types and result aliases
//! - `output`: Human and JSON output envelopes
//! - `project`: Storage root discovery and layout
//! - `query`: Filter / order / limit pipeline over tasks
//! - `store`: Enumeration, lookups and status changes
//! - `task`: Task entity, status and file name grammar
//! - `taskfile`: Task file parsing and serialization

pub mod cli;
pub mod config;
pub mod error;
pub mod output;
pub mod project;
pub mod query;
pub mod store;
pub mod task;
pub mod taskfile;

pub use error::{Error, Result};

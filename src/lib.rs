//! Generates a directory tree from three text files:
//!
//! - a structure file, one entry per line, nested with leading tabs
//! - a content file, file bodies keyed by their symbolic path
//! - a variables file of `name=value` lines
//!
//! `•name•` placeholders are substituted in paths and file bodies. Content is looked up
//! by the path as written, before substitution.
pub mod api;
pub mod config;
pub mod content;
pub mod errors;
pub mod interpolate;
pub mod materialize;
pub mod preview;
pub mod structure;
pub mod variables;
pub mod vfs;

/// Encloses a placeholder name: `•name•`.
pub const DELIMITER: &str = "•";
/// A line holding only this token separates content segments.
pub const CONTENT_SEPARATOR: &str = "•••";
/// Marks a structure line as a directory.
pub const DIRECTORY_INDICATOR: char = '|';

pub use api::{generate, plan, Generation, PgenError};
pub use config::{Config, Inputs};

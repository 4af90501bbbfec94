//! Fetch a GitHub repository's file tree and render it as an outline.
//!
//! The core is [`tree`]: [`tree::build`] nests a flat listing,
//! [`tree::render`] draws it and [`tree::filter`] narrows it by name. The
//! other modules fetch listings, export renderings and drive the terminal.

pub mod api;
pub mod browse;
pub mod config;
pub mod error;
pub mod export;
pub mod logging;
pub mod models;
pub mod repo_url;
pub mod sequence;
pub mod state;
pub mod tree;

pub use error::{ Error, Result };
pub use models::{ Directory, Entry, EntryKind, Node };
pub use tree::{ build, filter, render, RenderStyle };

//! `markdox_core` converts extended markdown, either whole documents or
//! markdown written inside documentation comments, into the lightweight
//! command markup understood by doxygen style documentation tools: section
//! and anchor commands, verbatim and code blocks and HTML inline tags.
//!
//! ## Processing Pipeline
//!
//! ```text
//! Markdown comment or page
//!   → Tab normalizer (expands tabs, measures the reference indent)
//!   → Quote/fence resolver (block quotes and fenced code)
//!   → Block structurer (headers, link references, code blocks, tables, rules)
//!   → Inline span resolver (emphasis, code spans, links, images, dashes)
//! ```
//!
//! Standalone pages additionally have their title extracted and a `@page` or
//! `@mainpage` command prepended before the pipeline runs.
//!
//! ## Key Types
//!
//! - [`transform`] turns one documentation comment into markup.
//! - [`transform_page`] turns one standalone document into a [`Page`].
//! - [`Collaborators`] bundles the section store, image lookup, language
//!   detector and diagnostic sink a transform consults.
//! - [`DocumentSet`] owns default collaborators for a run over many files.
//! - [`MarkdownConfig`] is loaded from `markdox.toml`.
//!
//! The transform itself never fails. Duplicate section labels are reported
//! to the [`DiagnosticSink`] and everything that does not parse as markdown
//! is copied through.

pub use config::*;
pub use documents::*;
pub use engine::transform;
pub use error::*;
pub use host::*;
pub use page::*;
pub use section::*;
pub use table::Alignment;

pub(crate) mod blocks;
pub mod config;
pub(crate) mod detab;
mod documents;
mod engine;
#[allow(unused_assignments)]
mod error;
pub(crate) mod headers;
mod host;
pub(crate) mod inline;
pub(crate) mod line_window;
pub(crate) mod link_refs;
mod page;
pub(crate) mod quotes;
mod section;
pub(crate) mod table;

#[cfg(test)]
mod __fixtures;
#[cfg(test)]
mod __tests;

//! `zmd_core` is the core library for the [zmd](https://github.com/zmd-rs/zmd) notebook converter. It parses Apache Zeppelin notebook JSON exports (both the 0.6.2 and 0.7.1 schema generations), renders them as Markdown documents with materialized image files, and drives a remote Zeppelin server to execute a notebook and retrieve its output.
//!
//! ## Conversion Pipeline
//!
//! ```text
//! Notebook JSON
//!   -> Notebook (serde data model, schema variant detected once)
//!   -> NotebookConverter (walks paragraphs in document order)
//!        input text  -> directive classifier -> markdown / fenced code
//!        result      -> output-type router   -> text / table / image
//!        timestamps  -> date range tracker
//!   -> header prepended -> joined Markdown document
//! ```
//!
//! ## Modules
//!
//! - [`config`] — Configuration loading from `zmd.toml`: default author,
//!   server address, poll interval, and execution timeout.
//! - [`executor`] — Blocking HTTP client that submits a notebook run,
//!   polls until every paragraph is terminal, and fetches the result.
//!
//! ## Key Types
//!
//! - [`Notebook`] / [`Paragraph`] — The parsed notebook export.
//! - [`SchemaVariant`] — Legacy (0.6.2) vs New (0.7.1) schema dispatch.
//! - [`NotebookConverter`] / [`ConvertOptions`] — One-shot conversion of a
//!   notebook into a Markdown document plus image side-effect files.
//! - [`ZmdError`] — The full fatal-error taxonomy; tolerated conditions
//!   (unrecognized image payloads, blank table rows) are skipped instead.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use zmd_core::{ConvertOptions, Notebook, convert_notebook};
//!
//! let raw = std::fs::read_to_string("note.json").unwrap();
//! let notebook = Notebook::from_json(&raw).unwrap();
//! let markdown = convert_notebook(&notebook, ConvertOptions::new(".")).unwrap();
//! std::fs::write("knowledge.md", markdown).unwrap();
//! ```

pub use config::*;
pub use converter::*;
pub use dates::*;
pub use error::*;
pub use executor::*;
pub use notebook::*;

pub mod config;
mod converter;
mod dates;
mod error;
pub mod executor;
pub(crate) mod image;
mod notebook;
pub(crate) mod table;

#[cfg(test)]
mod __fixtures;
#[cfg(test)]
mod __tests;

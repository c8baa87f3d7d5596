//! Indexing, filtering and scoring of survey responses.
//!
//! Responses come from a table whose first row holds the question prompts.
//! Each declared question locates its column(s) in that header, then turns
//! every cell into an [`Answer`] against its list of canonical answers. Charts
//! are then described by [`GraphSpec`]s, expanded and scored by [`analyze`].
//!
//! See the [`manual`] for the supported question formats and scoring modes.

mod analysis;
pub mod builder;
mod config;
mod error;
mod expand;
pub mod manual;
mod question;
mod registry;
mod scoring;

pub use crate::analysis::analyze;
pub use crate::config::*;
pub use crate::error::*;
pub use crate::expand::{expand_graph_specs, TITLE_SEPARATOR};
pub use crate::question::{
    PlainQuestion, Question, RankedQuestion, SelectAllQuestion, Tally, SELECT_ALL_DELIMITER,
};
pub use crate::registry::{ingest, ingest_remote_form, Registry, TableSource};
pub use crate::scoring::normalize;

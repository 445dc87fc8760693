#![deny(missing_docs)]
//! cereal core: front matter extraction, markdown parsing, and error types.

/// Core error and recovery types.
pub mod error;
/// Front matter (metadata block) extraction.
pub mod frontmatter;
/// Markdown parsing through markdown-rs.
pub mod parse;

pub use error::{CerealError, ParseWarning, Recovery, SourceLocation};
pub use frontmatter::{Extraction, MetadataBlock, extract_metadata};
pub use parse::{ParseOptions, parse_mdast};

//! Markdown to intermediate HTML markup.
//!
//! Parsing is delegated to markdown-rs; this module walks the resulting
//! MDAST and writes standard HTML. Raw HTML embedded in the Markdown is
//! passed through exactly as written, and code contents are emitted as
//! literal text so later stages never treat them as markup.
//!
//! # Module Structure
//!
//! - `types` - Scope and link definition types
//! - `context` - Rendering context for tracking state during traversal
//! - `render` - AST node rendering functions

mod context;
pub mod render;
mod types;

pub use context::Context;
pub use types::{LinkDefinition, Scope};

use cereal_core::{CerealError, ParseOptions, parse_mdast};
use render::{collect_definitions, render_node};
use serde::{Deserialize, Serialize};

/// Something that turns a Markdown body into HTML markup.
///
/// Any `Fn(&str) -> Result<String, CerealError>` closure is a renderer, so
/// an alternative Markdown implementation can be substituted without
/// touching the rest of the pipeline.
pub trait MarkupRenderer: Sync {
    /// Render `body` to HTML markup.
    fn render(&self, body: &str) -> Result<String, CerealError>;
}

impl<F> MarkupRenderer for F
where
    F: Fn(&str) -> Result<String, CerealError> + Sync,
{
    fn render(&self, body: &str) -> Result<String, CerealError> {
        (self)(body)
    }
}

/// Rendering options for the mdast renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderOptions {
    /// Enable GitHub Flavored Markdown (tables, task lists, footnotes, ...).
    #[serde(default = "default_true")]
    pub gfm: bool,
    /// Pass raw HTML through; when off it is escaped and shown as text.
    #[serde(default = "default_true")]
    pub allow_raw_html: bool,
}

fn default_true() -> bool {
    true
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            gfm: true,
            allow_raw_html: true,
        }
    }
}

/// The default renderer, backed by markdown-rs.
#[derive(Debug, Clone, Default)]
pub struct MdastRenderer {
    options: RenderOptions,
}

impl MdastRenderer {
    /// Creates a renderer with the given options.
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }
}

impl MarkupRenderer for MdastRenderer {
    fn render(&self, body: &str) -> Result<String, CerealError> {
        render_markdown(body, &self.options)
    }
}

/// Converts Markdown to HTML markup.
///
/// # Examples
///
/// ```
/// use cereal_jsx::renderer::{RenderOptions, render_markdown};
///
/// let html = render_markdown("# Hi <span class=\"x\">there</span>", &RenderOptions::default()).unwrap();
/// assert_eq!(html, "<h1>Hi <span class=\"x\">there</span></h1>\n");
/// ```
pub fn render_markdown(input: &str, options: &RenderOptions) -> Result<String, CerealError> {
    // Raw HTML is always parsed so that, when disallowed, it can be shown
    // escaped instead of being reinterpreted as Markdown.
    let parse_options = ParseOptions {
        gfm: options.gfm,
        ..ParseOptions::markdown()
    };
    let tree = parse_mdast(input, &parse_options)?;

    let mut ctx = Context::new(options);
    collect_definitions(&tree, &mut ctx);
    render_node(&tree, &mut ctx);
    Ok(ctx.finish())
}

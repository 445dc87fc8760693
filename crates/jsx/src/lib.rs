#![deny(missing_docs)]
//! cereal JSX engine: Markdown rendering, JSX legalization, and page codegen.

/// Page component module generation.
pub mod codegen;
/// HTML to JSX markup legalization.
pub mod legalize;
/// Option layers and their resolution.
pub mod options;
/// Per-document pipeline and batch orchestration.
pub mod pipeline;
/// Rendering layer (MDAST-based HTML renderer).
pub mod renderer;

pub use codegen::{assemble, js_string_literal, to_js_identifier};
pub use legalize::legalize;
pub use options::{FrontMatterMode, OptionOverrides, Options};
pub use pipeline::{
    BatchInput, BatchOptions, BatchProcessingResult, BatchResult, BatchStats, Instrumentation,
    LogInstrumentation, Transformer, transform_markdown_string,
};
pub use renderer::{MarkupRenderer, MdastRenderer, RenderOptions, render_markdown};

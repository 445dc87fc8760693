//! Type definitions for the mdast renderer.

/// Block scope the renderer is currently inside of.
#[derive(Debug, Clone, PartialEq)]
pub enum Scope {
    /// Document root.
    Root,
    /// Inside a list element (`<ul>` or `<ol>`).
    List {
        /// Whether the list is loose.
        spread: bool,
    },
    /// Inside a block quote; paragraphs here keep their `<p>` even in tight lists.
    Blockquote,
}

/// Target of a link or image reference definition.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkDefinition {
    /// Destination URL.
    pub url: String,
    /// Optional title.
    pub title: Option<String>,
}

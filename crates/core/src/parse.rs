//! Markdown parsing through markdown-rs.

use crate::{CerealError, SourceLocation};
use markdown::mdast::Node;
use markdown::message::{Message, Place};

/// Parser options for building markdown-rs parse options.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ParseOptions {
    /// Enable GitHub Flavored Markdown constructs.
    pub gfm: bool,
    /// Enable indented code blocks.
    pub code_indented: bool,
    /// Allow raw HTML nodes in the AST.
    pub raw_html: bool,
}

impl ParseOptions {
    /// CommonMark + GFM with raw HTML passthrough.
    pub const fn markdown() -> Self {
        Self {
            gfm: true,
            code_indented: true,
            raw_html: true,
        }
    }

    /// Convert to markdown-rs `ParseOptions`.
    ///
    /// Front matter is always off: it has been split from the body before
    /// the body ever reaches the parser.
    pub fn to_markdown(self) -> markdown::ParseOptions {
        let mut constructs = markdown::Constructs {
            frontmatter: false,
            code_indented: self.code_indented,
            html_flow: self.raw_html,
            html_text: self.raw_html,
            ..Default::default()
        };

        if self.gfm {
            constructs.gfm_autolink_literal = true;
            constructs.gfm_footnote_definition = true;
            constructs.gfm_label_start_footnote = true;
            constructs.gfm_strikethrough = true;
            constructs.gfm_table = true;
            constructs.gfm_task_list_item = true;
        }

        markdown::ParseOptions {
            constructs,
            ..markdown::ParseOptions::default()
        }
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self::markdown()
    }
}

/// Parse markdown into an MDAST tree using core options.
pub fn parse_mdast(input: &str, options: &ParseOptions) -> Result<Node, CerealError> {
    markdown::to_mdast(input, &options.to_markdown()).map_err(|err| {
        CerealError::MarkdownAdapter {
            message: err.to_string(),
            location: message_location(&err),
        }
    })
}

fn message_location(message: &Message) -> SourceLocation {
    match &message.place {
        Some(place) => match place.as_ref() {
            Place::Point(point) => SourceLocation::new(point.line, point.column),
            Place::Position(position) => {
                SourceLocation::new(position.start.line, position.start.column)
            }
        },
        None => SourceLocation::new(1, 1),
    }
}

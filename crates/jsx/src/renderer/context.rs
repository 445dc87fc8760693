//! Rendering context for the mdast renderer.

use super::RenderOptions;
use super::types::{LinkDefinition, Scope};
use std::collections::HashMap;

/// Mutable state threaded through one render of one document.
pub struct Context<'a> {
    /// Rendered HTML so far.
    pub html: String,
    stack: Vec<Scope>,
    options: &'a RenderOptions,
    /// Link/image definitions keyed by normalized identifier.
    definitions: HashMap<String, LinkDefinition>,
    /// Footnote identifiers in the order they were first referenced.
    footnote_order: Vec<String>,
    /// How many times each footnote has been referenced so far.
    footnote_ref_counts: HashMap<String, usize>,
    /// Rendered footnote bodies keyed by identifier.
    footnote_bodies: HashMap<String, String>,
}

impl<'a> Context<'a> {
    /// Creates an empty context.
    pub fn new(options: &'a RenderOptions) -> Self {
        Self {
            html: String::with_capacity(4096),
            stack: vec![Scope::Root],
            options,
            definitions: HashMap::new(),
            footnote_order: Vec::new(),
            footnote_ref_counts: HashMap::new(),
            footnote_bodies: HashMap::new(),
        }
    }

    /// Writes a raw string to the buffer without escaping (for safe HTML tags).
    pub fn push_raw(&mut self, s: &str) {
        self.html.push_str(s);
    }

    /// Writes text content with HTML escaping.
    pub fn push_text(&mut self, s: &str) {
        self.html.push_str(&html_escape::encode_text(s));
    }

    /// Writes an attribute value, escaped for a double-quoted attribute.
    pub fn push_attr_value(&mut self, s: &str) {
        self.html
            .push_str(&html_escape::encode_double_quoted_attribute(s));
    }

    /// Writes code content as literal text.
    ///
    /// Braces are entity-encoded so the text never reads as a JSX
    /// expression, and newlines become `&#10;` so JSX whitespace collapsing
    /// keeps the code's line structure.
    pub fn push_code_text(&mut self, s: &str) {
        for c in s.chars() {
            match c {
                '<' => self.html.push_str("&lt;"),
                '>' => self.html.push_str("&gt;"),
                '&' => self.html.push_str("&amp;"),
                '{' => self.html.push_str("&#123;"),
                '}' => self.html.push_str("&#125;"),
                '\n' => self.html.push_str("&#10;"),
                _ => self.html.push(c),
            }
        }
    }

    /// Enters a new scope by pushing it onto the stack.
    pub fn enter(&mut self, scope: Scope) {
        self.stack.push(scope);
    }

    /// Exits the current scope by popping from the stack.
    pub fn exit(&mut self) -> Option<Scope> {
        self.stack.pop()
    }

    /// Returns true if inside a tight (non-spread) list.
    ///
    /// Tight lists render their paragraphs without `<p>` wrappers.
    pub fn is_in_tight_list(&self) -> bool {
        self.stack
            .iter()
            .rev()
            .find(|scope| matches!(scope, Scope::List { .. } | Scope::Blockquote))
            .is_some_and(|scope| matches!(scope, Scope::List { spread: false }))
    }

    /// Returns whether raw HTML passthrough is enabled.
    pub fn raw_html_allowed(&self) -> bool {
        self.options.allow_raw_html
    }

    /// Records a link definition; the first definition of an identifier wins.
    pub fn define_link(&mut self, identifier: &str, definition: LinkDefinition) {
        self.definitions
            .entry(identifier.to_string())
            .or_insert(definition);
    }

    /// Looks up a link definition by normalized identifier.
    pub fn link_definition(&self, identifier: &str) -> Option<&LinkDefinition> {
        self.definitions.get(identifier)
    }

    /// Registers a reference to a footnote, returning its ordinal and the
    /// number of times it has now been referenced.
    pub fn reference_footnote(&mut self, identifier: &str) -> (usize, usize) {
        let ordinal = match self.footnote_order.iter().position(|id| id == identifier) {
            Some(index) => index + 1,
            None => {
                self.footnote_order.push(identifier.to_string());
                self.footnote_order.len()
            }
        };
        let count = self
            .footnote_ref_counts
            .entry(identifier.to_string())
            .or_insert(0);
        *count += 1;
        (ordinal, *count)
    }

    /// Renders into a scratch buffer, returning what was written.
    pub fn capture(&mut self, render: impl FnOnce(&mut Self)) -> String {
        let saved = std::mem::take(&mut self.html);
        render(self);
        std::mem::replace(&mut self.html, saved)
    }

    /// Stores the rendered body of a footnote definition.
    pub fn define_footnote(&mut self, identifier: &str, body: String) {
        self.footnote_bodies
            .entry(identifier.to_string())
            .or_insert(body);
    }

    /// Consumes the context, appending the footnote section if any footnote
    /// was both defined and referenced.
    pub fn finish(mut self) -> String {
        let referenced: Vec<(String, String)> = self
            .footnote_order
            .iter()
            .filter_map(|id| {
                self.footnote_bodies
                    .get(id)
                    .map(|body| (id.clone(), body.clone()))
            })
            .collect();

        if !referenced.is_empty() {
            self.html.push_str("<section class=\"footnotes\">\n<ol>\n");
            for (id, body) in referenced {
                let refs = self.footnote_ref_counts.get(&id).copied().unwrap_or(1);
                self.html.push_str("<li id=\"fn-");
                self.push_attr_value(&id);
                self.html.push_str("\">");
                self.html.push_str(body.trim_end());
                for n in 1..=refs {
                    self.html.push_str(" <a href=\"#fnref-");
                    self.push_attr_value(&id);
                    if n > 1 {
                        self.html.push_str(&format!("-{}", n));
                    }
                    self.html.push_str("\" class=\"footnote-backref\">↩</a>");
                }
                self.html.push_str("</li>\n");
            }
            self.html.push_str("</ol>\n</section>\n");
        }

        self.html
    }
}

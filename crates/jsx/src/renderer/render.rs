//! Rendering functions for the mdast renderer.

use super::context::Context;
use super::types::{LinkDefinition, Scope};
use markdown::mdast::{AlignKind, Node, ReferenceKind};

/// Records every link definition in the tree before rendering starts, so
/// references that appear before their definition still resolve.
pub fn collect_definitions(node: &Node, ctx: &mut Context) {
    if let Node::Definition(def) = node {
        ctx.define_link(
            &def.identifier,
            LinkDefinition {
                url: def.url.clone(),
                title: def.title.clone(),
            },
        );
    }
    if let Some(children) = node.children() {
        for child in children {
            collect_definitions(child, ctx);
        }
    }
}

fn render_children(children: &[Node], ctx: &mut Context) {
    for child in children {
        render_node(child, ctx);
    }
}

fn render_wrapped(tag: &str, children: &[Node], ctx: &mut Context) {
    ctx.push_raw(&format!("<{}>", tag));
    render_children(children, ctx);
    ctx.push_raw(&format!("</{}>", tag));
}

/// Renders a paragraph node, suppressing `<p>` wrappers in tight lists.
fn render_paragraph(para: &markdown::mdast::Paragraph, ctx: &mut Context) {
    if ctx.is_in_tight_list() {
        render_children(&para.children, ctx);
        return;
    }
    ctx.push_raw("<p>");
    render_children(&para.children, ctx);
    ctx.push_raw("</p>\n");
}

fn render_heading(heading: &markdown::mdast::Heading, ctx: &mut Context) {
    let tag = format!("h{}", heading.depth);
    render_wrapped(&tag, &heading.children, ctx);
    ctx.push_raw("\n");
}

fn push_link_open(url: &str, title: Option<&str>, ctx: &mut Context) {
    ctx.push_raw(r#"<a href=""#);
    ctx.push_attr_value(url);
    ctx.push_raw(r#"""#);
    if let Some(title) = title {
        ctx.push_raw(r#" title=""#);
        ctx.push_attr_value(title);
        ctx.push_raw(r#"""#);
    }
    ctx.push_raw(">");
}

fn push_image(url: &str, alt: &str, title: Option<&str>, ctx: &mut Context) {
    ctx.push_raw(r#"<img src=""#);
    ctx.push_attr_value(url);
    ctx.push_raw(r#"" alt=""#);
    ctx.push_attr_value(alt);
    ctx.push_raw(r#"""#);
    if let Some(title) = title {
        ctx.push_raw(r#" title=""#);
        ctx.push_attr_value(title);
        ctx.push_raw(r#"""#);
    }
    ctx.push_raw(">");
}

/// Source text of a reference whose definition is missing.
fn reference_brackets(kind: &ReferenceKind, label: Option<&str>) -> (String, String) {
    match kind {
        ReferenceKind::Full => (
            "[".to_string(),
            format!("][{}]", label.unwrap_or_default()),
        ),
        ReferenceKind::Collapsed => ("[".to_string(), "][]".to_string()),
        ReferenceKind::Shortcut => ("[".to_string(), "]".to_string()),
    }
}

fn render_link_reference(link: &markdown::mdast::LinkReference, ctx: &mut Context) {
    match ctx.link_definition(&link.identifier).cloned() {
        Some(def) => {
            push_link_open(&def.url, def.title.as_deref(), ctx);
            render_children(&link.children, ctx);
            ctx.push_raw("</a>");
        }
        None => {
            let (open, close) = reference_brackets(&link.reference_kind, link.label.as_deref());
            ctx.push_text(&open);
            render_children(&link.children, ctx);
            ctx.push_text(&close);
        }
    }
}

fn render_image_reference(img: &markdown::mdast::ImageReference, ctx: &mut Context) {
    match ctx.link_definition(&img.identifier).cloned() {
        Some(def) => push_image(&def.url, &img.alt, def.title.as_deref(), ctx),
        None => {
            let (open, close) = reference_brackets(&img.reference_kind, img.label.as_deref());
            ctx.push_text(&format!("!{}{}{}", open, img.alt, close));
        }
    }
}

/// Renders a list node as `<ul>` or `<ol>`.
fn render_list(list: &markdown::mdast::List, ctx: &mut Context) {
    let tag = if list.ordered { "ol" } else { "ul" };
    match list.start {
        Some(start) if list.ordered && start != 1 => {
            ctx.push_raw(&format!("<ol start=\"{}\">\n", start));
        }
        _ => ctx.push_raw(&format!("<{}>\n", tag)),
    }
    ctx.enter(Scope::List {
        spread: list.spread,
    });
    render_children(&list.children, ctx);
    ctx.exit();
    ctx.push_raw(&format!("</{}>\n", tag));
}

/// Renders a list item, prefixing GFM task items with a disabled checkbox.
fn render_list_item(item: &markdown::mdast::ListItem, ctx: &mut Context) {
    match item.checked {
        Some(checked) => {
            ctx.push_raw("<li class=\"task-list-item\">");
            ctx.push_raw("<input type=\"checkbox\" disabled");
            if checked {
                ctx.push_raw(" checked");
            }
            ctx.push_raw("> ");
        }
        None => ctx.push_raw("<li>"),
    }
    render_children(&item.children, ctx);
    ctx.push_raw("</li>\n");
}

/// Renders a fenced or indented code block as literal text.
fn render_code(code: &markdown::mdast::Code, ctx: &mut Context) {
    ctx.push_raw("<pre><code");
    if let Some(lang) = &code.lang {
        ctx.push_raw(" class=\"language-");
        ctx.push_attr_value(lang);
        ctx.push_raw("\"");
    }
    ctx.push_raw(">");
    ctx.push_code_text(&code.value);
    ctx.push_raw("</code></pre>\n");
}

fn render_table_row(
    row: &markdown::mdast::TableRow,
    ctx: &mut Context,
    is_header: bool,
    aligns: &[AlignKind],
) {
    ctx.push_raw("<tr>");
    let tag = if is_header { "th" } else { "td" };
    for (i, cell) in row.children.iter().enumerate() {
        let Node::TableCell(cell) = cell else {
            continue;
        };
        let align_attr = match aligns.get(i) {
            Some(AlignKind::Left) => " align=\"left\"",
            Some(AlignKind::Right) => " align=\"right\"",
            Some(AlignKind::Center) => " align=\"center\"",
            Some(AlignKind::None) | None => "",
        };
        ctx.push_raw(&format!("<{}{}>", tag, align_attr));
        render_children(&cell.children, ctx);
        ctx.push_raw(&format!("</{}>", tag));
    }
    ctx.push_raw("</tr>");
}

/// Renders a table without whitespace between table parts, which React
/// would otherwise reject as text children of table elements.
fn render_table(table: &markdown::mdast::Table, ctx: &mut Context) {
    ctx.push_raw("<table><thead>");
    if let Some(Node::TableRow(row)) = table.children.first() {
        render_table_row(row, ctx, true, &table.align);
    }
    ctx.push_raw("</thead>");

    if table.children.len() > 1 {
        ctx.push_raw("<tbody>");
        for row in table.children.iter().skip(1) {
            if let Node::TableRow(r) = row {
                render_table_row(r, ctx, false, &table.align);
            }
        }
        ctx.push_raw("</tbody>");
    }
    ctx.push_raw("</table>\n");
}

/// Renders raw HTML, either as passthrough or escaped based on options.
fn render_html(html: &markdown::mdast::Html, ctx: &mut Context) {
    if ctx.raw_html_allowed() {
        ctx.push_raw(&html.value);
    } else {
        log::debug!("Raw HTML escaped as text: {}", html.value);
        ctx.push_text(&html.value);
    }
}

fn render_blockquote(quote: &markdown::mdast::Blockquote, ctx: &mut Context) {
    ctx.push_raw("<blockquote>\n");
    ctx.enter(Scope::Blockquote);
    render_children(&quote.children, ctx);
    ctx.exit();
    ctx.push_raw("</blockquote>\n");
}

/// Renders a footnote reference as `<sup><a href="#fn-id">n</a></sup>`.
///
/// Repeated references to the same footnote get suffixed ids
/// (`fnref-id`, `fnref-id-2`, ...).
fn render_footnote_reference(fnref: &markdown::mdast::FootnoteReference, ctx: &mut Context) {
    let id = &fnref.identifier;
    let (ordinal, count) = ctx.reference_footnote(id);
    ctx.push_raw("<sup><a href=\"#fn-");
    ctx.push_attr_value(id);
    ctx.push_raw("\" id=\"fnref-");
    ctx.push_attr_value(id);
    if count > 1 {
        ctx.push_raw(&format!("-{}", count));
    }
    ctx.push_raw("\" class=\"footnote-ref\">");
    ctx.push_raw(&ordinal.to_string());
    ctx.push_raw("</a></sup>");
}

/// Renders a footnote body aside; the section is emitted by `Context::finish`.
fn render_footnote_definition(fndef: &markdown::mdast::FootnoteDefinition, ctx: &mut Context) {
    let body = ctx.capture(|inner| render_children(&fndef.children, inner));
    ctx.define_footnote(&fndef.identifier, body);
}

/// Recursively renders an AST node to HTML.
pub fn render_node(node: &Node, ctx: &mut Context) {
    match node {
        Node::Root(root) => render_children(&root.children, ctx),
        Node::Text(text) => ctx.push_text(&text.value),
        Node::Paragraph(para) => render_paragraph(para, ctx),
        Node::Heading(heading) => render_heading(heading, ctx),
        Node::Strong(strong) => render_wrapped("strong", &strong.children, ctx),
        Node::Emphasis(emphasis) => render_wrapped("em", &emphasis.children, ctx),
        Node::Delete(delete) => render_wrapped("del", &delete.children, ctx),
        Node::InlineCode(code) => {
            ctx.push_raw("<code>");
            ctx.push_code_text(&code.value);
            ctx.push_raw("</code>");
        }
        Node::Link(link) => {
            push_link_open(&link.url, link.title.as_deref(), ctx);
            render_children(&link.children, ctx);
            ctx.push_raw("</a>");
        }
        Node::LinkReference(link) => render_link_reference(link, ctx),
        Node::Image(img) => push_image(&img.url, &img.alt, img.title.as_deref(), ctx),
        Node::ImageReference(img) => render_image_reference(img, ctx),
        Node::List(list) => render_list(list, ctx),
        Node::ListItem(item) => render_list_item(item, ctx),
        Node::Code(code) => render_code(code, ctx),
        Node::Blockquote(quote) => render_blockquote(quote, ctx),
        Node::Break(_) => ctx.push_raw("<br>\n"),
        Node::ThematicBreak(_) => ctx.push_raw("<hr>\n"),
        Node::Html(html) => render_html(html, ctx),
        Node::Table(table) => render_table(table, ctx),
        Node::FootnoteReference(fnref) => render_footnote_reference(fnref, ctx),
        Node::FootnoteDefinition(fndef) => render_footnote_definition(fndef, ctx),
        Node::Definition(_) | Node::Yaml(_) | Node::Toml(_) => {}
        Node::TableRow(_) | Node::TableCell(_) => {}
        _ => {
            log::warn!("Unhandled markdown node type: {:?}", node);
        }
    }
}

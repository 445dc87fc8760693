//! Rewrites HTML markup so it is valid as a JSX expression.
//!
//! The input is the renderer's output, which may contain arbitrary raw HTML
//! written by document authors. The scanner walks it once, copying text and
//! tags while fixing the places where HTML and JSX disagree:
//!
//! - attribute names React spells differently (`class` → `className`)
//! - void elements, which JSX requires to be self-closed
//! - `{`, `}` and `>` in text, which JSX would read as syntax
//! - line breaks in text, which JSX drops together with the space they stand for
//! - comments and declarations, which JSX cannot express
//!
//! Running the legalizer on its own output changes nothing.

mod attributes;

pub use attributes::{is_void_element, jsx_attribute_name, style_object};

use attributes::{is_block_element, is_html_element};
use std::borrow::Cow;

/// A parsed start or end tag.
#[derive(Debug)]
struct Tag<'a> {
    name: &'a str,
    closing: bool,
    self_closing: bool,
    attributes: Vec<Attribute<'a>>,
}

#[derive(Debug)]
struct Attribute<'a> {
    name: &'a str,
    value: Option<AttributeValue<'a>>,
}

#[derive(Debug)]
enum AttributeValue<'a> {
    /// `"text"` or `'text'`
    Quoted { quote: char, text: &'a str },
    /// `{expression}`, kept verbatim
    Expression(&'a str),
    /// `text` with no quotes
    Unquoted(&'a str),
}

/// What a `<` at the current position starts.
enum Markup<'a> {
    Tag(Tag<'a>, usize),
    /// A comment or `<!...>` / `<?...>` declaration of the given length.
    Dropped(usize),
    /// A literal `<` in text.
    Text,
}

/// Legalizes HTML markup for embedding in JSX.
///
/// # Examples
///
/// ```
/// use cereal_jsx::legalize::legalize;
///
/// assert_eq!(
///     legalize("<p class=\"x\">a {b}<br></p>"),
///     "<p className=\"x\">a &#123;b&#125;<br /></p>"
/// );
/// ```
pub fn legalize(markup: &str) -> String {
    let mut result = String::with_capacity(markup.len() + markup.len() / 8);
    let bytes = markup.as_bytes();
    let len = bytes.len();
    let mut pre_depth: usize = 0;
    // Whether the last thing written was inline content.
    let mut after_inline = false;
    let mut i = 0;

    while i < len {
        if bytes[i] == b'<' {
            match scan_markup(&markup[i..]) {
                Markup::Tag(tag, consumed) => {
                    if !is_dropped_closer(&tag) {
                        after_inline = !is_block_element(tag.name);
                    }
                    emit_tag(&tag, &mut pre_depth, &mut result);
                    i += consumed;
                }
                Markup::Dropped(consumed) => i += consumed,
                Markup::Text => {
                    result.push_str("&lt;");
                    after_inline = true;
                    i += 1;
                }
            }
            continue;
        }

        let text_end = bytes[i..]
            .iter()
            .position(|&b| b == b'<')
            .map_or(len, |p| i + p);
        let text = &markup[i..text_end];
        if pre_depth > 0 {
            push_text(text, true, &mut result);
        } else {
            let before_inline = text.contains('\n') && next_is_inline(&markup[text_end..]);
            push_flow_text(text, after_inline, before_inline, &mut result);
            if !is_blank(text) {
                after_inline = true;
            }
        }
        i = text_end;
    }

    result
}

fn is_blank(text: &str) -> bool {
    text.bytes().all(|b| b.is_ascii_whitespace())
}

/// Closing tags of void elements are dropped from the output.
fn is_dropped_closer(tag: &Tag<'_>) -> bool {
    tag.closing && is_void_element(tag.name)
}

/// Whether the first thing in `rest` that survives legalization is inline
/// content. Comments, dropped closers and blank text are skipped.
fn next_is_inline(rest: &str) -> bool {
    let mut rest = rest;
    loop {
        rest = rest.trim_start_matches(|c: char| c.is_ascii_whitespace());
        if rest.is_empty() {
            return false;
        }
        if !rest.starts_with('<') {
            return true;
        }
        match scan_markup(rest) {
            Markup::Tag(tag, consumed) if is_dropped_closer(&tag) => rest = &rest[consumed..],
            Markup::Tag(tag, _) => return !is_block_element(tag.name),
            Markup::Dropped(consumed) => rest = &rest[consumed..],
            Markup::Text => return true,
        }
    }
}

/// Writes text outside `<pre>`. JSX drops whitespace that spans lines, so a
/// whitespace run containing a newline becomes a single space when inline
/// content sits on both sides of it. Next to block elements, or at either
/// end of the markup, it is kept as is.
fn push_flow_text(text: &str, after_inline: bool, before_inline: bool, result: &mut String) {
    let mut rest = text;
    let mut at_start = true;
    while !rest.is_empty() {
        let word_len = rest
            .find(|c: char| c.is_ascii_whitespace())
            .unwrap_or(rest.len());
        if word_len > 0 {
            push_text(&rest[..word_len], false, result);
            rest = &rest[word_len..];
            at_start = false;
            continue;
        }

        let space_len = rest
            .find(|c: char| !c.is_ascii_whitespace())
            .unwrap_or(rest.len());
        let space = &rest[..space_len];
        let at_end = space_len == rest.len();
        let joins_inline = (!at_start || after_inline) && (!at_end || before_inline);
        if joins_inline && space.contains('\n') {
            result.push(' ');
        } else {
            result.push_str(space);
        }
        rest = &rest[space_len..];
        at_start = false;
    }
}

fn push_text(text: &str, in_pre: bool, result: &mut String) {
    for c in text.chars() {
        match c {
            '{' => result.push_str("&#123;"),
            '}' => result.push_str("&#125;"),
            '>' => result.push_str("&gt;"),
            '\n' if in_pre => result.push_str("&#10;"),
            _ => result.push(c),
        }
    }
}

fn scan_markup(s: &str) -> Markup<'_> {
    let bytes = s.as_bytes();
    if let Some(rest) = s.strip_prefix("<!--") {
        return match rest.find("-->") {
            Some(pos) => Markup::Dropped(4 + pos + 3),
            None => Markup::Text,
        };
    }

    match bytes.get(1) {
        Some(b'!' | b'?') => match find_tag_end(bytes) {
            Some(end) => Markup::Dropped(end + 1),
            None => Markup::Text,
        },
        Some(b'/') if bytes.get(2).is_some_and(u8::is_ascii_alphabetic) => {
            match s.find('>') {
                Some(end) => Markup::Tag(parse_tag(&s[1..end]), end + 1),
                None => Markup::Text,
            }
        }
        Some(b) if b.is_ascii_alphabetic() => match find_tag_end(bytes) {
            Some(end) => Markup::Tag(parse_tag(&s[1..end]), end + 1),
            None => Markup::Text,
        },
        _ => Markup::Text,
    }
}

/// Finds the position of `>` that closes a tag, handling quoted attributes and JSX expressions.
fn find_tag_end(bytes: &[u8]) -> Option<usize> {
    let mut i = 1;
    let mut in_quote = false;
    let mut quote_char = b'"';
    let mut brace_depth = 0;

    while i < bytes.len() {
        let b = bytes[i];
        if in_quote {
            if brace_depth > 0 && b == b'\\' {
                i += 2;
                continue;
            } else if b == quote_char {
                in_quote = false;
            }
        } else if brace_depth > 0 {
            match b {
                b'{' => brace_depth += 1,
                b'}' => brace_depth -= 1,
                b'"' | b'\'' | b'`' => {
                    in_quote = true;
                    quote_char = b;
                }
                _ => {}
            }
        } else if b == b'"' || b == b'\'' {
            in_quote = true;
            quote_char = b;
        } else if b == b'{' {
            brace_depth = 1;
        } else if b == b'>' {
            return Some(i);
        }
        i += 1;
    }
    None
}

/// Parses the inside of a tag (between `<` and `>`).
fn parse_tag(inner: &str) -> Tag<'_> {
    let (closing, inner) = match inner.strip_prefix('/') {
        Some(rest) => (true, rest),
        None => (false, inner),
    };
    let name_end = inner
        .find(|c: char| c.is_ascii_whitespace() || c == '/')
        .unwrap_or(inner.len());
    let name = &inner[..name_end];

    let rest = &inner[name_end..];
    let bytes = rest.as_bytes();
    let len = bytes.len();
    let mut attributes = Vec::new();
    let mut self_closing = false;
    let mut j = 0;

    while j < len {
        if bytes[j].is_ascii_whitespace() {
            j += 1;
            continue;
        }
        if bytes[j] == b'/' {
            j += 1;
            if rest[j..].trim().is_empty() {
                self_closing = true;
            }
            continue;
        }

        let start = j;
        while j < len && !bytes[j].is_ascii_whitespace() && bytes[j] != b'=' && bytes[j] != b'/' {
            j += 1;
        }
        if j == start {
            // Stray `=` with no name.
            j += 1;
            continue;
        }
        let attr_name = &rest[start..j];

        let mut k = j;
        while k < len && bytes[k].is_ascii_whitespace() {
            k += 1;
        }
        if k >= len || bytes[k] != b'=' {
            attributes.push(Attribute {
                name: attr_name,
                value: None,
            });
            continue;
        }
        k += 1;
        while k < len && bytes[k].is_ascii_whitespace() {
            k += 1;
        }
        if k >= len {
            attributes.push(Attribute {
                name: attr_name,
                value: None,
            });
            j = k;
            continue;
        }

        let (value, next) = parse_attribute_value(rest, k);
        // `<img src=a.png/>` self-closes, but `<a href=/docs/>` keeps its slash.
        let value = match value {
            AttributeValue::Unquoted(text)
                if next >= len && text.len() > 1 && text.ends_with('/') && is_void_element(name) =>
            {
                self_closing = true;
                AttributeValue::Unquoted(&text[..text.len() - 1])
            }
            other => other,
        };
        attributes.push(Attribute {
            name: attr_name,
            value: Some(value),
        });
        j = next;
    }

    Tag {
        name,
        closing,
        self_closing,
        attributes,
    }
}

/// Reads one attribute value starting at `start`, returning it and the
/// position after it.
fn parse_attribute_value(rest: &str, start: usize) -> (AttributeValue<'_>, usize) {
    let bytes = rest.as_bytes();
    let len = bytes.len();
    match bytes[start] {
        q @ (b'"' | b'\'') => {
            let end = rest[start + 1..]
                .find(q as char)
                .map_or(len, |p| start + 1 + p);
            let value = AttributeValue::Quoted {
                quote: q as char,
                text: &rest[start + 1..end],
            };
            (value, (end + 1).min(len))
        }
        b'{' => {
            let end = find_expression_end(&bytes[start..]).map_or(len, |p| start + p + 1);
            (AttributeValue::Expression(&rest[start..end]), end)
        }
        _ => {
            let end = rest[start..]
                .find(|c: char| c.is_ascii_whitespace())
                .map_or(len, |p| start + p);
            (AttributeValue::Unquoted(&rest[start..end]), end)
        }
    }
}

/// Finds the `}` that closes the expression opened at `bytes[0]`.
fn find_expression_end(bytes: &[u8]) -> Option<usize> {
    let mut depth = 0usize;
    let mut quote: Option<u8> = None;
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        match quote {
            Some(_) if b == b'\\' => i += 1,
            Some(q) if b == q => quote = None,
            Some(_) => {}
            None => match b {
                b'"' | b'\'' | b'`' => quote = Some(b),
                b'{' => depth += 1,
                b'}' => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        return Some(i);
                    }
                }
                _ => {}
            },
        }
        i += 1;
    }
    None
}

/// Capitalized names read as component references in JSX. Known HTML
/// elements in any case (`<Div>`, `<DIV>`) and other all-uppercase names are
/// lowercased; remaining names such as `<MyWidget>` are left alone.
fn element_name(name: &str) -> Cow<'_, str> {
    let has_upper = name.bytes().any(|b| b.is_ascii_uppercase());
    let all_upper = !name.bytes().any(|b| b.is_ascii_lowercase());
    if has_upper && (all_upper || is_html_element(name)) {
        Cow::Owned(name.to_ascii_lowercase())
    } else {
        Cow::Borrowed(name)
    }
}

fn emit_tag(tag: &Tag<'_>, pre_depth: &mut usize, result: &mut String) {
    let name = element_name(tag.name);
    let is_void = is_void_element(&name);
    let is_pre = name.eq_ignore_ascii_case("pre");

    if tag.closing {
        if is_void {
            return;
        }
        if is_pre {
            *pre_depth = pre_depth.saturating_sub(1);
        }
        result.push_str("</");
        result.push_str(&name);
        result.push('>');
        return;
    }

    result.push('<');
    result.push_str(&name);
    for attribute in &tag.attributes {
        result.push(' ');
        emit_attribute(attribute, result);
    }

    if tag.self_closing || is_void {
        result.push_str(" />");
    } else {
        if is_pre {
            *pre_depth += 1;
        }
        result.push('>');
    }
}

fn emit_attribute(attribute: &Attribute<'_>, result: &mut String) {
    let name = jsx_attribute_name(attribute.name);
    result.push_str(name);

    let Some(value) = &attribute.value else {
        return;
    };
    result.push('=');

    let is_style = name.eq_ignore_ascii_case("style");
    match value {
        AttributeValue::Expression(expr) => result.push_str(expr),
        AttributeValue::Quoted { text, .. } | AttributeValue::Unquoted(text) if is_style => {
            result.push_str(&style_object(text));
        }
        AttributeValue::Quoted { quote, text } => {
            result.push(*quote);
            result.push_str(text);
            result.push(*quote);
        }
        AttributeValue::Unquoted(text) => {
            if !text.contains('"') {
                result.push('"');
                result.push_str(text);
                result.push('"');
            } else if !text.contains('\'') {
                result.push('\'');
                result.push_str(text);
                result.push('\'');
            } else {
                result.push('"');
                result.push_str(&text.replace('"', "&quot;"));
                result.push('"');
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLES: &[&str] = &[
        "<h1>Hi <span class=\"x\">there</span></h1>\n",
        "<p>a {b} > c</p>\n<hr>\n<img src=a.png alt='x'>",
        "<pre><code class=\"language-js\">if (a) &#123; b() &#125;</code></pre>\n",
        "<pre>\nraw {x}\n</pre>",
        "<!-- note --><div   class=\"a\"\n id=b data-x='1' hidden>1 <3 </br></div>",
        "<Comp value={a > b ? \"x\" : 'y'} /><label for=\"n\" style=\"color: red\">L</label>",
        "<DIV CLASS=\"a\">x</DIV><svg viewbox=\"0 0 1 1\"><path stroke-width=\"2\"/></svg>",
        "<a href=\"/x?a=1&amp;b=2\" title=\"a > b\">link</a> &amp; &lt;tag&gt;",
        "unterminated <span class=\"x\"",
        "<p>Hello <em>x</em>\nworld and\n<b>y</b></p>\n<ul>\n<li>a</li>\n</ul>\n",
        "<em>a</em>\n<!-- c -->\n<b>b</b> x<!-- c -->\n<p>y</p>\n<i>z</i></br>\n<b>w</b>",
        "<p>\nx\n</p>\n< y\nz<a href=/docs/>Docs</a><Div>d</Div>",
    ];

    #[test]
    fn remaps_attributes_in_inline_html() {
        assert_eq!(
            legalize("<h1>Hi <span class=\"x\">there</span></h1>\n"),
            "<h1>Hi <span className=\"x\">there</span></h1>\n"
        );
        assert_eq!(
            legalize("<label for=\"name\" tabindex=\"1\" data-fooBar=\"1\" aria-label=\"x\">"),
            "<label htmlFor=\"name\" tabIndex=\"1\" data-fooBar=\"1\" aria-label=\"x\">"
        );
    }

    #[test]
    fn self_closes_void_elements() {
        assert_eq!(legalize("a<br>b"), "a<br />b");
        assert_eq!(legalize("<br/>"), "<br />");
        assert_eq!(legalize("<BR>"), "<br />");
        assert_eq!(
            legalize("<img src=\"a.png\" alt=\"x\">"),
            "<img src=\"a.png\" alt=\"x\" />"
        );
        assert_eq!(
            legalize("<input type=\"checkbox\" disabled checked>"),
            "<input type=\"checkbox\" disabled defaultChecked />"
        );
        assert_eq!(legalize("a</br>b"), "ab");
        assert_eq!(legalize("<div/>"), "<div />");
    }

    #[test]
    fn escapes_reserved_text_characters() {
        assert_eq!(
            legalize("<p>a {b} > c</p>"),
            "<p>a &#123;b&#125; &gt; c</p>"
        );
        assert_eq!(legalize("1 <3 and 2 < 4"), "1 &lt;3 and 2 &lt; 4");
        assert_eq!(legalize("&amp; &lt;x&gt;"), "&amp; &lt;x&gt;");
    }

    #[test]
    fn keeps_newlines_inside_pre() {
        assert_eq!(
            legalize("<pre>line1\n{x}\n</pre>\n<p>a\nb</p>"),
            "<pre>line1&#10;&#123;x&#125;&#10;</pre>\n<p>a b</p>"
        );
    }

    #[test]
    fn soft_line_breaks_become_spaces_between_inline_content() {
        assert_eq!(
            legalize("<p>Hello <em>x</em>\nworld and\n<b>y</b></p>"),
            "<p>Hello <em>x</em> world and <b>y</b></p>"
        );
        assert_eq!(legalize("<em>a</em>\n<b>b</b>"), "<em>a</em> <b>b</b>");
        assert_eq!(
            legalize("<em>a</em>\n<!-- c -->\n<b>b</b>"),
            "<em>a</em>  <b>b</b>"
        );
        assert_eq!(legalize("one  \n  two"), "one two");
    }

    #[test]
    fn line_breaks_next_to_blocks_are_kept() {
        let blocks = "<ul>\n<li>a</li>\n</ul>\n<p>b</p>\n";
        assert_eq!(legalize(blocks), blocks);
        assert_eq!(legalize("<p>\nx\n</p>"), "<p>\nx\n</p>");
        assert_eq!(legalize("a<br>\nb"), "a<br />\nb");
        assert_eq!(legalize("x\n<!-- c -->\n<p>y</p>"), "x\n\n<p>y</p>");
    }

    #[test]
    fn drops_comments_and_declarations() {
        assert_eq!(legalize("a<!-- c > d -->b"), "ab");
        assert_eq!(legalize("<!DOCTYPE html><p>x</p>"), "<p>x</p>");
        assert_eq!(legalize("<?xml version=\"1.0\"?>x"), "x");
        assert_eq!(legalize("a <!-- open"), "a &lt;!-- open");
    }

    #[test]
    fn normalizes_attribute_syntax() {
        assert_eq!(
            legalize("<td colspan=2 class=x>"),
            "<td colSpan=\"2\" className=\"x\">"
        );
        assert_eq!(
            legalize("<div   class=\"a\"\n  id='b' >x</div >"),
            "<div className=\"a\" id='b'>x</div>"
        );
        assert_eq!(legalize("<img src=a.png/>"), "<img src=\"a.png\" />");
    }

    #[test]
    fn trailing_slash_in_unquoted_value_of_non_void_element() {
        assert_eq!(
            legalize("<a href=/docs/>Docs</a>"),
            "<a href=\"/docs/\">Docs</a>"
        );
        assert_eq!(
            legalize("<a href=/docs/ >Docs</a>"),
            "<a href=\"/docs/\">Docs</a>"
        );
    }

    #[test]
    fn keeps_expression_attributes() {
        let input = "<Comp value={a > b ? \"x\" : 'y'} />";
        assert_eq!(legalize(input), input);
    }

    #[test]
    fn lowercases_html_element_names() {
        assert_eq!(
            legalize("<DIV CLASS=\"a\">x</DIV>"),
            "<div className=\"a\">x</div>"
        );
        assert_eq!(
            legalize("<Div Class=\"a\"><Table></Table></Div>"),
            "<div className=\"a\"><table></table></div>"
        );
        assert_eq!(legalize("<MyWidget>x</MyWidget>"), "<MyWidget>x</MyWidget>");
        assert_eq!(
            legalize("<svg><clipPath id=\"c\" /></svg>"),
            "<svg><clipPath id=\"c\" /></svg>"
        );
    }

    #[test]
    fn converts_style_strings() {
        assert_eq!(
            legalize("<span style=\"color: red; font-size: 2em\">x</span>"),
            "<span style={{color: \"red\", fontSize: \"2em\"}}>x</span>"
        );
    }

    #[test]
    fn unterminated_tag_is_text() {
        assert_eq!(
            legalize("x <span class=\"a\""),
            "x &lt;span class=\"a\""
        );
    }

    #[test]
    fn legalize_is_idempotent() {
        for sample in SAMPLES {
            let once = legalize(sample);
            assert_eq!(legalize(&once), once, "not idempotent for {sample:?}");
        }
    }

    #[test]
    fn no_void_element_left_open() {
        for sample in SAMPLES {
            let out = legalize(sample);
            for void in ["<br>", "<hr>", "<img src=a.png alt='x'>"] {
                assert!(!out.contains(void), "{out}");
            }
        }
    }
}

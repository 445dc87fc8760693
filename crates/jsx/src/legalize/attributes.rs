//! HTML attribute names and values in their JSX spelling.

/// Elements that never have children and must be self-closed in JSX.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Returns whether `tag` names a void element (case-insensitive).
pub fn is_void_element(tag: &str) -> bool {
    VOID_ELEMENTS.iter().any(|v| v.eq_ignore_ascii_case(tag))
}

/// HTML and lowercase SVG element names. A tag matching one of these in any
/// case is an element, never a component reference.
const HTML_ELEMENTS: &[&str] = &[
    "a", "abbr", "address", "area", "article", "aside", "audio", "b", "base", "bdi", "bdo",
    "blockquote", "body", "br", "button", "canvas", "caption", "center", "cite", "code", "col",
    "colgroup", "data", "datalist", "dd", "del", "details", "dfn", "dialog", "div", "dl", "dt",
    "em", "embed", "fieldset", "figcaption", "figure", "font", "footer", "form", "h1", "h2", "h3",
    "h4", "h5", "h6", "head", "header", "hgroup", "hr", "html", "i", "iframe", "img", "input",
    "ins", "kbd", "label", "legend", "li", "link", "main", "map", "mark", "menu", "meta", "meter",
    "nav", "noscript", "object", "ol", "optgroup", "option", "output", "p", "param", "picture",
    "pre", "progress", "q", "rp", "rt", "ruby", "s", "samp", "script", "section", "select",
    "small", "source", "span", "strike", "strong", "style", "sub", "summary", "sup", "table",
    "tbody", "td", "template", "textarea", "tfoot", "th", "thead", "time", "title", "tr",
    "track", "tt", "u", "ul", "var", "video", "wbr", "circle", "defs", "ellipse", "g", "line",
    "path", "polygon", "polyline", "rect", "svg", "symbol", "text", "tspan", "use",
];

/// Elements that start a new line in flow layout. A newline between two of
/// them is not rendered as a space.
const BLOCK_ELEMENTS: &[&str] = &[
    "address", "article", "aside", "blockquote", "body", "br", "caption", "col", "colgroup",
    "dd", "details", "dialog", "div", "dl", "dt", "fieldset", "figcaption", "figure", "footer",
    "form", "h1", "h2", "h3", "h4", "h5", "h6", "head", "header", "hgroup", "hr", "html", "li",
    "main", "menu", "nav", "ol", "p", "pre", "section", "summary", "table", "tbody", "td",
    "tfoot", "th", "thead", "tr", "ul",
];

/// Returns whether `tag` names a known HTML element (case-insensitive).
pub fn is_html_element(tag: &str) -> bool {
    HTML_ELEMENTS.iter().any(|e| e.eq_ignore_ascii_case(tag))
}

/// Returns whether `tag` names a block-level element (case-insensitive).
pub fn is_block_element(tag: &str) -> bool {
    BLOCK_ELEMENTS.iter().any(|e| e.eq_ignore_ascii_case(tag))
}

/// Maps an HTML attribute name to the name React expects.
///
/// Matching is case-insensitive. Names outside the table (including every
/// `data-*` and `aria-*` attribute) are returned unchanged.
pub fn jsx_attribute_name(name: &str) -> &str {
    let lower = name.to_ascii_lowercase();
    let mapped = match lower.as_str() {
        "class" => "className",
        "for" => "htmlFor",
        "tabindex" => "tabIndex",
        "readonly" => "readOnly",
        "checked" => "defaultChecked",
        "maxlength" => "maxLength",
        "minlength" => "minLength",
        "colspan" => "colSpan",
        "rowspan" => "rowSpan",
        "cellpadding" => "cellPadding",
        "cellspacing" => "cellSpacing",
        "accesskey" => "accessKey",
        "contenteditable" => "contentEditable",
        "crossorigin" => "crossOrigin",
        "datetime" => "dateTime",
        "enctype" => "encType",
        "formaction" => "formAction",
        "frameborder" => "frameBorder",
        "marginheight" => "marginHeight",
        "marginwidth" => "marginWidth",
        "http-equiv" => "httpEquiv",
        "accept-charset" => "acceptCharset",
        "autocomplete" => "autoComplete",
        "autofocus" => "autoFocus",
        "autoplay" => "autoPlay",
        "novalidate" => "noValidate",
        "playsinline" => "playsInline",
        "srcset" => "srcSet",
        "srcdoc" => "srcDoc",
        "srclang" => "srcLang",
        "usemap" => "useMap",
        "spellcheck" => "spellCheck",
        "allowfullscreen" => "allowFullScreen",
        "referrerpolicy" => "referrerPolicy",
        "inputmode" => "inputMode",
        "itemprop" => "itemProp",
        "itemscope" => "itemScope",
        "itemtype" => "itemType",
        "charset" => "charSet",
        "viewbox" => "viewBox",
        "stroke-width" => "strokeWidth",
        "stroke-linecap" => "strokeLinecap",
        "stroke-linejoin" => "strokeLinejoin",
        "stroke-dasharray" => "strokeDasharray",
        "stroke-dashoffset" => "strokeDashoffset",
        "stroke-opacity" => "strokeOpacity",
        "stroke-miterlimit" => "strokeMiterlimit",
        "fill-rule" => "fillRule",
        "fill-opacity" => "fillOpacity",
        "clip-path" => "clipPath",
        "clip-rule" => "clipRule",
        "font-family" => "fontFamily",
        "font-size" => "fontSize",
        "font-weight" => "fontWeight",
        "text-anchor" => "textAnchor",
        "stop-color" => "stopColor",
        "stop-opacity" => "stopOpacity",
        "xlink:href" => "xlinkHref",
        "xml:space" => "xmlSpace",
        "xml:lang" => "xmlLang",
        "xmlns:xlink" => "xmlnsXlink",
        _ => return name,
    };
    mapped
}

/// Converts an inline CSS declaration list into a JSX style object
/// expression, e.g. `color: red; font-size: 2em` becomes
/// `{{color: "red", fontSize: "2em"}}`.
pub fn style_object(css: &str) -> String {
    let decoded = html_escape::decode_html_entities(css);
    let entries: Vec<String> = split_declarations(&decoded)
        .into_iter()
        .filter_map(|decl| {
            let (property, value) = decl.split_once(':')?;
            let property = property.trim();
            let value = value.trim();
            if property.is_empty() || value.is_empty() {
                return None;
            }
            let value = serde_json::to_string(value).ok()?;
            Some(format!("{}: {}", style_key(property), value))
        })
        .collect();
    format!("{{{{{}}}}}", entries.join(", "))
}

/// Splits on `;` outside of quotes and parentheses, so values such as
/// `url(data:image/png;base64,...)` stay whole.
fn split_declarations(css: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut start = 0;
    for (i, c) in css.char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, '(') => depth += 1,
            (None, ')') => depth = depth.saturating_sub(1),
            (None, ';') if depth == 0 => {
                parts.push(&css[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&css[start..]);
    parts
}

/// CSS property name as a style object key.
fn style_key(property: &str) -> String {
    // Custom properties keep their exact spelling.
    if property.starts_with("--") {
        return serde_json::to_string(property).unwrap_or_else(|_| "\"\"".to_string());
    }
    let lower = property.to_ascii_lowercase();
    // `-ms-` is the one vendor prefix React keeps lowercase.
    let trimmed = match lower.strip_prefix("-ms-") {
        Some(rest) => format!("ms-{}", rest),
        None => lower.trim_start_matches('-').to_string(),
    };
    let capitalize_first = lower.starts_with('-') && !lower.starts_with("-ms-");

    let mut key = String::with_capacity(trimmed.len());
    let mut upper_next = capitalize_first;
    for c in trimmed.chars() {
        if c == '-' {
            upper_next = true;
        } else if upper_next {
            key.push(c.to_ascii_uppercase());
            upper_next = false;
        } else {
            key.push(c);
        }
    }
    key
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remaps_known_names_case_insensitively() {
        assert_eq!(jsx_attribute_name("class"), "className");
        assert_eq!(jsx_attribute_name("CLASS"), "className");
        assert_eq!(jsx_attribute_name("for"), "htmlFor");
        assert_eq!(jsx_attribute_name("tabindex"), "tabIndex");
        assert_eq!(jsx_attribute_name("http-equiv"), "httpEquiv");
        assert_eq!(jsx_attribute_name("stroke-width"), "strokeWidth");
        assert_eq!(jsx_attribute_name("xlink:href"), "xlinkHref");
        assert_eq!(jsx_attribute_name("checked"), "defaultChecked");
        assert_eq!(jsx_attribute_name("defaultChecked"), "defaultChecked");
    }

    #[test]
    fn leaves_other_names_alone() {
        assert_eq!(jsx_attribute_name("data-fooBar"), "data-fooBar");
        assert_eq!(jsx_attribute_name("aria-label"), "aria-label");
        assert_eq!(jsx_attribute_name("href"), "href");
        assert_eq!(jsx_attribute_name("className"), "className");
    }

    #[test]
    fn void_elements() {
        assert!(is_void_element("br"));
        assert!(is_void_element("IMG"));
        assert!(!is_void_element("div"));
        assert!(!is_void_element("brr"));
    }

    #[test]
    fn element_kinds() {
        assert!(is_html_element("div"));
        assert!(is_html_element("Div"));
        assert!(is_html_element("SECTION"));
        assert!(!is_html_element("MyWidget"));
        assert!(!is_html_element("clipPath"));
        assert!(is_block_element("P"));
        assert!(is_block_element("li"));
        assert!(!is_block_element("em"));
        assert!(!is_block_element("img"));
    }

    #[test]
    fn converts_inline_styles() {
        assert_eq!(
            style_object("color: red; font-size: 2em;"),
            r#"{{color: "red", fontSize: "2em"}}"#
        );
        assert_eq!(
            style_object("-webkit-transition: none; -ms-flex: 1"),
            r#"{{WebkitTransition: "none", msFlex: "1"}}"#
        );
        assert_eq!(
            style_object("--accent: #fff; background: url(a;b.png)"),
            r##"{{"--accent": "#fff", background: "url(a;b.png)"}}"##
        );
        assert_eq!(
            style_object("font-family: &quot;Fira Code&quot;"),
            r#"{{fontFamily: "\"Fira Code\""}}"#
        );
        assert_eq!(style_object(""), "{{}}");
    }
}

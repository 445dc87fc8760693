//! Page component module generation.
//!
//! Combines a document's metadata block and its legalized markup into the
//! text of a React component module.

use crate::options::{FrontMatterMode, Options};
use cereal_core::MetadataBlock;
use std::fmt::Write as FmtWrite;

/// Words that cannot name a `const` binding in a module.
const RESERVED_WORDS: &[&str] = &[
    "arguments", "await", "break", "case", "catch", "class", "const", "continue", "debugger",
    "default", "delete", "do", "else", "enum", "eval", "export", "extends", "false", "finally",
    "for", "function", "if", "implements", "import", "in", "instanceof", "interface", "let", "new",
    "null", "package", "private", "protected", "public", "return", "static", "super", "switch",
    "this", "throw", "true", "try", "typeof", "undefined", "var", "void", "while", "with", "yield",
];

/// Converts a Rust string to a JavaScript string literal.
///
/// Uses JSON serialization to properly escape special characters.
///
/// # Examples
///
/// ```
/// use cereal_jsx::codegen::js_string_literal;
///
/// assert_eq!(js_string_literal("hello"), "\"hello\"");
/// assert_eq!(js_string_literal("say \"hi\""), "\"say \\\"hi\\\"\"");
/// ```
pub fn js_string_literal(value: &str) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "\"\"".to_string())
}

/// Derives a JavaScript identifier from a metadata key.
///
/// Characters that cannot appear in an identifier split the key into words,
/// which are joined in camelCase. A leading digit or a reserved word gets a
/// `_` prefix. Returns `None` when nothing usable remains.
///
/// # Examples
///
/// ```
/// use cereal_jsx::codegen::to_js_identifier;
///
/// assert_eq!(to_js_identifier("title").as_deref(), Some("title"));
/// assert_eq!(to_js_identifier("og-image").as_deref(), Some("ogImage"));
/// assert_eq!(to_js_identifier("2col").as_deref(), Some("_2col"));
/// assert_eq!(to_js_identifier("class").as_deref(), Some("_class"));
/// assert_eq!(to_js_identifier("--"), None);
/// ```
pub fn to_js_identifier(key: &str) -> Option<String> {
    let mut ident = String::with_capacity(key.len());
    for (i, word) in key
        .split(|c: char| !(c.is_alphanumeric() || c == '_' || c == '$'))
        .filter(|w| !w.is_empty())
        .enumerate()
    {
        if i == 0 {
            ident.push_str(word);
            continue;
        }
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            ident.extend(first.to_uppercase());
            ident.push_str(chars.as_str());
        }
    }

    if ident.is_empty() {
        return None;
    }
    if ident.starts_with(|c: char| c.is_ascii_digit()) || RESERVED_WORDS.contains(&ident.as_str()) {
        ident.insert(0, '_');
    }
    Some(ident)
}

/// A metadata entry that will be emitted as an exported constant.
struct Declaration<'a> {
    key: &'a str,
    ident: String,
    value: &'a str,
}

/// Builds the exported declarations, skipping keys whose identifier would
/// shadow a generated name or repeat an earlier one.
fn declarations<'a>(
    metadata: &'a MetadataBlock,
    component_name: &str,
    options: &Options,
) -> Vec<Declaration<'a>> {
    let mut taken: Vec<String> = vec![
        "React".to_string(),
        component_name.to_string(),
        options.react_head_context_name.clone(),
        options.react_head_context_var_name.clone(),
    ];
    let mut decls = Vec::with_capacity(metadata.len());

    for (key, value) in metadata.iter() {
        let Some(ident) = to_js_identifier(key) else {
            log::warn!("Skipping front matter key {:?}: no usable identifier", key);
            continue;
        };
        if taken.contains(&ident) {
            log::warn!(
                "Skipping front matter key {:?}: `{}` is already declared in {}",
                key,
                ident,
                component_name
            );
            continue;
        }
        taken.push(ident.clone());
        decls.push(Declaration { key, ident, value });
    }
    decls
}

fn emit_imports(code: &mut String, options: &Options, with_context: bool) {
    let _ = writeln!(code, "import React from \"react\";");
    if !with_context {
        return;
    }
    match &options.react_head_context_import {
        Some(module) => {
            let _ = writeln!(
                code,
                "import {{ {} }} from {};",
                options.react_head_context_name,
                js_string_literal(module)
            );
        }
        None => {
            let _ = writeln!(
                code,
                "const {} = React.createContext({{}});",
                options.react_head_context_name
            );
        }
    }
}

fn emit_declarations(code: &mut String, decls: &[Declaration<'_>]) {
    if decls.is_empty() {
        return;
    }
    code.push('\n');
    for decl in decls {
        let _ = writeln!(
            code,
            "export const {} = {};",
            decl.ident,
            js_string_literal(decl.value)
        );
    }
}

fn emit_context_value(code: &mut String, decls: &[Declaration<'_>], options: &Options) {
    let _ = writeln!(code, "const {} = {{", options.react_head_context_var_name);
    for decl in decls {
        let _ = writeln!(code, "  {}: {},", js_string_literal(decl.key), decl.ident);
    }
    let _ = writeln!(code, "}};");
}

fn write_markup(code: &mut String, markup: &str) {
    code.push_str(markup);
    if !markup.is_empty() && !markup.ends_with('\n') {
        code.push('\n');
    }
}

fn emit_component(code: &mut String, markup: &str, component_name: &str, provider: Option<&Options>) {
    code.push('\n');
    let _ = writeln!(code, "export default function {}() {{", component_name);
    let _ = writeln!(code, "  return (");
    match provider {
        Some(options) => {
            let _ = writeln!(
                code,
                "    <{}.Provider value={{{}}}>",
                options.react_head_context_name, options.react_head_context_var_name
            );
            write_markup(code, markup);
            let _ = writeln!(code, "    </{}.Provider>", options.react_head_context_name);
        }
        None => {
            let _ = writeln!(code, "    <>");
            write_markup(code, markup);
            let _ = writeln!(code, "    </>");
        }
    }
    let _ = writeln!(code, "  );");
    let _ = writeln!(code, "}}");
}

/// Assembles a component module from metadata and legal markup.
///
/// The module always imports React and default-exports one function
/// component named `component_name`. How metadata appears depends on
/// [`Options::front_matter_mode`]; empty metadata produces no declarations
/// in any mode.
pub fn assemble(
    metadata: &MetadataBlock,
    markup: &str,
    component_name: &str,
    options: &Options,
) -> String {
    let decls = match options.front_matter_mode {
        FrontMatterMode::Omit => Vec::new(),
        FrontMatterMode::HeadContext | FrontMatterMode::Declarations => {
            declarations(metadata, component_name, options)
        }
    };
    let with_context =
        options.front_matter_mode == FrontMatterMode::HeadContext && !decls.is_empty();

    let mut code = String::with_capacity(markup.len() + 512);
    emit_imports(&mut code, options, with_context);
    emit_declarations(&mut code, &decls);
    if with_context {
        emit_context_value(&mut code, &decls, options);
        emit_component(&mut code, markup, component_name, Some(options));
    } else {
        emit_component(&mut code, markup, component_name, None);
    }
    code
}

use cereal_core::{MetadataBlock, extract_metadata};
use cereal_jsx::{
    BatchInput, BatchOptions, FrontMatterMode, OptionOverrides, Options, Transformer, legalize,
    transform_markdown_string,
};

fn head_context() -> Transformer {
    Transformer::new(Options::default())
}

#[test]
fn hello_page_in_head_context_mode() {
    let raw = "---\ntitle: Hello\n---\n# Hi <span class=\"x\">there</span>\n";
    let code = head_context().transform_one(raw, "Hi");

    assert!(code.starts_with("import React from \"react\";\n"));
    assert_eq!(code.matches("export default function Hi()").count(), 1);
    assert!(code.contains("export const title = \"Hello\";"));
    assert!(code.contains("ReactHeadContext.Provider value={reactHead}"));
    assert!(code.contains("<h1>Hi <span className=\"x\">there</span></h1>"));
}

#[test]
fn no_metadata_passthrough() {
    let raw = "Just *text* and <br> a break.\n";
    for mode in ["reacthelmet", "variables", "none"] {
        let overrides = OptionOverrides {
            front_matter_mode: Some(mode.to_string()),
            ..Default::default()
        };
        let code = transform_markdown_string(raw, "Plain", Some(&overrides));
        assert!(!code.contains("export const"), "{mode}: {code}");
        assert!(!code.contains("Provider"), "{mode}: {code}");
        assert!(code.contains("<p>Just <em>text</em> and <br /> a break.</p>"));
    }
}

#[test]
fn metadata_round_trip() {
    let meta: MetadataBlock = [("title", "Hello"), ("author", "Ada"), ("date", "2021-01-02")]
        .into_iter()
        .collect();
    let raw = format!("{}body\n", meta.to_fence());

    let extracted = extract_metadata(&raw).into_value();
    assert_eq!(extracted.metadata, meta);

    let options = Options {
        front_matter_mode: FrontMatterMode::Declarations,
        ..Options::default()
    };
    let code = Transformer::new(options).transform_one(&raw, "Post");
    for (key, value) in meta.iter() {
        assert!(code.contains(&format!("export const {} = \"{}\";", key, value)));
    }
}

#[test]
fn escaping_safety() {
    let raw = "Use {braces} and a > b.\n\n```\nfn main() { if a > b {} }\n```\n\n<div>{raw} <3</div>\n";
    let code = head_context().transform_one(raw, "Safe");

    let body = code
        .split_once("    <>\n")
        .and_then(|(_, rest)| rest.split_once("    </>\n"))
        .map(|(markup, _)| markup)
        .expect("fragment body");
    assert!(!body.contains('{'), "{body}");
    assert!(!body.contains('}'), "{body}");
    assert!(body.contains("&#123;braces&#125;"));
    assert!(body.contains("a &gt; b"));
    assert!(body.contains("fn main() &#123; if a &gt; b &#123;&#125; &#125;"));
    assert!(body.contains("&#123;raw&#125; &lt;3"));
}

#[test]
fn void_elements_are_closed() {
    let raw = "Line one  \nline two\n\n---\n\n![alt](a.png)\n\n<img src=\"b.png\"><input type=\"text\">\n";
    let code = head_context().transform_one(raw, "Voids");
    assert!(code.contains("<br />"));
    assert!(code.contains("<hr />"));
    assert!(code.contains("<img src=\"a.png\" alt=\"alt\" />"));
    assert!(code.contains("<img src=\"b.png\" />"));
    assert!(code.contains("<input type=\"text\" />"));
    assert!(!code.contains("<br>"));
}

#[test]
fn remaps_attributes_from_raw_html() {
    let raw = "<label for=\"n\" class=\"l\" data-x=\"1\" aria-hidden=\"true\">Name</label>\n";
    let code = head_context().transform_one(raw, "Form");
    assert!(code.contains("<label htmlFor=\"n\" className=\"l\" data-x=\"1\" aria-hidden=\"true\">"));
    assert!(!code.contains(" class="));
    assert!(!code.contains(" for="));
}

#[test]
fn soft_line_breaks_keep_their_space() {
    let code = head_context().transform_one("Hello *x*\nworld and\n<b>y</b>\n", "Soft");
    assert!(code.contains("<p>Hello <em>x</em> world and <b>y</b></p>"), "{code}");
    assert!(!code.contains("</em>\nworld"));
}

#[test]
fn task_list_checkboxes_are_uncontrolled() {
    let code = head_context().transform_one("- [x] done\n- [ ] todo\n", "Tasks");
    assert!(code.contains("<input type=\"checkbox\" disabled defaultChecked /> done"), "{code}");
    assert!(code.contains("<input type=\"checkbox\" disabled /> todo"));
    assert!(!code.contains(" checked"));
}

#[test]
fn legalize_is_idempotent_on_rendered_pages() {
    let raw = "# T\n\n| a | b |\n|---|:-:|\n| `{x}` | <b class=\"k\">y</b> |\n\n- [x] done\n\n> quote<br>\n";
    let markup = cereal_jsx::render_markdown(raw, &Default::default()).unwrap();
    let once = legalize(&markup);
    assert_eq!(legalize(&once), once);
}

#[test]
fn batch_is_resilient_and_ordered() {
    let transformer = Transformer::with_renderer(Options::default(), |body: &str| {
        if body.contains("boom") {
            Err(cereal_core::CerealError::InternalError("boom".to_string()))
        } else {
            cereal_jsx::render_markdown(body, &Default::default())
        }
    });
    let inputs: Vec<BatchInput> = ["# a", "boom", "# c"]
        .iter()
        .enumerate()
        .map(|(i, source)| BatchInput {
            id: format!("doc-{i}"),
            source: source.to_string(),
            component_name: format!("Doc{i}"),
        })
        .collect();

    let result = transformer.transform_many(inputs, &BatchOptions::default());
    assert_eq!(result.results.len(), 3);
    assert_eq!(result.results[0].id, "doc-0");
    assert!(result.results[0].code.as_deref().unwrap().contains("<h1>a</h1>"));
    assert_eq!(result.results[1].error.as_deref(), Some("Internal error: boom"));
    assert!(result.results[2].code.as_deref().unwrap().contains("function Doc2()"));
    assert_eq!((result.stats.succeeded, result.stats.failed), (2, 1));
}

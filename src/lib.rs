#[cfg(all(feature = "python", not(target_arch = "wasm32")))]
use pyo3::prelude::*;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

pub mod ast;
pub mod catalog;
pub mod cursor;
pub mod error;
pub mod html;
pub mod markdown;
mod parser;
pub mod types;

pub use ast::{Container, Node};
pub use error::{CatalogError, ParseError, ParseErrorKind};
pub use html::{render_html, render_html_with_options};
pub use markdown::{render_markdown, render_markdown_with_options};
pub use parser::{parse, MAX_NESTING};
pub use types::{Formatted, LineEnding, ReferenceStyle, RenderOptions};

/// Parses `text` once and renders both views of it.
pub fn format_text(text: &str, options: &RenderOptions) -> Result<Formatted, ParseError> {
    let root = Node::from(parse(text)?);
    Ok(Formatted {
        html: render_html_with_options(&root, options),
        markdown: render_markdown_with_options(&root, options),
    })
}

#[cfg(all(feature = "python", not(target_arch = "wasm32")))]
fn value_error(e: impl std::fmt::Display) -> PyErr {
    PyErr::new::<pyo3::exceptions::PyValueError, _>(e.to_string())
}

#[cfg(all(feature = "python", not(target_arch = "wasm32")))]
#[pyfunction]
#[pyo3(name = "format_text", signature = (text, crlf = false, anchor_references = false))]
fn py_format_text(text: String, crlf: bool, anchor_references: bool) -> PyResult<String> {
    let formatted =
        format_text(&text, &RenderOptions::new(crlf, anchor_references)).map_err(value_error)?;

    serde_json::to_string_pretty(&formatted)
        .map_err(|e| PyErr::new::<pyo3::exceptions::PyRuntimeError, _>(e.to_string()))
}

#[cfg(all(feature = "python", not(target_arch = "wasm32")))]
#[pyfunction]
#[pyo3(name = "parse_tree")]
fn py_parse_tree(text: String) -> PyResult<String> {
    let tree = parse(&text).map_err(value_error)?;

    serde_json::to_string_pretty(&tree)
        .map_err(|e| PyErr::new::<pyo3::exceptions::PyRuntimeError, _>(e.to_string()))
}

#[cfg(all(feature = "python", not(target_arch = "wasm32")))]
#[pyfunction]
#[pyo3(name = "sync_catalogs")]
fn py_sync_catalogs(source_json: String, target_json: String) -> PyResult<String> {
    let source = catalog::Catalog::from_json(&source_json).map_err(value_error)?;
    let synced = catalog::sync_from_json(&source, &target_json).map_err(value_error)?;
    synced.to_json_pretty().map_err(value_error)
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn format_text_wasm(text: &str) -> Result<String, JsValue> {
    format_text_with_options_wasm(text, false, false)
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn format_text_with_options_wasm(
    text: &str,
    crlf: bool,
    anchor_references: bool,
) -> Result<String, JsValue> {
    let formatted = format_text(text, &RenderOptions::new(crlf, anchor_references))
        .map_err(|e| JsValue::from_str(&e.to_string()))?;

    serde_json::to_string_pretty(&formatted).map_err(|e| JsValue::from_str(&e.to_string()))
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn parse_tree_wasm(text: &str) -> Result<String, JsValue> {
    let tree = parse(text).map_err(|e| JsValue::from_str(&e.to_string()))?;

    serde_json::to_string_pretty(&tree).map_err(|e| JsValue::from_str(&e.to_string()))
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn sync_catalogs_wasm(source_json: &str, target_json: &str) -> Result<String, JsValue> {
    let source = catalog::Catalog::from_json(source_json)
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    let synced = catalog::sync_from_json(&source, target_json)
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    synced
        .to_json_pretty()
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

#[cfg(all(feature = "python", not(target_arch = "wasm32")))]
#[pymodule]
fn temark_rs(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(py_format_text, m)?)?;
    m.add_function(wrap_pyfunction!(py_parse_tree, m)?)?;
    m.add_function(wrap_pyfunction!(py_sync_catalogs, m)?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use std::path::{Path, PathBuf};

    fn fixtures_dir() -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures")
    }

    fn run_fixture(input_path: &Path, options: &RenderOptions) {
        let golden_path = PathBuf::from(format!("{}.golden.json", input_path.display()));
        let input = fs::read_to_string(input_path).expect("Failed to read input");
        let golden = fs::read_to_string(&golden_path).expect("Failed to read golden");

        let output = format_text(&input, options).expect("fixture must parse");

        let json_out = serde_json::to_string_pretty(&output).unwrap();
        let v_out: serde_json::Value = serde_json::from_str(&json_out).unwrap();
        let v_golden: serde_json::Value = serde_json::from_str(&golden).unwrap();

        if v_out != v_golden {
            for key in ["html", "markdown"] {
                if v_out[key] != v_golden[key] {
                    println!("Mismatch in {}", key);
                    println!("Got: {}", v_out[key]);
                    println!("Exp: {}", v_golden[key]);
                }
            }
            assert_eq!(v_out, v_golden, "Mismatch in fixture {}", input_path.display());
        }
    }

    #[test]
    fn test_fixtures() {
        let fixtures_text = fs::read_to_string(fixtures_dir().join("fixtures.json"))
            .expect("Failed to read fixtures.json");
        let fixtures: serde_json::Value =
            serde_json::from_str(&fixtures_text).expect("Invalid fixtures.json");
        let obj = fixtures
            .as_object()
            .expect("fixtures.json must be an object");

        for (name, cfg) in obj {
            let flag = |key: &str| cfg.get(key).and_then(|v| v.as_bool()).unwrap_or(false);
            let options = RenderOptions::new(flag("crlf"), flag("anchor_references"));
            run_fixture(&fixtures_dir().join(name), &options);
        }
    }

    const SAMPLES: &[&str] = &[
        "<p>a<p>b</p>c</p>",
        "<h2>Fireball</h2><p>Deals <strong>8d6</strong> fire damage to @[creature]{each creature}.</p><hr/><ul><li>one</li><li><em>two</em></li></ul>",
        "<ol><li>x</li></ol><ol><li>y</li></ol>",
        "<p>line<br>break</p><p></p>",
        "<span class=\"x\">styled</span> text",
    ];

    #[test]
    fn test_rendering_is_deterministic() {
        for sample in SAMPLES {
            let first = format_text(sample, &RenderOptions::default()).unwrap();
            let second = format_text(sample, &RenderOptions::default()).unwrap();
            assert_eq!(first, second);
        }
    }

    // Drops whitespace the renderers insert so trees can be compared.
    fn normalize(node: &Node) -> Option<Node> {
        match node {
            Node::Text { content } => {
                let trimmed = content.trim();
                (!trimmed.is_empty()).then(|| Node::text(trimmed))
            }
            Node::Container(c) => Some(Node::Container(Container::new(
                c.label.clone(),
                c.attributes.clone(),
                c.children.iter().filter_map(normalize).collect(),
            ))),
            other => Some(other.clone()),
        }
    }

    #[test]
    fn test_html_output_reparses_to_same_tree() {
        for sample in SAMPLES {
            let root = Node::from(parse(sample).unwrap());
            let html = render_html(&root);
            let reparsed = parse(&html).unwrap();
            assert_eq!(reparsed.children.len(), 1, "{}", html);
            assert_eq!(normalize(&reparsed.children[0]), normalize(&root));
        }
    }

    #[test]
    fn test_failed_parse_yields_no_output() {
        let err = format_text("<p>unterminated", &RenderOptions::default()).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::UnmatchedTag);
        assert_eq!(err.to_string(), "unmatched tag at byte 0");
    }

    #[test]
    fn test_unknown_tag_passthrough() {
        let out = format_text("<foo>text</foo>", &RenderOptions::default()).unwrap();
        assert_eq!(out.html, "\n<body>\n<foo>text</foo>\n</body>\n");
        assert_eq!(out.markdown, "\n<foo>text\n");
    }

    #[test]
    fn test_reference_end_to_end() {
        let tree = parse("@[spellA]{Fireball}").unwrap();
        assert_eq!(tree.children, vec![Node::reference("spellA", "Fireball")]);
        let out = format_text("@[spellA]{Fireball}", &RenderOptions::default()).unwrap();
        assert_eq!(out.markdown, "\n[Fireball](@spellA) \n");
    }
}

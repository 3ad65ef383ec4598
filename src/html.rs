//! Canonical markup output.
//!
//! Block labels get a line break on each side of their own tags; everything
//! else is written inline. Text is emitted as-is, without escaping.

use crate::ast::{is_block_label, Container, Node};
use crate::types::{ReferenceStyle, RenderOptions};

pub fn render_html(node: &Node) -> String {
    render_html_with_options(node, &RenderOptions::default())
}

pub fn render_html_with_options(node: &Node, options: &RenderOptions) -> String {
    let renderer = HtmlRenderer {
        newline: options.newline(),
        references: options.reference_style,
    };
    let mut out = String::new();
    renderer.node(node, &mut out);
    out
}

struct HtmlRenderer {
    newline: &'static str,
    references: ReferenceStyle,
}

impl HtmlRenderer {
    fn node(&self, node: &Node, out: &mut String) {
        match node {
            Node::Text { content } => out.push_str(content),
            Node::VoidTag { label, attributes } => {
                out.push_str(self.newline);
                open_tag(out, label, attributes, "/>");
                out.push_str(self.newline);
            }
            Node::Container(container) => self.container(container, out),
            Node::Reference { target, content } => match self.references {
                ReferenceStyle::Shorthand => {
                    out.push_str(&format!("@[{}]{{{}}}", target, content));
                }
                ReferenceStyle::Anchor => {
                    out.push_str(&format!("<a href=\"{}\">{}</a>", target, content));
                }
            },
        }
    }

    fn container(&self, container: &Container, out: &mut String) {
        let Container {
            label,
            attributes,
            children,
        } = container;

        if children.is_empty() {
            open_tag(out, label, attributes, ">");
            close_tag(out, label);
            return;
        }

        let newline = if is_block_label(label) {
            self.newline
        } else {
            ""
        };
        out.push_str(newline);
        open_tag(out, label, attributes, ">");
        out.push_str(newline);
        for child in children {
            self.node(child, out);
        }
        out.push_str(newline);
        close_tag(out, label);
        out.push_str(newline);
    }
}

fn open_tag(out: &mut String, label: &str, attributes: &str, end: &str) {
    out.push('<');
    out.push_str(label);
    if !attributes.is_empty() {
        out.push(' ');
        out.push_str(attributes);
    }
    out.push_str(end);
}

fn close_tag(out: &mut String, label: &str) {
    out.push_str("</");
    out.push_str(label);
    out.push('>');
}

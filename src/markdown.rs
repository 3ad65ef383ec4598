//! Linear prose output.
//!
//! Each label maps to one [`Behavior`]; labels without a Markdown form are
//! passed through as their opening tag so the reader can still see them.

use crate::ast::{is_always_void, is_block_label, Container, Node};
use crate::types::RenderOptions;
use tracing::debug;

pub fn render_markdown(node: &Node) -> String {
    render_markdown_with_options(node, &RenderOptions::default())
}

pub fn render_markdown_with_options(node: &Node, options: &RenderOptions) -> String {
    let renderer = MarkdownRenderer {
        newline: options.newline(),
    };
    let mut out = String::new();
    renderer.node(node, None, &mut out);
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Behavior {
    /// Children wrapped in a fixed prefix and suffix.
    Affix(&'static str, &'static str),
    /// `ol` numbers its direct `li` children from 1; `ul` does not.
    List { ordered: bool },
    Item,
    Passthrough,
}

fn behavior(label: &str) -> Behavior {
    match label.to_ascii_lowercase().as_str() {
        "body" | "p" | "span" => Behavior::Affix("", ""),
        "h2" => Behavior::Affix("## ", ""),
        "strong" | "b" => Behavior::Affix("**", "**"),
        "em" | "i" => Behavior::Affix("*", "*"),
        "ul" => Behavior::List { ordered: false },
        "ol" => Behavior::List { ordered: true },
        "li" => Behavior::Item,
        _ => Behavior::Passthrough,
    }
}

// Renderings that sit inside a line of prose and may need a separating space.
fn is_inline(node: &Node) -> bool {
    match node {
        Node::Text { .. } | Node::Reference { .. } => true,
        Node::VoidTag { label, .. } => !is_always_void(label),
        Node::Container(c) => {
            !is_block_label(&c.label)
                && !matches!(
                    behavior(&c.label),
                    Behavior::List { .. } | Behavior::Item
                )
        }
    }
}

struct MarkdownRenderer {
    newline: &'static str,
}

impl MarkdownRenderer {
    /// `number` is set only for an `li` directly inside an `ol`.
    fn node(&self, node: &Node, number: Option<usize>, out: &mut String) {
        match node {
            Node::Text { content } => out.push_str(content),
            Node::VoidTag { label, attributes } => {
                if label.eq_ignore_ascii_case("hr") {
                    out.push_str(self.newline);
                    out.push_str(self.newline);
                    out.push_str("---");
                    out.push_str(self.newline);
                    out.push_str(self.newline);
                } else if label.eq_ignore_ascii_case("br") {
                    out.push_str(self.newline);
                } else {
                    debug!(label = %label, "no markdown equivalent, passing void tag through");
                    passthrough_marker(out, label, attributes);
                }
            }
            Node::Container(container) => self.container(container, number, out),
            Node::Reference { target, content } => {
                out.push_str(&format!("[{}](@{}) ", content, target));
            }
        }
    }

    fn container(&self, container: &Container, number: Option<usize>, out: &mut String) {
        let newline = if is_block_label(&container.label) {
            self.newline
        } else {
            ""
        };
        out.push_str(newline);

        match behavior(&container.label) {
            Behavior::Affix(prefix, suffix) => {
                out.push_str(prefix);
                self.children(&container.children, false, out);
                out.push_str(suffix);
            }
            Behavior::List { ordered } => {
                self.children(&container.children, ordered, out);
                out.push_str(self.newline);
            }
            Behavior::Item => {
                match number {
                    Some(n) => out.push_str(&format!("{} ", n)),
                    None => out.push_str("- "),
                }
                self.children(&container.children, false, out);
                out.push_str(self.newline);
            }
            Behavior::Passthrough => {
                debug!(label = %container.label, "no markdown equivalent, passing tag through");
                passthrough_marker(out, &container.label, &container.attributes);
                self.children(&container.children, false, out);
            }
        }

        out.push_str(newline);
    }

    fn children(&self, children: &[Node], ordered: bool, out: &mut String) {
        // The counter lives only as long as this one list.
        let mut counter = 0;
        let mut previous_tail: Option<char> = None;

        for child in children {
            let number = match child {
                Node::Container(c) if ordered && behavior(&c.label) == Behavior::Item => {
                    counter += 1;
                    Some(counter)
                }
                _ => None,
            };

            let mut rendered = String::new();
            self.node(child, number, &mut rendered);

            // Inline renderings are joined by a space, anything else starts
            // on a fresh line.
            let inline = is_inline(child);
            if needs_space(previous_tail, &rendered) {
                out.push_str(if inline { " " } else { self.newline });
            }
            out.push_str(&rendered);
            if !inline {
                previous_tail = None;
            } else if let Some(tail) = rendered.chars().last() {
                previous_tail = Some(tail);
            }
        }
    }
}

fn needs_space(previous_tail: Option<char>, next: &str) -> bool {
    let Some(tail) = previous_tail else {
        return false;
    };
    !tail.is_whitespace() && next.chars().next().is_some_and(|c| !c.is_whitespace())
}

fn passthrough_marker(out: &mut String, label: &str, attributes: &str) {
    out.push('<');
    out.push_str(label);
    if !attributes.is_empty() {
        out.push(' ');
        out.push_str(attributes);
    }
    out.push('>');
}

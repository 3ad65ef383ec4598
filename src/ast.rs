use serde::Serialize;

/// Label of the synthetic root container produced by [`crate::parse`].
pub const ROOT_LABEL: &str = "body";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Node {
    Text {
        content: String,
    },
    VoidTag {
        label: String,
        attributes: String, // opaque, never interpreted
    },
    Container(Container),
    Reference {
        target: String,
        content: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Container {
    pub label: String,
    pub attributes: String,
    pub children: Vec<Node>,
}

impl Container {
    pub fn new(
        label: impl Into<String>,
        attributes: impl Into<String>,
        children: Vec<Node>,
    ) -> Self {
        Container {
            label: label.into(),
            attributes: attributes.into(),
            children,
        }
    }

    pub fn root(children: Vec<Node>) -> Self {
        Self::new(ROOT_LABEL, "", children)
    }
}

impl Node {
    pub fn text(t: impl Into<String>) -> Self {
        Node::Text { content: t.into() }
    }

    pub fn void(label: impl Into<String>, attributes: impl Into<String>) -> Self {
        Node::VoidTag {
            label: label.into(),
            attributes: attributes.into(),
        }
    }

    pub fn container(label: impl Into<String>, children: Vec<Node>) -> Self {
        Node::Container(Container::new(label, "", children))
    }

    pub fn reference(target: impl Into<String>, content: impl Into<String>) -> Self {
        Node::Reference {
            target: target.into(),
            content: content.into(),
        }
    }
}

impl From<Container> for Node {
    fn from(container: Container) -> Self {
        Node::Container(container)
    }
}

/// Whether `label` names a horizontal rule or a line break. These are void
/// even when the source forgets the trailing slash.
pub fn is_always_void(label: &str) -> bool {
    label.eq_ignore_ascii_case("hr") || label.eq_ignore_ascii_case("br")
}

/// Labels whose markup is surrounded by line breaks in both renderers.
pub fn is_block_label(label: &str) -> bool {
    ["body", "p", "h2", "hr", "br"]
        .iter()
        .any(|b| b.eq_ignore_ascii_case(label))
}

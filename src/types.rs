use serde::{Deserialize, Serialize};

/// The two renderings of one piece of markup.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Formatted {
    pub html: String,
    pub markdown: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct RenderOptions {
    pub line_ending: LineEnding,
    pub reference_style: ReferenceStyle,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LineEnding {
    #[default]
    Lf,
    CrLf,
}

impl LineEnding {
    pub fn as_str(self) -> &'static str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::CrLf => "\r\n",
        }
    }
}

/// How a reference construct is written back out as HTML.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ReferenceStyle {
    /// `@[target]{content}`, which parses back to the same reference.
    #[default]
    Shorthand,
    /// `<a href="target">content</a>`.
    Anchor,
}

impl RenderOptions {
    pub fn new(crlf: bool, anchor_references: bool) -> Self {
        Self {
            line_ending: if crlf { LineEnding::CrLf } else { LineEnding::Lf },
            reference_style: if anchor_references {
                ReferenceStyle::Anchor
            } else {
                ReferenceStyle::Shorthand
            },
        }
    }

    pub(crate) fn newline(&self) -> &'static str {
        self.line_ending.as_str()
    }
}

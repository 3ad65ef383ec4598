//! Error types for markup parsing and catalog reconciliation.

use serde::Serialize;

/// What went wrong while building a tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(rename_all = "snake_case")]
pub enum ParseErrorKind {
    /// A `<` with no `>` after it.
    #[error("unterminated tag")]
    UnterminatedTag,

    /// An opened container with no correctly nested closer, or a closer with
    /// no opener.
    #[error("unmatched tag")]
    UnmatchedTag,

    /// An `@` construct missing its `[...]` or `{...}` part.
    #[error("malformed reference")]
    MalformedReference,

    /// A tag body that is empty once trimmed.
    #[error("empty tag label")]
    EmptyLabel,

    /// A container opened more than [`crate::MAX_NESTING`] levels deep.
    #[error("nesting too deep")]
    NestingTooDeep,
}

/// A fatal parse failure. `offset` is a byte offset into the parsed text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("{kind} at byte {offset}")]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub offset: usize,
}

impl ParseError {
    pub fn new(kind: ParseErrorKind, offset: usize) -> Self {
        Self { kind, offset }
    }
}

/// Error while loading or reconciling catalogs.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("invalid catalog JSON")]
    Json(#[from] serde_json::Error),

    #[error("catalog label mismatch: source {source_label:?}, target {target_label:?}")]
    LabelMismatch {
        source_label: String,
        target_label: String,
    },

    #[error("entry count mismatch: source has {source_count}, target has {target_count}")]
    CountMismatch {
        source_count: usize,
        target_count: usize,
    },

    #[error("target has no entry with id {0:?}")]
    MissingEntry(String),
}

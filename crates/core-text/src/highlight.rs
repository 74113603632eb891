//! Highlighting collaborator interface.
//!
//! The store never tokenizes text itself. It hands each freshly rendered row
//! to a pluggable [`Highlight`] implementation together with the "previous
//! row ended inside an open multi-line comment" flag, and stores the returned
//! tags plus the row's own open-comment flag.

/// Token classification for a single rendered character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TokenKind {
    #[default]
    Normal,
    Comment,
    MultiLineComment,
    /// Primary keywords (control flow, declarations).
    Keyword,
    /// Secondary keywords (types, builtins).
    Type,
    String,
    Number,
}

/// Result of highlighting one rendered row.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HighlightResult {
    /// One tag per rendered char.
    pub tags: Vec<TokenKind>,
    /// True when the row ends inside an unterminated multi-line comment.
    pub open_comment: bool,
}

/// Language-specific tokenizer keyed on filename by the syntax collaborator.
pub trait Highlight: Send + Sync {
    /// Human readable file type name shown in the status bar.
    fn name(&self) -> &str;

    /// Tag every char of `render`. `prev_open_comment` carries the state of
    /// the preceding row.
    fn highlight(&self, render: &str, prev_open_comment: bool) -> HighlightResult;
}

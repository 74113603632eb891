//! Style attributes carried by frame spans.
//!
//! Spans record *what* a cell is (a token, a selected token, the gutter, the
//! status bar); the theme decides how it looks only at emission time, so a
//! theme switch never recomposes a frame.

use core_syntax::{Color, Theme};
use core_text::TokenKind;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StyleAttr {
    Token(TokenKind),
    /// Token under the visual selection.
    Selected(TokenKind),
    Gutter,
    /// `~` rows and the welcome banner.
    Filler,
    StatusBar,
    Message,
}

/// Concrete colors for one span.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Style {
    pub fg: Color,
    pub bg: Option<Color>,
}

impl StyleAttr {
    pub fn resolve(self, theme: &Theme) -> Style {
        let (fg, bg) = match self {
            StyleAttr::Token(kind) => (theme.color_of(kind), None),
            StyleAttr::Selected(kind) => (theme.color_of(kind), Some(theme.selection_bg)),
            StyleAttr::Gutter | StyleAttr::Filler => (theme.line_number, None),
            StyleAttr::StatusBar => (theme.status_fg, Some(theme.status_bg)),
            StyleAttr::Message => (theme.normal, None),
        };
        Style { fg, bg }
    }
}

/// A run of text sharing one attribute.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StyleSpan {
    pub text: String,
    pub attr: StyleAttr,
}

impl StyleSpan {
    pub fn new<S: Into<String>>(text: S, attr: StyleAttr) -> Self {
        Self {
            text: text.into(),
            attr,
        }
    }
}

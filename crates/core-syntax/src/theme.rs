//! Built-in color themes.

use core_text::TokenKind;
use tracing::warn;

/// Terminal color, translated to backend colors by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Reset,
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
    DarkGrey,
    Rgb { r: u8, g: u8, b: u8 },
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color::Rgb { r, g, b }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    pub name: &'static str,
    pub normal: Color,
    pub comment: Color,
    pub keyword: Color,
    pub type_name: Color,
    pub string: Color,
    pub number: Color,
    pub line_number: Color,
    pub selection_bg: Color,
    pub status_fg: Color,
    pub status_bg: Color,
}

pub const DEFAULT: Theme = Theme {
    name: "default",
    normal: Color::Reset,
    comment: Color::Cyan,
    keyword: Color::Yellow,
    type_name: Color::Green,
    string: Color::Magenta,
    number: Color::Red,
    line_number: Color::DarkGrey,
    selection_bg: Color::Blue,
    status_fg: Color::Black,
    status_bg: Color::White,
};

pub const SOLARIZED: Theme = Theme {
    name: "solarized",
    normal: Color::rgb(0x83, 0x94, 0x96),
    comment: Color::rgb(0x58, 0x6e, 0x75),
    keyword: Color::rgb(0x85, 0x99, 0x00),
    type_name: Color::rgb(0xb5, 0x89, 0x00),
    string: Color::rgb(0x2a, 0xa1, 0x98),
    number: Color::rgb(0xd3, 0x36, 0x82),
    line_number: Color::rgb(0x58, 0x6e, 0x75),
    selection_bg: Color::rgb(0x07, 0x36, 0x42),
    status_fg: Color::rgb(0xfd, 0xf6, 0xe3),
    status_bg: Color::rgb(0x26, 0x8b, 0xd2),
};

pub const MONO: Theme = Theme {
    name: "mono",
    normal: Color::Reset,
    comment: Color::DarkGrey,
    keyword: Color::Reset,
    type_name: Color::Reset,
    string: Color::Reset,
    number: Color::Reset,
    line_number: Color::DarkGrey,
    selection_bg: Color::DarkGrey,
    status_fg: Color::Black,
    status_bg: Color::White,
};

pub const BUILTIN_THEMES: &[&Theme] = &[&DEFAULT, &SOLARIZED, &MONO];

impl Default for Theme {
    fn default() -> Self {
        DEFAULT
    }
}

impl Theme {
    /// Look up a built-in theme, falling back to `default` for unknown names.
    pub fn by_name(name: &str) -> Theme {
        match BUILTIN_THEMES.iter().find(|t| t.name.eq_ignore_ascii_case(name)) {
            Some(theme) => (*theme).clone(),
            None => {
                warn!(target: "config", theme = name, "unknown_theme_fallback_default");
                DEFAULT
            }
        }
    }

    pub fn color_of(&self, kind: TokenKind) -> Color {
        match kind {
            TokenKind::Normal => self.normal,
            TokenKind::Comment | TokenKind::MultiLineComment => self.comment,
            TokenKind::Keyword => self.keyword,
            TokenKind::Type => self.type_name,
            TokenKind::String => self.string,
            TokenKind::Number => self.number,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn by_name_is_case_insensitive_and_falls_back() {
        assert_eq!(Theme::by_name("Solarized").name, "solarized");
        assert_eq!(Theme::by_name("mono").name, "mono");
        assert_eq!(Theme::by_name("nope"), DEFAULT);
    }

    #[test]
    fn comment_kinds_share_a_color() {
        let t = Theme::default();
        assert_eq!(
            t.color_of(TokenKind::Comment),
            t.color_of(TokenKind::MultiLineComment)
        );
        assert_eq!(t.color_of(TokenKind::Number), Color::Red);
    }
}

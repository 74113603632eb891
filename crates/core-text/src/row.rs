//! A single editable line and its derived render caches.

use crate::width::char_width;
use crate::{TextError, TextResult, TokenKind, byte_offset};

/// Glyph used in the render form for control characters.
pub const CONTROL_SUBSTITUTE: char = '?';

/// One line of text. Owned exclusively by a [`crate::RowStore`].
///
/// `render` and `hl` are caches derived from `raw`; they are refreshed by the
/// store whenever `raw` changes and are never independently mutable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub(crate) idx: usize,
    pub(crate) raw: String,
    /// Number of chars in `raw`.
    pub(crate) size: usize,
    pub(crate) render: String,
    pub(crate) hl: Vec<TokenKind>,
    pub(crate) hl_open_comment: bool,
}

impl Row {
    pub(crate) fn new(idx: usize, raw: String, tab_stop: usize) -> Self {
        let size = raw.chars().count();
        let mut row = Self {
            idx,
            raw,
            size,
            render: String::new(),
            hl: Vec::new(),
            hl_open_comment: false,
        };
        row.refresh_render(tab_stop);
        row
    }

    /// Position of this row in the document. Always equals its index in the store.
    pub fn index(&self) -> usize {
        self.idx
    }

    /// Raw content without a trailing newline.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Length of the raw content in chars.
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Render form: tabs expanded, control characters substituted.
    pub fn render(&self) -> &str {
        &self.render
    }

    /// Highlight tags, one per char of [`Row::render`].
    pub fn highlight(&self) -> &[TokenKind] {
        &self.hl
    }

    /// Whether the row ends inside an open multi-line comment.
    pub fn ends_in_open_comment(&self) -> bool {
        self.hl_open_comment
    }

    /// Char at raw column `col`.
    pub fn char_at(&self, col: usize) -> Option<char> {
        self.raw.chars().nth(col)
    }

    /// Raw chars in `[start, end)` clamped to the row.
    pub fn slice(&self, start: usize, end: usize) -> &str {
        let end = end.min(self.size);
        if start >= end {
            return "";
        }
        match (byte_offset(&self.raw, start), byte_offset(&self.raw, end)) {
            (Some(a), Some(b)) => &self.raw[a..b],
            _ => "",
        }
    }

    /// Map a raw column to a render (terminal cell) column.
    pub fn cx_to_rx(&self, cx: usize, tab_stop: usize) -> usize {
        let tab_stop = tab_stop.max(1);
        let mut rx = 0usize;
        for ch in self.raw.chars().take(cx) {
            if ch == '\t' {
                rx += tab_stop - (rx % tab_stop);
            } else {
                rx += char_width(ch);
            }
        }
        rx
    }

    /// Map a render column back to the raw column covering it.
    pub fn rx_to_cx(&self, rx: usize, tab_stop: usize) -> usize {
        let tab_stop = tab_stop.max(1);
        let mut cur = 0usize;
        for (cx, ch) in self.raw.chars().enumerate() {
            if ch == '\t' {
                cur += tab_stop - (cur % tab_stop);
            } else {
                cur += char_width(ch);
            }
            if cur > rx {
                return cx;
            }
        }
        self.size
    }

    pub(crate) fn insert_char(&mut self, col: usize, ch: char) -> TextResult<bool> {
        let Some(at) = byte_offset(&self.raw, col) else {
            return Ok(false);
        };
        self.raw
            .try_reserve(ch.len_utf8())
            .map_err(|_| TextError::OutOfMemory)?;
        self.raw.insert(at, ch);
        self.size += 1;
        Ok(true)
    }

    pub(crate) fn remove_char(&mut self, col: usize) -> Option<char> {
        if col >= self.size {
            return None;
        }
        let at = byte_offset(&self.raw, col)?;
        let ch = self.raw.remove(at);
        self.size -= 1;
        Some(ch)
    }

    pub(crate) fn append_str(&mut self, s: &str) -> TextResult<()> {
        self.raw
            .try_reserve(s.len())
            .map_err(|_| TextError::OutOfMemory)?;
        self.raw.push_str(s);
        self.size += s.chars().count();
        Ok(())
    }

    /// Split off everything from `col` onward, leaving `[0, col)` in place.
    pub(crate) fn split_off(&mut self, col: usize) -> Option<String> {
        let at = byte_offset(&self.raw, col)?;
        let tail = self.raw.split_off(at);
        self.size = col;
        Some(tail)
    }

    /// Rebuild the render form from `raw`. Highlight tags are reset to
    /// `Normal`; the store re-applies the highlighter afterwards.
    pub(crate) fn refresh_render(&mut self, tab_stop: usize) {
        let tab_stop = tab_stop.max(1);
        let mut render = String::with_capacity(self.raw.len());
        let mut cells = 0usize;
        for ch in self.raw.chars() {
            if ch == '\t' {
                render.push(' ');
                cells += 1;
                while cells % tab_stop != 0 {
                    render.push(' ');
                    cells += 1;
                }
            } else if ch.is_control() {
                render.push(CONTROL_SUBSTITUTE);
                cells += 1;
            } else {
                render.push(ch);
                cells += char_width(ch);
            }
        }
        self.hl = vec![TokenKind::Normal; render.chars().count()];
        self.render = render;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(s: &str) -> Row {
        Row::new(0, s.to_string(), 4)
    }

    #[test]
    fn tabs_expand_to_next_multiple_of_four() {
        let r = row("\tx");
        assert_eq!(r.render(), "    x");
        let r = row("ab\tc");
        assert_eq!(r.render(), "ab  c");
        assert_eq!(r.highlight().len(), 5);
    }

    #[test]
    fn control_chars_are_substituted() {
        let r = row("a\u{7}b");
        assert_eq!(r.render(), "a?b");
        assert_eq!(r.raw(), "a\u{7}b");
    }

    #[test]
    fn cx_rx_round_trip_with_tabs() {
        let r = row("\tab");
        assert_eq!(r.cx_to_rx(0, 4), 0);
        assert_eq!(r.cx_to_rx(1, 4), 4);
        assert_eq!(r.cx_to_rx(2, 4), 5);
        assert_eq!(r.rx_to_cx(2, 4), 0);
        assert_eq!(r.rx_to_cx(4, 4), 1);
        assert_eq!(r.rx_to_cx(99, 4), 3);
    }

    #[test]
    fn insert_and_remove_multibyte() {
        let mut r = row("hé");
        assert!(r.insert_char(1, 'x').unwrap());
        assert_eq!(r.raw(), "hxé");
        assert_eq!(r.size(), 3);
        assert_eq!(r.remove_char(2), Some('é'));
        assert_eq!(r.remove_char(5), None);
        assert!(!r.insert_char(9, 'z').unwrap());
    }

    #[test]
    fn slice_clamps() {
        let r = row("hello");
        assert_eq!(r.slice(1, 3), "el");
        assert_eq!(r.slice(3, 99), "lo");
        assert_eq!(r.slice(4, 2), "");
    }
}

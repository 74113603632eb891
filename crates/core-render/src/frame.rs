//! Full-frame composition.

use core_state::{EditorState, Mode};
use core_text::width::char_width;
use core_text::{Row, TokenKind};
use tracing::trace;

use crate::status::{StatusContext, build_status};
use crate::style::{StyleAttr, StyleSpan};

/// What the renderer needs from the editor for one frame.
pub struct RenderContext<'a> {
    pub state: &'a EditorState,
    /// Status text, already filtered for expiry.
    pub message: &'a str,
    /// Pending count/prefix keys.
    pub pending: &'a str,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrameLine {
    pub spans: Vec<StyleSpan>,
}

impl FrameLine {
    /// Append `text`, merging into the previous span when the attribute
    /// matches.
    fn push(&mut self, text: &str, attr: StyleAttr) {
        if text.is_empty() {
            return;
        }
        match self.spans.last_mut() {
            Some(last) if last.attr == attr => last.text.push_str(text),
            _ => self.spans.push(StyleSpan::new(text, attr)),
        }
    }

    /// Concatenated text of every span.
    pub fn text(&self) -> String {
        self.spans.iter().map(|s| s.text.as_str()).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub width: u16,
    /// Text rows followed by the status bar and message bar.
    pub lines: Vec<FrameLine>,
    /// Terminal (column, row) of the cursor.
    pub cursor: (u16, u16),
}

impl Frame {
    pub fn status_line(&self) -> Option<&FrameLine> {
        self.lines.iter().rev().nth(1)
    }

    pub fn message_line(&self) -> Option<&FrameLine> {
        self.lines.last()
    }
}

const WELCOME: &str = concat!("XCodex editor -- version ", env!("CARGO_PKG_VERSION"));

/// Compose the whole screen.
pub fn compose(ctx: &RenderContext<'_>) -> Frame {
    let state = ctx.state;
    let width = state.screen_cols();
    let height = state.screen_rows();
    let gutter = state.gutter_width();
    let text_cols = width.saturating_sub(gutter);
    let mut lines = Vec::with_capacity(height + 2);

    for y in 0..height {
        let file_row = state.row_offset + y;
        let mut line = FrameLine::default();
        match state.row(file_row) {
            Some(row) => {
                if gutter > 0 {
                    let number = format!("{:>w$} ", file_row + 1, w = gutter - 1);
                    line.push(&number, StyleAttr::Gutter);
                }
                push_row_text(&mut line, state, row, text_cols);
            }
            None if state.num_rows() == 0 && y == height / 3 => {
                let banner: String = WELCOME.chars().take(width.saturating_sub(1)).collect();
                let pad = width.saturating_sub(banner.len()) / 2;
                line.push("~", StyleAttr::Filler);
                line.push(&" ".repeat(pad.saturating_sub(1)), StyleAttr::Filler);
                line.push(&banner, StyleAttr::Filler);
            }
            None => line.push("~", StyleAttr::Filler),
        }
        lines.push(line);
    }

    let status = StatusContext::from_state(state, ctx.pending);
    let mut status_line = FrameLine::default();
    status_line.push(&build_status(&status, width), StyleAttr::StatusBar);
    lines.push(status_line);

    let mut message = FrameLine::default();
    let cursor = if state.mode == Mode::Command {
        let typed = format!(":{}", state.command_line.buffer());
        let shown: String = typed.chars().take(width).collect();
        let col: usize = shown.chars().map(char_width).sum();
        message.push(&shown, StyleAttr::Message);
        (col.min(width.saturating_sub(1)), height + 1)
    } else {
        let shown: String = ctx.message.chars().take(width).collect();
        message.push(&shown, StyleAttr::Message);
        let (row, col) = state.cursor_screen_position();
        (col, row)
    };
    lines.push(message);

    trace!(target: "render", rows = height, cols = width, "frame_composed");
    Frame {
        width: u16::try_from(width).unwrap_or(u16::MAX),
        lines,
        cursor: (
            u16::try_from(cursor.0).unwrap_or(u16::MAX),
            u16::try_from(cursor.1).unwrap_or(u16::MAX),
        ),
    }
}

/// Visible part of `row`, starting at the horizontal offset, with highlight
/// and selection attributes.
fn push_row_text(line: &mut FrameLine, state: &EditorState, row: &Row, text_cols: usize) {
    let tab_stop = state.rows().tab_stop();
    let selection = state.selection.filter(|_| state.mode.is_visual());
    let tags = row.highlight();
    let start = state.col_offset;
    let end = start + text_cols;
    let mut rx = 0usize;
    let mut buf = [0u8; 4];
    for (i, ch) in row.render().chars().enumerate() {
        let w = char_width(ch);
        let cell = rx;
        rx += w;
        if cell < start {
            continue;
        }
        if cell + w > end {
            break;
        }
        let kind = tags.get(i).copied().unwrap_or(TokenKind::Normal);
        let selected = selection.is_some_and(|sel| {
            let cx = row.rx_to_cx(cell, tab_stop);
            sel.contains(row.index(), cx)
        });
        let attr = if selected {
            StyleAttr::Selected(kind)
        } else {
            StyleAttr::Token(kind)
        };
        line.push(ch.encode_utf8(&mut buf), attr);
    }
    // An empty row inside a line selection still shows one selected cell.
    if row.is_empty()
        && start == 0
        && text_cols > 0
        && selection.is_some_and(|sel| sel.contains(row.index(), 0))
    {
        line.push(" ", StyleAttr::Selected(TokenKind::Normal));
    }
}

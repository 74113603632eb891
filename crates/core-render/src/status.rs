//! Status bar composition.
//!
//! Two stages: [`compose_status`] turns editor state into ordered
//! [`StatusSegment`]s, and [`format_status`] lays them out into a line of an
//! exact width, left segments first, right segments flush right. The left
//! side is truncated when the bar is too narrow; the right side is dropped
//! before it would overlap.
//!
//! Layout: `[MODE] name[*] - N lines` ... `pending  syntax | Ln X/Y, Col Z`.

use std::borrow::Cow;
use std::path::Path;

use core_state::{EditorState, Mode};

pub struct StatusContext<'a> {
    pub mode: Mode,
    /// 0-based cursor row.
    pub line: usize,
    /// 0-based render column.
    pub col: usize,
    pub total_lines: usize,
    pub file_name: Option<&'a Path>,
    pub dirty: bool,
    pub syntax: Option<&'a str>,
    /// Count/prefix keys typed so far (`3d`).
    pub pending: &'a str,
}

impl<'a> StatusContext<'a> {
    pub fn from_state(state: &'a EditorState, pending: &'a str) -> Self {
        Self {
            mode: state.mode,
            line: state.cursor.row,
            col: state.render_col(),
            total_lines: state.num_rows(),
            file_name: state.file_name.as_deref(),
            dirty: state.dirty,
            syntax: state.rows().syntax_name(),
            pending,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusSegment<'a> {
    Mode(&'static str),
    /// File name, ` [No Name]` when unnamed, with a trailing `*` when dirty.
    FileName(Cow<'a, str>),
    LineCount(usize),
    Pending(&'a str),
    Syntax(&'a str),
    Position { line_1: usize, total: usize, col_1: usize },
}

impl StatusSegment<'_> {
    fn is_right(&self) -> bool {
        matches!(
            self,
            StatusSegment::Pending(_) | StatusSegment::Syntax(_) | StatusSegment::Position { .. }
        )
    }
}

pub fn compose_status<'a>(ctx: &StatusContext<'a>) -> Vec<StatusSegment<'a>> {
    let name: Cow<'a, str> = match ctx.file_name.and_then(|p| p.file_name()) {
        Some(name) => name.to_string_lossy(),
        None => Cow::Borrowed("[No Name]"),
    };
    let name = if ctx.dirty {
        Cow::Owned(format!("{name}*"))
    } else {
        name
    };
    let mut out = Vec::with_capacity(6);
    out.push(StatusSegment::Mode(ctx.mode.label()));
    out.push(StatusSegment::FileName(name));
    out.push(StatusSegment::LineCount(ctx.total_lines));
    if !ctx.pending.is_empty() {
        out.push(StatusSegment::Pending(ctx.pending));
    }
    out.push(StatusSegment::Syntax(ctx.syntax.unwrap_or("no ft")));
    out.push(StatusSegment::Position {
        line_1: ctx.line + 1,
        total: ctx.total_lines,
        col_1: ctx.col + 1,
    });
    out
}

/// Lay out `segments` into exactly `width` columns.
pub fn format_status(segments: &[StatusSegment<'_>], width: usize) -> String {
    use std::fmt::Write as _;
    let mut left = String::with_capacity(width);
    let mut right = String::new();
    for seg in segments {
        let side = if seg.is_right() { &mut right } else { &mut left };
        let _ = match seg {
            StatusSegment::Mode(m) => write!(side, "[{m}]"),
            StatusSegment::FileName(name) => write!(side, " {name}"),
            StatusSegment::LineCount(n) => write!(side, " - {n} lines"),
            StatusSegment::Pending(p) => write!(side, "{p}  "),
            StatusSegment::Syntax(s) => write!(side, "{s} | "),
            StatusSegment::Position {
                line_1,
                total,
                col_1,
            } => write!(side, "Ln {line_1}/{total}, Col {col_1}"),
        };
    }
    let mut line: String = left.chars().take(width).collect();
    let used = line.chars().count();
    let right_len = right.chars().count();
    if used + right_len < width {
        line.extend(std::iter::repeat_n(' ', width - used - right_len));
        line.push_str(&right);
    } else {
        line.extend(std::iter::repeat_n(' ', width - used));
    }
    line
}

/// Compose and format in one step.
pub fn build_status(ctx: &StatusContext<'_>, width: usize) -> String {
    format_status(&compose_status(ctx), width)
}

//! Cursor motions.
//!
//! Pure functions from (rows, position) to a new position. They never touch
//! the document or the undo log; mode-specific column clamping is applied by
//! the caller afterwards.

use core_text::{Position, RowStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motion {
    Left,
    Right,
    Up,
    Down,
    WordForward,
    WordBackward,
    WordEnd,
    LineStart,
    FirstNonBlank,
    LineEnd,
    DocStart,
    DocEnd,
    /// 1-based line number.
    GotoLine(usize),
    PageUp,
    PageDown,
}

impl Motion {
    /// Motions whose count is a target rather than a repeat.
    fn is_absolute(self) -> bool {
        matches!(
            self,
            Motion::LineStart
                | Motion::FirstNonBlank
                | Motion::LineEnd
                | Motion::DocStart
                | Motion::DocEnd
                | Motion::GotoLine(_)
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Class {
    /// Whitespace, including the virtual newline at the end of a row.
    Space,
    /// An empty row.
    Empty,
    Word,
    Punct,
}

fn class_at(rows: &RowStore, p: Position) -> Class {
    let Some(row) = rows.get(p.row) else {
        return Class::Empty;
    };
    match row.char_at(p.col) {
        None if row.is_empty() => Class::Empty,
        None => Class::Space,
        Some(c) if c.is_whitespace() => Class::Space,
        Some(c) if c.is_alphanumeric() || c == '_' => Class::Word,
        Some(_) => Class::Punct,
    }
}

fn next(rows: &RowStore, p: Position) -> Option<Position> {
    if p.col < rows.row_size(p.row) {
        Some(Position::new(p.row, p.col + 1))
    } else if p.row + 1 < rows.len() {
        Some(Position::new(p.row + 1, 0))
    } else {
        None
    }
}

fn prev(rows: &RowStore, p: Position) -> Option<Position> {
    if p.col > 0 {
        Some(Position::new(p.row, p.col - 1))
    } else if p.row > 0 {
        Some(Position::new(p.row - 1, rows.row_size(p.row - 1)))
    } else {
        None
    }
}

fn word_forward(rows: &RowStore, pos: Position) -> Position {
    let mut p = pos;
    let start = class_at(rows, p);
    if matches!(start, Class::Word | Class::Punct) {
        while class_at(rows, p) == start {
            match next(rows, p) {
                Some(n) => p = n,
                None => return p,
            }
        }
    } else if start == Class::Empty {
        match next(rows, p) {
            Some(n) => p = n,
            None => return p,
        }
    }
    while class_at(rows, p) == Class::Space {
        match next(rows, p) {
            Some(n) => p = n,
            None => return p,
        }
    }
    p
}

fn word_backward(rows: &RowStore, pos: Position) -> Position {
    let Some(mut p) = prev(rows, pos) else {
        return pos;
    };
    while class_at(rows, p) == Class::Space {
        match prev(rows, p) {
            Some(q) => p = q,
            None => return p,
        }
    }
    let class = class_at(rows, p);
    if class == Class::Empty {
        return p;
    }
    while let Some(q) = prev(rows, p)
        && class_at(rows, q) == class
    {
        p = q;
    }
    p
}

fn word_end(rows: &RowStore, pos: Position) -> Position {
    let Some(mut p) = next(rows, pos) else {
        return pos;
    };
    while matches!(class_at(rows, p), Class::Space | Class::Empty) {
        match next(rows, p) {
            Some(q) => p = q,
            None => return pos,
        }
    }
    let class = class_at(rows, p);
    while let Some(q) = next(rows, p)
        && class_at(rows, q) == class
    {
        p = q;
    }
    p
}

pub fn first_non_blank(rows: &RowStore, row: usize) -> usize {
    rows.get(row)
        .and_then(|r| r.raw().chars().position(|c| !c.is_whitespace()))
        .unwrap_or(0)
}

fn vertical(rows: &RowStore, pos: Position, target_row: usize) -> Position {
    let last = rows.len().saturating_sub(1);
    let row = target_row.min(last);
    Position::new(row, pos.col.min(rows.row_size(row)))
}

fn step(rows: &RowStore, pos: Position, motion: Motion, page: usize) -> Position {
    match motion {
        Motion::Left => Position::new(pos.row, pos.col.saturating_sub(1)),
        Motion::Right => Position::new(pos.row, (pos.col + 1).min(rows.row_size(pos.row))),
        Motion::Up => vertical(rows, pos, pos.row.saturating_sub(1)),
        Motion::Down => vertical(rows, pos, pos.row + 1),
        Motion::PageUp => vertical(rows, pos, pos.row.saturating_sub(page)),
        Motion::PageDown => vertical(rows, pos, pos.row + page),
        Motion::WordForward => word_forward(rows, pos),
        Motion::WordBackward => word_backward(rows, pos),
        Motion::WordEnd => word_end(rows, pos),
        Motion::LineStart => Position::new(pos.row, 0),
        Motion::FirstNonBlank => Position::new(pos.row, first_non_blank(rows, pos.row)),
        Motion::LineEnd => Position::new(pos.row, rows.row_size(pos.row)),
        Motion::DocStart => Position::new(0, 0),
        Motion::DocEnd => Position::new(rows.len().saturating_sub(1), 0),
        Motion::GotoLine(n) => {
            let row = n.saturating_sub(1).min(rows.len().saturating_sub(1));
            Position::new(row, first_non_blank(rows, row))
        }
    }
}

/// Apply `motion` `count` times (once for absolute motions). `page` is the
/// distance of a page motion.
pub fn apply(rows: &RowStore, pos: Position, motion: Motion, count: usize, page: usize) -> Position {
    if rows.is_empty() {
        return Position::origin();
    }
    let times = if motion.is_absolute() { 1 } else { count.max(1) };
    let mut p = pos;
    for _ in 0..times {
        let n = step(rows, p, motion, page.max(1));
        if n == p {
            break;
        }
        p = n;
    }
    p
}

/// Clamp for modes whose cursor rests on a character (Normal, Visual).
pub fn clamp_to_char(rows: &RowStore, pos: Position) -> Position {
    let size = rows.row_size(pos.row);
    Position::new(pos.row, pos.col.min(size.saturating_sub(1)))
}

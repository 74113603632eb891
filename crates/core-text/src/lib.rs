//! Row-oriented text storage for the xcodex editor.
//!
//! A document is an ordered sequence of [`Row`]s owned by a [`RowStore`]. Each
//! row owns its raw content (no trailing newline) plus two derived caches:
//! the *render* form (tabs expanded, control characters substituted) and one
//! highlight tag per rendered character. The caches are recomputed by the
//! store after every raw mutation; nothing else may write them.
//!
//! Columns are `char` offsets into the raw content. A column equal to the
//! row's size is the "past the last character" insertion point.
//!
//! The primitives in this crate are *not* undo-tracked. Tracked edits live in
//! `core-state`, which records an undo entry around each primitive call and
//! replays history through these same primitives.

use thiserror::Error;

pub mod highlight;
pub mod row;
pub mod store;
pub mod width;

pub use highlight::{Highlight, HighlightResult, TokenKind};
pub use row::Row;
pub use store::RowStore;

/// Default render width of a tab character.
pub const DEFAULT_TAB_STOP: usize = 4;

/// A cursor or span endpoint in file coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    pub fn origin() -> Self {
        Self { row: 0, col: 0 }
    }
}

/// Errors raised by row mutations. Bounds problems are never errors (they are
/// no-ops); only allocation failure is surfaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TextError {
    #[error("out of memory while editing row content")]
    OutOfMemory,
}

pub type TextResult<T> = Result<T, TextError>;

/// Byte offset of the `col`-th char in `s`, or `s.len()` when `col` equals the
/// char count. `None` when `col` is past the end.
pub fn byte_offset(s: &str, col: usize) -> Option<usize> {
    if col == 0 {
        return Some(0);
    }
    let mut seen = 0usize;
    for (idx, _) in s.char_indices() {
        if seen == col {
            return Some(idx);
        }
        seen += 1;
    }
    if seen == col { Some(s.len()) } else { None }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn byte_offset_ascii_and_multibyte() {
        assert_eq!(byte_offset("abc", 0), Some(0));
        assert_eq!(byte_offset("abc", 3), Some(3));
        assert_eq!(byte_offset("abc", 4), None);
        assert_eq!(byte_offset("héllo", 2), Some(3));
        assert_eq!(byte_offset("", 0), Some(0));
        assert_eq!(byte_offset("", 1), None);
    }

    #[test]
    fn positions_order_row_then_col() {
        assert!(Position::new(0, 9) < Position::new(1, 0));
        assert!(Position::new(2, 1) < Position::new(2, 3));
    }
}

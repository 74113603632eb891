//! Visual selections, the yank buffer and paste.
//!
//! A selection keeps its anchor in `start` and follows the cursor with `end`;
//! readers normalize before use. Character and block selections include the
//! end column.

use core_text::Position;
use tracing::debug;

use crate::{EditResult, EditorState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionKind {
    Char,
    Line,
    Block,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisualSelection {
    /// Anchor, fixed while the selection is active.
    pub start: Position,
    /// Follows the cursor.
    pub end: Position,
    pub kind: SelectionKind,
}

impl VisualSelection {
    pub fn collapsed(at: Position, kind: SelectionKind) -> Self {
        Self {
            start: at,
            end: at,
            kind,
        }
    }

    /// Endpoints in document order. Block selections normalize rows and
    /// columns independently so the pair spans the rectangle.
    pub fn normalized(&self) -> (Position, Position) {
        match self.kind {
            SelectionKind::Block => (
                Position::new(
                    self.start.row.min(self.end.row),
                    self.start.col.min(self.end.col),
                ),
                Position::new(
                    self.start.row.max(self.end.row),
                    self.start.col.max(self.end.col),
                ),
            ),
            _ if self.start <= self.end => (self.start, self.end),
            _ => (self.end, self.start),
        }
    }

    /// Whether the char at (`row`, `col`) falls inside the selection.
    pub fn contains(&self, row: usize, col: usize) -> bool {
        let (s, e) = self.normalized();
        if row < s.row || row > e.row {
            return false;
        }
        match self.kind {
            SelectionKind::Line => true,
            SelectionKind::Block => col >= s.col && col <= e.col,
            SelectionKind::Char => {
                let after_start = row > s.row || col >= s.col;
                let before_end = row < e.row || col <= e.col;
                after_start && before_end
            }
        }
    }
}

/// Last yanked or deleted text. `line_mode` text is a sequence of
/// newline-terminated rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YankBuffer {
    pub text: String,
    pub line_mode: bool,
}

impl EditorState {
    /// Replace the yank buffer.
    pub fn yank(&mut self, text: String, line_mode: bool) {
        debug!(target: "state.yank", bytes = text.len(), line_mode, "yank");
        self.yank = Some(YankBuffer { text, line_mode });
    }

    /// Text covered by the active selection and whether it is line-wise.
    /// `None` without a selection or when it covers nothing.
    pub fn selected_text(&self) -> Option<(String, bool)> {
        let sel = self.selection?;
        let (s, e) = sel.normalized();
        let len = self.rows.len();
        if s.row >= len {
            return None;
        }
        let last = e.row.min(len - 1);
        let mut out = String::new();
        match sel.kind {
            SelectionKind::Line => {
                for row in s.row..=last {
                    out.push_str(self.rows.get(row)?.raw());
                    out.push('\n');
                }
            }
            SelectionKind::Block => {
                for row in s.row..=last {
                    if row > s.row {
                        out.push('\n');
                    }
                    out.push_str(self.rows.get(row)?.slice(s.col, e.col + 1));
                }
            }
            SelectionKind::Char if s.row == last => {
                out.push_str(self.rows.get(s.row)?.slice(s.col, e.col + 1));
            }
            SelectionKind::Char => {
                let first = self.rows.get(s.row)?;
                out.push_str(first.slice(s.col, first.size()));
                for row in s.row + 1..last {
                    out.push('\n');
                    out.push_str(self.rows.get(row)?.raw());
                }
                out.push('\n');
                let end_col = if last == e.row { e.col + 1 } else { usize::MAX };
                out.push_str(self.rows.get(last)?.slice(0, end_col));
            }
        }
        if out.is_empty() {
            None
        } else {
            Some((out, sel.kind == SelectionKind::Line))
        }
    }

    /// Remove the selected text as one undo group and leave the cursor at
    /// the selection start. Returns false when nothing was selected.
    pub fn delete_selected_text(&mut self) -> EditResult<bool> {
        let Some(sel) = self.selection else {
            return Ok(false);
        };
        let (s, e) = sel.normalized();
        let len = self.rows.len();
        if s.row >= len {
            return Ok(false);
        }
        let last = e.row.min(len - 1);
        self.start_group();
        match sel.kind {
            SelectionKind::Line => {
                for row in (s.row..=last).rev() {
                    self.delete_row(row);
                }
                if self.rows.is_empty() {
                    self.insert_row(0, "")?;
                }
                self.cursor = Position::new(s.row, 0);
            }
            SelectionKind::Block => {
                for row in s.row..=last {
                    self.delete_span(row, s.col, e.col + 1);
                }
                self.cursor = s;
            }
            SelectionKind::Char if s.row == last => {
                self.delete_span(s.row, s.col, e.col + 1);
                self.cursor = s;
            }
            SelectionKind::Char => {
                self.delete_span(s.row, s.col, usize::MAX);
                for row in (s.row + 1..last).rev() {
                    self.delete_row(row);
                }
                let end_col = if last == e.row { e.col + 1 } else { usize::MAX };
                self.delete_span(s.row + 1, 0, end_col);
                self.join_rows(s.row)?;
                self.cursor = s;
            }
        }
        self.selection = None;
        self.clamp_cursor();
        self.scroll();
        Ok(true)
    }

    /// Delete the chars of `row` in `[from, to)`, clamped to the row.
    fn delete_span(&mut self, row: usize, from: usize, to: usize) {
        let size = self.rows.row_size(row);
        let to = to.min(size);
        for _ in from.min(to)..to {
            self.delete_char_at(row, from);
        }
    }

    /// Text of `count` rows starting at `row`, each newline-terminated.
    pub fn lines_text(&self, row: usize, count: usize) -> Option<String> {
        if row >= self.rows.len() || count == 0 {
            return None;
        }
        let last = (row + count).min(self.rows.len());
        let mut out = String::new();
        for r in row..last {
            out.push_str(self.rows.get(r)?.raw());
            out.push('\n');
        }
        Some(out)
    }

    /// Delete `count` rows starting at `row`, keeping at least one row in the
    /// document. Returns the removed text. Does not start an undo group.
    pub fn delete_lines(&mut self, row: usize, count: usize) -> EditResult<Option<String>> {
        let Some(text) = self.lines_text(row, count) else {
            return Ok(None);
        };
        let last = (row + count).min(self.rows.len());
        for r in (row..last).rev() {
            self.delete_row(r);
        }
        if self.rows.is_empty() {
            self.insert_row(0, "")?;
        }
        self.cursor = Position::new(row, 0);
        self.clamp_cursor();
        Ok(Some(text))
    }

    /// Insert the yank buffer. Line-mode text goes below the cursor row (or at
    /// row 0 of an empty document) with the cursor on the first pasted row;
    /// char-mode text is typed at the cursor. Returns false when the buffer is
    /// empty. Does not start an undo group.
    pub fn paste(&mut self) -> EditResult<bool> {
        let Some(buf) = self.yank.clone() else {
            return Ok(false);
        };
        if buf.text.is_empty() {
            return Ok(false);
        }
        if buf.line_mode {
            let at = if self.rows.is_empty() {
                0
            } else {
                (self.cursor.row + 1).min(self.rows.len())
            };
            for (i, line) in buf.text.split_terminator('\n').enumerate() {
                self.insert_row(at + i, line)?;
            }
            self.cursor = Position::new(at, 0);
        } else {
            for ch in buf.text.chars() {
                if ch == '\n' {
                    self.insert_newline()?;
                } else {
                    self.insert_char(ch)?;
                }
            }
        }
        self.scroll();
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::UndoOutcome;
    use core_text::RowStore;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn state(lines: &[&str]) -> EditorState {
        EditorState::new(RowStore::from_lines(lines.iter().copied(), 4))
    }

    fn raws(st: &EditorState) -> Vec<String> {
        st.rows().rows().iter().map(|r| r.raw().to_owned()).collect()
    }

    fn select(st: &mut EditorState, a: (usize, usize), b: (usize, usize), kind: SelectionKind) {
        st.selection = Some(VisualSelection {
            start: Position::new(a.0, a.1),
            end: Position::new(b.0, b.1),
            kind,
        });
    }

    #[test]
    fn line_selection_text_and_delete() {
        let mut st = state(&["abc", "def", "ghi"]);
        select(&mut st, (1, 0), (1, 0), SelectionKind::Line);
        assert_eq!(st.selected_text(), Some(("def\n".to_string(), true)));
        assert!(st.delete_selected_text().unwrap());
        assert_eq!(raws(&st), vec!["abc", "ghi"]);
        assert_eq!(st.cursor, Position::new(1, 0));
        st.undo();
        assert_eq!(raws(&st), vec!["abc", "def", "ghi"]);
    }

    #[test]
    fn char_selection_includes_end_column() {
        let mut st = state(&["hello world"]);
        select(&mut st, (0, 4), (0, 0), SelectionKind::Char);
        assert_eq!(st.selected_text(), Some(("hello".to_string(), false)));
        st.delete_selected_text().unwrap();
        assert_eq!(raws(&st), vec![" world"]);
        assert_eq!(st.cursor, Position::origin());
    }

    #[test]
    fn multi_row_char_delete_joins_remnants_in_one_group() {
        let mut st = state(&["abcd", "efgh", "ijkl"]);
        select(&mut st, (0, 2), (2, 1), SelectionKind::Char);
        assert_eq!(
            st.selected_text(),
            Some(("cd\nefgh\nij".to_string(), false))
        );
        st.start_group();
        st.delete_selected_text().unwrap();
        assert_eq!(raws(&st), vec!["abkl"]);
        assert_eq!(st.cursor, Position::new(0, 2));
        assert!(matches!(st.undo(), UndoOutcome::Reverted { .. }));
        assert_eq!(raws(&st), vec!["abcd", "efgh", "ijkl"]);
    }

    #[test]
    fn block_selection_is_rectangular() {
        let mut st = state(&["abcd", "ef", "ijkl"]);
        select(&mut st, (2, 2), (0, 1), SelectionKind::Block);
        assert_eq!(
            st.selected_text(),
            Some(("bc\nf\njk".to_string(), false))
        );
        st.delete_selected_text().unwrap();
        assert_eq!(raws(&st), vec!["ad", "e", "il"]);
        assert_eq!(st.cursor, Position::new(0, 1));
    }

    #[test]
    fn deleting_every_line_leaves_one_empty_row() {
        let mut st = state(&["a", "b"]);
        select(&mut st, (0, 0), (1, 0), SelectionKind::Line);
        st.delete_selected_text().unwrap();
        assert_eq!(raws(&st), vec![""]);
    }

    #[test]
    fn no_selection_yields_nothing() {
        let mut st = state(&["a"]);
        assert_eq!(st.selected_text(), None);
        assert!(!st.delete_selected_text().unwrap());
    }

    #[test]
    fn line_paste_goes_below_cursor() {
        let mut st = state(&["one", "two"]);
        st.yank("x\ny\n".into(), true);
        st.start_group();
        assert!(st.paste().unwrap());
        assert_eq!(raws(&st), vec!["one", "x", "y", "two"]);
        assert_eq!(st.cursor, Position::new(1, 0));
    }

    #[test]
    fn line_paste_into_empty_document() {
        let mut st = EditorState::default();
        st.yank("x\n".into(), true);
        st.paste().unwrap();
        assert_eq!(raws(&st), vec!["x"]);
    }

    #[test]
    fn char_paste_types_at_cursor() {
        let mut st = state(&["ad"]);
        st.cursor = Position::new(0, 1);
        st.yank("b\nc".into(), false);
        st.paste().unwrap();
        assert_eq!(raws(&st), vec!["ab", "cd"]);
    }

    #[test]
    fn paste_without_yank_is_noop() {
        let mut st = state(&["a"]);
        assert!(!st.paste().unwrap());
        st.yank(String::new(), false);
        assert!(!st.paste().unwrap());
        assert!(!st.dirty);
    }

    #[test]
    fn delete_lines_keeps_one_row() {
        let mut st = state(&["a", "b", "c"]);
        let text = st.delete_lines(1, 5).unwrap();
        assert_eq!(text.as_deref(), Some("b\nc\n"));
        assert_eq!(raws(&st), vec!["a"]);
        assert_eq!(st.cursor, Position::new(0, 0));
    }

    proptest! {
        #[test]
        fn normalized_endpoints_are_ordered(
            a in (0usize..50, 0usize..50),
            b in (0usize..50, 0usize..50),
            block in any::<bool>(),
        ) {
            let kind = if block { SelectionKind::Block } else { SelectionKind::Char };
            let sel = VisualSelection {
                start: Position::new(a.0, a.1),
                end: Position::new(b.0, b.1),
                kind,
            };
            let (s, e) = sel.normalized();
            prop_assert!(s <= e);
            if block {
                prop_assert!(s.col <= e.col);
            }
            prop_assert!(sel.contains(s.row, s.col));
            prop_assert!(sel.contains(e.row, e.col));
        }

        #[test]
        fn selected_text_ignores_drag_direction(
            a in (0usize..6, 0usize..12),
            b in (0usize..6, 0usize..12),
            kind in prop_oneof![
                Just(SelectionKind::Char),
                Just(SelectionKind::Line),
                Just(SelectionKind::Block),
            ],
        ) {
            let mut st = state(&["alpha", "", "be\tta", "gamma delta", "x"]);
            let (a, b) = (Position::new(a.0, a.1), Position::new(b.0, b.1));
            st.selection = Some(VisualSelection { start: a, end: b, kind });
            let forward = st.selected_text();
            st.selection = Some(VisualSelection { start: b, end: a, kind });
            prop_assert_eq!(forward, st.selected_text());
        }
    }
}

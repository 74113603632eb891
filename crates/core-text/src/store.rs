//! Ordered row storage with index bookkeeping and derived-cache maintenance.
//!
//! Invariants (hold after every public call):
//! * `rows[i].index() == i` for every `i`.
//! * Every row's render form and highlight tags reflect its current raw text.
//! * `gutter_width()` is a function of the current row count.

use std::sync::Arc;

use tracing::trace;

use crate::{DEFAULT_TAB_STOP, Highlight, Row, TextError, TextResult, TokenKind};

pub struct RowStore {
    rows: Vec<Row>,
    tab_stop: usize,
    highlighter: Option<Arc<dyn Highlight>>,
    gutter_width: usize,
}

impl Default for RowStore {
    fn default() -> Self {
        Self::new(DEFAULT_TAB_STOP)
    }
}

impl std::fmt::Debug for RowStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RowStore")
            .field("rows", &self.rows.len())
            .field("tab_stop", &self.tab_stop)
            .field("syntax", &self.highlighter.as_ref().map(|h| h.name().to_string()))
            .finish()
    }
}

impl RowStore {
    pub fn new(tab_stop: usize) -> Self {
        let mut store = Self {
            rows: Vec::new(),
            tab_stop: tab_stop.max(1),
            highlighter: None,
            gutter_width: 0,
        };
        store.recompute_gutter();
        store
    }

    /// Build a store from already split raw lines (file load collaborator output).
    pub fn from_lines<I, S>(lines: I, tab_stop: usize) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut store = Self::new(tab_stop);
        let tab_stop = store.tab_stop;
        store.rows = lines
            .into_iter()
            .enumerate()
            .map(|(i, l)| Row::new(i, l.into(), tab_stop))
            .collect();
        store.recompute_gutter();
        store.rehighlight_all();
        store
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, at: usize) -> Option<&Row> {
        self.rows.get(at)
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Size in chars of row `at`, zero when the row does not exist.
    pub fn row_size(&self, at: usize) -> usize {
        self.rows.get(at).map(Row::size).unwrap_or(0)
    }

    pub fn tab_stop(&self) -> usize {
        self.tab_stop
    }

    pub fn set_tab_stop(&mut self, tab_stop: usize) {
        self.tab_stop = tab_stop.max(1);
        for row in &mut self.rows {
            row.refresh_render(self.tab_stop);
        }
        self.rehighlight_all();
    }

    /// Width of the line-number gutter: digits of the row count plus one
    /// separator column.
    pub fn gutter_width(&self) -> usize {
        self.gutter_width
    }

    pub fn syntax_name(&self) -> Option<&str> {
        self.highlighter.as_deref().map(|h| h.name())
    }

    /// Swap the highlighting collaborator and re-tag every row.
    pub fn set_highlighter(&mut self, highlighter: Option<Arc<dyn Highlight>>) {
        self.highlighter = highlighter;
        self.rehighlight_all();
    }

    /// Insert a new row at `at` (`0 <= at <= len`). Returns false when `at` is
    /// out of range.
    pub fn insert_row(&mut self, at: usize, text: impl Into<String>) -> TextResult<bool> {
        if at > self.rows.len() {
            return Ok(false);
        }
        self.rows
            .try_reserve(1)
            .map_err(|_| TextError::OutOfMemory)?;
        self.rows.insert(at, Row::new(at, text.into(), self.tab_stop));
        self.renumber_from(at);
        self.recompute_gutter();
        self.update_row(at);
        self.rehighlight_from(at + 1);
        trace!(target: "state.rows", at, rows = self.rows.len(), "row_inserted");
        Ok(true)
    }

    /// Remove row `at`, returning its raw content.
    pub fn remove_row(&mut self, at: usize) -> Option<String> {
        if at >= self.rows.len() {
            return None;
        }
        let row = self.rows.remove(at);
        self.renumber_from(at);
        self.recompute_gutter();
        self.rehighlight_from(at);
        trace!(target: "state.rows", at, rows = self.rows.len(), "row_removed");
        Some(row.raw)
    }

    /// Insert `ch` at (`row`, `col`); `col` may equal the row size.
    pub fn insert_char(&mut self, row: usize, col: usize, ch: char) -> TextResult<bool> {
        let Some(r) = self.rows.get_mut(row) else {
            return Ok(false);
        };
        if !r.insert_char(col, ch)? {
            return Ok(false);
        }
        self.update_row(row);
        Ok(true)
    }

    /// Remove and return the char at (`row`, `col`).
    pub fn remove_char(&mut self, row: usize, col: usize) -> Option<char> {
        let ch = self.rows.get_mut(row)?.remove_char(col)?;
        self.update_row(row);
        Some(ch)
    }

    /// Append `s` to the end of row `row`.
    pub fn append_str(&mut self, row: usize, s: &str) -> TextResult<bool> {
        let Some(r) = self.rows.get_mut(row) else {
            return Ok(false);
        };
        r.append_str(s)?;
        self.update_row(row);
        Ok(true)
    }

    /// Split row `row` at `col`; the tail becomes a new row at `row + 1`.
    pub fn split_row(&mut self, row: usize, col: usize) -> TextResult<bool> {
        match self.rows.get(row) {
            Some(r) if col <= r.size() => {}
            _ => return Ok(false),
        }
        self.rows
            .try_reserve(1)
            .map_err(|_| TextError::OutOfMemory)?;
        let Some(tail) = self.rows[row].split_off(col) else {
            return Ok(false);
        };
        self.rows.insert(row + 1, Row::new(row + 1, tail, self.tab_stop));
        self.renumber_from(row + 1);
        self.recompute_gutter();
        self.update_row(row);
        self.update_row(row + 1);
        self.rehighlight_from(row + 2);
        Ok(true)
    }

    /// Append row `row + 1` onto row `row` and remove it. Returns the column
    /// at which the rows were joined.
    pub fn join_with_next(&mut self, row: usize) -> TextResult<Option<usize>> {
        if row + 1 >= self.rows.len() {
            return Ok(None);
        }
        let join_col = self.rows[row].size();
        let tail = std::mem::take(&mut self.rows[row + 1].raw);
        if let Err(e) = self.rows[row].append_str(&tail) {
            self.rows[row + 1].raw = tail;
            return Err(e);
        }
        self.rows.remove(row + 1);
        self.renumber_from(row + 1);
        self.recompute_gutter();
        self.update_row(row);
        self.rehighlight_from(row + 1);
        Ok(Some(join_col))
    }

    /// Recompute the render form of row `at` and its highlight tags. When the
    /// row's open-comment state changes the following rows are re-tagged too.
    pub fn update_row(&mut self, at: usize) {
        let Some(row) = self.rows.get_mut(at) else {
            return;
        };
        row.refresh_render(self.tab_stop);
        if self.highlight_row(at) {
            self.rehighlight_from(at + 1);
        }
    }

    /// Concatenate all rows, each followed by a newline.
    pub fn to_flat_string(&self) -> String {
        let total: usize = self.rows.iter().map(|r| r.raw.len() + 1).sum();
        let mut out = String::with_capacity(total);
        for row in &self.rows {
            out.push_str(&row.raw);
            out.push('\n');
        }
        out
    }

    fn renumber_from(&mut self, at: usize) {
        for (i, row) in self.rows.iter_mut().enumerate().skip(at) {
            row.idx = i;
        }
    }

    fn recompute_gutter(&mut self) {
        let mut digits = 1usize;
        let mut n = self.rows.len();
        while n >= 10 {
            n /= 10;
            digits += 1;
        }
        self.gutter_width = digits + 1;
    }

    fn rehighlight_all(&mut self) {
        for at in 0..self.rows.len() {
            self.highlight_row(at);
        }
    }

    /// Re-tag rows starting at `at` until one keeps its open-comment state.
    fn rehighlight_from(&mut self, at: usize) {
        let mut i = at;
        while i < self.rows.len() {
            if !self.highlight_row(i) {
                break;
            }
            i += 1;
        }
    }

    /// Re-tag row `at`; returns true when its open-comment flag changed.
    fn highlight_row(&mut self, at: usize) -> bool {
        let prev_open = at > 0 && self.rows[at - 1].hl_open_comment;
        let highlighter = self.highlighter.clone();
        let row = &mut self.rows[at];
        let before = row.hl_open_comment;
        let render_len = row.render.chars().count();
        match highlighter {
            Some(h) => {
                let mut result = h.highlight(&row.render, prev_open);
                result.tags.resize(render_len, TokenKind::Normal);
                row.hl = result.tags;
                row.hl_open_comment = result.open_comment;
            }
            None => {
                row.hl = vec![TokenKind::Normal; render_len];
                row.hl_open_comment = false;
            }
        }
        before != row.hl_open_comment
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::HighlightResult;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn raw_lines(store: &RowStore) -> Vec<&str> {
        store.rows().iter().map(Row::raw).collect()
    }

    /// Toy highlighter: `/*` opens a comment, `*/` closes it.
    struct SlashStar;

    impl Highlight for SlashStar {
        fn name(&self) -> &str {
            "toy"
        }
        fn highlight(&self, render: &str, prev_open: bool) -> HighlightResult {
            let mut open = prev_open;
            let mut tags = Vec::new();
            let chars: Vec<char> = render.chars().collect();
            let mut i = 0;
            while i < chars.len() {
                if !open && chars[i] == '/' && chars.get(i + 1) == Some(&'*') {
                    open = true;
                } else if open && chars[i] == '*' && chars.get(i + 1) == Some(&'/') {
                    tags.push(TokenKind::MultiLineComment);
                    tags.push(TokenKind::MultiLineComment);
                    i += 2;
                    open = false;
                    continue;
                }
                tags.push(if open {
                    TokenKind::MultiLineComment
                } else {
                    TokenKind::Normal
                });
                i += 1;
            }
            HighlightResult {
                tags,
                open_comment: open,
            }
        }
    }

    #[test]
    fn insert_and_remove_rows_renumber() {
        let mut store = RowStore::from_lines(["a", "b", "c"], 4);
        assert!(store.insert_row(1, "x").unwrap());
        assert_eq!(raw_lines(&store), vec!["a", "x", "b", "c"]);
        assert_eq!(store.remove_row(0).as_deref(), Some("a"));
        for (i, row) in store.rows().iter().enumerate() {
            assert_eq!(row.index(), i);
        }
    }

    #[test]
    fn out_of_range_is_noop() {
        let mut store = RowStore::from_lines(["a"], 4);
        assert!(!store.insert_row(5, "x").unwrap());
        assert_eq!(store.remove_row(1), None);
        assert!(!store.insert_char(3, 0, 'x').unwrap());
        assert_eq!(store.remove_char(0, 1), None);
        assert!(!store.split_row(0, 2).unwrap());
        assert_eq!(store.join_with_next(0).unwrap(), None);
        assert_eq!(raw_lines(&store), vec!["a"]);
    }

    #[test]
    fn split_and_join_are_inverse() {
        let mut store = RowStore::from_lines(["helloworld"], 4);
        assert!(store.split_row(0, 5).unwrap());
        assert_eq!(raw_lines(&store), vec!["hello", "world"]);
        assert_eq!(store.join_with_next(0).unwrap(), Some(5));
        assert_eq!(raw_lines(&store), vec!["helloworld"]);
    }

    #[test]
    fn flat_string_appends_newline_per_row() {
        assert_eq!(RowStore::new(4).to_flat_string(), "");
        let store = RowStore::from_lines(["a", ""], 4);
        assert_eq!(store.to_flat_string(), "a\n\n");
    }

    #[test]
    fn gutter_tracks_row_count() {
        let mut store = RowStore::from_lines(vec!["x"; 9], 4);
        assert_eq!(store.gutter_width(), 2);
        store.insert_row(9, "y").unwrap();
        assert_eq!(store.gutter_width(), 3);
        store.remove_row(0);
        assert_eq!(store.gutter_width(), 2);
    }

    #[test]
    fn open_comment_state_flows_forward() {
        let mut store = RowStore::from_lines(["int a;", "int b;", "int c;"], 4);
        store.set_highlighter(Some(Arc::new(SlashStar)));
        assert!(!store.get(1).unwrap().ends_in_open_comment());
        // Opening a comment on row 0 re-tags every following row.
        store.insert_char(0, 0, '*').unwrap();
        store.insert_char(0, 0, '/').unwrap();
        assert!(store.get(0).unwrap().ends_in_open_comment());
        assert!(store.get(2).unwrap().ends_in_open_comment());
        assert_eq!(
            store.get(2).unwrap().highlight()[0],
            TokenKind::MultiLineComment
        );
        // Closing it again flows forward as well.
        store.append_str(1, "*/").unwrap();
        assert!(!store.get(1).unwrap().ends_in_open_comment());
        assert_eq!(store.get(2).unwrap().highlight()[0], TokenKind::Normal);
    }

    #[test]
    fn highlight_tags_cover_render() {
        let mut store = RowStore::from_lines(["\tab"], 4);
        store.set_highlighter(Some(Arc::new(SlashStar)));
        let row = store.get(0).unwrap();
        assert_eq!(row.highlight().len(), row.render().chars().count());
    }

    #[derive(Debug, Clone)]
    enum RowOp {
        Insert(usize),
        Remove(usize),
        Split(usize, usize),
        Join(usize),
    }

    fn row_op() -> impl Strategy<Value = RowOp> {
        prop_oneof![
            (0usize..12).prop_map(RowOp::Insert),
            (0usize..12).prop_map(RowOp::Remove),
            (0usize..12, 0usize..6).prop_map(|(r, c)| RowOp::Split(r, c)),
            (0usize..12).prop_map(RowOp::Join),
        ]
    }

    proptest! {
        #[test]
        fn row_index_matches_position(ops in proptest::collection::vec(row_op(), 0..64)) {
            let mut store = RowStore::from_lines(["abc", "de", "fghij"], 4);
            for op in ops {
                match op {
                    RowOp::Insert(at) => { store.insert_row(at, "new").unwrap(); }
                    RowOp::Remove(at) => { store.remove_row(at); }
                    RowOp::Split(r, c) => { store.split_row(r, c).unwrap(); }
                    RowOp::Join(r) => { store.join_with_next(r).unwrap(); }
                }
                for (i, row) in store.rows().iter().enumerate() {
                    prop_assert_eq!(row.index(), i);
                }
            }
        }
    }
}

//! Tracked edit operations.
//!
//! Each operation mutates the row store first and records its inverse only
//! after the mutation succeeded, so a failed step never leaves a stale undo
//! entry behind. Room for that entry is reserved before the mutation. All
//! entries carry the cursor as it was before the step.

use core_text::Position;
use tracing::trace;

use crate::undo::{EditOp, UndoOutcome};
use crate::{EditResult, EditorState};

impl EditorState {
    /// Begin a new undo group.
    pub fn start_group(&mut self) {
        self.undo.start_group();
    }

    /// Reverse the most recent undo group and restore the cursor recorded
    /// before it began.
    pub fn undo(&mut self) -> UndoOutcome {
        let outcome = self.undo.undo(&mut self.rows);
        if let UndoOutcome::Reverted { cursor, steps, .. } = outcome {
            self.cursor = cursor;
            self.clamp_cursor();
            if steps > 0 {
                self.dirty = true;
            }
            self.scroll();
        }
        outcome
    }

    /// All rows joined with a trailing newline each.
    pub fn rows_to_flat_string(&self) -> String {
        self.rows.to_flat_string()
    }

    fn record(&mut self, op: EditOp, before: Position) {
        self.dirty = true;
        self.undo.push(op, before);
    }

    /// Insert a row holding `text` at `at`.
    pub fn insert_row(&mut self, at: usize, text: &str) -> EditResult<bool> {
        self.undo.reserve()?;
        if !self.rows.insert_row(at, text)? {
            return Ok(false);
        }
        self.record(EditOp::InsertLine { row: at }, self.cursor);
        Ok(true)
    }

    /// Remove row `at`, returning its content.
    pub fn delete_row(&mut self, at: usize) -> Option<String> {
        let text = self.rows.remove_row(at)?;
        self.record(
            EditOp::DeleteLine {
                row: at,
                text: text.clone(),
            },
            self.cursor,
        );
        Some(text)
    }

    /// Insert `ch` at (`row`, `col`) without moving the cursor.
    pub fn insert_char_at(&mut self, row: usize, col: usize, ch: char) -> EditResult<bool> {
        self.undo.reserve()?;
        if !self.rows.insert_char(row, col, ch)? {
            return Ok(false);
        }
        self.record(EditOp::InsertChar { row, col }, self.cursor);
        Ok(true)
    }

    /// Remove the char at (`row`, `col`) without moving the cursor.
    pub fn delete_char_at(&mut self, row: usize, col: usize) -> Option<char> {
        let ch = self.rows.remove_char(row, col)?;
        self.record(EditOp::DeleteChar { row, col, ch }, self.cursor);
        Some(ch)
    }

    /// Append row `row + 1` onto `row`. Returns the join column.
    pub fn join_rows(&mut self, row: usize) -> EditResult<Option<usize>> {
        let Some(text) = self.rows.get(row + 1).map(|r| r.raw().to_owned()) else {
            return Ok(None);
        };
        self.undo.reserve()?;
        let Some(col) = self.rows.join_with_next(row)? else {
            return Ok(None);
        };
        self.record(EditOp::JoinLine { row, col, text }, self.cursor);
        Ok(Some(col))
    }

    /// Pad the document with empty rows so the cursor row exists, and the row
    /// with spaces so the cursor column is inside it.
    fn materialize_cursor(&mut self) -> EditResult<()> {
        while self.cursor.row >= self.rows.len() {
            let at = self.rows.len();
            self.insert_row(at, "")?;
        }
        let row = self.cursor.row;
        let mut size = self.rows.row_size(row);
        while size < self.cursor.col {
            self.insert_char_at(row, size, ' ')?;
            size += 1;
        }
        Ok(())
    }

    /// Insert `ch` at the cursor and advance one column.
    pub fn insert_char(&mut self, ch: char) -> EditResult<()> {
        self.materialize_cursor()?;
        let Position { row, col } = self.cursor;
        if self.insert_char_at(row, col, ch)? {
            self.cursor.col += 1;
        }
        trace!(target: "state.edit", row, col, "insert_char");
        Ok(())
    }

    /// Break the line at the cursor. At column 0 an empty row is inserted
    /// above; otherwise the row is split. The cursor lands at the start of
    /// the following row.
    pub fn insert_newline(&mut self) -> EditResult<()> {
        self.materialize_cursor()?;
        let Position { row, col } = self.cursor;
        if col == 0 {
            self.insert_row(row, "")?;
        } else {
            self.undo.reserve()?;
            if !self.rows.split_row(row, col)? {
                return Ok(());
            }
            self.record(EditOp::SplitLine { row, col }, self.cursor);
        }
        self.cursor = Position::new(row + 1, 0);
        trace!(target: "state.edit", row, col, "insert_newline");
        Ok(())
    }

    /// Backspace: remove the char left of the cursor, or join the row onto
    /// its predecessor at column 0. Returns false at the document start.
    pub fn delete_char_before(&mut self) -> EditResult<bool> {
        let Position { row, col } = self.cursor;
        if row >= self.rows.len() {
            // past-end padding row: step back onto the last real row
            if row > 0 && col == 0 {
                self.cursor = Position::new(row - 1, self.rows.row_size(row - 1));
            }
            return Ok(false);
        }
        if col == 0 {
            if row == 0 {
                return Ok(false);
            }
            let Some(join_col) = self.join_rows(row - 1)? else {
                return Ok(false);
            };
            self.cursor = Position::new(row - 1, join_col);
            return Ok(true);
        }
        let col = col.min(self.rows.row_size(row));
        if col == 0 {
            self.cursor.col = 0;
            return Ok(false);
        }
        if self.delete_char_at(row, col - 1).is_none() {
            return Ok(false);
        }
        self.cursor.col = col - 1;
        Ok(true)
    }

    /// Forward delete (`Delete` key): remove the char under the cursor, or
    /// join the next row when the cursor sits at the end of its row.
    pub fn delete_char_forward(&mut self) -> EditResult<bool> {
        let Position { row, col } = self.cursor;
        if row >= self.rows.len() {
            return Ok(false);
        }
        if col < self.rows.row_size(row) {
            return Ok(self.delete_char_at(row, col).is_some());
        }
        Ok(self.join_rows(row)?.is_some())
    }
}

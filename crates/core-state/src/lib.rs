//! Editor state: row store, cursor and viewport, mode, undo log, selection
//! and yank buffer.
//!
//! Every content mutation that should be undoable goes through the tracked
//! operations in [`document`]; they mutate the [`RowStore`] and push one
//! [`undo::EditOp`] each. Undo replay itself talks to the store directly and
//! never re-enters the tracked layer.
//!
//! This crate never writes user-visible status text. Callers in the dispatch
//! layer translate outcomes (`UndoOutcome`, `EditError`) into messages.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use core_text::{Position, Row, RowStore};

pub mod document;
pub mod error;
pub mod selection;
pub mod undo;

pub use error::{EditError, EditResult};
pub use selection::{SelectionKind, VisualSelection, YankBuffer};
pub use undo::{EditOp, UNDO_CAPACITY, UndoEntry, UndoLog, UndoOutcome};

/// Editing mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Normal,
    Insert,
    /// Character-wise selection.
    Visual,
    VisualLine,
    VisualBlock,
    /// `:` command line entry.
    Command,
}

impl Mode {
    /// Status bar label.
    pub fn label(self) -> &'static str {
        match self {
            Mode::Normal => "NORMAL",
            Mode::Insert => "INSERT",
            Mode::Visual => "VISUAL",
            Mode::VisualLine => "V-LINE",
            Mode::VisualBlock => "V-BLOCK",
            Mode::Command => "COMMAND",
        }
    }

    pub fn is_visual(self) -> bool {
        matches!(self, Mode::Visual | Mode::VisualLine | Mode::VisualBlock)
    }

    /// Selection kind carried by a visual mode.
    pub fn selection_kind(self) -> Option<SelectionKind> {
        match self {
            Mode::Visual => Some(SelectionKind::Char),
            Mode::VisualLine => Some(SelectionKind::Line),
            Mode::VisualBlock => Some(SelectionKind::Block),
            _ => None,
        }
    }
}

/// Text typed after `:` (without the colon).
#[derive(Debug, Default, Clone)]
pub struct CommandLineState {
    buf: String,
}

impl CommandLineState {
    pub fn buffer(&self) -> &str {
        &self.buf
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn clear(&mut self) {
        self.buf.clear();
    }

    pub fn push_char(&mut self, ch: char) {
        self.buf.push(ch);
    }

    /// Remove the last char; returns false when the buffer was already empty.
    pub fn backspace(&mut self) -> bool {
        self.buf.pop().is_some()
    }

    /// Take the typed text, leaving the buffer empty.
    pub fn take(&mut self) -> String {
        std::mem::take(&mut self.buf)
    }
}

/// Status message with the instant it was set; the renderer hides it after
/// the configured timeout.
#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub text: String,
    pub set_at: Instant,
}

impl StatusMessage {
    pub fn is_expired(&self, timeout: Duration) -> bool {
        self.set_at.elapsed() >= timeout
    }
}

/// Top-level editor state container.
#[derive(Debug)]
pub struct EditorState {
    rows: RowStore,
    /// Cursor in file coordinates (row, char column).
    pub cursor: Position,
    pub row_offset: usize,
    pub col_offset: usize,
    screen_rows: usize,
    screen_cols: usize,
    pub mode: Mode,
    pub file_name: Option<PathBuf>,
    pub dirty: bool,
    undo: UndoLog,
    pub selection: Option<VisualSelection>,
    yank: Option<YankBuffer>,
    pub command_line: CommandLineState,
    pub status: Option<StatusMessage>,
    pub show_line_numbers: bool,
}

impl Default for EditorState {
    fn default() -> Self {
        Self::new(RowStore::default())
    }
}

impl EditorState {
    pub fn new(rows: RowStore) -> Self {
        Self::with_undo_capacity(rows, UNDO_CAPACITY)
    }

    pub fn with_undo_capacity(rows: RowStore, capacity: usize) -> Self {
        Self {
            rows,
            cursor: Position::origin(),
            row_offset: 0,
            col_offset: 0,
            screen_rows: 24,
            screen_cols: 80,
            mode: Mode::Normal,
            file_name: None,
            dirty: false,
            undo: UndoLog::new(capacity),
            selection: None,
            yank: None,
            command_line: CommandLineState::default(),
            status: None,
            show_line_numbers: true,
        }
    }

    pub fn rows(&self) -> &RowStore {
        &self.rows
    }

    pub fn row(&self, at: usize) -> Option<&Row> {
        self.rows.get(at)
    }

    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn current_row(&self) -> Option<&Row> {
        self.rows.get(self.cursor.row)
    }

    pub fn undo_log(&self) -> &UndoLog {
        &self.undo
    }

    pub fn yank_buffer(&self) -> Option<&YankBuffer> {
        self.yank.as_ref()
    }

    /// Replace the whole document (file open). History, selection and the
    /// viewport are reset; the yank buffer survives.
    pub fn replace_rows(&mut self, rows: RowStore) {
        let tab_stop = self.rows.tab_stop();
        self.rows = rows;
        self.rows.set_tab_stop(tab_stop);
        self.undo.clear();
        self.selection = None;
        self.cursor = Position::origin();
        self.row_offset = 0;
        self.col_offset = 0;
        self.dirty = false;
    }

    pub fn set_highlighter(&mut self, highlighter: Option<std::sync::Arc<dyn core_text::Highlight>>) {
        self.rows.set_highlighter(highlighter);
    }

    pub fn set_tab_stop(&mut self, tab_stop: usize) {
        self.rows.set_tab_stop(tab_stop);
    }

    pub fn set_status<S: Into<String>>(&mut self, text: S) {
        self.status = Some(StatusMessage {
            text: text.into(),
            set_at: Instant::now(),
        });
    }

    pub fn status_text(&self) -> Option<&str> {
        self.status.as_ref().map(|m| m.text.as_str())
    }

    pub fn screen_rows(&self) -> usize {
        self.screen_rows
    }

    pub fn screen_cols(&self) -> usize {
        self.screen_cols
    }

    /// Text area size, excluding the status and message bars.
    pub fn set_screen_size(&mut self, rows: usize, cols: usize) {
        self.screen_rows = rows.max(1);
        self.screen_cols = cols.max(1);
        self.scroll();
    }

    /// Columns taken by the line number gutter (0 when hidden).
    pub fn gutter_width(&self) -> usize {
        if self.show_line_numbers {
            self.rows.gutter_width()
        } else {
            0
        }
    }

    /// Cursor column in render space.
    pub fn render_col(&self) -> usize {
        self.current_row()
            .map(|row| row.cx_to_rx(self.cursor.col, self.rows.tab_stop()))
            .unwrap_or(0)
    }

    /// Clamp the cursor to the document: row to the last row (0 for an empty
    /// document), column to the row length.
    pub fn clamp_cursor(&mut self) {
        let len = self.rows.len();
        if len == 0 {
            self.cursor = Position::origin();
            return;
        }
        if self.cursor.row >= len {
            self.cursor.row = len - 1;
        }
        let size = self.rows.row_size(self.cursor.row);
        if self.cursor.col > size {
            self.cursor.col = size;
        }
    }

    /// Adjust row/col offsets so the cursor stays visible.
    pub fn scroll(&mut self) {
        let rx = self.render_col();
        if self.cursor.row < self.row_offset {
            self.row_offset = self.cursor.row;
        }
        if self.cursor.row >= self.row_offset + self.screen_rows {
            self.row_offset = self.cursor.row + 1 - self.screen_rows;
        }
        let text_cols = self.screen_cols.saturating_sub(self.gutter_width()).max(1);
        if rx < self.col_offset {
            self.col_offset = rx;
        }
        if rx >= self.col_offset + text_cols {
            self.col_offset = rx + 1 - text_cols;
        }
    }

    /// Terminal position (row, col) of the cursor relative to the text area.
    pub fn cursor_screen_position(&self) -> (usize, usize) {
        let row = self.cursor.row.saturating_sub(self.row_offset);
        let col = self.render_col().saturating_sub(self.col_offset) + self.gutter_width();
        (row, col)
    }
}

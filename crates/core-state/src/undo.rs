//! Bounded, grouped undo log.
//!
//! Every tracked edit in `EditorState` pushes one [`UndoEntry`] describing a
//! primitive row operation plus the cursor position *before* it. Entries are
//! tagged with the current group id; [`UndoLog::undo`] pops and reverses all
//! entries sharing the top-of-stack group id in one sweep.
//!
//! Replay calls the untracked [`RowStore`] primitives directly, and holds the
//! log by unique borrow for the whole sweep, so reversing history can never
//! push new entries. The `replaying` flag mirrors that window for `push`.

use std::collections::VecDeque;

use core_text::{Position, RowStore, TextError};
use tracing::{trace, warn};

use crate::{EditError, EditResult};

/// Default maximum number of entries retained.
pub const UNDO_CAPACITY: usize = 1000;

/// One reversible primitive row operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOp {
    /// A char was inserted at (`row`, `col`). Inverse: remove it.
    InsertChar { row: usize, col: usize },
    /// `ch` was removed from (`row`, `col`). Inverse: re-insert it.
    DeleteChar { row: usize, col: usize, ch: char },
    /// An empty or given row was inserted at `row`. Inverse: remove it.
    InsertLine { row: usize },
    /// Row `row` holding `text` was removed. Inverse: re-insert it.
    DeleteLine { row: usize, text: String },
    /// Row `row` was split at `col`. Inverse: join `row + 1` back onto it.
    SplitLine { row: usize, col: usize },
    /// The row holding `text` was appended to `row` at `col`. Inverse: split
    /// `row` at `col`, recreating the successor.
    JoinLine { row: usize, col: usize, text: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UndoEntry {
    pub op: EditOp,
    pub group: u64,
    /// Cursor position before the operation was applied.
    pub cursor: Position,
}

/// Result of an undo request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UndoOutcome {
    /// Empty stack or a replay already in progress.
    NothingToUndo,
    Reverted {
        /// Primitive operations reversed.
        steps: usize,
        /// Operations that could not be reapplied (bounds or allocation).
        skipped: usize,
        /// Cursor recorded before the earliest entry of the group.
        cursor: Position,
    },
}

#[derive(Debug)]
pub struct UndoLog {
    entries: VecDeque<UndoEntry>,
    capacity: usize,
    group: u64,
    replaying: bool,
}

impl Default for UndoLog {
    fn default() -> Self {
        Self::new(UNDO_CAPACITY)
    }
}

impl UndoLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            capacity: capacity.max(1),
            group: 0,
            replaying: false,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn current_group(&self) -> u64 {
        self.group
    }

    pub fn is_replaying(&self) -> bool {
        self.replaying
    }

    pub fn entries(&self) -> impl Iterator<Item = &UndoEntry> {
        self.entries.iter()
    }

    /// Begin a new group; every later push belongs to it.
    pub fn start_group(&mut self) {
        self.group += 1;
        trace!(target: "state.undo", group = self.group, "start_group");
    }

    /// Make room for one more entry before a tracked edit mutates the rows.
    pub fn reserve(&mut self) -> EditResult<()> {
        if self.replaying || self.entries.len() == self.capacity {
            return Ok(());
        }
        self.entries
            .try_reserve(1)
            .map_err(|_| EditError::OutOfMemory)
    }

    /// Record `op` in the current group, evicting the oldest entry at capacity.
    pub fn push(&mut self, op: EditOp, cursor: Position) {
        if self.replaying {
            return;
        }
        if self.entries.len() == self.capacity {
            if let Some(evicted) = self.entries.pop_front() {
                trace!(target: "state.undo", group = evicted.group, "undo_evicted");
            }
        }
        trace!(target: "state.undo", group = self.group, ?op, depth = self.entries.len() + 1, "push");
        self.entries.push_back(UndoEntry {
            op,
            group: self.group,
            cursor,
        });
    }

    /// Drop all history (document close / reload).
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Reverse every entry of the most recent group against `rows`.
    pub fn undo(&mut self, rows: &mut RowStore) -> UndoOutcome {
        if self.replaying {
            return UndoOutcome::NothingToUndo;
        }
        let Some(group) = self.entries.back().map(|e| e.group) else {
            return UndoOutcome::NothingToUndo;
        };
        self.replaying = true;
        let mut steps = 0usize;
        let mut skipped = 0usize;
        let mut cursor = Position::origin();
        while self.entries.back().is_some_and(|e| e.group == group) {
            let Some(entry) = self.entries.pop_back() else {
                break;
            };
            match reverse(rows, &entry.op) {
                Ok(true) => steps += 1,
                Ok(false) => {
                    skipped += 1;
                    warn!(target: "state.undo", op = ?entry.op, "undo_step_out_of_range");
                }
                Err(err) => {
                    skipped += 1;
                    warn!(target: "state.undo", op = ?entry.op, %err, "undo_step_skipped");
                }
            }
            cursor = entry.cursor;
        }
        self.replaying = false;
        trace!(target: "state.undo", group, steps, skipped, depth = self.entries.len(), "undo");
        UndoOutcome::Reverted {
            steps,
            skipped,
            cursor,
        }
    }
}

fn reverse(rows: &mut RowStore, op: &EditOp) -> Result<bool, TextError> {
    match op {
        EditOp::InsertChar { row, col } => Ok(rows.remove_char(*row, *col).is_some()),
        EditOp::DeleteChar { row, col, ch } => rows.insert_char(*row, *col, *ch),
        EditOp::InsertLine { row } => Ok(rows.remove_row(*row).is_some()),
        EditOp::DeleteLine { row, text } => rows.insert_row(*row, text.as_str()),
        EditOp::SplitLine { row, .. } => Ok(rows.join_with_next(*row)?.is_some()),
        EditOp::JoinLine { row, col, text } => {
            let split = rows.split_row(*row, *col)?;
            debug_assert!(
                !split || rows.get(*row + 1).map(|r| r.raw()) == Some(text.as_str()),
                "re-split row must match the joined payload"
            );
            Ok(split)
        }
    }
}

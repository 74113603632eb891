//! Mode transitions.
//!
//! Entering or leaving Insert always opens a new undo group, so every Insert
//! session (including the row created by `o`/`O`) undoes as one unit.

use core_state::{EditResult, EditorState, Mode, SelectionKind, VisualSelection};
use core_text::Position;
use tracing::debug;

use super::{InsertEntry, Transition, motion};
use crate::key_translator::KeyTranslator;

fn visual_mode(kind: SelectionKind) -> Mode {
    match kind {
        SelectionKind::Char => Mode::Visual,
        SelectionKind::Line => Mode::VisualLine,
        SelectionKind::Block => Mode::VisualBlock,
    }
}

/// Perform `transition`. Returns `(from, to)` when the mode changed.
pub(crate) fn apply_transition(
    state: &mut EditorState,
    keys: &mut KeyTranslator,
    transition: Transition,
) -> EditResult<Option<(Mode, Mode)>> {
    let from = state.mode;
    match transition {
        Transition::Stay => return Ok(None),
        Transition::Normal => {
            if from == Mode::Insert {
                state.start_group();
                state.cursor.col = state.cursor.col.saturating_sub(1);
            }
            state.selection = None;
            state.mode = Mode::Normal;
        }
        Transition::Insert(entry) => {
            state.selection = None;
            state.start_group();
            state.mode = Mode::Insert;
            position_for_insert(state, entry)?;
        }
        Transition::Visual(kind) => {
            let cursor = state.cursor;
            match state.selection.as_mut() {
                Some(sel) if from.is_visual() => sel.kind = kind,
                _ => state.selection = Some(VisualSelection::collapsed(cursor, kind)),
            }
            state.mode = visual_mode(kind);
        }
        Transition::Command => {
            state.command_line.clear();
            state.mode = Mode::Command;
        }
    }
    keys.reset();
    let to = state.mode;
    debug!(target: "actions.dispatch", ?from, ?to, "mode_transition");
    Ok((from != to).then_some((from, to)))
}

fn position_for_insert(state: &mut EditorState, entry: InsertEntry) -> EditResult<()> {
    let row = state.cursor.row;
    let size = state.rows().row_size(row);
    match entry {
        InsertEntry::AtCursor => {}
        InsertEntry::Append => state.cursor.col = (state.cursor.col + 1).min(size),
        InsertEntry::AppendEol => state.cursor.col = size,
        InsertEntry::FirstNonBlank => {
            state.cursor.col = motion::first_non_blank(state.rows(), row);
        }
        InsertEntry::OpenBelow => {
            let at = if state.num_rows() == 0 { 0 } else { row + 1 };
            state.insert_row(at, "")?;
            state.cursor = Position::new(at, 0);
        }
        InsertEntry::OpenAbove => {
            let at = row.min(state.num_rows());
            state.insert_row(at, "")?;
            state.cursor = Position::new(at, 0);
        }
    }
    Ok(())
}

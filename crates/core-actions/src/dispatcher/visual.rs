//! Visual modes (character, line, block): selection extension and the
//! selection operators `y`, `d`/`x` and `c`.

use core_events::{KeyCode, KeyEvent};
use core_state::{EditorState, SelectionKind, VisualSelection};
use tracing::debug;

use super::{
    Ctx, DispatchResult, Effect, InsertEntry, Transition, edit_failed, goto_motion, motion,
    motion_for, move_cursor,
};
use crate::key_translator::Translation;

const PREFIXES: &[char] = &['g'];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operator {
    Yank,
    Delete,
    Change,
}

pub(super) fn handle(ctx: &mut Ctx<'_>, key: &KeyEvent) -> DispatchResult {
    let (key, count, prefix) = match ctx.keys.translate(key, PREFIXES) {
        Translation::Pending | Translation::Swallowed => return DispatchResult::stay(),
        Translation::Ready { key, count, prefix } => (key, count, prefix),
    };
    if key.is_cancel() {
        return DispatchResult::to(Transition::Normal);
    }
    let state = &mut *ctx.state;
    let n = count.unwrap_or(1) as usize;
    if prefix == Some('g') {
        move_cursor(state, goto_motion(count), 1);
        extend(state);
        return DispatchResult::stay();
    }
    if let Some(m) = motion_for(&key, count) {
        move_cursor(state, m, n);
        extend(state);
        return DispatchResult::stay();
    }
    if key.is_ctrl('v') {
        return switch_kind(state, SelectionKind::Block);
    }
    if key.is_ctrl('q') {
        return DispatchResult::stay().with(Effect::Quit { force: false });
    }
    if key.code == KeyCode::Delete {
        return apply_operator(state, Operator::Delete);
    }
    match key.printable() {
        Some('v') => switch_kind(state, SelectionKind::Char),
        Some('V') => switch_kind(state, SelectionKind::Line),
        Some('y') => apply_operator(state, Operator::Yank),
        Some('d') | Some('x') => apply_operator(state, Operator::Delete),
        Some('c') => apply_operator(state, Operator::Change),
        _ => DispatchResult::stay(),
    }
}

/// Move the selection's free end to the (char-clamped) cursor.
fn extend(state: &mut EditorState) {
    state.cursor = motion::clamp_to_char(state.rows(), state.cursor);
    let cursor = state.cursor;
    let kind = state.mode.selection_kind().unwrap_or(SelectionKind::Char);
    let sel = state
        .selection
        .get_or_insert_with(|| VisualSelection::collapsed(cursor, kind));
    sel.end = cursor;
}

/// The key of the active kind leaves Visual; another kind switches to it.
fn switch_kind(state: &EditorState, kind: SelectionKind) -> DispatchResult {
    if state.mode.selection_kind() == Some(kind) {
        DispatchResult::to(Transition::Normal)
    } else {
        DispatchResult::to(Transition::Visual(kind))
    }
}

fn apply_operator(state: &mut EditorState, op: Operator) -> DispatchResult {
    let Some(sel) = state.selection else {
        return DispatchResult::to(Transition::Normal).status("Nothing selected");
    };
    let Some((text, line_mode)) = state.selected_text() else {
        return DispatchResult::to(Transition::Normal).status("Nothing selected");
    };
    let (start, _) = sel.normalized();
    let lines = text.matches('\n').count();
    debug!(target: "actions.dispatch", ?op, kind = ?sel.kind, bytes = text.len(), "visual_operator");
    state.yank(text, line_mode);
    match op {
        Operator::Yank => {
            state.selection = None;
            state.cursor = start;
            if line_mode && lines > 1 {
                DispatchResult::to(Transition::Normal).status(format!("{lines} lines yanked"))
            } else {
                DispatchResult::to(Transition::Normal)
            }
        }
        Operator::Delete => match state.delete_selected_text() {
            Ok(_) => DispatchResult::to(Transition::Normal),
            Err(err) => edit_failed(err),
        },
        Operator::Change => {
            if let Err(err) = state.delete_selected_text() {
                return edit_failed(err);
            }
            if line_mode {
                let at = start.row.min(state.num_rows());
                let only_blank_left = state.num_rows() == 1
                    && state.row(0).is_some_and(|r| r.is_empty())
                    && at == 0;
                if !only_blank_left && let Err(err) = state.insert_row(at, "") {
                    return edit_failed(err);
                }
                state.cursor = core_text::Position::new(at, 0);
            }
            DispatchResult::to(Transition::Insert(InsertEntry::AtCursor))
        }
    }
}

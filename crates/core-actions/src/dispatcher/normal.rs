//! Normal mode: motions, counts, two-key sequences and discrete edits.
//!
//! Every mutating command starts its own undo group before doing any work,
//! so a counted command (`3x`, `2dd`, `4p`) undoes with a single `u`.

use core_events::KeyEvent;
use core_state::{EditorState, SelectionKind};
use tracing::trace;

use super::{
    Ctx, DispatchResult, Effect, InsertEntry, Transition, edit_failed, goto_motion, motion_for,
    move_cursor, undo,
};
use crate::key_translator::Translation;

const PREFIXES: &[char] = &['g', 'd', 'y'];

pub(super) fn handle(ctx: &mut Ctx<'_>, key: &KeyEvent) -> DispatchResult {
    let (key, count, prefix) = match ctx.keys.translate(key, PREFIXES) {
        Translation::Pending | Translation::Swallowed => return DispatchResult::stay(),
        Translation::Ready { key, count, prefix } => (key, count, prefix),
    };
    let n = count.unwrap_or(1) as usize;
    trace!(target: "actions.dispatch", key = %key, count = n, ?prefix, "normal_key");
    match prefix {
        Some('g') => {
            move_cursor(ctx.state, goto_motion(count), 1);
            DispatchResult::stay()
        }
        Some('d') => delete_lines(ctx.state, n),
        Some('y') => yank_lines(ctx.state, n),
        _ => command(ctx.state, &key, count, n),
    }
}

fn command(state: &mut EditorState, key: &KeyEvent, count: Option<u32>, n: usize) -> DispatchResult {
    if let Some(motion) = motion_for(key, count) {
        move_cursor(state, motion, n);
        return DispatchResult::stay();
    }
    if key.is_ctrl('v') {
        return DispatchResult::to(Transition::Visual(SelectionKind::Block));
    }
    if key.is_ctrl('q') {
        return DispatchResult::stay().with(Effect::Quit { force: false });
    }
    if key.code == core_events::KeyCode::Delete {
        return delete_chars(state, n);
    }
    let Some(c) = key.printable() else {
        return DispatchResult::stay();
    };
    match c {
        'x' => delete_chars(state, n),
        'i' => DispatchResult::to(Transition::Insert(InsertEntry::AtCursor)),
        'a' => DispatchResult::to(Transition::Insert(InsertEntry::Append)),
        'A' => DispatchResult::to(Transition::Insert(InsertEntry::AppendEol)),
        'I' => DispatchResult::to(Transition::Insert(InsertEntry::FirstNonBlank)),
        'o' => DispatchResult::to(Transition::Insert(InsertEntry::OpenBelow)),
        'O' => DispatchResult::to(Transition::Insert(InsertEntry::OpenAbove)),
        'v' => DispatchResult::to(Transition::Visual(SelectionKind::Char)),
        'V' => DispatchResult::to(Transition::Visual(SelectionKind::Line)),
        ':' => DispatchResult::to(Transition::Command),
        'p' => paste(state, n),
        'u' => undo::handle_undo(state, n),
        _ => DispatchResult::stay(),
    }
}

/// `x`: delete up to `n` chars starting under the cursor, never past the
/// end of the row.
fn delete_chars(state: &mut EditorState, n: usize) -> DispatchResult {
    let row = state.cursor.row;
    let size = state.rows().row_size(row);
    if size == 0 {
        return DispatchResult::stay();
    }
    let col = state.cursor.col.min(size - 1);
    state.cursor.col = col;
    state.start_group();
    let mut removed = String::new();
    for _ in 0..n {
        match state.delete_char_at(row, col) {
            Some(ch) => removed.push(ch),
            None => break,
        }
    }
    if !removed.is_empty() {
        state.yank(removed, false);
    }
    DispatchResult::stay()
}

/// `dd`
fn delete_lines(state: &mut EditorState, n: usize) -> DispatchResult {
    if state.num_rows() == 0 {
        return DispatchResult::stay();
    }
    state.start_group();
    match state.delete_lines(state.cursor.row, n) {
        Ok(Some(text)) => {
            state.yank(text, true);
            DispatchResult::stay()
        }
        Ok(None) => DispatchResult::stay(),
        Err(err) => edit_failed(err),
    }
}

/// `yy`
fn yank_lines(state: &mut EditorState, n: usize) -> DispatchResult {
    let Some(text) = state.lines_text(state.cursor.row, n) else {
        return DispatchResult::stay();
    };
    let lines = text.matches('\n').count();
    state.yank(text, true);
    if lines > 1 {
        DispatchResult::stay().status(format!("{lines} lines yanked"))
    } else {
        DispatchResult::stay()
    }
}

/// `p`: paste `n` times as one undo group.
fn paste(state: &mut EditorState, n: usize) -> DispatchResult {
    if state.yank_buffer().is_none_or(|y| y.text.is_empty()) {
        return DispatchResult::stay().status("Nothing to paste");
    }
    state.start_group();
    for _ in 0..n {
        match state.paste() {
            Ok(true) => {}
            Ok(false) => break,
            Err(err) => return edit_failed(err),
        }
    }
    DispatchResult::stay()
}

//! Insert mode: text entry, deletion, navigation and completion.
//!
//! All edits land in the undo group opened when Insert was entered, so the
//! whole session undoes at once.

use core_events::{KeyCode, KeyEvent};
use core_plugin::is_word_char;
use core_state::EditorState;
use core_text::Position;

use super::{Ctx, DispatchResult, Effect, Transition, edit_failed, move_cursor, nav_motion};

pub(super) fn handle(ctx: &mut Ctx<'_>, key: &KeyEvent) -> DispatchResult {
    if key.is_cancel() {
        return DispatchResult::to(Transition::Normal);
    }
    if let Some(motion) = nav_motion(key) {
        move_cursor(ctx.state, motion, 1);
        return DispatchResult::stay();
    }
    if key.is_ctrl('n') {
        return complete(ctx);
    }
    if key.is_ctrl('q') {
        return DispatchResult::stay().with(Effect::Quit { force: false });
    }
    let state = &mut *ctx.state;
    let outcome = match key.code {
        KeyCode::Enter => state.insert_newline().map(|_| DispatchResult::stay()),
        KeyCode::Backspace => state.delete_char_before().map(|_| DispatchResult::stay()),
        _ if key.is_ctrl('h') => state.delete_char_before().map(|_| DispatchResult::stay()),
        KeyCode::Delete => state.delete_char_forward().map(|_| DispatchResult::stay()),
        KeyCode::Tab => return typed(state, '\t'),
        _ => match key.printable() {
            Some(ch) => return typed(state, ch),
            None => Ok(DispatchResult::stay()),
        },
    };
    outcome.unwrap_or_else(edit_failed)
}

fn typed(state: &mut EditorState, ch: char) -> DispatchResult {
    if let Err(err) = state.insert_char(ch) {
        return edit_failed(err);
    }
    let at = Position::new(state.cursor.row, state.cursor.col.saturating_sub(1));
    DispatchResult::stay().with(Effect::CharInserted { ch, at })
}

/// Word prefix left of the cursor on the current row.
fn word_prefix(state: &EditorState) -> String {
    let Some(row) = state.current_row() else {
        return String::new();
    };
    let head = row.slice(0, state.cursor.col);
    let start = head
        .char_indices()
        .rev()
        .take_while(|(_, c)| is_word_char(*c))
        .last()
        .map(|(i, _)| i)
        .unwrap_or(head.len());
    head[start..].to_owned()
}

/// `Ctrl-N`: insert the remainder of the first completion candidate, one
/// `CharInserted` per char.
fn complete(ctx: &mut Ctx<'_>) -> DispatchResult {
    let prefix = word_prefix(ctx.state);
    let candidates = ctx.completion.candidates(&prefix, ctx.state.rows());
    let Some(word) = candidates.first() else {
        return DispatchResult::stay().status("No completions");
    };
    let rest = word.get(prefix.len()..).unwrap_or_default();
    let more = candidates.len() - 1;
    let mut result = if more > 0 {
        DispatchResult::stay().status(format!("Completed {word} ({more} more)"))
    } else {
        DispatchResult::stay().status(format!("Completed {word}"))
    };
    for ch in rest.chars() {
        if let Err(err) = ctx.state.insert_char(ch) {
            return edit_failed(err);
        }
        let at = Position::new(ctx.state.cursor.row, ctx.state.cursor.col.saturating_sub(1));
        result = result.with(Effect::CharInserted { ch, at });
    }
    result
}

//! Undo dispatch.

use core_state::{EditorState, UndoOutcome};
use tracing::trace;

use super::DispatchResult;

/// Undo up to `n` groups and report how many primitive changes were reversed.
pub(crate) fn handle_undo(state: &mut EditorState, n: usize) -> DispatchResult {
    let mut groups = 0usize;
    let mut steps = 0usize;
    let mut skipped = 0usize;
    for _ in 0..n {
        match state.undo() {
            UndoOutcome::NothingToUndo => break,
            UndoOutcome::Reverted {
                steps: s,
                skipped: k,
                ..
            } => {
                groups += 1;
                steps += s;
                skipped += k;
            }
        }
    }
    trace!(target: "actions.dispatch", op = "undo", groups, steps, skipped, "undo");
    if groups == 0 {
        return DispatchResult::stay().status("Already at oldest change");
    }
    let noun = if steps == 1 { "change" } else { "changes" };
    if skipped > 0 {
        DispatchResult::stay().status(format!(
            "{steps} {noun} undone, {skipped} could not be restored"
        ))
    } else {
        DispatchResult::stay().status(format!("{steps} {noun} undone"))
    }
}

//! Command line editing & execution (`:w`, `:q`, `:<n>`, `:set`, `:syntax`).
//!
//! Editing keys only touch the command buffer. `Enter` parses the buffer
//! and returns to Normal with the command's effects; file writes and quits
//! are carried out by `Editor`, which owns the I/O collaborator and the quit
//! guard.

use core_events::{KeyCode, KeyEvent};
use core_state::EditorState;
use tracing::info;

use super::command_parser::{CommandParser, ParsedCommand};
use super::{Ctx, DispatchResult, Effect, Motion, Transition, move_cursor};

pub(super) fn handle(ctx: &mut Ctx<'_>, key: &KeyEvent) -> DispatchResult {
    let state = &mut *ctx.state;
    if key.is_cancel() {
        state.command_line.clear();
        return DispatchResult::to(Transition::Normal);
    }
    match key.code {
        KeyCode::Enter => {
            let text = state.command_line.take();
            execute(state, &text)
        }
        KeyCode::Backspace => {
            if state.command_line.backspace() {
                DispatchResult::stay()
            } else {
                DispatchResult::to(Transition::Normal)
            }
        }
        _ => {
            if let Some(ch) = key.printable() {
                state.command_line.push_char(ch);
            }
            DispatchResult::stay()
        }
    }
}

fn execute(state: &mut EditorState, text: &str) -> DispatchResult {
    let parsed = CommandParser::parse(text);
    info!(target: "actions.command", cmd = text, parsed = ?parsed, "command_execute");
    let done = DispatchResult::to(Transition::Normal);
    match parsed {
        ParsedCommand::Empty => done,
        ParsedCommand::Write(path) => done.with(Effect::Write {
            path,
            then_quit: false,
            only_if_dirty: false,
        }),
        ParsedCommand::WriteQuit(path) => done.with(Effect::Write {
            path,
            then_quit: true,
            only_if_dirty: false,
        }),
        ParsedCommand::Exit => done.with(Effect::Write {
            path: None,
            then_quit: true,
            only_if_dirty: true,
        }),
        ParsedCommand::Quit => done.with(Effect::Quit { force: false }),
        ParsedCommand::ForceQuit => done.with(Effect::Quit { force: true }),
        ParsedCommand::GotoLine(line) => {
            move_cursor(state, Motion::GotoLine(line), 1);
            done
        }
        ParsedCommand::SetNumber(on) => {
            state.show_line_numbers = on;
            done
        }
        ParsedCommand::Syntax(on) => done.with(Effect::Syntax(on)),
        ParsedCommand::UnknownOption(opt) => done.status(format!("Unknown option: {opt}")),
        ParsedCommand::Unknown(cmd) => done.status(format!("Not an editor command: {cmd}")),
    }
}

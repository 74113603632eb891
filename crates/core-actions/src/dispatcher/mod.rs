//! Per-mode key handlers.
//!
//! Each mode has one handler (`normal`, `insert`, `visual`, `command`) that
//! receives a key event and returns a [`DispatchResult`]: the mode transition
//! to perform and any side effects (status text, hooks, file writes, quit
//! attempts). The handlers only touch `EditorState`; effects that need
//! collaborators (file I/O, plugins) are applied by `Editor` afterwards, and
//! so are transitions, through [`mode::apply_transition`].

use std::path::PathBuf;

use core_events::{KeyCode, KeyEvent};
use core_plugin::CompletionSource;
use core_state::{EditError, EditorState, SelectionKind};
use core_text::Position;
use smallvec::SmallVec;
use tracing::error;

use crate::key_translator::KeyTranslator;

mod command;
pub mod command_parser;
pub(crate) mod mode;
pub mod motion;
mod insert;
mod normal;
mod undo;
mod visual;

pub use motion::Motion;

/// How the cursor is placed when entering Insert mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertEntry {
    /// `i`
    AtCursor,
    /// `a`
    Append,
    /// `A`
    AppendEol,
    /// `I`
    FirstNonBlank,
    /// `o`
    OpenBelow,
    /// `O`
    OpenAbove,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Stay,
    Normal,
    Insert(InsertEntry),
    Visual(SelectionKind),
    Command,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Status(String),
    CharInserted { ch: char, at: Position },
    Write {
        path: Option<PathBuf>,
        then_quit: bool,
        only_if_dirty: bool,
    },
    Quit { force: bool },
    Syntax(bool),
}

/// Result of handling one key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchResult {
    pub transition: Transition,
    pub effects: SmallVec<[Effect; 2]>,
}

impl DispatchResult {
    pub fn stay() -> Self {
        Self::to(Transition::Stay)
    }

    pub fn to(transition: Transition) -> Self {
        Self {
            transition,
            effects: SmallVec::new(),
        }
    }

    pub fn with(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    pub fn status<S: Into<String>>(self, text: S) -> Self {
        self.with(Effect::Status(text.into()))
    }
}

/// Borrowed view of the editor handed to mode handlers.
pub(crate) struct Ctx<'a> {
    pub state: &'a mut EditorState,
    pub keys: &'a mut KeyTranslator,
    pub completion: &'a dyn CompletionSource,
}

/// Route `key` to the handler of the current mode.
pub(crate) fn dispatch(ctx: &mut Ctx<'_>, key: &KeyEvent) -> DispatchResult {
    use core_state::Mode;
    match ctx.state.mode {
        Mode::Normal => normal::handle(ctx, key),
        Mode::Insert => insert::handle(ctx, key),
        Mode::Visual | Mode::VisualLine | Mode::VisualBlock => visual::handle(ctx, key),
        Mode::Command => command::handle(ctx, key),
    }
}

/// Status result for a failed tracked edit.
pub(crate) fn edit_failed(err: EditError) -> DispatchResult {
    error!(target: "actions.dispatch", %err, "edit_failed");
    DispatchResult::stay().status(format!("Edit failed: {err}"))
}

/// Navigation keys shared by every non-command mode.
pub(crate) fn nav_motion(key: &KeyEvent) -> Option<Motion> {
    match key.code {
        KeyCode::Left => Some(Motion::Left),
        KeyCode::Right => Some(Motion::Right),
        KeyCode::Up => Some(Motion::Up),
        KeyCode::Down => Some(Motion::Down),
        KeyCode::Home => Some(Motion::LineStart),
        KeyCode::End => Some(Motion::LineEnd),
        KeyCode::PageUp => Some(Motion::PageUp),
        KeyCode::PageDown => Some(Motion::PageDown),
        _ => None,
    }
}

/// Motion bound to `key` in Normal and Visual modes. `count` turns `G` into
/// a go-to-line.
pub(crate) fn motion_for(key: &KeyEvent, count: Option<u32>) -> Option<Motion> {
    if let Some(m) = nav_motion(key) {
        return Some(m);
    }
    let motion = match key.printable()? {
        'h' => Motion::Left,
        'l' | ' ' => Motion::Right,
        'j' => Motion::Down,
        'k' => Motion::Up,
        'w' => Motion::WordForward,
        'b' => Motion::WordBackward,
        'e' => Motion::WordEnd,
        '0' => Motion::LineStart,
        '^' => Motion::FirstNonBlank,
        '$' => Motion::LineEnd,
        'G' => match count {
            Some(n) => Motion::GotoLine(n as usize),
            None => Motion::DocEnd,
        },
        _ => return None,
    };
    Some(motion)
}

/// `gg`: document start, or the counted line.
pub(crate) fn goto_motion(count: Option<u32>) -> Motion {
    match count {
        Some(n) => Motion::GotoLine(n as usize),
        None => Motion::DocStart,
    }
}

/// Move the cursor by `motion` repeated `count` times.
pub(crate) fn move_cursor(state: &mut EditorState, motion: Motion, count: usize) {
    state.cursor = motion::apply(state.rows(), state.cursor, motion, count, state.screen_rows());
}

//! crossterm event translation.
//!
//! Only key presses and resizes matter to the editor. Key releases and
//! repeats (reported by terminals with the kitty protocol), mouse, focus and
//! paste events are dropped. Ctrl+letter arrives from crossterm as
//! `Char(letter)` with the CONTROL modifier and is kept that way.

use std::time::Duration;

use anyhow::Result;
use core_events::{KeyCode, KeyEvent, KeyModifiers};
use crossterm::event::{self, Event, KeyEventKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminalEvent {
    Key(KeyEvent),
    /// New size as (columns, rows).
    Resize(u16, u16),
}

pub fn translate_event(ev: Event) -> Option<TerminalEvent> {
    match ev {
        Event::Key(key) if key.kind != KeyEventKind::Release => {
            translate_key(key).map(TerminalEvent::Key)
        }
        Event::Resize(cols, rows) => Some(TerminalEvent::Resize(cols, rows)),
        _ => None,
    }
}

fn translate_key(key: event::KeyEvent) -> Option<KeyEvent> {
    use crossterm::event::KeyCode as C;
    let code = match key.code {
        C::Char(c) => KeyCode::Char(c),
        C::Enter => KeyCode::Enter,
        C::Esc => KeyCode::Esc,
        C::Backspace => KeyCode::Backspace,
        C::Tab => KeyCode::Tab,
        C::Delete => KeyCode::Delete,
        C::Up => KeyCode::Up,
        C::Down => KeyCode::Down,
        C::Left => KeyCode::Left,
        C::Right => KeyCode::Right,
        C::Home => KeyCode::Home,
        C::End => KeyCode::End,
        C::PageUp => KeyCode::PageUp,
        C::PageDown => KeyCode::PageDown,
        _ => return None,
    };
    let mut mods = KeyModifiers::empty();
    if key.modifiers.contains(event::KeyModifiers::CONTROL) {
        mods |= KeyModifiers::CTRL;
    }
    if key.modifiers.contains(event::KeyModifiers::ALT) {
        mods |= KeyModifiers::ALT;
    }
    // Shift is already folded into printable chars.
    if key.modifiers.contains(event::KeyModifiers::SHIFT) && !matches!(code, KeyCode::Char(_)) {
        mods |= KeyModifiers::SHIFT;
    }
    let code = match code {
        KeyCode::Char(c) if mods.contains(KeyModifiers::CTRL) => {
            KeyCode::Char(c.to_ascii_lowercase())
        }
        other => other,
    };
    Some(KeyEvent::new(code, mods))
}

/// Wait up to `timeout` for the next relevant event.
pub fn read_event(timeout: Duration) -> Result<Option<TerminalEvent>> {
    if !event::poll(timeout)? {
        return Ok(None);
    }
    Ok(translate_event(event::read()?))
}

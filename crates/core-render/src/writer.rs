//! Terminal writer.
//!
//! A [`Writer`] is a short-lived batch of primitive terminal commands built
//! from one [`Frame`]. Commands keep their order and nothing is flushed
//! mid-frame; [`Writer::flush_to`] queues them on any `io::Write` and
//! flushes once, which keeps emission testable against a byte buffer.

use std::io::Write;

use anyhow::Result;
use core_syntax::{Color, Theme};
use crossterm::{
    cursor::{Hide, MoveTo, Show},
    queue,
    style::{Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{Clear, ClearType},
};

use crate::frame::Frame;
use crate::style::Style;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    HideCursor,
    ShowCursor,
    MoveTo(u16, u16),
    /// Clear from the cursor to the end of the line.
    ClearToEnd,
    SetStyle(Style),
    ResetStyle,
    Print(String),
}

#[derive(Debug, Default)]
pub struct Writer {
    cmds: Vec<Command>,
}

impl Writer {
    pub fn new() -> Self {
        Self { cmds: Vec::new() }
    }

    /// Translate `frame` into commands, resolving span styles with `theme`.
    pub fn from_frame(frame: &Frame, theme: &Theme) -> Self {
        let mut w = Self::new();
        w.cmds.push(Command::HideCursor);
        for (y, line) in frame.lines.iter().enumerate() {
            w.move_to(0, u16::try_from(y).unwrap_or(u16::MAX));
            for span in &line.spans {
                w.cmds.push(Command::SetStyle(span.attr.resolve(theme)));
                w.print(span.text.as_str());
            }
            w.cmds.push(Command::ResetStyle);
            w.cmds.push(Command::ClearToEnd);
        }
        let (x, y) = frame.cursor;
        w.move_to(x, y);
        w.cmds.push(Command::ShowCursor);
        w
    }

    pub fn move_to(&mut self, x: u16, y: u16) {
        self.cmds.push(Command::MoveTo(x, y));
    }

    pub fn print<S: Into<String>>(&mut self, s: S) {
        let s: String = s.into();
        if !s.is_empty() {
            self.cmds.push(Command::Print(s));
        }
    }

    pub fn commands(&self) -> &[Command] {
        &self.cmds
    }

    pub fn flush_to<W: Write>(self, out: &mut W) -> Result<()> {
        for c in self.cmds {
            match c {
                Command::HideCursor => queue!(out, Hide)?,
                Command::ShowCursor => queue!(out, Show)?,
                Command::MoveTo(x, y) => queue!(out, MoveTo(x, y))?,
                Command::ClearToEnd => queue!(out, Clear(ClearType::UntilNewLine))?,
                Command::SetStyle(style) => {
                    queue!(out, SetForegroundColor(to_crossterm(style.fg)))?;
                    if let Some(bg) = style.bg {
                        queue!(out, SetBackgroundColor(to_crossterm(bg)))?;
                    }
                }
                Command::ResetStyle => queue!(out, ResetColor)?,
                Command::Print(s) => queue!(out, Print(s))?,
            }
        }
        out.flush()?;
        Ok(())
    }
}

fn to_crossterm(color: Color) -> crossterm::style::Color {
    use crossterm::style::Color as C;
    match color {
        Color::Reset => C::Reset,
        Color::Black => C::Black,
        Color::Red => C::DarkRed,
        Color::Green => C::DarkGreen,
        Color::Yellow => C::DarkYellow,
        Color::Blue => C::DarkBlue,
        Color::Magenta => C::DarkMagenta,
        Color::Cyan => C::DarkCyan,
        Color::White => C::Grey,
        Color::DarkGrey => C::DarkGrey,
        Color::Rgb { r, g, b } => C::Rgb { r, g, b },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::FrameLine;
    use crate::style::{StyleAttr, StyleSpan};
    use core_syntax::theme::DEFAULT;
    use core_text::TokenKind;

    fn one_line_frame() -> Frame {
        Frame {
            width: 10,
            lines: vec![FrameLine {
                spans: vec![
                    StyleSpan::new("1 ", StyleAttr::Gutter),
                    StyleSpan::new("fn", StyleAttr::Token(TokenKind::Keyword)),
                ],
            }],
            cursor: (2, 0),
        }
    }

    #[test]
    fn frame_commands_are_ordered() {
        let w = Writer::from_frame(&one_line_frame(), &DEFAULT);
        let cmds = w.commands();
        assert_eq!(cmds.first(), Some(&Command::HideCursor));
        assert_eq!(cmds[1], Command::MoveTo(0, 0));
        assert_eq!(cmds[3], Command::Print("1 ".into()));
        assert_eq!(
            cmds[4],
            Command::SetStyle(Style {
                fg: DEFAULT.keyword,
                bg: None
            })
        );
        assert_eq!(cmds[cmds.len() - 2], Command::MoveTo(2, 0));
        assert_eq!(cmds.last(), Some(&Command::ShowCursor));
    }

    #[test]
    fn flush_writes_text_to_sink() {
        let mut sink = Vec::new();
        Writer::from_frame(&one_line_frame(), &DEFAULT)
            .flush_to(&mut sink)
            .unwrap();
        let out = String::from_utf8_lossy(&sink);
        assert!(out.contains("fn"));
        assert!(out.contains("1 "));
    }

    #[test]
    fn empty_print_is_dropped() {
        let mut w = Writer::new();
        w.print("");
        assert!(w.commands().is_empty());
    }
}

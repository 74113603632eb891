//! Structured command line parsing.
//!
//! Converts the text typed after `:` into a [`ParsedCommand`]. Parsing is
//! pure; unknown input becomes `Unknown` and the caller turns it into a
//! status message.

use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedCommand {
    Empty,
    Write(Option<PathBuf>),
    Quit,
    ForceQuit,
    WriteQuit(Option<PathBuf>),
    /// `:x`, write only when modified, then quit.
    Exit,
    /// 1-based line number.
    GotoLine(usize),
    SetNumber(bool),
    Syntax(bool),
    UnknownOption(String),
    Unknown(String),
}

pub struct CommandParser;

impl CommandParser {
    pub fn parse(raw: &str) -> ParsedCommand {
        let body = raw.trim();
        let body = body.strip_prefix(':').unwrap_or(body).trim();
        if body.is_empty() {
            return ParsedCommand::Empty;
        }
        if let Ok(line) = body.parse::<usize>() {
            return ParsedCommand::GotoLine(line);
        }
        let (name, arg) = match body.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim()),
            None => (body, ""),
        };
        let path = || (!arg.is_empty()).then(|| PathBuf::from(arg));
        match name {
            "w" | "write" => ParsedCommand::Write(path()),
            "q" | "quit" if arg.is_empty() => ParsedCommand::Quit,
            "q!" | "quit!" if arg.is_empty() => ParsedCommand::ForceQuit,
            "wq" => ParsedCommand::WriteQuit(path()),
            "x" | "exit" if arg.is_empty() => ParsedCommand::Exit,
            "set" | "se" => match arg {
                "number" | "nu" => ParsedCommand::SetNumber(true),
                "nonumber" | "nonu" => ParsedCommand::SetNumber(false),
                other => ParsedCommand::UnknownOption(other.to_string()),
            },
            "syntax" | "sy" => match arg {
                "on" | "enable" => ParsedCommand::Syntax(true),
                "off" => ParsedCommand::Syntax(false),
                _ => ParsedCommand::Unknown(body.to_string()),
            },
            _ => ParsedCommand::Unknown(body.to_string()),
        }
    }
}

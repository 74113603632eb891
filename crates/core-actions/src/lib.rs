//! Key dispatch for the modal editor.
//!
//! [`Editor`] owns the editor state together with its collaborators (key
//! translator, plugin host, completion source, file I/O) and turns one key
//! event at a time into state changes. Mode-specific behaviour lives in
//! [`dispatcher`]; count and two-key prefixes are resolved first by
//! [`KeyTranslator`].

pub mod dispatcher;
pub mod editor;
pub mod io_ops;
pub mod key_translator;

pub use core_state::Mode;
pub use dispatcher::command_parser::{CommandParser, ParsedCommand};
pub use dispatcher::{DispatchResult, Effect, InsertEntry, Motion, Transition};
pub use editor::{Editor, EditorOptions};
pub use io_ops::{FileIo, FsIo};
pub use key_translator::{KeyTranslator, Translation};

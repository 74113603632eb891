use core_text::TextError;
use thiserror::Error;

/// Failure of a tracked edit. The document is unchanged when this is returned
/// for the failing step; earlier steps of the same group stay applied and
/// remain undoable.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum EditError {
    /// The undo log could not grow to record the step.
    #[error("out of memory while recording undo history")]
    OutOfMemory,
    #[error(transparent)]
    Text(#[from] TextError),
}

pub type EditResult<T> = Result<T, EditError>;

//! Syntax definitions, the row highlighter and color themes.
//!
//! The highlighter is a single left-to-right scan per render row in the
//! style of small terminal editors: comments, strings, numbers and two
//! keyword classes, with multi-line comment state threaded from the
//! previous row by [`core_text::RowStore`].

pub mod languages;
pub mod scan;
pub mod theme;

pub use languages::{SYNTAX_DB, SyntaxDefinition, SyntaxFlags, find_syntax};
pub use theme::{Color, Theme};

//! Frame composition and terminal emission.
//!
//! Rendering is pull based: after every key the host builds a
//! [`RenderContext`] from the editor and calls [`compose`] to get a
//! [`Frame`], a backend independent grid of styled spans. [`writer::Writer`]
//! then turns the frame into crossterm commands. Composition never touches a
//! terminal, so frames are asserted directly in tests.
//!
//! Frame layout, top to bottom:
//! - `screen_rows` text lines: line-number gutter, highlighted row text
//!   clipped to the horizontal offset, selection overlay, `~` filler past the
//!   end of the document.
//! - status bar (reverse video): mode, file name, dirty marker, line count on
//!   the left; pending keys, syntax name and cursor position on the right.
//! - message bar: `:` + command buffer in Command mode, status text otherwise.

pub mod frame;
pub mod status;
pub mod style;
pub mod writer;

pub use frame::{Frame, FrameLine, RenderContext, compose};
pub use style::{Style, StyleAttr, StyleSpan};
pub use writer::Writer;

//! Display width helpers.
//!
//! All render-column decisions go through [`char_width`] so tab expansion,
//! cursor mapping and horizontal scrolling agree on how wide a cell is.

use unicode_width::UnicodeWidthChar;

/// Terminal cell width of `ch` as it appears in a row's render form.
///
/// Control characters are rendered as a single substitute glyph and zero
/// width marks are given one cell so the cursor always lands on a visible
/// column.
pub fn char_width(ch: char) -> usize {
    if ch.is_control() {
        return 1;
    }
    UnicodeWidthChar::width(ch).unwrap_or(1).max(1)
}

//! Display width calculation for Unicode text
//!
//! Tree rows and preview lines are padded and cut by terminal columns, not by
//! bytes or chars, so wide file names line up.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Calculate the display width of a single character.
///
/// Returns 0 for control characters and zero-width characters,
/// 2 for CJK/fullwidth characters and emoji,
/// 1 for most other characters.
#[inline]
pub fn char_width(c: char) -> usize {
    // unicode_width returns None for control characters
    c.width().unwrap_or(0)
}

/// Calculate the display width of a string.
#[inline]
pub fn str_width(s: &str) -> usize {
    s.width()
}

/// Longest prefix of `s` that fits in `max_width` columns
pub fn truncate_to_width(s: &str, max_width: usize) -> &str {
    let mut width = 0;
    for (idx, c) in s.char_indices() {
        let w = char_width(c);
        if width + w > max_width {
            return &s[..idx];
        }
        width += w;
    }
    s
}

/// Pad `s` with spaces to exactly `width` columns, cutting it if too long
pub fn pad_to_width(s: &str, width: usize) -> String {
    let cut = truncate_to_width(s, width);
    let mut out = String::with_capacity(cut.len() + width);
    out.push_str(cut);
    out.extend(std::iter::repeat(' ').take(width.saturating_sub(str_width(cut))));
    out
}

//! Codepoint-indexed string utilities.
//!
//! Positions reported by the parser service count Unicode codepoints, while
//! `&str` ranges index bytes. Slicing a multi-byte character at a byte
//! boundary panics, and byte arithmetic silently drifts from codepoint
//! arithmetic for any non-ASCII text. Everything here resolves codepoint
//! offsets to byte offsets first, with out-of-range offsets clamped to the
//! end of the text, so no input can make these helpers fault.

/// Number of codepoints in `text`.
pub fn codepoint_len(text: &str) -> usize {
    text.chars().count()
}

/// Byte offset of the codepoint at codepoint offset `offset`.
///
/// Offsets past the end of `text` clamp to `text.len()`.
pub fn byte_offset(text: &str, offset: usize) -> usize {
    text.char_indices()
        .nth(offset)
        .map(|(idx, _)| idx)
        .unwrap_or(text.len())
}

/// Substring of `text` covering codepoints `[start, end)`.
///
/// Both bounds are clamped to the text; an empty or inverted range yields
/// `""`. Never splits a multi-byte codepoint.
pub fn codepoint_slice(text: &str, start: usize, end: usize) -> &str {
    if start >= end {
        return "";
    }
    let begin = byte_offset(text, start);
    let finish = byte_offset(text, end);
    &text[begin..finish]
}

/// Codepoint at codepoint offset `offset`, or `None` past the end.
pub fn codepoint_at(text: &str, offset: usize) -> Option<char> {
    text.chars().nth(offset)
}

/// Codepoint index of the last occurrence of `needle` in `text`.
pub fn last_index_of_codepoint(text: &str, needle: char) -> Option<usize> {
    let mut found = None;
    for (idx, c) in text.chars().enumerate() {
        if c == needle {
            found = Some(idx);
        }
    }
    found
}

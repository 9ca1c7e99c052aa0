// SPDX-License-Identifier: MIT
//
// Word under the caret.
//
// Named colors are plain words (`red`, `papayawhip`), so both the read
// path and the write path fall back to "the word at the caret" when no
// literal matches. A word is a run of letters, digits and underscores;
// anything else is a boundary.
//
//   re|d;    → red
//   red|;    → red
//   : |red   → red
//   a | b    → (empty)

use crate::span::Span;

fn is_word(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}

/// The word containing or touching byte offset `offset` in `text`.
///
/// If the char after the caret is a word char, the run around it wins;
/// otherwise the run ending right at the caret. Returns an empty span at
/// the caret when it touches no word. An offset past the end or inside a
/// multi-byte char is moved back to the previous char boundary.
#[must_use]
pub fn word_at(text: &str, offset: usize) -> Span {
    let mut offset = offset.min(text.len());
    while !text.is_char_boundary(offset) {
        offset -= 1;
    }

    let after = text[offset..].chars().next().is_some_and(is_word);
    let before = text[..offset].chars().next_back().is_some_and(is_word);
    if !after && !before {
        return Span::empty(offset);
    }

    let start = text[..offset]
        .char_indices()
        .rev()
        .take_while(|&(_, ch)| is_word(ch))
        .last()
        .map_or(offset, |(i, _)| i);
    let end = text[offset..]
        .char_indices()
        .take_while(|&(_, ch)| is_word(ch))
        .last()
        .map_or(offset, |(i, ch)| offset + i + ch.len_utf8());

    Span::new(start, end)
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn word(text: &str, offset: usize) -> &str {
        let span = word_at(text, offset);
        &text[span.start..span.end]
    }

    #[test]
    fn word_chars() {
        assert!(is_word('a'));
        assert!(is_word('_'));
        assert!(is_word('7'));
        assert!(!is_word('#'));
        assert!(!is_word(' '));
        assert!(!is_word('\n'));
    }

    #[test]
    fn caret_inside_word() {
        assert_eq!(word("color: red;", 8), "red");
    }

    #[test]
    fn caret_at_word_start() {
        assert_eq!(word("color: red;", 7), "red");
    }

    #[test]
    fn caret_right_after_word() {
        assert_eq!(word("color: red;", 10), "red");
    }

    #[test]
    fn caret_between_blanks() {
        let span = word_at("a   b", 2);
        assert!(span.is_empty());
        assert_eq!(span.start, 2);
    }

    #[test]
    fn caret_at_text_edges() {
        assert_eq!(word("navy", 0), "navy");
        assert_eq!(word("navy", 4), "navy");
        assert!(word_at("", 0).is_empty());
    }

    #[test]
    fn unicode_letters_are_word_chars() {
        assert_eq!(word("x: café;", 5), "café");
    }

    #[test]
    fn offset_past_end_is_clamped() {
        assert_eq!(word("teal", 99), "teal");
    }

    #[test]
    fn offset_inside_multibyte_char_snaps_back() {
        // Byte 1 is inside 'é'.
        assert_eq!(word_at("é", 1), Span::new(0, 2));
        assert_eq!(word("é red", 1), "é");
    }
}

// SPDX-License-Identifier: MIT
//
// Spans and text windows.
//
// The engine never sees the whole document. The host hands it a
// `TextWindow`: at most `WINDOW_RADIUS` chars on either side of the
// caret, plus enough bookkeeping to map byte spans inside the window
// back to document char indices. Scanning cost is bounded by the window
// size, not the document size.

use std::fmt;

/// How many chars on each side of the caret the host should expose.
pub const WINDOW_RADIUS: usize = 50;

// ─── Span ────────────────────────────────────────────────────────────────────

/// A half-open byte range `[start, end)` inside a window.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    #[inline]
    #[must_use]
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// An empty span at `offset` (a pure insertion point).
    #[inline]
    #[must_use]
    pub const fn empty(offset: usize) -> Self {
        Self {
            start: offset,
            end: offset,
        }
    }

    #[inline]
    #[must_use]
    pub const fn len(self) -> usize {
        self.end - self.start
    }

    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.start == self.end
    }

    /// Whether `offset` lies strictly inside the span: `start <= offset < end`.
    #[inline]
    #[must_use]
    pub const fn contains(self, offset: usize) -> bool {
        self.start <= offset && offset < self.end
    }

    /// The same span with `n` more bytes at the end.
    #[inline]
    #[must_use]
    pub const fn extend(self, n: usize) -> Self {
        Self {
            start: self.start,
            end: self.end + n,
        }
    }
}

impl From<regex::Match<'_>> for Span {
    fn from(m: regex::Match<'_>) -> Self {
        Self::new(m.start(), m.end())
    }
}

impl fmt::Debug for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

// ─── TextWindow ──────────────────────────────────────────────────────────────

/// A bounded slice of the host document around the caret.
///
/// The caret is a byte offset that always sits on a char boundary of the
/// text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextWindow {
    text: String,
    origin: usize,
    cursor: usize,
}

impl TextWindow {
    /// Build a window from text, the document char index of its first
    /// char, and a caret byte offset.
    ///
    /// The caret is clamped to the text and snapped back to the nearest
    /// char boundary.
    #[must_use]
    pub fn new(text: impl Into<String>, origin: usize, cursor: usize) -> Self {
        let text = text.into();
        let mut cursor = cursor.min(text.len());
        while !text.is_char_boundary(cursor) {
            cursor -= 1;
        }
        Self {
            text,
            origin,
            cursor,
        }
    }

    /// The window text.
    #[inline]
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Document char index of the first char of the text.
    #[inline]
    #[must_use]
    pub const fn origin(&self) -> usize {
        self.origin
    }

    /// Byte offset of the caret inside the text.
    #[inline]
    #[must_use]
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    /// The char right after the caret, if any.
    #[must_use]
    pub fn char_at_cursor(&self) -> Option<char> {
        self.text[self.cursor..].chars().next()
    }

    /// Map a byte span inside the window to document char indices.
    #[must_use]
    pub fn to_document(&self, span: Span) -> (usize, usize) {
        let start = self.origin + self.text[..span.start].chars().count();
        let end = start + self.text[span.start..span.end].chars().count();
        (start, end)
    }

    /// Document char index of the caret.
    #[must_use]
    pub fn cursor_char(&self) -> usize {
        self.origin + self.text[..self.cursor].chars().count()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

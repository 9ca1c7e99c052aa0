//! Text buffer — the document the color engine reads from and edits.
//!
//! A `Buffer` wraps a [`ropey::Rope`] with the few operations the color
//! workflow needs: cutting a [`TextWindow`] around the caret, applying an
//! [`InsertionPlan`] computed against that window, plain insertion, and
//! file I/O that keeps the file's line ending style.
//!
//! Positions are char indices into the rope. Byte offsets only exist
//! inside a `TextWindow`; [`TextWindow::to_document`] maps them back.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use n_color::{InsertionPlan, Span, TextWindow};
use ropey::Rope;
use tracing::debug;

use crate::position::Position;

// ---------------------------------------------------------------------------
// Line ending detection
// ---------------------------------------------------------------------------

/// Line ending style of a file, detected from its first line break.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineEnding {
    Lf,
    CrLf,
    Cr,
}

impl LineEnding {
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Lf => "\n",
            Self::CrLf => "\r\n",
            Self::Cr => "\r",
        }
    }

    /// The style of the first line break in `text`; `Lf` when there is none.
    #[must_use]
    pub fn detect(text: &str) -> Self {
        let bytes = text.as_bytes();
        match bytes.iter().position(|&b| b == b'\n' || b == b'\r') {
            Some(i) if bytes[i] == b'\n' => Self::Lf,
            Some(i) if bytes.get(i + 1) == Some(&b'\n') => Self::CrLf,
            Some(_) => Self::Cr,
            None => Self::Lf,
        }
    }
}

impl fmt::Display for LineEnding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lf => f.write_str("LF"),
            Self::CrLf => f.write_str("CRLF"),
            Self::Cr => f.write_str("CR"),
        }
    }
}

// ---------------------------------------------------------------------------
// Buffer
// ---------------------------------------------------------------------------

/// A text buffer backed by a rope.
pub struct Buffer {
    rope: Rope,
    path: Option<PathBuf>,
    modified: bool,
    line_ending: LineEnding,
}

impl Buffer {
    // -- Construction -------------------------------------------------------

    #[must_use]
    pub fn new() -> Self {
        Self::from_text("")
    }

    #[must_use]
    pub fn from_text(text: &str) -> Self {
        Self {
            line_ending: LineEnding::detect(text),
            rope: Rope::from_str(text),
            path: None,
            modified: false,
        }
    }

    /// Load a buffer from a file. The buffer starts unmodified.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or contains invalid UTF-8.
    pub fn from_file(path: &Path) -> io::Result<Self> {
        let text = fs::read_to_string(path)?;
        let mut buf = Self::from_text(&text);
        buf.path = Some(path.to_path_buf());
        Ok(buf)
    }

    // -- Text access --------------------------------------------------------

    #[inline]
    #[must_use]
    pub const fn rope(&self) -> &Rope {
        &self.rope
    }

    /// Total character count (Unicode scalar values, not bytes).
    #[inline]
    #[must_use]
    pub fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rope.len_chars() == 0
    }

    /// Total number of lines. An empty buffer has one (empty) line.
    #[inline]
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Collect all text into a `String`.
    #[must_use]
    pub fn contents(&self) -> String {
        self.rope.to_string()
    }

    // -- Coordinate conversion ----------------------------------------------

    /// Convert a `Position` to an absolute char index.
    ///
    /// A column equal to the line's char count (just past its last char)
    /// is valid; anything beyond is not.
    #[must_use]
    pub fn pos_to_char_idx(&self, pos: Position) -> Option<usize> {
        if pos.line >= self.rope.len_lines() {
            return None;
        }
        let line_len = self.rope.line(pos.line).len_chars();
        (pos.col <= line_len).then(|| self.rope.line_to_char(pos.line) + pos.col)
    }

    /// Convert an absolute char index to a `Position`.
    #[must_use]
    pub fn char_idx_to_pos(&self, char_idx: usize) -> Option<Position> {
        if char_idx > self.rope.len_chars() {
            return None;
        }
        let line = self.rope.char_to_line(char_idx);
        Some(Position::new(line, char_idx - self.rope.line_to_char(line)))
    }

    // -- Color windows ------------------------------------------------------

    /// The text within `radius` chars on either side of `char_idx`, with
    /// the caret at `char_idx`. Clipped to the buffer.
    #[must_use]
    pub fn window(&self, char_idx: usize, radius: usize) -> TextWindow {
        let caret = char_idx.min(self.rope.len_chars());
        let start = caret.saturating_sub(radius);
        let end = caret.saturating_add(radius).min(self.rope.len_chars());
        let cursor = self.rope.slice(start..caret).len_bytes();
        TextWindow::new(self.rope.slice(start..end).to_string(), start, cursor)
    }

    /// Apply a plan computed against `window` (which must have been cut
    /// from this buffer's current text). Returns the caret char index just
    /// past the inserted text, or `None` if the plan's span no longer fits
    /// the buffer.
    pub fn apply(&mut self, window: &TextWindow, plan: &InsertionPlan) -> Option<usize> {
        let Span { start, end } = plan.replace_span;
        if start > end
            || end > window.text().len()
            || !window.text().is_char_boundary(start)
            || !window.text().is_char_boundary(end)
        {
            return None;
        }

        let (from, to) = window.to_document(plan.replace_span);
        if to > self.rope.len_chars() {
            return None;
        }

        self.rope.remove(from..to);
        self.rope.insert(from, &plan.replacement_text);
        self.modified = true;
        debug!(from, to, text = %plan.replacement_text, "applied insertion plan");
        Some(from + plan.replacement_text.chars().count())
    }

    /// Insert `text` at `char_idx` (clamped to the end). Returns the caret
    /// just past the inserted text.
    pub fn insert_at(&mut self, char_idx: usize, text: &str) -> usize {
        let at = char_idx.min(self.rope.len_chars());
        self.rope.insert(at, text);
        self.modified = true;
        at + text.chars().count()
    }

    // -- Metadata -----------------------------------------------------------

    #[inline]
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    #[inline]
    #[must_use]
    pub const fn is_modified(&self) -> bool {
        self.modified
    }

    #[inline]
    #[must_use]
    pub const fn line_ending(&self) -> LineEnding {
        self.line_ending
    }

    // -- File I/O -----------------------------------------------------------

    /// Save the buffer to its associated file path.
    ///
    /// # Errors
    ///
    /// Returns an error if no path is set or the write fails.
    pub fn save(&mut self) -> io::Result<()> {
        let path = self
            .path
            .clone()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "buffer has no file path"))?;
        self.save_as(&path)
    }

    /// Save the buffer to `path` with every line break written in the
    /// buffer's detected style, and remember the path.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub fn save_as(&mut self, path: &Path) -> io::Result<()> {
        let content = normalize_line_endings(&self.rope.to_string(), self.line_ending.as_str());
        fs::write(path, content)?;
        self.path = Some(path.to_path_buf());
        self.modified = false;
        Ok(())
    }
}

impl Default for Buffer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Buffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Buffer")
            .field("lines", &self.line_count())
            .field("chars", &self.len_chars())
            .field("modified", &self.modified)
            .field("line_ending", &self.line_ending)
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Rewrite every `\r\n`, `\r` or `\n` in `text` as `target`.
fn normalize_line_endings(text: &str, target: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '\r' => {
                result.push_str(target);
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
            }
            '\n' => result.push_str(target),
            _ => result.push(ch),
        }
    }

    result
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

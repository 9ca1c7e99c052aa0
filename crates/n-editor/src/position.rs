//! Text positions.
//!
//! Internally all coordinates are **0-indexed** and columns count chars,
//! matching how `ropey` indexes text. The textual `LINE:COL` form that
//! users type is 1-indexed, like an editor status line.

use std::fmt;
use std::str::FromStr;

/// A position in a text buffer: (line, column), both 0-indexed.
///
/// `col` is the char offset from the start of the line, **not** a byte
/// offset. For the line `"café\n"`, column 3 is `'é'`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub line: usize,
    pub col: usize,
}

impl Position {
    pub const ZERO: Self = Self { line: 0, col: 0 };

    #[inline]
    #[must_use]
    pub const fn new(line: usize, col: usize) -> Self {
        Self { line, col }
    }
}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pos({}:{})", self.line, self.col)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line + 1, self.col + 1)
    }
}

/// Why a `LINE:COL` string did not parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsePositionError(String);

impl fmt::Display for ParsePositionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid position {:?} (expected LINE:COL, 1-based)", self.0)
    }
}

impl std::error::Error for ParsePositionError {}

impl FromStr for Position {
    type Err = ParsePositionError;

    /// Parse the 1-indexed `LINE:COL` form, e.g. `"3:14"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParsePositionError(s.to_string());
        let (line, col) = s.split_once(':').ok_or_else(err)?;
        let line: usize = line.trim().parse().map_err(|_| err())?;
        let col: usize = col.trim().parse().map_err(|_| err())?;
        if line == 0 || col == 0 {
            return Err(err());
        }
        Ok(Self::new(line - 1, col - 1))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

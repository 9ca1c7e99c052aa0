// SPDX-License-Identifier: MIT
//
// Error types. Recognition failures are ordinary outcomes the host
// reacts to ("show nothing", "insert plainly"), never fatal.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Why the engine produced no color or no edit.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ColorError {
    /// No literal and no named color at the probed location.
    #[error("no color at cursor")]
    NoColor,

    /// Insertion planning found nothing to anchor to. The caller inserts
    /// the color as typed at the caret.
    #[error("no insertion target at cursor")]
    NoInsertionTarget,

    /// A token matched the grammar but its components do not form a
    /// color (e.g. `rgb(300, 0, 0)`). Reported to callers as `NoColor`.
    #[error("malformed color literal `{0}`")]
    MalformedLiteral(String),
}

impl ColorError {
    /// Collapse `MalformedLiteral` into `NoColor` for the public read path.
    #[must_use]
    pub fn into_no_color(self) -> Self {
        match self {
            Self::MalformedLiteral(_) => Self::NoColor,
            other => other,
        }
    }
}

/// Failure to load the settings file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid settings: {0}")]
    Parse(#[from] toml::de::Error),
}

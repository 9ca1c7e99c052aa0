// SPDX-License-Identifier: MIT
//
// Settings — format preferences, bookmarks and palettes.
//
// Loaded from a TOML file. Only the three preference keys influence
// recognition and planning; bookmarks and palettes are carried through
// untouched for whatever UI lists them.
//
// ```toml
// use_named_colors = true
// preferred_format = "hsl"         # hex | rgb | hsl
// preferred_alpha_format = "rgba"  # rgba | hsla
// bookmarks = ["#ff8800", "rebeccapurple"]
//
// [[palettes]]
// name = "Material"
// caption = "Primary shades"
// colors = ["#f44336", "#e91e63", "#9c27b0"]
// ```
//
// | Key                      | Type   | Default  |
// |--------------------------|--------|----------|
// | `use_named_colors`       | bool   | `true`   |
// | `preferred_format`       | enum   | `"hex"`  |
// | `preferred_alpha_format` | enum   | `"rgba"` |
// | `bookmarks`              | array  | `[]`     |
// | `palettes`               | tables | `[]`     |

use std::fs;
use std::io;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::error::ConfigError;

// ─── Preferences ─────────────────────────────────────────────────────────────

/// Syntax for colors without alpha.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OpaqueFormat {
    #[default]
    Hex,
    Rgb,
    Hsl,
}

/// Syntax for colors with alpha.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlphaFormat {
    #[default]
    Rgba,
    Hsla,
}

/// The read-only snapshot every planner call receives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Preferences {
    /// Write `red` instead of `#ff0000` when the color has a name.
    pub use_named_colors: bool,
    #[serde(rename = "preferred_format")]
    pub preferred_opaque_format: OpaqueFormat,
    pub preferred_alpha_format: AlphaFormat,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            use_named_colors: true,
            preferred_opaque_format: OpaqueFormat::Hex,
            preferred_alpha_format: AlphaFormat::Rgba,
        }
    }
}

// ─── Palettes ────────────────────────────────────────────────────────────────

/// A named, ordered group of colors (hex strings or color names).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Palette {
    pub name: String,
    #[serde(default)]
    pub caption: Option<String>,
    #[serde(default)]
    pub colors: Vec<String>,
}

/// Name of the synthetic palette built from bookmarks.
pub const BOOKMARKS: &str = "Bookmarks";

// ─── Settings ────────────────────────────────────────────────────────────────

/// The whole settings file.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    #[serde(flatten)]
    pub preferences: Preferences,
    pub bookmarks: Vec<String>,
    pub palettes: Vec<Palette>,
}

impl Settings {
    /// Parse settings from TOML text. Unknown keys are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] on malformed TOML or mistyped values.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Load settings from `path`. A missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file exists but cannot be read,
    /// [`ConfigError::Parse`] if it is not valid settings TOML.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match fs::read_to_string(path) {
            Ok(text) => {
                debug!(path = %path.display(), "loading settings");
                Self::from_toml_str(&text)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no settings file, using defaults");
                Ok(Self::default())
            }
            Err(source) => Err(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    /// All palettes for display: bookmarks first (when there are any),
    /// then the configured palettes in file order.
    #[must_use]
    pub fn palettes(&self) -> Vec<Palette> {
        let bookmarks = (!self.bookmarks.is_empty()).then(|| Palette {
            name: BOOKMARKS.to_string(),
            caption: None,
            colors: self.bookmarks.clone(),
        });
        bookmarks
            .into_iter()
            .chain(self.palettes.iter().cloned())
            .collect()
    }

    /// Look up a configured palette by exact name.
    #[must_use]
    pub fn palette(&self, name: &str) -> Option<&Palette> {
        self.palettes.iter().find(|p| p.name == name)
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn defaults() {
        let prefs = Preferences::default();
        assert!(prefs.use_named_colors);
        assert_eq!(prefs.preferred_opaque_format, OpaqueFormat::Hex);
        assert_eq!(prefs.preferred_alpha_format, AlphaFormat::Rgba);
    }

    #[test]
    fn empty_text_is_default() {
        assert_eq!(Settings::from_toml_str("").unwrap(), Settings::default());
    }

    #[test]
    fn parses_preferences() {
        let s = Settings::from_toml_str(
            "use_named_colors = false\npreferred_format = \"hsl\"\npreferred_alpha_format = \"hsla\"\n",
        )
        .unwrap();
        assert_eq!(
            s.preferences,
            Preferences {
                use_named_colors: false,
                preferred_opaque_format: OpaqueFormat::Hsl,
                preferred_alpha_format: AlphaFormat::Hsla,
            }
        );
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let s = Settings::from_toml_str("dark_css_override = \"x.css\"\n").unwrap();
        assert_eq!(s, Settings::default());
    }

    #[test]
    fn bad_format_is_an_error() {
        let err = Settings::from_toml_str("preferred_format = \"cmyk\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn palettes_put_bookmarks_first() {
        let s = Settings::from_toml_str(
            r##"
bookmarks = ["#ff8800"]

[[palettes]]
name = "Warm"
caption = "Sunset"
colors = ["red", "#f80"]

[[palettes]]
name = "Cold"
colors = ["navy"]
"##,
        )
        .unwrap();

        let names: Vec<_> = s.palettes().into_iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["Bookmarks", "Warm", "Cold"]);
        assert_eq!(s.palette("Warm").unwrap().caption.as_deref(), Some("Sunset"));
        assert_eq!(s.palette("Cold").unwrap().colors, vec!["navy"]);
        assert!(s.palette("Bookmarks").is_none());
    }

    #[test]
    fn no_bookmarks_no_bookmark_palette() {
        assert!(Settings::default().palettes().is_empty());
    }

    #[test]
    fn load_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let s = Settings::load(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(s, Settings::default());
    }

    #[test]
    fn load_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "preferred_format = \"rgb\"").unwrap();
        let s = Settings::load(file.path()).unwrap();
        assert_eq!(s.preferences.preferred_opaque_format, OpaqueFormat::Rgb);
    }
}

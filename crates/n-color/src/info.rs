// SPDX-License-Identifier: MIT
//
// Color info — the plain-text report shown for the color under the caret.

use std::fmt;

use crate::convert::{degrees, percent};
use crate::extract::NormalizedColor;
use crate::named::NamedColors;

/// Everything the info view shows about one color. Angles and
/// percentages are rounded to whole numbers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorInfo {
    /// `#rrggbb`, or `#rrggbbaa` when the source carried alpha.
    pub hex: String,
    /// CSS name of the opaque color, if any.
    pub name: Option<String>,
    pub rgb: (u8, u8, u8),
    /// Degrees, percent, percent.
    pub hsv: (i64, i64, i64),
    /// Degrees, percent, percent.
    pub hsl: (i64, i64, i64),
}

impl ColorInfo {
    #[must_use]
    pub fn new(color: NormalizedColor, named: &dyn NamedColors) -> Self {
        let rgb = color.rgb();
        let (h, s, v) = rgb.to_hsv();
        let (hh, hs, hl) = rgb.to_hsl();
        Self {
            hex: color.to_hex(),
            name: named.name_of(rgb).map(str::to_string),
            rgb: (rgb.r, rgb.g, rgb.b),
            hsv: (degrees(h), percent(s), percent(v)),
            hsl: (degrees(hh), percent(hs), percent(hl)),
        }
    }
}

impl fmt::Display for ColorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.hex)?;
        if let Some(name) = &self.name {
            writeln!(f, "{name}")?;
        }
        let (r, g, b) = self.rgb;
        writeln!(f, "r: {r} g: {g} b: {b}")?;
        let (h, s, v) = self.hsv;
        writeln!(f, "h: {h} s: {s} v: {v}")?;
        let (h, s, l) = self.hsl;
        write!(f, "h: {h} s: {s} l: {l}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::Rgb;
    use crate::named::CssColors;
    use pretty_assertions::assert_eq;

    #[test]
    fn orange_report() {
        let info = ColorInfo::new(NormalizedColor::opaque(Rgb::new(255, 165, 0)), &CssColors);
        assert_eq!(info.hex, "#ffa500");
        assert_eq!(info.name.as_deref(), Some("orange"));
        assert_eq!(info.hsv, (39, 100, 100));
        assert_eq!(info.hsl, (39, 100, 50));
        assert_eq!(
            info.to_string(),
            "#ffa500\norange\nr: 255 g: 165 b: 0\nh: 39 s: 100 v: 100\nh: 39 s: 100 l: 50"
        );
    }

    #[test]
    fn alpha_shows_in_hex_only() {
        let color = NormalizedColor {
            r: 255,
            g: 0,
            b: 0,
            a: Some(0.5),
        };
        let info = ColorInfo::new(color, &CssColors);
        assert_eq!(info.hex, "#ff000080");
        assert_eq!(info.name.as_deref(), Some("red"));
    }

    #[test]
    fn unnamed_color_skips_name_line() {
        let info = ColorInfo::new(NormalizedColor::opaque(Rgb::new(1, 2, 3)), &CssColors);
        assert_eq!(info.name, None);
        assert_eq!(info.to_string().lines().count(), 4);
    }
}

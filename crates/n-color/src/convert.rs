// SPDX-License-Identifier: MIT
//
// Format converter — packed hex, 8-bit RGB, HSL and HSV.
//
// Every function here is pure and total over its valid domain. HSL and
// HSV components are fractions in [0, 1]; callers scale them to degrees
// and percentages only when formatting text, always rounding to the
// nearest integer.
//
// Round-tripping RGB → HSL → RGB is exact up to the final rounding to
// 8 bits, so channels come back within ±1 (in practice they come back
// identical).

use std::fmt;

// ─── Rgb ─────────────────────────────────────────────────────────────────────

/// An opaque 8-bit sRGB color.
///
/// This is the form every target color takes inside the planner: the
/// host parses the user's pick once with [`Rgb::from_hex`] and hands a
/// value that can no longer be malformed.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    #[inline]
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rgb` or `#rrggbb` (the `#` is optional).
    #[must_use]
    pub fn from_hex(s: &str) -> Option<Self> {
        hex_to_rgb(s).map(|(r, g, b)| Self { r, g, b })
    }

    /// `#rrggbb`, lowercase.
    #[must_use]
    pub fn to_hex(self) -> String {
        format!("#{}", rgb_to_hex(self.r, self.g, self.b))
    }

    /// HSL fractions, see [`rgb_to_hsl`].
    #[must_use]
    pub fn to_hsl(self) -> (f64, f64, f64) {
        rgb_to_hsl(self.r, self.g, self.b)
    }

    /// HSV fractions, see [`rgb_to_hsv`].
    #[must_use]
    pub fn to_hsv(self) -> (f64, f64, f64) {
        rgb_to_hsv(self.r, self.g, self.b)
    }

    /// The argument list of an `rgb()` literal: `r, g, b`.
    #[must_use]
    pub fn rgb_content(self) -> String {
        format!("{}, {}, {}", self.r, self.g, self.b)
    }

    /// The argument list of an `hsl()` literal: `h, s%, l%`.
    #[must_use]
    pub fn hsl_content(self) -> String {
        let (h, s, l) = self.to_hsl();
        format!("{}, {}%, {}%", degrees(h), percent(s), percent(l))
    }
}

impl fmt::Debug for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl From<(u8, u8, u8)> for Rgb {
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Self { r, g, b }
    }
}

// ─── Hex ─────────────────────────────────────────────────────────────────────

/// Pack three channels into six lowercase hex digits (no `#`).
#[must_use]
pub fn rgb_to_hex(r: u8, g: u8, b: u8) -> String {
    format!("{r:02x}{g:02x}{b:02x}")
}

/// Unpack a 3- or 6-digit hex color, with or without a leading `#`.
///
/// In the 3-digit form each nibble is duplicated: `f80` → `ff8800`.
#[must_use]
pub fn hex_to_rgb(s: &str) -> Option<(u8, u8, u8)> {
    let s = s.strip_prefix('#').unwrap_or(s);
    let bytes = s.as_bytes();

    match bytes.len() {
        3 => {
            let r = parse_hex_digit(bytes[0])?;
            let g = parse_hex_digit(bytes[1])?;
            let b = parse_hex_digit(bytes[2])?;
            Some((r << 4 | r, g << 4 | g, b << 4 | b))
        }
        6 => Some((
            parse_hex_byte(&bytes[0..2])?,
            parse_hex_byte(&bytes[2..4])?,
            parse_hex_byte(&bytes[4..6])?,
        )),
        _ => None,
    }
}

#[inline]
const fn parse_hex_digit(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

#[inline]
fn parse_hex_byte(bytes: &[u8]) -> Option<u8> {
    let hi = parse_hex_digit(bytes[0])?;
    let lo = parse_hex_digit(bytes[1])?;
    Some(hi << 4 | lo)
}

// ─── HSL / HSV ───────────────────────────────────────────────────────────────

/// Hue fraction in [0, 1) from normalized channels and their extremes.
///
/// Standard 60° segment formula: which channel is the maximum picks the
/// segment, the other two place the hue within it.
fn hue(r: f64, g: f64, b: f64, max: f64, min: f64) -> f64 {
    let range = max - min;
    let rc = (max - r) / range;
    let gc = (max - g) / range;
    let bc = (max - b) / range;

    let h = if (r - max).abs() < f64::EPSILON {
        bc - gc
    } else if (g - max).abs() < f64::EPSILON {
        2.0 + rc - bc
    } else {
        4.0 + gc - rc
    };
    (h / 6.0).rem_euclid(1.0)
}

#[inline]
fn unit(c: u8) -> f64 {
    f64::from(c) / 255.0
}

/// Convert 8-bit RGB to HSL, each component in [0, 1].
///
/// Grays (`r == g == b`) have hue 0 and saturation 0.
#[must_use]
pub fn rgb_to_hsl(r: u8, g: u8, b: u8) -> (f64, f64, f64) {
    let (rf, gf, bf) = (unit(r), unit(g), unit(b));
    let max = rf.max(gf).max(bf);
    let min = rf.min(gf).min(bf);
    let l = (max + min) / 2.0;

    if r == g && g == b {
        return (0.0, 0.0, l);
    }

    let range = max - min;
    let s = if l <= 0.5 {
        range / (max + min)
    } else {
        range / (2.0 - max - min)
    };

    (hue(rf, gf, bf, max, min), s, l)
}

/// Convert HSL (each in [0, 1]) to 8-bit RGB.
///
/// Hue wraps around; saturation and lightness are clamped. Output
/// channels are rounded to the nearest integer.
#[must_use]
pub fn hsl_to_rgb(h: f64, s: f64, l: f64) -> (u8, u8, u8) {
    let s = s.clamp(0.0, 1.0);
    let l = l.clamp(0.0, 1.0);

    if s == 0.0 {
        let v = to_u8(l);
        return (v, v, v);
    }

    let m2 = if l <= 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let m1 = 2.0 * l - m2;

    (
        to_u8(hue_channel(m1, m2, h + 1.0 / 3.0)),
        to_u8(hue_channel(m1, m2, h)),
        to_u8(hue_channel(m1, m2, h - 1.0 / 3.0)),
    )
}

fn hue_channel(m1: f64, m2: f64, h: f64) -> f64 {
    let h = h.rem_euclid(1.0);
    if h < 1.0 / 6.0 {
        (m2 - m1).mul_add(h * 6.0, m1)
    } else if h < 0.5 {
        m2
    } else if h < 2.0 / 3.0 {
        (m2 - m1).mul_add((2.0 / 3.0 - h) * 6.0, m1)
    } else {
        m1
    }
}

/// Convert 8-bit RGB to HSV, each component in [0, 1]. `v` is the
/// maximum channel over 255.
#[must_use]
pub fn rgb_to_hsv(r: u8, g: u8, b: u8) -> (f64, f64, f64) {
    let (rf, gf, bf) = (unit(r), unit(g), unit(b));
    let max = rf.max(gf).max(bf);
    let min = rf.min(gf).min(bf);

    if r == g && g == b {
        return (0.0, 0.0, max);
    }

    (hue(rf, gf, bf, max, min), (max - min) / max, max)
}

// ─── Rounding ────────────────────────────────────────────────────────────────

/// A [0, 1] fraction as an 8-bit channel, rounded and clamped.
#[inline]
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn to_u8(v: f64) -> u8 {
    // Clamp guarantees 0.0 <= value <= 255.0 before truncation.
    v.mul_add(255.0, 0.5).clamp(0.0, 255.0) as u8
}

/// Alpha in [0, 1] as an 8-bit value. Alpha just under 1.0 must not
/// overflow to 256, so the result is clamped.
#[inline]
#[must_use]
pub fn alpha_to_u8(a: f64) -> u8 {
    to_u8(a.clamp(0.0, 1.0))
}

/// A hue fraction as whole degrees. A hue that rounds up to 360 is
/// reported as 0.
#[inline]
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn degrees(h: f64) -> i64 {
    ((h * 360.0).round() as i64).rem_euclid(360)
}

/// A [0, 1] fraction as a whole percentage.
#[inline]
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn percent(x: f64) -> i64 {
    (x * 100.0).round() as i64
}

// ─── Tests ───────────────────────────────────────────────────────────────────

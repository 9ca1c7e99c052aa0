// SPDX-License-Identifier: MIT
//
// Color info extractor — the read path.
//
// Turns a grammar token (or, failing that, the word under the caret)
// into one canonical value: 8-bit RGB plus an optional alpha. HSL
// literals are converted on the way in, so nothing downstream ever
// handles HSL components directly.

use tracing::{debug, trace};

use crate::convert::{Rgb, alpha_to_u8, hex_to_rgb, hsl_to_rgb, rgb_to_hex};
use crate::error::ColorError;
use crate::grammar::{self, ColorToken, TokenKind};
use crate::named::NamedColors;
use crate::span::TextWindow;
use crate::word::word_at;

// ─── NormalizedColor ─────────────────────────────────────────────────────────

/// The canonical parsed color: 8-bit RGB and an optional alpha.
///
/// `a` is `None` when the source syntax carried no alpha channel at all,
/// which is different from an explicit alpha of `1`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizedColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    /// Alpha in [0, 1].
    pub a: Option<f64>,
}

impl NormalizedColor {
    /// An opaque color with no alpha channel.
    #[must_use]
    pub const fn opaque(rgb: Rgb) -> Self {
        Self {
            r: rgb.r,
            g: rgb.g,
            b: rgb.b,
            a: None,
        }
    }

    /// The color channels without alpha.
    #[must_use]
    pub const fn rgb(self) -> Rgb {
        Rgb::new(self.r, self.g, self.b)
    }

    /// Alpha as an 8-bit value, clamped so values near 1.0 cannot overflow.
    #[must_use]
    pub fn alpha_u8(self) -> Option<u8> {
        self.a.map(alpha_to_u8)
    }

    /// `#rrggbb`, or `#rrggbbaa` when an alpha channel is present.
    #[must_use]
    pub fn to_hex(self) -> String {
        let rgb = rgb_to_hex(self.r, self.g, self.b);
        match self.alpha_u8() {
            Some(a) => format!("#{rgb}{a:02x}"),
            None => format!("#{rgb}"),
        }
    }
}

// ─── Extraction ──────────────────────────────────────────────────────────────

fn malformed(token: &ColorToken<'_>) -> ColorError {
    ColorError::MalformedLiteral(token.text.to_string())
}

fn channel(token: &ColorToken<'_>, part: &str) -> Result<u8, ColorError> {
    part.parse::<u8>().map_err(|_| malformed(token))
}

fn fraction(token: &ColorToken<'_>, part: &str, scale: f64) -> Result<f64, ColorError> {
    part.parse::<f64>()
        .map(|v| v / scale)
        .map_err(|_| malformed(token))
}

fn alpha(token: &ColorToken<'_>, part: &str) -> Result<f64, ColorError> {
    fraction(token, part, 1.0).map(|a| a.clamp(0.0, 1.0))
}

/// Parse a complete literal into a [`NormalizedColor`].
///
/// # Errors
///
/// `NoColor` for open tokens; `MalformedLiteral` when the captured
/// components do not form a color (e.g. a channel above 255).
pub fn extract(token: &ColorToken<'_>) -> Result<NormalizedColor, ColorError> {
    if token.kind.is_open() {
        return Err(ColorError::NoColor);
    }

    let parts = token.components();
    let color = match (token.kind, parts.as_slice()) {
        (TokenKind::Hex, _) => {
            let content = token.content.ok_or_else(|| malformed(token))?;
            let rgb = hex_to_rgb(content).ok_or_else(|| malformed(token))?;
            NormalizedColor::opaque(rgb.into())
        }
        (TokenKind::Rgb | TokenKind::Rgba, [r, g, b, rest @ ..]) => NormalizedColor {
            r: channel(token, r)?,
            g: channel(token, g)?,
            b: channel(token, b)?,
            a: rest.first().map(|a| alpha(token, a)).transpose()?,
        },
        (TokenKind::Hsl | TokenKind::Hsla, [h, s, l, rest @ ..]) => {
            let (r, g, b) = hsl_to_rgb(
                fraction(token, h, 360.0)?,
                fraction(token, s, 100.0)?,
                fraction(token, l, 100.0)?,
            );
            NormalizedColor {
                r,
                g,
                b,
                a: rest.first().map(|a| alpha(token, a)).transpose()?,
            }
        }
        _ => return Err(malformed(token)),
    };

    trace!(kind = %token.kind, text = token.text, hex = %color.to_hex(), "extracted color");
    Ok(color)
}

/// The color under the caret of `window`.
///
/// A complete literal containing the caret wins. Otherwise the word at
/// the caret is looked up in `named`.
///
/// # Errors
///
/// `NoColor` when nothing matches, including when the literal under the
/// caret is malformed.
pub fn color_at(
    window: &TextWindow,
    named: &dyn NamedColors,
) -> Result<NormalizedColor, ColorError> {
    let hit = grammar::scan(window.text())
        .find(|t| !t.kind.is_open() && t.span.contains(window.cursor()));

    if let Some(token) = hit {
        return extract(&token).map_err(|err| {
            debug!(%err, "dropping literal under cursor");
            err.into_no_color()
        });
    }

    named_word_at(window, named).ok_or(ColorError::NoColor)
}

fn named_word_at(window: &TextWindow, named: &dyn NamedColors) -> Option<NormalizedColor> {
    let span = word_at(window.text(), window.cursor());
    if span.is_empty() {
        return None;
    }
    named
        .by_name(&window.text()[span.start..span.end])
        .map(NormalizedColor::opaque)
}

// ─── Probe ───────────────────────────────────────────────────────────────────

/// What the host should offer once editing settles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Probe {
    /// The caret is on a color: show its details.
    Info(NormalizedColor),
    /// The caret sits right after an open token: offer a color picker.
    Picker,
    /// Nothing color-related here.
    Nothing,
}

/// Decide what to show for the caret position of `window`.
///
/// The first token that contains the caret or ends at it decides: a
/// complete literal around the caret yields `Info`, an open token ending
/// at the caret yields `Picker`. Anything else falls back to the named
/// word at the caret.
#[must_use]
pub fn probe(window: &TextWindow, named: &dyn NamedColors) -> Probe {
    let cursor = window.cursor();
    let hit = grammar::scan(window.text())
        .find(|t| t.span.contains(cursor) || t.span.end == cursor);

    match hit {
        Some(t) if t.span.contains(cursor) && !t.kind.is_open() => {
            extract(&t).map_or(Probe::Nothing, Probe::Info)
        }
        Some(t) if t.span.end == cursor && t.kind.is_open() => Probe::Picker,
        _ => named_word_at(window, named).map_or(Probe::Nothing, Probe::Info),
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

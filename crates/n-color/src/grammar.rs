// SPDX-License-Identifier: MIT
//
// Color grammar — one alternation pattern that tokenizes a text window.
//
// Alternatives are tried left to right at each position (leftmost-first
// semantics), so their order is the priority order:
//
//   1. hex    `#` + 3 or 6 hex digits (6 preferred)
//   2. rgb    `rgb(n, n, n)`
//   3. rgba   `rgba(n, n, n, a)`
//   4. hsl    `hsl(n, n%, n%)`
//   5. hsla   `hsla(n, n%, n%, a)`
//   6. open   `#`, `rgb(`, `rgba(`, `hsl(`, `hsla(` with nothing after
//
// A complete literal always wins over its own open prefix, which is what
// separates replacement mode from completion mode in the planner. Alpha
// is either a single digit or a decimal fraction (`.5`, `0.25`).
// Anything outside these ten shapes is invisible to the engine.

use std::fmt;
use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::span::Span;

/// The composite color pattern, compiled once.
static COLOR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?P<hex>#(?P<hex_content>(?:[0-9A-Fa-f]{3}){1,2}))",
        r"|(?P<rgb>rgb\(\s*(?P<rgb_content>(?:[0-9]+\s*,\s*){2}[0-9]+)\s*\))",
        r"|(?P<rgba>rgba\(\s*(?P<rgba_content>(?:[0-9]+\s*,\s*){3}(?:[0-9]*\.[0-9]+|[0-9]))\s*\))",
        r"|(?P<hsl>hsl\(\s*(?P<hsl_content>[0-9]+\s*,\s*[0-9]+%\s*,\s*[0-9]+%)\s*\))",
        r"|(?P<hsla>hsla\(\s*(?P<hsla_content>[0-9]+\s*,\s*(?:[0-9]+%\s*,\s*){2}(?:[0-9]*\.[0-9]+|[0-9]))\s*\))",
        r"|(?P<hash>#)",
        r"|(?P<rgb_open>rgb\()",
        r"|(?P<rgba_open>rgba\()",
        r"|(?P<hsl_open>hsl\()",
        r"|(?P<hsla_open>hsla\()",
    ))
    .expect("color grammar is a valid regex")
});

// ─── TokenKind ───────────────────────────────────────────────────────────────

/// Which grammar alternative produced a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Hex,
    Rgb,
    Rgba,
    Hsl,
    Hsla,
    /// A lone `#`.
    HashOpen,
    /// `rgb(` with no arguments yet.
    RgbOpen,
    /// `rgba(` with no arguments yet.
    RgbaOpen,
    /// `hsl(` with no arguments yet.
    HslOpen,
    /// `hsla(` with no arguments yet.
    HslaOpen,
}

/// Complete literals: kind, whole-match group, argument-list group.
const CLOSED: [(TokenKind, &str, &str); 5] = [
    (TokenKind::Hex, "hex", "hex_content"),
    (TokenKind::Rgb, "rgb", "rgb_content"),
    (TokenKind::Rgba, "rgba", "rgba_content"),
    (TokenKind::Hsl, "hsl", "hsl_content"),
    (TokenKind::Hsla, "hsla", "hsla_content"),
];

/// Open tokens: kind, group.
const OPEN: [(TokenKind, &str); 5] = [
    (TokenKind::HashOpen, "hash"),
    (TokenKind::RgbOpen, "rgb_open"),
    (TokenKind::RgbaOpen, "rgba_open"),
    (TokenKind::HslOpen, "hsl_open"),
    (TokenKind::HslaOpen, "hsla_open"),
];

impl TokenKind {
    /// Whether this is the opening punctuation of a literal still being typed.
    #[inline]
    #[must_use]
    pub const fn is_open(self) -> bool {
        matches!(
            self,
            Self::HashOpen | Self::RgbOpen | Self::RgbaOpen | Self::HslOpen | Self::HslaOpen
        )
    }

    /// Whether the literal syntax carries an alpha channel.
    #[inline]
    #[must_use]
    pub const fn has_alpha(self) -> bool {
        matches!(
            self,
            Self::Rgba | Self::Hsla | Self::RgbaOpen | Self::HslaOpen
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Hex => "hex",
            Self::Rgb => "rgb",
            Self::Rgba => "rgba",
            Self::Hsl => "hsl",
            Self::Hsla => "hsla",
            Self::HashOpen => "#",
            Self::RgbOpen => "rgb(",
            Self::RgbaOpen => "rgba(",
            Self::HslOpen => "hsl(",
            Self::HslaOpen => "hsla(",
        })
    }
}

// ─── ColorToken ──────────────────────────────────────────────────────────────

/// One grammar match inside a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorToken<'a> {
    pub kind: TokenKind,
    /// The whole token.
    pub span: Span,
    /// The argument list only (hex digits for `Hex`). `None` for open tokens.
    pub content_span: Option<Span>,
    /// The matched text.
    pub text: &'a str,
    /// The text under `content_span`.
    pub content: Option<&'a str>,
}

impl<'a> ColorToken<'a> {
    fn from_captures(caps: &Captures<'a>) -> Option<Self> {
        let closed = CLOSED.iter().find_map(|&(kind, whole, content)| {
            let m = caps.name(whole)?;
            let c = caps.name(content)?;
            Some(Self {
                kind,
                span: m.into(),
                content_span: Some(c.into()),
                text: m.as_str(),
                content: Some(c.as_str()),
            })
        });

        closed.or_else(|| {
            OPEN.iter().find_map(|&(kind, group)| {
                let m = caps.name(group)?;
                Some(Self {
                    kind,
                    span: m.into(),
                    content_span: None,
                    text: m.as_str(),
                    content: None,
                })
            })
        })
    }

    /// The comma-separated arguments, trimmed, with `%` signs removed.
    ///
    /// Empty for `Hex` and open tokens.
    #[must_use]
    pub fn components(&self) -> Vec<&'a str> {
        match (self.kind, self.content) {
            (TokenKind::Hex, _) | (_, None) => Vec::new(),
            (_, Some(content)) => content
                .split(',')
                .map(|part| part.trim().trim_end_matches('%'))
                .collect(),
        }
    }

    /// The alpha argument exactly as written, for `Rgba`/`Hsla`.
    #[must_use]
    pub fn alpha(&self) -> Option<&'a str> {
        if matches!(self.kind, TokenKind::Rgba | TokenKind::Hsla) {
            self.components().get(3).copied()
        } else {
            None
        }
    }
}

// ─── Scanning ────────────────────────────────────────────────────────────────

/// Tokenize `window`, yielding non-overlapping color tokens left to right.
///
/// Lazy and side-effect free; scanning the same text again yields the
/// same tokens.
pub fn scan(window: &str) -> impl Iterator<Item = ColorToken<'_>> + '_ {
    COLOR_RE
        .captures_iter(window)
        .filter_map(|caps| ColorToken::from_captures(&caps))
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn kinds(text: &str) -> Vec<TokenKind> {
        scan(text).map(|t| t.kind).collect()
    }

    fn only(text: &str) -> ColorToken<'_> {
        let tokens: Vec<_> = scan(text).collect();
        assert_eq!(tokens.len(), 1, "expected one token in {text:?}: {tokens:?}");
        tokens[0]
    }

    // ── Complete literals ────────────────────────────────────────────────

    #[test]
    fn hex_long_and_short() {
        let t = only("#a1B2c3");
        assert_eq!(t.kind, TokenKind::Hex);
        assert_eq!(t.span, Span::new(0, 7));
        assert_eq!(t.content, Some("a1B2c3"));
        assert_eq!(t.content_span, Some(Span::new(1, 7)));

        let t = only("#fff;");
        assert_eq!(t.text, "#fff");
    }

    #[test]
    fn hex_prefers_six_digits() {
        assert_eq!(only("#abcdef").text, "#abcdef");
        // Four or five digits: the three-digit form matches, the rest is text.
        assert_eq!(only("#abcd").text, "#abc");
    }

    #[test]
    fn rgb_is_whitespace_tolerant() {
        let t = only("rgb( 10 ,20,  30 )");
        assert_eq!(t.kind, TokenKind::Rgb);
        assert_eq!(t.content, Some("10 ,20,  30"));
        assert_eq!(t.components(), vec!["10", "20", "30"]);
    }

    #[test]
    fn rgba_is_never_split_into_rgb() {
        let t = only("rgba(1,2,3,0.5)");
        assert_eq!(t.kind, TokenKind::Rgba);
        assert_eq!(t.span, Span::new(0, 15));
        assert_eq!(t.alpha(), Some("0.5"));
    }

    #[test]
    fn rgba_alpha_forms() {
        assert_eq!(only("rgba(1, 2, 3, 1)").alpha(), Some("1"));
        assert_eq!(only("rgba(1, 2, 3, .25)").alpha(), Some(".25"));
        // Two-digit integer alpha is not in the grammar; only the open prefix matches.
        assert_eq!(kinds("rgba(1, 2, 3, 10)"), vec![TokenKind::RgbaOpen]);
    }

    #[test]
    fn hsl_and_hsla() {
        let t = only("hsl(120, 50%, 25%)");
        assert_eq!(t.kind, TokenKind::Hsl);
        assert_eq!(t.components(), vec!["120", "50", "25"]);
        assert_eq!(t.alpha(), None);

        let t = only("hsla(0,100%,50%,0.4)");
        assert_eq!(t.kind, TokenKind::Hsla);
        assert_eq!(t.content_span, Some(Span::new(5, 19)));
        assert_eq!(t.alpha(), Some("0.4"));
    }

    #[test]
    fn hsl_requires_percent_signs() {
        assert_eq!(kinds("hsl(120, 50, 25)"), vec![TokenKind::HslOpen]);
    }

    // ── Open tokens ──────────────────────────────────────────────────────

    #[test]
    fn open_tokens() {
        assert_eq!(kinds("#"), vec![TokenKind::HashOpen]);
        assert_eq!(kinds("rgb("), vec![TokenKind::RgbOpen]);
        assert_eq!(kinds("rgba("), vec![TokenKind::RgbaOpen]);
        assert_eq!(kinds("hsl()"), vec![TokenKind::HslOpen]);
        assert_eq!(kinds("hsla( 1"), vec![TokenKind::HslaOpen]);
    }

    #[test]
    fn open_tokens_have_no_content() {
        let t = only("rgb(");
        assert_eq!(t.content_span, None);
        assert!(t.components().is_empty());
        assert!(t.kind.is_open());
    }

    #[test]
    fn hash_before_non_hex_is_open() {
        let t = only("#zz");
        assert_eq!(t.kind, TokenKind::HashOpen);
        assert_eq!(t.span, Span::new(0, 1));
    }

    // ── Scanning ─────────────────────────────────────────────────────────

    #[test]
    fn tokens_in_order_without_overlap() {
        let text = "a { color: #fff; background: rgba(0, 0, 0, .5); border: hsl(";
        let tokens: Vec<_> = scan(text).collect();
        assert_eq!(
            tokens.iter().map(|t| t.kind).collect::<Vec<_>>(),
            vec![TokenKind::Hex, TokenKind::Rgba, TokenKind::HslOpen]
        );
        for pair in tokens.windows(2) {
            assert!(pair[0].span.end <= pair[1].span.start);
        }
    }

    #[test]
    fn rescanning_is_idempotent() {
        let text = "#123 rgb(1,2,3) hsla(";
        let first: Vec<_> = scan(text).collect();
        let second: Vec<_> = scan(text).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn non_ascii_digits_are_not_numbers() {
        assert_eq!(kinds("rgb(١, 2, 3)"), vec![TokenKind::RgbOpen]);
    }

    #[test]
    fn plain_text_has_no_tokens() {
        assert!(scan("color: red;").next().is_none());
    }

    #[test]
    fn alpha_kinds() {
        assert!(TokenKind::Rgba.has_alpha());
        assert!(TokenKind::HslaOpen.has_alpha());
        assert!(!TokenKind::Hex.has_alpha());
        assert!(!TokenKind::Rgb.is_open());
    }
}

// SPDX-License-Identifier: MIT
//
// Insertion planner — the write path.
//
// Given the caret, a window of text and a picked color, decide which
// bytes to overwrite and with what. One pass, no mutable builder: the
// result is an immutable `InsertionPlan` the host applies as a single
// text edit.
//
// Three modes, tried in order:
//
//   Replace   caret strictly inside a complete literal. The literal keeps
//             its syntax when that syntax is the preferred one (only the
//             argument list is rewritten); otherwise the whole literal is
//             rewritten in the preferred syntax.
//
//   Complete  caret right after an open token (`#`, `rgb(`, ...). The
//             open token, plus a `)` sitting right at the caret, is
//             overwritten with a full literal.
//
//   Word      caret on a named color word. The word is overwritten.
//
// Alpha-bearing literals never turn into names (names are opaque) and
// keep the alpha text exactly as written. Freshly completed alpha
// literals get alpha `1`.

use std::fmt;

use tracing::debug;

use crate::convert::Rgb;
use crate::error::ColorError;
use crate::grammar::{self, ColorToken, TokenKind};
use crate::named::NamedColors;
use crate::settings::{AlphaFormat, OpaqueFormat, Preferences};
use crate::span::{Span, TextWindow};
use crate::word::word_at;

/// Alpha written into a literal completed from an open alpha token.
const OPAQUE_ALPHA: &str = "1";

// ─── InsertionPlan ───────────────────────────────────────────────────────────

/// How the planner anchored the edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanMode {
    /// Rewriting a complete literal around the caret.
    Replace(TokenKind),
    /// Finishing an open token that ends at the caret.
    Complete(TokenKind),
    /// Retyping a named color word.
    Word,
}

/// A single text edit: delete `replace_span`, insert `replacement_text`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertionPlan {
    /// Byte span inside the window text.
    pub replace_span: Span,
    pub replacement_text: String,
    pub mode: PlanMode,
}

impl InsertionPlan {
    /// Apply the edit to the window text it was planned against.
    #[must_use]
    pub fn apply(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len() + self.replacement_text.len());
        out.push_str(&text[..self.replace_span.start]);
        out.push_str(&self.replacement_text);
        out.push_str(&text[self.replace_span.end..]);
        out
    }
}

impl fmt::Display for InsertionPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:?} -> {:?} ({:?})",
            self.replace_span, self.replacement_text, self.mode
        )
    }
}

// ─── Output syntax ───────────────────────────────────────────────────────────

/// What text to produce for the target color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Form<'a> {
    /// A bare color name.
    Name(&'a str),
    /// `#rrggbb`.
    Hex,
    /// `r, g, b[, a]`, wrapped in `rgb()`/`rgba()` when `wrap` is set.
    Rgb { alpha: Option<&'a str>, wrap: bool },
    /// `h, s%, l%[, a]`, wrapped in `hsl()`/`hsla()` when `wrap` is set.
    Hsl { alpha: Option<&'a str>, wrap: bool },
}

impl Form<'_> {
    fn render(self, target: Rgb) -> String {
        let (content, alpha, wrap, func) = match self {
            Self::Name(name) => return name.to_string(),
            Self::Hex => return target.to_hex(),
            Self::Rgb { alpha, wrap } => (target.rgb_content(), alpha, wrap, "rgb"),
            Self::Hsl { alpha, wrap } => (target.hsl_content(), alpha, wrap, "hsl"),
        };

        let content = match alpha {
            Some(a) => format!("{content}, {a}"),
            None => content,
        };
        match (wrap, alpha.is_some()) {
            (false, _) => content,
            (true, false) => format!("{func}({content})"),
            (true, true) => format!("{func}a({content})"),
        }
    }
}

/// Whole-literal form for an opaque color.
const fn opaque_form(pref: OpaqueFormat, name: Option<&str>) -> Form<'_> {
    match (name, pref) {
        (Some(name), _) => Form::Name(name),
        (None, OpaqueFormat::Hex) => Form::Hex,
        (None, OpaqueFormat::Rgb) => Form::Rgb {
            alpha: None,
            wrap: true,
        },
        (None, OpaqueFormat::Hsl) => Form::Hsl {
            alpha: None,
            wrap: true,
        },
    }
}

/// Whole-literal form for a color with alpha.
const fn alpha_form(pref: AlphaFormat, alpha: &str) -> Form<'_> {
    match pref {
        AlphaFormat::Rgba => Form::Rgb {
            alpha: Some(alpha),
            wrap: true,
        },
        AlphaFormat::Hsla => Form::Hsl {
            alpha: Some(alpha),
            wrap: true,
        },
    }
}

// ─── Planning ────────────────────────────────────────────────────────────────

/// Everything a decision needs besides the token.
struct Context<'a> {
    window: &'a TextWindow,
    prefs: &'a Preferences,
    named: &'a dyn NamedColors,
    /// Name of the target color, when names are enabled and it has one.
    name: Option<&'a str>,
}

/// Caret strictly inside a complete literal.
fn replacement<'a>(ctx: &Context<'a>, token: &ColorToken<'a>) -> Option<(Span, Form<'a>)> {
    let whole = token.span;
    let content = token.content_span?;
    let opaque = ctx.prefs.preferred_opaque_format;
    let alpha_pref = ctx.prefs.preferred_alpha_format;

    let decision = match token.kind {
        TokenKind::Hex => (whole, opaque_form(opaque, ctx.name)),
        TokenKind::Rgb => match (ctx.name, opaque) {
            (None, OpaqueFormat::Rgb) => (
                content,
                Form::Rgb {
                    alpha: None,
                    wrap: false,
                },
            ),
            _ => (whole, opaque_form(opaque, ctx.name)),
        },
        TokenKind::Hsl => match (ctx.name, opaque) {
            (None, OpaqueFormat::Hsl) => (
                content,
                Form::Hsl {
                    alpha: None,
                    wrap: false,
                },
            ),
            _ => (whole, opaque_form(opaque, ctx.name)),
        },
        TokenKind::Rgba => {
            let alpha = token.alpha()?;
            match alpha_pref {
                AlphaFormat::Rgba => (
                    content,
                    Form::Rgb {
                        alpha: Some(alpha),
                        wrap: false,
                    },
                ),
                AlphaFormat::Hsla => (whole, alpha_form(alpha_pref, alpha)),
            }
        }
        TokenKind::Hsla => {
            let alpha = token.alpha()?;
            match alpha_pref {
                AlphaFormat::Hsla => (
                    content,
                    Form::Hsl {
                        alpha: Some(alpha),
                        wrap: false,
                    },
                ),
                AlphaFormat::Rgba => (whole, alpha_form(alpha_pref, alpha)),
            }
        }
        _ => return None,
    };
    Some(decision)
}

/// Caret right after an open token.
fn completion<'a>(ctx: &Context<'a>, token: &ColorToken<'a>) -> Option<(Span, Form<'a>)> {
    // `rgb(|)`: swallow the closing paren so it is not doubled.
    let paren = usize::from(ctx.window.char_at_cursor() == Some(')'));
    let opaque = ctx.prefs.preferred_opaque_format;
    let alpha_pref = ctx.prefs.preferred_alpha_format;

    let decision = match token.kind {
        TokenKind::HashOpen => (token.span, opaque_form(opaque, ctx.name)),
        TokenKind::RgbOpen | TokenKind::HslOpen => {
            (token.span.extend(paren), opaque_form(opaque, ctx.name))
        }
        TokenKind::RgbaOpen | TokenKind::HslaOpen => {
            (token.span.extend(paren), alpha_form(alpha_pref, OPAQUE_ALPHA))
        }
        _ => return None,
    };
    Some(decision)
}

/// Plan how to write `target` into `window` at its caret.
///
/// # Errors
///
/// [`ColorError::NoInsertionTarget`] when the caret is on no literal, no
/// open token and no named color word. The caller then inserts the
/// color as typed at the caret.
pub fn plan(
    window: &TextWindow,
    target: Rgb,
    prefs: &Preferences,
    named: &dyn NamedColors,
) -> Result<InsertionPlan, ColorError> {
    let cursor = window.cursor();
    let name = if prefs.use_named_colors {
        named.name_of(target)
    } else {
        None
    };
    let ctx = Context {
        window,
        prefs,
        named,
        name,
    };

    let anchored = grammar::scan(window.text()).find_map(|token| {
        if token.span.contains(cursor) {
            replacement(&ctx, &token).map(|d| (PlanMode::Replace(token.kind), d))
        } else if token.span.end == cursor {
            completion(&ctx, &token).map(|d| (PlanMode::Complete(token.kind), d))
        } else {
            None
        }
    });

    let (mode, (span, form)) = match anchored {
        Some(found) => found,
        None => (PlanMode::Word, named_word(&ctx)?),
    };

    let plan = InsertionPlan {
        replace_span: span,
        replacement_text: form.render(target),
        mode,
    };
    debug!(%target, %plan, "planned insertion");
    Ok(plan)
}

/// Caret on a named color word: retype the word.
fn named_word<'a>(ctx: &Context<'a>) -> Result<(Span, Form<'a>), ColorError> {
    let text = ctx.window.text();
    let span = word_at(text, ctx.window.cursor());
    if span.is_empty() {
        return Err(ColorError::NoInsertionTarget);
    }

    match ctx.named.by_name(&text[span.start..span.end]) {
        Some(_) => Ok((span, ctx.name.map_or(Form::Hex, Form::Name))),
        None => Err(ColorError::NoInsertionTarget),
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::named::CssColors;
    use pretty_assertions::assert_eq;

    /// Window over `marked` with the caret at the `|` marker (removed).
    fn window(marked: &str) -> TextWindow {
        let cursor = marked.find('|').expect("test text needs a | caret");
        TextWindow::new(marked.replacen('|', "", 1), 0, cursor)
    }

    fn prefs(opaque: OpaqueFormat, alpha: AlphaFormat, names: bool) -> Preferences {
        Preferences {
            use_named_colors: names,
            preferred_opaque_format: opaque,
            preferred_alpha_format: alpha,
        }
    }

    fn numeric(opaque: OpaqueFormat) -> Preferences {
        prefs(opaque, AlphaFormat::Rgba, false)
    }

    fn hex(s: &str) -> Rgb {
        Rgb::from_hex(s).unwrap()
    }

    /// Plan and apply, returning the edited text.
    fn edit(marked: &str, target: &str, prefs: &Preferences) -> String {
        let w = window(marked);
        plan(&w, hex(target), prefs, &CssColors).unwrap().apply(w.text())
    }

    // ── Replacement ──────────────────────────────────────────────────────

    #[test]
    fn rgba_keeps_alpha_and_rewrites_content_only() {
        let w = window("background: rgba(10, 2|0, 30, 0.4)");
        let p = plan(&w, hex("#112233"), &Preferences::default(), &CssColors).unwrap();
        assert_eq!(p.mode, PlanMode::Replace(TokenKind::Rgba));
        assert_eq!(p.replace_span, Span::new(17, 32));
        assert_eq!(p.replacement_text, "17, 34, 51, 0.4");
    }

    #[test]
    fn hex_switches_to_preferred_hsl() {
        let w = window("color: #ff|0000");
        let p = plan(&w, hex("#ff0000"), &numeric(OpaqueFormat::Hsl), &CssColors).unwrap();
        assert_eq!(p.replace_span, Span::new(7, 14));
        assert_eq!(p.replacement_text, "hsl(0, 100%, 50%)");
    }

    #[test]
    fn hex_stays_hex() {
        assert_eq!(
            edit("color: #|abc;", "#123456", &numeric(OpaqueFormat::Hex)),
            "color: #123456;"
        );
    }

    #[test]
    fn hex_switches_to_preferred_rgb() {
        assert_eq!(
            edit("color: #|abc;", "#123456", &numeric(OpaqueFormat::Rgb)),
            "color: rgb(18, 52, 86);"
        );
    }

    #[test]
    fn rgb_in_rgb_preference_rewrites_content() {
        let w = window("rgb( 1, 2,|3 )");
        let p = plan(&w, hex("#0a141e"), &numeric(OpaqueFormat::Rgb), &CssColors).unwrap();
        // Content `1, 2,3` after the caret marker is removed.
        assert_eq!(p.replace_span, Span::new(5, 11));
        assert_eq!(p.apply(w.text()), "rgb( 10, 20, 30 )");
    }

    #[test]
    fn rgb_switches_to_hex_or_hsl() {
        assert_eq!(
            edit("x: rgb(1, |2, 3);", "#0a141e", &numeric(OpaqueFormat::Hex)),
            "x: #0a141e;"
        );
        assert_eq!(
            edit("x: rgb(1, |2, 3);", "#112233", &numeric(OpaqueFormat::Hsl)),
            "x: hsl(210, 50%, 13%);"
        );
    }

    #[test]
    fn hsl_in_hsl_preference_rewrites_content() {
        assert_eq!(
            edit("hsl(1|0, 20%, 30%)", "#ff0000", &numeric(OpaqueFormat::Hsl)),
            "hsl(0, 100%, 50%)"
        );
    }

    #[test]
    fn hsl_switches_to_rgb() {
        assert_eq!(
            edit("hsl(1|0, 20%, 30%)", "#ff0000", &numeric(OpaqueFormat::Rgb)),
            "rgb(255, 0, 0)"
        );
    }

    #[test]
    fn rgba_switches_to_hsla_keeping_alpha() {
        let p = prefs(OpaqueFormat::Hex, AlphaFormat::Hsla, true);
        assert_eq!(
            edit("rgba(1, 2, 3, |.25)", "#ff0000", &p),
            "hsla(0, 100%, 50%, .25)"
        );
    }

    #[test]
    fn hsla_content_keeps_alpha() {
        let p = prefs(OpaqueFormat::Hex, AlphaFormat::Hsla, true);
        assert_eq!(
            edit("hsla(|0, 0%, 0%, 0.75)", "#00ff00", &p),
            "hsla(120, 100%, 50%, 0.75)"
        );
    }

    #[test]
    fn hsla_switches_to_rgba_keeping_alpha() {
        assert_eq!(
            edit("hsla(|0, 0%, 0%, 1)", "#00ff00", &Preferences::default()),
            "rgba(0, 255, 0, 1)"
        );
    }

    // ── Named colors ─────────────────────────────────────────────────────

    #[test]
    fn named_target_replaces_hex_literal() {
        assert_eq!(
            edit("color: #12|3456;", "#ff0000", &Preferences::default()),
            "color: red;"
        );
    }

    #[test]
    fn named_target_overrides_rgb_preference() {
        let p = prefs(OpaqueFormat::Rgb, AlphaFormat::Rgba, true);
        assert_eq!(edit("rgb(1, |2, 3)", "#000080", &p), "navy");
    }

    #[test]
    fn alpha_literal_never_becomes_a_name() {
        assert_eq!(
            edit("rgba(1, |2, 3, 0.5)", "#ff0000", &Preferences::default()),
            "rgba(255, 0, 0, 0.5)"
        );
    }

    #[test]
    fn names_disabled_keeps_numbers() {
        assert_eq!(
            edit("color: #12|3456;", "#ff0000", &numeric(OpaqueFormat::Hex)),
            "color: #ff0000;"
        );
    }

    // ── Completion ───────────────────────────────────────────────────────

    #[test]
    fn rgb_open_with_trailing_paren_is_not_doubled() {
        let w = window("color: rgb(|)");
        let p = plan(&w, hex("#008000"), &numeric(OpaqueFormat::Rgb), &CssColors).unwrap();
        assert_eq!(p.mode, PlanMode::Complete(TokenKind::RgbOpen));
        assert_eq!(p.replace_span, Span::new(7, 12));
        assert_eq!(p.apply(w.text()), "color: rgb(0, 128, 0)");
    }

    #[test]
    fn rgb_open_without_paren() {
        assert_eq!(
            edit("color: rgb(|;", "#008000", &numeric(OpaqueFormat::Rgb)),
            "color: rgb(0, 128, 0);"
        );
    }

    #[test]
    fn open_token_follows_preference() {
        assert_eq!(
            edit("color: rgb(|)", "#112233", &numeric(OpaqueFormat::Hex)),
            "color: #112233"
        );
        assert_eq!(
            edit("color: hsl(|)", "#112233", &numeric(OpaqueFormat::Hsl)),
            "color: hsl(210, 50%, 13%)"
        );
    }

    #[test]
    fn open_token_uses_name() {
        assert_eq!(
            edit("color: hsl(|)", "#008000", &Preferences::default()),
            "color: green"
        );
    }

    #[test]
    fn hash_completes_to_hex() {
        let w = window("color: #|;");
        let p = plan(&w, hex("#123456"), &Preferences::default(), &CssColors).unwrap();
        assert_eq!(p.mode, PlanMode::Complete(TokenKind::HashOpen));
        assert_eq!(p.apply(w.text()), "color: #123456;");
    }

    #[test]
    fn hash_completes_to_rgb_preference() {
        assert_eq!(
            edit("color: #|;", "#123456", &numeric(OpaqueFormat::Rgb)),
            "color: rgb(18, 52, 86);"
        );
    }

    #[test]
    fn alpha_open_gets_opaque_alpha() {
        assert_eq!(
            edit("color: rgba(|)", "#ff0000", &Preferences::default()),
            "color: rgba(255, 0, 0, 1)"
        );
        let p = prefs(OpaqueFormat::Hex, AlphaFormat::Hsla, true);
        assert_eq!(
            edit("color: rgba(|", "#ff0000", &p),
            "color: hsla(0, 100%, 50%, 1)"
        );
        assert_eq!(
            edit("color: hsla(|)", "#ff0000", &Preferences::default()),
            "color: rgba(255, 0, 0, 1)"
        );
    }

    // ── Word fallback ────────────────────────────────────────────────────

    #[test]
    fn named_word_is_retyped() {
        let w = window("color: re|d;");
        let p = plan(&w, hex("#ff0000"), &Preferences::default(), &CssColors).unwrap();
        assert_eq!(p.mode, PlanMode::Word);
        assert_eq!(p.replace_span, Span::new(7, 10));
        assert_eq!(p.replacement_text, "red");
    }

    #[test]
    fn named_word_becomes_hex_without_name() {
        assert_eq!(
            edit("color: navy|;", "#123456", &Preferences::default()),
            "color: #123456;"
        );
    }

    #[test]
    fn nothing_to_anchor() {
        let w = window("margin: 0 au|to;");
        assert_eq!(
            plan(&w, hex("#123456"), &Preferences::default(), &CssColors),
            Err(ColorError::NoInsertionTarget)
        );
        let w = window("color: |");
        assert_eq!(
            plan(&w, hex("#123456"), &Preferences::default(), &CssColors),
            Err(ColorError::NoInsertionTarget)
        );
    }

    #[test]
    fn caret_after_complete_literal_is_not_an_anchor() {
        let w = window("color: #abc|");
        assert_eq!(
            plan(&w, hex("#123456"), &Preferences::default(), &CssColors),
            Err(ColorError::NoInsertionTarget)
        );
    }

    #[test]
    fn caret_inside_multibyte_char_does_not_panic() {
        // Byte 1 falls inside 'é'; the window snaps the caret to 0.
        let w = TextWindow::new("é", 0, 1);
        assert_eq!(
            plan(&w, hex("#123456"), &Preferences::default(), &CssColors),
            Err(ColorError::NoInsertionTarget)
        );
        let w = TextWindow::new("é red", 0, 1);
        let p = plan(&w, hex("#ff0000"), &Preferences::default(), &CssColors);
        assert_eq!(p, Err(ColorError::NoInsertionTarget));
    }

    // ── Purity ───────────────────────────────────────────────────────────

    #[test]
    fn planning_is_repeatable() {
        let w = window("a: #fff; b: rgba(1, |2, 3, .5); c: hsl(");
        let first = plan(&w, hex("#abcdef"), &Preferences::default(), &CssColors);
        let second = plan(&w, hex("#abcdef"), &Preferences::default(), &CssColors);
        assert_eq!(first, second);
    }
}

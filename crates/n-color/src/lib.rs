// SPDX-License-Identifier: MIT
//
// n-color — color literal engine for n-nvim.
//
// Recognizes CSS color literals (`#rgb`, `#rrggbb`, `rgb()`, `rgba()`,
// `hsl()`, `hsla()` and named colors) in a small window of text around
// the caret, reports what color sits there, and plans how a newly
// picked color should be written back: replacing the literal in place,
// completing a half-typed one, or retyping a color name.
//
// Pipeline:
//
//   TextWindow ──► grammar::scan ──┬──► extract  (read path: "what color is here")
//                                  └──► plan     (write path: "how do I insert here")
//                                            │
//                                            ▼
//                                        convert (hex / RGB / HSL / HSV math)
//
// Everything here is pure: no buffers, no timers, no I/O besides
// loading the TOML settings file. The host editor supplies text and
// applies the returned edits.

// Single-char math variables (r, g, b, h, s, l, v) are the standard
// convention in color science.
#![allow(clippy::many_single_char_names)]
#![allow(clippy::similar_names)]

pub mod convert;
pub mod error;
pub mod extract;
pub mod grammar;
pub mod info;
pub mod named;
pub mod plan;
pub mod settings;
pub mod span;
pub mod word;

pub use convert::Rgb;
pub use error::{ColorError, ConfigError};
pub use extract::{NormalizedColor, Probe};
pub use grammar::{ColorToken, TokenKind};
pub use info::ColorInfo;
pub use named::{CssColors, NamedColors};
pub use plan::{InsertionPlan, PlanMode};
pub use settings::{AlphaFormat, OpaqueFormat, Palette, Preferences, Settings};
pub use span::{Span, TextWindow, WINDOW_RADIUS};

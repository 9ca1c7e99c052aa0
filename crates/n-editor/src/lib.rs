//! # n-editor — host side of the color workflow
//!
//! The color engine in `n-color` is pure: it reads a [`n_color::TextWindow`]
//! and returns values. This crate holds what it needs from a host editor:
//!
//! - **[`position`]** — `Position` (line, col), 0-indexed, with `LINE:COL` parsing
//! - **[`buffer`]** — `Buffer` wrapping a rope: caret windows, plan application, file I/O
//! - **[`debounce`]** — the Idle/Pending/Evaluating state machine that decides
//!   when to re-run detection, and a `Watcher` thread driving it

pub mod buffer;
pub mod debounce;
pub mod position;

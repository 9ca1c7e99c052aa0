// SPDX-License-Identifier: MIT
//
// n-chroma — color literal helper for n-nvim.
//
// This binary wires the pure engine to files on disk:
//
//   n-color  → grammar, extraction, conversions, insertion planning, settings
//   n-editor → rope buffer, caret windows, plan application
//
// Every subcommand follows the same flow:
//
//   file → Buffer → window around the caret → engine → (edit) → stdout / file
//
// Carets are either a char index (`42`) or a 1-based `LINE:COL` pair.

use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use n_color::extract::{self, color_at};
use n_color::plan::plan;
use n_color::{
    ColorError, ColorInfo, CssColors, Preferences, Probe, Rgb, Settings, TextWindow, WINDOW_RADIUS,
};
use n_editor::buffer::Buffer;
use n_editor::position::Position;

/// Settings file looked up in the working directory when `--config` is absent.
const DEFAULT_CONFIG: &str = "n-chroma.toml";

// ─── Command line ───────────────────────────────────────────────────────────

/// Inspect, complete and rewrite CSS color literals in place.
#[derive(Debug, Parser)]
#[command(name = "n-chroma", version)]
struct Cli {
    /// Settings file (TOML).
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log decisions to stderr (same as RUST_LOG=debug).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Show the color at the caret in hex, RGB, HSV and HSL.
    Info {
        file: PathBuf,
        #[arg(value_parser = parse_caret)]
        at: Caret,
    },
    /// Say what an editor would offer at the caret: info, picker or nothing.
    Probe {
        file: PathBuf,
        #[arg(value_parser = parse_caret)]
        at: Caret,
    },
    /// Write a color at the caret, replacing or completing the literal there.
    Insert {
        file: PathBuf,
        #[arg(value_parser = parse_caret)]
        at: Caret,
        /// Any color literal or CSS name, e.g. `#f80`, `rgb(1, 2, 3)`, `teal`.
        color: String,
        /// Save the file instead of printing the result.
        #[arg(long)]
        write: bool,
    },
    /// List palettes (bookmarks first), or the colors of one palette.
    Palettes { name: Option<String> },
}

/// Where the caret is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Caret {
    Char(usize),
    At(Position),
}

impl Caret {
    fn resolve(self, buf: &Buffer) -> Result<usize> {
        match self {
            Self::Char(idx) if idx <= buf.len_chars() => Ok(idx),
            Self::Char(idx) => bail!(
                "offset {idx} is past the end of the file ({} chars)",
                buf.len_chars()
            ),
            Self::At(pos) => buf
                .pos_to_char_idx(pos)
                .with_context(|| format!("position {pos} is outside the file")),
        }
    }
}

fn parse_caret(s: &str) -> Result<Caret, String> {
    if s.contains(':') {
        s.parse().map(Caret::At).map_err(|e| e.to_string())
    } else {
        s.parse()
            .map(Caret::Char)
            .map_err(|_| format!("invalid caret {s:?} (expected OFFSET or LINE:COL)"))
    }
}

/// Parse a color argument the same way literals in a file are read.
fn parse_color(s: &str) -> Option<Rgb> {
    let window = TextWindow::new(s.trim(), 0, 0);
    color_at(&window, &CssColors).ok().map(|c| c.rgb())
}

// ─── Subcommands ────────────────────────────────────────────────────────────

fn info(buf: &Buffer, caret: usize) -> Result<String> {
    let window = buf.window(caret, WINDOW_RADIUS);
    let color = color_at(&window, &CssColors)?;
    Ok(ColorInfo::new(color, &CssColors).to_string())
}

fn probe(buf: &Buffer, caret: usize) -> String {
    let window = buf.window(caret, WINDOW_RADIUS);
    match extract::probe(&window, &CssColors) {
        Probe::Info(color) => format!("info {}", color.to_hex()),
        Probe::Picker => "picker".to_string(),
        Probe::Nothing => "nothing".to_string(),
    }
}

/// Write `color` at `caret`. Returns the caret after the edit.
fn insert(buf: &mut Buffer, caret: usize, color: &str, prefs: &Preferences) -> Result<usize> {
    let target = parse_color(color).with_context(|| format!("not a color: {color:?}"))?;
    let window = buf.window(caret, WINDOW_RADIUS);

    match plan(&window, target, prefs, &CssColors) {
        Ok(plan) => buf
            .apply(&window, &plan)
            .context("insertion plan does not fit the buffer"),
        Err(ColorError::NoInsertionTarget) => {
            debug!(caret, color, "no insertion target, inserting as typed");
            Ok(buf.insert_at(caret, color))
        }
        Err(e) => Err(e.into()),
    }
}

fn palettes(settings: &Settings, name: Option<&str>) -> Result<String> {
    let all = settings.palettes();
    let Some(name) = name else {
        let lines: Vec<String> = all
            .iter()
            .map(|p| match &p.caption {
                Some(caption) => format!("{} ({}): {caption}", p.name, p.colors.len()),
                None => format!("{} ({})", p.name, p.colors.len()),
            })
            .collect();
        return Ok(lines.join("\n"));
    };

    let palette = all
        .iter()
        .find(|p| p.name == name)
        .with_context(|| format!("no palette named {name:?}"))?;
    Ok(palette.colors.join("\n"))
}

// ─── Wiring ─────────────────────────────────────────────────────────────────

fn setup_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn load_settings(explicit: Option<&Path>) -> Result<Settings> {
    match explicit {
        Some(path) if !path.exists() => bail!("config file {} does not exist", path.display()),
        Some(path) => Settings::load(path).with_context(|| format!("loading {}", path.display())),
        None => Settings::load(Path::new(DEFAULT_CONFIG)).context("loading settings"),
    }
}

fn open(file: &Path) -> Result<Buffer> {
    Buffer::from_file(file).with_context(|| format!("cannot read {}", file.display()))
}

fn run(cli: Cli) -> Result<()> {
    let settings = load_settings(cli.config.as_deref())?;

    match cli.command {
        Command::Info { file, at } => {
            let buf = open(&file)?;
            println!("{}", info(&buf, at.resolve(&buf)?)?);
        }
        Command::Probe { file, at } => {
            let buf = open(&file)?;
            println!("{}", probe(&buf, at.resolve(&buf)?));
        }
        Command::Insert {
            file,
            at,
            color,
            write,
        } => {
            let mut buf = open(&file)?;
            let caret = at.resolve(&buf)?;
            let caret = insert(&mut buf, caret, &color, &settings.preferences)?;
            if write {
                buf.save()
                    .with_context(|| format!("cannot write {}", file.display()))?;
                debug!(caret, "saved");
            } else {
                print!("{}", buf.contents());
            }
        }
        Command::Palettes { name } => {
            println!("{}", palettes(&settings, name.as_deref())?);
        }
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("n-chroma: {e:#}");
        process::exit(1);
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────

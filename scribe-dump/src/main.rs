//! scribe-dump: lay out a string and print what the engine produced.
//!
//! ```text
//! scribe-dump [--size N] [--wrap W] [--justify left|center|right]
//!             [--font "Inter, sans-serif"] [--fixed] [--config text.json]
//!             [--atlas out.pgm] TEXT...
//! ```
//!
//! Prints one row per line and per character, then optionally writes the
//! glyph atlas as a binary PGM. `RUST_LOG=debug` shows relayout summaries.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use log::info;
use scribe_fonts::{FontError, FontSpec, SystemRasterizer};
use scribe_text::{AtlasConfig, FixedRasterizer, FontFamily, Justify, Text, TextConfig};
use thiserror::Error;

#[derive(Debug, Error)]
enum DumpError {
    #[error("{0}\n\n{usage}", usage = USAGE)]
    Usage(String),

    #[error("config: {0}")]
    Config(#[from] serde_json::Error),

    #[error(transparent)]
    Font(#[from] FontError),

    #[error(transparent)]
    Io(#[from] io::Error),
}

const USAGE: &str = "usage: scribe-dump [--size N] [--wrap W] [--justify left|center|right] \
[--font CHAIN] [--fixed] [--config FILE] [--atlas FILE] TEXT...";

// ── Arguments ───────────────────────────────────────────────────────

#[derive(Debug, Default, PartialEq)]
struct Args {
    size: Option<u32>,
    wrap: Option<f32>,
    justify: Option<Justify>,
    font: Option<String>,
    fixed: bool,
    config: Option<PathBuf>,
    atlas: Option<PathBuf>,
    text: String,
}

fn parse_args(argv: impl IntoIterator<Item = String>) -> Result<Args, DumpError> {
    let mut args = Args::default();
    let mut words = Vec::new();
    let mut argv = argv.into_iter();

    while let Some(arg) = argv.next() {
        let mut value = |flag: &str| {
            argv.next()
                .ok_or_else(|| DumpError::Usage(format!("{flag} needs a value")))
        };
        match arg.as_str() {
            "--size" => {
                let v = value("--size")?;
                args.size = Some(v.parse().map_err(|_| DumpError::Usage(format!("bad size '{v}'")))?);
            }
            "--wrap" => {
                let v = value("--wrap")?;
                args.wrap = Some(v.parse().map_err(|_| DumpError::Usage(format!("bad wrap width '{v}'")))?);
            }
            "--justify" => {
                args.justify = Some(match value("--justify")?.as_str() {
                    "left" => Justify::Left,
                    "center" => Justify::Center,
                    "right" => Justify::Right,
                    other => return Err(DumpError::Usage(format!("bad justify '{other}'"))),
                });
            }
            "--font" => args.font = Some(value("--font")?),
            "--fixed" => args.fixed = true,
            "--config" => args.config = Some(value("--config")?.into()),
            "--atlas" => args.atlas = Some(value("--atlas")?.into()),
            flag if flag.starts_with("--") => {
                return Err(DumpError::Usage(format!("unknown flag '{flag}'")));
            }
            _ => words.push(arg),
        }
    }

    if words.is_empty() {
        return Err(DumpError::Usage("no text given".into()));
    }
    // Allow literal "\n" on the command line.
    args.text = words.join(" ").replace("\\n", "\n");
    Ok(args)
}

fn text_config(args: &Args) -> Result<TextConfig, DumpError> {
    let mut config = match &args.config {
        Some(path) => serde_json::from_str(&fs::read_to_string(path)?)?,
        None => TextConfig::default(),
    };
    if let Some(size) = args.size {
        config.size = size;
    }
    if let Some(wrap) = args.wrap {
        config.auto_wrap = true;
        config.custom_wrap_width = Some(wrap);
    }
    if let Some(justify) = args.justify {
        config.justify = justify;
    }
    Ok(config)
}

// ── Output ──────────────────────────────────────────────────────────

fn print_tables(out: &mut impl Write, text: &Text) -> io::Result<()> {
    let bounds = text.bounds();
    writeln!(
        out,
        "{} lines, {} characters ({} visible), bounds {:.1}x{:.1}",
        text.line_count(),
        text.text_size(false),
        text.text_size(true),
        bounds.width(),
        bounds.height(),
    )?;

    writeln!(out, "\nline  width   ascender  descender  baseline  offset")?;
    for line in text.lines() {
        writeln!(
            out,
            "{:>4}  {:>6.1}  {:>8.1}  {:>9.1}  {:>8.1}  {:>6.1}",
            line.index, line.width, line.ascender, line.descender, line.baseline, line.alignment_offset,
        )?;
    }

    writeln!(out, "\n   #  char    line  word  size  advance     pen  quad")?;
    for ch in text.characters() {
        writeln!(
            out,
            "{:>4}  {:<6}  {:>4}  {:>4}  {:>4}  {:>7.1}  {:>6.1}  {}",
            ch.character_order,
            format!("{:?}", ch.codepoint),
            ch.line_order,
            ch.word_order,
            ch.size,
            ch.xadvance,
            ch.aligned_kerning,
            if ch.has_geometry() { "yes" } else { "-" },
        )?;
    }
    Ok(())
}

fn write_pgm(path: &Path, fonts: &FontFamily) -> io::Result<()> {
    let atlas = fonts.atlas();
    let mut file = io::BufWriter::new(fs::File::create(path)?);
    write!(file, "P5\n{} {}\n255\n", atlas.width(), atlas.height())?;
    file.write_all(atlas.texture())?;
    file.flush()
}

fn run(args: Args) -> Result<(), DumpError> {
    let config = text_config(&args)?;
    let atlas = AtlasConfig::default();

    let mut fonts = if args.fixed {
        FontFamily::new(FixedRasterizer::new(), atlas)
    } else {
        let spec = args.font.as_deref().map(FontSpec::new).unwrap_or_default();
        FontFamily::new(SystemRasterizer::new(&spec)?, atlas)
    };

    let mut text = Text::new(config);
    text.set_text(&mut fonts, &args.text);
    info!("laid out {} glyphs into {} lines", fonts.glyph_count(), text.line_count());

    print_tables(&mut io::stdout().lock(), &text)?;

    if let Some(path) = &args.atlas {
        write_pgm(path, &fonts)?;
        info!("wrote atlas to {}", path.display());
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();

    match parse_args(std::env::args().skip(1)).and_then(run) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("scribe-dump: {err}");
            ExitCode::FAILURE
        }
    }
}

// ===================================================================
// Tests
// ===================================================================

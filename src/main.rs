use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use image::Rgb;
use log::debug;

use qrgen::{parse_color, ECLevel, MaskPattern, OutputFormat, QRBuilder, RenderOptions, Version};

/// Small QR code generator (PNG or SVG).
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Text to encode in the QR code (wrap vCard/URLs in quotes)
    #[arg(short, long, required_unless_present = "file", conflicts_with = "file")]
    text: Option<String>,

    /// Read text to encode from a file
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Output file path (png or svg)
    #[arg(short, long, default_value = "qrcode.png")]
    output: PathBuf,

    /// Force output format (png or svg)
    #[arg(long)]
    format: Option<OutputFormat>,

    /// Size of each QR box in pixels
    #[arg(long, default_value_t = 10)]
    box_size: u32,

    /// Border size in boxes
    #[arg(long, default_value_t = 4)]
    border: u32,

    /// Error correction level: L, M, Q, H
    #[arg(long, default_value = "M")]
    error: ECLevel,

    /// Force a symbol version instead of the smallest that fits
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=40))]
    qr_version: Option<u8>,

    /// Force a mask pattern instead of the lowest penalty one
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=7))]
    mask: Option<u8>,

    /// Encode runs of kanji in kanji mode
    #[arg(long)]
    kanji: bool,

    /// Color of dark modules: #rrggbb, #rgb, black or white
    #[arg(long, default_value = "black", value_parser = parse_color)]
    fill: Rgb<u8>,

    /// Color of light modules and the border
    #[arg(long, default_value = "white", value_parser = parse_color)]
    background: Rgb<u8>,

    /// Also print the symbol to the terminal
    #[arg(long)]
    print: bool,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();
    match run(args) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<ExitCode> {
    let text = match (&args.file, args.text) {
        (Some(path), _) => {
            if !path.exists() {
                println!("Input file not found: {}", path.display());
                return Ok(ExitCode::FAILURE);
            }
            fs::read_to_string(path)
                .with_context(|| format!("Failed to read input file: {}", path.display()))?
        }
        (None, Some(text)) => text,
        (None, None) => anyhow::bail!("Either --text or --file is required"),
    };

    let (out, format) = resolve_output(&args.output, args.format);
    debug!("Writing {format} to {}", out.display());

    let mut builder = QRBuilder::new(text.as_bytes());
    builder.ec_level(args.error).kanji(args.kanji);
    if let Some(v) = args.qr_version {
        builder.version(Version::try_from(v as usize)?);
    }
    if let Some(m) = args.mask {
        builder.mask(MaskPattern::try_from(m)?);
    }
    let qr = builder.build().context("Failed to generate QR code")?;

    if args.print {
        println!("{}", qr.to_str(args.border as usize));
    }

    let opts = RenderOptions::default()
        .box_size(args.box_size)
        .border(args.border)
        .fill(args.fill)
        .background(args.background);
    let bytes = qr.to_bytes(format, &opts).context("Failed to render QR code")?;

    if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    fs::write(&out, bytes).with_context(|| format!("Failed to write: {}", out.display()))?;

    println!("Saved {format} QR code to: {}", out.display());
    Ok(ExitCode::SUCCESS)
}

// An explicit format wins, then the path suffix. Anything else falls back to PNG, and a
// path without a suffix gets one.
fn resolve_output(path: &Path, format: Option<OutputFormat>) -> (PathBuf, OutputFormat) {
    if let Some(fmt) = format.or_else(|| OutputFormat::from_path(path)) {
        return (path.to_path_buf(), fmt);
    }
    let out = match path.extension() {
        None => path.with_extension(OutputFormat::Png.extension()),
        Some(_) => path.to_path_buf(),
    };
    (out, OutputFormat::Png)
}

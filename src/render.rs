use std::fmt::{Display, Error, Formatter, Write};
use std::io::Cursor;
use std::path::Path;
use std::str::FromStr;

use image::{ImageFormat, Rgb, RgbImage};
use imageproc::{drawing::draw_filled_rect_mut, rect::Rect};

use crate::builder::QR;
use crate::common::error::{QRError, QRResult};
use crate::common::metadata::Color;

// Output format
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum OutputFormat {
    Png,
    Svg,
}

impl OutputFormat {
    /// Format named by the path's extension, if it is a supported one.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()?.to_str()?.parse().ok()
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Svg => "svg",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = QRError;
    fn from_str(s: &str) -> QRResult<Self> {
        match s.to_ascii_lowercase().as_str() {
            "png" => Ok(Self::Png),
            "svg" => Ok(Self::Svg),
            _ => Err(QRError::InvalidFormat),
        }
    }
}

impl Display for OutputFormat {
    fn fmt(&self, f: &mut Formatter) -> Result<(), Error> {
        write!(f, "{}", self.extension().to_ascii_uppercase())
    }
}

// Colors
//------------------------------------------------------------------------------

/// Parses `#rrggbb`, `#rgb`, `black` or `white`.
pub fn parse_color(s: &str) -> QRResult<Rgb<u8>> {
    match s.to_ascii_lowercase().as_str() {
        "black" => return Ok(Rgb([0, 0, 0])),
        "white" => return Ok(Rgb([255, 255, 255])),
        _ => (),
    }

    let hex = s.strip_prefix('#').ok_or(QRError::InvalidColor)?;
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(QRError::InvalidColor);
    }
    let channel = |h: &str| u8::from_str_radix(h, 16).map_err(|_| QRError::InvalidColor);
    match hex.len() {
        6 => Ok(Rgb([channel(&hex[0..2])?, channel(&hex[2..4])?, channel(&hex[4..6])?])),
        // #abc is shorthand for #aabbcc
        3 => {
            let mut rgb = [0; 3];
            for (i, c) in hex.char_indices() {
                rgb[i] = channel(&c.to_string())? * 0x11;
            }
            Ok(Rgb(rgb))
        }
        _ => Err(QRError::InvalidColor),
    }
}

fn to_hex(clr: Rgb<u8>) -> String {
    let [r, g, b] = clr.0;
    format!("#{r:02x}{g:02x}{b:02x}")
}


// Render options
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub struct RenderOptions {
    box_size: u32,
    border: u32,
    fill: Rgb<u8>,
    background: Rgb<u8>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self { box_size: 10, border: 4, fill: Rgb([0, 0, 0]), background: Rgb([255, 255, 255]) }
    }
}

impl RenderOptions {
    /// Pixels per module.
    pub fn box_size(mut self, box_size: u32) -> Self {
        self.box_size = box_size;
        self
    }

    /// Quiet zone width in modules.
    pub fn border(mut self, border: u32) -> Self {
        self.border = border;
        self
    }

    pub fn fill(mut self, fill: Rgb<u8>) -> Self {
        self.fill = fill;
        self
    }

    pub fn background(mut self, background: Rgb<u8>) -> Self {
        self.background = background;
        self
    }

    // Side of the symbol plus quiet zone, in modules
    fn modules_per_side(&self, qr_width: usize) -> QRResult<u32> {
        let w = u32::try_from(qr_width).map_err(|_| QRError::InvalidBoxSize)?;
        self.border.checked_mul(2).and_then(|b| b.checked_add(w)).ok_or(QRError::InvalidBoxSize)
    }

    /// Canvas side in pixels. Fails for a zero box size or a canvas above
    /// [`MAX_CANVAS_PIXELS`].
    pub fn canvas_size(&self, qr_width: usize) -> QRResult<u32> {
        if self.box_size == 0 {
            return Err(QRError::InvalidBoxSize);
        }
        self.modules_per_side(qr_width)?
            .checked_mul(self.box_size)
            .filter(|&side| u64::from(side) * u64::from(side) <= MAX_CANVAS_PIXELS)
            .ok_or(QRError::InvalidBoxSize)
    }
}

/// Largest canvas, in pixels, a symbol is rendered to: 16384 x 16384, or 768 MiB of RGB.
pub const MAX_CANVAS_PIXELS: u64 = 1 << 28;


// Render
//------------------------------------------------------------------------------

impl QR {
    /// Paints every dark module as a `box_size` square over the background.
    pub fn render(&self, opts: &RenderOptions) -> QRResult<RgbImage> {
        let side = opts.canvas_size(self.width())?;
        let (bs, qz) = (opts.box_size, opts.border);

        let mut canvas = RgbImage::from_pixel(side, side, opts.background);
        let w = self.width();
        for r in 0..w {
            for c in 0..w {
                if self.color(r, c) == Color::Light {
                    continue;
                }
                let x = (qz + c as u32) * bs;
                let y = (qz + r as u32) * bs;
                let rect = Rect::at(x as i32, y as i32).of_size(bs, bs);
                draw_filled_rect_mut(&mut canvas, rect, opts.fill);
            }
        }

        Ok(canvas)
    }

    pub fn to_png(&self, opts: &RenderOptions) -> QRResult<Vec<u8>> {
        let canvas = self.render(opts)?;
        let mut buf = Cursor::new(Vec::new());
        canvas.write_to(&mut buf, ImageFormat::Png).map_err(|_| QRError::ImageEncoding)?;
        Ok(buf.into_inner())
    }

    /// SVG document sized like the PNG, drawn in module units. Horizontal runs of dark
    /// modules are merged into a single subpath.
    pub fn to_svg(&self, opts: &RenderOptions) -> QRResult<String> {
        let side = opts.canvas_size(self.width())?;
        let n = opts.modules_per_side(self.width())?;
        let qz = opts.border as usize;

        let mut path = String::new();
        let w = self.width();
        for r in 0..w {
            let mut c = 0;
            while c < w {
                if self.color(r, c) == Color::Light {
                    c += 1;
                    continue;
                }
                let start = c;
                while c < w && self.color(r, c) == Color::Dark {
                    c += 1;
                }
                let len = c - start;
                // Writing to a String is infallible
                let _ = write!(path, "M{},{}h{len}v1h-{len}z", start + qz, r + qz);
            }
        }

        Ok(format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
             <svg xmlns=\"http://www.w3.org/2000/svg\" version=\"1.1\" width=\"{side}\" height=\"{side}\" \
             viewBox=\"0 0 {n} {n}\" shape-rendering=\"crispEdges\">\n\
             <rect width=\"{n}\" height=\"{n}\" fill=\"{}\"/>\n\
             <path fill=\"{}\" d=\"{path}\"/>\n\
             </svg>\n",
            to_hex(opts.background),
            to_hex(opts.fill),
        ))
    }

    pub fn to_bytes(&self, format: OutputFormat, opts: &RenderOptions) -> QRResult<Vec<u8>> {
        match format {
            OutputFormat::Png => self.to_png(opts),
            OutputFormat::Svg => self.to_svg(opts).map(String::into_bytes),
        }
    }

    /// Block character rendering for terminals with a dark background. Each module is two
    /// characters wide.
    pub fn to_str(&self, border: usize) -> String {
        let w = self.width();
        let total_sz = w + 2 * border;

        let mut canvas = String::with_capacity(total_sz * (2 * total_sz + 1) * 3);
        for i in 0..total_sz {
            for j in 0..total_sz {
                if i < border || i >= border + w || j < border || j >= border + w {
                    canvas.push_str("██");
                    continue;
                }
                canvas.push_str(self.color(i - border, j - border).select("  ", "██"));
            }
            canvas.push('\n');
        }

        canvas
    }
}

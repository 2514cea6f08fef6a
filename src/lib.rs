//! # qrgen
//!
//! Turns bytes or text into a QR symbol and draws it as PNG, SVG or terminal text.
//!
//! The pipeline runs in the order a reader undoes it: the input is split into
//! numeric, alphanumeric, byte and kanji segments with the fewest total bits, the
//! smallest of the 40 versions that holds them is picked, Reed-Solomon codewords are
//! appended per block, codewords are laid out around the function patterns and the mask
//! with the lowest penalty is applied.
//!
//! Encode with the defaults (medium error correction, smallest version, best mask):
//!
//! ```rust
//! use qrgen::{QRBuilder, RenderOptions};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let qr = QRBuilder::new(b"Hello, World!").build()?;
//! assert_eq!(qr.width(), 21);
//!
//! let png = qr.to_png(&RenderOptions::default())?;
//! assert!(png.starts_with(b"\x89PNG"));
//! # Ok(())
//! # }
//! ```
//!
//! Every choice the encoder makes can be pinned instead:
//!
//! ```rust
//! use qrgen::{parse_color, ECLevel, MaskPattern, QRBuilder, RenderOptions, Version};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let qr = QRBuilder::new("Hello, World!".as_bytes())
//!     .version(Version::new(2))
//!     .ec_level(ECLevel::Q)
//!     .mask(MaskPattern::new(3))
//!     .kanji(false)
//!     .build()?;
//! assert_eq!(*qr.version(), 2);
//! assert_eq!(qr.mask().map(|m| *m), Some(3));
//!
//! let opts = RenderOptions::default()
//!     .box_size(4)
//!     .border(2)
//!     .fill(parse_color("#1d3557")?)
//!     .background(parse_color("white")?);
//! let svg = qr.to_svg(&opts)?;
//! assert!(svg.contains("fill=\"#1d3557\""));
//! # Ok(())
//! # }
//! ```
//!
//! Error correction recovers roughly 7%, 15%, 25% and 30% of the codewords at levels
//! L, M, Q and H. Symbols range from 21x21 modules at version 1 to 177x177 at version 40.

#![allow(clippy::items_after_test_module)]

pub mod builder;
pub(crate) mod common;
pub mod render;

pub use builder::{error_correction_capacity, Module, QRBuilder, QR};
pub use common::codec::{Mode, Segment};
pub use common::error::{ErrorKind, QRError, QRResult};
pub use common::mask::MaskPattern;
pub use common::metadata::{Color, ECLevel, Metadata, Version};
pub use render::{parse_color, OutputFormat, RenderOptions, MAX_CANVAS_PIXELS};

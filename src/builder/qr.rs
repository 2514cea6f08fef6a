use crate::common::iter::placement_order;
use crate::common::mask::MaskPattern;
use crate::common::metadata::{
    format_info_coords, generate_format_info, version_info_coords, Color, ECLevel, Metadata,
    Version, FORMAT_INFO_LEN, VERSION_INFO_LEN,
};

/// Role of a module in the symbol. Everything except `Data` is laid down before the
/// payload and is never masked.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Module {
    Empty,
    Func(Color),
    Version(Color),
    Format(Color),
    Data(Color),
}

impl Module {
    /// Unfilled modules read as light.
    pub fn color(self) -> Color {
        match self {
            Self::Empty => Color::Light,
            Self::Func(c) | Self::Version(c) | Self::Format(c) | Self::Data(c) => c,
        }
    }
}

/// Square module matrix of a QR symbol, stored row major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QR {
    modules: Vec<Module>,
    width: usize,
    version: Version,
    ec_level: ECLevel,
    mask: Option<MaskPattern>,
}

impl QR {
    pub(crate) fn new(version: Version, ec_level: ECLevel) -> Self {
        let width = version.width();
        Self { modules: vec![Module::Empty; width * width], width, version, ec_level, mask: None }
    }

    pub fn grid(&self) -> &[Module] {
        &self.modules
    }

    pub fn version(&self) -> Version {
        self.version
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn ec_level(&self) -> ECLevel {
        self.ec_level
    }

    pub fn mask(&self) -> Option<MaskPattern> {
        self.mask
    }

    pub fn metadata(&self) -> Metadata {
        Metadata::new(Some(self.version), Some(self.ec_level), self.mask)
    }

    pub fn count_dark_modules(&self) -> usize {
        self.modules.iter().filter(|m| m.color() == Color::Dark).count()
    }

    pub fn get(&self, r: usize, c: usize) -> Module {
        debug_assert!(r < self.width && c < self.width, "Out of bounds: ({r}, {c})");
        self.modules[r * self.width + c]
    }

    pub fn color(&self, r: usize, c: usize) -> Color {
        self.get(r, c).color()
    }

    pub(crate) fn set(&mut self, r: usize, c: usize, module: Module) {
        debug_assert!(r < self.width && c < self.width, "Out of bounds: ({r}, {c})");
        self.modules[r * self.width + c] = module;
    }

    // One char per module: lowercase for dark, uppercase for light
    #[cfg(test)]
    pub fn to_debug_str(&self) -> String {
        let mut res = String::from("\n");
        for row in self.modules.chunks(self.width) {
            for &m in row {
                let ch = match m {
                    Module::Empty => '.',
                    Module::Func(_) => 'f',
                    Module::Version(_) => 'v',
                    Module::Format(_) => 'm',
                    Module::Data(_) => 'd',
                };
                let light = m != Module::Empty && m.color() == Color::Light;
                res.push(if light { ch.to_ascii_uppercase() } else { ch });
            }
            res.push('\n');
        }
        res
    }
}


// Function patterns
//------------------------------------------------------------------------------

const TIMING_LINE: usize = 6;

// Chebyshev distance from the center: core 0-1 dark, ring 2 light, ring 3 dark and ring 4
// the light separator
const FINDER_RADIUS: usize = 4;

const ALIGNMENT_RADIUS: usize = 2;

impl QR {
    /// Lays down everything that is not data: finders with their separators, alignment
    /// patterns, timing lines, the reserved format area with its dark module and, from
    /// version 7, both version info blocks.
    pub(crate) fn draw_function_patterns(&mut self) {
        let w = self.width;
        for (r, c) in [(3, 3), (3, w - 4), (w - 4, 3)] {
            self.draw_rings(r, c, FINDER_RADIUS, |d| d != 2 && d != 4);
        }

        let centers = self.version.alignment_pattern();
        for &r in centers {
            for &c in centers {
                // Centers under a finder are skipped
                if self.get(r, c) == Module::Empty {
                    self.draw_rings(r, c, ALIGNMENT_RADIUS, |d| d != 1);
                }
            }
        }

        for i in 0..w {
            let m = Module::Func(Color::from(i % 2 == 0));
            for (r, c) in [(TIMING_LINE, i), (i, TIMING_LINE)] {
                if self.get(r, c) == Module::Empty {
                    self.set(r, c, m);
                }
            }
        }

        self.draw_format_info(0);
        if *self.version >= 7 {
            let info = self.version.info();
            self.draw_info(info, VERSION_INFO_LEN, version_info_coords, Module::Version);
        }
    }

    // Concentric square rings around (r, c), clipped to the symbol
    fn draw_rings(&mut self, r: usize, c: usize, radius: usize, is_dark: impl Fn(usize) -> bool) {
        let last = self.width - 1;
        for i in r.saturating_sub(radius)..=(r + radius).min(last) {
            for j in c.saturating_sub(radius)..=(c + radius).min(last) {
                let ring = i.abs_diff(r).max(j.abs_diff(c));
                self.set(i, j, Module::Func(Color::from(is_dark(ring))));
            }
        }
    }

    // Both format info copies plus the dark module beside the bottom left finder
    fn draw_format_info(&mut self, info: u32) {
        self.draw_info(info, FORMAT_INFO_LEN, format_info_coords, Module::Format);
        self.set(self.width - 8, 8, Module::Format(Color::Dark));
    }

    fn draw_info(
        &mut self,
        info: u32,
        len: usize,
        coords: fn(usize, usize) -> [(usize, usize); 2],
        kind: fn(Color) -> Module,
    ) {
        for i in 0..len {
            let m = kind(Color::from((info >> i) & 1 == 1));
            for (r, c) in coords(self.width, i) {
                self.set(r, c, m);
            }
        }
    }
}


// Encoding region
//------------------------------------------------------------------------------

impl QR {
    /// Walks the placement order and writes codeword bits, most significant first, into
    /// every module still empty. Whatever is left after the last codeword holds light
    /// remainder bits.
    pub(crate) fn draw_codewords(&mut self, codewords: &[u8]) {
        let mut bits =
            codewords.iter().flat_map(|&cw| (0..8).rev().map(move |i| (cw >> i) & 1 == 1));
        for (r, c) in placement_order(self.version) {
            if self.get(r, c) == Module::Empty {
                let bit = bits.next().unwrap_or(false);
                self.set(r, c, Module::Data(Color::from(bit)));
            }
        }
        debug_assert!(bits.next().is_none(), "Codewords overflow the encoding region");
    }

    /// Flips data modules selected by `pattern` and writes the matching format info.
    pub(crate) fn apply_mask(&mut self, pattern: MaskPattern) {
        let w = self.width;
        for (i, m) in self.modules.iter_mut().enumerate() {
            if let Module::Data(clr) = *m {
                if pattern.flips(i / w, i % w) {
                    *m = Module::Data(!clr);
                }
            }
        }
        self.mask = Some(pattern);
        self.draw_format_info(generate_format_info(self.ec_level, pattern));
    }
}

#[cfg(test)]
mod encoding_region_tests {
    use crate::builder::{Module, QR};
    use crate::common::mask::MaskPattern;
    use crate::common::metadata::{Color, ECLevel, Version};

    #[test]
    fn test_draw_codewords_fills_all() {
        let ver = Version::new(2);
        let mut qr = QR::new(ver, ECLevel::L);
        qr.draw_function_patterns();
        qr.draw_codewords(&vec![0xFF; ver.total_codewords()]);
        assert!(!qr.grid().contains(&Module::Empty));
        let data = qr.grid().iter().filter(|m| matches!(m, Module::Data(_))).count();
        assert_eq!(data, ver.raw_data_modules());
        // 7 remainder bits stay light
        let dark = qr.grid().iter().filter(|m| **m == Module::Data(Color::Dark)).count();
        assert_eq!(dark, ver.total_codewords() * 8);
        assert_eq!(qr.get(24, 24), Module::Data(Color::Dark));
    }

    #[test]
    fn test_codeword_bit_order() {
        let ver = Version::new(1);
        let mut qr = QR::new(ver, ECLevel::L);
        qr.draw_function_patterns();
        let mut codewords = vec![0; ver.total_codewords()];
        codewords[0] = 0b1010_0001;
        qr.draw_codewords(&codewords);
        // First codeword fills the bottom right 2x4 block, right column first
        let first = [(20, 20), (20, 19), (19, 20), (19, 19), (18, 20), (18, 19), (17, 20), (17, 19)];
        let colors = first.iter().map(|&(r, c)| qr.color(r, c)).collect::<Vec<_>>();
        let (d, l) = (Color::Dark, Color::Light);
        assert_eq!(colors, vec![d, l, d, l, l, l, l, d]);
    }

    #[test]
    fn test_apply_mask() {
        let ver = Version::new(1);
        let mut qr = QR::new(ver, ECLevel::M);
        qr.draw_function_patterns();
        qr.draw_codewords(&vec![0; ver.total_codewords()]);
        let unmasked = qr.clone();
        qr.apply_mask(MaskPattern::new(1));
        assert_eq!(qr.mask(), Some(MaskPattern::new(1)));
        // Even rows flip, function modules stay
        assert_eq!(qr.get(20, 20), Module::Data(Color::Dark));
        assert_eq!(qr.get(19, 20), Module::Data(Color::Light));
        assert_eq!(qr.get(0, 0), unmasked.get(0, 0));
        assert_eq!(qr.get(6, 10), unmasked.get(6, 10));
    }
}

use std::fmt::{Display, Error, Formatter};
use std::ops::{Deref, Not};
use std::str::FromStr;

use super::codec::Mode;
use super::error::{QRError, QRResult};
use super::mask::MaskPattern;

// Metadata
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub struct Metadata {
    ver: Option<Version>,
    ecl: Option<ECLevel>,
    mask: Option<MaskPattern>,
}

impl Metadata {
    pub fn new(ver: Option<Version>, ecl: Option<ECLevel>, mask: Option<MaskPattern>) -> Self {
        Self { ver, ecl, mask }
    }

    pub fn version(&self) -> Option<Version> {
        self.ver
    }

    pub fn ec_level(&self) -> Option<ECLevel> {
        self.ecl
    }

    pub fn mask(&self) -> Option<MaskPattern> {
        self.mask
    }
}

impl Display for Metadata {
    fn fmt(&self, f: &mut Formatter) -> Result<(), Error> {
        let ver = self.ver.map_or("None".to_string(), |v| v.to_string());
        let ecl = self.ecl.map_or("None".to_string(), |e| format!("{e:?}"));
        let mask = self.mask.map_or("None".to_string(), |m| m.to_string());
        write!(f, "{{ Version: {ver}, Ec level: {ecl}, Mask: {mask} }}")
    }
}

// Color
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum Color {
    Dark,
    Light,
}

impl Color {
    pub fn select<T>(self, dark: T, light: T) -> T {
        match self {
            Self::Dark => dark,
            Self::Light => light,
        }
    }
}

impl From<bool> for Color {
    fn from(is_dark: bool) -> Self {
        if is_dark {
            Self::Dark
        } else {
            Self::Light
        }
    }
}

impl Not for Color {
    type Output = Self;
    fn not(self) -> Self::Output {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }
}

// Version
//------------------------------------------------------------------------------

/// QR symbol version, 1 to 40.
#[derive(Debug, PartialEq, Eq, Copy, Clone, PartialOrd, Ord, Hash)]
pub struct Version(usize);

impl Version {
    pub const MIN: Self = Self(1);
    pub const MAX: Self = Self(40);

    /// Panics in debug builds if `ver` is outside 1 to 40. Use [`Version::try_from`] for
    /// untrusted input.
    pub const fn new(ver: usize) -> Self {
        debug_assert!(1 <= ver && ver <= 40, "Invalid version");
        Self(ver)
    }

    pub fn iter() -> impl Iterator<Item = Version> {
        (*Self::MIN..=*Self::MAX).map(Self)
    }

    pub const fn width(self) -> usize {
        self.0 * 4 + 17
    }

    pub fn total_codewords(self) -> usize {
        TOTAL_CODEWORDS[self.0]
    }

    pub fn ecc_per_block(self, ecl: ECLevel) -> usize {
        ECC_PER_BLOCK[ecl as usize][self.0]
    }

    pub fn block_count(self, ecl: ECLevel) -> usize {
        BLOCK_COUNT[ecl as usize][self.0]
    }

    pub fn data_codewords(self, ecl: ECLevel) -> usize {
        self.total_codewords() - self.ecc_per_block(ecl) * self.block_count(ecl)
    }

    pub fn data_bit_capacity(self, ecl: ECLevel) -> usize {
        self.data_codewords(ecl) << 3
    }

    /// Returns (block1_size, block1_count, block2_size, block2_count), where group 2 blocks
    /// hold one more data codeword than group 1 blocks. block2_size is 0 when group 2 is
    /// empty.
    pub fn data_codewords_per_block(self, ecl: ECLevel) -> (usize, usize, usize, usize) {
        let blocks = self.block_count(ecl);
        let data = self.data_codewords(ecl);
        let block1_size = data / blocks;
        let block2_count = data % blocks;
        let block1_count = blocks - block2_count;
        let block2_size = if block2_count > 0 { block1_size + 1 } else { 0 };
        (block1_size, block1_count, block2_size, block2_count)
    }

    /// Number of modules available for data and error correction codewords,
    /// including remainder bits.
    pub fn raw_data_modules(self) -> usize {
        let v = self.0;
        let mut res = (16 * v + 128) * v + 64;
        if v >= 2 {
            let align = v / 7 + 2;
            res -= (25 * align - 10) * align - 55;
            if v >= 7 {
                res -= 36;
            }
        }
        res
    }

    pub fn remainder_bits(self) -> usize {
        self.raw_data_modules() - (self.total_codewords() << 3)
    }

    pub fn alignment_pattern(self) -> &'static [usize] {
        ALIGNMENT_PATTERN_POSITIONS[self.0]
    }

    pub const fn mode_bits(self) -> usize {
        4
    }

    pub fn char_cnt_bits(self, mode: Mode) -> usize {
        let group = match self.0 {
            1..=9 => 0,
            10..=26 => 1,
            _ => 2,
        };
        match mode {
            Mode::Numeric => [10, 12, 14][group],
            Mode::Alphanumeric => [9, 11, 13][group],
            Mode::Byte => [8, 16, 16][group],
            Mode::Kanji => [8, 10, 12][group],
        }
    }

    /// 18-bit version information, BCH (18,6) encoded.
    pub fn info(self) -> u32 {
        bch_encode(self.0 as u32, 6, VERSION_INFO_GENERATOR)
    }
}

impl Deref for Version {
    type Target = usize;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl TryFrom<usize> for Version {
    type Error = QRError;
    fn try_from(ver: usize) -> QRResult<Self> {
        match ver {
            1..=40 => Ok(Self(ver)),
            _ => Err(QRError::InvalidVersion),
        }
    }
}

impl Display for Version {
    fn fmt(&self, f: &mut Formatter) -> Result<(), Error> {
        write!(f, "{}", self.0)
    }
}


// Error correction level
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Copy, Clone, PartialOrd, Ord, Hash)]
pub enum ECLevel {
    L = 0,
    M = 1,
    Q = 2,
    H = 3,
}

impl ECLevel {
    /// Two bit indicator used in format information.
    pub fn format_bits(self) -> u32 {
        match self {
            Self::L => 0b01,
            Self::M => 0b00,
            Self::Q => 0b11,
            Self::H => 0b10,
        }
    }
}

impl FromStr for ECLevel {
    type Err = QRError;
    fn from_str(s: &str) -> QRResult<Self> {
        match s.to_ascii_uppercase().as_str() {
            "L" => Ok(Self::L),
            "M" => Ok(Self::M),
            "Q" => Ok(Self::Q),
            "H" => Ok(Self::H),
            _ => Err(QRError::InvalidECLevel),
        }
    }
}

// Format & version info
//------------------------------------------------------------------------------

fn bch_encode(data: u32, data_len: u32, generator: u32) -> u32 {
    let deg = 31 - generator.leading_zeros();
    let mut rem = data << deg;
    for i in (deg..deg + data_len).rev() {
        if (rem >> i) & 1 == 1 {
            rem ^= generator << (i - deg);
        }
    }
    (data << deg) | rem
}

/// 15-bit format information, BCH (15,5) encoded and masked.
pub fn generate_format_info(ecl: ECLevel, mask: MaskPattern) -> u32 {
    let data = (ecl.format_bits() << 3) | *mask as u32;
    bch_encode(data, 5, FORMAT_INFO_GENERATOR) ^ FORMAT_INFO_MASK
}

/// Both placements of format info bit `i`, counted from the least significant bit, in a
/// symbol `w` modules wide. The first copy wraps the top left finder, the second is split
/// between the other two.
pub fn format_info_coords(w: usize, i: usize) -> [(usize, usize); 2] {
    debug_assert!(i < FORMAT_INFO_LEN, "Format info has 15 bits: {i}");
    // Row 8 and column 8 skip the timing module at index 6
    let around = match i {
        0..=5 => (i, 8),
        6 => (7, 8),
        7 => (8, 8),
        8 => (8, 7),
        _ => (8, 14 - i),
    };
    let split = if i < 8 { (8, w - 1 - i) } else { (w - 15 + i, 8) };
    [around, split]
}

/// Both placements of version info bit `i`: a 6x3 block left of the top right finder and
/// its transpose above the bottom left finder.
pub fn version_info_coords(w: usize, i: usize) -> [(usize, usize); 2] {
    debug_assert!(i < VERSION_INFO_LEN, "Version info has 18 bits: {i}");
    let (near, far) = (i / 3, w - 11 + i % 3);
    [(near, far), (far, near)]
}


// Global constants
//------------------------------------------------------------------------------

pub const FORMAT_INFO_LEN: usize = 15;

pub const VERSION_INFO_LEN: usize = 18;

static FORMAT_INFO_GENERATOR: u32 = 0x537;

static FORMAT_INFO_MASK: u32 = 0x5412;

static VERSION_INFO_GENERATOR: u32 = 0x1F25;

// Indexed by version, entry 0 unused
static TOTAL_CODEWORDS: [usize; 41] = [
    0, 26, 44, 70, 100, 134, 172, 196, 242, 292, 346, 404, 466, 532, 581, 655, 733, 815, 901, 991,
    1085, 1156, 1258, 1364, 1474, 1588, 1706, 1828, 1921, 2051, 2185, 2323, 2465, 2611, 2761, 2876,
    3034, 3196, 3362, 3532, 3706,
];

// Indexed by ec level then version, entry 0 unused
static ECC_PER_BLOCK: [[usize; 41]; 4] = [
    [
        0, 7, 10, 15, 20, 26, 18, 20, 24, 30, 18, 20, 24, 26, 30, 22, 24, 28, 30, 28, 28, 28, 28,
        30, 30, 26, 28, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30,
    ],
    [
        0, 10, 16, 26, 18, 24, 16, 18, 22, 22, 26, 30, 22, 22, 24, 24, 28, 28, 26, 26, 26, 26, 28,
        28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28,
    ],
    [
        0, 13, 22, 18, 26, 18, 24, 18, 22, 20, 24, 28, 26, 24, 20, 30, 24, 28, 28, 26, 30, 28, 30,
        30, 30, 30, 28, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30,
    ],
    [
        0, 17, 28, 22, 16, 22, 28, 26, 26, 24, 28, 24, 28, 22, 24, 24, 30, 28, 28, 26, 28, 30, 24,
        30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30,
    ],
];

// Indexed by ec level then version, entry 0 unused
static BLOCK_COUNT: [[usize; 41]; 4] = [
    [
        0, 1, 1, 1, 1, 1, 2, 2, 2, 2, 4, 4, 4, 4, 4, 6, 6, 6, 6, 7, 8, 8, 9, 9, 10, 12, 12, 12, 13,
        14, 15, 16, 17, 18, 19, 19, 20, 21, 22, 24, 25,
    ],
    [
        0, 1, 1, 1, 2, 2, 4, 4, 4, 5, 5, 5, 8, 9, 9, 10, 10, 11, 13, 14, 16, 17, 17, 18, 20, 21, 23,
        25, 26, 28, 29, 31, 33, 35, 37, 38, 40, 43, 45, 47, 49,
    ],
    [
        0, 1, 1, 2, 2, 4, 4, 6, 6, 8, 8, 8, 10, 12, 16, 12, 17, 16, 18, 21, 20, 23, 23, 25, 27, 29,
        34, 34, 35, 38, 40, 43, 45, 48, 51, 53, 56, 59, 62, 65, 68,
    ],
    [
        0, 1, 1, 2, 4, 4, 4, 5, 6, 8, 8, 11, 11, 16, 16, 18, 16, 19, 21, 25, 25, 25, 34, 30, 32, 35,
        37, 40, 42, 45, 48, 51, 54, 57, 60, 63, 66, 70, 74, 77, 81,
    ],
];

// Indexed by version, entry 0 unused
static ALIGNMENT_PATTERN_POSITIONS: [&[usize]; 41] = [
    &[],
    &[],
    &[6, 18],
    &[6, 22],
    &[6, 26],
    &[6, 30],
    &[6, 34],
    &[6, 22, 38],
    &[6, 24, 42],
    &[6, 26, 46],
    &[6, 28, 50],
    &[6, 30, 54],
    &[6, 32, 58],
    &[6, 34, 62],
    &[6, 26, 46, 66],
    &[6, 26, 48, 70],
    &[6, 26, 50, 74],
    &[6, 30, 54, 78],
    &[6, 30, 56, 82],
    &[6, 30, 58, 86],
    &[6, 34, 62, 90],
    &[6, 28, 50, 72, 94],
    &[6, 26, 50, 74, 98],
    &[6, 30, 54, 78, 102],
    &[6, 28, 54, 80, 106],
    &[6, 32, 58, 84, 110],
    &[6, 30, 58, 86, 114],
    &[6, 34, 62, 90, 118],
    &[6, 26, 50, 74, 98, 122],
    &[6, 30, 54, 78, 102, 126],
    &[6, 26, 52, 78, 104, 130],
    &[6, 30, 56, 82, 108, 134],
    &[6, 34, 60, 86, 112, 138],
    &[6, 30, 58, 86, 114, 142],
    &[6, 34, 62, 90, 118, 146],
    &[6, 30, 54, 78, 102, 126, 150],
    &[6, 24, 50, 76, 102, 128, 154],
    &[6, 28, 54, 80, 106, 132, 158],
    &[6, 32, 58, 84, 110, 136, 162],
    &[6, 26, 54, 82, 110, 138, 166],
    &[6, 30, 58, 86, 114, 142, 170],
];

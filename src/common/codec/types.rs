use encoding_rs::SHIFT_JIS;

use crate::common::error::{QRError, QRResult};
use crate::common::metadata::Version;

// Mode
//------------------------------------------------------------------------------

/// Encoding mode of a segment. The discriminant is the 4 bit mode indicator.
#[derive(Debug, PartialEq, Eq, Copy, Clone, Hash)]
pub enum Mode {
    Numeric = 0b0001,
    Alphanumeric = 0b0010,
    Byte = 0b0100,
    Kanji = 0b1000,
}

// Index of a char in this table is its alphanumeric value
const ALPHANUMERIC_CHARSET: &[u8; 45] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ $%*+-./:";

impl Mode {
    /// Value a single byte carries in this mode. Kanji has no single byte values.
    pub fn char_value(self, byte: u8) -> Option<u16> {
        match self {
            Self::Numeric => byte.is_ascii_digit().then(|| u16::from(byte - b'0')),
            Self::Alphanumeric => {
                ALPHANUMERIC_CHARSET.iter().position(|&b| b == byte).map(|i| i as u16)
            }
            Self::Byte => Some(u16::from(byte)),
            Self::Kanji => None,
        }
    }

    pub fn contains(&self, byte: u8) -> bool {
        self.char_value(byte).is_some()
    }

    /// Bytes of segment data packed into one value.
    pub fn chunk_len(&self) -> usize {
        match self {
            Self::Numeric => 3,
            Self::Alphanumeric | Self::Kanji => 2,
            Self::Byte => 1,
        }
    }

    /// Packs up to `chunk_len` bytes into one value. Digits and alphanumeric chars are
    /// read as a number in base 10 or 45, kanji chunks are a Shift-JIS double byte code.
    pub fn encode_chunk(&self, data: &[u8]) -> u16 {
        debug_assert!(
            !data.is_empty() && data.len() <= self.chunk_len(),
            "Bad {self:?} chunk length: {}",
            data.len()
        );
        let radix = match self {
            Self::Numeric => 10,
            Self::Alphanumeric => 45,
            Self::Byte => 256,
            Self::Kanji => return kanji_value(u16::from_be_bytes([data[0], data[1]])),
        };
        data.iter().fold(0, |acc, &b| {
            let value = self.char_value(b);
            debug_assert!(value.is_some(), "{b:#04x} can't be encoded in {self:?} mode");
            acc * radix + value.unwrap_or(0)
        })
    }

    /// Bit length of the payload for `char_cnt` characters, excluding the header.
    pub fn encoded_len(&self, char_cnt: usize) -> usize {
        match *self {
            Self::Numeric => (char_cnt * 10).div_ceil(3),
            Self::Alphanumeric => (char_cnt * 11).div_ceil(2),
            Self::Byte => char_cnt * 8,
            Self::Kanji => char_cnt * 13,
        }
    }
}

/// True if `code` lies in one of the two Shift-JIS ranges QR kanji mode can encode.
pub fn is_kanji_code(code: u16) -> bool {
    matches!(code, 0x8140..=0x9FFC | 0xE040..=0xEBBF)
}

// 13 bit value of a kanji: subtract the range base, then high byte * 0xC0 + low byte
fn kanji_value(code: u16) -> u16 {
    debug_assert!(is_kanji_code(code), "Invalid kanji code: {code:#06x}");
    let offset = code - if code <= 0x9FFC { 0x8140 } else { 0xC140 };
    (offset >> 8) * 0xC0 + (offset & 0xFF)
}

/// Shift-JIS double byte code for `c` if it is encodable in kanji mode.
pub fn kanji_code(c: char) -> Option<u16> {
    let mut buf = [0u8; 4];
    let (sjis, _, unmappable) = SHIFT_JIS.encode(c.encode_utf8(&mut buf));
    match (unmappable, &sjis[..]) {
        (false, &[hi, lo]) => {
            Some(u16::from_be_bytes([hi, lo])).filter(|&code| is_kanji_code(code))
        }
        _ => None,
    }
}


// Segment
//------------------------------------------------------------------------------

/// A run of data encoded in a single mode. For kanji segments `data` holds the Shift-JIS
/// code units, 2 bytes per character.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    mode: Mode,
    data: Vec<u8>,
    char_count: usize,
}

impl Segment {
    pub fn new(mode: Mode, data: &[u8]) -> QRResult<Self> {
        let char_count = match mode {
            Mode::Numeric | Mode::Alphanumeric => {
                if !data.iter().all(|&b| mode.contains(b)) {
                    return Err(QRError::InvalidChar);
                }
                data.len()
            }
            Mode::Byte => data.len(),
            Mode::Kanji => {
                if data.len() % 2 != 0
                    || !data.chunks(2).all(|c| is_kanji_code(u16::from_be_bytes([c[0], c[1]])))
                {
                    return Err(QRError::InvalidChar);
                }
                data.len() / 2
            }
        };
        Ok(Self { mode, data: data.to_vec(), char_count })
    }

    // Caller guarantees the data is valid for the mode
    pub(crate) fn new_unchecked(mode: Mode, data: Vec<u8>, char_count: usize) -> Self {
        Self { mode, data, char_count }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn char_count(&self) -> usize {
        self.char_count
    }

    /// Total bit length including mode indicator and char count indicator.
    pub fn bit_len(&self, ver: Version) -> usize {
        let encoded_bits = self.mode.encoded_len(self.char_count);
        ver.mode_bits() + ver.char_cnt_bits(self.mode) + encoded_bits
    }
}

#[cfg(test)]
mod segment_tests {
    use test_case::test_case;

    use super::{Mode, Segment};
    use crate::common::error::QRError;
    use crate::common::metadata::Version;

    #[test_case(1, "123", 24)]
    #[test_case(1, "45", 21)]
    #[test_case(1, "6", 18)]
    #[test_case(10, "123", 26)]
    #[test_case(27, "6", 22)]
    fn test_bit_len_numeric(ver: usize, data: &str, exp: usize) {
        let seg = Segment::new(Mode::Numeric, data.as_bytes()).unwrap();
        assert_eq!(seg.bit_len(Version::new(ver)), exp);
    }

    #[test_case(1, "AZ", 24)]
    #[test_case(1, "-", 19)]
    #[test_case(10, "AZ", 26)]
    #[test_case(27, "-", 23)]
    fn test_bit_len_alphanumeric(ver: usize, data: &str, exp: usize) {
        let seg = Segment::new(Mode::Alphanumeric, data.as_bytes()).unwrap();
        assert_eq!(seg.bit_len(Version::new(ver)), exp);
    }

    #[test_case(1, "a", 20)]
    #[test_case(10, "ab", 36)]
    #[test_case(27, "abc", 44)]
    fn test_bit_len_byte(ver: usize, data: &str, exp: usize) {
        let seg = Segment::new(Mode::Byte, data.as_bytes()).unwrap();
        assert_eq!(seg.bit_len(Version::new(ver)), exp);
    }

    #[test]
    fn test_kanji_segment() {
        let seg = Segment::new(Mode::Kanji, &[0x93, 0x5F, 0xE4, 0xAA]).unwrap();
        assert_eq!(seg.char_count(), 2);
        assert_eq!(seg.bit_len(Version::new(1)), 4 + 8 + 26);
    }

    #[test_case(Mode::Numeric, b"12a")]
    #[test_case(Mode::Alphanumeric, b"abc")]
    #[test_case(Mode::Kanji, b"\x93")]
    #[test_case(Mode::Kanji, b"AB")]
    fn test_invalid_segment(mode: Mode, data: &[u8]) {
        assert_eq!(Segment::new(mode, data), Err(QRError::InvalidChar));
    }
}

// Global constants
//------------------------------------------------------------------------------

pub static PADDING_CODEWORDS: [u8; 2] = [0b1110_1100, 0b0001_0001];

pub static MODES: [Mode; 4] = [Mode::Numeric, Mode::Alphanumeric, Mode::Byte, Mode::Kanji];

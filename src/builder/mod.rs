mod ec;
mod qr;

pub use ec::error_correction_capacity;
pub use qr::{Module, QR};

use log::debug;

use crate::common::{
    bit_utils::BitStream,
    codec::{encode, encode_segments, encode_with_version, find_version_for_segments, Segment},
    error::QRResult,
    mask::{apply_best_mask, MaskPattern},
    metadata::{ECLevel, Version},
};

#[derive(Debug, Clone, Copy)]
enum Input<'a> {
    Data(&'a [u8]),
    Segments(&'a [Segment]),
}

/// Configures and builds a [`QR`]. Unset options are chosen automatically: the smallest
/// version that fits, EC level M and the mask with the lowest penalty.
#[derive(Debug, Clone)]
pub struct QRBuilder<'a> {
    input: Input<'a>,
    version: Option<Version>,
    ec_level: ECLevel,
    mask: Option<MaskPattern>,
    kanji: bool,
}

impl<'a> QRBuilder<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { input: Input::Data(data), version: None, ec_level: ECLevel::M, mask: None, kanji: false }
    }

    /// Skips analysis and encodes the given segments as they are.
    pub fn from_segments(segments: &'a [Segment]) -> Self {
        Self { input: Input::Segments(segments), ..Self::new(&[]) }
    }

    pub fn data(&mut self, data: &'a [u8]) -> &mut Self {
        self.input = Input::Data(data);
        self
    }

    pub fn version(&mut self, version: Version) -> &mut Self {
        self.version = Some(version);
        self
    }

    pub fn unset_version(&mut self) -> &mut Self {
        self.version = None;
        self
    }

    pub fn ec_level(&mut self, ec_level: ECLevel) -> &mut Self {
        self.ec_level = ec_level;
        self
    }

    pub fn mask(&mut self, mask: MaskPattern) -> &mut Self {
        self.mask = Some(mask);
        self
    }

    pub fn unset_mask(&mut self) -> &mut Self {
        self.mask = None;
        self
    }

    /// Allows runs of Shift-JIS kanji to be encoded in kanji mode.
    pub fn kanji(&mut self, kanji: bool) -> &mut Self {
        self.kanji = kanji;
        self
    }

    pub fn metadata(&self) -> String {
        match self.version {
            Some(v) => format!(
                "{{ Version: {}, Ec level: {:?}, Kanji: {} }}",
                *v, self.ec_level, self.kanji
            ),
            None => {
                format!("{{ Version: None, Ec level: {:?}, Kanji: {} }}", self.ec_level, self.kanji)
            }
        }
    }
}


impl QRBuilder<'_> {
    pub fn build(&self) -> QRResult<QR> {
        debug!("Generating QR {}...", self.metadata());

        debug!("Encoding data...");
        let (encoded_data, version) = self.encode()?;
        let ec_level = self.ec_level;

        debug!("Computing ecc & interleaving blocks...");
        let payload = ec::codewords(encoded_data.data(), version, ec_level);

        let mut qr = QR::new(version, ec_level);

        debug!("Drawing function patterns...");
        qr.draw_function_patterns();

        debug!("Placing {} codewords...", payload.len());
        qr.draw_codewords(&payload);

        let mask = match self.mask {
            Some(m) => {
                debug!("Applying mask {m}...");
                qr.apply_mask(m);
                m
            }
            None => {
                debug!("Finding & applying best mask...");
                apply_best_mask(&mut qr)
            }
        };
        debug!("Selected mask {mask}");

        let total_modules = version.width() * version.width();
        let dark_modules = qr.count_dark_modules();

        debug!("Report: {}", qr.metadata());
        debug!(
            "Data capacity: {} codewords, Error capacity: {} codewords",
            version.data_codewords(ec_level),
            error_correction_capacity(version, ec_level)
        );
        debug!(
            "Dark Cells: {}, Light Cells: {}, Balance: {}%",
            dark_modules,
            total_modules - dark_modules,
            dark_modules * 100 / total_modules
        );

        Ok(qr)
    }

    fn encode(&self) -> QRResult<(BitStream, Version)> {
        let (ecl, kanji) = (self.ec_level, self.kanji);
        match (self.input, self.version) {
            (Input::Data(data), Some(v)) => Ok((encode_with_version(data, v, ecl, kanji)?, v)),
            (Input::Data(data), None) => {
                debug!("Finding best version...");
                encode(data, ecl, kanji)
            }
            (Input::Segments(segs), Some(v)) => Ok((encode_segments(segs, v, ecl)?, v)),
            (Input::Segments(segs), None) => {
                debug!("Finding best version...");
                let v = find_version_for_segments(segs, ecl)?;
                Ok((encode_segments(segs, v, ecl)?, v))
            }
        }
    }
}

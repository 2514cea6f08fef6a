use std::fmt::{Display, Error, Formatter};
use std::ops::Deref;

use log::trace;

use super::error::{QRError, QRResult};
use super::metadata::Color;
use crate::builder::QR;

#[derive(Debug, PartialEq, Eq, Copy, Clone, PartialOrd, Ord, Hash)]
pub struct MaskPattern(u8);

impl MaskPattern {
    pub const fn new(pattern: u8) -> Self {
        debug_assert!(pattern < 8, "Invalid masking pattern");
        Self(pattern)
    }

    pub fn iter() -> impl Iterator<Item = MaskPattern> {
        (0..8).map(Self)
    }
}

impl TryFrom<u8> for MaskPattern {
    type Error = QRError;
    fn try_from(pattern: u8) -> QRResult<Self> {
        match pattern {
            0..=7 => Ok(Self(pattern)),
            _ => Err(QRError::InvalidMaskingPattern),
        }
    }
}

impl Deref for MaskPattern {
    type Target = u8;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Display for MaskPattern {
    fn fmt(&self, f: &mut Formatter) -> Result<(), Error> {
        write!(f, "{}", self.0)
    }
}

impl MaskPattern {
    /// True if the data module at row `r`, column `c` is inverted under this mask.
    pub fn flips(self, r: usize, c: usize) -> bool {
        let (sum, prod) = (r + c, r * c);
        match self.0 {
            0 => sum % 2 == 0,
            1 => r % 2 == 0,
            2 => c % 3 == 0,
            3 => sum % 3 == 0,
            4 => (r / 2 + c / 3) % 2 == 0,
            5 => prod % 2 + prod % 3 == 0,
            6 => (prod % 2 + prod % 3) % 2 == 0,
            _ => (sum % 2 + prod % 3) % 2 == 0,
        }
    }
}

/// Applies the mask with the lowest total penalty to an unmasked symbol.
pub fn apply_best_mask(qr: &mut QR) -> MaskPattern {
    let best = best_mask(&penalty_scores(qr));
    qr.apply_mask(best);
    best
}

/// Mask with the lowest score. Ties go to the lowest mask index.
pub fn best_mask(scores: &[u32; 8]) -> MaskPattern {
    MaskPattern::iter().min_by_key(|m| scores[**m as usize]).unwrap_or(MaskPattern(0))
}

/// Total penalty of each candidate mask applied to an unmasked symbol, indexed by mask.
pub fn penalty_scores(qr: &QR) -> [u32; 8] {
    debug_assert!(qr.mask().is_none(), "Penalties are computed on an unmasked symbol");

    let mut scores = [0; 8];
    for m in MaskPattern::iter() {
        let mut masked = qr.clone();
        masked.apply_mask(m);
        scores[*m as usize] = total_penalty(&masked);
        trace!("Mask {m}: penalty {}", scores[*m as usize]);
    }
    scores
}

/// Sum of the N1 to N4 penalties of a masked symbol.
pub fn total_penalty(qr: &QR) -> u32 {
    let line_pen: u32 =
        rows_and_cols(qr).map(|line| run_penalty(&line) + finder_penalty(&line)).sum();
    line_pen + block_penalty(qr) + balance_penalty(qr)
}

fn rows_and_cols(qr: &QR) -> impl Iterator<Item = Vec<Color>> + '_ {
    let w = qr.width();
    let rows = (0..w).map(move |r| (0..w).map(|c| qr.color(r, c)).collect::<Vec<_>>());
    let cols = (0..w).map(move |c| (0..w).map(|r| qr.color(r, c)).collect::<Vec<_>>());
    rows.chain(cols)
}

// N1: 3 once a same colored run reaches 5 modules, then 1 per extra module
fn run_penalty(line: &[Color]) -> u32 {
    line.chunk_by(|a, b| a == b)
        .filter(|run| run.len() >= 5)
        .map(|run| run.len() as u32 - 2)
        .sum()
}

// N2: 3 per 2x2 block of one color, overlapping blocks included
fn block_penalty(qr: &QR) -> u32 {
    let w = qr.width();
    let same_colored = (0..w - 1)
        .flat_map(|r| (0..w - 1).map(move |c| (r, c)))
        .filter(|&(r, c)| {
            let clr = qr.color(r, c);
            [(r + 1, c), (r, c + 1), (r + 1, c + 1)].iter().all(|&(r, c)| qr.color(r, c) == clr)
        })
        .count();
    3 * same_colored as u32
}

const FINDER_RUN: [bool; 7] = [true, false, true, true, true, false, true];

// N3: 40 per dark 1:1:3:1:1 run with 4 light modules on at least one side. Modules
// past the edge of the symbol count as light.
fn finder_penalty(line: &[Color]) -> u32 {
    let w = line.len() as isize;
    let is_light = |i: isize| i < 0 || i >= w || line[i as usize] == Color::Light;
    let hits = line
        .windows(7)
        .enumerate()
        .filter(|(_, win)| win.iter().map(|&clr| clr == Color::Dark).eq(FINDER_RUN))
        .filter(|&(i, _)| {
            let i = i as isize;
            (i - 4..i).all(is_light) || (i + 7..i + 11).all(is_light)
        })
        .count();
    40 * hits as u32
}

// N4: 10 per full 5% step the dark share is away from 50%
fn balance_penalty(qr: &QR) -> u32 {
    let total = qr.width().pow(2);
    let steps = (qr.count_dark_modules() * 20).abs_diff(total * 10) / total;
    10 * steps as u32
}

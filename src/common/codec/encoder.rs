pub use encode::*;

// Encoder
//------------------------------------------------------------------------------

pub mod encode {
    use log::debug;

    use crate::common::bit_utils::BitStream;
    use crate::common::codec::{kanji_code, Mode, Segment, MODES};
    use crate::common::error::{QRError, QRResult};
    use crate::common::metadata::{ECLevel, Version};

    use super::writer::{pad_remaining_capacity, push_segment, push_terminator};

    /// Segments `data`, picks the smallest version that fits and returns the padded data
    /// codewords along with that version.
    pub fn encode(data: &[u8], ecl: ECLevel, kanji: bool) -> QRResult<(BitStream, Version)> {
        let (ver, segs) = find_optimal_version_and_segments(data, ecl, kanji)?;
        Ok((write_segments(&segs, ver, ecl), ver))
    }

    pub fn encode_with_version(
        data: &[u8],
        ver: Version,
        ecl: ECLevel,
        kanji: bool,
    ) -> QRResult<BitStream> {
        let segs = compute_optimal_segments(data, ver, kanji);
        encode_segments(&segs, ver, ecl)
    }

    /// Writes caller provided segments into a `ver` symbol's data capacity.
    pub fn encode_segments(segs: &[Segment], ver: Version, ecl: ECLevel) -> QRResult<BitStream> {
        let bcap = ver.data_bit_capacity(ecl);
        let sz = total_bit_len(segs, ver);
        if sz > bcap || !segs.iter().all(|s| fits_char_count(s, ver)) {
            return Err(QRError::DataTooLong);
        }
        Ok(write_segments(segs, ver, ecl))
    }

    /// Smallest version at which caller provided segments fit.
    pub fn find_version_for_segments(segs: &[Segment], ecl: ECLevel) -> QRResult<Version> {
        Version::iter()
            .find(|&ver| {
                segs.iter().all(|s| fits_char_count(s, ver))
                    && total_bit_len(segs, ver) <= ver.data_bit_capacity(ecl)
            })
            .ok_or(QRError::DataTooLong)
    }

    fn write_segments(segs: &[Segment], ver: Version, ecl: ECLevel) -> BitStream {
        let bcap = ver.data_bit_capacity(ecl);
        let mut bs = BitStream::new(bcap);
        for seg in segs {
            push_segment(seg, ver, &mut bs);
        }
        debug!("Encoded {} segments into {} of {} bits", segs.len(), bs.len(), bcap);

        push_terminator(&mut bs);
        pad_remaining_capacity(&mut bs);
        bs
    }

    fn total_bit_len(segs: &[Segment], ver: Version) -> usize {
        segs.iter().map(|s| s.bit_len(ver)).sum()
    }

    fn fits_char_count(seg: &Segment, ver: Version) -> bool {
        seg.char_count() < (1 << ver.char_cnt_bits(seg.mode()))
    }

    fn find_optimal_version_and_segments(
        data: &[u8],
        ecl: ECLevel,
        kanji: bool,
    ) -> QRResult<(Version, Vec<Segment>)> {
        let mut segs = vec![];
        let mut sz = 0;
        for ver in Version::iter() {
            let bcap = ver.data_bit_capacity(ecl);
            // Char count bit widths only change at these versions
            if matches!(*ver, 1 | 10 | 27) {
                segs = compute_optimal_segments(data, ver, kanji);
                sz = total_bit_len(&segs, ver);
            }
            if sz <= bcap {
                debug!("Selected version {ver}: {sz} of {bcap} bits");
                return Ok((ver, segs));
            }
        }
        Err(QRError::DataTooLong)
    }

    // Smallest unit the analyzer assigns a mode to: a byte, or a whole char when kanji is
    // enabled
    struct Unit<'a> {
        raw: &'a [u8],
        kanji: Option<u16>,
    }

    impl Unit<'_> {
        fn supports(&self, mode: Mode) -> bool {
            match mode {
                Mode::Numeric | Mode::Alphanumeric => {
                    self.raw.len() == 1 && mode.contains(self.raw[0])
                }
                Mode::Byte => true,
                Mode::Kanji => self.kanji.is_some(),
            }
        }

        // In sixths of a bit
        fn cost(&self, mode: Mode) -> usize {
            match mode {
                Mode::Numeric => 20,
                Mode::Alphanumeric => 33,
                Mode::Byte => 48 * self.raw.len(),
                Mode::Kanji => 78,
            }
        }

        fn char_count(&self, mode: Mode) -> usize {
            match mode {
                Mode::Kanji => 1,
                _ => self.raw.len(),
            }
        }
    }

    fn split_units(data: &[u8], kanji: bool) -> Vec<Unit<'_>> {
        if kanji {
            if let Ok(text) = std::str::from_utf8(data) {
                return text
                    .char_indices()
                    .map(|(i, c)| Unit { raw: &data[i..i + c.len_utf8()], kanji: kanji_code(c) })
                    .collect();
            }
        }
        data.chunks(1).map(|raw| Unit { raw, kanji: None }).collect()
    }

    // Shortest path over (unit, mode) states. cost[m] is the cheapest encoding, in sixths
    // of a bit, of the units so far with the last one in MODES[m]. Switching modes rounds
    // the running cost up to a whole bit and pays for a new header.
    fn compute_optimal_segments(data: &[u8], ver: Version, kanji: bool) -> Vec<Segment> {
        let units = split_units(data, kanji);
        if units.is_empty() {
            return vec![];
        }

        let header = |m: Mode| (4 + ver.char_cnt_bits(m)) * 6;
        let mut cost = MODES.map(header);
        // back[i][m] is the mode index of unit i - 1 on the cheapest path to (i, m)
        let mut back = Vec::with_capacity(units.len());
        for unit in &units {
            let mut step = [(usize::MAX, 0); 4];
            for (to, &to_mode) in MODES.iter().enumerate() {
                if !unit.supports(to_mode) {
                    continue;
                }
                step[to] = (0..4)
                    .filter(|&from| cost[from] != usize::MAX)
                    .map(|from| {
                        let carried = match from == to {
                            true => cost[from],
                            false => cost[from].div_ceil(6) * 6 + header(to_mode),
                        };
                        (carried + unit.cost(to_mode), from)
                    })
                    .min()
                    .unwrap_or((usize::MAX, 0));
            }
            cost = step.map(|(c, _)| c);
            back.push(step.map(|(_, from)| from));
        }

        let char_modes = trace_modes(&back, &cost);
        build_segments(ver, &char_modes, &units)
    }

    // Walks the back pointers from the cheapest final state. Ties go to the lower mode index.
    fn trace_modes(back: &[[usize; 4]], cost: &[usize; 4]) -> Vec<Mode> {
        let mut m = (0..4).min_by_key(|&m| cost[m]).unwrap_or(0);
        let mut modes = Vec::with_capacity(back.len());
        for step in back.iter().rev() {
            modes.push(MODES[m]);
            m = step[m];
        }
        modes.reverse();
        modes
    }

    // Group consecutive units of the same mode, splitting runs whose char count overflows
    // the count indicator
    fn build_segments(ver: Version, char_modes: &[Mode], units: &[Unit]) -> Vec<Segment> {
        let mut segs = vec![];
        let mut open: Option<(Mode, Vec<u8>, usize)> = None;
        for (unit, &mode) in units.iter().zip(char_modes) {
            let cnt = unit.char_count(mode);
            let limit = (1 << ver.char_cnt_bits(mode)) - 1;
            let (_, data, chars) = match open.take() {
                Some((m, data, chars)) if m == mode && chars + cnt <= limit => {
                    open.insert((m, data, chars))
                }
                closed => {
                    let closed = closed.map(|(m, data, chars)| Segment::new_unchecked(m, data, chars));
                    segs.extend(closed);
                    open.insert((mode, vec![], 0))
                }
            };
            match (mode, unit.kanji) {
                (Mode::Kanji, Some(code)) => data.extend(code.to_be_bytes()),
                _ => data.extend_from_slice(unit.raw),
            }
            *chars += cnt;
        }
        segs.extend(open.map(|(m, data, chars)| Segment::new_unchecked(m, data, chars)));
        segs
    }

}

// Writer for encoded data
//------------------------------------------------------------------------------

pub(super) mod writer {
    use crate::common::bit_utils::BitStream;
    use crate::common::codec::{Mode, Segment, PADDING_CODEWORDS};
    use crate::common::metadata::Version;

    pub fn push_segment(seg: &Segment, ver: Version, out: &mut BitStream) {
        push_header(seg, ver, out);
        push_data(seg.mode(), seg.data(), out);
    }

    fn push_header(seg: &Segment, ver: Version, out: &mut BitStream) {
        out.push_bits(seg.mode() as u8, ver.mode_bits());
        let char_cnt = seg.char_count();
        let len_bits = ver.char_cnt_bits(seg.mode());
        debug_assert!(
            char_cnt < (1 << len_bits),
            "Char count exceeds bit length: Char count {char_cnt}, Char count bits {len_bits}"
        );
        out.push_bits(char_cnt as u16, len_bits);
    }

    // A short trailing chunk takes the bit width of its own char count
    fn push_data(mode: Mode, data: &[u8], out: &mut BitStream) {
        for chunk in data.chunks(mode.chunk_len()) {
            let chars = if mode == Mode::Kanji { 1 } else { chunk.len() };
            out.push_bits(mode.encode_chunk(chunk), mode.encoded_len(chars));
        }
    }

    /// Up to 4 zero bits, fewer when the capacity runs out.
    pub fn push_terminator(out: &mut BitStream) {
        out.push_bits(0u8, out.remaining().min(4));
    }

    pub fn pad_remaining_capacity(out: &mut BitStream) {
        push_padding_bits(out);
        push_padding_codewords(out);
    }

    // Zero bits up to the next codeword boundary
    fn push_padding_bits(out: &mut BitStream) {
        out.push_bits(0u8, (8 - out.len() % 8) % 8);
    }

    // Alternating 0xEC and 0x11 until the capacity is full
    fn push_padding_codewords(out: &mut BitStream) {
        debug_assert_eq!(out.len() % 8, 0, "Pad codewords must start on a codeword boundary");
        for &pad in PADDING_CODEWORDS.iter().cycle().take(out.remaining() / 8) {
            out.push_bits(pad, 8);
        }
    }

}

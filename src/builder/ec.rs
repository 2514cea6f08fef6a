use crate::common::ec::{generator_polynomial, G};
use crate::common::metadata::{ECLevel, Version};

// Error correction
//------------------------------------------------------------------------------

/// Final codeword sequence of a symbol: data codewords of all blocks interleaved, followed
/// by the error correction codewords of all blocks interleaved.
pub fn codewords(data: &[u8], version: Version, ec_level: ECLevel) -> Vec<u8> {
    let blocks = split_blocks(data, version, ec_level);
    let ecc_len = version.ecc_per_block(ec_level);
    let ecc_blocks = blocks.iter().map(|b| rs_remainder(b, ecc_len)).collect::<Vec<_>>();

    let mut res = interleave(&blocks);
    res.extend(interleave(&ecc_blocks));
    res
}

/// Short blocks come first, long blocks hold one extra data codeword.
pub fn split_blocks(data: &[u8], version: Version, ec_level: ECLevel) -> Vec<&[u8]> {
    let (short_len, short_cnt, _, long_cnt) = version.data_codewords_per_block(ec_level);
    debug_assert_eq!(
        data.len(),
        short_len * short_cnt + (short_len + 1) * long_cnt,
        "Data doesn't fill the blocks of version {version}"
    );

    let (short, long) = data.split_at(short_len * short_cnt);
    short.chunks(short_len).chain(long.chunks(short_len + 1)).collect()
}

// Remainder of block(x)·x^n divided by the degree n generator, shifted through an n
// codeword register one data codeword at a time
fn rs_remainder(block: &[u8], n: usize) -> Vec<u8> {
    let gen = generator_polynomial(n);
    let mut reg = vec![G(0); n];
    for &cw in block {
        let factor = G(cw) + reg[0];
        reg.rotate_left(1);
        reg[n - 1] = G(0);
        // Leading generator coefficient is 1 and drops out with the shift
        for (r, &g) in reg.iter_mut().zip(&gen[1..]) {
            *r += g * factor;
        }
    }
    reg.into_iter().map(u8::from).collect()
}

/// Takes the i-th codeword of each block in turn. Blocks that run out are skipped.
pub fn interleave<T: Copy, B: AsRef<[T]>>(blocks: &[B]) -> Vec<T> {
    let longest = blocks.iter().map(|b| b.as_ref().len()).max().unwrap_or(0);
    (0..longest)
        .flat_map(|i| blocks.iter().filter_map(move |b| b.as_ref().get(i).copied()))
        .collect()
}

/// Number of codeword errors the symbol can correct, after the misdecode protection
/// codewords reserved by the smallest versions.
pub fn error_correction_capacity(version: Version, ec_level: ECLevel) -> usize {
    let ecc_total = version.block_count(ec_level) * version.ecc_per_block(ec_level);
    let reserved = match (*version, ec_level) {
        (1, ECLevel::L) => 3,
        (1, ECLevel::M) | (2, ECLevel::L) => 2,
        (1, _) | (3, ECLevel::L) => 1,
        _ => 0,
    };
    (ecc_total - reserved) / 2
}

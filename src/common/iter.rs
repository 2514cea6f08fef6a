use super::metadata::Version;

// Module placement order
//------------------------------------------------------------------------------

const TIMING_COL: usize = 6;

/// Every module outside the vertical timing column, in the order codeword bits are laid
/// down: two column strips from the right edge, right module first, the first strip
/// running upward and each next one reversing direction. Callers skip taken modules.
pub fn placement_order(version: Version) -> impl Iterator<Item = (usize, usize)> {
    let w = version.width();
    (0..(w - 1) / 2).flat_map(move |strip| {
        let right = w - 1 - 2 * strip;
        // Strips left of the timing column shift one module left
        let right = if right <= TIMING_COL { right - 1 } else { right };
        let upward = strip % 2 == 0;
        (0..w).flat_map(move |i| {
            let r = if upward { w - 1 - i } else { i };
            [(r, right), (r, right - 1)]
        })
    })
}

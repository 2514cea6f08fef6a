use num_traits::PrimInt;

// Bit stream
//------------------------------------------------------------------------------

/// Write-only MSB-first bit buffer that fills up to a fixed bit capacity. Every byte is
/// allocated on its first bit, so the last byte may be partially filled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitStream {
    bytes: Vec<u8>,
    len: usize,
    capacity: usize,
}

impl BitStream {
    pub fn new(capacity: usize) -> Self {
        Self { bytes: Vec::with_capacity(capacity.div_ceil(8)), len: 0, capacity }
    }

    /// Bits written so far.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn remaining(&self) -> usize {
        self.capacity - self.len
    }

    pub fn data(&self) -> &[u8] {
        &self.bytes
    }

    pub fn push(&mut self, bit: bool) {
        debug_assert!(self.len < self.capacity, "Bit stream is full at {} bits", self.capacity);

        let offset = self.len % 8;
        if offset == 0 {
            self.bytes.push(0);
        }
        if let (true, Some(last)) = (bit, self.bytes.last_mut()) {
            *last |= 0x80 >> offset;
        }
        self.len += 1;
    }

    /// Appends the low `size` bits of `value`, most significant first.
    pub fn push_bits<T: PrimInt>(&mut self, value: T, size: usize) {
        let width = T::zero().count_zeros() as usize;
        debug_assert!(
            size <= width && width - value.leading_zeros() as usize <= size,
            "Value doesn't fit in {size} bits"
        );
        debug_assert!(size <= self.remaining(), "{size} bits overflow the bit stream");

        for i in (0..size).rev() {
            self.push((value >> i) & T::one() == T::one());
        }
    }
}

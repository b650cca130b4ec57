use crate::error::{Error, Result};

/// Bit-level reader for LZ script streams
///
/// Streams are packed MSB-first: the first bit of a field is the highest
/// bit of the first byte it touches, and fields run across byte boundaries
/// without alignment.
pub struct BitReader<'a> {
    data: &'a [u8],
    /// Absolute cursor position in bits from the start of `data`
    bit_pos: usize,
}

impl<'a> BitReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, bit_pos: 0 }
    }

    /// Create a reader positioned at `offset` bytes into `data`
    pub fn at_offset(data: &'a [u8], offset: usize) -> Result<Self> {
        if offset > data.len() {
            return Err(Error::InvalidOffset { offset, len: 0, size: data.len() });
        }
        Ok(Self { data, bit_pos: offset * 8 })
    }

    /// Read `n` bits (0-32) in MSB-first order
    pub fn read_bits(&mut self, n: u8) -> Result<u32> {
        debug_assert!(n <= 32, "Cannot read more than 32 bits at once");

        if n == 0 {
            return Ok(0);
        }

        let remaining = self.bits_remaining();
        if n as usize > remaining {
            return Err(Error::OutOfData { requested: n, remaining });
        }

        let mut value = 0u64;
        let mut needed = n as usize;

        while needed > 0 {
            let byte = self.data[self.bit_pos / 8] as u64;
            let available = 8 - self.bit_pos % 8;
            let take = available.min(needed);

            let chunk = (byte >> (available - take)) & ((1u64 << take) - 1);
            value = (value << take) | chunk;

            self.bit_pos += take;
            needed -= take;
        }

        Ok(value as u32)
    }

    /// Read a single bit
    #[inline]
    pub fn read_bit(&mut self) -> Result<bool> {
        Ok(self.read_bits(1)? != 0)
    }

    /// Skip to the next byte boundary (no-op when already aligned)
    pub fn align_to_byte(&mut self) {
        self.bit_pos = (self.bit_pos + 7) / 8 * 8;
    }

    /// Current position in bytes, rounded up when mid-byte
    pub fn byte_position(&self) -> usize {
        (self.bit_pos + 7) / 8
    }

    /// Current position in bits
    pub fn bit_position(&self) -> usize {
        self.bit_pos
    }

    pub fn bits_remaining(&self) -> usize {
        (self.data.len() * 8).saturating_sub(self.bit_pos)
    }

    pub fn is_aligned(&self) -> bool {
        self.bit_pos % 8 == 0
    }
}

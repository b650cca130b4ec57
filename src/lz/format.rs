//! Bitstream constants and the stream header.
//!
//! Stream layout, packed MSB-first:
//! - `source_width`: 4 bits
//! - `length_width`: 4 bits
//! - repeated tokens:
//!   - `1` + 8-bit literal byte, or
//!   - `0` + distance (`source_width` bits) + length - 3 (`length_width` bits)
//! - terminator: `0` + distance 0 + length field (written as 0)
//! - zero padding to the next byte boundary

use crate::bits::{BitReader, BitWriter};
use crate::error::{Error, Result};

/// Opcode bit introducing a back-reference (or the terminator)
pub const OPCODE_COPY: u32 = 0;

/// Opcode bit introducing a literal byte
pub const OPCODE_LITERAL: u32 = 1;

/// Width of each header field in bits
pub const HEADER_FIELD_BITS: u8 = 4;

/// Largest operand width a header field can declare
pub const MAX_OPERAND_WIDTH: u8 = 15;

/// Shortest match a back-reference can express (length field bias)
pub const MIN_MATCH: usize = 3;

/// Distance value reserved for the end-of-stream marker
pub const TERMINATOR_DISTANCE: u32 = 0;

/// Operand widths declared at the start of every stream
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Header {
    /// Bits used for each back-reference distance
    pub source_width: u8,
    /// Bits used for each back-reference length (biased by [`MIN_MATCH`])
    pub length_width: u8,
}

impl Header {
    pub fn new(source_width: u8, length_width: u8) -> Result<Self> {
        for width in [source_width, length_width] {
            if width > MAX_OPERAND_WIDTH {
                return Err(Error::InvalidWidth(width));
            }
        }
        Ok(Self { source_width, length_width })
    }

    pub fn read(bits: &mut BitReader<'_>) -> Result<Self> {
        let source_width = bits.read_bits(HEADER_FIELD_BITS)? as u8;
        let length_width = bits.read_bits(HEADER_FIELD_BITS)? as u8;
        Ok(Self { source_width, length_width })
    }

    pub fn write(&self, bits: &mut BitWriter) {
        bits.write_bits(self.source_width as u32, HEADER_FIELD_BITS);
        bits.write_bits(self.length_width as u32, HEADER_FIELD_BITS);
    }

    /// Farthest distance a back-reference can reach
    pub fn max_distance(&self) -> usize {
        (1usize << self.source_width) - 1
    }

    /// Longest match a single back-reference can cover
    pub fn max_match(&self) -> usize {
        (1usize << self.length_width) - 1 + MIN_MATCH
    }

    /// Size of a back-reference (or terminator) token in bits
    pub fn copy_bits(&self) -> usize {
        1 + self.source_width as usize + self.length_width as usize
    }

    /// Size of a literal token in bits
    pub const fn literal_bits() -> usize {
        1 + 8
    }

    /// Size of the header itself in bits
    pub const fn header_bits() -> usize {
        2 * HEADER_FIELD_BITS as usize
    }
}

use super::format::{Header, MIN_MATCH, OPCODE_COPY, OPCODE_LITERAL, TERMINATOR_DISTANCE};
use crate::bits::{BitReader, BitWriter};
use crate::error::Result;

/// Represents a single token in the LZ script stream
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Token {
    /// A literal byte
    Literal(u8),
    /// A back-reference: copy `length` bytes from `distance` bytes back.
    /// `length` is the real match length, never less than 3.
    Copy { distance: u16, length: u16 },
    /// End of stream marker (a back-reference with distance 0)
    End,
}

impl Token {
    /// Returns the uncompressed size this token represents
    pub fn uncompressed_size(&self) -> usize {
        match self {
            Token::Literal(_) => 1,
            Token::Copy { length, .. } => *length as usize,
            Token::End => 0,
        }
    }

    /// Size of this token on the wire under `header`
    pub fn bit_size(&self, header: &Header) -> usize {
        match self {
            Token::Literal(_) => Header::literal_bits(),
            Token::Copy { .. } | Token::End => header.copy_bits(),
        }
    }

    /// Read the next token. The length field of a distance-0 token is
    /// consumed but not checked.
    pub fn read(bits: &mut BitReader<'_>, header: &Header) -> Result<Self> {
        if bits.read_bit()? as u32 == OPCODE_LITERAL {
            return Ok(Token::Literal(bits.read_bits(8)? as u8));
        }

        let distance = bits.read_bits(header.source_width)?;
        let length = bits.read_bits(header.length_width)? as usize + MIN_MATCH;

        if distance == TERMINATOR_DISTANCE {
            return Ok(Token::End);
        }

        Ok(Token::Copy { distance: distance as u16, length: length as u16 })
    }

    pub fn write(&self, bits: &mut BitWriter, header: &Header) {
        match *self {
            Token::Literal(byte) => {
                bits.write_bits(OPCODE_LITERAL, 1);
                bits.write_bits(byte as u32, 8);
            }
            Token::Copy { distance, length } => {
                debug_assert!(distance != 0);
                debug_assert!(length as usize >= MIN_MATCH);
                bits.write_bits(OPCODE_COPY, 1);
                bits.write_bits(distance as u32, header.source_width);
                bits.write_bits(length as u32 - MIN_MATCH as u32, header.length_width);
            }
            Token::End => {
                bits.write_bits(OPCODE_COPY, 1);
                bits.write_bits(TERMINATOR_DISTANCE, header.source_width);
                bits.write_bits(0, header.length_width);
            }
        }
    }
}

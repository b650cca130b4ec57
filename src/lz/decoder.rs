use super::format::Header;
use super::tokens::Token;
use crate::bits::BitReader;
use crate::error::{Error, Result};

/// Result of decompressing one script stream
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Decompressed {
    /// Decoded script bytes
    pub data: Vec<u8>,
    /// Bytes the compressed stream occupied, padding included
    pub compressed_size: usize,
    /// Operand widths the stream declared
    pub header: Header,
}

/// Parses an LZ script stream token by token
pub struct LzDecoder<'a> {
    bits: BitReader<'a>,
    header: Header,
    start: usize,
    /// Whether we've seen the terminator
    finished: bool,
    /// Reject streams that decode to more than this many bytes
    max_output: Option<usize>,
}

impl<'a> LzDecoder<'a> {
    /// Position a decoder at `start` and read the stream header
    pub fn new(data: &'a [u8], start: usize) -> Result<Self> {
        let mut bits = BitReader::at_offset(data, start)?;
        let header = Header::read(&mut bits).map_err(|e| malformed(&bits, e))?;
        Ok(Self { bits, header, start, finished: false, max_output: None })
    }

    /// Fail with `CapacityExceeded` instead of decoding past `limit` bytes
    pub fn with_max_output(mut self, limit: usize) -> Self {
        self.max_output = Some(limit);
        self
    }

    pub fn header(&self) -> Header {
        self.header
    }

    /// Parse the next token, returning None once the terminator was read
    pub fn next_token(&mut self) -> Result<Option<Token>> {
        if self.finished {
            return Ok(None);
        }

        let token = Token::read(&mut self.bits, &self.header).map_err(|e| malformed(&self.bits, e))?;
        if token == Token::End {
            self.finished = true;
            self.bits.align_to_byte();
        }

        Ok(Some(token))
    }

    /// Bytes consumed from the start offset, rounded up to a whole byte
    pub fn compressed_size(&self) -> usize {
        self.bits.byte_position() - self.start
    }

    /// Run the token loop to completion
    pub fn decode(mut self) -> Result<Decompressed> {
        let mut out = Vec::new();

        while let Some(token) = self.next_token()? {
            if let Some(limit) = self.max_output {
                let required = out.len() + token.uncompressed_size();
                if required > limit {
                    return Err(Error::CapacityExceeded {
                        region: "decoded script",
                        unit: "bytes",
                        required,
                        capacity: limit,
                    });
                }
            }

            match token {
                Token::Literal(byte) => out.push(byte),
                Token::Copy { distance, length } => {
                    let distance = distance as usize;
                    if distance > out.len() {
                        return Err(Error::MalformedStream {
                            offset: self.bits.byte_position(),
                            reason: format!(
                                "back-reference distance {} exceeds {} decoded bytes",
                                distance,
                                out.len()
                            ),
                        });
                    }
                    // Byte at a time: the source may overlap what this copy appends
                    for _ in 0..length {
                        out.push(out[out.len() - distance]);
                    }
                }
                Token::End => {}
            }
        }

        let compressed_size = self.compressed_size();
        tracing::debug!(
            start = self.start,
            compressed_size,
            decompressed_size = out.len(),
            source_width = self.header.source_width,
            length_width = self.header.length_width,
            "decoded script stream"
        );

        Ok(Decompressed { data: out, compressed_size, header: self.header })
    }
}

/// Running out of bits inside a stream means it is truncated or corrupt
fn malformed(bits: &BitReader<'_>, err: Error) -> Error {
    match err {
        Error::OutOfData { requested, remaining } => Error::MalformedStream {
            offset: bits.byte_position(),
            reason: format!(
                "stream ended before terminator (needed {} bits, {} left)",
                requested, remaining
            ),
        },
        other => other,
    }
}

/// Decompress the stream that begins `start` bytes into `data`.
///
/// `start == data.len()` is a valid position with nothing to read and fails
/// with `MalformedStream`; `start > data.len()` fails with `InvalidOffset`.
pub fn decompress(data: &[u8], start: usize) -> Result<Decompressed> {
    LzDecoder::new(data, start)?.decode()
}

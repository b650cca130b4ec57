use super::format::{Header, MIN_MATCH};
use super::tokens::Token;
use crate::bits::BitWriter;
use crate::error::{Error, Result};
use crate::EncodeConfig;

/// Result of compressing one script
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Compressed {
    /// Complete stream, header through padding
    pub data: Vec<u8>,
    /// Operand widths that produced the smallest stream
    pub header: Header,
    /// Length of the input that was compressed
    pub uncompressed_size: usize,
}

impl Compressed {
    pub fn compressed_size(&self) -> usize {
        self.data.len()
    }

    /// Compressed size relative to the input (0.0 for empty input)
    pub fn ratio(&self) -> f64 {
        if self.uncompressed_size == 0 {
            return 0.0;
        }
        self.data.len() as f64 / self.uncompressed_size as f64
    }
}

/// Greedy LZ compressor that sweeps the configured header widths
pub struct Encoder {
    config: EncodeConfig,
}

impl Encoder {
    pub fn new(config: EncodeConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EncodeConfig {
        &self.config
    }

    /// Compress `data`, keeping the smallest stream over every header in the
    /// sweep. Ties keep the header tried first.
    pub fn compress(&self, data: &[u8]) -> Result<Compressed> {
        self.config.validate()?;

        let mut best: Option<(Header, Vec<u8>)> = None;

        for source_width in self.config.source_widths.clone() {
            for length_width in self.config.length_widths.clone() {
                let header = Header::new(source_width, length_width)?;
                let tokens = tokenize(data, &header);
                let stream = encode_tokens(&header, &tokens);

                tracing::debug!(
                    source_width,
                    length_width,
                    tokens = tokens.len(),
                    size = stream.len(),
                    "tried header"
                );

                let better = match &best {
                    Some((_, current)) => stream.len() < current.len(),
                    None => true,
                };
                if better {
                    best = Some((header, stream));
                }
            }
        }

        let (header, stream) =
            best.ok_or_else(|| Error::InvalidConfig("empty width sweep".to_string()))?;

        if let Some(max_size) = self.config.max_size {
            if stream.len() > max_size {
                return Err(Error::CapacityExceeded {
                    region: "compressed script",
                    unit: "bytes",
                    required: stream.len(),
                    capacity: max_size,
                });
            }
        }

        Ok(Compressed { data: stream, header, uncompressed_size: data.len() })
    }
}

impl Default for Encoder {
    fn default() -> Self {
        Self::new(EncodeConfig::default())
    }
}

/// Compress `data` with the default width sweep
pub fn compress(data: &[u8]) -> Result<Compressed> {
    Encoder::default().compress(data)
}

/// Greedy parse of `data` into tokens under `header`, terminator included.
///
/// Always takes the longest match at the current position; the nearest
/// distance wins among equally long matches.
pub fn tokenize(data: &[u8], header: &Header) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut pos = 0;

    while pos < data.len() {
        let (distance, length) = find_longest_match(data, pos, header);

        if length >= MIN_MATCH {
            tokens.push(Token::Copy { distance: distance as u16, length: length as u16 });
            pos += length;
        } else {
            tokens.push(Token::Literal(data[pos]));
            pos += 1;
        }
    }

    tokens.push(Token::End);
    tokens
}

/// Serialize header and tokens into a padded stream
pub fn encode_tokens(header: &Header, tokens: &[Token]) -> Vec<u8> {
    let bits: usize = Header::header_bits() + tokens.iter().map(|t| t.bit_size(header)).sum::<usize>();

    let mut writer = BitWriter::with_capacity((bits + 7) / 8);
    header.write(&mut writer);
    for token in tokens {
        token.write(&mut writer, header);
    }
    writer.finish()
}

/// Longest match for `data[pos..]` among the distances `header` can express.
/// Returns `(distance, length)`, `(0, 0)` when nothing matches.
///
/// Brute-force scan of the whole window; hash chains would be the next step
/// if inputs grow well past script sizes.
fn find_longest_match(data: &[u8], pos: usize, header: &Header) -> (usize, usize) {
    let search_limit = pos.min(header.max_distance());
    let max_len = header.max_match().min(data.len() - pos);

    let mut best_distance = 0;
    let mut best_length = 0;

    for distance in 1..=search_limit {
        // The source may run into the bytes being matched (overlapping copy)
        let length = (0..max_len).take_while(|&j| data[pos - distance + j] == data[pos + j]).count();

        if length > best_length {
            best_distance = distance;
            best_length = length;
            if best_length == max_len {
                break;
            }
        }
    }

    (best_distance, best_length)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lz::decompress;

    #[test]
    fn test_tokenize_run() {
        let header = Header::new(10, 3).unwrap();
        let tokens = tokenize(&[0x41; 5], &header);
        assert_eq!(
            tokens,
            vec![Token::Literal(0x41), Token::Copy { distance: 1, length: 4 }, Token::End]
        );
    }

    #[test]
    fn test_tokenize_short_repeat_stays_literal() {
        let header = Header::new(10, 3).unwrap();
        let tokens = tokenize(b"abXab", &header);
        assert!(tokens.iter().all(|t| !matches!(t, Token::Copy { .. })));
        assert_eq!(tokens.len(), 6);
    }

    #[test]
    fn test_tokenize_prefers_nearest_distance() {
        let header = Header::new(10, 3).unwrap();
        // "abc" occurs at distance 8 and 4 from the final copy
        let tokens = tokenize(b"abcXabcYabc", &header);
        assert_eq!(tokens[tokens.len() - 2], Token::Copy { distance: 4, length: 3 });
    }

    #[test]
    fn test_tokenize_caps_match_length() {
        let header = Header::new(10, 3).unwrap();
        let tokens = tokenize(&[7u8; 1 + 10 + 10 + 2], &header);
        assert_eq!(
            tokens,
            vec![
                Token::Literal(7),
                Token::Copy { distance: 1, length: 10 },
                Token::Copy { distance: 1, length: 10 },
                Token::Literal(7),
                Token::Literal(7),
                Token::End,
            ]
        );
    }

    #[test]
    fn test_tokenize_respects_window() {
        let header = Header::new(2, 3).unwrap();
        // Repeat sits 4 bytes back but the window only reaches 3
        let tokens = tokenize(b"abcdabcd", &header);
        assert_eq!(tokens.len(), 9);
        assert!(tokens[..8].iter().all(|t| matches!(t, Token::Literal(_))));
    }

    #[test]
    fn test_tokenize_is_greedy() {
        let header = Header::new(4, 4).unwrap();
        // Greedy takes "abc" at distance 4 then must emit literals
        let tokens = tokenize(b"abcdabcXbcdabcd", &header);
        assert!(tokens.contains(&Token::Copy { distance: 4, length: 3 }));
    }

    #[test]
    fn test_compress_empty() {
        let result = compress(&[]).unwrap();
        // 8 header bits + 14 terminator bits
        assert_eq!(result.data.len(), 3);
        assert_eq!(result.header, Header::new(10, 3).unwrap());
        assert_eq!(result.ratio(), 0.0);
        assert!(decompress(&result.data, 0).unwrap().data.is_empty());
    }

    #[test]
    fn test_compress_round_trip() {
        let text = b"The quick brown fox jumps over the lazy dog. The quick brown fox!\0".repeat(8);
        let result = compress(&text).unwrap();
        assert!(result.compressed_size() < text.len());
        assert_eq!(result.uncompressed_size, text.len());

        let decoded = decompress(&result.data, 0).unwrap();
        assert_eq!(decoded.data, text);
        assert_eq!(decoded.compressed_size, result.data.len());
        assert_eq!(decoded.header, result.header);
    }

    #[test]
    fn test_compress_is_deterministic() {
        let text: Vec<u8> = (0..2000u32).map(|i| ((i * 7) % 13) as u8).collect();
        assert_eq!(compress(&text).unwrap(), compress(&text).unwrap());
    }

    #[test]
    fn test_sweep_picks_wider_window_when_it_pays() {
        // A 34-byte block repeated at distance 1500: only reachable with 11-bit
        // distances, and long enough to favour the widest length field.
        let block: Vec<u8> = (0..34u8).map(|i| i.wrapping_mul(37).wrapping_add(11)).collect();
        let mut data = block.clone();
        data.extend((0..1500 - 34).map(|i: usize| ((i * 131 + 17) % 251) as u8));
        for _ in 0..20 {
            data.extend_from_slice(&block);
        }

        let result = compress(&data).unwrap();
        assert_eq!(result.header.source_width, 11);

        let narrow = EncodeConfig { source_widths: 10..=10, ..Default::default() };
        let narrow = Encoder::new(narrow).compress(&data).unwrap();
        assert!(result.data.len() < narrow.data.len());

        assert_eq!(decompress(&result.data, 0).unwrap().data, data);
    }

    #[test]
    fn test_tie_keeps_first_header() {
        // All literals: length width changes only the terminator size, and
        // the smallest widths come first in the sweep
        let data = [1u8, 2, 3, 4];
        let result = compress(&data).unwrap();
        assert_eq!(result.header, Header::new(10, 3).unwrap());
    }

    #[test]
    fn test_capacity_exceeded() {
        let data: Vec<u8> = (0..=255u8).collect();
        let config = EncodeConfig { max_size: Some(100), ..Default::default() };

        let err = Encoder::new(config).compress(&data).unwrap_err();
        let expected = compress(&data).unwrap().data.len() - 100;
        assert_eq!(err.overflow(), Some(expected));
        assert!(err.to_string().contains(&format!("remove {} bytes", expected)));
    }

    #[test]
    fn test_invalid_sweep() {
        let config = EncodeConfig { length_widths: 3..=16, ..Default::default() };
        assert!(matches!(Encoder::new(config).compress(b"x"), Err(Error::InvalidWidth(16))));

        #[allow(clippy::reversed_empty_ranges)]
        let config = EncodeConfig { source_widths: 11..=10, ..Default::default() };
        assert!(matches!(Encoder::new(config).compress(b"x"), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_full_sweep_never_worse() {
        let text = b"ABABABABABAB-CDCDCDCDCD-ABABABAB".repeat(3);
        let default = compress(&text).unwrap();
        let full = Encoder::new(EncodeConfig::full_sweep()).compress(&text).unwrap();
        assert!(full.data.len() <= default.data.len());
        assert_eq!(decompress(&full.data, 0).unwrap().data, text);
    }
}

pub mod bits;
pub mod error;
pub mod lz;
pub mod pointer;
pub mod rom;
pub mod script;
pub mod table;

pub use error::{Error, Result};
pub use lz::{compress, decompress, Compressed, Decompressed, Encoder, Header, LzDecoder, Token};
pub use pointer::PointerTable;
pub use rom::RomImage;
pub use script::Script;
pub use table::CharTable;

use std::ops::RangeInclusive;

use lz::format::MAX_OPERAND_WIDTH;

/// Configuration for compression
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncodeConfig {
    /// Distance widths to try (outer loop of the sweep)
    pub source_widths: RangeInclusive<u8>,
    /// Length widths to try (inner loop of the sweep)
    pub length_widths: RangeInclusive<u8>,
    /// Reject output larger than this many bytes
    pub max_size: Option<usize>,
}

impl EncodeConfig {
    /// Every width pair the header can express (slow on large scripts)
    pub fn full_sweep() -> Self {
        Self {
            source_widths: 0..=MAX_OPERAND_WIDTH,
            length_widths: 0..=MAX_OPERAND_WIDTH,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        for (name, range) in [("source", &self.source_widths), ("length", &self.length_widths)] {
            if range.is_empty() {
                return Err(Error::InvalidConfig(format!("{} width range is empty", name)));
            }
            if *range.end() > MAX_OPERAND_WIDTH {
                return Err(Error::InvalidWidth(*range.end()));
            }
        }
        Ok(())
    }
}

impl Default for EncodeConfig {
    fn default() -> Self {
        Self { source_widths: 10..=11, length_widths: 3..=5, max_size: None }
    }
}

/// Configuration for script text handling around the codec
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScriptConfig {
    /// Byte that ends each script line
    pub line_breaker: u8,
    /// Address the first line is loaded at (added to every pointer)
    pub pointer_base: u16,
}

impl Default for ScriptConfig {
    fn default() -> Self {
        Self { line_breaker: 0x00, pointer_base: 0x6900 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_sweep() {
        let config = EncodeConfig::default();
        assert_eq!(config.source_widths, 10..=11);
        assert_eq!(config.length_widths, 3..=5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_full_sweep_is_valid() {
        let config = EncodeConfig::full_sweep();
        assert_eq!(config.source_widths.clone().count(), 16);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_script_defaults() {
        let config = ScriptConfig::default();
        assert_eq!(config.line_breaker, 0);
        assert_eq!(config.pointer_base, 0x6900);
    }
}

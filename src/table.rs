//! Character tables (`.tbl` files) mapping script bytes to display text.
//!
//! Format, one entry per line:
//! - `XX=text` maps byte `0xXX` to `text` (everything after the first `=`)
//! - lines starting with `;` or `/` are comments
//! - entries whose text contains `~` are ignored, since `~XX~` is the escape
//!   used for bytes without an entry

use std::collections::HashMap;
use std::path::Path;

use crate::error::{Error, Result};

/// Byte <-> text mapping loaded from a `.tbl` file
#[derive(Clone, Debug, Default)]
pub struct CharTable {
    entries: HashMap<u8, String>,
    /// Bytes in order of first definition
    order: Vec<u8>,
    reverse: HashMap<String, u8>,
    /// Longest entry text in chars, bounds the greedy match in `encode_line`
    longest: usize,
}

impl CharTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a table file. Malformed lines are logged and skipped.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(Self::parse(&text))
    }

    pub fn parse(text: &str) -> Self {
        let mut table = Self::new();

        for (idx, line) in text.lines().enumerate() {
            match parse_line(line, idx + 1) {
                Ok(Some((byte, value))) => table.insert(byte, value),
                Ok(None) => {}
                Err(e) => tracing::warn!("skipping table entry: {}", e),
            }
        }

        tracing::debug!(entries = table.len(), "loaded character table");
        table
    }

    /// Map `byte` to `value`. A later mapping for the same byte replaces the
    /// earlier one but keeps its position; reverse lookups give the first
    /// byte, in that order, whose current text matches.
    pub fn insert(&mut self, byte: u8, value: String) {
        self.longest = self.longest.max(value.chars().count());
        if self.entries.insert(byte, value).is_none() {
            self.order.push(byte);
        }
        self.rebuild_reverse();
    }

    fn rebuild_reverse(&mut self) {
        self.reverse.clear();
        for byte in &self.order {
            if let Some(text) = self.entries.get(byte) {
                self.reverse.entry(text.clone()).or_insert(*byte);
            }
        }
    }

    pub fn get(&self, byte: u8) -> Option<&str> {
        self.entries.get(&byte).map(String::as_str)
    }

    pub fn lookup(&self, text: &str) -> Option<u8> {
        self.reverse.get(text).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Display text for one byte, `~XX~` when the table has no entry
    pub fn decode_byte(&self, byte: u8) -> String {
        match self.get(byte) {
            Some(text) => text.to_string(),
            None => format!("~{:02X}~", byte),
        }
    }

    pub fn decode(&self, bytes: &[u8]) -> String {
        bytes.iter().map(|&b| self.decode_byte(b)).collect()
    }

    /// Convert one line of display text back to bytes.
    ///
    /// At each position: a `~XX~` escape gives the raw byte, otherwise the
    /// longest table text matching here, otherwise the character's own code
    /// when it fits in a byte. `line` is only used for error reporting.
    pub fn encode_line(&self, text: &str, line: usize) -> Result<Vec<u8>> {
        let chars: Vec<char> = text.chars().collect();
        let mut out = Vec::with_capacity(chars.len());
        let mut pos = 0;

        while pos < chars.len() {
            if let Some(byte) = parse_escape(&chars[pos..]) {
                out.push(byte);
                pos += 4;
                continue;
            }

            let max = self.longest.min(chars.len() - pos);
            let matched = (1..=max).rev().find_map(|len| {
                let candidate: String = chars[pos..pos + len].iter().collect();
                self.lookup(&candidate).map(|byte| (byte, len))
            });

            match matched {
                Some((byte, len)) => {
                    out.push(byte);
                    pos += len;
                }
                None => {
                    let ch = chars[pos];
                    let code = u8::try_from(u32::from(ch))
                        .map_err(|_| Error::UnmappableChar { line, ch })?;
                    out.push(code);
                    pos += 1;
                }
            }
        }

        Ok(out)
    }
}

/// Parse one table line. `Ok(None)` for comments, blank lines and entries
/// that are deliberately ignored.
fn parse_line(line: &str, number: usize) -> Result<Option<(u8, String)>> {
    let line = line.strip_suffix('\r').unwrap_or(line);

    if line.starts_with(';') || line.starts_with('/') {
        return Ok(None);
    }

    let Some((hex, value)) = line.split_once('=') else {
        return Ok(None);
    };

    if value.contains('~') {
        return Ok(None);
    }

    let byte = u8::from_str_radix(hex.trim(), 16)
        .map_err(|_| Error::InvalidTableEntry { line: number, content: line.to_string() })?;

    Ok(Some((byte, value.to_string())))
}

/// `~XX~` at the start of `chars`
fn parse_escape(chars: &[char]) -> Option<u8> {
    match chars {
        ['~', hi, lo, '~', ..] => {
            let hi = hi.to_digit(16)?;
            let lo = lo.to_digit(16)?;
            Some((hi * 16 + lo) as u8)
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE: &str = "; sample table\n\
                         /00=<END>\n\
                         00=<END>\n\
                         20= \n\
                         41=A\n\
                         42=B\n\
                         43=th\n\
                         44=t\n\
                         zz=broken\n\
                         45=~bad~\n\
                         not an entry\n\
                         46=A\n\
                         0A=\u{e9}\r\n";

    #[test]
    fn test_parse() {
        let table = CharTable::parse(TABLE);
        assert_eq!(table.len(), 8);
        assert_eq!(table.get(0x00), Some("<END>"));
        assert_eq!(table.get(0x20), Some(" "));
        assert_eq!(table.get(0x0A), Some("\u{e9}"));
        assert_eq!(table.get(0x45), None);
    }

    #[test]
    fn test_parse_line_errors() {
        assert!(matches!(
            parse_line("zz=broken", 9),
            Err(Error::InvalidTableEntry { line: 9, .. })
        ));
        assert!(matches!(parse_line("; 41=A", 1), Ok(None)));
        assert!(matches!(parse_line("", 1), Ok(None)));
        assert_eq!(parse_line("3D==", 1).unwrap(), Some((0x3D, "=".to_string())));
    }

    #[test]
    fn test_reverse_lookup_keeps_first() {
        let table = CharTable::parse(TABLE);
        // 0x41 and 0x46 both map to "A"
        assert_eq!(table.lookup("A"), Some(0x41));
    }

    #[test]
    fn test_redefinition_overrides() {
        let table = CharTable::parse("41=A\n41=Z\n");
        assert_eq!(table.get(0x41), Some("Z"));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_redefinition_updates_reverse_lookup() {
        let table = CharTable::parse("50=A\n51=A\n50=Z\n");
        assert_eq!(table.lookup("A"), Some(0x51));
        assert_eq!(table.lookup("Z"), Some(0x50));

        let bytes = table.encode_line("AZ", 1).unwrap();
        assert_eq!(bytes, vec![0x51, 0x50]);
        assert_eq!(table.decode(&bytes), "AZ");

        // A redefined byte keeps its original position for reverse lookups
        let table = CharTable::parse("50=A\n51=Z\n50=Z\n");
        assert_eq!(table.lookup("Z"), Some(0x50));
        assert_eq!(table.lookup("A"), None);
    }

    #[test]
    fn test_decode() {
        let table = CharTable::parse(TABLE);
        assert_eq!(table.decode(&[0x41, 0x20, 0x43, 0x99, 0x00]), "A th~99~<END>");
    }

    #[test]
    fn test_encode_line() {
        let table = CharTable::parse(TABLE);
        let bytes = table.encode_line("A th~99~<END>", 1).unwrap();
        assert_eq!(bytes, vec![0x41, 0x20, 0x43, 0x99, 0x00]);
    }

    #[test]
    fn test_encode_prefers_longest_entry() {
        let table = CharTable::parse(TABLE);
        assert_eq!(table.encode_line("tht", 1).unwrap(), vec![0x43, 0x44]);
    }

    #[test]
    fn test_encode_falls_back_to_char_code() {
        let table = CharTable::parse(TABLE);
        // 'z' and '<' have no entry of their own
        assert_eq!(table.encode_line("z<", 1).unwrap(), vec![b'z', b'<']);
        // Lowercase hex escapes are accepted too
        assert_eq!(table.encode_line("~0a~", 1).unwrap(), vec![0x0A]);
        // Broken escapes are plain text
        assert_eq!(table.encode_line("~G1~", 1).unwrap(), b"~G1~".to_vec());
    }

    #[test]
    fn test_encode_unmappable() {
        let table = CharTable::parse(TABLE);
        assert!(matches!(
            table.encode_line("A\u{3042}", 4),
            Err(Error::UnmappableChar { line: 4, ch: '\u{3042}' })
        ));
    }

    #[test]
    fn test_decode_encode_round_trip() {
        let table = CharTable::parse(TABLE);
        let bytes: Vec<u8> = vec![0x41, 0x42, 0x20, 0x0A, 0x7E, 0x00];
        let text = table.decode(&bytes);
        assert_eq!(table.encode_line(&text, 1).unwrap(), bytes);
    }
}

//! Script dumps: decoded script lines as an editable text file.
//!
//! Each line is written as
//!
//! ```text
//! @1
//! ;original text
//! editable text
//! |
//! ```
//!
//! Reading a dump back keeps only the lines that do not start with `@`, `;`
//! or `|`, so the `;` copy preserves the original while the next line is
//! edited.

use std::path::Path;

use crate::error::Result;
use crate::table::CharTable;

/// A script split into lines of raw bytes, each ending with the line breaker
/// (except possibly the last)
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Script {
    lines: Vec<Vec<u8>>,
}

impl Script {
    pub fn new(lines: Vec<Vec<u8>>) -> Self {
        Self { lines }
    }

    /// Split decoded bytes after every `breaker` byte. Bytes after the last
    /// breaker become a final unterminated line.
    pub fn split(bytes: &[u8], breaker: u8) -> Self {
        let lines = bytes.split_inclusive(|&b| b == breaker).map(<[u8]>::to_vec).collect();
        Self { lines }
    }

    pub fn lines(&self) -> &[Vec<u8>] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// All lines joined back into one byte sequence
    pub fn to_bytes(&self) -> Vec<u8> {
        self.lines.concat()
    }

    /// Render the dump text for this script
    pub fn render(&self, table: &CharTable) -> String {
        let mut out = String::new();
        for (idx, line) in self.lines.iter().enumerate() {
            let text = table.decode(line);
            out.push_str(&format!("@{}\n;{}\n{}\n|\n", idx + 1, text, text));
        }
        out
    }

    pub fn write_dump<P: AsRef<Path>>(&self, path: P, table: &CharTable) -> Result<()> {
        std::fs::write(path, self.render(table))?;
        Ok(())
    }

    /// Parse dump text back into bytes through `table`
    pub fn parse_dump(text: &str, table: &CharTable) -> Result<Self> {
        let lines = editable_lines(text)
            .enumerate()
            .map(|(idx, line)| table.encode_line(line, idx + 1))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { lines })
    }

    pub fn read_dump<P: AsRef<Path>>(path: P, table: &CharTable) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::parse_dump(&text, table)
    }
}

/// Lines of a dump that carry script text
pub fn editable_lines(text: &str) -> impl Iterator<Item = &str> {
    text.lines().filter(|line| !(line.starts_with(';') || line.starts_with('@') || line.starts_with('|')))
}

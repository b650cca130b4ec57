use crate::error::{Error, Result};

/// 16-bit pointers to the start of every script line, stored in the ROM as
/// two parallel arrays of low and high bytes
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PointerTable {
    pointers: Vec<u16>,
}

impl PointerTable {
    /// Pointer `k` is `base` plus the decoded length of lines `0..k`,
    /// truncated to 16 bits
    pub fn from_lines<L: AsRef<[u8]>>(lines: &[L], base: u16) -> Self {
        let mut offset = 0usize;
        let pointers = lines
            .iter()
            .map(|line| {
                let pointer = (offset as u16).wrapping_add(base);
                offset += line.as_ref().len();
                pointer
            })
            .collect();
        Self { pointers }
    }

    pub fn pointers(&self) -> &[u16] {
        &self.pointers
    }

    pub fn len(&self) -> usize {
        self.pointers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pointers.is_empty()
    }

    pub fn low_bytes(&self) -> Vec<u8> {
        self.pointers.iter().map(|p| (p & 0xFF) as u8).collect()
    }

    pub fn high_bytes(&self) -> Vec<u8> {
        self.pointers.iter().map(|p| (p >> 8) as u8).collect()
    }

    /// Fail if the table holds more than `max_entries` pointers
    pub fn check_capacity(&self, max_entries: usize) -> Result<()> {
        if self.pointers.len() > max_entries {
            return Err(Error::CapacityExceeded {
                region: "pointer table",
                unit: "lines",
                required: self.pointers.len(),
                capacity: max_entries,
            });
        }
        Ok(())
    }
}

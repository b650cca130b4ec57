use std::path::Path;

use crate::error::{Error, Result};

/// A ROM image held in memory. Nothing touches the file until [`save`](Self::save).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RomImage {
    data: Vec<u8>,
}

impl RomImage {
    pub fn from_bytes(data: Vec<u8>) -> Self {
        Self { data }
    }

    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = std::fs::read(path.as_ref())?;
        tracing::debug!(path = %path.as_ref().display(), size = data.len(), "loaded ROM image");
        Ok(Self { data })
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn read_region(&self, offset: usize, len: usize) -> Result<&[u8]> {
        self.check_bounds(offset, len)?;
        Ok(&self.data[offset..offset + len])
    }

    /// Write `bytes` at `offset` and zero-fill the rest of a `capacity`-byte
    /// region. Returns the number of bytes left free. Nothing is written when
    /// `bytes` does not fit.
    pub fn write_region(&mut self, offset: usize, capacity: usize, bytes: &[u8]) -> Result<usize> {
        if bytes.len() > capacity {
            return Err(Error::CapacityExceeded {
                region: "ROM region",
                unit: "bytes",
                required: bytes.len(),
                capacity,
            });
        }
        self.check_bounds(offset, capacity)?;

        let region = &mut self.data[offset..offset + capacity];
        let (used, free) = region.split_at_mut(bytes.len());
        used.copy_from_slice(bytes);
        free.fill(0);

        Ok(capacity - bytes.len())
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        std::fs::write(path, &self.data)?;
        Ok(())
    }

    fn check_bounds(&self, offset: usize, len: usize) -> Result<()> {
        match offset.checked_add(len) {
            Some(end) if end <= self.data.len() => Ok(()),
            _ => Err(Error::InvalidOffset { offset, len, size: self.data.len() }),
        }
    }
}

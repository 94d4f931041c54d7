//! sink — append-only байтовый буфер для сборки startup blob.
//!
//! Формат полей (little-endian, без выравнивания):
//! - blob: [len u32][len bytes]
//! - int:  [value u32]
//!
//! Буфер только растёт: ничего не перезаписывается и не усекается.

use byteorder::{ByteOrder, LittleEndian};
use log::trace;

use crate::consts::BLOB_INT_SIZE;
use crate::error::{Result, SnapshotError};

#[derive(Clone, Debug, Default)]
pub struct ByteSink {
    buf: Vec<u8>,
}

impl ByteSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(cap: usize) -> Self {
        Self {
            buf: Vec::with_capacity(cap),
        }
    }

    /// Append `[len u32][bytes]`. `tag` is only used for tracing.
    pub fn put_blob(&mut self, bytes: &[u8], tag: &str) -> Result<()> {
        let len = u32::try_from(bytes.len()).map_err(|_| SnapshotError::BlobTooLarge(bytes.len()))?;
        trace!("sink: blob '{}' len={} at off={}", tag, len, self.buf.len());
        self.put_u32(len);
        self.buf.extend_from_slice(bytes);
        Ok(())
    }

    /// Append one fixed 4-byte integer.
    pub fn put_int(&mut self, value: u32, tag: &str) {
        trace!("sink: int '{}'={} at off={}", tag, value, self.buf.len());
        self.put_u32(value);
    }

    #[inline]
    fn put_u32(&mut self, v: u32) {
        let mut b = [0u8; BLOB_INT_SIZE];
        LittleEndian::write_u32(&mut b, v);
        self.buf.extend_from_slice(&b);
    }

    pub fn data(&self) -> &[u8] {
        &self.buf
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.buf
    }
}

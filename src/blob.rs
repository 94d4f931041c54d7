//! blob — startup blob: оба образа + размеры регионов в одном бинарном файле.
//!
//! Layout (little-endian, без паддинга):
//! ```text
//! [len u32][len bytes: startup image][8 x u32: startup region sizes]
//! [len u32][len bytes: context image][8 x u32: context region sizes]
//! ```
//! Регионы идут строго в порядке `Region::ALL`. Blob всегда содержит
//! несжатые байты образов, независимо от компрессора generated source.

use byteorder::{ByteOrder, LittleEndian};

use crate::consts::{BLOB_INT_SIZE, BLOB_LEN_SIZE, BLOB_REGION_TABLE_SIZE, REGION_COUNT};
use crate::error::{Result, SnapshotError};
use crate::image::ImageKind;
use crate::region::{Region, RegionSizes};
use crate::sink::ByteSink;

/// Собрать startup blob из несжатых байтов и проверенных размеров регионов.
pub fn build_startup_blob(
    startup: &[u8],
    startup_sizes: &RegionSizes,
    context: &[u8],
    context_sizes: &RegionSizes,
) -> Result<Vec<u8>> {
    let cap = 2 * (BLOB_LEN_SIZE + BLOB_REGION_TABLE_SIZE) + startup.len() + context.len();
    let mut sink = ByteSink::with_capacity(cap);

    sink.put_blob(startup, "snapshot")?;
    for (_, size) in startup_sizes.iter() {
        sink.put_int(size, "spaces");
    }

    sink.put_blob(context, "context")?;
    for (_, size) in context_sizes.iter() {
        sink.put_int(size, "spaces");
    }

    Ok(sink.into_inner())
}

/// One image section of a parsed blob.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlobImage {
    pub bytes: Vec<u8>,
    pub sizes: RegionSizes,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StartupBlob {
    pub startup: BlobImage,
    pub context: BlobImage,
}

impl StartupBlob {
    /// Parse a blob. Truncation and trailing bytes are both errors.
    pub fn parse(buf: &[u8]) -> Result<Self> {
        let mut off = 0usize;
        let startup = read_section(buf, &mut off, ImageKind::Startup)?;
        let context = read_section(buf, &mut off, ImageKind::Context)?;
        if off != buf.len() {
            return Err(SnapshotError::MalformedBlob(format!(
                "{} trailing byte(s) after context section (off={})",
                buf.len() - off,
                off
            )));
        }
        Ok(Self { startup, context })
    }

    pub fn image(&self, kind: ImageKind) -> &BlobImage {
        match kind {
            ImageKind::Startup => &self.startup,
            ImageKind::Context => &self.context,
        }
    }
}

fn take<'a>(buf: &'a [u8], off: &mut usize, n: usize, what: &str) -> Result<&'a [u8]> {
    let end = off
        .checked_add(n)
        .filter(|&e| e <= buf.len())
        .ok_or_else(|| {
            SnapshotError::MalformedBlob(format!(
                "truncated {}: need {} byte(s) at off={}, have {}",
                what,
                n,
                *off,
                buf.len().saturating_sub(*off)
            ))
        })?;
    let s = &buf[*off..end];
    *off = end;
    Ok(s)
}

fn read_section(buf: &[u8], off: &mut usize, kind: ImageKind) -> Result<BlobImage> {
    let len_field = take(buf, off, BLOB_LEN_SIZE, &format!("{kind} length"))?;
    let len = LittleEndian::read_u32(len_field) as usize;
    let bytes = take(buf, off, len, &format!("{kind} image"))?.to_vec();

    let table = take(buf, off, BLOB_REGION_TABLE_SIZE, &format!("{kind} region sizes"))?;
    let mut sizes = [0u32; REGION_COUNT];
    for r in Region::ALL {
        let at = r.index() * BLOB_INT_SIZE;
        sizes[r.index()] = LittleEndian::read_u32(&table[at..at + BLOB_INT_SIZE]);
    }
    Ok(BlobImage {
        bytes,
        sizes: RegionSizes(sizes),
    })
}

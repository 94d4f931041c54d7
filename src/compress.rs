//! compress — подключаемый компрессор для байтов, встраиваемых в generated source.
//!
//! Компрессор — чистое преобразование: вход не меняется, результат детерминирован.
//! Ошибка компрессии фатальна для всего прогона (`SnapshotError::Compression`).

use std::io::Write;

use flate2::write::GzEncoder;
use flate2::Compression;

use crate::config::{CodecKind, WriterConfig};
use crate::error::{Result, SnapshotError};

pub trait Compressor {
    /// Short codec name for diagnostics and reports.
    fn name(&self) -> &'static str;

    fn compress(&self, input: &[u8]) -> Result<Vec<u8>>;
}

#[derive(Clone, Copy, Debug)]
pub struct ZstdCompressor {
    pub level: i32,
}

impl Compressor for ZstdCompressor {
    fn name(&self) -> &'static str {
        "zstd"
    }

    fn compress(&self, input: &[u8]) -> Result<Vec<u8>> {
        zstd::bulk::compress(input, self.level).map_err(|e| SnapshotError::Compression {
            codec: self.name(),
            reason: e.to_string(),
        })
    }
}

#[derive(Clone, Copy, Debug)]
pub struct GzipCompressor {
    pub level: u32,
}

impl Compressor for GzipCompressor {
    fn name(&self) -> &'static str {
        "gzip"
    }

    fn compress(&self, input: &[u8]) -> Result<Vec<u8>> {
        let fail = |e: std::io::Error| SnapshotError::Compression {
            codec: "gzip",
            reason: e.to_string(),
        };
        let mut enc = GzEncoder::new(Vec::new(), Compression::new(self.level));
        enc.write_all(input).map_err(fail)?;
        enc.finish().map_err(fail)
    }
}

/// Compressor selected by the config, or `None` for pass-through.
pub fn compressor_for(cfg: &WriterConfig) -> Option<Box<dyn Compressor>> {
    match cfg.codec {
        CodecKind::None => None,
        CodecKind::Zstd => Some(Box::new(ZstdCompressor {
            level: cfg.zstd_level,
        })),
        CodecKind::Gzip => Some(Box::new(GzipCompressor {
            level: cfg.gzip_level,
        })),
    }
}

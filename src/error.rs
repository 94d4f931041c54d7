//! Ошибки упаковщика снапшотов.
//!
//! Все варианты фатальны: вызывающий код (CLI) печатает сообщение в stderr и
//! завершает процесс с ненулевым кодом. Восстановления и повторов нет.

use std::path::PathBuf;

use thiserror::Error;

use crate::image::ImageKind;
use crate::region::Region;

pub type Result<T> = std::result::Result<T, SnapshotError>;

#[derive(Debug, Error)]
pub enum SnapshotError {
    /// Destination cannot be opened (or checked) for writing.
    #[error("unable to open file \"{}\" for writing: {reason}", .path.display())]
    Configuration { path: PathBuf, reason: String },

    /// A region of a startup/context image reported other than one chunk.
    #[error(
        "{image} snapshot: region '{region}' has {} allocation chunk(s), expected exactly 1 ({chunks:?})",
        .chunks.len()
    )]
    Invariant {
        image: ImageKind,
        region: Region,
        chunks: Vec<u32>,
    },

    #[error("compression failed ({codec}): {reason}")]
    Compression { codec: &'static str, reason: String },

    #[error("writing \"{}\" failed: {source}", .path.display())]
    ShortWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("blob payload too large: {0} bytes (max 4294967295)")]
    BlobTooLarge(usize),

    #[error("malformed startup blob: {0}")]
    MalformedBlob(String),

    /// Invalid setting (env or flag) that would change the produced artifacts.
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("bad serializer image: {0}")]
    Image(String),
}

impl SnapshotError {
    pub fn configuration(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        SnapshotError::Configuration {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub fn short_write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SnapshotError::ShortWrite {
            path: path.into(),
            source,
        }
    }
}

//! mksnapshot — упаковщик сериализованных образов (startup + context).
//!
//! Из двух готовых байтовых потоков и учёта чанков по регионам строит:
//! - generated source с байтовыми литералами и константами размеров;
//! - опциональные raw-дампы обоих образов;
//! - опциональный startup blob (бинарный формат, little-endian).

// Форматы и ошибки
pub mod consts;
pub mod error;
pub mod config;

// Модель данных
pub mod region;
pub mod image;

// Кодирование артефактов
pub mod sink;
pub mod blob;
pub mod compress;
pub mod source;

// Запись
pub mod dest;
pub mod writer;
pub mod report;

// Удобные реэкспорты
pub use blob::{build_startup_blob, BlobImage, StartupBlob};
pub use compress::{compressor_for, Compressor, GzipCompressor, ZstdCompressor};
pub use config::{CodecKind, WriterConfig};
pub use error::{Result, SnapshotError};
pub use image::{load_images, ImageData, ImageKind, RegionsDoc, SerializedImage};
pub use region::{single_chunk_for, Region, RegionAccounting, RegionSizes};
pub use report::WriteReport;
pub use sink::ByteSink;
pub use writer::SnapshotWriter;

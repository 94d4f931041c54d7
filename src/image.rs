//! image — сериализованные образы (startup/context), полученные от внешнего сериализатора.
//!
//! Писатель работает с образом только через трейт `SerializedImage`
//! (байты + учёт чанков по регионам), поэтому в тестах можно подставлять
//! синтетические образы. `ImageData` — конкретная реализация, которую CLI
//! загружает из файлов:
//! - сырой образ: файл с байтами как есть;
//! - регионы: JSON вида
//!   `{"startup": {"new":[4096], ...}, "context": {...}}`.
//!
//! Отсутствующий ключ региона = пустой список чанков (это станет нарушением
//! инварианта при записи, а не ошибкой разбора). Неизвестные ключи — ошибка.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::{CONTEXT_PREFIX, REGION_COUNT};
use crate::error::{Result, SnapshotError};
use crate::region::{Region, RegionAccounting};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageKind {
    Startup,
    Context,
}

impl ImageKind {
    /// Symbol prefix in the generated source.
    pub fn prefix(self) -> &'static str {
        match self {
            ImageKind::Startup => "",
            ImageKind::Context => CONTEXT_PREFIX,
        }
    }
}

impl fmt::Display for ImageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageKind::Startup => f.write_str("startup"),
            ImageKind::Context => f.write_str("context"),
        }
    }
}

/// One serialized image as seen by the writer. Read-only.
pub trait SerializedImage: RegionAccounting {
    fn bytes(&self) -> &[u8];
}

/// Owned image: bytes plus per-region chunk lists in `Region::ALL` order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ImageData {
    pub bytes: Vec<u8>,
    pub chunks: [Vec<u32>; REGION_COUNT],
}

impl ImageData {
    pub fn new(bytes: Vec<u8>, chunks: [Vec<u32>; REGION_COUNT]) -> Self {
        Self { bytes, chunks }
    }

    /// Every region reports exactly one chunk of `size` bytes.
    pub fn with_uniform_chunks(bytes: Vec<u8>, size: u32) -> Self {
        Self {
            bytes,
            chunks: std::array::from_fn(|_| vec![size]),
        }
    }

    pub fn set_chunks(&mut self, region: Region, chunks: Vec<u32>) {
        self.chunks[region.index()] = chunks;
    }
}

impl RegionAccounting for ImageData {
    fn chunks_for(&self, region: Region) -> &[u32] {
        &self.chunks[region.index()]
    }
}

impl SerializedImage for ImageData {
    fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

// ---------------- regions JSON ----------------

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegionChunks {
    #[serde(default)]
    pub new: Vec<u32>,
    #[serde(default)]
    pub pointer: Vec<u32>,
    #[serde(default)]
    pub data: Vec<u32>,
    #[serde(default)]
    pub code: Vec<u32>,
    #[serde(default)]
    pub map: Vec<u32>,
    #[serde(default)]
    pub cell: Vec<u32>,
    #[serde(default)]
    pub property_cell: Vec<u32>,
    #[serde(default)]
    pub lo: Vec<u32>,
}

impl RegionChunks {
    fn into_array(self) -> [Vec<u32>; REGION_COUNT] {
        [
            self.new,
            self.pointer,
            self.data,
            self.code,
            self.map,
            self.cell,
            self.property_cell,
            self.lo,
        ]
    }
}

/// Regions document for both images.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegionsDoc {
    pub startup: RegionChunks,
    pub context: RegionChunks,
}

impl RegionsDoc {
    pub fn parse(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| SnapshotError::Image(format!("regions json: {e}")))
    }

    pub fn read(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .map_err(|e| SnapshotError::Image(format!("read regions {}: {}", path.display(), e)))?;
        Self::parse(&text)
    }
}

fn read_image_bytes(path: &Path, kind: ImageKind) -> Result<Vec<u8>> {
    fs::read(path)
        .map_err(|e| SnapshotError::Image(format!("read {} image {}: {}", kind, path.display(), e)))
}

/// Загрузить оба образа из файлов: (startup, context).
pub fn load_images(
    startup_path: &Path,
    context_path: &Path,
    regions_path: &Path,
) -> Result<(ImageData, ImageData)> {
    let doc = RegionsDoc::read(regions_path)?;
    let startup = ImageData::new(
        read_image_bytes(startup_path, ImageKind::Startup)?,
        doc.startup.into_array(),
    );
    let context = ImageData::new(
        read_image_bytes(context_path, ImageKind::Context)?,
        doc.context.into_array(),
    );
    Ok((startup, context))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn regions_doc_maps_keys_to_region_order() {
        let doc = RegionsDoc::parse(
            r#"{
                "startup": {"new":[1],"pointer":[2],"data":[3],"code":[4],
                            "map":[5],"cell":[6],"property_cell":[7],"lo":[8]},
                "context": {"lo":[80, 81]}
            }"#,
        )
        .unwrap();
        let s = ImageData::new(vec![], doc.startup.into_array());
        for (i, r) in Region::ALL.iter().enumerate() {
            assert_eq!(s.chunks_for(*r), &[(i + 1) as u32]);
        }
        let c = ImageData::new(vec![], doc.context.into_array());
        assert!(c.chunks_for(Region::New).is_empty());
        assert_eq!(c.chunks_for(Region::Lo), &[80, 81]);
    }

    #[test]
    fn regions_doc_rejects_unknown_region() {
        let err = RegionsDoc::parse(r#"{"startup":{"old":[1]},"context":{}}"#).unwrap_err();
        assert!(matches!(err, SnapshotError::Image(_)));
    }

    #[test]
    fn kind_prefix_and_display() {
        assert_eq!(ImageKind::Startup.prefix(), "");
        assert_eq!(ImageKind::Context.prefix(), "context_");
        assert_eq!(ImageKind::Context.to_string(), "context");
    }
}

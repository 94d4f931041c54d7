//! report — итог прогона писателя: что и куда записано (для --json и логов).

use serde::Serialize;

use crate::consts::REGION_COUNT;
use crate::dest::ArtifactRole;
use crate::image::ImageKind;
use crate::region::RegionSizes;

#[derive(Clone, Debug, Serialize)]
pub struct ArtifactInfo {
    pub role: ArtifactRole,
    pub path: String,
    pub bytes: u64,
    pub crc32: u32,
}

impl ArtifactInfo {
    pub fn new(role: ArtifactRole, path: &std::path::Path, data: &[u8]) -> Self {
        Self {
            role,
            path: path.display().to_string(),
            bytes: data.len() as u64,
            crc32: crc32fast::hash(data),
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct ImageInfo {
    pub kind: ImageKind,
    /// Uncompressed image size.
    pub original_bytes: u64,
    /// Size of the byte literal in the generated source.
    pub embedded_bytes: u64,
    pub compressed: bool,
    /// Region sizes in fixed region order.
    pub region_sizes: [u32; REGION_COUNT],
}

impl ImageInfo {
    pub fn new(kind: ImageKind, original: usize, embedded: usize, compressed: bool, sizes: &RegionSizes) -> Self {
        Self {
            kind,
            original_bytes: original as u64,
            embedded_bytes: embedded as u64,
            compressed,
            region_sizes: sizes.0,
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct WriteReport {
    pub class_name: String,
    pub codec: String,
    pub images: Vec<ImageInfo>,
    pub artifacts: Vec<ArtifactInfo>,
}

impl WriteReport {
    pub fn artifact(&self, role: ArtifactRole) -> Option<&ArtifactInfo> {
        self.artifacts.iter().find(|a| a.role == role)
    }

    pub fn image(&self, kind: ImageKind) -> Option<&ImageInfo> {
        self.images.iter().find(|i| i.kind == kind)
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

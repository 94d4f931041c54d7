//! writer — SnapshotWriter: упаковка двух образов во все сконфигурированные артефакты.
//!
//! Одноразовый конвейер: configure* -> write -> done (`write` потребляет writer).
//!
//! Порядок `write`:
//! 1. Проверить инварианты регионов обоих образов (ровно один чанк на регион).
//! 2. Конвейер данных (context, затем startup): сжатие, если задан компрессор.
//! 3. Отрендерить generated source и (опционально) startup blob в памяти.
//! 4. Открыть (без усечения) и залочить все приёмники.
//! 5. Только потом усечь и записать каждый файл.
//!
//! Поэтому нарушение инварианта или ошибка компрессии не создают и не
//! перезаписывают ни одного файла, а ошибка открытия не трогает уже
//! существующие файлы. Ошибка при самой записи оставляет
//! частично записанные файлы: сборка обязана считать ненулевой код выхода
//! сигналом перегенерации с нуля.

use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::blob::build_startup_blob;
use crate::compress::{compressor_for, Compressor};
use crate::config::WriterConfig;
use crate::dest::{check_destination, ensure_distinct, ArtifactRole, OpenedDest};
use crate::error::Result;
use crate::image::{ImageKind, SerializedImage};
use crate::region::RegionSizes;
use crate::report::{ArtifactInfo, ImageInfo, WriteReport};
use crate::source::{render_source, EmbeddedData, ImageSection};

pub struct SnapshotWriter {
    class_name: String,
    fsync: bool,
    source_path: PathBuf,
    /// (startup, context)
    raw_paths: Option<(PathBuf, PathBuf)>,
    blob_path: Option<PathBuf>,
    compressor: Option<Box<dyn Compressor>>,
}

impl SnapshotWriter {
    /// Writer for the generated source at `source_path` with default config.
    pub fn new(source_path: impl Into<PathBuf>) -> Result<Self> {
        let source_path = source_path.into();
        check_destination(&source_path)?;
        let cfg = WriterConfig::default();
        Ok(Self {
            class_name: cfg.class_name,
            fsync: cfg.fsync,
            source_path,
            raw_paths: None,
            blob_path: None,
            compressor: None,
        })
    }

    /// Apply class name, fsync and codec from a config.
    /// `codec = none` keeps a compressor set earlier via `with_compressor`.
    pub fn with_config(mut self, cfg: &WriterConfig) -> Self {
        self.class_name = cfg.class_name.clone();
        self.fsync = cfg.fsync;
        if let Some(c) = compressor_for(cfg) {
            self.compressor = Some(c);
        }
        self
    }

    pub fn with_compressor(mut self, compressor: Box<dyn Compressor>) -> Self {
        self.compressor = Some(compressor);
        self
    }

    /// Raw dumps of the uncompressed images. Both or neither.
    pub fn with_raw_files(
        mut self,
        startup: impl Into<PathBuf>,
        context: impl Into<PathBuf>,
    ) -> Result<Self> {
        let startup: PathBuf = startup.into();
        let context: PathBuf = context.into();
        self.raw_paths = None;
        for p in [&startup, &context] {
            check_destination(p)?;
            ensure_distinct(p, self.configured_paths())?;
        }
        ensure_distinct(&context, [startup.as_path()])?;
        self.raw_paths = Some((startup, context));
        Ok(self)
    }

    pub fn with_startup_blob_file(mut self, path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        self.blob_path = None;
        check_destination(&path)?;
        ensure_distinct(&path, self.configured_paths())?;
        self.blob_path = Some(path);
        Ok(self)
    }

    fn configured_paths(&self) -> Vec<&Path> {
        let mut v = vec![self.source_path.as_path()];
        if let Some((s, c)) = &self.raw_paths {
            v.push(s);
            v.push(c);
        }
        if let Some(b) = &self.blob_path {
            v.push(b);
        }
        v
    }

    /// Produce every configured artifact. Any error aborts the whole run.
    pub fn write(
        self,
        startup: &dyn SerializedImage,
        context: &dyn SerializedImage,
    ) -> Result<WriteReport> {
        // 1) инварианты регионов — до любого вывода
        let context_sizes = RegionSizes::collect(context, ImageKind::Context)?;
        let startup_sizes = RegionSizes::collect(startup, ImageKind::Startup)?;

        // 2) конвейер данных: context, затем startup
        let compressor = self.compressor.as_deref();
        let context_sec = ImageSection {
            kind: ImageKind::Context,
            data: EmbeddedData::prepare(context.bytes(), compressor)?,
            sizes: context_sizes,
        };
        let startup_sec = ImageSection {
            kind: ImageKind::Startup,
            data: EmbeddedData::prepare(startup.bytes(), compressor)?,
            sizes: startup_sizes,
        };
        for sec in [&context_sec, &startup_sec] {
            debug!(
                "writer: {} image {} B -> literal {} B (compressed={})",
                sec.kind,
                sec.data.raw_size(),
                sec.data.literal().len(),
                sec.data.is_compressed()
            );
        }

        // 3) рендер в памяти
        let source = render_source(&self.class_name, &context_sec, &startup_sec);
        let blob = match &self.blob_path {
            Some(_) => Some(build_startup_blob(
                startup.bytes(),
                &startup_sizes,
                context.bytes(),
                &context_sizes,
            )?),
            None => None,
        };

        // 4) открыть все приёмники до первой записи (без усечения)
        let mut planned: Vec<(ArtifactRole, OpenedDest, &[u8])> = Vec::with_capacity(4);
        planned.push((
            ArtifactRole::Source,
            OpenedDest::open(&self.source_path)?,
            source.as_bytes(),
        ));
        if let Some((raw_startup, raw_context)) = &self.raw_paths {
            planned.push((
                ArtifactRole::RawContext,
                OpenedDest::open(raw_context)?,
                context.bytes(),
            ));
            planned.push((
                ArtifactRole::RawStartup,
                OpenedDest::open(raw_startup)?,
                startup.bytes(),
            ));
        }
        if let (Some(path), Some(bytes)) = (&self.blob_path, &blob) {
            planned.push((ArtifactRole::StartupBlob, OpenedDest::open(path)?, bytes.as_slice()));
        }

        // 5) все открыты и залочены — теперь усекаем и пишем
        let mut artifacts = Vec::with_capacity(planned.len());
        for (role, mut dest, bytes) in planned {
            dest.write_fully(bytes, self.fsync)?;
            artifacts.push(ArtifactInfo::new(role, dest.path(), bytes));
        }

        let codec = self.compressor.as_ref().map(|c| c.name()).unwrap_or("none");
        let images = [&context_sec, &startup_sec]
            .iter()
            .map(|sec| {
                ImageInfo::new(
                    sec.kind,
                    sec.data.raw_size(),
                    sec.data.literal().len(),
                    sec.data.is_compressed(),
                    &sec.sizes,
                )
            })
            .collect();

        info!(
            "snapshot written: startup={} B, context={} B, codec={}, artifacts={}",
            startup.bytes().len(),
            context.bytes().len(),
            codec,
            artifacts.len()
        );

        Ok(WriteReport {
            class_name: self.class_name.clone(),
            codec: codec.to_string(),
            images,
            artifacts,
        })
    }
}

//! dest — файлы-приёмники артефактов.
//!
//! Правила:
//! - все пути попарно различны;
//! - при конфигурировании путь проверяется (родительский каталог существует,
//!   сам путь не каталог) — fail fast до записи;
//! - перед записью все файлы открываются (create, без truncate) и берётся
//!   эксклюзивный advisory lock (fs2); lock снимается на Drop;
//! - усечение старого содержимого — только в `write_fully`, т.е. после того,
//!   как открыты и залочены все приёмники.

use std::fs::{File, OpenOptions};
use std::io::{Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use fs2::FileExt;
use log::debug;
use serde::Serialize;

use crate::error::{Result, SnapshotError};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactRole {
    Source,
    RawStartup,
    RawContext,
    StartupBlob,
}

impl ArtifactRole {
    pub fn as_str(self) -> &'static str {
        match self {
            ArtifactRole::Source => "source",
            ArtifactRole::RawStartup => "raw_startup",
            ArtifactRole::RawContext => "raw_context",
            ArtifactRole::StartupBlob => "startup_blob",
        }
    }
}

/// Проверить, что путь пригоден для записи, ничего не создавая.
pub fn check_destination(path: &Path) -> Result<()> {
    if path.as_os_str().is_empty() {
        return Err(SnapshotError::configuration(path, "empty path"));
    }
    if path.is_dir() {
        return Err(SnapshotError::configuration(path, "is a directory"));
    }
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    if !parent.is_dir() {
        return Err(SnapshotError::configuration(
            path,
            format!("directory {} does not exist", parent.display()),
        ));
    }
    Ok(())
}

/// Reject a path already used by another configured artifact.
pub fn ensure_distinct<'a, I>(path: &Path, existing: I) -> Result<()>
where
    I: IntoIterator<Item = &'a Path>,
{
    for other in existing {
        if other == path {
            return Err(SnapshotError::configuration(
                path,
                "same destination configured for two artifacts",
            ));
        }
    }
    Ok(())
}

/// Opened, exclusively locked destination.
pub struct OpenedDest {
    file: File,
    path: PathBuf,
}

impl OpenedDest {
    pub fn open(path: &Path) -> Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)
            .map_err(|e| SnapshotError::configuration(path, e))?;
        file.try_lock_exclusive()
            .map_err(|e| SnapshotError::configuration(path, format!("lock: {e}")))?;
        debug!("dest: opened {}", path.display());
        Ok(Self {
            file,
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Truncate, then write the whole buffer in one go; any I/O failure is a short write.
    pub fn write_fully(&mut self, bytes: &[u8], fsync: bool) -> Result<()> {
        self.file
            .set_len(0)
            .and_then(|_| self.file.seek(SeekFrom::Start(0)))
            .and_then(|_| self.file.write_all(bytes))
            .and_then(|_| self.file.flush())
            .map_err(|e| SnapshotError::short_write(&self.path, e))?;
        if fsync {
            self.file
                .sync_all()
                .map_err(|e| SnapshotError::short_write(&self.path, e))?;
        }
        debug!("dest: wrote {} B to {}", bytes.len(), self.path.display());
        Ok(())
    }
}

impl Drop for OpenedDest {
    fn drop(&mut self) {
        let _ = self.file.unlock();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn unique_dir(prefix: &str) -> PathBuf {
        let t = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let d = std::env::temp_dir().join(format!("mksnap-dest-{prefix}-{}-{t}", std::process::id()));
        fs::create_dir_all(&d).unwrap();
        d
    }

    #[test]
    fn destination_check_rules() {
        let d = unique_dir("check");
        assert!(check_destination(&d.join("ok.bin")).is_ok());
        assert!(check_destination(&d).is_err(), "directory is not a destination");
        assert!(check_destination(&d.join("missing").join("x.bin")).is_err());
        assert!(check_destination(Path::new("")).is_err());
        assert!(!d.join("ok.bin").exists(), "the check must not create files");
    }

    #[test]
    fn distinct_paths() {
        let a = PathBuf::from("/tmp/a");
        let b = PathBuf::from("/tmp/b");
        assert!(ensure_distinct(&a, [b.as_path()]).is_ok());
        assert!(ensure_distinct(&a, [b.as_path(), a.as_path()]).is_err());
    }

    #[test]
    fn open_truncates_and_writes() {
        let d = unique_dir("open");
        let p = d.join("out.bin");
        fs::write(&p, b"old contents that are longer").unwrap();
        {
            let mut o = OpenedDest::open(&p).unwrap();
            assert_eq!(o.path(), p.as_path());
            o.write_fully(b"new", true).unwrap();
        }
        assert_eq!(fs::read(&p).unwrap(), b"new");
    }

    #[test]
    fn open_keeps_old_contents_until_write() {
        let d = unique_dir("keep");
        let p = d.join("out.bin");
        fs::write(&p, b"previous build").unwrap();
        drop(OpenedDest::open(&p).unwrap());
        assert_eq!(fs::read(&p).unwrap(), b"previous build");
    }
}

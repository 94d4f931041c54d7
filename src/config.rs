//! Centralized configuration for the snapshot writer.
//!
//! - WriterConfig::from_env() reads MKSNAPSHOT_* variables.
//! - Fluent with_* setters override single fields (CLI flags go through them).
//!
//! Env:
//! - MKSNAPSHOT_CLASS       — class name in generated source (default "Snapshot")
//! - MKSNAPSHOT_COMPRESS    — none|zstd|gzip (default none)
//! - MKSNAPSHOT_ZSTD_LEVEL  — zstd level (default 0 = библиотечный дефолт)
//! - MKSNAPSHOT_GZIP_LEVEL  — gzip level 0..=9 (default 6)
//! - MKSNAPSHOT_FSYNC       — 1|true|yes|on: sync_all каждого артефакта после записи

use std::fmt;
use std::str::FromStr;

use crate::consts::{
    DEFAULT_CLASS_NAME, DEFAULT_GZIP_LEVEL, ENV_CLASS, ENV_COMPRESS, ENV_FSYNC, ENV_GZIP_LEVEL,
    ENV_ZSTD_LEVEL,
};
use crate::error::{Result, SnapshotError};

/// Codec applied to the bytes embedded in the generated source.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum CodecKind {
    #[default]
    None,
    Zstd,
    Gzip,
}

impl CodecKind {
    pub fn as_str(self) -> &'static str {
        match self {
            CodecKind::None => "none",
            CodecKind::Zstd => "zstd",
            CodecKind::Gzip => "gzip",
        }
    }
}

impl fmt::Display for CodecKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CodecKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "none" => Ok(CodecKind::None),
            "zstd" => Ok(CodecKind::Zstd),
            "gzip" => Ok(CodecKind::Gzip),
            _ => Err(format!("invalid codec '{}' (supported: none|zstd|gzip)", s)),
        }
    }
}

#[derive(Clone, Debug)]
pub struct WriterConfig {
    /// Class whose static members the generated source defines.
    pub class_name: String,
    pub codec: CodecKind,
    pub zstd_level: i32,
    pub gzip_level: u32,
    /// sync_all every artifact after writing.
    pub fsync: bool,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            class_name: DEFAULT_CLASS_NAME.to_string(),
            codec: CodecKind::None,
            zstd_level: 0,
            gzip_level: DEFAULT_GZIP_LEVEL,
            fsync: false,
        }
    }
}

fn env_flag(name: &str) -> Option<bool> {
    std::env::var(name).ok().map(|v| {
        let s = v.trim().to_ascii_lowercase();
        s == "1" || s == "true" || s == "yes" || s == "on"
    })
}

fn parse_level<T: FromStr>(name: &str, v: &str) -> Result<T>
where
    T::Err: fmt::Display,
{
    v.trim()
        .parse::<T>()
        .map_err(|e| SnapshotError::Config(format!("{name}='{}': {e}", v.trim())))
}

impl WriterConfig {
    /// Load from environment. An unknown codec name or an unparsable level is
    /// an error: either would silently change the produced artifacts.
    pub fn from_env() -> Result<Self> {
        let mut cfg = Self::default();

        if let Ok(v) = std::env::var(ENV_CLASS) {
            let s = v.trim();
            if !s.is_empty() {
                cfg.class_name = s.to_string();
            }
        }

        if let Ok(v) = std::env::var(ENV_COMPRESS) {
            cfg.codec = v
                .parse()
                .map_err(|e: String| SnapshotError::Config(format!("{ENV_COMPRESS}: {e}")))?;
        }

        if let Ok(v) = std::env::var(ENV_ZSTD_LEVEL) {
            cfg.zstd_level = parse_level(ENV_ZSTD_LEVEL, &v)?;
        }

        if let Ok(v) = std::env::var(ENV_GZIP_LEVEL) {
            let n: u32 = parse_level(ENV_GZIP_LEVEL, &v)?;
            cfg.gzip_level = n.min(9);
        }

        if let Some(on) = env_flag(ENV_FSYNC) {
            cfg.fsync = on;
        }

        Ok(cfg)
    }

    pub fn with_class_name<S: Into<String>>(mut self, name: S) -> Self {
        self.class_name = name.into();
        self
    }

    pub fn with_codec(mut self, codec: CodecKind) -> Self {
        self.codec = codec;
        self
    }

    pub fn with_zstd_level(mut self, level: i32) -> Self {
        self.zstd_level = level;
        self
    }

    pub fn with_gzip_level(mut self, level: u32) -> Self {
        self.gzip_level = level.min(9);
        self
    }

    pub fn with_fsync(mut self, on: bool) -> Self {
        self.fsync = on;
        self
    }
}

use clap::Parser;
use std::path::PathBuf;

use mksnapshot::CodecKind;

fn parse_codec(s: &str) -> Result<CodecKind, String> {
    s.parse()
}

/// Package serialized startup/context images into generated source,
/// raw dumps and a startup blob.
///
/// Пример:
///   mksnapshot snapshot.cc --startup-image startup.bin --context-image context.bin \
///       --regions regions.json --startup-blob snapshot_blob.bin
#[derive(Parser, Debug)]
#[command(name = "mksnapshot", version, about = "Snapshot packager (source / raw / startup blob)")]
pub struct Cli {
    /// Output path of the generated source
    pub outfile: PathBuf,

    /// Serialized startup image (raw bytes from the serializer)
    #[arg(long)]
    pub startup_image: PathBuf,

    /// Serialized context image (raw bytes from the serializer)
    #[arg(long)]
    pub context_image: PathBuf,

    /// JSON with per-region allocation chunks of both images
    #[arg(long)]
    pub regions: PathBuf,

    /// Raw dump of the uncompressed startup image (requires --raw-context-file)
    #[arg(long, requires = "raw_context_file")]
    pub raw_file: Option<PathBuf>,

    /// Raw dump of the uncompressed context image (requires --raw-file)
    #[arg(long, requires = "raw_file")]
    pub raw_context_file: Option<PathBuf>,

    /// Startup blob output (both images + region sizes)
    #[arg(long)]
    pub startup_blob: Option<PathBuf>,

    /// Codec for the embedded byte literals: none|zstd|gzip (overrides MKSNAPSHOT_COMPRESS)
    #[arg(long, value_parser = parse_codec)]
    pub compress: Option<CodecKind>,

    #[arg(long)]
    pub zstd_level: Option<i32>,

    #[arg(long)]
    pub gzip_level: Option<u32>,

    /// Class name used in the generated source (overrides MKSNAPSHOT_CLASS)
    #[arg(long)]
    pub class: Option<String>,

    /// fsync every artifact after writing
    #[arg(long, default_value_t = false)]
    pub fsync: bool,

    /// Print the write report as JSON on stdout
    #[arg(long, default_value_t = false)]
    pub json: bool,
}

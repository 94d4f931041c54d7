use anyhow::{Context, Result};
use clap::Parser;
use env_logger::{Builder, Env};

use mksnapshot::dest::ArtifactRole;
use mksnapshot::{load_images, SnapshotWriter, WriterConfig};

mod cli;

fn init_logger() {
    // Уровень берём из RUST_LOG, иначе дефолт — info. Логи идут в stderr.
    Builder::from_env(Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();
}

fn main() {
    init_logger();

    if let Err(e) = run() {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = cli::Cli::parse();

    // ENV -> флаги CLI поверх
    let mut cfg = WriterConfig::from_env().context("load MKSNAPSHOT_* config")?;
    if let Some(codec) = cli.compress {
        cfg = cfg.with_codec(codec);
    }
    if let Some(level) = cli.zstd_level {
        cfg = cfg.with_zstd_level(level);
    }
    if let Some(level) = cli.gzip_level {
        cfg = cfg.with_gzip_level(level);
    }
    if let Some(class) = cli.class {
        cfg = cfg.with_class_name(class);
    }
    if cli.fsync {
        cfg = cfg.with_fsync(true);
    }

    // Все приёмники проверяются до чтения входов: fail fast.
    let mut writer = SnapshotWriter::new(&cli.outfile)
        .with_context(|| format!("configure source output {}", cli.outfile.display()))?
        .with_config(&cfg);
    if let (Some(raw), Some(raw_ctx)) = (&cli.raw_file, &cli.raw_context_file) {
        writer = writer.with_raw_files(raw, raw_ctx).context("configure raw files")?;
    }
    if let Some(blob) = &cli.startup_blob {
        writer = writer
            .with_startup_blob_file(blob)
            .context("configure startup blob")?;
    }

    let (startup, context) = load_images(&cli.startup_image, &cli.context_image, &cli.regions)
        .context("load serializer output")?;

    let report = writer.write(&startup, &context).context("write snapshot")?;

    if cli.json {
        let s = report.to_json_pretty().context("serialize write report")?;
        println!("{s}");
        return Ok(());
    }

    for a in &report.artifacts {
        println!("{:<13} {:>10} B  crc32={:08x}  {}", a.role.as_str(), a.bytes, a.crc32, a.path);
    }
    if report.artifact(ArtifactRole::StartupBlob).is_none() {
        println!("(no startup blob requested)");
    }
    Ok(())
}

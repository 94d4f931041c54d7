use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use std::fs;
use std::path::PathBuf;

use mksnapshot::{ImageKind, Region, StartupBlob};

#[derive(Parser, Debug)]
#[command(name = "snapblob_dump", version, about = "Inspect a startup blob")]
struct Opt {
    /// Startup blob to inspect
    blob: PathBuf,
    /// JSON output
    #[arg(long, default_value_t = false)]
    json: bool,
    /// Write the startup image bytes to this file
    #[arg(long)]
    extract_startup: Option<PathBuf>,
    /// Write the context image bytes to this file
    #[arg(long)]
    extract_context: Option<PathBuf>,
}

#[derive(Serialize)]
struct SectionView {
    kind: ImageKind,
    bytes: usize,
    crc32: u32,
    regions: Vec<(&'static str, u32)>,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let opt = Opt::parse();

    let buf = fs::read(&opt.blob).with_context(|| format!("read {}", opt.blob.display()))?;
    let blob = StartupBlob::parse(&buf).with_context(|| format!("parse {}", opt.blob.display()))?;

    let views: Vec<SectionView> = [ImageKind::Startup, ImageKind::Context]
        .into_iter()
        .map(|kind| {
            let img = blob.image(kind);
            SectionView {
                kind,
                bytes: img.bytes.len(),
                crc32: crc32fast::hash(&img.bytes),
                regions: Region::ALL
                    .iter()
                    .map(|r| (r.suffix(), img.sizes.get(*r)))
                    .collect(),
            }
        })
        .collect();

    if let Some(p) = &opt.extract_startup {
        fs::write(p, &blob.startup.bytes).with_context(|| format!("write {}", p.display()))?;
    }
    if let Some(p) = &opt.extract_context {
        fs::write(p, &blob.context.bytes).with_context(|| format!("write {}", p.display()))?;
    }

    if opt.json {
        let s = serde_json::to_string_pretty(&views).context("serialize blob summary")?;
        println!("{s}");
        return Ok(());
    }

    println!("Startup blob: {} ({} B)", opt.blob.display(), buf.len());
    for v in &views {
        println!("  {:<8} {:>10} B  crc32={:08x}", v.kind.to_string(), v.bytes, v.crc32);
        for (name, size) in &v.regions {
            println!("    {:<14} = {}", name, size);
        }
    }
    Ok(())
}

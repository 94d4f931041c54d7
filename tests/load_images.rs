use anyhow::Result;
use std::fs;
use std::path::PathBuf;

use mksnapshot::{load_images, Region, RegionAccounting, SerializedImage, SnapshotError};

fn unique_root(prefix: &str) -> PathBuf {
    let pid = std::process::id();
    let t = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let root = std::env::temp_dir().join(format!("mksnap-{}-{}-{}", prefix, pid, t));
    fs::create_dir_all(&root).unwrap();
    root
}

#[test]
fn load_images_from_files() -> Result<()> {
    let root = unique_root("load");
    fs::write(root.join("startup.bin"), [9u8, 8, 7])?;
    fs::write(root.join("context.bin"), [6u8])?;
    fs::write(
        root.join("regions.json"),
        r#"{"startup":{"new":[1],"pointer":[2],"data":[3],"code":[4],"map":[5],"cell":[6],"property_cell":[7],"lo":[8]},
            "context":{"new":[4096],"lo":[10,20]}}"#,
    )?;

    let (startup, context) = load_images(
        &root.join("startup.bin"),
        &root.join("context.bin"),
        &root.join("regions.json"),
    )?;
    assert_eq!(startup.bytes(), &[9, 8, 7]);
    assert_eq!(context.bytes(), &[6]);
    assert_eq!(startup.chunks_for(Region::PropertyCell), &[7]);
    assert_eq!(context.chunks_for(Region::New), &[4096]);
    assert!(context.chunks_for(Region::Map).is_empty());
    assert_eq!(context.chunks_for(Region::Lo), &[10, 20]);
    Ok(())
}

#[test]
fn missing_image_file_is_reported() -> Result<()> {
    let root = unique_root("load-missing");
    fs::write(root.join("regions.json"), r#"{"startup":{},"context":{}}"#)?;
    let err = load_images(
        &root.join("nope.bin"),
        &root.join("nope2.bin"),
        &root.join("regions.json"),
    )
    .unwrap_err();
    assert!(matches!(err, SnapshotError::Image(_)));
    assert!(err.to_string().contains("startup"), "{err}");
    Ok(())
}

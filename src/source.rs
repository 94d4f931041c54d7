//! source — generated source artifact (байтовые литералы + константы размеров).
//!
//! Порядок секций фиксирован: данные context, данные startup, затем 8 констант
//! регионов context и 8 констант регионов startup.
//!
//! Для каждого образа литерал содержит либо исходные байты, либо сжатые.
//! Наблюдаемый контракт "raw" полей:
//! - без сжатия: `raw_data_` = алиас на `data_`, `raw_size_` = алиас на `size_`;
//! - со сжатием: `raw_data_` = NULL, `raw_size_` = исходная (несжатая) длина.

use crate::compress::Compressor;
use crate::consts::{LITERAL_VALUES_PER_LINE, SOURCE_HEADER, SOURCE_PREAMBLE, SOURCE_SUFFIX};
use crate::error::Result;
use crate::image::ImageKind;
use crate::region::RegionSizes;

/// Bytes chosen for the byte-array literal of one image.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EmbeddedData<'a> {
    /// Literal is the original image.
    Uncompressed(&'a [u8]),
    /// Literal holds compressed bytes; `original_len` is the uncompressed size.
    Compressed { literal: Vec<u8>, original_len: usize },
}

impl<'a> EmbeddedData<'a> {
    /// Run the data pipeline step: compress if configured, else pass through.
    pub fn prepare(original: &'a [u8], compressor: Option<&dyn Compressor>) -> Result<Self> {
        match compressor {
            None => Ok(EmbeddedData::Uncompressed(original)),
            Some(c) => Ok(EmbeddedData::Compressed {
                literal: c.compress(original)?,
                original_len: original.len(),
            }),
        }
    }

    pub fn literal(&self) -> &[u8] {
        match self {
            EmbeddedData::Uncompressed(b) => b,
            EmbeddedData::Compressed { literal, .. } => literal,
        }
    }

    /// Size of the image before compression.
    pub fn raw_size(&self) -> usize {
        match self {
            EmbeddedData::Uncompressed(b) => b.len(),
            EmbeddedData::Compressed { original_len, .. } => *original_len,
        }
    }

    pub fn is_compressed(&self) -> bool {
        matches!(self, EmbeddedData::Compressed { .. })
    }
}

/// Everything the source needs about one image.
pub struct ImageSection<'a> {
    pub kind: ImageKind,
    pub data: EmbeddedData<'a>,
    pub sizes: RegionSizes,
}

/// Decimal values, comma separated, 32 per line, no trailing comma.
pub fn write_byte_literal(out: &mut String, data: &[u8]) {
    for (i, line) in data.chunks(LITERAL_VALUES_PER_LINE).enumerate() {
        if i > 0 {
            out.push_str(",\n");
        }
        for (j, b) in line.iter().enumerate() {
            if j > 0 {
                out.push(',');
            }
            out.push_str(&b.to_string());
        }
    }
    out.push('\n');
}

fn write_data(out: &mut String, class: &str, sec: &ImageSection<'_>) {
    let p = sec.kind.prefix();
    out.push_str(&format!("const byte {class}::{p}data_[] = {{\n"));
    write_byte_literal(out, sec.data.literal());
    out.push_str("};\n");
    out.push_str(&format!(
        "const int {class}::{p}size_ = {};\n",
        sec.data.literal().len()
    ));

    match &sec.data {
        EmbeddedData::Uncompressed(_) => {
            out.push_str(&format!(
                "const byte* {class}::{p}raw_data_ = {class}::{p}data_;\n"
            ));
            out.push_str(&format!(
                "const int {class}::{p}raw_size_ = {class}::{p}size_;\n"
            ));
        }
        EmbeddedData::Compressed { original_len, .. } => {
            out.push_str(&format!("const byte* {class}::{p}raw_data_ = NULL;\n"));
            out.push_str(&format!(
                "const int {class}::{p}raw_size_ = {original_len};\n"
            ));
        }
    }
    out.push('\n');
}

fn write_meta(out: &mut String, class: &str, sec: &ImageSection<'_>) {
    let p = sec.kind.prefix();
    for (region, size) in sec.sizes.iter() {
        out.push_str(&format!(
            "const int {class}::{p}{}_space_used_ = {size};\n",
            region.suffix()
        ));
    }
    out.push('\n');
}

/// Render the whole generated source.
pub fn render_source(class: &str, context: &ImageSection<'_>, startup: &ImageSection<'_>) -> String {
    let approx = 8 * 1024
        + 4 * (context.data.literal().len() + startup.data.literal().len());
    let mut out = String::with_capacity(approx);
    out.push_str(SOURCE_HEADER);
    out.push_str(SOURCE_PREAMBLE);
    write_data(&mut out, class, context);
    write_data(&mut out, class, startup);
    write_meta(&mut out, class, context);
    write_meta(&mut out, class, startup);
    out.push_str(SOURCE_SUFFIX);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compress::ZstdCompressor;

    fn literal_of(data: &[u8]) -> String {
        let mut s = String::new();
        write_byte_literal(&mut s, data);
        s
    }

    #[test]
    fn literal_wraps_every_32_values() {
        let data: Vec<u8> = (0..70u32).map(|i| (i * 4) as u8).collect();
        let s = literal_of(&data);
        let lines: Vec<&str> = s.trim_end_matches('\n').split('\n').collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].trim_end_matches(',').split(',').count(), 32);
        assert_eq!(lines[1].trim_end_matches(',').split(',').count(), 32);
        assert_eq!(lines[2].split(',').count(), 6);
        assert!(!lines[2].ends_with(','));
        assert!(lines[0].starts_with("0,4,8,"));
    }

    #[test]
    fn literal_edges() {
        assert_eq!(literal_of(&[]), "\n");
        assert_eq!(literal_of(&[255]), "255\n");
        assert_eq!(literal_of(&[0, 128, 255]), "0,128,255\n");
    }

    #[test]
    fn uncompressed_aliases_raw_fields() {
        let bytes = [1u8, 2, 3];
        let sec = ImageSection {
            kind: ImageKind::Startup,
            data: EmbeddedData::prepare(&bytes, None).unwrap(),
            sizes: RegionSizes([7; 8]),
        };
        let mut out = String::new();
        write_data(&mut out, "Snapshot", &sec);
        assert_eq!(
            out,
            "const byte Snapshot::data_[] = {\n1,2,3\n};\n\
             const int Snapshot::size_ = 3;\n\
             const byte* Snapshot::raw_data_ = Snapshot::data_;\n\
             const int Snapshot::raw_size_ = Snapshot::size_;\n\n"
        );
    }

    #[test]
    fn compressed_has_null_raw_and_original_size() {
        let bytes = vec![0x11u8; 1000];
        let z = ZstdCompressor { level: 0 };
        let data = EmbeddedData::prepare(&bytes, Some(&z)).unwrap();
        assert!(data.is_compressed());
        assert_eq!(data.raw_size(), 1000);
        let n = data.literal().len();
        let sec = ImageSection {
            kind: ImageKind::Context,
            data,
            sizes: RegionSizes([1; 8]),
        };
        let mut out = String::new();
        write_data(&mut out, "S", &sec);
        assert!(out.contains(&format!("const int S::context_size_ = {n};\n")));
        assert!(out.contains("const byte* S::context_raw_data_ = NULL;\n"));
        assert!(out.contains("const int S::context_raw_size_ = 1000;\n"));
    }

    #[test]
    fn meta_emits_regions_in_order() {
        let sec = ImageSection {
            kind: ImageKind::Context,
            data: EmbeddedData::Uncompressed(&[]),
            sizes: RegionSizes([1, 2, 3, 4, 5, 6, 7, 8]),
        };
        let mut out = String::new();
        write_meta(&mut out, "Snapshot", &sec);
        let expected = "const int Snapshot::context_new_space_used_ = 1;\n\
const int Snapshot::context_pointer_space_used_ = 2;\n\
const int Snapshot::context_data_space_used_ = 3;\n\
const int Snapshot::context_code_space_used_ = 4;\n\
const int Snapshot::context_map_space_used_ = 5;\n\
const int Snapshot::context_cell_space_used_ = 6;\n\
const int Snapshot::context_property_cell_space_used_ = 7;\n\
const int Snapshot::context_lo_space_used_ = 8;\n\n";
        assert_eq!(out, expected);
    }

    #[test]
    fn render_orders_sections() {
        let ctx = ImageSection {
            kind: ImageKind::Context,
            data: EmbeddedData::Uncompressed(&[5]),
            sizes: RegionSizes([2; 8]),
        };
        let st = ImageSection {
            kind: ImageKind::Startup,
            data: EmbeddedData::Uncompressed(&[6]),
            sizes: RegionSizes([3; 8]),
        };
        let s = render_source("Snapshot", &ctx, &st);
        assert!(s.starts_with("// Autogenerated snapshot file. Do not edit.\n"));
        assert!(s.ends_with("}  // namespace v8\n"));
        let pos = |needle: &str| s.find(needle).unwrap();
        assert!(pos("Snapshot::context_data_[]") < pos("Snapshot::data_[]"));
        assert!(pos("Snapshot::data_[]") < pos("context_new_space_used_"));
        assert!(pos("context_lo_space_used_") < pos("Snapshot::new_space_used_"));
    }
}

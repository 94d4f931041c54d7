//! Общие константы форматов (generated source, startup blob, env).

// -------- Regions --------
/// Число регионов кучи; порядок фиксирован и входит в формат blob.
pub const REGION_COUNT: usize = 8;

// -------- Startup blob --------
// Layout (little-endian, без выравнивания):
// [len u32][len bytes startup][8 x u32 startup region sizes]
// [len u32][len bytes context][8 x u32 context region sizes]
pub const BLOB_LEN_SIZE: usize = 4;
pub const BLOB_INT_SIZE: usize = 4;
pub const BLOB_REGION_TABLE_SIZE: usize = REGION_COUNT * BLOB_INT_SIZE;

// -------- Generated source --------
pub const DEFAULT_CLASS_NAME: &str = "Snapshot";
/// Значений в одной строке байтового литерала.
pub const LITERAL_VALUES_PER_LINE: usize = 32;

pub const SOURCE_HEADER: &str = "// Autogenerated snapshot file. Do not edit.\n\n";
pub const SOURCE_PREAMBLE: &str = "#include \"src/v8.h\"\n\
#include \"src/base/platform/platform.h\"\n\n\
#include \"src/snapshot.h\"\n\n\
namespace v8 {\n\
namespace internal {\n\n";
pub const SOURCE_SUFFIX: &str = "}  // namespace internal\n}  // namespace v8\n";

/// Prefix of the per-image symbols: context symbols carry it, startup ones don't.
pub const CONTEXT_PREFIX: &str = "context_";

// -------- Env --------
pub const ENV_CLASS: &str = "MKSNAPSHOT_CLASS";
pub const ENV_COMPRESS: &str = "MKSNAPSHOT_COMPRESS";
pub const ENV_ZSTD_LEVEL: &str = "MKSNAPSHOT_ZSTD_LEVEL";
pub const ENV_GZIP_LEVEL: &str = "MKSNAPSHOT_GZIP_LEVEL";
pub const ENV_FSYNC: &str = "MKSNAPSHOT_FSYNC";

pub const DEFAULT_GZIP_LEVEL: u32 = 6;

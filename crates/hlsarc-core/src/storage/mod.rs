//! File lifecycle for downloaded resources and rendered manifests.
//!
//! Everything is written to `<name>.part`, synced, then renamed onto the
//! final name, so a file that exists under its final name is complete.

mod writer;

use anyhow::Result;
use std::path::{Path, PathBuf};

pub use writer::StorageWriter;

/// Temporary file suffix used before atomic rename.
pub const TEMP_SUFFIX: &str = ".part";

/// Path for the temp file: appends `.part` to the final path (e.g. `00.ts` → `00.ts.part`).
pub fn temp_path(final_path: &Path) -> PathBuf {
    let mut o = final_path.as_os_str().to_owned();
    o.push(TEMP_SUFFIX);
    PathBuf::from(o)
}

/// Write `data` to `path` through a synced temp file and rename.
pub fn write_atomic(path: &Path, data: &[u8]) -> Result<()> {
    let mut writer = StorageWriter::create(path)?;
    writer.write_all(data)?;
    writer.sync()?;
    writer.finalize()?;
    Ok(())
}

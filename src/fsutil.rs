//! Filesystem helpers shared by the output writers and the texture cache.

use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

/// Write `bytes` to `path` atomically.
///
/// The data goes to a temporary file in the target directory first and is
/// renamed over `path` once fully written, so readers never observe a
/// half-written file. Missing parent directories are created.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)?;

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

//! Filesystem helpers shared by config and slot persistence

use std::ffi::OsStr;
use std::io::Write;
use std::path::Path;

/// Write `contents` to `target` atomically (unique temp file + rename).
///
/// Each call writes its own temp file next to `target`, so concurrent
/// writers never share one; the last rename wins. Readers see either the
/// old file or a complete new one. The parent directory must already exist.
pub fn write_atomic(target: &Path, contents: &[u8]) -> std::io::Result<()> {
    let parent = match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let prefix = format!(
        ".{}.",
        target.file_name().and_then(OsStr::to_str).unwrap_or("unnamed")
    );

    let mut temp_file = tempfile::Builder::new()
        .prefix(&prefix)
        .suffix(".tmp")
        .tempfile_in(parent)?;
    temp_file.write_all(contents)?;
    temp_file.as_file().sync_all()?;
    temp_file.persist(target).map(|_| ()).map_err(|e| e.error)
}

// ── Atomic file helpers ──
//
// Writes go to a sibling staging file which is then renamed over the
// target, so readers never observe a half-written file.

use std::ffi::OsString;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::{CacheError, Result};

/// `path` with `suffix` appended to the full file name (`cache.json` -> `cache.json.tmp`).
pub fn sibling_with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.file_name().map(OsString::from).unwrap_or_default();
    name.push(suffix);
    path.with_file_name(name)
}

/// Create the parent directory of `path` if it does not exist.
pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            fs::create_dir_all(parent).map_err(|e| CacheError::io(parent, e))
        }
        _ => Ok(()),
    }
}

/// Write `bytes` to `staging` and flush them to disk. The target is untouched.
pub fn stage(staging: &Path, bytes: &[u8]) -> Result<()> {
    let mut file = fs::File::create(staging).map_err(|e| CacheError::io(staging, e))?;
    file.write_all(bytes).map_err(|e| CacheError::io(staging, e))?;
    file.sync_all().map_err(|e| CacheError::io(staging, e))
}

/// Move a staged file over its target in one rename.
pub fn commit(staging: &Path, target: &Path) -> Result<()> {
    fs::rename(staging, target).map_err(|e| {
        // Leave no stray staging file behind; the target is still intact.
        let _ = fs::remove_file(staging);
        CacheError::io(target, e)
    })
}

/// Stage then commit.
pub fn write_atomic(target: &Path, bytes: &[u8]) -> Result<()> {
    let staging = sibling_with_suffix(target, ".tmp");
    stage(&staging, bytes)?;
    commit(&staging, target)
}

/// Copy `src` to `dst` such that `dst` is either absent, its previous
/// contents, or a complete copy of `src`.
pub fn copy_atomic(src: &Path, dst: &Path) -> Result<()> {
    let bytes = fs::read(src).map_err(|e| CacheError::io(src, e))?;
    write_atomic(dst, &bytes)
}

/// Remove a file, treating "already gone" as success.
pub fn remove_if_exists(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(CacheError::io(path, e)),
    }
}

// ── File integrity metadata ──
//
// A sidecar JSON record binding a data file to its size and SHA-256
// digest. The record is rewritten on every save; verification re-reads
// the data file and compares.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::{CacheError, Result};

const METADATA_VERSION: u32 = 1;

/// Contents of the sidecar `.meta` file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileMetadata {
    pub version: u32,
    /// Free-form label identifying what produced the data file.
    pub tag: String,
    pub size: u64,
    pub sha256: String,
    pub created_at: DateTime<Utc>,
}

impl FileMetadata {
    /// Describe `bytes` as they will appear on disk.
    pub fn for_bytes(bytes: &[u8], tag: &str) -> Self {
        Self {
            version: METADATA_VERSION,
            tag: tag.to_owned(),
            size: u64::try_from(bytes.len()).unwrap_or(u64::MAX),
            sha256: hex::encode(Sha256::digest(bytes)),
            created_at: Utc::now(),
        }
    }

    /// Compare against the current contents of a data file.
    pub fn check(&self, data: &[u8]) -> std::result::Result<(), String> {
        let size = u64::try_from(data.len()).unwrap_or(u64::MAX);
        if size != self.size {
            return Err(format!("size mismatch: expected {} bytes, found {size}", self.size));
        }
        let digest = hex::encode(Sha256::digest(data));
        if !digest.eq_ignore_ascii_case(&self.sha256) {
            return Err(format!("checksum mismatch: expected {}, found {digest}", self.sha256));
        }
        Ok(())
    }

    pub fn to_json(&self, path: &Path) -> Result<Vec<u8>> {
        serde_json::to_vec_pretty(self).map_err(|source| CacheError::Serialization {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Sidecar path for a data file: `dir/.<file-name>.meta`.
pub fn metadata_path_for(data_path: &Path) -> PathBuf {
    let mut name = OsString::from(".");
    if let Some(file_name) = data_path.file_name() {
        name.push(file_name);
    }
    name.push(".meta");
    data_path.with_file_name(name)
}

/// Record the current contents of `data_path` in `meta_path`.
pub fn create_file_metadata(data_path: &Path, meta_path: &Path, tag: &str) -> Result<()> {
    let data = fs::read(data_path).map_err(|e| CacheError::io(data_path, e))?;
    let meta = FileMetadata::for_bytes(&data, tag);
    fs::write(meta_path, meta.to_json(meta_path)?).map_err(|e| CacheError::io(meta_path, e))
}

/// Verify `data_path` against the record in `meta_path`.
///
/// A missing metadata file is not a failure: there is nothing to compare
/// against, so verification is skipped.
pub fn verify_file_integrity(data_path: &Path, meta_path: &Path) -> Result<()> {
    let raw = match fs::read(meta_path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %meta_path.display(), "no integrity metadata; skipping verification");
            return Ok(());
        }
        Err(e) => return Err(CacheError::io(meta_path, e)),
    };

    let meta: FileMetadata = serde_json::from_slice(&raw).map_err(|e| CacheError::Integrity {
        path: data_path.to_path_buf(),
        reason: format!("unreadable metadata {}: {e}", meta_path.display()),
    })?;

    let data = fs::read(data_path).map_err(|e| CacheError::io(data_path, e))?;
    meta.check(&data).map_err(|reason| CacheError::Integrity {
        path: data_path.to_path_buf(),
        reason,
    })
}

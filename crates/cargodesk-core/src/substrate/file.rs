//! File-backed substrate
//!
//! Stores each key as a single JSON file in a directory. Writes go through
//! a temp-file-then-rename sequence so a key's file is never left in a
//! partially written state.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use super::error::{SubstrateError, SubstrateResult};
use super::Substrate;

/// Persistence substrate backed by one file per key
pub struct FileSubstrate {
    dir: PathBuf,
}

impl FileSubstrate {
    /// Create a substrate rooted at `dir`. The directory is created lazily
    /// on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory this substrate stores its keys in
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file backing `key`
    fn key_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl Substrate for FileSubstrate {
    fn read(&self, key: &str) -> SubstrateResult<Option<String>> {
        let path = self.key_path(key);
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(SubstrateError::ReadError { path, source: e }),
        }
    }

    fn write(&self, key: &str, value: &str) -> SubstrateResult<()> {
        atomic_write(&self.key_path(key), value.as_bytes())
    }

    fn remove(&self, key: &str) -> SubstrateResult<()> {
        let path = self.key_path(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(SubstrateError::from_io(e, path)),
        }
    }
}

/// Write data to a file atomically
///
/// 1. Write to a temporary file in the same directory
/// 2. Sync the file to disk
/// 3. Rename the temp file to the target path
fn atomic_write(path: &Path, data: &[u8]) -> SubstrateResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| SubstrateError::CreateDirectory {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }

    // Temp file in the same directory, so the rename stays on one filesystem
    let temp_path = path.with_extension("tmp");

    let mut file = File::create(&temp_path)
        .map_err(|e| SubstrateError::from_io(e, temp_path.clone()))?;

    file.write_all(data)
        .map_err(|e| SubstrateError::from_io(e, temp_path.clone()))?;

    file.sync_all()
        .map_err(|e| SubstrateError::from_io(e, temp_path.clone()))?;

    fs::rename(&temp_path, path).map_err(|e| SubstrateError::AtomicWriteFailed {
        from: temp_path,
        to: path.to_path_buf(),
        source: e,
    })?;

    Ok(())
}

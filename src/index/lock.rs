//! Advisory single-writer lock for a persisted index

use crate::error::{RagError, Result};
use fs2::FileExt;
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};

/// Exclusive writer lock, released on drop
///
/// The lock file sits next to the index directory (`<index>.lock`) so that
/// a reset, which deletes the directory, keeps the lock in place.
#[derive(Debug)]
pub struct IndexWriteLock {
    file: File,
    path: PathBuf,
}

impl IndexWriteLock {
    /// Take the lock without waiting; a held lock is `IndexLocked`
    pub fn acquire(index_path: &Path) -> Result<Self> {
        let path = lock_path_for(index_path);
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                RagError::io(e, format!("Failed to create directory: {}", parent.display()))
            })?;
        }

        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .truncate(false)
            .open(&path)
            .map_err(|e| RagError::io(e, format!("Failed to open lock file: {}", path.display())))?;

        if let Err(err) = file.try_lock_exclusive() {
            if err.raw_os_error() == fs2::lock_contended_error().raw_os_error() {
                return Err(RagError::IndexLocked {
                    path: index_path.to_path_buf(),
                });
            }
            return Err(RagError::io(
                err,
                format!("Failed to acquire lock: {}", path.display()),
            ));
        }

        tracing::debug!("Acquired index write lock {}", path.display());
        Ok(Self { file, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for IndexWriteLock {
    fn drop(&mut self) {
        let _ = self.file.unlock();
    }
}

pub(crate) fn lock_path_for(index_path: &Path) -> PathBuf {
    match index_path.file_name() {
        Some(name) => {
            let mut lock_name = name.to_os_string();
            lock_name.push(".lock");
            index_path.with_file_name(lock_name)
        }
        None => index_path.join("index.lock"),
    }
}

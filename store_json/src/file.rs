//! Record store backed by a single JSON document on disk.

use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use charity_store::{RecordStore, StoreError};
use charity_types::TransactionRecord;
use tempfile::NamedTempFile;
use tracing::{debug, error, info};

use crate::JsonStoreError;

/// Append-only record log persisted as a JSON array.
///
/// The file is owned exclusively by this store. All mutations go through
/// `write_lock`; reads take no lock because every write lands via an atomic
/// rename.
pub struct JsonFileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    /// Open the store at `path`, creating parent directories and an empty
    /// `[]` document if nothing exists there yet.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, JsonStoreError> {
        let store = Self::unopened(path);
        if let Some(parent) = store.parent_dir() {
            fs::create_dir_all(parent).map_err(|source| JsonStoreError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        store.ensure_initialized()?;
        Ok(store)
    }

    /// Build a handle without touching the filesystem. The document is
    /// created lazily on first read or append.
    pub fn unopened(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn parent_dir(&self) -> Option<&Path> {
        self.path.parent().filter(|p| !p.as_os_str().is_empty())
    }

    fn lock(&self) -> MutexGuard<'_, ()> {
        // The guard protects no in-memory state, so a poisoned lock is still usable.
        self.write_lock.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Create the document as `[]` if it is missing. Returns whether it was created.
    fn ensure_initialized(&self) -> Result<bool, JsonStoreError> {
        if self.path.exists() {
            return Ok(false);
        }
        let _guard = self.lock();
        // Another writer may have created it while we waited.
        if self.path.exists() {
            return Ok(false);
        }
        self.write_atomic(&[])?;
        info!(path = %self.path.display(), "created empty transaction store");
        Ok(true)
    }

    /// Load the full sequence. A missing, empty or whitespace-only file reads
    /// as no records.
    fn load(&self) -> Result<Vec<TransactionRecord>, JsonStoreError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) if e.kind() == io::ErrorKind::InvalidData => {
                return Err(JsonStoreError::Corrupted {
                    path: self.path.clone(),
                    reason: format!("not valid UTF-8: {e}"),
                })
            }
            Err(source) => {
                return Err(JsonStoreError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };
        if contents.trim().is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_str(&contents).map_err(|e| JsonStoreError::Corrupted {
            path: self.path.clone(),
            reason: e.to_string(),
        })
    }

    /// Replace the document with `records` via temp file + fsync + rename.
    fn write_atomic(&self, records: &[TransactionRecord]) -> Result<(), JsonStoreError> {
        let dir = self.parent_dir().unwrap_or_else(|| Path::new("."));
        let write_err = |source: io::Error| JsonStoreError::Write {
            path: self.path.clone(),
            source,
        };

        let mut tmp = NamedTempFile::new_in(dir).map_err(write_err)?;
        {
            let mut writer = BufWriter::new(tmp.as_file_mut());
            serde_json::to_writer_pretty(&mut writer, records)?;
            writer.write_all(b"\n").map_err(write_err)?;
            writer.flush().map_err(write_err)?;
        }
        tmp.as_file().sync_all().map_err(write_err)?;
        tmp.persist(&self.path).map_err(|e| write_err(e.error))?;
        sync_dir(dir);
        Ok(())
    }

    fn append_locked(&self, record: &TransactionRecord) -> Result<usize, JsonStoreError> {
        let _guard = self.lock();
        let mut records = self.load()?;
        records.push(record.clone());
        self.write_atomic(&records)?;
        Ok(records.len())
    }
}

/// Flush the directory entry so the rename survives a crash. Best effort.
#[cfg(unix)]
fn sync_dir(dir: &Path) {
    if let Ok(d) = fs::File::open(dir) {
        let _ = d.sync_all();
    }
}

#[cfg(not(unix))]
fn sync_dir(_dir: &Path) {}

impl RecordStore for JsonFileStore {
    fn initialize(&self) -> Result<(), StoreError> {
        self.ensure_initialized()?;
        Ok(())
    }

    fn append(&self, record: &TransactionRecord) -> Result<(), StoreError> {
        match self.append_locked(record) {
            Ok(total) => {
                debug!(%record, total, "transaction saved");
                Ok(())
            }
            Err(e) => {
                error!(error = %e, %record, "failed to save transaction");
                Err(e.into())
            }
        }
    }

    fn list_all(&self) -> Result<Vec<TransactionRecord>, StoreError> {
        self.ensure_initialized()?;
        self.load().map_err(|e| {
            error!(error = %e, "failed to read transaction store");
            e.into()
        })
    }
}

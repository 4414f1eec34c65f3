//! JsonFileStore - one JSON file per collection inside a data directory.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use super::{Store, Write};
use crate::error::StoreError;

/// Durable store writing `<dir>/<key>.json`.
///
/// A batch is staged as `<key>.json.tmp` files and every live file it
/// replaces is copied to `<key>.json.bak` before the first rename. If a
/// rename fails, the keys already replaced are restored from their backups,
/// so a failed batch leaves the previous files in place. Readers and
/// writers inside one process are serialised by an internal mutex. A crash
/// part-way through the renames is not recovered.
#[derive(Clone, Debug)]
pub struct JsonFileStore {
    dir: PathBuf,
    guard: Arc<Mutex<()>>,
}

impl JsonFileStore {
    /// Open (and create if needed) a store rooted at `dir`.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|source| StoreError::Io {
            key: dir.display().to_string(),
            source,
        })?;
        tracing::debug!(dir = %dir.display(), "opened json file store");
        Ok(Self {
            dir,
            guard: Arc::new(Mutex::new(())),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    fn staging_path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json.tmp"))
    }

    fn backup_path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json.bak"))
    }

    /// Write every staged file, then back up the live files the batch will
    /// replace. Returns, per write, whether a live file was backed up.
    fn stage(&self, writes: &[Write]) -> Result<Vec<bool>, StoreError> {
        for write in writes {
            fs::write(self.staging_path_for(write.key), &write.value).map_err(|source| {
                StoreError::Io {
                    key: write.key.to_string(),
                    source,
                }
            })?;
        }
        let mut backed_up = Vec::with_capacity(writes.len());
        for write in writes {
            let live = self.path_for(write.key);
            let had_live = live.exists();
            if had_live {
                fs::copy(&live, self.backup_path_for(write.key)).map_err(|source| {
                    StoreError::Io {
                        key: write.key.to_string(),
                        source,
                    }
                })?;
            }
            backed_up.push(had_live);
        }
        Ok(backed_up)
    }

    /// Put back the first `applied` keys of a batch that failed part-way.
    fn restore(&self, writes: &[Write], backed_up: &[bool], applied: usize) {
        for (write, had_live) in writes.iter().zip(backed_up).take(applied).rev() {
            let live = self.path_for(write.key);
            let restored = if *had_live {
                fs::rename(self.backup_path_for(write.key), &live)
            } else {
                fs::remove_file(&live)
            };
            if let Err(e) = restored {
                tracing::error!(key = write.key, error = %e, "failed to roll back collection");
            }
        }
    }

    fn clean_up(&self, writes: &[Write]) {
        for write in writes {
            let _ = fs::remove_file(self.staging_path_for(write.key));
            let _ = fs::remove_file(self.backup_path_for(write.key));
        }
    }
}

impl Store for JsonFileStore {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        let _guard = self
            .guard
            .lock()
            .map_err(|_| StoreError::LockPoisoned("read"))?;
        match fs::read_to_string(self.path_for(key)) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StoreError::Io {
                key: key.to_string(),
                source,
            }),
        }
    }

    fn write_batch(&self, writes: Vec<Write>) -> Result<(), StoreError> {
        let _guard = self
            .guard
            .lock()
            .map_err(|_| StoreError::LockPoisoned("write"))?;

        let backed_up = match self.stage(&writes) {
            Ok(backed_up) => backed_up,
            Err(e) => {
                self.clean_up(&writes);
                return Err(e);
            }
        };

        for (applied, write) in writes.iter().enumerate() {
            let renamed = fs::rename(self.staging_path_for(write.key), self.path_for(write.key));
            if let Err(source) = renamed {
                tracing::warn!(key = write.key, error = %source, "batch rename failed, rolling back");
                self.restore(&writes, &backed_up, applied);
                self.clean_up(&writes);
                return Err(StoreError::Io {
                    key: write.key.to_string(),
                    source,
                });
            }
        }
        self.clean_up(&writes);

        tracing::debug!(keys = writes.len(), dir = %self.dir.display(), "committed batch");
        Ok(())
    }
}

//! Storage root management and record file naming.

use crate::error::StoreError;
use log::{debug, info, warn};
use std::fs::{self, ReadDir};
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Extension of record files (`{id}.json`).
pub const RECORD_EXTENSION: &str = "json";
/// Extension appended to in-flight writes (`{id}.json.tmp`).
const TEMP_EXTENSION: &str = "tmp";

/// Directory holding one JSON file per dialog record.
#[derive(Debug, Clone)]
pub struct StorageRoot {
    /// Root directory for record files.
    root: PathBuf,
}

impl StorageRoot {
    /// Wrap a root path without touching the filesystem.
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Root directory.
    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Create the root (and parents) if missing.
    pub fn ensure(&self) -> Result<(), StoreError> {
        if self.root.is_dir() {
            return Ok(());
        }
        if self.root.exists() {
            return Err(StoreError::StorageUnavailable {
                path: self.root.clone(),
                source: io::Error::new(io::ErrorKind::AlreadyExists, "path is not a directory"),
            });
        }
        fs::create_dir_all(&self.root).map_err(|source| StoreError::StorageUnavailable {
            path: self.root.clone(),
            source,
        })?;
        info!("created storage root (root={})", self.root.display());
        Ok(())
    }

    /// Path of the record file for an id.
    pub fn record_path(&self, id: &str) -> PathBuf {
        self.root.join(format!("{id}.{RECORD_EXTENSION}"))
    }

    /// Path used for the temporary copy while a record is being written.
    pub(crate) fn temp_path(&self, id: &str) -> PathBuf {
        self.root
            .join(format!("{id}.{RECORD_EXTENSION}.{TEMP_EXTENSION}"))
    }

    /// Lazily list ids of record files; every call re-reads the directory.
    pub fn candidate_ids(&self) -> Result<CandidateIds, StoreError> {
        self.ensure()?;
        let entries = fs::read_dir(&self.root).map_err(|source| StoreError::StorageUnavailable {
            path: self.root.clone(),
            source,
        })?;
        Ok(CandidateIds { entries })
    }

    /// Total size in bytes of every regular file below the root.
    pub fn total_bytes(&self) -> Result<u64, StoreError> {
        self.ensure()?;
        let mut total = 0u64;
        for entry in WalkDir::new(&self.root) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    warn!("skipping unreadable storage entry: {err}");
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            match entry.metadata() {
                Ok(metadata) => total += metadata.len(),
                Err(err) => warn!(
                    "skipping file without metadata (path={}): {err}",
                    entry.path().display()
                ),
            }
        }
        debug!(
            "computed storage size (root={}, bytes={total})",
            self.root.display()
        );
        Ok(total)
    }
}

/// Iterator over record ids in filesystem order.
#[derive(Debug)]
pub struct CandidateIds {
    entries: ReadDir,
}

impl Iterator for CandidateIds {
    type Item = String;

    fn next(&mut self) -> Option<Self::Item> {
        for entry in self.entries.by_ref() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    warn!("skipping unreadable directory entry: {err}");
                    continue;
                }
            };
            let is_file = entry
                .file_type()
                .map(|file_type| file_type.is_file())
                .unwrap_or(false);
            if !is_file {
                continue;
            }
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(RECORD_EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                return Some(stem.to_string());
            }
        }
        None
    }
}

//! File-backed dialog store: one pretty-printed JSON document per record.

use crate::codec;
use crate::error::StoreError;
use crate::id::{generate_id, is_valid_id};
use crate::layout::StorageRoot;
use crate::model::{DialogId, DialogMessage, DialogRecord, normalize_tags};
use chrono::{Local, NaiveDateTime, SubsecRound};
use log::{debug, info, warn};
use parking_lot::Mutex;
use serde_json::{Map, Value, json};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Input for a free-text save.
#[derive(Debug, Clone, Default)]
pub struct TextDraft {
    pub content: String,
    pub title: Option<String>,
    pub tags: Vec<String>,
    pub metadata: Map<String, Value>,
}

impl TextDraft {
    /// Draft with content only.
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Self::default()
        }
    }
}

/// Input for a structured conversation save.
#[derive(Debug, Clone, Default)]
pub struct ConversationDraft {
    pub messages: Vec<DialogMessage>,
    pub title: Option<String>,
    pub tags: Vec<String>,
}

/// Result of a rename: the updated record and the title it replaced.
#[derive(Debug, Clone, PartialEq)]
pub struct Renamed {
    pub record: DialogRecord,
    pub old_title: String,
}

/// Dialog store rooted at a single directory.
///
/// Every operation re-reads from disk; nothing is cached between calls.
#[derive(Debug, Clone)]
pub struct DialogStore {
    /// Storage root layout.
    layout: StorageRoot,
    /// Serialize writers within this process.
    write_lock: Arc<Mutex<()>>,
}

impl DialogStore {
    /// Open a store, creating the root directory if needed.
    pub fn open(root: impl AsRef<Path>) -> Result<Self, StoreError> {
        let layout = StorageRoot::new(root);
        layout.ensure()?;
        info!(
            "initialized dialog store (root={})",
            layout.path().display()
        );
        Ok(Self {
            layout,
            write_lock: Arc::new(Mutex::new(())),
        })
    }

    /// Storage root directory.
    pub fn root(&self) -> &Path {
        self.layout.path()
    }

    /// Storage layout helper.
    pub fn layout(&self) -> &StorageRoot {
        &self.layout
    }

    /// Path of the record file for an id.
    pub fn record_path(&self, id: &str) -> PathBuf {
        self.layout.record_path(id)
    }

    /// Whether a record file exists for the id.
    pub fn exists(&self, id: &str) -> bool {
        is_valid_id(id) && self.layout.record_path(id).is_file()
    }

    /// Write a new record; fails if the id is already taken.
    pub fn create(&self, record: &DialogRecord) -> Result<PathBuf, StoreError> {
        let _guard = self.write_lock.lock();
        self.create_locked(record)
    }

    /// Read and decode a record.
    pub fn read(&self, id: &str) -> Result<DialogRecord, StoreError> {
        let (_, record) = self.read_document(id)?;
        Ok(record)
    }

    /// Replace the tags of a record, leaving every other field untouched.
    pub fn update_tags(&self, id: &str, tags: Vec<String>) -> Result<DialogRecord, StoreError> {
        let _guard = self.write_lock.lock();
        let (mut document, mut record) = self.read_document(id)?;
        record.tags = normalize_tags(tags);
        document.insert("tags".to_string(), json!(record.tags));
        self.write_atomic(id, &document)?;
        info!("updated dialog tags (id={}, tags={:?})", id, record.tags);
        Ok(record)
    }

    /// Replace the title of a record, leaving every other field untouched.
    pub fn rename(&self, id: &str, title: impl Into<String>) -> Result<Renamed, StoreError> {
        let _guard = self.write_lock.lock();
        let (mut document, mut record) = self.read_document(id)?;
        let old_title = std::mem::replace(&mut record.title, title.into());
        document.insert("title".to_string(), json!(record.title));
        self.write_atomic(id, &document)?;
        info!("renamed dialog (id={}, title={})", id, record.title);
        Ok(Renamed { record, old_title })
    }

    /// Decode every record file as `(file id, record)`.
    ///
    /// Files that vanish mid-scan or fail to decode are logged and skipped.
    pub fn scan(&self) -> Result<Vec<(DialogId, DialogRecord)>, StoreError> {
        let mut records = Vec::new();
        for id in self.layout.candidate_ids()? {
            match self.read(&id) {
                Ok(record) => records.push((id, record)),
                Err(StoreError::NotFound(_)) => {
                    debug!("dialog removed during scan (id={})", id);
                }
                Err(err) => {
                    warn!("skipping unreadable dialog (id={}): {}", id, err);
                }
            }
        }
        Ok(records)
    }

    /// Delete a record file. Irreversible.
    pub fn delete(&self, id: &str) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock();
        let path = self.checked_path(id)?;
        match fs::remove_file(&path) {
            Ok(()) => {
                info!("deleted dialog (id={})", id);
                Ok(())
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                warn!("dialog not found for delete (id={})", id);
                Err(StoreError::NotFound(id.to_string()))
            }
            Err(err) => Err(StoreError::Io(err)),
        }
    }

    /// Save free text under a freshly generated id.
    pub fn save_text(&self, draft: TextDraft) -> Result<DialogRecord, StoreError> {
        let _guard = self.write_lock.lock();
        let now = current_timestamp();
        let id = self.next_id(now);
        let title = draft.title.unwrap_or_else(|| format!("Dialog {id}"));
        let record = DialogRecord::text(id, title, now, draft.content, draft.tags, draft.metadata);
        self.create_locked(&record)?;
        Ok(record)
    }

    /// Save a structured conversation under a freshly generated id.
    pub fn save_conversation(
        &self,
        draft: ConversationDraft,
    ) -> Result<DialogRecord, StoreError> {
        let _guard = self.write_lock.lock();
        let now = current_timestamp();
        let id = self.next_id(now);
        let title = draft.title.unwrap_or_else(|| format!("Conversation {id}"));
        let record = DialogRecord::conversation(id, title, now, draft.messages, draft.tags);
        self.create_locked(&record)?;
        Ok(record)
    }

    /// Save text with a generated `Quick Save YYYY-MM-DD HH:MM` title.
    pub fn quick_save(&self, text: impl Into<String>) -> Result<DialogRecord, StoreError> {
        let title = format!("Quick Save {}", Local::now().format("%Y-%m-%d %H:%M"));
        self.save_text(TextDraft {
            title: Some(title),
            ..TextDraft::new(text)
        })
    }

    /// Generate an id that is not yet used in this store.
    fn next_id(&self, now: NaiveDateTime) -> String {
        generate_id(now, |candidate| self.layout.record_path(candidate).exists())
    }

    /// Raw JSON object on disk together with its decoded record.
    fn read_document(&self, id: &str) -> Result<(Map<String, Value>, DialogRecord), StoreError> {
        let path = self.checked_path(id)?;
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Err(StoreError::NotFound(id.to_string()));
            }
            Err(err) => return Err(StoreError::Io(err)),
        };
        let (document, record) =
            codec::decode_document(&bytes).map_err(|source| StoreError::CorruptRecord {
                path: path.clone(),
                source,
            })?;
        if record.id != id {
            warn!(
                "record id differs from file name (file_id={}, record_id={})",
                id, record.id
            );
        }
        debug!("read dialog (id={}, bytes={})", id, bytes.len());
        Ok((document, record))
    }

    fn checked_path(&self, id: &str) -> Result<PathBuf, StoreError> {
        if !is_valid_id(id) {
            return Err(StoreError::InvalidId(id.to_string()));
        }
        Ok(self.layout.record_path(id))
    }

    fn create_locked(&self, record: &DialogRecord) -> Result<PathBuf, StoreError> {
        let path = self.checked_path(&record.id)?;
        if path.exists() {
            return Err(StoreError::AlreadyExists(record.id.clone()));
        }
        self.write_atomic(&record.id, &codec::encode_document(record))?;
        info!(
            "saved dialog (id={}, kind={:?}, words={})",
            record.id,
            record.kind(),
            record.word_count()
        );
        Ok(path)
    }

    /// Write to a temp file and rename it over the record path.
    fn write_atomic(
        &self,
        id: &str,
        document: &Map<String, Value>,
    ) -> Result<PathBuf, StoreError> {
        self.layout.ensure()?;
        let path = self.layout.record_path(id);
        let temp_path = self.layout.temp_path(id);
        let bytes = serde_json::to_vec_pretty(document).map_err(|err| StoreError::WriteFailed {
            path: path.clone(),
            source: io::Error::new(io::ErrorKind::InvalidData, err),
        })?;
        if let Err(source) = fs::write(&temp_path, &bytes) {
            let _ = fs::remove_file(&temp_path);
            return Err(StoreError::WriteFailed { path, source });
        }
        if let Err(source) = fs::rename(&temp_path, &path) {
            let _ = fs::remove_file(&temp_path);
            return Err(StoreError::WriteFailed { path, source });
        }
        debug!("wrote dialog file (id={}, bytes={})", id, bytes.len());
        Ok(path)
    }
}

/// Local wall-clock time truncated to the precision written on disk.
fn current_timestamp() -> NaiveDateTime {
    Local::now().naive_local().trunc_subsecs(6)
}

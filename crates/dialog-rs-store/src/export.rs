//! Markdown export, reading view, and storage statistics.

use crate::error::StoreError;
use crate::model::{DialogBody, DialogRecord};
use crate::store::DialogStore;
use log::info;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Storage statistics computed at call time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageInfo {
    pub storage_path: PathBuf,
    /// Number of record files that decode.
    pub total_dialogs: usize,
    /// Bytes of every regular file below the root.
    pub total_size_bytes: u64,
    /// `total_size_bytes` in MiB with two decimals.
    pub total_size_mb: String,
}

/// Render a record as a Markdown document.
pub fn render_markdown(record: &DialogRecord) -> String {
    let mut lines = vec![
        format!("# {}\n", record.title),
        format!("**Saved:** {}", record.timestamp_string()),
        format!("**Tags:** {}\n", record.tags.join(", ")),
        "---\n".to_string(),
    ];
    match &record.body {
        DialogBody::Text(body) => lines.push(body.content.clone()),
        DialogBody::Conversation(body) => {
            for message in &body.messages {
                lines.push(format!("## {}\n", message.role.to_uppercase()));
                lines.push(format!("{}\n", message.content));
            }
        }
    }
    lines.join("\n")
}

/// Render a record as plain text for reading back into a conversation.
pub fn render_context(record: &DialogRecord) -> String {
    [
        format!("=== {} ===", record.title),
        format!("Saved: {}", record.timestamp_string()),
        format!("Tags: {}", record.tags.join(", ")),
        "\n--- Content ---\n".to_string(),
        record.body_text().to_string(),
    ]
    .join("\n")
}

impl DialogStore {
    /// Write a record as Markdown; defaults to `{root}/{id}.md`.
    pub fn export_markdown(&self, id: &str, output: Option<&Path>) -> Result<PathBuf, StoreError> {
        let record = self.read(id)?;
        let path = match output {
            Some(path) => path.to_path_buf(),
            None => self.root().join(format!("{id}.md")),
        };
        fs::write(&path, render_markdown(&record)).map_err(|source| StoreError::WriteFailed {
            path: path.clone(),
            source,
        })?;
        info!("exported dialog (id={}, path={})", id, path.display());
        Ok(path)
    }

    /// Count readable record files and total bytes under the root.
    pub fn storage_info(&self) -> Result<StorageInfo, StoreError> {
        let total_dialogs = self.scan()?.len();
        let total_size_bytes = self.layout().total_bytes()?;
        Ok(StorageInfo {
            storage_path: self.root().to_path_buf(),
            total_dialogs,
            total_size_bytes,
            total_size_mb: format!("{:.2}", total_size_bytes as f64 / BYTES_PER_MB),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{render_context, render_markdown};
    use crate::error::StoreError;
    use crate::model::{DialogMessage, DialogRecord};
    use crate::store::{DialogStore, TextDraft};
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use serde_json::Map;
    use std::fs;
    use tempfile::tempdir;

    fn timestamp() -> chrono::NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 1)
            .and_then(|date| date.and_hms_opt(9, 30, 0))
            .expect("timestamp")
    }

    #[test]
    fn markdown_for_text_record() {
        let record = DialogRecord::text(
            "m1",
            "Plan",
            timestamp(),
            "step one",
            vec!["a".to_string(), "b".to_string()],
            Map::new(),
        );
        assert_eq!(
            render_markdown(&record),
            "# Plan\n\n**Saved:** 2024-06-01T09:30:00.000000\n**Tags:** a, b\n\n---\n\nstep one"
        );
    }

    #[test]
    fn markdown_for_conversation_has_role_sections() {
        let record = DialogRecord::conversation(
            "m2",
            "Chat",
            timestamp(),
            vec![
                DialogMessage::new("user", "question?"),
                DialogMessage::new("assistant", "answer."),
            ],
            vec![],
        );
        let markdown = render_markdown(&record);
        assert!(markdown.starts_with("# Chat\n"));
        assert!(markdown.contains("## USER\n\nquestion?\n"));
        assert!(markdown.contains("## ASSISTANT\n\nanswer.\n"));
    }

    #[test]
    fn context_view_lists_header_then_body() {
        let record = DialogRecord::text(
            "c1",
            "Ctx",
            timestamp(),
            "the body",
            vec!["t".to_string()],
            Map::new(),
        );
        assert_eq!(
            render_context(&record),
            "=== Ctx ===\nSaved: 2024-06-01T09:30:00.000000\nTags: t\n\n--- Content ---\n\nthe body"
        );
    }

    #[test]
    fn export_defaults_to_root_and_reads_back() {
        let temp = tempdir().expect("tempdir");
        let store = DialogStore::open(temp.path()).expect("open");
        let saved = store
            .save_text(TextDraft {
                title: Some("Exported".to_string()),
                ..TextDraft::new("exported body")
            })
            .expect("save");

        let path = store.export_markdown(&saved.id, None).expect("export");
        assert_eq!(path, temp.path().join(format!("{}.md", saved.id)));
        let written = fs::read_to_string(&path).expect("read");
        assert!(written.starts_with("# Exported"));
        assert!(written.contains("exported body"));
    }

    #[test]
    fn export_reports_missing_and_unwritable() {
        let temp = tempdir().expect("tempdir");
        let store = DialogStore::open(temp.path()).expect("open");
        assert!(matches!(
            store.export_markdown("ghost", None).unwrap_err(),
            StoreError::NotFound(_)
        ));

        let saved = store.save_text(TextDraft::new("x")).expect("save");
        let target = temp.path().join("missing-dir").join("out.md");
        assert!(matches!(
            store.export_markdown(&saved.id, Some(target.as_path())).unwrap_err(),
            StoreError::WriteFailed { .. }
        ));
    }

    #[test]
    fn storage_info_tracks_creates_and_deletes() {
        let temp = tempdir().expect("tempdir");
        let store = DialogStore::open(temp.path()).expect("open");
        assert_eq!(store.storage_info().expect("info").total_dialogs, 0);

        let first = store.save_text(TextDraft::new("one")).expect("first");
        store.save_text(TextDraft::new("two")).expect("second");
        let info = store.storage_info().expect("info");
        assert_eq!(info.total_dialogs, 2);
        assert!(info.total_size_bytes > 0);
        assert_eq!(info.total_size_mb, "0.00");

        fs::write(store.record_path("broken"), "{ nope").expect("corrupt");
        assert_eq!(store.storage_info().expect("info").total_dialogs, 2);

        store.delete(&first.id).expect("delete");
        assert_eq!(store.storage_info().expect("info").total_dialogs, 1);
    }
}

//! File-backed dialog storage: one JSON document per saved dialog.

pub mod codec;
pub mod error;
pub mod export;
pub mod id;
pub mod layout;
pub mod model;
pub mod query;
pub mod store;

/// Record codec error type.
pub use codec::CodecError;
/// Store error type.
pub use error::StoreError;
/// Markdown export, reading view, and storage statistics.
pub use export::{StorageInfo, render_context, render_markdown};
/// Id generation helpers.
pub use id::{generate_id, is_valid_id};
/// Storage root layout.
pub use layout::StorageRoot;
/// Dialog record model.
pub use model::{
    ConversationBody, DialogBody, DialogId, DialogKind, DialogMessage, DialogRecord,
    DialogSummary, TextBody,
};
/// Query engine and filters.
pub use query::{DialogQuery, QueryEngine, QueryHit, QueryLimits};
/// Dialog store and save inputs.
pub use store::{ConversationDraft, DialogStore, Renamed, TextDraft};

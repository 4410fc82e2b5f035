//! Scan-based queries over the dialog store.

use crate::error::StoreError;
use crate::model::{DialogRecord, DialogSummary, normalize_tags};
use crate::store::DialogStore;
use log::debug;
use std::cmp::Ordering;

/// Result cap used by `search` when the caller gives none.
pub const DEFAULT_SEARCH_LIMIT: usize = 10;
/// Result cap used by `recent` when the caller gives none.
pub const DEFAULT_RECENT_COUNT: usize = 5;

/// Filters for a list scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DialogQuery {
    /// Maximum results; `None` falls back to the engine default.
    pub limit: Option<usize>,
    /// Every tag must be present on a match.
    pub tags: Vec<String>,
    /// Case-insensitive substring over title and body.
    pub text: Option<String>,
}

impl DialogQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn tag(self, tag: impl Into<String>) -> Self {
        self.tags([tag.into()])
    }

    /// Add filter tags, normalized the way stored tags are.
    pub fn tags(mut self, tags: impl IntoIterator<Item = String>) -> Self {
        self.tags = normalize_tags(self.tags.into_iter().chain(tags));
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    fn matches(&self, record: &DialogRecord) -> bool {
        if !record.has_all_tags(&self.tags) {
            return false;
        }
        match self.text.as_deref() {
            Some(needle) if !needle.is_empty() => record.matches_text(needle),
            _ => true,
        }
    }
}

/// Result-size bounds taken from configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueryLimits {
    /// Applied to `list` when the query carries no limit.
    pub default_limit: Option<usize>,
    /// Upper bound applied to every result list.
    pub max_limit: Option<usize>,
}

impl QueryLimits {
    /// Clamp a requested limit to `max_limit`.
    fn clamp(&self, requested: Option<usize>) -> Option<usize> {
        match (requested, self.max_limit) {
            (Some(requested), Some(max)) => Some(requested.min(max)),
            (Some(requested), None) => Some(requested),
            (None, max) => max,
        }
    }
}

/// A matched record with the path it was read from.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryHit {
    pub record: DialogRecord,
    pub summary: DialogSummary,
}

/// Query engine; every call performs a full directory scan.
#[derive(Debug, Clone)]
pub struct QueryEngine {
    store: DialogStore,
    limits: QueryLimits,
}

impl QueryEngine {
    pub fn new(store: DialogStore, limits: QueryLimits) -> Self {
        Self { store, limits }
    }

    pub fn store(&self) -> &DialogStore {
        &self.store
    }

    pub fn limits(&self) -> QueryLimits {
        self.limits
    }

    /// Filter, sort newest first, and truncate.
    pub fn list(&self, query: &DialogQuery) -> Result<Vec<QueryHit>, StoreError> {
        let limit = self
            .limits
            .clamp(query.limit.or(self.limits.default_limit));
        self.run(query, limit)
    }

    /// Records whose title or body contain `text`.
    pub fn search(&self, text: &str, limit: Option<usize>) -> Result<Vec<QueryHit>, StoreError> {
        let query = DialogQuery::new().text(text);
        let limit = self
            .limits
            .clamp(Some(limit.unwrap_or(DEFAULT_SEARCH_LIMIT)));
        self.run(&query, limit)
    }

    /// Every record carrying `tag`, bounded only by `max_limit`.
    pub fn by_tag(&self, tag: &str) -> Result<Vec<QueryHit>, StoreError> {
        let query = DialogQuery::new().tag(tag);
        self.run(&query, self.limits.clamp(None))
    }

    /// The `count` newest records.
    pub fn recent(&self, count: Option<usize>) -> Result<Vec<QueryHit>, StoreError> {
        let limit = self
            .limits
            .clamp(Some(count.unwrap_or(DEFAULT_RECENT_COUNT)));
        self.run(&DialogQuery::new(), limit)
    }

    /// Newest record, or `None` when the store is empty.
    pub fn load_last(&self) -> Result<Option<DialogRecord>, StoreError> {
        Ok(self
            .run(&DialogQuery::new(), Some(1))?
            .into_iter()
            .next()
            .map(|hit| hit.record))
    }

    fn run(&self, query: &DialogQuery, limit: Option<usize>) -> Result<Vec<QueryHit>, StoreError> {
        let mut hits: Vec<QueryHit> = self
            .store
            .scan()?
            .into_iter()
            .filter(|(_, record)| query.matches(record))
            .map(|(file_id, record)| {
                let mut summary = record.summary(self.store.record_path(&file_id));
                summary.id = file_id;
                QueryHit { record, summary }
            })
            .collect();
        hits.sort_by(|left, right| newest_first(&left.record, &right.record));
        if let Some(limit) = limit {
            hits.truncate(limit);
        }
        debug!(
            "query finished (tags={:?}, text={:?}, limit={:?}, hits={})",
            query.tags,
            query.text,
            limit,
            hits.len()
        );
        Ok(hits)
    }
}

fn newest_first(left: &DialogRecord, right: &DialogRecord) -> Ordering {
    right
        .timestamp
        .cmp(&left.timestamp)
        .then_with(|| right.id.cmp(&left.id))
}

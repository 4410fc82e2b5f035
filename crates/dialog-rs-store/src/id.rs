//! Timestamp-derived dialog identifiers.

use chrono::NaiveDateTime;
use uuid::Uuid;

/// Second-granularity id layout: `YYYYMMDD_HHMMSS`.
pub const ID_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Counter suffixes tried before falling back to a random suffix.
const MAX_COUNTER_SUFFIX: u32 = 999;

/// Id for `now` before any collision handling.
pub fn base_id(now: NaiveDateTime) -> String {
    now.format(ID_FORMAT).to_string()
}

/// Generate an id for `now` that `exists` reports as free.
///
/// Collisions within the same second append `_001`, `_002`, ... so ids still
/// sort in creation order.
pub fn generate_id<F>(now: NaiveDateTime, mut exists: F) -> String
where
    F: FnMut(&str) -> bool,
{
    let base = base_id(now);
    if !exists(&base) {
        return base;
    }
    for counter in 1..=MAX_COUNTER_SUFFIX {
        let candidate = format!("{base}_{counter:03}");
        if !exists(&candidate) {
            return candidate;
        }
    }
    format!("{base}_{}", Uuid::new_v4().simple())
}

/// Whether `id` can be used as a file stem directly under the storage root.
pub fn is_valid_id(id: &str) -> bool {
    !id.is_empty()
        && !id.starts_with('.')
        && !id
            .chars()
            .any(|c| matches!(c, '/' | '\\' | ':') || c.is_control())
}

//! Utility helpers shared by dialog tools.

use crate::ToolContext;
use dialog_rs_protocol::ToolError;
use dialog_rs_store::QueryHit;
use schemars::JsonSchema;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value, json};

/// Arguments of tools that take none.
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub(super) struct NoArgs {}

/// Parse JSON args into a typed struct for tool calls; `null` reads as `{}`.
pub(super) fn parse_args<T: DeserializeOwned>(args: Value) -> Result<T, ToolError> {
    let args = if args.is_null() {
        Value::Object(Map::new())
    } else {
        args
    };
    serde_json::from_value(args).map_err(|err| ToolError::InvalidArguments(err.to_string()))
}

/// JSON schema for a tool's argument struct.
pub(super) fn schema_of<T: JsonSchema>() -> Value {
    schemars::schema_for!(T).to_value()
}

/// Reject blank required string arguments.
pub(super) fn require_non_empty(field: &str, value: &str) -> Result<(), ToolError> {
    if value.trim().is_empty() {
        return Err(ToolError::InvalidArguments(format!(
            "{field} cannot be empty"
        )));
    }
    Ok(())
}

/// Standard list response: summaries plus count and storage root.
pub(super) fn summaries_response(ctx: &ToolContext, hits: Vec<QueryHit>) -> Value {
    let dialogs: Vec<Value> = hits
        .into_iter()
        .map(|hit| json!(hit.summary))
        .collect();
    json!({
        "success": true,
        "total": dialogs.len(),
        "dialogs": dialogs,
        "storage_path": ctx.storage_path().display().to_string(),
    })
}

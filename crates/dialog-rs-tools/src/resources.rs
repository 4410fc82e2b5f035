//! Read-only resources addressed by URI.

use crate::ToolContext;
use dialog_rs_protocol::{ResourceSpec, ToolError};
use dialog_rs_store::render_context;
use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::json;

/// Prefix of the per-dialog resource (`dialog://{dialog_id}`).
pub const DIALOG_URI_PREFIX: &str = "dialog://";
/// URI of the recent-dialogs resource.
pub const RECENT_URI: &str = "dialogs://recent";
/// Number of dialogs in the recent window.
pub const RECENT_WINDOW: usize = 10;

/// Contents returned by a resource read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceContents {
    pub uri: String,
    pub mime_type: String,
    pub text: String,
}

/// Descriptors for every exposed resource.
pub fn resource_specs() -> Vec<ResourceSpec> {
    vec![
        ResourceSpec {
            uri: format!("{DIALOG_URI_PREFIX}{{dialog_id}}"),
            name: "dialog".to_string(),
            description: "A saved dialog rendered for reading".to_string(),
            mime_type: "text/plain".to_string(),
        },
        ResourceSpec {
            uri: RECENT_URI.to_string(),
            name: "recent_dialogs".to_string(),
            description: format!("The {RECENT_WINDOW} most recent dialogs"),
            mime_type: "application/json".to_string(),
        },
    ]
}

/// Resolve and read a resource URI.
pub fn read_resource(ctx: &ToolContext, uri: &str) -> Result<ResourceContents, ToolError> {
    debug!("reading resource (uri={})", uri);
    if uri == RECENT_URI {
        return read_recent(ctx, uri);
    }
    match uri.strip_prefix(DIALOG_URI_PREFIX) {
        Some(id) if !id.is_empty() => {
            let record = ctx.store().read(id)?;
            Ok(ResourceContents {
                uri: uri.to_string(),
                mime_type: "text/plain".to_string(),
                text: render_context(&record),
            })
        }
        _ => Err(ToolError::ResourceNotFound(uri.to_string())),
    }
}

fn read_recent(ctx: &ToolContext, uri: &str) -> Result<ResourceContents, ToolError> {
    let dialogs: Vec<_> = ctx
        .query()
        .recent(Some(RECENT_WINDOW))?
        .into_iter()
        .map(|hit| hit.summary)
        .collect();
    let body = json!({
        "success": true,
        "total": dialogs.len(),
        "dialogs": dialogs,
        "storage_path": ctx.storage_path().display().to_string(),
    });
    Ok(ResourceContents {
        uri: uri.to_string(),
        mime_type: "application/json".to_string(),
        text: format!("{body:#}"),
    })
}

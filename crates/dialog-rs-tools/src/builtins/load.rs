//! Tools that read dialogs back: by id, newest, list and search.

use crate::builtins::utils::{
    NoArgs, parse_args, require_non_empty, schema_of, summaries_response,
};
use crate::{Tool, ToolContext};
use async_trait::async_trait;
use dialog_rs_protocol::{ErrorKind, ToolError};
use dialog_rs_store::{DialogQuery, DialogRecord, codec};
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Value, json};

#[derive(Debug, Deserialize, JsonSchema)]
struct DialogIdArgs {
    /// Id of the dialog.
    dialog_id: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct ListArgs {
    /// Maximum dialogs to return; defaults to the configured limit.
    #[serde(default)]
    limit: Option<usize>,
    /// Only dialogs carrying every one of these tags.
    #[serde(default)]
    tags: Option<Vec<String>>,
    /// Case-insensitive text matched against titles and content.
    #[serde(default)]
    search: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct SearchArgs {
    /// Text to look for in titles and content.
    query: String,
    /// Maximum results; defaults to 10.
    #[serde(default)]
    limit: Option<usize>,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct TagArgs {
    /// Tag to filter by.
    tag: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct RecentArgs {
    /// Number of dialogs; defaults to 5.
    #[serde(default)]
    count: Option<usize>,
}

fn dialog_response(ctx: &ToolContext, record: &DialogRecord) -> Value {
    json!({
        "success": true,
        "dialog": codec::encode_value(record),
        "file_path": ctx.store().record_path(&record.id).display().to_string(),
    })
}

/// Tool for loading one dialog by id.
#[derive(Debug, Default)]
pub struct LoadDialogTool;

#[async_trait]
impl Tool for LoadDialogTool {
    fn name(&self) -> &str {
        "load_dialog"
    }

    fn description(&self) -> &str {
        "Load a saved dialog by id"
    }

    fn args_schema(&self) -> Value {
        schema_of::<DialogIdArgs>()
    }

    async fn call(&self, ctx: &ToolContext, args: Value) -> Result<Value, ToolError> {
        let input: DialogIdArgs = parse_args(args)?;
        require_non_empty("dialog_id", &input.dialog_id)?;
        let record = ctx.store().read(&input.dialog_id)?;
        Ok(dialog_response(ctx, &record))
    }
}

/// Tool for loading the newest dialog.
#[derive(Debug, Default)]
pub struct LoadLastDialogTool;

#[async_trait]
impl Tool for LoadLastDialogTool {
    fn name(&self) -> &str {
        "load_last_dialog"
    }

    fn description(&self) -> &str {
        "Load the most recently saved dialog"
    }

    fn args_schema(&self) -> Value {
        schema_of::<NoArgs>()
    }

    async fn call(&self, ctx: &ToolContext, args: Value) -> Result<Value, ToolError> {
        let _: NoArgs = parse_args(args)?;
        match ctx.query().load_last()? {
            Some(record) => Ok(dialog_response(ctx, &record)),
            None => Err(ToolError::Dialog {
                kind: ErrorKind::NotFound,
                message: "no saved dialogs found".to_string(),
            }),
        }
    }
}

/// Tool returning only the readable body of a dialog.
#[derive(Debug, Default)]
pub struct LoadDialogContentTool;

#[async_trait]
impl Tool for LoadDialogContentTool {
    fn name(&self) -> &str {
        "load_dialog_content"
    }

    fn description(&self) -> &str {
        "Load only the text of a dialog (content or formatted conversation)"
    }

    fn args_schema(&self) -> Value {
        schema_of::<DialogIdArgs>()
    }

    async fn call(&self, ctx: &ToolContext, args: Value) -> Result<Value, ToolError> {
        let input: DialogIdArgs = parse_args(args)?;
        require_non_empty("dialog_id", &input.dialog_id)?;
        let record = ctx.store().read(&input.dialog_id)?;
        Ok(Value::String(record.body_text().to_string()))
    }
}

/// Tool for listing dialogs with optional filters.
#[derive(Debug, Default)]
pub struct ListDialogsTool;

#[async_trait]
impl Tool for ListDialogsTool {
    fn name(&self) -> &str {
        "list_dialogs"
    }

    fn description(&self) -> &str {
        "List saved dialogs, newest first, filtered by tags and text"
    }

    fn args_schema(&self) -> Value {
        schema_of::<ListArgs>()
    }

    async fn call(&self, ctx: &ToolContext, args: Value) -> Result<Value, ToolError> {
        let input: ListArgs = parse_args(args)?;
        let mut query = DialogQuery::new().tags(input.tags.unwrap_or_default());
        if let Some(limit) = input.limit {
            query = query.limit(limit);
        }
        if let Some(search) = input.search {
            query = query.text(search);
        }
        let hits = ctx.query().list(&query)?;
        Ok(summaries_response(ctx, hits))
    }
}

/// Tool for text search.
#[derive(Debug, Default)]
pub struct SearchDialogsTool;

#[async_trait]
impl Tool for SearchDialogsTool {
    fn name(&self) -> &str {
        "search_dialogs"
    }

    fn description(&self) -> &str {
        "Search dialog titles and content (case-insensitive)"
    }

    fn args_schema(&self) -> Value {
        schema_of::<SearchArgs>()
    }

    async fn call(&self, ctx: &ToolContext, args: Value) -> Result<Value, ToolError> {
        let input: SearchArgs = parse_args(args)?;
        let hits = ctx.query().search(&input.query, input.limit)?;
        Ok(summaries_response(ctx, hits))
    }
}

/// Tool for listing dialogs with a tag.
#[derive(Debug, Default)]
pub struct DialogsByTagTool;

#[async_trait]
impl Tool for DialogsByTagTool {
    fn name(&self) -> &str {
        "get_dialogs_by_tag"
    }

    fn description(&self) -> &str {
        "List every dialog carrying a tag"
    }

    fn args_schema(&self) -> Value {
        schema_of::<TagArgs>()
    }

    async fn call(&self, ctx: &ToolContext, args: Value) -> Result<Value, ToolError> {
        let input: TagArgs = parse_args(args)?;
        require_non_empty("tag", &input.tag)?;
        let hits = ctx.query().by_tag(input.tag.trim())?;
        Ok(summaries_response(ctx, hits))
    }
}

/// Tool for the newest dialogs.
#[derive(Debug, Default)]
pub struct RecentDialogsTool;

#[async_trait]
impl Tool for RecentDialogsTool {
    fn name(&self) -> &str {
        "get_recent_dialogs"
    }

    fn description(&self) -> &str {
        "List the most recently saved dialogs"
    }

    fn args_schema(&self) -> Value {
        schema_of::<RecentArgs>()
    }

    async fn call(&self, ctx: &ToolContext, args: Value) -> Result<Value, ToolError> {
        let input: RecentArgs = parse_args(args)?;
        let hits = ctx.query().recent(input.count)?;
        Ok(summaries_response(ctx, hits))
    }
}

//! Tools that modify, delete or export stored dialogs.

use crate::builtins::utils::{NoArgs, parse_args, require_non_empty, schema_of};
use crate::{Tool, ToolContext};
use async_trait::async_trait;
use dialog_rs_protocol::ToolError;
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Value, json};
use std::path::PathBuf;

#[derive(Debug, Deserialize, JsonSchema)]
struct DeleteArgs {
    /// Id of the dialog to delete.
    dialog_id: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct UpdateTagsArgs {
    /// Id of the dialog.
    dialog_id: String,
    /// Replacement tag list.
    tags: Vec<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct RenameArgs {
    /// Id of the dialog.
    dialog_id: String,
    /// New title.
    new_title: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct ExportArgs {
    /// Id of the dialog.
    dialog_id: String,
    /// Destination file; defaults to `{storage}/{id}.md`.
    #[serde(default)]
    output_path: Option<PathBuf>,
}

/// Tool for deleting a dialog.
#[derive(Debug, Default)]
pub struct DeleteDialogTool;

#[async_trait]
impl Tool for DeleteDialogTool {
    fn name(&self) -> &str {
        "delete_dialog"
    }

    fn description(&self) -> &str {
        "Permanently delete a saved dialog"
    }

    fn args_schema(&self) -> Value {
        schema_of::<DeleteArgs>()
    }

    async fn call(&self, ctx: &ToolContext, args: Value) -> Result<Value, ToolError> {
        let input: DeleteArgs = parse_args(args)?;
        require_non_empty("dialog_id", &input.dialog_id)?;
        ctx.store().delete(&input.dialog_id)?;
        Ok(json!({
            "success": true,
            "message": format!("Dialog {} deleted", input.dialog_id),
            "dialog_id": input.dialog_id,
        }))
    }
}

/// Tool for replacing a dialog's tags.
#[derive(Debug, Default)]
pub struct UpdateDialogTagsTool;

#[async_trait]
impl Tool for UpdateDialogTagsTool {
    fn name(&self) -> &str {
        "update_dialog_tags"
    }

    fn description(&self) -> &str {
        "Replace the tags of a saved dialog"
    }

    fn args_schema(&self) -> Value {
        schema_of::<UpdateTagsArgs>()
    }

    async fn call(&self, ctx: &ToolContext, args: Value) -> Result<Value, ToolError> {
        let input: UpdateTagsArgs = parse_args(args)?;
        require_non_empty("dialog_id", &input.dialog_id)?;
        let record = ctx.store().update_tags(&input.dialog_id, input.tags)?;
        Ok(json!({
            "success": true,
            "message": "Tags updated",
            "dialog_id": record.id,
            "tags": record.tags,
        }))
    }
}

/// Tool for renaming a dialog.
#[derive(Debug, Default)]
pub struct RenameDialogTool;

#[async_trait]
impl Tool for RenameDialogTool {
    fn name(&self) -> &str {
        "rename_dialog"
    }

    fn description(&self) -> &str {
        "Change the title of a saved dialog"
    }

    fn args_schema(&self) -> Value {
        schema_of::<RenameArgs>()
    }

    async fn call(&self, ctx: &ToolContext, args: Value) -> Result<Value, ToolError> {
        let input: RenameArgs = parse_args(args)?;
        require_non_empty("dialog_id", &input.dialog_id)?;
        let renamed = ctx.store().rename(&input.dialog_id, input.new_title)?;
        Ok(json!({
            "success": true,
            "message": "Dialog renamed",
            "dialog_id": renamed.record.id,
            "old_title": renamed.old_title,
            "new_title": renamed.record.title,
        }))
    }
}

/// Tool for writing a dialog as Markdown.
#[derive(Debug, Default)]
pub struct ExportDialogTool;

#[async_trait]
impl Tool for ExportDialogTool {
    fn name(&self) -> &str {
        "export_dialog_as_markdown"
    }

    fn description(&self) -> &str {
        "Export a saved dialog to a Markdown file"
    }

    fn args_schema(&self) -> Value {
        schema_of::<ExportArgs>()
    }

    async fn call(&self, ctx: &ToolContext, args: Value) -> Result<Value, ToolError> {
        let input: ExportArgs = parse_args(args)?;
        require_non_empty("dialog_id", &input.dialog_id)?;
        let path = ctx
            .store()
            .export_markdown(&input.dialog_id, input.output_path.as_deref())?;
        Ok(json!({
            "success": true,
            "message": "Dialog exported as Markdown",
            "file_path": path.display().to_string(),
        }))
    }
}

/// Tool reporting storage statistics.
#[derive(Debug, Default)]
pub struct StorageInfoTool;

#[async_trait]
impl Tool for StorageInfoTool {
    fn name(&self) -> &str {
        "get_storage_info"
    }

    fn description(&self) -> &str {
        "Report the storage directory, dialog count and total size"
    }

    fn args_schema(&self) -> Value {
        schema_of::<NoArgs>()
    }

    async fn call(&self, ctx: &ToolContext, args: Value) -> Result<Value, ToolError> {
        let _: NoArgs = parse_args(args)?;
        let info = ctx.store().storage_info()?;
        Ok(json!(info))
    }
}

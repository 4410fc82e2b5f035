//! Tools that create new dialog records.

use crate::builtins::utils::{parse_args, schema_of};
use crate::{Tool, ToolContext};
use async_trait::async_trait;
use dialog_rs_protocol::ToolError;
use dialog_rs_store::{
    ConversationDraft, DialogBody, DialogMessage, DialogRecord, TextDraft, model::UNKNOWN_ROLE,
};
use log::info;
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Map, Value, json};

/// Arguments for `save_dialog`.
#[derive(Debug, Deserialize, JsonSchema)]
struct SaveDialogArgs {
    /// Dialog text to save.
    content: String,
    /// Title; defaults to `Dialog {id}`.
    #[serde(default)]
    title: Option<String>,
    /// Tags for categorization.
    #[serde(default)]
    tags: Option<Vec<String>>,
    /// Arbitrary JSON metadata stored with the dialog.
    #[serde(default)]
    metadata: Option<Map<String, Value>>,
}

/// One message of a conversation.
#[derive(Debug, Deserialize, JsonSchema)]
struct MessageArg {
    /// Speaker role such as `user` or `assistant`.
    #[serde(default)]
    role: Option<String>,
    /// Message text.
    #[serde(default)]
    content: String,
}

impl From<MessageArg> for DialogMessage {
    fn from(arg: MessageArg) -> Self {
        DialogMessage::new(
            arg.role.unwrap_or_else(|| UNKNOWN_ROLE.to_string()),
            arg.content,
        )
    }
}

/// Arguments for `save_current_context`.
#[derive(Debug, Deserialize, JsonSchema)]
struct SaveContextArgs {
    /// Ordered conversation messages.
    messages: Vec<MessageArg>,
    /// Title; defaults to `Conversation {id}`.
    #[serde(default)]
    title: Option<String>,
    /// Tags for categorization.
    #[serde(default)]
    tags: Option<Vec<String>>,
}

/// Arguments for `quick_save`.
#[derive(Debug, Deserialize, JsonSchema)]
struct QuickSaveArgs {
    /// Text to save.
    text: String,
}

/// Fields echoed by every save response.
fn saved_response(ctx: &ToolContext, record: &DialogRecord, message: &str) -> Value {
    let mut response = json!({
        "success": true,
        "message": message,
        "dialog_id": record.id,
        "title": record.title,
        "file_path": ctx.store().record_path(&record.id).display().to_string(),
        "timestamp": record.timestamp_string(),
    });
    match &record.body {
        DialogBody::Text(body) => {
            response["word_count"] = json!(body.word_count);
        }
        DialogBody::Conversation(body) => {
            response["message_count"] = json!(body.message_count);
            response["formatted_content"] = json!(body.formatted_content);
        }
    }
    response
}

/// Tool for saving free text.
#[derive(Debug, Default)]
pub struct SaveDialogTool;

#[async_trait]
impl Tool for SaveDialogTool {
    fn name(&self) -> &str {
        "save_dialog"
    }

    fn description(&self) -> &str {
        "Save dialog text with an optional title, tags and metadata"
    }

    fn args_schema(&self) -> Value {
        schema_of::<SaveDialogArgs>()
    }

    async fn call(&self, ctx: &ToolContext, args: Value) -> Result<Value, ToolError> {
        let input: SaveDialogArgs = parse_args(args)?;
        let record = ctx.store().save_text(TextDraft {
            content: input.content,
            title: input.title,
            tags: input.tags.unwrap_or_default(),
            metadata: input.metadata.unwrap_or_default(),
        })?;
        Ok(saved_response(ctx, &record, "Dialog saved successfully"))
    }
}

/// Tool for saving a structured conversation.
#[derive(Debug, Default)]
pub struct SaveCurrentContextTool;

#[async_trait]
impl Tool for SaveCurrentContextTool {
    fn name(&self) -> &str {
        "save_current_context"
    }

    fn description(&self) -> &str {
        "Save the current conversation as role/content messages"
    }

    fn args_schema(&self) -> Value {
        schema_of::<SaveContextArgs>()
    }

    async fn call(&self, ctx: &ToolContext, args: Value) -> Result<Value, ToolError> {
        let input: SaveContextArgs = parse_args(args)?;
        let record = ctx.store().save_conversation(ConversationDraft {
            messages: input.messages.into_iter().map(DialogMessage::from).collect(),
            title: input.title,
            tags: input.tags.unwrap_or_default(),
        })?;
        Ok(saved_response(ctx, &record, "Conversation context saved"))
    }
}

/// Tool for saving text with a generated title.
#[derive(Debug, Default)]
pub struct QuickSaveTool;

#[async_trait]
impl Tool for QuickSaveTool {
    fn name(&self) -> &str {
        "quick_save"
    }

    fn description(&self) -> &str {
        "Save text immediately under a timestamped title"
    }

    fn args_schema(&self) -> Value {
        schema_of::<QuickSaveArgs>()
    }

    async fn call(&self, ctx: &ToolContext, args: Value) -> Result<Value, ToolError> {
        let input: QuickSaveArgs = parse_args(args)?;
        let record = ctx.store().quick_save(input.text)?;
        info!("quick saved dialog (id={})", record.id);
        Ok(saved_response(ctx, &record, "Dialog saved successfully"))
    }
}

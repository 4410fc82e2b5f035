//! Dialog tools exposed to the dispatcher.

mod load;
mod manage;
mod save;
mod utils;

use crate::ToolRegistry;
use log::info;
use std::sync::Arc;

pub use load::{
    DialogsByTagTool, ListDialogsTool, LoadDialogContentTool, LoadDialogTool, LoadLastDialogTool,
    RecentDialogsTool, SearchDialogsTool,
};
pub use manage::{
    DeleteDialogTool, ExportDialogTool, RenameDialogTool, StorageInfoTool, UpdateDialogTagsTool,
};
pub use save::{QuickSaveTool, SaveCurrentContextTool, SaveDialogTool};

/// Register all dialog tools with the provided registry.
pub fn register_dialog_tools(registry: &ToolRegistry) {
    registry.register(Arc::new(SaveDialogTool));
    registry.register(Arc::new(SaveCurrentContextTool));
    registry.register(Arc::new(QuickSaveTool));
    registry.register(Arc::new(LoadDialogTool));
    registry.register(Arc::new(LoadLastDialogTool));
    registry.register(Arc::new(LoadDialogContentTool));
    registry.register(Arc::new(ListDialogsTool));
    registry.register(Arc::new(SearchDialogsTool));
    registry.register(Arc::new(DialogsByTagTool));
    registry.register(Arc::new(RecentDialogsTool));
    registry.register(Arc::new(DeleteDialogTool));
    registry.register(Arc::new(UpdateDialogTagsTool));
    registry.register(Arc::new(RenameDialogTool));
    registry.register(Arc::new(ExportDialogTool));
    registry.register(Arc::new(StorageInfoTool));
    info!("registered dialog tools (count={})", registry.list().len());
}

/// Build a registry pre-populated with the dialog tools.
pub fn dialog_tool_registry() -> ToolRegistry {
    let registry = ToolRegistry::new();
    register_dialog_tools(&registry);
    registry
}

#[cfg(test)]
mod tests {
    use super::dialog_tool_registry;
    use crate::{ToolContext, ToolRegistry};
    use dialog_rs_protocol::{ErrorKind, ToolError};
    use dialog_rs_store::{DialogStore, QueryLimits};
    use pretty_assertions::assert_eq;
    use serde_json::{Value, json};
    use std::fs;
    use tempfile::{TempDir, tempdir};

    fn setup() -> (TempDir, ToolContext, ToolRegistry) {
        let temp = tempdir().expect("tempdir");
        let store = DialogStore::open(temp.path()).expect("open");
        let ctx = ToolContext::new(
            store,
            QueryLimits {
                default_limit: Some(20),
                max_limit: None,
            },
        );
        (temp, ctx, dialog_tool_registry())
    }

    async fn call(registry: &ToolRegistry, ctx: &ToolContext, name: &str, args: Value) -> Value {
        registry.call(ctx, name, args).await.expect(name)
    }

    fn dialog_kind(err: ToolError) -> ErrorKind {
        match err {
            ToolError::Dialog { kind, .. } => kind,
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn registers_every_tool_with_schema() {
        let registry = dialog_tool_registry();
        assert_eq!(
            registry.list(),
            vec![
                "delete_dialog",
                "export_dialog_as_markdown",
                "get_dialogs_by_tag",
                "get_recent_dialogs",
                "get_storage_info",
                "list_dialogs",
                "load_dialog",
                "load_dialog_content",
                "load_last_dialog",
                "quick_save",
                "rename_dialog",
                "save_current_context",
                "save_dialog",
                "search_dialogs",
                "update_dialog_tags",
            ]
        );
        for spec in registry.specs() {
            assert_eq!(spec.args_schema["type"], json!("object"), "{}", spec.name);
        }
        let save = registry.get("save_dialog").expect("save").spec();
        assert_eq!(save.args_schema["required"], json!(["content"]));
    }

    #[tokio::test]
    async fn save_then_load_round_trips() {
        let (_temp, ctx, registry) = setup();
        let saved = call(
            &registry,
            &ctx,
            "save_dialog",
            json!({
                "content": "hello brave new world",
                "title": "Greeting",
                "tags": ["intro"],
                "metadata": { "source": { "app": "cli" } }
            }),
        )
        .await;
        assert_eq!(saved["success"], json!(true));
        assert_eq!(saved["title"], json!("Greeting"));
        assert_eq!(saved["word_count"], json!(4));
        let id = saved["dialog_id"].as_str().expect("id").to_string();
        assert!(fs::metadata(saved["file_path"].as_str().expect("path")).is_ok());

        let loaded = call(&registry, &ctx, "load_dialog", json!({ "dialog_id": id })).await;
        let dialog = &loaded["dialog"];
        assert_eq!(dialog["id"], json!(id));
        assert_eq!(dialog["content"], json!("hello brave new world"));
        assert_eq!(dialog["metadata"], json!({ "source": { "app": "cli" } }));
        assert_eq!(dialog["char_count"], json!(21));
        assert_eq!(dialog["timestamp"], saved["timestamp"]);

        let content = call(
            &registry,
            &ctx,
            "load_dialog_content",
            json!({ "dialog_id": id }),
        )
        .await;
        assert_eq!(content, json!("hello brave new world"));
    }

    #[tokio::test]
    async fn save_context_formats_messages() {
        let (_temp, ctx, registry) = setup();
        let saved = call(
            &registry,
            &ctx,
            "save_current_context",
            json!({
                "messages": [
                    { "role": "user", "content": "what time is it" },
                    { "content": "no role here" }
                ]
            }),
        )
        .await;
        assert_eq!(saved["message_count"], json!(2));
        assert_eq!(
            saved["formatted_content"],
            json!("[USER]: what time is it\n\n[UNKNOWN]: no role here")
        );
        let id = saved["dialog_id"].as_str().expect("id");
        assert_eq!(saved["title"], json!(format!("Conversation {id}")));

        let last = call(&registry, &ctx, "load_last_dialog", Value::Null).await;
        assert_eq!(last["dialog"]["total_words"], json!(7));
    }

    #[tokio::test]
    async fn quick_save_and_recent() {
        let (_temp, ctx, registry) = setup();
        for text in ["first", "second", "third"] {
            call(&registry, &ctx, "quick_save", json!({ "text": text })).await;
        }
        let recent = call(
            &registry,
            &ctx,
            "get_recent_dialogs",
            json!({ "count": 2 }),
        )
        .await;
        assert_eq!(recent["total"], json!(2));
        let titles: Vec<&str> = recent["dialogs"]
            .as_array()
            .expect("dialogs")
            .iter()
            .map(|dialog| dialog["title"].as_str().expect("title"))
            .collect();
        assert!(titles.iter().all(|title| title.starts_with("Quick Save ")));
        assert_eq!(
            recent["storage_path"],
            json!(ctx.storage_path().display().to_string())
        );
    }

    #[tokio::test]
    async fn list_search_and_tag_filters() {
        let (_temp, ctx, registry) = setup();
        call(
            &registry,
            &ctx,
            "save_dialog",
            json!({ "content": "nothing relevant", "title": "Alpha Notes", "tags": ["x"] }),
        )
        .await;
        call(
            &registry,
            &ctx,
            "save_dialog",
            json!({ "content": "needle found here", "title": "Beta Log", "tags": ["x", "y"] }),
        )
        .await;

        let found = call(
            &registry,
            &ctx,
            "search_dialogs",
            json!({ "query": "NEEDLE" }),
        )
        .await;
        assert_eq!(found["total"], json!(1));
        assert_eq!(found["dialogs"][0]["title"], json!("Beta Log"));

        let tagged = call(&registry, &ctx, "get_dialogs_by_tag", json!({ "tag": "y" })).await;
        assert_eq!(tagged["total"], json!(1));

        let listed = call(
            &registry,
            &ctx,
            "list_dialogs",
            json!({ "tags": ["x"], "search": "notes" }),
        )
        .await;
        assert_eq!(listed["total"], json!(1));
        assert_eq!(listed["dialogs"][0]["title"], json!("Alpha Notes"));
        assert_eq!(listed["dialogs"][0]["kind"], json!("text"));

        let padded = call(
            &registry,
            &ctx,
            "list_dialogs",
            json!({ "tags": [" y ", ""] }),
        )
        .await;
        assert_eq!(padded["total"], json!(1));
        assert_eq!(padded["dialogs"][0]["title"], json!("Beta Log"));

        let none = call(&registry, &ctx, "list_dialogs", json!({ "tags": ["z"] })).await;
        assert_eq!(none["total"], json!(0));
        assert_eq!(none["dialogs"], json!([]));
    }

    #[tokio::test]
    async fn manage_tools_update_and_delete() {
        let (temp, ctx, registry) = setup();
        let saved = call(
            &registry,
            &ctx,
            "save_dialog",
            json!({ "content": "keep", "title": "Before", "tags": ["old"] }),
        )
        .await;
        let id = saved["dialog_id"].as_str().expect("id").to_string();

        let tags = call(
            &registry,
            &ctx,
            "update_dialog_tags",
            json!({ "dialog_id": id, "tags": ["new", "new", " other "] }),
        )
        .await;
        assert_eq!(tags["tags"], json!(["new", "other"]));

        let renamed = call(
            &registry,
            &ctx,
            "rename_dialog",
            json!({ "dialog_id": id, "new_title": "After" }),
        )
        .await;
        assert_eq!(renamed["old_title"], json!("Before"));
        assert_eq!(renamed["new_title"], json!("After"));

        let target = temp.path().join("out.md");
        let exported = call(
            &registry,
            &ctx,
            "export_dialog_as_markdown",
            json!({ "dialog_id": id, "output_path": target }),
        )
        .await;
        assert_eq!(exported["file_path"], json!(target.display().to_string()));
        let markdown = fs::read_to_string(&target).expect("markdown");
        assert!(markdown.starts_with("# After"));
        assert!(markdown.contains("**Tags:** new, other"));

        let info = call(&registry, &ctx, "get_storage_info", json!({})).await;
        assert_eq!(info["total_dialogs"], json!(1));

        call(&registry, &ctx, "delete_dialog", json!({ "dialog_id": id })).await;
        let err = registry
            .call(&ctx, "load_dialog", json!({ "dialog_id": id }))
            .await
            .expect_err("deleted");
        assert_eq!(dialog_kind(err), ErrorKind::NotFound);

        let err = registry
            .call(&ctx, "delete_dialog", json!({ "dialog_id": id }))
            .await
            .expect_err("already deleted");
        assert_eq!(dialog_kind(err), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn empty_store_and_bad_arguments() {
        let (_temp, ctx, registry) = setup();
        let err = registry
            .call(&ctx, "load_last_dialog", json!({}))
            .await
            .expect_err("empty");
        assert_eq!(dialog_kind(err), ErrorKind::NotFound);

        let err = registry
            .call(&ctx, "save_dialog", json!({ "title": "no content" }))
            .await
            .expect_err("missing content");
        assert!(matches!(err, ToolError::InvalidArguments(_)));

        let err = registry
            .call(&ctx, "load_dialog", json!({ "dialog_id": "../escape" }))
            .await
            .expect_err("invalid id");
        assert_eq!(dialog_kind(err), ErrorKind::InvalidId);
    }
}

//! Registry for tool implementations.

use crate::context::ToolContext;
use crate::tool::{Tool, ToolSpec};
use dialog_rs_protocol::ToolError;
use log::{debug, warn};
use parking_lot::RwLock;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// In-memory registry for tool implementations.
#[derive(Default, Clone)]
pub struct ToolRegistry {
    /// Map of tool name to implementation.
    tools: Arc<RwLock<HashMap<String, Arc<dyn Tool>>>>,
}

impl ToolRegistry {
    /// Create an empty tool registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool by name, replacing any tool with the same name.
    pub fn register(&self, tool: Arc<dyn Tool>) {
        debug!("registering tool (name={})", tool.name());
        self.tools.write().insert(tool.name().to_string(), tool);
    }

    /// Fetch a tool by name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.read().get(name).cloned()
    }

    /// List registered tool names, sorted.
    pub fn list(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tools.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Return tool specs sorted by name.
    pub fn specs(&self) -> Vec<ToolSpec> {
        let mut specs: Vec<ToolSpec> = self.tools.read().values().map(|tool| tool.spec()).collect();
        specs.sort_by(|left, right| left.name.cmp(&right.name));
        specs
    }

    /// Look up a tool by name and invoke it.
    pub async fn call(
        &self,
        ctx: &ToolContext,
        name: &str,
        args: Value,
    ) -> Result<Value, ToolError> {
        let Some(tool) = self.get(name) else {
            warn!("unknown tool requested (name={})", name);
            return Err(ToolError::ToolNotFound(name.to_string()));
        };
        debug!("calling tool (name={})", name);
        let result = tool.call(ctx, args).await;
        if let Err(err) = &result {
            debug!("tool failed (name={}, kind={}): {}", name, err.kind_str(), err);
        }
        result
    }
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.list())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::ToolRegistry;
    use crate::{Tool, ToolContext};
    use async_trait::async_trait;
    use dialog_rs_protocol::ToolError;
    use dialog_rs_store::{DialogStore, QueryLimits};
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::fmt;
    use std::sync::Arc;
    use tempfile::tempdir;

    #[derive(Clone)]
    struct EchoTool {
        name: &'static str,
    }

    impl fmt::Debug for EchoTool {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "EchoTool({})", self.name)
        }
    }

    #[async_trait]
    impl Tool for EchoTool {
        fn name(&self) -> &str {
            self.name
        }

        fn description(&self) -> &str {
            "echo"
        }

        fn args_schema(&self) -> serde_json::Value {
            json!({})
        }

        async fn call(
            &self,
            _ctx: &ToolContext,
            args: serde_json::Value,
        ) -> Result<serde_json::Value, ToolError> {
            Ok(json!({ "echo": args }))
        }
    }

    #[test]
    fn registry_tracks_tools_and_specs() {
        let registry = ToolRegistry::new();
        registry.register(Arc::new(EchoTool { name: "save" }));
        registry.register(Arc::new(EchoTool { name: "load" }));

        assert_eq!(registry.list(), vec!["load", "save"]);
        let spec_names = registry
            .specs()
            .into_iter()
            .map(|spec| spec.name)
            .collect::<Vec<_>>();
        assert_eq!(spec_names, vec!["load", "save"]);
    }

    #[tokio::test]
    async fn call_dispatches_by_name() {
        let temp = tempdir().expect("tempdir");
        let store = DialogStore::open(temp.path()).expect("open");
        let ctx = ToolContext::new(store, QueryLimits::default());
        let registry = ToolRegistry::new();
        registry.register(Arc::new(EchoTool { name: "echo" }));

        let result = registry
            .call(&ctx, "echo", json!({ "x": 1 }))
            .await
            .expect("call");
        assert_eq!(result, json!({ "echo": { "x": 1 } }));

        let err = registry
            .call(&ctx, "missing", json!({}))
            .await
            .expect_err("unknown tool");
        assert!(matches!(err, ToolError::ToolNotFound(name) if name == "missing"));
    }
}

//! Public surface for the dialog manager.
//!
//! Re-exports the building blocks and wires them into a [`DialogManager`]
//! that answers dispatcher requests.

pub mod server;

/// Re-export for convenience.
pub use dialog_rs_config as config;
/// Re-export for convenience.
pub use dialog_rs_protocol as protocol;
/// Re-export for convenience.
pub use dialog_rs_store as store;
/// Re-export for convenience.
pub use dialog_rs_tools as tools;

use dialog_rs_config::DialogConfig;
use dialog_rs_protocol::{
    CallToolParams, METHOD_RESOURCES_LIST, METHOD_RESOURCES_READ, METHOD_TOOLS_CALL,
    METHOD_TOOLS_LIST, ReadResourceParams, Request, Response, ToolError,
};
use dialog_rs_store::StoreError;
use dialog_rs_tools::{ResourceContents, ToolContext, ToolRegistry, ToolSpec};
use log::{debug, info};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

/// Error kind reported for requests that cannot be understood.
pub const INVALID_REQUEST: &str = "invalid_request";
/// Error kind reported for unknown methods.
pub const METHOD_NOT_FOUND: &str = "method_not_found";

/// Initialize `env_logger` on stderr with `level` as the default filter.
///
/// `RUST_LOG` directives take precedence over `level`. Repeated calls are
/// ignored.
pub fn init_logging(level: &str) {
    let _ = env_logger::Builder::new()
        .parse_filters(level)
        .parse_default_env()
        .format_timestamp_millis()
        .target(env_logger::Target::Stderr)
        .try_init();
}

/// Tools, resources and storage wired from one config.
#[derive(Debug, Clone)]
pub struct DialogManager {
    config: DialogConfig,
    ctx: ToolContext,
    registry: ToolRegistry,
}

impl DialogManager {
    /// Open the configured store and register the dialog tools.
    pub fn from_config(config: DialogConfig) -> Result<Self, StoreError> {
        let ctx = ToolContext::from_config(&config)?;
        let registry = dialog_rs_tools::dialog_tool_registry();
        info!(
            "dialog manager ready (name={}, storage={})",
            config.server.name,
            ctx.storage_path().display()
        );
        Ok(Self {
            config,
            ctx,
            registry,
        })
    }

    pub fn config(&self) -> &DialogConfig {
        &self.config
    }

    pub fn context(&self) -> &ToolContext {
        &self.ctx
    }

    /// Specs of every registered tool.
    pub fn tool_specs(&self) -> Vec<ToolSpec> {
        self.registry.specs()
    }

    /// Invoke a tool by name.
    pub async fn call_tool(&self, name: &str, args: Value) -> Result<Value, ToolError> {
        self.registry.call(&self.ctx, name, args).await
    }

    /// Read a resource by uri.
    pub fn read_resource(&self, uri: &str) -> Result<ResourceContents, ToolError> {
        dialog_rs_tools::read_resource(&self.ctx, uri)
    }

    /// Answer one dispatcher request.
    pub async fn handle(&self, request: Request) -> Response {
        let Request { id, method, params } = request;
        debug!("handling request (method={})", method);
        match method.as_str() {
            METHOD_TOOLS_LIST => Response::success(
                id,
                json!({ "server": self.config.server.name, "tools": self.tool_specs() }),
            ),
            METHOD_TOOLS_CALL => {
                let params: CallToolParams = match decode_params(params) {
                    Ok(params) => params,
                    Err(message) => return Response::failure(id, INVALID_REQUEST, message),
                };
                match self.call_tool(&params.name, params.arguments).await {
                    Ok(result) => Response::success(id, result),
                    Err(err) => Response::from_tool_error(id, &err),
                }
            }
            METHOD_RESOURCES_LIST => Response::success(
                id,
                json!({ "resources": dialog_rs_tools::resource_specs() }),
            ),
            METHOD_RESOURCES_READ => {
                let params: ReadResourceParams = match decode_params(params) {
                    Ok(params) => params,
                    Err(message) => return Response::failure(id, INVALID_REQUEST, message),
                };
                match self.read_resource(&params.uri) {
                    Ok(contents) => Response::success(id, json!(contents)),
                    Err(err) => Response::from_tool_error(id, &err),
                }
            }
            other => Response::failure(id, METHOD_NOT_FOUND, format!("unknown method: {other}")),
        }
    }
}

fn decode_params<T: DeserializeOwned>(params: Value) -> Result<T, String> {
    serde_json::from_value(params).map_err(|err| format!("invalid params: {err}"))
}

#[cfg(test)]
mod tests {
    use super::{DialogManager, INVALID_REQUEST, METHOD_NOT_FOUND};
    use dialog_rs_config::DialogConfig;
    use dialog_rs_protocol::Request;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use tempfile::tempdir;

    fn request(method: &str, params: serde_json::Value) -> Request {
        Request {
            id: json!(1),
            method: method.to_string(),
            params,
        }
    }

    #[tokio::test]
    async fn tools_list_reports_server_name() {
        let temp = tempdir().expect("tempdir");
        let config = DialogConfig::builder()
            .server_name("Test Dialogs")
            .storage_path(temp.path())
            .build();
        let manager = DialogManager::from_config(config).expect("manager");

        let response = manager
            .handle(request("tools/list", serde_json::Value::Null))
            .await;
        let result = response.result.expect("result");
        assert_eq!(result["server"], json!("Test Dialogs"));
        assert_eq!(result["tools"].as_array().map(Vec::len), Some(15));
    }

    #[tokio::test]
    async fn bad_params_and_unknown_methods_fail() {
        let temp = tempdir().expect("tempdir");
        let config = DialogConfig::builder().storage_path(temp.path()).build();
        let manager = DialogManager::from_config(config).expect("manager");

        let response = manager
            .handle(request("tools/call", json!({ "arguments": {} })))
            .await;
        assert_eq!(response.error.expect("error").kind, INVALID_REQUEST);

        let response = manager.handle(request("shutdown", json!({}))).await;
        assert_eq!(response.error.expect("error").kind, METHOD_NOT_FOUND);
    }
}

//! Wire protocol types shared by the dialog store, tools, and dispatcher.

mod tool;

pub use tool::{ErrorKind, ToolError};

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Method name for listing tool specs.
pub const METHOD_TOOLS_LIST: &str = "tools/list";
/// Method name for invoking a tool.
pub const METHOD_TOOLS_CALL: &str = "tools/call";
/// Method name for listing resource descriptors.
pub const METHOD_RESOURCES_LIST: &str = "resources/list";
/// Method name for reading a resource.
pub const METHOD_RESOURCES_READ: &str = "resources/read";

/// One request read from the dispatcher channel.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Request {
    /// Caller supplied correlation id, echoed on the response.
    #[serde(default)]
    pub id: Value,
    /// Method name (`tools/call`, `resources/read`, ...).
    pub method: String,
    /// Method parameters.
    #[serde(default)]
    pub params: Value,
}

/// Parameters for `tools/call`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CallToolParams {
    /// Tool name.
    pub name: String,
    /// Tool arguments as a JSON object.
    #[serde(default = "empty_object")]
    pub arguments: Value,
}

/// Parameters for `resources/read`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReadResourceParams {
    /// Resource uri, e.g. `dialog://20240101_120000`.
    pub uri: String,
}

/// One response written to the dispatcher channel.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Response {
    /// Correlation id copied from the request.
    pub id: Value,
    /// Successful result payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    /// Failure payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ResponseError>,
}

impl Response {
    /// Build a successful response.
    pub fn success(id: Value, result: Value) -> Self {
        Self {
            id,
            result: Some(result),
            error: None,
        }
    }

    /// Build a failure response.
    pub fn failure(id: Value, kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            id,
            result: None,
            error: Some(ResponseError {
                kind: kind.into(),
                message: message.into(),
            }),
        }
    }

    /// Build a failure response from a tool error.
    pub fn from_tool_error(id: Value, err: &ToolError) -> Self {
        Self::failure(id, err.kind_str(), err.to_string())
    }
}

/// Error payload carried by a failed response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResponseError {
    /// Machine readable error kind.
    pub kind: String,
    /// Human readable message.
    pub message: String,
}

/// Descriptor for a read-only resource exposed next to the tools.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResourceSpec {
    /// Uri or uri template (`dialog://{dialog_id}`).
    pub uri: String,
    /// Short name.
    pub name: String,
    /// What the resource returns.
    pub description: String,
    /// Mime type of the rendered content.
    pub mime_type: String,
}

fn empty_object() -> Value {
    Value::Object(serde_json::Map::new())
}

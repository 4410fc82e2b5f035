//! Dialog tools and resources exposed to the dispatcher.

pub mod builtins;
pub mod context;
pub mod registry;
pub mod resources;
pub mod tool;

/// Dialog tool registry and registration helper.
pub use builtins::{dialog_tool_registry, register_dialog_tools};
/// Tool execution context.
pub use context::ToolContext;
/// Tool registry type.
pub use registry::ToolRegistry;
/// Resource readers and descriptors.
pub use resources::{ResourceContents, read_resource, resource_specs};
/// Tool trait and spec type.
pub use tool::{Tool, ToolSpec};

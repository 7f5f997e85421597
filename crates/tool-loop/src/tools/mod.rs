//! A set of built-in tools that models can use.

mod glob;
mod read_file;
mod shell;

use serde::de::DeserializeOwned;
use tool_loop_core::tool::{Error as ToolError, ToolResult};

pub use self::glob::GlobTool;
pub use self::read_file::ReadFileTool;
pub use self::shell::ShellTool;

fn parse_json<T: DeserializeOwned>(arguments: &str) -> ToolResult<T> {
    serde_json::from_str(arguments)
        .map_err(|err| ToolError::invalid_input().with_reason(err.to_string()))
}

use std::path::Path;

use schemars::JsonSchema;
use serde::Deserialize;
use tokio::task::spawn_blocking;
use tool_loop_core::tool::{Error as ToolError, FunctionTool, ToolResult};

use super::parse_json;

const MAX_MATCHES: usize = 50;

/// Input of [`GlobTool`].
#[derive(Debug, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct GlobToolParameters {
    /// The glob pattern, must be relative to `path`.
    pattern: String,
    /// Absolute path to search in.
    path: String,
}

/// A tool for finding files using glob patterns.
#[derive(Clone, Copy, Debug, Default)]
pub struct GlobTool;

impl GlobTool {
    /// Creates a new glob tool.
    #[inline]
    pub fn new() -> Self {
        GlobTool
    }
}

impl FunctionTool for GlobTool {
    type Input = GlobToolParameters;
    type Output = String;

    fn name(&self) -> &str {
        "glob"
    }

    fn description(&self) -> &str {
        r#"
Find files and directories using glob patterns.
This tool supports standard glob syntax like *, ?, and ** for recursive searches.
Returns one path per line, at most 50 of them."#
    }

    fn parse_input(&self, arguments: &str) -> ToolResult<Self::Input> {
        let input: GlobToolParameters = parse_json(arguments)?;
        if Path::new(&input.pattern).is_absolute() {
            return Err(ToolError::invalid_input()
                .with_reason("`pattern` must be relative to `path`"));
        }
        if !Path::new(&input.path).is_absolute() {
            return Err(ToolError::invalid_input()
                .with_reason("`path` must be absolute"));
        }
        Ok(input)
    }

    fn execute(
        &self,
        input: GlobToolParameters,
    ) -> impl Future<Output = ToolResult> + Send + 'static {
        async move {
            let pattern = Path::new(&input.path).join(&input.pattern);
            let paths = glob::glob(&pattern.to_string_lossy())
                .map_err(|err| ToolError::caused_by(&err))?;

            spawn_blocking(move || collect_matches(paths))
                .await
                .map_err(|err| ToolError::caused_by(&err))
        }
    }
}

fn collect_matches(paths: glob::Paths) -> String {
    let mut result = String::new();
    let mut count = 0;
    // Unreadable entries are skipped rather than failing the whole search.
    for path in paths.flatten() {
        if count == MAX_MATCHES {
            result.push_str("(more matches omitted, narrow the pattern)\n");
            break;
        }
        result.push_str(&path.to_string_lossy());
        result.push('\n');
        count += 1;
    }
    if count == 0 {
        result.push_str("(no matches)\n");
    }
    result
}

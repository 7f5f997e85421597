use std::fmt::Write as _;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use schemars::JsonSchema;
use serde::Deserialize;
use tokio::task::spawn_blocking;
use tool_loop_core::tool::{Error as ToolError, FunctionTool, ToolResult};

use super::parse_json;

const MAX_LINES: usize = 50;

/// A file section to read.
#[derive(Debug, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct ReadFileItem {
    /// Absolute path to the file.
    path: String,
    /// 1-based line to start reading from, use 1 for the beginning.
    start_line: usize,
}

/// Input of [`ReadFileTool`].
#[derive(Debug, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct ReadFileParameters {
    /// Files to read.
    files: Vec<ReadFileItem>,
}

/// A tool for reading file content with line numbers.
#[derive(Clone, Copy, Debug, Default)]
pub struct ReadFileTool;

impl ReadFileTool {
    /// Creates a new read file tool.
    #[inline]
    pub fn new() -> Self {
        ReadFileTool
    }
}

impl FunctionTool for ReadFileTool {
    type Input = ReadFileParameters;
    type Output = String;

    fn name(&self) -> &str {
        "read_file"
    }

    fn description(&self) -> &str {
        r#"
Reads files from absolute paths and returns their contents prefixed with line numbers.
Each file includes a path and a 1-based start line, and returns up to 50 lines."#
    }

    fn parse_input(&self, arguments: &str) -> ToolResult<Self::Input> {
        let input: ReadFileParameters = parse_json(arguments)?;
        for file in &input.files {
            if !Path::new(&file.path).is_absolute() {
                let reason = format!("`{}`: path must be absolute", file.path);
                return Err(ToolError::invalid_input().with_reason(reason));
            }
            if file.start_line == 0 {
                return Err(ToolError::invalid_input()
                    .with_reason("`start_line` must be 1-based"));
            }
        }
        Ok(input)
    }

    fn execute(
        &self,
        input: ReadFileParameters,
    ) -> impl Future<Output = ToolResult> + Send + 'static {
        async move {
            spawn_blocking(move || {
                let mut result = String::new();
                for file in &input.files {
                    if !result.is_empty() {
                        result.push('\n');
                    }
                    result.push_str(&read_file_section(
                        &file.path,
                        file.start_line,
                    )?);
                }
                Ok(result)
            })
            .await
            .map_err(|err| ToolError::caused_by(&err))?
        }
    }
}

fn read_file_section(path: &str, start_line: usize) -> ToolResult {
    let file = File::open(path).map_err(|err| {
        ToolError::caused_by(&err).with_reason(format!("`{path}`: {err}"))
    })?;
    format_reader_section(path, file, start_line)
}

fn format_reader_section<R: Read>(
    path: &str,
    reader: R,
    start_line: usize,
) -> ToolResult {
    let mut result = format!("==> {path} <==\n");
    let lines = BufReader::new(reader)
        .lines()
        .skip(start_line - 1)
        .take(MAX_LINES);
    let width = start_line.saturating_add(MAX_LINES - 1).to_string().len();
    for (offset, line) in lines.enumerate() {
        let line = line.map_err(|err| ToolError::caused_by(&err))?;
        let line_no = start_line.saturating_add(offset);
        // Writing into a `String` never fails.
        let _ = writeln!(result, "{line_no:>width$}: {line}");
    }
    Ok(result)
}

use std::env;
use std::io;
use std::process::Stdio;

use tokio::process::Command;
use tool_loop_core::tool::{CustomTool, Error as ToolError, ToolResult};

/// A tool for running shell commands.
///
/// The model sends the command line as free-form text, which is run by the
/// user's shell (`$SHELL`, or `/bin/sh`). There is no sandbox, only enable
/// it for models you trust.
#[derive(Clone, Copy, Debug, Default)]
pub struct ShellTool;

impl ShellTool {
    /// Creates a new shell tool.
    #[inline]
    pub fn new() -> Self {
        ShellTool
    }
}

impl CustomTool for ShellTool {
    fn name(&self) -> &str {
        "shell"
    }

    fn description(&self) -> &str {
        r#"
Runs arbitrary commands like using a terminal. The input is the raw command line.
The command line should be single line if possible. Strings collected from stdout and stderr will be returned as the tool's output."#
    }

    fn execute(
        &self,
        input: String,
    ) -> impl Future<Output = ToolResult> + Send + 'static {
        async move {
            let cmdline = input.trim();
            if cmdline.is_empty() {
                return Err(ToolError::invalid_input()
                    .with_reason("the command line is empty"));
            }
            run_command_line(cmdline)
                .await
                .map_err(|err| ToolError::caused_by(&err))
        }
    }
}

#[inline]
fn create_command_with_inferred_shell() -> Command {
    let Some(shell) = env::var_os("SHELL") else {
        return Command::new("/bin/sh");
    };
    Command::new(shell)
}

async fn run_command_line(cmdline: &str) -> Result<String, io::Error> {
    let output = create_command_with_inferred_shell()
        .arg("-c")
        .arg(cmdline)
        .stdin(Stdio::null())
        .kill_on_drop(true)
        .output()
        .await?;

    let mut result = String::new();
    if !output.stdout.is_empty() {
        result.push_str("==> STDOUT <==\n");
        result.push_str(&String::from_utf8_lossy(&output.stdout));
    }
    if !output.stderr.is_empty() {
        if !result.is_empty() {
            result.push('\n');
        }
        result.push_str("==> STDERR <==\n");
        result.push_str(&String::from_utf8_lossy(&output.stderr));
    }
    if !output.status.success() {
        if !result.is_empty() {
            result.push('\n');
        }
        result.push_str(&format!("==> EXIT: {} <==\n", output.status));
    }
    Ok(result)
}

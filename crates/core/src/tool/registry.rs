use std::collections::HashMap;
use std::collections::hash_map::Entry;

use futures_util::future::join_all;
use tool_loop_model::{ModelTool, ToolCallRequest, ToolCallResult, ToolOutput};
use tracing::Instrument;

use super::AnyTool;

/// The payload returned for a tool call whose name is not registered.
pub const NO_OUTPUT: &str = "There's no output.";

/// A toolset built once per agent, which resolves tool calls by name.
///
/// Names are expected to be unique. If several tools share the same name,
/// the first registered one wins; the later ones are never invoked and
/// not advertised to the model.
#[derive(Default)]
pub(crate) struct Registry {
    tools: Vec<AnyTool>,
    index: HashMap<String, usize>,
    definitions: Vec<ModelTool>,
}

impl Registry {
    pub fn with_tools(tools: Vec<AnyTool>) -> Self {
        let mut index = HashMap::with_capacity(tools.len());
        let mut definitions = Vec::with_capacity(tools.len());
        for (idx, tool) in tools.iter().enumerate() {
            match index.entry(tool.name().to_owned()) {
                Entry::Vacant(entry) => {
                    entry.insert(idx);
                    definitions.push(tool.describe());
                }
                Entry::Occupied(_) => {
                    let name = tool.name();
                    warn!("tool `{name}` is shadowed by an earlier one");
                }
            }
        }
        Self {
            tools,
            index,
            definitions,
        }
    }

    #[inline]
    pub fn get(&self, name: &str) -> Option<&AnyTool> {
        self.index.get(name).map(|&idx| &self.tools[idx])
    }

    /// Definitions of the reachable tools, in registration order.
    #[inline]
    pub fn definitions(&self) -> &[ModelTool] {
        &self.definitions
    }

    /// Runs all the requested tool calls concurrently, and returns their
    /// results in request order once all of them have settled.
    pub async fn dispatch(
        &self,
        requests: &[ToolCallRequest],
    ) -> Vec<ToolCallResult> {
        let calls = requests.iter().map(|req| {
            let tool = self.get(&req.name);
            let span =
                debug_span!("tool execute", id = %req.id, name = %req.name);
            async move {
                let output = match tool {
                    Some(tool) => {
                        debug!("calling {}({})", req.name, req.arguments);
                        tool.execute(&req.arguments).await
                    }
                    None => {
                        warn!("tool not found: {}", req.name);
                        ToolOutput::failure(NO_OUTPUT)
                    }
                };
                trace!("tool output: {output:?}");
                ToolCallResult {
                    id: req.id.clone(),
                    output,
                }
            }
            .instrument(span)
        });
        join_all(calls)
            .instrument(debug_span!("tool registry", count = requests.len()))
            .await
    }
}

#[cfg(test)]
mod tests {
    use std::future::ready;
    use std::time::Duration;

    use schemars::JsonSchema;
    use serde::Deserialize;
    use tokio::time::sleep;

    use super::*;
    use crate::tool::{CustomTool, FunctionTool, ToolResult};

    #[derive(Deserialize, JsonSchema)]
    struct WaitInput {
        millis: u64,
    }

    struct WaitTool(&'static str);

    impl FunctionTool for WaitTool {
        type Input = WaitInput;
        type Output = String;

        fn name(&self) -> &str {
            self.0
        }

        fn description(&self) -> &str {
            "Waits for a while."
        }

        fn execute(
            &self,
            input: WaitInput,
        ) -> impl Future<Output = ToolResult<String>> + Send + 'static {
            let name = self.0;
            async move {
                sleep(Duration::from_millis(input.millis)).await;
                Ok(format!("{name} waited {}ms", input.millis))
            }
        }
    }

    struct NamedTool(&'static str, &'static str);

    impl CustomTool for NamedTool {
        fn name(&self) -> &str {
            self.0
        }

        fn description(&self) -> &str {
            "Replies with a fixed text."
        }

        fn execute(
            &self,
            _input: String,
        ) -> impl Future<Output = ToolResult> + Send + 'static {
            ready(Ok(self.1.to_owned()))
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_dispatch_keeps_request_order() {
        let registry = Registry::with_tools(vec![AnyTool::function(WaitTool(
            "wait",
        ))]);

        let requests = vec![
            ToolCallRequest::function("call:1", "wait", r#"{"millis":30}"#),
            ToolCallRequest::function("call:2", "missing", "{}"),
            ToolCallRequest::function("call:3", "wait", r#"{"millis":10}"#),
            ToolCallRequest::function("call:4", "wait", r#"{"millis":20}"#),
        ];
        let results = registry.dispatch(&requests).await;

        let ids = results.iter().map(|r| r.id.as_str()).collect::<Vec<_>>();
        assert_eq!(ids, ["call:1", "call:2", "call:3", "call:4"]);
        assert_eq!(results[0].output, ToolOutput::success("wait waited 30ms"));
        assert_eq!(results[1].output, ToolOutput::failure(NO_OUTPUT));
        assert_eq!(results[2].output, ToolOutput::success("wait waited 10ms"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_dispatch_runs_concurrently() {
        let registry = Registry::with_tools(vec![AnyTool::function(WaitTool(
            "wait",
        ))]);
        let requests = (0..4)
            .map(|i| {
                ToolCallRequest::function(
                    format!("call:{i}"),
                    "wait",
                    r#"{"millis":100}"#,
                )
            })
            .collect::<Vec<_>>();

        let started = tokio::time::Instant::now();
        let results = registry.dispatch(&requests).await;
        assert_eq!(results.len(), 4);
        assert!(started.elapsed() < Duration::from_millis(200));
    }

    #[tokio::test]
    async fn test_duplicate_names_resolve_to_first() {
        let registry = Registry::with_tools(vec![
            AnyTool::custom(NamedTool("greet", "first")),
            AnyTool::custom(NamedTool("other", "other")),
            AnyTool::custom(NamedTool("greet", "second")),
        ]);

        let names = registry
            .definitions()
            .iter()
            .map(|d| d.name.as_str())
            .collect::<Vec<_>>();
        assert_eq!(names, ["greet", "other"]);

        let results = registry
            .dispatch(&[ToolCallRequest::custom("call:1", "greet", "")])
            .await;
        assert_eq!(results[0].output, ToolOutput::success("first"));
    }

    #[test]
    fn test_empty_registry() {
        let registry = Registry::default();
        assert!(registry.definitions().is_empty());
        assert!(registry.get("anything").is_none());
    }
}

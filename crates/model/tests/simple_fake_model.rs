use std::error::Error;
use std::fmt::{self, Display, Formatter};
use std::time::Duration;

use tokio::time::sleep;
use tool_loop_model::{
    AssistantMessage, ErrorKind, ModelChoice, ModelFinishReason, ModelMessage,
    ModelProvider, ModelProviderError, ModelRequest, ModelResponse,
    ToolCallRequest,
};

#[derive(Debug)]
struct FakeModelProviderError(ErrorKind);

impl Display for FakeModelProviderError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

impl Error for FakeModelProviderError {}

impl ModelProviderError for FakeModelProviderError {
    fn kind(&self) -> ErrorKind {
        self.0
    }
}

/// Echoes the last user message, or calls `lookup` when asked to.
struct FakeModelProvider;

impl ModelProvider for FakeModelProvider {
    type Error = FakeModelProviderError;

    fn send_request(
        &self,
        req: &ModelRequest,
    ) -> impl Future<Output = Result<ModelResponse, Self::Error>> + Send + 'static
    {
        let last_user = req.messages.iter().rev().find_map(|msg| match msg {
            ModelMessage::User(text) => Some(text.clone()),
            _ => None,
        });
        let has_tools = !req.tools.is_empty();

        async move {
            sleep(Duration::from_millis(1)).await;
            let Some(input) = last_user else {
                return Err(FakeModelProviderError(ErrorKind::Other));
            };

            let choice = if has_tools && input.starts_with("lookup ") {
                ModelChoice {
                    finish_reason: ModelFinishReason::ToolCalls,
                    message: AssistantMessage {
                        tool_calls: vec![ToolCallRequest::function(
                            "call:0",
                            "lookup",
                            format!(r#"{{"key":"{}"}}"#, &input[7..]),
                        )],
                        ..Default::default()
                    },
                }
            } else {
                ModelChoice {
                    finish_reason: ModelFinishReason::Stop,
                    message: AssistantMessage {
                        content: format!("You said {input}"),
                        ..Default::default()
                    },
                }
            };
            Ok(ModelResponse {
                choices: vec![choice],
            })
        }
    }
}

mod tests {
    use serde_json::json;
    use tool_loop_model::{ModelTool, ModelToolKind, ToolKind};

    use super::*;

    #[tokio::test]
    async fn test_completion() {
        let provider = FakeModelProvider;
        let req = ModelRequest {
            model: "fake".to_owned(),
            messages: vec![ModelMessage::User("Good morning".to_string())],
            tools: vec![],
        };
        let resp = provider.send_request(&req).await.unwrap();

        assert_eq!(resp.choices.len(), 1);
        assert_eq!(resp.choices[0].finish_reason, ModelFinishReason::Stop);
        assert_eq!(resp.choices[0].message.content, "You said Good morning");
    }

    #[tokio::test]
    async fn test_tool_call() {
        let provider = FakeModelProvider;
        let req = ModelRequest {
            model: "fake".to_owned(),
            messages: vec![
                ModelMessage::System("Be brief.".to_owned()),
                ModelMessage::User("lookup weather".to_owned()),
            ],
            tools: vec![ModelTool {
                name: "lookup".to_owned(),
                description: "Looks up a key".to_owned(),
                kind: ModelToolKind::Function {
                    parameters: json!({
                        "type": "object",
                        "properties": { "key": { "type": "string" } },
                        "required": ["key"],
                        "additionalProperties": false
                    }),
                    strict: true,
                },
            }],
        };
        let resp = provider.send_request(&req).await.unwrap();

        let choice = &resp.choices[0];
        assert_eq!(choice.finish_reason, ModelFinishReason::ToolCalls);
        let tool_call = &choice.message.tool_calls[0];
        assert_eq!(tool_call.kind, ToolKind::Function);
        assert_eq!(tool_call.arguments, r#"{"key":"weather"}"#);
    }

    #[tokio::test]
    async fn test_error() {
        let provider = FakeModelProvider;
        let req = ModelRequest {
            model: "fake".to_owned(),
            messages: vec![],
            tools: vec![],
        };
        let result = provider.send_request(&req).await;
        let err = result.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Other);
    }
}

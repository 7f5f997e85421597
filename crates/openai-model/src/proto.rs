use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tool_loop_model::{
    AssistantMessage, ModelChoice, ModelFinishReason, ModelMessage,
    ModelRequest, ModelResponse, ModelTool, ModelToolKind, ToolCallRequest,
    ToolKind,
};

use crate::OpenAIConfig;

// ------------------------------------
// Types exchanged in both directions
// ------------------------------------

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FunctionCall {
    pub name: String,
    #[serde(default)]
    pub arguments: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CustomCall {
    pub name: String,
    #[serde(default)]
    pub input: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ToolCall {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub r#type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function: Option<FunctionCall>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom: Option<CustomCall>,
}

// ------------------------------
// Types received from the server
// ------------------------------

#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize)]
pub struct ChatCompletion {
    #[serde(default)]
    pub choices: Vec<Choice>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize)]
pub struct Choice {
    pub finish_reason: Option<String>,
    pub message: ResponseMessage,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize)]
pub struct ResponseMessage {
    pub content: Option<String>,
    pub tool_calls: Option<Vec<ToolCall>>,
    pub reasoning_content: Option<String>,
}

// ------------------------
// Types sent to the server
// ------------------------

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
struct FunctionDefinition {
    name: String,
    description: String,
    parameters: Value,
    strict: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
struct CustomDefinition {
    name: String,
    description: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum Tool {
    Function { function: FunctionDefinition },
    Custom { custom: CustomDefinition },
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum Message {
    System {
        content: String,
    },
    User {
        content: String,
    },
    Assistant {
        content: Option<String>,
        #[serde(skip_serializing_if = "Vec::is_empty")]
        tool_calls: Vec<ToolCall>,
    },
    Tool {
        tool_call_id: String,
        content: String,
    },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ChatCompletionRequest {
    model: String,
    messages: Vec<Message>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<Tool>,
    stream: bool,
}

// -----------
// Conversions
// -----------

pub fn create_request(
    req: &ModelRequest,
    config: &OpenAIConfig,
) -> ChatCompletionRequest {
    ChatCompletionRequest {
        model: config.resolve_model(&req.model).to_owned(),
        messages: req.messages.iter().map(create_message).collect(),
        tools: req.tools.iter().map(create_tool).collect(),
        stream: false,
    }
}

fn create_message(msg: &ModelMessage) -> Message {
    match msg {
        ModelMessage::System(content) => Message::System {
            content: content.clone(),
        },
        ModelMessage::User(content) => Message::User {
            content: content.clone(),
        },
        ModelMessage::Assistant(msg) => Message::Assistant {
            // Tool call turns usually carry no text, which must be sent as
            // `null` rather than an empty string.
            content: if msg.content.is_empty() && !msg.tool_calls.is_empty() {
                None
            } else {
                Some(msg.content.clone())
            },
            tool_calls: msg.tool_calls.iter().map(create_tool_call).collect(),
        },
        ModelMessage::Tool(result) => Message::Tool {
            tool_call_id: result.id.clone(),
            content: json!({
                "success": result.output.success,
                "payload": result.output.payload,
            })
            .to_string(),
        },
    }
}

fn create_tool_call(call: &ToolCallRequest) -> ToolCall {
    match call.kind {
        ToolKind::Function => ToolCall {
            id: call.id.clone(),
            r#type: Some("function".to_owned()),
            function: Some(FunctionCall {
                name: call.name.clone(),
                arguments: call.arguments.clone(),
            }),
            custom: None,
        },
        ToolKind::Custom => ToolCall {
            id: call.id.clone(),
            r#type: Some("custom".to_owned()),
            function: None,
            custom: Some(CustomCall {
                name: call.name.clone(),
                input: call.arguments.clone(),
            }),
        },
    }
}

fn create_tool(tool: &ModelTool) -> Tool {
    match &tool.kind {
        ModelToolKind::Function { parameters, strict } => Tool::Function {
            function: FunctionDefinition {
                name: tool.name.clone(),
                description: tool.description.clone(),
                parameters: parameters.clone(),
                strict: *strict,
            },
        },
        ModelToolKind::Custom => Tool::Custom {
            custom: CustomDefinition {
                name: tool.name.clone(),
                description: tool.description.clone(),
            },
        },
    }
}

pub fn parse_response(completion: ChatCompletion) -> ModelResponse {
    ModelResponse {
        choices: completion.choices.into_iter().map(parse_choice).collect(),
    }
}

fn parse_choice(choice: Choice) -> ModelChoice {
    let Choice {
        finish_reason,
        message,
    } = choice;
    let tool_calls: Vec<_> = message
        .tool_calls
        .unwrap_or_default()
        .into_iter()
        .filter_map(parse_tool_call)
        .collect();
    let mut finish_reason = parse_finish_reason(finish_reason.as_deref());
    if finish_reason == ModelFinishReason::ToolCalls && tool_calls.is_empty() {
        warn!("no usable tool calls in the choice, treated as stop");
        finish_reason = ModelFinishReason::Stop;
    }
    ModelChoice {
        finish_reason,
        message: AssistantMessage {
            content: message.content.unwrap_or_default(),
            tool_calls,
            reasoning: message.reasoning_content,
        },
    }
}

fn parse_tool_call(call: ToolCall) -> Option<ToolCallRequest> {
    match call {
        ToolCall {
            id,
            custom: Some(custom),
            ..
        } => Some(ToolCallRequest::custom(id, custom.name, custom.input)),
        ToolCall {
            id,
            function: Some(function),
            ..
        } => Some(ToolCallRequest::function(
            id,
            function.name,
            function.arguments,
        )),
        // Dropped calls are also left out of the echoed assistant turn, so
        // the backend never sees an id without a matching tool message.
        ToolCall { id, r#type: ty, .. } => {
            warn!("ignoring tool call {id} of unsupported type {ty:?}");
            None
        }
    }
}

fn parse_finish_reason(finish_reason: Option<&str>) -> ModelFinishReason {
    match finish_reason {
        Some("tool_calls" | "function_call") => ModelFinishReason::ToolCalls,
        Some("stop") => ModelFinishReason::Stop,
        Some("content_filter") => ModelFinishReason::ContentFilter,
        Some("length") => ModelFinishReason::Length,
        other => {
            warn!("unexpected finish reason {other:?}, treated as stop");
            ModelFinishReason::Stop
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use tool_loop_model::{ToolCallResult, ToolOutput};

    use super::*;
    use crate::OpenAIConfigBuilder;

    #[test]
    fn test_create_request() {
        let request = ModelRequest {
            model: "flash".to_owned(),
            messages: vec![
                ModelMessage::System("You are a helpful assistant.".to_owned()),
                ModelMessage::User("List the files".to_owned()),
                ModelMessage::Assistant(AssistantMessage {
                    content: String::new(),
                    tool_calls: vec![
                        ToolCallRequest::function(
                            "call_1",
                            "glob",
                            r#"{"pattern":"*"}"#,
                        ),
                        ToolCallRequest::custom("call_2", "shell", "ls"),
                    ],
                    reasoning: Some("I should look around.".to_owned()),
                }),
                ModelMessage::Tool(ToolCallResult {
                    id: "call_1".to_owned(),
                    output: ToolOutput::success("a.txt"),
                }),
                ModelMessage::Tool(ToolCallResult {
                    id: "call_2".to_owned(),
                    output: ToolOutput::failure("denied"),
                }),
                ModelMessage::assistant("There is a.txt"),
            ],
            tools: vec![
                ModelTool {
                    name: "glob".to_owned(),
                    description: "Finds files.".to_owned(),
                    kind: ModelToolKind::Function {
                        parameters: json!({
                            "type": "object",
                            "properties": {
                                "pattern": { "type": "string" }
                            },
                            "required": ["pattern"],
                            "additionalProperties": false
                        }),
                        strict: true,
                    },
                },
                ModelTool {
                    name: "shell".to_owned(),
                    description: "Runs shell commands.".to_owned(),
                    kind: ModelToolKind::Custom,
                },
            ],
        };
        let config = OpenAIConfigBuilder::with_api_key("xxx")
            .with_model_alias("flash", "provider/flash-1")
            .build();

        let value =
            serde_json::to_value(create_request(&request, &config)).unwrap();
        let expected = json!({
            "model": "provider/flash-1",
            "messages": [
                {
                    "role": "system",
                    "content": "You are a helpful assistant."
                },
                { "role": "user", "content": "List the files" },
                {
                    "role": "assistant",
                    "content": null,
                    "tool_calls": [
                        {
                            "id": "call_1",
                            "type": "function",
                            "function": {
                                "name": "glob",
                                "arguments": "{\"pattern\":\"*\"}"
                            }
                        },
                        {
                            "id": "call_2",
                            "type": "custom",
                            "custom": { "name": "shell", "input": "ls" }
                        }
                    ]
                },
                {
                    "role": "tool",
                    "tool_call_id": "call_1",
                    "content": "{\"payload\":\"a.txt\",\"success\":true}"
                },
                {
                    "role": "tool",
                    "tool_call_id": "call_2",
                    "content": "{\"payload\":\"denied\",\"success\":false}"
                },
                { "role": "assistant", "content": "There is a.txt" }
            ],
            "tools": [
                {
                    "type": "function",
                    "function": {
                        "name": "glob",
                        "description": "Finds files.",
                        "parameters": {
                            "type": "object",
                            "properties": {
                                "pattern": { "type": "string" }
                            },
                            "required": ["pattern"],
                            "additionalProperties": false
                        },
                        "strict": true
                    }
                },
                {
                    "type": "custom",
                    "custom": {
                        "name": "shell",
                        "description": "Runs shell commands."
                    }
                }
            ],
            "stream": false
        });
        assert_eq!(value, expected);
    }

    #[test]
    fn test_create_request_without_tools() {
        let request = ModelRequest {
            model: "gpt-4o".to_owned(),
            messages: vec![ModelMessage::User("Hi".to_owned())],
            tools: vec![],
        };
        let config = OpenAIConfigBuilder::with_api_key("xxx").build();
        let value =
            serde_json::to_value(create_request(&request, &config)).unwrap();
        assert_eq!(value["model"], "gpt-4o");
        assert!(value.get("tools").is_none());
    }

    #[test]
    fn test_parse_response() {
        let completion: ChatCompletion = serde_json::from_value(json!({
            "id": "chatcmpl-1",
            "object": "chat.completion",
            "choices": [{
                "index": 0,
                "finish_reason": "tool_calls",
                "message": {
                    "role": "assistant",
                    "content": null,
                    "reasoning_content": "Need to read it.",
                    "tool_calls": [
                        {
                            "id": "call_1",
                            "type": "function",
                            "function": {
                                "name": "read_file",
                                "arguments": "{\"path\":\"todo.txt\"}"
                            }
                        },
                        {
                            "id": "call_2",
                            "type": "custom",
                            "custom": { "name": "shell", "input": "pwd" }
                        },
                        { "id": "call_3", "type": "mystery" }
                    ]
                }
            }],
            "usage": { "prompt_tokens": 10, "completion_tokens": 5 }
        }))
        .unwrap();

        let resp = parse_response(completion);
        assert_eq!(resp.choices.len(), 1);
        let choice = &resp.choices[0];
        assert_eq!(choice.finish_reason, ModelFinishReason::ToolCalls);
        assert_eq!(choice.message.content, "");
        assert_eq!(
            choice.message.reasoning.as_deref(),
            Some("Need to read it.")
        );
        assert_eq!(
            choice.message.tool_calls,
            [
                ToolCallRequest::function(
                    "call_1",
                    "read_file",
                    r#"{"path":"todo.txt"}"#,
                ),
                ToolCallRequest::custom("call_2", "shell", "pwd"),
            ]
        );
    }

    #[test]
    fn test_parse_response_without_usable_calls() {
        let completion: ChatCompletion = serde_json::from_value(json!({
            "choices": [{
                "finish_reason": "tool_calls",
                "message": {
                    "role": "assistant",
                    "content": "Let me check.",
                    "tool_calls": [{ "id": "call_1", "type": "mystery" }]
                }
            }]
        }))
        .unwrap();

        let resp = parse_response(completion);
        let choice = &resp.choices[0];
        assert_eq!(choice.finish_reason, ModelFinishReason::Stop);
        assert!(choice.message.tool_calls.is_empty());
        assert_eq!(choice.message.content, "Let me check.");
    }

    #[test]
    fn test_parse_finish_reason() {
        let cases = [
            (Some("tool_calls"), ModelFinishReason::ToolCalls),
            (Some("function_call"), ModelFinishReason::ToolCalls),
            (Some("stop"), ModelFinishReason::Stop),
            (Some("content_filter"), ModelFinishReason::ContentFilter),
            (Some("length"), ModelFinishReason::Length),
            (Some("eos"), ModelFinishReason::Stop),
            (None, ModelFinishReason::Stop),
        ];
        for (raw, expected) in cases {
            assert_eq!(parse_finish_reason(raw), expected, "{raw:?}");
        }
    }
}

use serde::{Deserialize, Serialize};

/// A complete response from the model provider.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModelResponse {
    /// Candidate completions. Most backends return exactly one.
    pub choices: Vec<ModelChoice>,
}

/// A candidate completion in a [`ModelResponse`].
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModelChoice {
    /// The reason why the model stopped generating this completion.
    pub finish_reason: ModelFinishReason,
    /// The generated message.
    pub message: AssistantMessage,
}

/// The reason why a model completion has finished.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelFinishReason {
    /// The model needs to call tools.
    ToolCalls,
    /// The model has finished generating text.
    Stop,
    /// The content was omitted by the backend's content filter.
    ContentFilter,
    /// The model ran out of its output or context budget.
    Length,
}

/// A message generated by the model.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssistantMessage {
    /// Text content, empty if the model only requested tool calls.
    pub content: String,
    /// Tool calls requested by the model.
    #[serde(default)]
    pub tool_calls: Vec<ToolCallRequest>,
    /// Reasoning text, for backends that expose it.
    #[serde(default)]
    pub reasoning: Option<String>,
}

/// The calling convention of a tool call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolKind {
    /// The arguments are a JSON document.
    Function,
    /// The arguments are free-form text.
    Custom,
}

/// Describes a tool call request from the model.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ToolCallRequest {
    /// The unique identifier for the tool call request.
    pub id: String,
    /// The name of the tool to call.
    pub name: String,
    /// The calling convention the model used.
    pub kind: ToolKind,
    /// The raw arguments, exactly as the model produced them.
    pub arguments: String,
}

impl ToolCallRequest {
    /// Creates a function-style tool call request.
    #[inline]
    pub fn function<I, N, A>(id: I, name: N, arguments: A) -> Self
    where
        I: Into<String>,
        N: Into<String>,
        A: Into<String>,
    {
        Self {
            id: id.into(),
            name: name.into(),
            kind: ToolKind::Function,
            arguments: arguments.into(),
        }
    }

    /// Creates a custom (free-form) tool call request.
    #[inline]
    pub fn custom<I, N, A>(id: I, name: N, input: A) -> Self
    where
        I: Into<String>,
        N: Into<String>,
        A: Into<String>,
    {
        Self {
            id: id.into(),
            name: name.into(),
            kind: ToolKind::Custom,
            arguments: input.into(),
        }
    }
}

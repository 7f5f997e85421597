use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::response::AssistantMessage;

/// A request to be sent to the model provider.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ModelRequest {
    /// Identifier of the model to sample from.
    pub model: String,
    /// The input messages, in conversation order.
    pub messages: Vec<ModelMessage>,
    /// Tools that are available to the model.
    pub tools: Vec<ModelTool>,
}

/// A complete message.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ModelMessage {
    /// The system instructions.
    System(String),
    /// A user input text.
    User(String),
    /// An assistant turn, possibly requesting tool calls.
    Assistant(AssistantMessage),
    /// A tool call result.
    Tool(ToolCallResult),
}

impl ModelMessage {
    /// Creates an assistant message with text content only.
    #[inline]
    pub fn assistant<S: Into<String>>(content: S) -> Self {
        Self::Assistant(AssistantMessage {
            content: content.into(),
            tool_calls: vec![],
            reasoning: None,
        })
    }

    /// Returns `true` if this is a user message.
    #[inline]
    pub fn is_user(&self) -> bool {
        matches!(self, Self::User(_))
    }
}

/// The result of calling a tool.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ToolCallResult {
    /// The unique identifier for the tool call request.
    pub id: String,
    /// The output of the tool call.
    pub output: ToolOutput,
}

/// The output of a tool invocation.
///
/// Tools never fail with an error value. Failures are reported to the
/// model as an output with `success` set to `false`, so that the model
/// can read the payload and correct itself.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ToolOutput {
    /// Whether the tool finished successfully.
    pub success: bool,
    /// The textual result, or the failure details.
    pub payload: String,
}

impl ToolOutput {
    /// Creates a successful output.
    #[inline]
    pub fn success<S: Into<String>>(payload: S) -> Self {
        Self {
            success: true,
            payload: payload.into(),
        }
    }

    /// Creates a failed output.
    #[inline]
    pub fn failure<S: Into<String>>(payload: S) -> Self {
        Self {
            success: false,
            payload: payload.into(),
        }
    }
}

/// Describes a tool that can be used by the model.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ModelTool {
    /// Name of the tool.
    pub name: String,
    /// Description of the tool.
    pub description: String,
    /// The calling convention of the tool.
    pub kind: ModelToolKind,
}

/// The calling convention of a [`ModelTool`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ModelToolKind {
    /// A tool that accepts structured arguments.
    Function {
        /// Parameters definition of the tool.
        ///
        /// For most model providers, the parameters should typically be
        /// defined by a [JSON schema](https://json-schema.org/).
        parameters: Value,
        /// Whether the backend should only propose arguments that match
        /// the schema exactly.
        strict: bool,
    },
    /// A tool that accepts free-form text input.
    Custom,
}

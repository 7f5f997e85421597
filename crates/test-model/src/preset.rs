use serde::{Deserialize, Serialize};
use tool_loop_model::{
    AssistantMessage, ModelChoice, ModelFinishReason, ModelResponse,
    ToolCallRequest,
};

/// The preset response for one backend request.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PresetResponse {
    /// Candidate completions in this response.
    pub choices: Vec<ModelChoice>,
    /// If set, the request will fail in the first `failure` attempts.
    /// `Some(0)` means the request will fail infinitely.
    pub failures: Option<u64>,
}

impl PresetResponse {
    /// Creates a `PresetResponse` with the specified choices.
    #[inline]
    pub fn with_choices(choices: impl Into<Vec<ModelChoice>>) -> Self {
        Self {
            choices: choices.into(),
            failures: None,
        }
    }

    /// A single completion that finishes with text content.
    #[inline]
    pub fn stop<S: Into<String>>(content: S) -> Self {
        Self::with_choices([ModelChoice {
            finish_reason: ModelFinishReason::Stop,
            message: AssistantMessage {
                content: content.into(),
                ..Default::default()
            },
        }])
    }

    /// A single completion that requests the given tool calls.
    #[inline]
    pub fn tool_calls(calls: impl Into<Vec<ToolCallRequest>>) -> Self {
        Self::with_choices([ModelChoice {
            finish_reason: ModelFinishReason::ToolCalls,
            message: AssistantMessage {
                tool_calls: calls.into(),
                ..Default::default()
            },
        }])
    }

    /// A single completion that was blocked by the content filter.
    #[inline]
    pub fn content_filter() -> Self {
        Self::with_choices([ModelChoice {
            finish_reason: ModelFinishReason::ContentFilter,
            message: AssistantMessage::default(),
        }])
    }

    /// A single completion that ran out of budget.
    #[inline]
    pub fn length<S: Into<String>>(partial: S) -> Self {
        Self::with_choices([ModelChoice {
            finish_reason: ModelFinishReason::Length,
            message: AssistantMessage {
                content: partial.into(),
                ..Default::default()
            },
        }])
    }

    /// A response without any completion.
    #[inline]
    pub fn empty() -> Self {
        Self::with_choices([])
    }

    /// Sets failure times before a successful response. `0` means the
    /// response will always be a failure.
    #[inline]
    pub fn with_failures(mut self, failures: u64) -> Self {
        self.failures = Some(failures);
        self
    }

    pub(crate) fn to_response(&self) -> ModelResponse {
        ModelResponse {
            choices: self.choices.clone(),
        }
    }
}

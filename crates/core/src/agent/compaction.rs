use tool_loop_model::{ModelMessage, ModelRequest, ModelResponse};

use super::{Agent, Error};
use crate::conversation::Context;

/// The system instruction for the summarization request.
pub(crate) const COMPACTION_INSTRUCTION: &str = "\
You are an expert assistant specialized in summarizing technical conversations.

Write a concise but complete summary of the conversation so far. The summary \
replaces the whole history, so another assistant must be able to continue the \
work from it alone.

Include:
- Completed actions: what has been done.
- Current status: the ongoing task and its state.
- Relevant files: files that were read, created or modified.
- Next steps: the immediate actions required.
- Constraints and decisions: user preferences, constraints and key technical \
decisions.

Output only the summary. Do not answer questions or add conversational filler.";

/// The user turn that asks for the summary.
pub(crate) const COMPACTION_REQUEST: &str = "Summarize";

impl Agent {
    /// Summarizes the conversation and replaces the history with the
    /// summary, keeping the system instruction.
    ///
    /// This is done automatically when the model runs out of budget.
    /// Returns `false` if the model produced no usable summary, in which
    /// case the context is left untouched.
    ///
    /// # Errors
    ///
    /// Fails if the model provider fails.
    pub async fn compact(&mut self) -> Result<bool, Error> {
        let request = build_compaction_request(&self.model, &self.context);
        debug!("compacting {} message(s)", self.context.len());
        let resp = self.model_client.send_request(request).await?;

        let Some(summary) = pick_summary(resp) else {
            warn!("compaction produced no summary, context is unchanged");
            return Ok(false);
        };
        self.context.replace_with_summary(summary);
        self.prompt_turn = None;
        Ok(true)
    }
}

fn build_compaction_request(model: &str, context: &Context) -> ModelRequest {
    let history = context.history();
    let mut messages = Vec::with_capacity(history.len() + 2);
    messages.push(ModelMessage::System(COMPACTION_INSTRUCTION.to_owned()));
    messages.extend_from_slice(history);
    messages.push(ModelMessage::User(COMPACTION_REQUEST.to_owned()));
    ModelRequest {
        model: model.to_owned(),
        messages,
        tools: vec![],
    }
}

fn pick_summary(resp: ModelResponse) -> Option<String> {
    resp.choices
        .into_iter()
        .map(|choice| choice.message.content)
        .find(|content| !content.trim().is_empty())
}

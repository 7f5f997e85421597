use tool_loop_model::{
    ModelChoice, ModelFinishReason, ModelMessage, ModelRequest, ModelResponse,
};

use super::{Agent, Error};

/// What the loop should do after a candidate completion is handled.
#[derive(Debug, PartialEq, Eq)]
pub(super) enum StepFlow {
    /// Request the model again.
    Continue,
    /// End the loop, with the final assistant text if any.
    Finish(Option<String>),
}

impl Agent {
    fn build_model_request(&self) -> ModelRequest {
        ModelRequest {
            model: self.model.clone(),
            messages: self.context.messages().to_vec(),
            tools: self.tools.definitions().to_vec(),
        }
    }

    pub(super) async fn request_step(&self) -> Result<ModelResponse, Error> {
        let request = self.build_model_request();
        trace!("requesting with {} message(s)", request.messages.len());
        let resp = self.model_client.send_request(request).await?;
        if resp.choices.is_empty() {
            warn!("the model returned no choices");
        }
        Ok(resp)
    }

    pub(super) async fn handle_choice(
        &mut self,
        choice: &ModelChoice,
    ) -> Result<StepFlow, Error> {
        let message = &choice.message;
        match choice.finish_reason {
            ModelFinishReason::ToolCalls => {
                if let Some(reasoning) = &message.reasoning {
                    debug!("reasoning: {reasoning}");
                }
                self.context.push(ModelMessage::Assistant(message.clone()));

                let results = self.tools.dispatch(&message.tool_calls).await;
                debug_assert_eq!(results.len(), message.tool_calls.len());
                for result in results {
                    self.context.push(ModelMessage::Tool(result));
                }
                Ok(StepFlow::Continue)
            }
            ModelFinishReason::Stop => {
                debug!("model stopped: {}", message.content);
                self.context
                    .push(ModelMessage::assistant(message.content.clone()));
                Ok(StepFlow::Finish(Some(message.content.clone())))
            }
            ModelFinishReason::ContentFilter => {
                // Drop the input that triggered the filter, so that the next
                // request of this conversation doesn't submit it again. A
                // prompt already folded into a summary stays there.
                let removed = self
                    .prompt_turn
                    .take()
                    .and_then(|idx| self.context.remove_user_turn(idx));
                warn!("content filtered, dropped input: {removed:?}");
                Ok(StepFlow::Finish(None))
            }
            ModelFinishReason::Length => {
                debug!("model ran out of budget: {}", message.content);
                self.compact().await?;
                Ok(StepFlow::Continue)
            }
        }
    }
}

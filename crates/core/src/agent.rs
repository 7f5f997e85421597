mod builder;
mod compaction;
mod error;
mod step;

use tool_loop_model::{ModelMessage, ModelResponse};

use crate::conversation::Context;
use crate::model_client::ModelClient;
use crate::tool::Registry as ToolRegistry;
pub use builder::AgentBuilder;
pub use error::Error;
use step::StepFlow;

type StepObserver =
    dyn FnMut(&ModelResponse, &mut StepControl) + Send + Sync;

/// An agent instance, which owns a conversation context, a model client
/// and a toolset, and drives the loop between the model and the tools.
///
/// Each call to [`generate`](Agent::generate) appends a user turn and keeps
/// requesting the model until it finishes, running any requested tools in
/// between. The agent is driven by one caller at a time; `generate` takes
/// `&mut self`, so overlapping calls on the same instance are not possible.
pub struct Agent {
    model_client: ModelClient,
    model: String,
    tools: ToolRegistry,
    context: Context,
    /// Index of the user turn appended by the running `generate` call, gone
    /// once compaction folds it into a summary.
    prompt_turn: Option<usize>,
    on_step_end: Option<Box<StepObserver>>,
    max_steps: Option<usize>,
}

/// Lets a step observer end the loop after the current response.
#[derive(Debug, Default)]
pub struct StepControl {
    stopped: bool,
}

impl StepControl {
    /// Stops the loop once the current response has been processed.
    #[inline]
    pub fn stop(&mut self) {
        self.stopped = true;
    }

    /// Returns `true` if [`stop`](Self::stop) has been called.
    #[inline]
    pub fn is_stopped(&self) -> bool {
        self.stopped
    }
}

impl Agent {
    /// Returns the conversation context.
    #[inline]
    pub fn context(&self) -> &Context {
        &self.context
    }

    /// Returns the system instruction.
    #[inline]
    pub fn instruction(&self) -> Option<&str> {
        self.context.instruction()
    }

    /// Returns the identifier of the model this agent talks to.
    #[inline]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Appends `prompt` as a user turn and runs the loop until the model
    /// finishes.
    ///
    /// Returns the final assistant text when the model stopped normally, or
    /// `None` when the loop ended otherwise (content filtered, or stopped by
    /// the step observer).
    ///
    /// # Errors
    ///
    /// Fails if the model provider fails, or the step limit is reached.
    /// Tool failures never fail this method, they are reported back to the
    /// model instead.
    pub async fn generate<S: Into<String>>(
        &mut self,
        prompt: S,
    ) -> Result<Option<String>, Error> {
        self.prompt_turn = Some(self.context.len());
        self.context.push(ModelMessage::User(prompt.into()));

        let mut reply = None;
        let mut steps = 0;
        let mut next_step = true;
        while next_step {
            if let Some(max_steps) = self.max_steps {
                if steps >= max_steps {
                    warn!("step limit ({max_steps}) reached");
                    return Err(Error::StepLimitExceeded(max_steps));
                }
            }
            steps += 1;

            let resp = self.request_step().await?;
            for choice in &resp.choices {
                match self.handle_choice(choice).await? {
                    StepFlow::Continue => {}
                    StepFlow::Finish(text) => {
                        next_step = false;
                        if text.is_some() {
                            reply = text;
                        }
                    }
                }
            }

            if let Some(on_step_end) = &mut self.on_step_end {
                let mut control = StepControl::default();
                on_step_end(&resp, &mut control);
                if control.is_stopped() {
                    debug!("stopped by the step observer");
                    next_step = false;
                }
            }
        }
        debug!("loop finished after {steps} step(s)");
        self.prompt_turn = None;
        Ok(reply)
    }
}

impl Agent {
    fn from_builder(builder: AgentBuilder) -> Self {
        let AgentBuilder {
            model_client,
            model,
            instruction,
            tools,
            on_step_end,
            max_steps,
        } = builder;

        Self {
            model_client,
            model,
            tools: ToolRegistry::with_tools(tools),
            context: Context::with_instruction(instruction),
            prompt_turn: None,
            on_step_end,
            max_steps,
        }
    }
}

use tool_loop_model::{ModelProvider, ModelResponse};

use super::{Agent, StepControl, StepObserver};
use crate::model_client::ModelClient;
use crate::tool::{AnyTool, CustomTool, FunctionTool};

/// [`Agent`] builder.
pub struct AgentBuilder {
    pub(crate) model_client: ModelClient,
    pub(crate) model: String,
    pub(crate) instruction: String,
    pub(crate) tools: Vec<AnyTool>,
    pub(crate) on_step_end: Option<Box<StepObserver>>,
    pub(crate) max_steps: Option<usize>,
}

impl AgentBuilder {
    /// Creates a new builder with the specified model provider, and the
    /// identifier of the model to request.
    #[inline]
    pub fn with_model_provider<P, S>(provider: P, model: S) -> Self
    where
        P: ModelProvider + 'static,
        S: Into<String>,
    {
        Self {
            model_client: ModelClient::new(provider),
            model: model.into(),
            instruction: String::new(),
            tools: vec![],
            on_step_end: None,
            max_steps: None,
        }
    }

    /// Sets the system instruction for the agent.
    #[inline]
    pub fn with_instruction<S: Into<String>>(mut self, instruction: S) -> Self {
        self.instruction = instruction.into();
        self
    }

    /// Registers a tool that accepts structured arguments.
    #[inline]
    pub fn with_function_tool<T: FunctionTool>(self, tool: T) -> Self {
        self.with_tool(AnyTool::function(tool))
    }

    /// Registers a tool that accepts free-form text.
    #[inline]
    pub fn with_custom_tool<T: CustomTool>(self, tool: T) -> Self {
        self.with_tool(AnyTool::custom(tool))
    }

    /// Registers a type-erased tool.
    ///
    /// Tool names should be unique. If a name is registered more than
    /// once, the first registration is used and the later ones are ignored.
    #[inline]
    pub fn with_tool(mut self, tool: AnyTool) -> Self {
        self.tools.push(tool);
        self
    }

    /// Attaches a callback to be invoked after each model response has been
    /// processed. The callback may end the loop through [`StepControl`].
    #[inline]
    pub fn on_step_end(
        mut self,
        on_step_end: impl FnMut(&ModelResponse, &mut StepControl)
        + Send
        + Sync
        + 'static,
    ) -> Self {
        self.on_step_end = Some(Box::new(on_step_end));
        self
    }

    /// Limits the number of model requests in one
    /// [`generate`](Agent::generate) call. Unlimited by default.
    #[inline]
    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = Some(max_steps);
        self
    }

    /// Builds the agent.
    #[inline]
    pub fn build(self) -> Agent {
        Agent::from_builder(self)
    }
}

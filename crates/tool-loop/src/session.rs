use tool_loop_core::conversation::Context;
use tool_loop_core::{Agent, AgentBuilder, Error, StepControl};
use tool_loop_model::{ModelProvider, ModelResponse};

use crate::tools::*;

/// A session builder.
///
/// See [`Session`].
pub struct SessionBuilder {
    agent_builder: AgentBuilder,
    shell: bool,
}

impl SessionBuilder {
    /// Creates a session builder with a specified model provider and the
    /// identifier of the model to use.
    pub fn with_model_provider<M, S>(provider: M, model: S) -> Self
    where
        M: ModelProvider + 'static,
        S: Into<String>,
    {
        let agent_builder = AgentBuilder::with_model_provider(provider, model);
        Self {
            agent_builder,
            shell: false,
        }
    }

    /// Sets the system instruction for the agent.
    #[inline]
    pub fn with_instruction<S: Into<String>>(mut self, instruction: S) -> Self {
        self.agent_builder = self.agent_builder.with_instruction(instruction);
        self
    }

    /// Enables the [`ShellTool`], which lets the model run arbitrary
    /// commands on this machine. Disabled by default.
    #[inline]
    pub fn with_shell(mut self, enabled: bool) -> Self {
        self.shell = enabled;
        self
    }

    /// Attaches a callback to be invoked after each model response has been
    /// processed.
    #[inline]
    pub fn on_step_end(
        mut self,
        on_step_end: impl FnMut(&ModelResponse, &mut StepControl)
        + Send
        + Sync
        + 'static,
    ) -> Self {
        self.agent_builder = self.agent_builder.on_step_end(on_step_end);
        self
    }

    /// Limits the number of model requests for each message.
    #[inline]
    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.agent_builder = self.agent_builder.with_max_steps(max_steps);
        self
    }

    /// Builds a new session.
    pub fn build(self) -> Session {
        let mut agent_builder = self
            .agent_builder
            .with_function_tool(GlobTool::new())
            .with_function_tool(ReadFileTool::new());
        if self.shell {
            debug!("shell tool enabled");
            agent_builder = agent_builder.with_custom_tool(ShellTool::new());
        }

        Session {
            agent: agent_builder.build(),
        }
    }
}

/// A chat session, like a window that displays messages and has a input box.
///
/// The session holds a fully configured agent that you can use directly, and it
/// is basically a wrapper around [`Agent`].
pub struct Session {
    agent: Agent,
}

impl Session {
    /// Sends a message to the session, and waits for the final reply.
    ///
    /// See [`Agent::generate`].
    #[inline]
    pub async fn send_message(
        &mut self,
        message: &str,
    ) -> Result<Option<String>, Error> {
        self.agent.generate(message).await
    }

    /// Summarizes the conversation to free up the context.
    ///
    /// See [`Agent::compact`].
    #[inline]
    pub async fn compact(&mut self) -> Result<bool, Error> {
        self.agent.compact().await
    }

    /// Returns the conversation so far.
    #[inline]
    pub fn context(&self) -> &Context {
        self.agent.context()
    }

    /// Returns the underlying agent.
    #[inline]
    pub fn agent(&self) -> &Agent {
        &self.agent
    }
}

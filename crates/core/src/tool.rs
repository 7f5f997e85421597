//! Tool call supports.
//!
//! A tool is a named capability the model can invoke. There are two
//! calling conventions:
//!
//! - [`FunctionTool`]: the model passes a JSON document, which is validated
//!   and converted into a typed input before the tool runs.
//! - [`CustomTool`]: the model passes free-form text, which is handed to
//!   the tool as is.
//!
//! Both kinds are erased into [`AnyTool`] before being registered to an
//! agent. Invoking an [`AnyTool`] always yields a [`ToolOutput`]. Invalid
//! arguments, execution errors and panics are all converted into failed
//! outputs, so the conversation can go on and the model can see what went
//! wrong.

mod error;
mod object;
mod registry;

use std::fmt::{self, Debug};
use std::sync::Arc;

use schemars::JsonSchema;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tool_loop_model::{ModelTool, ToolOutput};

pub use error::{Error, ErrorKind};
pub(crate) use registry::Registry;
pub use registry::NO_OUTPUT;

use object::{CustomToolObject, FunctionToolObject, ToolObject};

/// The result of running a tool handler.
pub type ToolResult<T = String> = Result<T, Error>;

/// A tool that accepts structured arguments.
///
/// Implementations of this trait should be stateless, and may not maintain any
/// internal state.
///
/// The tool can be context-aware, meaning it can access additional information
/// about the current execution context, such as the working directory or the
/// current user. To do this, make the context an immutable state of the tool,
/// which can be set during initialization, and copy it when executing.
pub trait FunctionTool: Send + Sync + 'static {
    /// The type of input that the tool accepts.
    ///
    /// The JSON schema of this type is advertised to the model.
    type Input: DeserializeOwned + JsonSchema + Send + 'static;

    /// The type of output that the tool produces.
    ///
    /// Strings are passed to the model verbatim, other values are
    /// serialized as JSON.
    type Output: Serialize + Send + 'static;

    /// Returns the name of the tool.
    fn name(&self) -> &str;

    /// Returns the description of the tool.
    fn description(&self) -> &str;

    /// Validates the raw arguments from the model and converts them into
    /// the input type.
    ///
    /// The default implementation deserializes the arguments as JSON.
    /// Override it to apply extra checks the schema cannot express.
    fn parse_input(&self, arguments: &str) -> ToolResult<Self::Input> {
        serde_json::from_str(arguments)
            .map_err(|err| Error::invalid_input().with_reason(err.to_string()))
    }

    /// Executes the tool with the given input.
    ///
    /// This method must return a future that is fully independent of `self`.
    /// Synchronous tools can simply return a ready future.
    fn execute(
        &self,
        input: Self::Input,
    ) -> impl Future<Output = ToolResult<Self::Output>> + Send + 'static;
}

/// A tool that accepts free-form text input.
///
/// The same statelessness rules of [`FunctionTool`] apply.
pub trait CustomTool: Send + Sync + 'static {
    /// Returns the name of the tool.
    fn name(&self) -> &str;

    /// Returns the description of the tool.
    fn description(&self) -> &str;

    /// Executes the tool with the raw input from the model.
    fn execute(
        &self,
        input: String,
    ) -> impl Future<Output = ToolResult> + Send + 'static;
}

/// A type-erased tool of either kind.
///
/// Cloning an `AnyTool` is cheap, clones share the same underlying tool.
#[derive(Clone)]
pub struct AnyTool(Arc<dyn ToolObject>);

impl AnyTool {
    /// Wraps a [`FunctionTool`].
    ///
    /// The parameter schema is generated once here, so that every
    /// [`describe`](Self::describe) call yields the same definition.
    #[inline]
    pub fn function<T: FunctionTool>(tool: T) -> Self {
        Self(Arc::new(FunctionToolObject::new(tool)))
    }

    /// Wraps a [`CustomTool`].
    #[inline]
    pub fn custom<T: CustomTool>(tool: T) -> Self {
        Self(Arc::new(CustomToolObject(tool)))
    }

    /// Returns the name of the tool.
    #[inline]
    pub fn name(&self) -> &str {
        self.0.name()
    }

    /// Returns the definition advertised to the model.
    #[inline]
    pub fn describe(&self) -> ModelTool {
        self.0.describe()
    }

    /// Runs the tool with the raw arguments from the model.
    ///
    /// This never fails: any error is reported as a failed output.
    #[inline]
    pub async fn execute(&self, arguments: &str) -> ToolOutput {
        self.0.execute(arguments).await
    }
}

impl Debug for AnyTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("AnyTool").field(&self.name()).finish()
    }
}

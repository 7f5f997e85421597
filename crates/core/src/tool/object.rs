use std::any::Any;
use std::panic::AssertUnwindSafe;

use async_trait::async_trait;
use futures_util::FutureExt;
use schemars::transform::{RecursiveTransform, Transform};
use schemars::{Schema, schema_for};
use serde_json::Value;
use tool_loop_model::{ModelTool, ModelToolKind, ToolOutput};

use super::{CustomTool, Error, FunctionTool, ToolResult};

#[async_trait]
pub(crate) trait ToolObject: Send + Sync + 'static {
    fn name(&self) -> &str;

    fn describe(&self) -> ModelTool;

    async fn execute(&self, arguments: &str) -> ToolOutput;
}

pub(crate) struct FunctionToolObject<T> {
    tool: T,
    parameters: Value,
}

impl<T: FunctionTool> FunctionToolObject<T> {
    pub fn new(tool: T) -> Self {
        let mut schema = schema_for!(T::Input);
        RecursiveTransform(close_object_schema).transform(&mut schema);
        Self {
            tool,
            parameters: schema.to_value(),
        }
    }

    async fn run(&self, arguments: &str) -> ToolResult<T::Output> {
        let input = self.tool.parse_input(arguments)?;
        self.tool.execute(input).await
    }
}

#[async_trait]
impl<T: FunctionTool> ToolObject for FunctionToolObject<T> {
    #[inline]
    fn name(&self) -> &str {
        self.tool.name()
    }

    fn describe(&self) -> ModelTool {
        ModelTool {
            name: self.tool.name().to_owned(),
            description: self.tool.description().to_owned(),
            kind: ModelToolKind::Function {
                parameters: self.parameters.clone(),
                strict: true,
            },
        }
    }

    async fn execute(&self, arguments: &str) -> ToolOutput {
        let result = AssertUnwindSafe(self.run(arguments)).catch_unwind().await;
        match result {
            Ok(Ok(output)) => match serde_json::to_value(output) {
                Ok(Value::String(text)) => ToolOutput::success(text),
                Ok(value) => ToolOutput::success(value.to_string()),
                Err(err) => ToolOutput::failure(
                    Error::caused_by(&err)
                        .with_reason(format!("cannot serialize output: {err}"))
                        .to_payload(),
                ),
            },
            Ok(Err(err)) => ToolOutput::failure(err.to_payload()),
            Err(panic) => {
                ToolOutput::failure(panic_to_error(panic).to_payload())
            }
        }
    }
}

/// Strict mode accepts an object schema only when it rejects unknown keys
/// and lists every property as required. Optional fields stay nullable
/// through their own type.
fn close_object_schema(schema: &mut Schema) {
    let Some(object) = schema.as_object_mut() else {
        return;
    };
    let is_object = match object.get("type") {
        Some(Value::String(ty)) => ty == "object",
        Some(Value::Array(types)) => types.iter().any(|ty| ty == "object"),
        _ => object.contains_key("properties"),
    };
    if !is_object {
        return;
    }
    object
        .entry("additionalProperties")
        .or_insert(Value::Bool(false));
    let required = match object.get("properties") {
        Some(Value::Object(properties)) => properties
            .keys()
            .map(|key| Value::String(key.clone()))
            .collect(),
        _ => Vec::new(),
    };
    object.insert("required".to_owned(), Value::Array(required));
}

pub(crate) struct CustomToolObject<T>(pub T);

#[async_trait]
impl<T: CustomTool> ToolObject for CustomToolObject<T> {
    #[inline]
    fn name(&self) -> &str {
        self.0.name()
    }

    fn describe(&self) -> ModelTool {
        ModelTool {
            name: self.0.name().to_owned(),
            description: self.0.description().to_owned(),
            kind: ModelToolKind::Custom,
        }
    }

    async fn execute(&self, arguments: &str) -> ToolOutput {
        let fut = async { self.0.execute(arguments.to_owned()).await };
        match AssertUnwindSafe(fut).catch_unwind().await {
            Ok(Ok(output)) => ToolOutput::success(output),
            Ok(Err(err)) => ToolOutput::failure(err.to_payload()),
            Err(panic) => {
                ToolOutput::failure(panic_to_error(panic).to_payload())
            }
        }
    }
}

fn panic_to_error(panic: Box<dyn Any + Send>) -> Error {
    let reason = if let Some(msg) = panic.downcast_ref::<&str>() {
        (*msg).to_owned()
    } else if let Some(msg) = panic.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic payload".to_owned()
    };
    warn!("tool panicked: {reason}");
    Error::panicked().with_reason(reason)
}

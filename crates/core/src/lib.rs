//! Core logic including the agent loop, tool execution, compaction, etc.

#![deny(missing_docs)]
#![deny(clippy::missing_safety_doc)]

#[macro_use]
extern crate tracing;

mod agent;
pub mod conversation;
mod model_client;
pub mod tool;

pub use agent::{Agent, AgentBuilder, Error, StepControl};

/// Re-exports of [`tool_loop_model`] crate.
pub mod model {
    pub use tool_loop_model::*;
}

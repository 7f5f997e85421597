//! An out-of-the-box agent that assembles the tool loop with a set of
//! built-in tools.
//!
//! The crate includes a CLI tool for using in the terminal, backed by an
//! OpenAI-compatible provider. You can also use it as a library to bring
//! the agent into your own host apps, with any
//! [`ModelProvider`](tool_loop_model::ModelProvider).

#![deny(missing_docs)]

#[macro_use]
extern crate tracing;

mod session;
pub mod tools;

pub use session::{Session, SessionBuilder};

/// Re-exports of [`tool_loop_core`] crate.
pub mod core {
    pub use tool_loop_core::*;
}

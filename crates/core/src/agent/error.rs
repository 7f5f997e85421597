use std::error::Error as StdError;
use std::fmt::{self, Display};

use tool_loop_model::{ErrorKind as ModelErrorKind, ModelProviderError};

/// The error type for [`Agent`](crate::Agent) operations.
#[derive(Debug)]
pub enum Error {
    /// The model provider failed. The request is not retried.
    Model(Box<dyn ModelProviderError>),
    /// The loop has requested the model for the configured number of times
    /// without finishing.
    StepLimitExceeded(usize),
}

impl Error {
    /// Returns the kind of the provider error, if this is one.
    #[inline]
    pub fn model_error_kind(&self) -> Option<ModelErrorKind> {
        match self {
            Error::Model(err) => Some(err.kind()),
            Error::StepLimitExceeded(_) => None,
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Model(err) => {
                write!(f, "model provider failed ({}): {err}", err.kind())
            }
            Error::StepLimitExceeded(max_steps) => {
                write!(f, "the model did not finish in {max_steps} steps")
            }
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Error::Model(err) => Some(err.as_ref()),
            Error::StepLimitExceeded(_) => None,
        }
    }
}

impl From<Box<dyn ModelProviderError>> for Error {
    #[inline]
    fn from(err: Box<dyn ModelProviderError>) -> Self {
        Error::Model(err)
    }
}

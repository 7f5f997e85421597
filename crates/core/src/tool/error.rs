use std::borrow::Cow;
use std::error::Error as StdError;
use std::fmt::{self, Display};

/// The kind of error that occurred.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The input provided to the tool was invalid.
    InvalidInput,
    /// Error occurred while executing the tool.
    ExecutionError,
    /// The tool panicked while executing.
    Panicked,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::InvalidInput => write!(f, "Invalid input"),
            ErrorKind::ExecutionError => write!(f, "Execution error"),
            ErrorKind::Panicked => write!(f, "Panicked"),
        }
    }
}

/// Describes a tool call error.
///
/// Errors never leave the tool boundary. They are rendered into the
/// payload of a failed [`ToolOutput`](crate::model::ToolOutput) with
/// the kind, the reason and the trace on separate lines.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Error {
    kind: ErrorKind,
    reason: Option<String>,
    trace: Option<String>,
}

impl Error {
    #[inline]
    fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            reason: None,
            trace: None,
        }
    }

    /// Creates a new error with the `InvalidInput` kind.
    #[inline]
    pub fn invalid_input() -> Self {
        Self::new(ErrorKind::InvalidInput)
    }

    /// Creates a new error with the `ExecutionError` kind.
    #[inline]
    pub fn execution_error() -> Self {
        Self::new(ErrorKind::ExecutionError)
    }

    /// Creates a new error with the `Panicked` kind.
    #[inline]
    pub fn panicked() -> Self {
        Self::new(ErrorKind::Panicked)
    }

    /// Creates an `ExecutionError` from any error value, keeping its
    /// message as the reason and its source chain as the trace.
    pub fn caused_by<E: StdError + ?Sized>(err: &E) -> Self {
        Self::execution_error()
            .with_reason(err.to_string())
            .with_source_chain(err)
    }

    /// Attaches a reason to the error.
    #[inline]
    pub fn with_reason<S: Into<String>>(self, reason: S) -> Self {
        Self {
            reason: Some(reason.into()),
            ..self
        }
    }

    /// Attaches a trace to the error.
    #[inline]
    pub fn with_trace<S: Into<String>>(self, trace: S) -> Self {
        Self {
            trace: Some(trace.into()),
            ..self
        }
    }

    /// Records the `source()` chain of `err` as the trace.
    pub fn with_source_chain<E: StdError + ?Sized>(self, err: &E) -> Self {
        let mut trace = String::new();
        let mut source = err.source();
        while let Some(err) = source {
            if !trace.is_empty() {
                trace.push('\n');
            }
            trace.push_str("caused by: ");
            trace.push_str(&err.to_string());
            source = err.source();
        }
        if trace.is_empty() {
            return self;
        }
        self.with_trace(trace)
    }

    /// Returns the kind of this error.
    #[inline]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the reason for the error.
    #[inline]
    pub fn reason(&self) -> Cow<'_, str> {
        match self.reason.as_deref() {
            Some(reason) => Cow::Borrowed(reason),
            None => Cow::Owned(format!("{}", self.kind)),
        }
    }

    /// Returns the trace of the error, if any.
    #[inline]
    pub fn trace(&self) -> Option<&str> {
        self.trace.as_deref()
    }

    /// Renders the error as the payload of a failed tool output.
    pub fn to_payload(&self) -> String {
        let mut payload = format!("{}\n{}", self.kind, self.reason());
        if let Some(trace) = &self.trace {
            payload.push('\n');
            payload.push_str(trace);
        }
        payload
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.reason())
    }
}

impl StdError for Error {}

#[cfg(test)]
mod tests {
    use std::io;

    use super::*;

    #[derive(Debug)]
    struct Outer(io::Error);

    impl Display for Outer {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "failed to load config")
        }
    }

    impl StdError for Outer {
        fn source(&self) -> Option<&(dyn StdError + 'static)> {
            Some(&self.0)
        }
    }

    #[test]
    fn test_payload_layout() {
        let err = Error::invalid_input().with_reason("missing field `text`");
        assert_eq!(err.to_payload(), "Invalid input\nmissing field `text`");

        let err = Error::execution_error();
        assert_eq!(err.to_payload(), "Execution error\nExecution error");
    }

    #[test]
    fn test_caused_by_keeps_source_chain() {
        let err =
            Outer(io::Error::new(io::ErrorKind::NotFound, "no such file"));
        let err = Error::caused_by(&err);
        assert_eq!(err.kind(), ErrorKind::ExecutionError);
        assert_eq!(err.reason(), "failed to load config");
        assert_eq!(err.trace(), Some("caused by: no such file"));
        assert_eq!(
            err.to_payload(),
            "Execution error\nfailed to load config\ncaused by: no such file"
        );
    }
}

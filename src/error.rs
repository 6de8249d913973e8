use std::fmt::{Display, Formatter};

/// What went wrong, coarsely. Everything surfaces synchronously at the
/// call site; nothing is retried or recovered locally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A supplied value cannot be promoted to the declared parameter type,
    /// a required parameter is missing, or the parameter name is unknown.
    InvalidArgument,
    /// The symbolic function name is not present in the registry catalog.
    UnknownFunction,
    /// A bound-method call on a class whose API has not been imported.
    NotInitialized,
    /// The server schema (or the wire form) could not be (de)serialized.
    Schema,
    /// The process-wide registry itself is unusable (poisoned lock).
    Registry,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Error {
    pub kind: ErrorKind,
    pub message: String,
}

impl Error {
    pub fn new<M: Into<String>>(kind: ErrorKind, message: M) -> Self {
        Self { kind, message: message.into() }
    }

    pub fn invalid_argument<M: Into<String>>(message: M) -> Self {
        Self::new(ErrorKind::InvalidArgument, message)
    }

    pub fn unknown_function<M: Into<String>>(message: M) -> Self {
        Self::new(ErrorKind::UnknownFunction, message)
    }

    pub fn not_initialized<M: Into<String>>(message: M) -> Self {
        Self::new(ErrorKind::NotInitialized, message)
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for Error {}

//! Error types used across dirlock.
use thiserror::Error;

/// High-level error categories for disk queries.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Error)]
pub enum ErrorKind {
    /// The directory could not be stat'd or its device link could not be resolved.
    #[error("device resolution failed")]
    Resolution,
    /// The rotational attribute of a device could not be opened.
    #[error("device query failed")]
    Query,
    /// Block-device introspection is not available on this platform.
    #[error("unsupported platform")]
    Unsupported,
}

/// Structured error with a kind and human message.
#[derive(Debug, Error)]
#[error("{kind:?}: {msg}")]
pub struct Error {
    pub kind: ErrorKind,
    pub msg: String,
}

impl Error {
    pub(crate) fn resolution(msg: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Resolution,
            msg: msg.into(),
        }
    }

    pub(crate) fn query(msg: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Query,
            msg: msg.into(),
        }
    }
}

/// Convenient alias for results returning a `types::Error`.
pub type Result<T> = std::result::Result<T, Error>;

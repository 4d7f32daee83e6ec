//! Crate-level error types
//!
//! Lifecycle operations surface a small, closed set of failures. The Display
//! strings are the external contract: an API layer can return them verbatim.

use crate::source::SourceError;

/// Convenience result alias for lifecycle operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for stream lifecycle operations
#[derive(Debug, Clone)]
pub enum Error {
    /// A required key (`stream_id`, `path`, `models`) was absent from the request
    MissingKeys,
    /// A stream with this ID was already created (IDs are never reused)
    AlreadyExists(String),
    /// No stream with this ID was ever created
    StreamNotFound(String),
    /// The configured running-stream limit would be exceeded
    CapacityExceeded { limit: usize },
    /// The frame source could not be opened
    Source(SourceError),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::MissingKeys => write!(f, "Missing required keys"),
            Error::AlreadyExists(id) => write!(f, "Stream ID already exists: {}", id),
            Error::StreamNotFound(id) => write!(f, "Stream not found: {}", id),
            Error::CapacityExceeded { limit } => {
                write!(f, "Running stream limit reached: {}", limit)
            }
            Error::Source(e) => write!(f, "Frame source error: {}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Source(e) => Some(e),
            _ => None,
        }
    }
}

impl From<SourceError> for Error {
    fn from(e: SourceError) -> Self {
        Error::Source(e)
    }
}

impl From<crate::registry::RegistryError> for Error {
    fn from(e: crate::registry::RegistryError) -> Self {
        use crate::registry::RegistryError;
        match e {
            RegistryError::AlreadyExists(id) => Error::AlreadyExists(id),
            RegistryError::NotFound(id) => Error::StreamNotFound(id),
        }
    }
}

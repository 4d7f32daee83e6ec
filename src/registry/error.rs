//! Registry error types

/// Error type for registry operations
#[derive(Debug, Clone)]
pub enum RegistryError {
    /// A stream with this ID was already created (IDs are never reused)
    AlreadyExists(String),
    /// No stream with this ID exists
    NotFound(String),
}

impl std::fmt::Display for RegistryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegistryError::AlreadyExists(id) => {
                write!(f, "Stream ID already exists: {}", id)
            }
            RegistryError::NotFound(id) => write!(f, "Stream not found: {}", id),
        }
    }
}

impl std::error::Error for RegistryError {}

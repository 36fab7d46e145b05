use std::fmt;

/// Custom error types for location injection
#[derive(Debug)]
pub enum InjectorError {
    /// I/O errors
    Io(std::io::Error),
    /// Parse errors with context
    Parse(String),
    /// Fix rejected at construction (out-of-range coordinate or accuracy)
    InvalidFix(String),
    /// System property write failure
    PropertyWrite(String),
    /// Elevated shell or permission-change failure
    PermissionDenied(String),
    /// Expected file or executable missing
    NotFound(String),
}

impl fmt::Display for InjectorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InjectorError::Io(err) => write!(f, "I/O error: {}", err),
            InjectorError::Parse(msg) => write!(f, "Parse error: {}", msg),
            InjectorError::InvalidFix(msg) => write!(f, "Invalid fix: {}", msg),
            InjectorError::PropertyWrite(msg) => write!(f, "Property write failed: {}", msg),
            InjectorError::PermissionDenied(msg) => write!(f, "Permission denied: {}", msg),
            InjectorError::NotFound(msg) => write!(f, "Not found: {}", msg),
        }
    }
}

impl std::error::Error for InjectorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            InjectorError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for InjectorError {
    fn from(err: std::io::Error) -> Self {
        InjectorError::Io(err)
    }
}

impl From<std::num::ParseFloatError> for InjectorError {
    fn from(err: std::num::ParseFloatError) -> Self {
        InjectorError::Parse(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, InjectorError>;

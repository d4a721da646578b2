use std::fmt;

/// Result type for stepline-types operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur in the types layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The `--remote` values could not be turned into a host/port pair
    InvalidEndpoint(String),

    /// A setting name that the session does not know about
    UnknownSetting(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidEndpoint(msg) => write!(f, "Invalid remote endpoint: {}", msg),
            Error::UnknownSetting(name) => write!(f, "Unknown setting: {}", name),
        }
    }
}

impl std::error::Error for Error {}

use stepline_types::RemoteEndpoint;
use std::fmt;

/// Result type for stepline-runtime operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur in the runtime layer
#[derive(Debug)]
pub enum Error {
    /// Core layer error (config, path, syntax check spawn)
    Core(stepline_core::Error),

    /// Types layer error (option values)
    Types(stepline_types::Error),

    /// IO operation failed
    Io(std::io::Error),

    /// No connection could be opened to the remote debugger
    Connect {
        endpoint: RemoteEndpoint,
        source: std::io::Error,
    },

    /// The trace engine could not do what was asked of it
    Engine(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Core(err) => write!(f, "{}", err),
            Error::Types(err) => write!(f, "{}", err),
            Error::Io(err) => write!(f, "IO error: {}", err),
            Error::Connect { endpoint, source } => {
                write!(f, "Could not connect to debugger server {}: {}", endpoint, source)
            }
            Error::Engine(msg) => write!(f, "Engine error: {}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Core(err) => Some(err),
            Error::Types(err) => Some(err),
            Error::Io(err) => Some(err),
            Error::Connect { source, .. } => Some(source),
            Error::Engine(_) => None,
        }
    }
}

impl From<stepline_core::Error> for Error {
    fn from(err: stepline_core::Error) -> Self {
        Error::Core(err)
    }
}

impl From<stepline_types::Error> for Error {
    fn from(err: stepline_types::Error) -> Self {
        Error::Types(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

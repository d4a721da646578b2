use crate::{Error, Result};
use std::fmt;

pub const DEFAULT_REMOTE_HOST: &str = "localhost";

/// Address of a remote debugger server.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RemoteEndpoint {
    pub host: String,
    pub port: u16,
}

impl RemoteEndpoint {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// Build an endpoint from the `--remote` values.
    ///
    /// The values are consumed from the back like a stack: the last one is
    /// the port and the one before it, when present, is the host. Anything
    /// further left is ignored. A host given explicitly is kept as is, even
    /// when empty; only a missing host falls back to `localhost`.
    pub fn from_option_values(values: &[String]) -> Result<Self> {
        let mut stack = values.to_vec();

        let raw_port = stack
            .pop()
            .ok_or_else(|| Error::InvalidEndpoint("a port is required".to_string()))?;
        let port = raw_port
            .trim()
            .parse::<u16>()
            .map_err(|_| Error::InvalidEndpoint(format!("'{}' is not a valid port", raw_port)))?;

        let host = stack
            .pop()
            .unwrap_or_else(|| DEFAULT_REMOTE_HOST.to_string());

        Ok(Self { host, port })
    }
}

impl fmt::Display for RemoteEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

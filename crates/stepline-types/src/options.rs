use crate::{RemoteEndpoint, Result};

/// Parsed invocation flags. Built once per process by the CLI layer and only
/// read afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationOptions {
    pub version: bool,
    pub help: bool,
    /// Raw `--remote` values in the order they were given: `[host] port`.
    pub remote: Option<Vec<String>>,
    pub quit: bool,
    pub rc: bool,
    pub post_mortem: bool,
    pub trace: bool,
    /// Halt at the first line of the script before running any of it.
    pub stop: bool,
    pub target: Option<String>,
    pub script_args: Vec<String>,
}

impl Default for InvocationOptions {
    fn default() -> Self {
        Self {
            version: false,
            help: false,
            remote: None,
            quit: false,
            rc: false,
            post_mortem: false,
            trace: false,
            stop: true,
            target: None,
            script_args: Vec::new(),
        }
    }
}

impl InvocationOptions {
    /// Endpoint requested with `--remote`, if any.
    pub fn remote_endpoint(&self) -> Option<Result<RemoteEndpoint>> {
        self.remote
            .as_deref()
            .map(RemoteEndpoint::from_option_values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_stops_at_first_line() {
        let opts = InvocationOptions::default();
        assert!(opts.stop);
        assert!(!opts.quit);
        assert!(opts.remote_endpoint().is_none());
    }

    #[test]
    fn test_remote_endpoint_is_parsed_lazily() {
        let opts = InvocationOptions {
            remote: Some(vec!["9000".to_string()]),
            ..Default::default()
        };
        let endpoint = opts.remote_endpoint().unwrap().unwrap();
        assert_eq!(endpoint.port, 9000);
    }
}

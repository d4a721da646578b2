//! Client side of a remote debug session.
//!
//! The server drives the conversation one line at a time. Lines starting with
//! `PROMPT ` or `CONFIRM ` ask the user for input; every other line is output
//! to show. The session ends when either side closes its stream.

use crate::{Error, RemoteConnector, Result};
use stepline_types::RemoteEndpoint;
use std::io::{self, BufRead, BufReader, Write};
use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;

const PROMPT_PREFIXES: [&str; 2] = ["PROMPT ", "CONFIRM "];

/// Runs the client half of a remote session over an open connection.
pub trait RemoteProtocol {
    fn session(&self, stream: TcpStream) -> Result<()>;
}

/// Line relay between the server and the terminal.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdioRelay;

impl RemoteProtocol for StdioRelay {
    fn session(&self, stream: TcpStream) -> Result<()> {
        let stdin = io::stdin();
        let mut input = stdin.lock();
        let mut output = io::stdout();
        relay_lines(stream, &mut input, &mut output)
    }
}

pub struct TcpConnector<P> {
    protocol: P,
    timeout: Duration,
}

impl<P: RemoteProtocol> TcpConnector<P> {
    pub fn new(protocol: P, timeout: Duration) -> Self {
        Self { protocol, timeout }
    }
}

impl<P: RemoteProtocol> RemoteConnector for TcpConnector<P> {
    fn connect(&self, endpoint: &RemoteEndpoint) -> Result<()> {
        let stream = open_connection(endpoint, self.timeout)?;
        tracing::info!(%endpoint, "connected to remote debugger");
        let result = self.protocol.session(stream);
        tracing::info!(%endpoint, "remote session ended");
        result
    }
}

/// Try each address the endpoint resolves to, once. No retries.
pub fn open_connection(endpoint: &RemoteEndpoint, timeout: Duration) -> Result<TcpStream> {
    let connect_error = |source: io::Error| Error::Connect {
        endpoint: endpoint.clone(),
        source,
    };

    let addrs = (endpoint.host.as_str(), endpoint.port)
        .to_socket_addrs()
        .map_err(connect_error)?;

    let mut last_err = None;
    for addr in addrs {
        match TcpStream::connect_timeout(&addr, timeout) {
            Ok(stream) => return Ok(stream),
            Err(err) => {
                tracing::debug!(%addr, error = %err, "connection attempt failed");
                last_err = Some(err);
            }
        }
    }

    Err(connect_error(last_err.unwrap_or_else(|| {
        io::Error::new(io::ErrorKind::NotFound, "host resolved to no addresses")
    })))
}

/// Relay server lines to `output`, answering prompts from `input`.
pub fn relay_lines<R: BufRead, W: Write>(
    stream: TcpStream,
    input: &mut R,
    output: &mut W,
) -> Result<()> {
    let mut reader = BufReader::new(stream.try_clone()?);
    let mut writer = stream;
    let mut line = String::new();

    loop {
        line.clear();
        if reader.read_line(&mut line)? == 0 {
            return Ok(());
        }
        let text = line.trim_end_matches(['\r', '\n']);

        match prompt_text(text) {
            Some(prompt) => {
                write!(output, "{}", prompt)?;
                output.flush()?;

                let mut answer = String::new();
                if input.read_line(&mut answer)? == 0 {
                    tracing::debug!("user input closed, leaving remote session");
                    return Ok(());
                }
                writer.write_all(answer.trim_end_matches(['\r', '\n']).as_bytes())?;
                writer.write_all(b"\n")?;
                writer.flush()?;
            }
            None => writeln!(output, "{}", text)?,
        }
    }
}

fn prompt_text(line: &str) -> Option<&str> {
    PROMPT_PREFIXES
        .iter()
        .find_map(|prefix| line.strip_prefix(prefix))
}

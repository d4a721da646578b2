use crate::Result;
use stepline_core::{SyntaxCheck, SyntaxChecker};
use stepline_types::{LoopSignal, RemoteEndpoint, RunFailure, SessionContext};
use std::path::Path;

/// Instruments and runs the debugged script.
///
/// Responsibilities:
/// - Install whatever global hook tracing needs, once per process
/// - Load and run the current target, halting at the first line on request
/// - Read `post_mortem` / `linetrace` from the context on every run
pub trait TraceEngine {
    /// Install the trace hook. Called once, before the first run.
    fn start(&mut self) -> Result<()>;

    /// Run the context's current target to completion.
    /// Returns the failure when the script ended abnormally.
    fn debug_load(
        &mut self,
        ctx: &SessionContext,
        stop_immediately: bool,
    ) -> Result<Option<RunFailure>>;
}

/// Interactive command session for one stopped (or finished) program.
pub trait CommandProcessor {
    /// Read and execute commands until the user lets the program go on,
    /// restarts it or quits.
    fn process_commands(&mut self, ctx: &mut SessionContext) -> Result<LoopSignal>;

    /// Execute a single command line, as read from an init script.
    fn execute_command(&mut self, ctx: &mut SessionContext, line: &str) -> Result<LoopSignal>;
}

/// Builds a fresh command processor for each command session.
pub trait CommandProcessorFactory {
    fn create(&self) -> Box<dyn CommandProcessor + '_>;
}

/// Execution-free well-formedness check of the target script.
pub trait ScriptValidator {
    fn validate(&self, script: &Path) -> Result<SyntaxCheck>;
}

impl ScriptValidator for SyntaxChecker {
    fn validate(&self, script: &Path) -> Result<SyntaxCheck> {
        Ok(self.check(script)?)
    }
}

/// Opens a connection to a remote debugger and runs the client side of the
/// session. Returns once the remote session is over.
pub trait RemoteConnector {
    fn connect(&self, endpoint: &RemoteEndpoint) -> Result<()>;
}

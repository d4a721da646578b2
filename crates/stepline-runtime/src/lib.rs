pub mod error;
pub mod init_script;
pub mod interpreter;
pub mod launcher;
pub mod orchestrator;
pub mod remote;
pub mod traits;

pub use error::{Error, Result};
pub use init_script::InitScript;
pub use interpreter::InterpreterEngine;
pub use orchestrator::{Collaborators, Environment, Orchestrator, Termination};
pub use remote::{RemoteProtocol, StdioRelay, TcpConnector};
pub use traits::{
    CommandProcessor, CommandProcessorFactory, RemoteConnector, ScriptValidator, TraceEngine,
};

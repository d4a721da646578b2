pub mod error;
pub mod options;
pub mod remote;
pub mod run;
pub mod session;

pub use error::{Error, Result};
pub use options::InvocationOptions;
pub use remote::{DEFAULT_REMOTE_HOST, RemoteEndpoint};
pub use run::{RunFailure, RunResult};
pub use session::{LoopSignal, SessionContext, SessionSettings, SessionTarget, Setting};

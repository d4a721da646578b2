mod args;
mod commands;
pub mod console;
pub mod logging;

pub use args::Cli;
pub use commands::run;
pub use logging::LogLevel;

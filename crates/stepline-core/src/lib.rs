pub mod config;
pub mod error;
pub mod path;
pub mod syntax;

pub use config::Config;
pub use error::{Error, Result};
pub use path::*;
pub use syntax::{SyntaxCheck, SyntaxChecker};

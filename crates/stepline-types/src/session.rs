use crate::Error;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Absolute path of the script under debug.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionTarget(PathBuf);

impl SessionTarget {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }

    pub fn path(&self) -> &Path {
        &self.0
    }
}

impl fmt::Display for SessionTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

/// Names of the session settings the trace engine reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Setting {
    PostMortem,
    Linetrace,
}

impl Setting {
    pub const ALL: [Setting; 2] = [Setting::PostMortem, Setting::Linetrace];

    pub fn name(self) -> &'static str {
        match self {
            Setting::PostMortem => "post_mortem",
            Setting::Linetrace => "linetrace",
        }
    }
}

impl fmt::Display for Setting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Setting {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "post_mortem" | "post-mortem" => Ok(Setting::PostMortem),
            "linetrace" => Ok(Setting::Linetrace),
            other => Err(Error::UnknownSetting(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionSettings {
    pub post_mortem: bool,
    pub linetrace: bool,
}

impl SessionSettings {
    pub fn get(&self, setting: Setting) -> bool {
        match setting {
            Setting::PostMortem => self.post_mortem,
            Setting::Linetrace => self.linetrace,
        }
    }

    pub fn set(&mut self, setting: Setting, value: bool) {
        match setting {
            Setting::PostMortem => self.post_mortem = value,
            Setting::Linetrace => self.linetrace = value,
        }
    }
}

/// State shared with the engine and the command processor for one debug
/// session: which script is current and how it should be traced.
///
/// The orchestrator owns the only instance and lends it out; collaborators
/// never keep a copy between calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionContext {
    target: SessionTarget,
    pub settings: SessionSettings,
    pub script_args: Vec<String>,
}

impl SessionContext {
    pub fn new(target: SessionTarget) -> Self {
        Self {
            target,
            settings: SessionSettings::default(),
            script_args: Vec::new(),
        }
    }

    pub fn with_script_args(mut self, args: Vec<String>) -> Self {
        self.script_args = args;
        self
    }

    pub fn target(&self) -> &SessionTarget {
        &self.target
    }

    /// Swap in a new current target, returning the previous one.
    pub fn replace_target(&mut self, target: SessionTarget) -> SessionTarget {
        std::mem::replace(&mut self.target, target)
    }
}

/// How an interactive command session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopSignal {
    /// Let the program run again.
    Continue,
    /// Start the program over from the top.
    Restart,
    /// Leave the debugger.
    Quit,
}

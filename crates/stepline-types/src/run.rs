use std::fmt;

/// Abnormal end of a debug attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunFailure {
    pub message: String,
    pub backtrace: Vec<String>,
}

impl RunFailure {
    pub fn new(message: impl Into<String>, backtrace: Vec<String>) -> Self {
        Self {
            message: message.into(),
            backtrace,
        }
    }
}

impl fmt::Display for RunFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// Outcome of one debug attempt. Consumed by the reporting step and dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunResult {
    Completed,
    Failed(RunFailure),
}

impl RunResult {
    pub fn failure(&self) -> Option<&RunFailure> {
        match self {
            RunResult::Completed => None,
            RunResult::Failed(failure) => Some(failure),
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, RunResult::Failed(_))
    }
}

impl From<Option<RunFailure>> for RunResult {
    fn from(failure: Option<RunFailure>) -> Self {
        match failure {
            Some(failure) => RunResult::Failed(failure),
            None => RunResult::Completed,
        }
    }
}

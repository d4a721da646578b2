//! Recording fakes for the orchestrator's collaborators.
//!
//! Every fake writes one line per call into a shared [`Journal`], so a test
//! can assert on the exact order in which the orchestrator used them:
//! - `FakeEngine`: `start`, `launch <script> stop=.. post_mortem=.. linetrace=..`
//! - `FakeChecker`: `validate <script>`
//! - `ScriptedProcessors`: `commands <script>`, `rc <line>`
//! - `FakeConnector`: `connect <host:port>`

use std::cell::RefCell;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use stepline_core::SyntaxCheck;
use stepline_runtime::{
    CommandProcessor, CommandProcessorFactory, Error, RemoteConnector, Result, ScriptValidator,
    TraceEngine,
};
use stepline_types::{LoopSignal, RemoteEndpoint, RunFailure, SessionContext, Setting};

/// Ordered log of collaborator calls.
#[derive(Debug, Clone, Default)]
pub struct Journal(Rc<RefCell<Vec<String>>>);

impl Journal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, entry: impl Into<String>) {
        self.0.borrow_mut().push(entry.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.0.borrow().clone()
    }

    pub fn count(&self, prefix: &str) -> usize {
        self.0
            .borrow()
            .iter()
            .filter(|entry| entry.starts_with(prefix))
            .count()
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Trace engine stand-in. Runs complete normally unless an outcome was queued.
pub struct FakeEngine {
    journal: Journal,
    outcomes: VecDeque<Result<Option<RunFailure>>>,
    targets: Vec<PathBuf>,
}

impl FakeEngine {
    pub fn new(journal: Journal) -> Self {
        Self {
            journal,
            outcomes: VecDeque::new(),
            targets: Vec::new(),
        }
    }

    /// Full paths of every target launched so far.
    pub fn targets(&self) -> &[PathBuf] {
        &self.targets
    }

    /// Make the next unqueued run end with `failure`.
    pub fn fail_next(mut self, failure: RunFailure) -> Self {
        self.outcomes.push_back(Ok(Some(failure)));
        self
    }

    /// Make the next unqueued run return an engine error.
    pub fn error_next(mut self, message: &str) -> Self {
        self.outcomes
            .push_back(Err(Error::Engine(message.to_string())));
        self
    }
}

impl TraceEngine for FakeEngine {
    fn start(&mut self) -> Result<()> {
        self.journal.record("start");
        Ok(())
    }

    fn debug_load(
        &mut self,
        ctx: &SessionContext,
        stop_immediately: bool,
    ) -> Result<Option<RunFailure>> {
        self.journal.record(format!(
            "launch {} stop={} post_mortem={} linetrace={}",
            file_name(ctx.target().path()),
            stop_immediately,
            ctx.settings.post_mortem,
            ctx.settings.linetrace
        ));
        self.targets.push(ctx.target().path().to_path_buf());
        self.outcomes.pop_front().unwrap_or(Ok(None))
    }
}

/// Syntax checker stand-in. Passes unless a result was queued.
pub struct FakeChecker {
    journal: Journal,
    results: RefCell<VecDeque<SyntaxCheck>>,
}

impl FakeChecker {
    pub fn new(journal: Journal) -> Self {
        Self {
            journal,
            results: RefCell::new(VecDeque::new()),
        }
    }

    pub fn then(self, result: SyntaxCheck) -> Self {
        self.results.borrow_mut().push_back(result);
        self
    }
}

impl ScriptValidator for FakeChecker {
    fn validate(&self, script: &Path) -> Result<SyntaxCheck> {
        self.journal.record(format!("validate {}", file_name(script)));
        Ok(self
            .results
            .borrow_mut()
            .pop_front()
            .unwrap_or(SyntaxCheck::Passed))
    }
}

/// Command processor factory that answers each command session with the
/// next queued signal. Once the queue is empty every session quits, so a
/// mis-scripted test cannot loop forever.
pub struct ScriptedProcessors {
    journal: Journal,
    signals: RefCell<VecDeque<LoopSignal>>,
}

impl ScriptedProcessors {
    pub fn new(journal: Journal) -> Self {
        Self {
            journal,
            signals: RefCell::new(VecDeque::new()),
        }
    }

    pub fn then(self, signal: LoopSignal) -> Self {
        self.signals.borrow_mut().push_back(signal);
        self
    }
}

impl CommandProcessorFactory for ScriptedProcessors {
    fn create(&self) -> Box<dyn CommandProcessor + '_> {
        Box::new(ScriptedProcessor { factory: self })
    }
}

struct ScriptedProcessor<'a> {
    factory: &'a ScriptedProcessors,
}

impl CommandProcessor for ScriptedProcessor<'_> {
    fn process_commands(&mut self, ctx: &mut SessionContext) -> Result<LoopSignal> {
        self.factory
            .journal
            .record(format!("commands {}", file_name(ctx.target().path())));
        Ok(self
            .factory
            .signals
            .borrow_mut()
            .pop_front()
            .unwrap_or(LoopSignal::Quit))
    }

    /// Understands `set <setting> on|off` and `quit`; everything else is
    /// only recorded.
    fn execute_command(&mut self, ctx: &mut SessionContext, line: &str) -> Result<LoopSignal> {
        self.factory.journal.record(format!("rc {}", line));

        let words: Vec<&str> = line.split_whitespace().collect();
        match words.as_slice() {
            ["quit"] => return Ok(LoopSignal::Quit),
            ["set", name, value] => {
                let setting: Setting = name.parse()?;
                ctx.settings.set(setting, *value == "on");
            }
            _ => {}
        }
        Ok(LoopSignal::Continue)
    }
}

/// Remote connector stand-in; optionally refuses every connection.
pub struct FakeConnector {
    journal: Journal,
    refuse: bool,
}

impl FakeConnector {
    pub fn new(journal: Journal) -> Self {
        Self {
            journal,
            refuse: false,
        }
    }

    pub fn refusing(mut self) -> Self {
        self.refuse = true;
        self
    }
}

impl RemoteConnector for FakeConnector {
    fn connect(&self, endpoint: &RemoteEndpoint) -> Result<()> {
        self.journal.record(format!("connect {}", endpoint));
        if self.refuse {
            return Err(Error::Connect {
                endpoint: endpoint.clone(),
                source: std::io::Error::from(std::io::ErrorKind::ConnectionRefused),
            });
        }
        Ok(())
    }
}

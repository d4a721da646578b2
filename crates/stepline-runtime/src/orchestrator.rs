//! Top-level sequencing of a debugger invocation.
//!
//! ```text
//! ModeSelect ─┬─ version / help / missing target ──────────────▶ Done
//!             ├─ remote ──▶ RemoteConnect ─────────────────────▶ Done
//!             └─ target ──▶ LocalPrep ──▶ Validate ──▶ Launch ──▶ CommandLoop
//!                                            ▲  │ syntax error ▶ Done  │
//!                                            └──┴──────────────────────┘
//! ```
//!
//! The loop only ends through a named [`Termination`]: an explicit quit, a
//! fatal validation failure, or one of the early exits in mode selection.

use crate::init_script::InitScript;
use crate::{
    CommandProcessorFactory, RemoteConnector, Result, ScriptValidator, TraceEngine, launcher,
};
use stepline_core::{SyntaxCheck, absolute_path, resolve_script};
use stepline_types::{
    InvocationOptions, LoopSignal, RemoteEndpoint, SessionContext, SessionTarget,
};
use std::ffi::OsString;
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

pub const MISSING_TARGET_MESSAGE: &str = "You must specify a program to debug...";

/// How an orchestrator run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    Version,
    Help,
    RemoteClosed,
    MissingTarget,
    SyntaxError { status: i32 },
    ValidationTimedOut,
    Quit,
}

impl Termination {
    pub fn exit_code(self) -> i32 {
        match self {
            Termination::Version
            | Termination::Help
            | Termination::RemoteClosed
            | Termination::Quit => 0,
            Termination::MissingTarget | Termination::ValidationTimedOut => 1,
            Termination::SyntaxError { status } => status,
        }
    }
}

/// Services the orchestrator drives.
pub struct Collaborators<'a> {
    pub engine: &'a mut dyn TraceEngine,
    pub validator: &'a dyn ScriptValidator,
    pub processors: &'a dyn CommandProcessorFactory,
    pub remote: &'a dyn RemoteConnector,
}

/// Process-level inputs that are not invocation flags.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    /// Value of `PATH`, used to find scripts named without a directory.
    pub search_path: Option<OsString>,
    /// rc files to run, in order, when `--rc` is given.
    pub rc_paths: Vec<PathBuf>,
    pub version: String,
    pub help_text: String,
}

enum State {
    ModeSelect,
    RemoteConnect(RemoteEndpoint),
    LocalPrep(String),
    Validate(SessionContext),
    Launch(SessionContext),
    CommandLoop(SessionContext),
    Done(Termination),
}

impl State {
    fn name(&self) -> &'static str {
        match self {
            State::ModeSelect => "mode_select",
            State::RemoteConnect(_) => "remote_connect",
            State::LocalPrep(_) => "local_prep",
            State::Validate(_) => "validate",
            State::Launch(_) => "launch",
            State::CommandLoop(_) => "command_loop",
            State::Done(_) => "done",
        }
    }
}

pub struct Orchestrator<'a> {
    services: Collaborators<'a>,
    env: Environment,
    out: &'a mut dyn Write,
}

impl<'a> Orchestrator<'a> {
    pub fn new(services: Collaborators<'a>, env: Environment, out: &'a mut dyn Write) -> Self {
        Self { services, env, out }
    }

    pub fn run(&mut self, opts: &InvocationOptions) -> Result<Termination> {
        let mut state = State::ModeSelect;
        loop {
            tracing::debug!(state = state.name(), "orchestrator state");
            state = match state {
                State::ModeSelect => self.select_mode(opts)?,
                State::RemoteConnect(endpoint) => self.connect_remote(&endpoint)?,
                State::LocalPrep(target) => self.prepare(opts, &target)?,
                State::Validate(ctx) => self.validate(ctx)?,
                State::Launch(ctx) => self.launch(opts, ctx)?,
                State::CommandLoop(ctx) => self.command_loop(opts, ctx)?,
                State::Done(termination) => {
                    self.out.flush()?;
                    tracing::debug!(?termination, "orchestrator finished");
                    return Ok(termination);
                }
            };
        }
    }

    fn select_mode(&mut self, opts: &InvocationOptions) -> Result<State> {
        if opts.version {
            write!(self.out, "\n  Running stepline {}\n\n", self.env.version)?;
            return Ok(State::Done(Termination::Version));
        }

        if opts.help {
            write!(self.out, "{}", self.env.help_text)?;
            return Ok(State::Done(Termination::Help));
        }

        if let Some(endpoint) = opts.remote_endpoint() {
            return Ok(State::RemoteConnect(endpoint?));
        }

        match &opts.target {
            Some(target) => Ok(State::LocalPrep(target.clone())),
            None => {
                writeln!(self.out, "{}", MISSING_TARGET_MESSAGE)?;
                Ok(State::Done(Termination::MissingTarget))
            }
        }
    }

    fn connect_remote(&mut self, endpoint: &RemoteEndpoint) -> Result<State> {
        writeln!(self.out, "Connecting to stepline server {}...", endpoint)?;
        self.out.flush()?;

        self.services.remote.connect(endpoint)?;
        Ok(State::Done(Termination::RemoteClosed))
    }

    fn prepare(&mut self, opts: &InvocationOptions, target: &str) -> Result<State> {
        let script = resolve_script(target, self.env.search_path.as_deref());
        let script = absolute_path(&script)?;
        tracing::debug!(requested = target, resolved = %script.display(), "resolved target");

        let mut ctx = SessionContext::new(SessionTarget::new(script))
            .with_script_args(opts.script_args.clone());

        self.services.engine.start()?;

        if opts.rc && self.run_init_scripts(&mut ctx)? == LoopSignal::Quit {
            return Ok(State::Done(Termination::Quit));
        }

        // Command-line flags are applied after the rc file so they take precedence
        ctx.settings.post_mortem = opts.post_mortem;
        ctx.settings.linetrace = opts.trace;

        Ok(State::Validate(ctx))
    }

    fn run_init_scripts(&mut self, ctx: &mut SessionContext) -> Result<LoopSignal> {
        for path in &self.env.rc_paths {
            let script = match InitScript::read(path) {
                Ok(Some(script)) => script,
                Ok(None) => continue,
                Err(err) => {
                    tracing::warn!(path = %path.display(), error = %err, "skipping unreadable init script");
                    writeln!(self.out, "Couldn't read init script {}: {}", path.display(), err)?;
                    continue;
                }
            };

            tracing::debug!(path = %script.path().display(), commands = script.commands().len(), "running init script");
            let mut processor = self.services.processors.create();
            for line in script.commands() {
                if processor.execute_command(ctx, line)? == LoopSignal::Quit {
                    return Ok(LoopSignal::Quit);
                }
            }
        }
        Ok(LoopSignal::Continue)
    }

    fn validate(&mut self, ctx: SessionContext) -> Result<State> {
        match self.services.validator.validate(ctx.target().path())? {
            SyntaxCheck::Passed => Ok(State::Launch(ctx)),
            SyntaxCheck::Failed { status, output } => {
                tracing::debug!(status, "syntax check failed");
                self.out.write_all(output.as_bytes())?;
                Ok(State::Done(Termination::SyntaxError { status }))
            }
            SyntaxCheck::TimedOut { after } => {
                writeln!(
                    self.out,
                    "Syntax check of {} did not finish within {}",
                    ctx.target(),
                    format_duration(after)
                )?;
                Ok(State::Done(Termination::ValidationTimedOut))
            }
        }
    }

    fn launch(&mut self, opts: &InvocationOptions, ctx: SessionContext) -> Result<State> {
        launcher::launch(&mut *self.services.engine, &ctx, opts.stop, &mut *self.out)?;
        Ok(State::CommandLoop(ctx))
    }

    fn command_loop(&mut self, opts: &InvocationOptions, mut ctx: SessionContext) -> Result<State> {
        let signal = {
            let mut processor = self.services.processors.create();
            processor.process_commands(&mut ctx)?
        };
        tracing::debug!(?signal, "command session ended");

        if signal == LoopSignal::Quit || opts.quit {
            return Ok(State::Done(Termination::Quit));
        }
        Ok(State::Validate(ctx))
    }
}

fn format_duration(duration: Duration) -> String {
    if duration.subsec_millis() == 0 {
        format!("{}s", duration.as_secs())
    } else {
        format!("{}ms", duration.as_millis())
    }
}

use crate::{Error, Result, TraceEngine};
use stepline_core::Config;
use stepline_types::{RunFailure, SessionContext};
use std::io::Write;
use std::path::Path;
use std::process::{Command, ExitStatus, Stdio};

pub const ENV_SCRIPT: &str = "STEPLINE_SCRIPT";
pub const ENV_STOP: &str = "STEPLINE_STOP";
pub const ENV_POST_MORTEM: &str = "STEPLINE_POST_MORTEM";
pub const ENV_LINETRACE: &str = "STEPLINE_LINETRACE";

/// Engine that hands the script to an interpreter child process.
///
/// The session settings travel to the child as `STEPLINE_*` environment
/// variables; stdin and stdout are shared with the debugger and stderr is
/// captured so an abnormal exit can be reported with its backtrace.
#[derive(Debug, Clone)]
pub struct InterpreterEngine {
    program: String,
    run_args: Vec<String>,
    started: bool,
}

impl InterpreterEngine {
    pub fn new(program: impl Into<String>, run_args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            run_args,
            started: false,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.interpreter.clone(), config.run_args.clone())
    }
}

impl TraceEngine for InterpreterEngine {
    fn start(&mut self) -> Result<()> {
        if !self.started {
            tracing::debug!(program = %self.program, "trace hook installed");
            self.started = true;
        }
        Ok(())
    }

    fn debug_load(
        &mut self,
        ctx: &SessionContext,
        stop_immediately: bool,
    ) -> Result<Option<RunFailure>> {
        if !self.started {
            return Err(Error::Engine("debug_load called before start".to_string()));
        }

        let script = ctx.target().path();
        let child = Command::new(&self.program)
            .args(&self.run_args)
            .arg(script)
            .args(&ctx.script_args)
            .env(ENV_SCRIPT, script)
            .env(ENV_STOP, flag(stop_immediately))
            .env(ENV_POST_MORTEM, flag(ctx.settings.post_mortem))
            .env(ENV_LINETRACE, flag(ctx.settings.linetrace))
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|err| Error::Engine(format!("failed to start '{}': {}", self.program, err)))?;

        let output = child.wait_with_output()?;
        let stderr = String::from_utf8_lossy(&output.stderr);

        if output.status.success() {
            std::io::stderr().write_all(output.stderr.as_slice())?;
            return Ok(None);
        }

        tracing::debug!(status = ?output.status.code(), "target exited abnormally");
        Ok(Some(failure_from_stderr(&stderr, script, output.status)))
    }
}

fn flag(value: bool) -> &'static str {
    if value { "1" } else { "0" }
}

/// The first non-empty stderr line is the message and the rest is the
/// backtrace. Silent failures get a message built from the exit status.
fn failure_from_stderr(stderr: &str, script: &Path, status: ExitStatus) -> RunFailure {
    let mut lines = stderr
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string);

    match lines.next() {
        Some(message) => RunFailure::new(message, lines.collect()),
        None => {
            let message = match status.code() {
                Some(code) => format!("{} exited with status {}", script.display(), code),
                None => format!("{} was terminated by a signal", script.display()),
            };
            RunFailure::new(message, Vec::new())
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use stepline_types::SessionTarget;
    use tempfile::TempDir;

    fn context_for(dir: &TempDir, body: &str) -> SessionContext {
        let script = dir.path().join("target.sh");
        std::fs::write(&script, body).unwrap();
        SessionContext::new(SessionTarget::new(script))
    }

    #[test]
    fn test_successful_script_has_no_failure() {
        let dir = TempDir::new().unwrap();
        let ctx = context_for(&dir, "exit 0\n");
        let mut engine = InterpreterEngine::new("sh", Vec::new());
        engine.start().unwrap();

        assert_eq!(engine.debug_load(&ctx, true).unwrap(), None);
    }

    #[test]
    fn test_failing_script_reports_stderr() {
        let dir = TempDir::new().unwrap();
        let ctx = context_for(
            &dir,
            "echo 'boom (RuntimeError)' >&2\necho '  from target.sh:2' >&2\nexit 1\n",
        );
        let mut engine = InterpreterEngine::new("sh", Vec::new());
        engine.start().unwrap();

        let failure = engine.debug_load(&ctx, true).unwrap().unwrap();
        assert_eq!(failure.message, "boom (RuntimeError)");
        assert_eq!(failure.backtrace, vec!["from target.sh:2".to_string()]);
    }

    #[test]
    fn test_silent_failure_names_exit_status() {
        let dir = TempDir::new().unwrap();
        let ctx = context_for(&dir, "exit 4\n");
        let mut engine = InterpreterEngine::new("sh", Vec::new());
        engine.start().unwrap();

        let failure = engine.debug_load(&ctx, false).unwrap().unwrap();
        assert!(failure.message.ends_with("exited with status 4"));
        assert!(failure.backtrace.is_empty());
    }

    #[test]
    fn test_settings_and_args_reach_the_child() {
        let dir = TempDir::new().unwrap();
        let mut ctx = context_for(
            &dir,
            "[ \"$STEPLINE_STOP\" = 0 ] || exit 10\n\
             [ \"$STEPLINE_LINETRACE\" = 1 ] || exit 11\n\
             [ \"$STEPLINE_POST_MORTEM\" = 0 ] || exit 12\n\
             [ \"$1\" = alpha ] || exit 13\n",
        )
        .with_script_args(vec!["alpha".to_string()]);
        ctx.settings.linetrace = true;

        let mut engine = InterpreterEngine::new("sh", Vec::new());
        engine.start().unwrap();

        assert_eq!(engine.debug_load(&ctx, false).unwrap(), None);
    }

    #[test]
    fn test_run_before_start_is_an_engine_error() {
        let dir = TempDir::new().unwrap();
        let ctx = context_for(&dir, "exit 0\n");
        let mut engine = InterpreterEngine::new("sh", Vec::new());

        assert!(matches!(
            engine.debug_load(&ctx, true),
            Err(Error::Engine(_))
        ));
    }

    #[test]
    fn test_missing_interpreter_is_an_engine_error() {
        let dir = TempDir::new().unwrap();
        let ctx = context_for(&dir, "exit 0\n");
        let mut engine = InterpreterEngine::new("stepline-no-such-interpreter", Vec::new());
        engine.start().unwrap();

        assert!(matches!(
            engine.debug_load(&ctx, true),
            Err(Error::Engine(_))
        ));
    }
}

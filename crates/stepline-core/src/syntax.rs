//! Pre-flight syntax check of the debugged script.
//!
//! The check runs `<program> <args...> <script>` in a child process with
//! stdout and stderr sharing one pipe, so the captured text reads the way a
//! terminal would have shown it.

use crate::{Config, Error, Result};
use std::io::Read;
use std::path::Path;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};

const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Outcome of a syntax check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyntaxCheck {
    Passed,
    Failed { status: i32, output: String },
    TimedOut { after: Duration },
}

#[derive(Debug, Clone)]
pub struct SyntaxChecker {
    program: String,
    args: Vec<String>,
    timeout: Option<Duration>,
}

impl SyntaxChecker {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
            timeout: None,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.interpreter.clone(), config.syntax_check_args.clone())
            .with_timeout(config.validation_timeout())
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn check(&self, script: &Path) -> Result<SyntaxCheck> {
        let (mut reader, writer) = std::io::pipe()?;

        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .arg(script)
            .stdin(Stdio::null())
            .stdout(writer.try_clone()?)
            .stderr(writer);

        tracing::debug!(program = %self.program, script = %script.display(), "running syntax check");
        let mut child = command.spawn().map_err(|source| Error::Spawn {
            program: self.program.clone(),
            source,
        })?;
        // The command still holds write ends of the pipe; EOF only arrives
        // once every copy is closed.
        drop(command);

        let drain = thread::spawn(move || {
            let mut buf = Vec::new();
            reader.read_to_end(&mut buf).map(|_| buf)
        });

        let status = match self.timeout {
            None => child.wait()?,
            Some(limit) => match wait_timeout(&mut child, limit)? {
                Some(status) => status,
                None => {
                    tracing::warn!(
                        script = %script.display(),
                        timeout_secs = limit.as_secs_f64(),
                        "syntax check timed out, killing it"
                    );
                    // The child may have exited between the last poll and the kill
                    let _ = child.kill();
                    child.wait()?;
                    return Ok(SyntaxCheck::TimedOut { after: limit });
                }
            },
        };

        let output = drain
            .join()
            .map_err(|_| std::io::Error::other("syntax check output reader panicked"))??;

        if status.success() {
            return Ok(SyntaxCheck::Passed);
        }

        Ok(SyntaxCheck::Failed {
            status: exit_code(status),
            output: String::from_utf8_lossy(&output).into_owned(),
        })
    }
}

/// Exit code of a finished child; a child killed by a signal counts as 1.
fn exit_code(status: ExitStatus) -> i32 {
    status.code().unwrap_or(1)
}

fn wait_timeout(child: &mut Child, timeout: Duration) -> std::io::Result<Option<ExitStatus>> {
    let start = Instant::now();
    loop {
        match child.try_wait()? {
            Some(status) => return Ok(Some(status)),
            None => {
                if start.elapsed() > timeout {
                    return Ok(None);
                }
                thread::sleep(POLL_INTERVAL);
            }
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_script(dir: &TempDir, name: &str, body: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn test_valid_script_passes() {
        let dir = TempDir::new().unwrap();
        let script = write_script(&dir, "ok.sh", "echo hello\n");

        let checker = SyntaxChecker::new("sh", vec!["-n".to_string()]);
        assert_eq!(checker.check(&script).unwrap(), SyntaxCheck::Passed);
    }

    #[test]
    fn test_broken_script_reports_status_and_output() {
        let dir = TempDir::new().unwrap();
        let script = write_script(&dir, "broken.sh", "if then fi\n");

        let checker = SyntaxChecker::new("sh", vec!["-n".to_string()]);
        match checker.check(&script).unwrap() {
            SyntaxCheck::Failed { status, output } => {
                assert_ne!(status, 0);
                assert!(!output.is_empty());
            }
            other => panic!("expected failure, got {:?}", other),
        }
    }

    #[test]
    fn test_signal_killed_check_reports_status_one() {
        let checker = SyntaxChecker::new(
            "sh",
            vec![
                "-c".to_string(),
                "echo partial; kill -9 $$".to_string(),
                "sh".to_string(),
            ],
        );

        let result = checker.check(Path::new("unused.rb")).unwrap();
        assert_eq!(
            result,
            SyntaxCheck::Failed {
                status: 1,
                output: "partial\n".to_string()
            }
        );
    }

    #[test]
    fn test_stdout_and_stderr_are_combined() {
        let checker = SyntaxChecker::new(
            "sh",
            vec![
                "-c".to_string(),
                "echo out; echo err >&2; exit 3".to_string(),
                "sh".to_string(),
            ],
        );

        let result = checker.check(Path::new("unused.rb")).unwrap();
        assert_eq!(
            result,
            SyntaxCheck::Failed {
                status: 3,
                output: "out\nerr\n".to_string()
            }
        );
    }

    #[test]
    fn test_timeout_kills_hanging_check() {
        let checker =
            SyntaxChecker::new("sleep", Vec::new()).with_timeout(Some(Duration::from_millis(200)));

        let started = Instant::now();
        let result = checker.check(Path::new("30")).unwrap();

        assert_eq!(
            result,
            SyntaxCheck::TimedOut {
                after: Duration::from_millis(200)
            }
        );
        assert!(started.elapsed() < Duration::from_secs(10));
    }

    #[test]
    fn test_missing_program_is_a_spawn_error() {
        let checker = SyntaxChecker::new("stepline-no-such-interpreter", Vec::new());
        let err = checker.check(Path::new("script.rb")).unwrap_err();
        assert!(matches!(err, Error::Spawn { .. }));
    }
}

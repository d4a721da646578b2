//! TestWorld pattern for declarative integration test setup.
//!
//! Provides a fluent interface for:
//! - Creating isolated test environments (own HOME, config file and PATH entry)
//! - Writing target scripts and rc files
//! - Installing a fake interpreter that stands in for the real one
//! - Executing CLI commands with proper context

use anyhow::Result;
use assert_cmd::Command;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Shell script used as the interpreter in CLI tests.
///
/// - `-c <script>`: syntax check. Fails with status 3 when the script contains
///   `SYNTAX_ERROR`, hangs when it contains `HANG`, else prints `Syntax OK`.
/// - `<script> [args]`: prints a `run` line with the `STEPLINE_*` settings and
///   exits 1 with a backtrace on stderr when the script contains `RAISE`.
pub const FAKE_INTERPRETER: &str = r#"#!/bin/sh
if [ "$1" = "-c" ]; then
  shift
  if grep -q SYNTAX_ERROR "$1"; then
    echo "$(basename "$1"):1: syntax error, unexpected end-of-input"
    exit 3
  fi
  if grep -q HANG "$1"; then
    exec sleep 30
  fi
  echo "Syntax OK"
  exit 0
fi
script="$1"
shift
echo "run $(basename "$script") stop=$STEPLINE_STOP post_mortem=$STEPLINE_POST_MORTEM linetrace=$STEPLINE_LINETRACE args=$*"
if grep -q RAISE "$script"; then
  echo "$(basename "$script"):1:in '<main>': boom (RuntimeError)" >&2
  echo "	from $(basename "$script"):1" >&2
  exit 1
fi
exit 0
"#;

/// Declarative test environment builder.
///
/// # Example
/// ```no_run
/// use stepline_testing::TestWorld;
///
/// let world = TestWorld::new()
///     .with_fake_interpreter()
///     .with_script("app.rb", "puts 1\n");
///
/// let mut cmd = assert_cmd::Command::new("stepline");
/// world.configure_command(&mut cmd);
/// ```
pub struct TestWorld {
    temp_dir: TempDir,
    cwd: PathBuf,
    home: PathBuf,
    bin_dir: PathBuf,
    config_path: PathBuf,
    env_vars: HashMap<String, String>,
}

impl Default for TestWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl TestWorld {
    /// Create a new isolated test environment.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let base_path = temp_dir.path().to_path_buf();
        let home = base_path.join("home");
        let bin_dir = base_path.join("bin");
        let cwd = base_path.join("work");

        fs::create_dir_all(&home).expect("Failed to create home dir");
        fs::create_dir_all(&bin_dir).expect("Failed to create bin dir");
        fs::create_dir_all(&cwd).expect("Failed to create work dir");

        Self {
            config_path: home.join("config.toml"),
            cwd,
            home,
            bin_dir,
            temp_dir,
            env_vars: HashMap::new(),
        }
    }

    /// Working directory commands run in.
    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// Directory used as HOME.
    pub fn home(&self) -> &Path {
        &self.home
    }

    /// Directory placed on PATH for commands.
    pub fn bin_dir(&self) -> &Path {
        &self.bin_dir
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Get the temp directory root.
    pub fn temp_dir(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Set an environment variable for CLI execution.
    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env_vars.insert(key.into(), value.into());
        self
    }

    /// Write a script relative to the working directory.
    pub fn with_script(self, relative: &str, body: &str) -> Self {
        self.write_file(&self.cwd.join(relative), body);
        self
    }

    /// Write a script into the PATH directory.
    pub fn with_script_on_path(self, name: &str, body: &str) -> Self {
        self.write_file(&self.bin_dir.join(name), body);
        self
    }

    /// Write an rc file into the working directory.
    pub fn with_rc(self, body: &str) -> Self {
        self.write_file(&self.cwd.join(".steplinerc"), body);
        self
    }

    /// Write an rc file into HOME.
    pub fn with_home_rc(self, body: &str) -> Self {
        self.write_file(&self.home.join(".steplinerc"), body);
        self
    }

    /// Install [`FAKE_INTERPRETER`] and point the config file at it.
    pub fn with_fake_interpreter(self) -> Self {
        self.with_fake_interpreter_config("")
    }

    /// Like [`TestWorld::with_fake_interpreter`], with extra TOML lines
    /// appended to the config file.
    pub fn with_fake_interpreter_config(self, extra_toml: &str) -> Self {
        let interpreter = self.temp_dir.path().join("fake-interpreter");
        self.write_file(&interpreter, FAKE_INTERPRETER);
        make_executable(&interpreter).expect("Failed to mark interpreter executable");

        let config = format!(
            "interpreter = {:?}\nsyntax_check_args = [\"-c\"]\nrc_file = \".steplinerc\"\n{}",
            interpreter.display().to_string(),
            extra_toml
        );
        self.write_file(&self.config_path, &config);
        self
    }

    fn write_file(&self, path: &Path, body: &str) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent dir");
        }
        fs::write(path, body).expect("Failed to write file");
    }

    /// PATH value for commands: the world's bin dir, then the inherited PATH
    /// so `sh`, `grep` and friends keep working.
    pub fn search_path(&self) -> std::ffi::OsString {
        let mut dirs = vec![self.bin_dir.clone()];
        if let Some(inherited) = std::env::var_os("PATH") {
            dirs.extend(std::env::split_paths(&inherited));
        }
        std::env::join_paths(dirs).expect("PATH entries must not contain separators")
    }

    /// Configure a CLI command with this test environment's settings.
    ///
    /// The caller must provide the base command (e.g., from `cargo_bin_cmd!("stepline")`).
    /// This method configures it with the config file, HOME, PATH, cwd and env vars.
    pub fn configure_command<'a>(&self, cmd: &'a mut Command) -> &'a mut Command {
        cmd.current_dir(&self.cwd)
            .env("HOME", &self.home)
            .env("PATH", self.search_path())
            .env("STEPLINE_CONFIG", &self.config_path)
            .env_remove("STEPLINE_LOG");

        for (key, value) in &self.env_vars {
            cmd.env(key, value);
        }

        cmd
    }
}

#[cfg(unix)]
fn make_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let mut perms = fs::metadata(path)?.permissions();
    perms.set_mode(0o755);
    fs::set_permissions(path, perms)?;
    Ok(())
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) -> Result<()> {
    Ok(())
}

//! End-to-end runs of the binary against a fake interpreter.
#![cfg(unix)]

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use stepline_testing::TestWorld;

fn stepline(world: &TestWorld) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("stepline");
    world.configure_command(&mut cmd);
    cmd
}

fn run_count(stdout: &[u8], script: &str) -> usize {
    String::from_utf8_lossy(stdout)
        .matches(&format!("run {} ", script))
        .count()
}

#[test]
fn test_version_banner_ignores_target() {
    let world = TestWorld::new().with_fake_interpreter();

    stepline(&world)
        .args(["--version", "app.rb"])
        .assert()
        .success()
        .stdout(format!("\n  Running stepline {}\n\n", env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_help_lists_options() {
    let world = TestWorld::new().with_fake_interpreter();

    stepline(&world)
        .args(["-h", "app.rb"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Usage: stepline [OPTIONS] <SCRIPT> [SCRIPT_ARGS]...",
        ))
        .stdout(predicate::str::contains("--post-mortem"))
        .stdout(predicate::str::contains("--remote"))
        .stdout(predicate::str::contains("run app.rb").not());
}

#[test]
fn test_missing_target_is_a_usage_error() {
    let world = TestWorld::new().with_fake_interpreter();

    stepline(&world)
        .assert()
        .code(1)
        .stdout("You must specify a program to debug...\n");
}

#[test]
fn test_syntax_error_exits_with_checker_status() {
    let world = TestWorld::new()
        .with_fake_interpreter()
        .with_script("app.rb", "def broken\n# SYNTAX_ERROR\n");

    stepline(&world)
        .arg("app.rb")
        .write_stdin("c\n")
        .assert()
        .code(3)
        .stdout(predicate::str::contains(
            "app.rb:1: syntax error, unexpected end-of-input",
        ))
        .stdout(predicate::str::contains("run app.rb").not());
}

#[test]
fn test_quit_runs_once_even_after_continue() {
    let world = TestWorld::new()
        .with_fake_interpreter()
        .with_script("app.rb", "puts 1\n");

    let output = stepline(&world)
        .args(["--quit", "app.rb"])
        .write_stdin("c\nc\n")
        .output()
        .unwrap();

    assert!(output.status.success());
    assert_eq!(run_count(&output.stdout, "app.rb"), 1);
}

#[test]
fn test_session_reruns_until_quit() {
    let world = TestWorld::new()
        .with_fake_interpreter()
        .with_script("app.rb", "puts 1\n");

    let output = stepline(&world)
        .arg("app.rb")
        .write_stdin("c\nrestart\nq\n")
        .output()
        .unwrap();

    assert!(output.status.success());
    assert_eq!(run_count(&output.stdout, "app.rb"), 3);
}

#[test]
fn test_end_of_input_quits() {
    let world = TestWorld::new()
        .with_fake_interpreter()
        .with_script("app.rb", "puts 1\n");

    let output = stepline(&world).arg("app.rb").write_stdin("").output().unwrap();

    assert!(output.status.success());
    assert_eq!(run_count(&output.stdout, "app.rb"), 1);
}

#[test]
fn test_flags_and_script_args_reach_the_interpreter() {
    let world = TestWorld::new()
        .with_fake_interpreter()
        .with_script("app.rb", "puts 1\n");

    stepline(&world)
        .args(["-m", "-t", "-n", "-q", "app.rb", "one", "two"])
        .write_stdin("")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "run app.rb stop=0 post_mortem=1 linetrace=1 args=one two",
        ));
}

#[test]
fn test_runtime_failure_is_reported_and_session_continues() {
    let world = TestWorld::new()
        .with_fake_interpreter()
        .with_script("app.rb", "RAISE\n");

    let output = stepline(&world)
        .arg("app.rb")
        .write_stdin("c\nq\n")
        .output()
        .unwrap();

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success(), "{}", stdout);
    assert!(
        stdout.contains("app.rb:1:in '<main>': boom (RuntimeError)\n\tfrom app.rb:1\n"),
        "{}",
        stdout
    );
    assert_eq!(run_count(&output.stdout, "app.rb"), 2);
}

#[test]
fn test_rc_file_runs_before_first_launch_and_flags_win() {
    let world = TestWorld::new()
        .with_fake_interpreter()
        .with_script("app.rb", "puts 1\n")
        .with_rc("# team defaults\nset linetrace on\n");

    let output = stepline(&world)
        .args(["--rc", "--quit", "app.rb"])
        .write_stdin("")
        .output()
        .unwrap();

    let stdout = String::from_utf8_lossy(&output.stdout);
    let rc_at = stdout.find("linetrace is on").expect("rc command output");
    let run_at = stdout
        .find("run app.rb stop=1 post_mortem=0 linetrace=0")
        .expect("run line");
    assert!(rc_at < run_at, "{}", stdout);
}

#[test]
fn test_home_rc_is_read_too() {
    let world = TestWorld::new()
        .with_fake_interpreter()
        .with_script("app.rb", "puts 1\n")
        .with_home_rc("quit\n");

    stepline(&world)
        .args(["-x", "app.rb"])
        .write_stdin("")
        .assert()
        .success()
        .stdout(predicate::str::contains("run app.rb").not());
}

#[test]
fn test_rc_file_needs_the_flag() {
    let world = TestWorld::new()
        .with_fake_interpreter()
        .with_script("app.rb", "puts 1\n")
        .with_rc("quit\n");

    stepline(&world)
        .args(["-q", "app.rb"])
        .write_stdin("")
        .assert()
        .success()
        .stdout(predicate::str::contains("run app.rb"));
}

#[test]
fn test_script_is_found_on_path() {
    let world = TestWorld::new()
        .with_fake_interpreter()
        .with_script_on_path("stepline-path-tool", "puts 1\n");

    stepline(&world)
        .args(["-q", "stepline-path-tool"])
        .write_stdin("")
        .assert()
        .success()
        .stdout(predicate::str::contains("run stepline-path-tool"));
}

#[test]
fn test_restart_can_switch_scripts() {
    let world = TestWorld::new()
        .with_fake_interpreter()
        .with_script("app.rb", "puts 1\n")
        .with_script("other.rb", "puts 2\n");

    let output = stepline(&world)
        .arg("app.rb")
        .write_stdin("r other.rb\nq\n")
        .output()
        .unwrap();

    assert!(output.status.success());
    assert_eq!(run_count(&output.stdout, "app.rb"), 1);
    assert_eq!(run_count(&output.stdout, "other.rb"), 1);
}

#[test]
fn test_unknown_command_keeps_the_prompt() {
    let world = TestWorld::new()
        .with_fake_interpreter()
        .with_script("app.rb", "puts 1\n");

    stepline(&world)
        .arg("app.rb")
        .write_stdin("frobnicate\nq\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("*** Unknown command: \"frobnicate\""));
}

#[test]
fn test_validation_timeout_is_fatal() {
    let world = TestWorld::new()
        .with_fake_interpreter_config("validation_timeout = 1\n")
        .with_script("app.rb", "HANG\n");

    stepline(&world)
        .arg("app.rb")
        .write_stdin("")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("did not finish within 1s"))
        .stdout(predicate::str::contains("run app.rb").not());
}

#[test]
fn test_broken_config_is_reported() {
    let world = TestWorld::new().with_script("app.rb", "puts 1\n");
    std::fs::write(world.config_path(), "interpreter = [not toml").unwrap();

    stepline(&world)
        .arg("app.rb")
        .assert()
        .code(1)
        .stderr(predicate::str::starts_with("Error: Failed to load config from"));
}

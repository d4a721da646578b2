use crate::console::ConsoleFactory;
use crate::{Cli, logging};
use anyhow::{Context, Result};
use clap::CommandFactory;
use stepline_core::{Config, SyntaxChecker, resolve_config_path};
use stepline_runtime::{
    Collaborators, Environment, InitScript, InterpreterEngine, Orchestrator, StdioRelay,
    TcpConnector,
};

/// Run one invocation and return the process exit code.
pub fn run(cli: Cli) -> Result<i32> {
    logging::init(cli.log_level);

    let opts = cli.options();
    let config_path = resolve_config_path(cli.config.as_deref())?;
    let config = Config::load_from(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;

    // Ctrl-C belongs to the program being debugged; the debugger stays up
    ctrlc::set_handler(|| tracing::debug!("interrupt received"))
        .context("Failed to install Ctrl-C handler")?;

    let mut engine = InterpreterEngine::from_config(&config);
    let validator = SyntaxChecker::from_config(&config);
    let processors = ConsoleFactory::new();
    let remote = TcpConnector::new(StdioRelay, config.connect_timeout());

    let cwd = std::env::current_dir().context("Failed to read current directory")?;
    let env = Environment {
        search_path: std::env::var_os("PATH"),
        rc_paths: InitScript::candidates(&cwd, dirs::home_dir().as_deref(), &config.rc_file),
        version: env!("CARGO_PKG_VERSION").to_string(),
        help_text: Cli::command().render_help().to_string(),
    };

    let services = Collaborators {
        engine: &mut engine,
        validator: &validator,
        processors: &processors,
        remote: &remote,
    };
    let mut stdout = std::io::stdout();
    let termination = Orchestrator::new(services, env, &mut stdout).run(&opts)?;

    tracing::debug!(?termination, code = termination.exit_code(), "exiting");
    Ok(termination.exit_code())
}

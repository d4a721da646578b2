use crate::LogLevel;
use clap::Parser;
use stepline_types::InvocationOptions;

#[derive(Parser, Debug)]
#[command(name = "stepline")]
#[command(about = "Debug a script: check it, run it under trace, inspect it, repeat", long_about = None)]
#[command(override_usage = "stepline [OPTIONS] <SCRIPT> [SCRIPT_ARGS]...")]
#[command(disable_help_flag = true, disable_version_flag = true)]
pub struct Cli {
    /// Print the version banner and exit
    #[arg(short = 'v', long)]
    pub version: bool,

    /// Print this help and exit
    #[arg(short = 'h', long)]
    pub help: bool,

    /// Debug a program running elsewhere instead of a local script
    #[arg(short = 'R', long, num_args = 1..=2, value_names = ["HOST", "PORT"])]
    pub remote: Option<Vec<String>>,

    /// Run the script once, then exit instead of starting over
    #[arg(short = 'q', long)]
    pub quit: bool,

    /// Run commands from .steplinerc before the first run
    #[arg(short = 'x', long)]
    pub rc: bool,

    /// Stay attached after an unhandled failure
    #[arg(short = 'm', long)]
    pub post_mortem: bool,

    /// Print every line as it executes
    #[arg(short = 't', long)]
    pub trace: bool,

    /// Do not halt at the first line
    #[arg(short = 'n', long)]
    pub no_stop: bool,

    /// Config file (defaults to $STEPLINE_CONFIG, then the user config dir)
    #[arg(long, value_name = "PATH")]
    pub config: Option<String>,

    #[arg(long, default_value = "warn")]
    pub log_level: LogLevel,

    /// Script to debug; looked up on PATH when not found as given
    pub script: Option<String>,

    /// Arguments handed to the script
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub script_args: Vec<String>,
}

impl Cli {
    pub fn options(&self) -> InvocationOptions {
        InvocationOptions {
            version: self.version,
            help: self.help,
            remote: self.remote.clone(),
            quit: self.quit,
            rc: self.rc,
            post_mortem: self.post_mortem,
            trace: self.trace,
            stop: !self.no_stop,
            target: self.script.clone(),
            script_args: self.script_args.clone(),
        }
    }
}

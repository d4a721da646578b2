//! Interactive command session on the terminal.
//!
//! One `ConsoleProcessor` is created per stop. It reads commands until one of
//! them lets the program go on (`continue`, `restart`) or leaves the debugger
//! (`quit`, or end of input).

use is_terminal::IsTerminal;
use owo_colors::OwoColorize;
use std::io::{self, BufRead, Write};
use stepline_core::absolute_path;
use stepline_runtime::{CommandProcessor, CommandProcessorFactory, Result};
use stepline_types::{LoopSignal, SessionContext, SessionTarget, Setting};

pub const PROMPT: &str = "(stepline) ";

const HELP: &str = "\
Commands:
  c, continue             run the script again
  r, restart [script]     run again, optionally switching to another script
  q, quit, exit           leave the debugger
  set <setting> on|off    change post_mortem or linetrace
  i, info                 show the current script and settings
  h, help                 show this list
";

pub struct ConsoleProcessor<R, W> {
    input: R,
    output: W,
    color: bool,
}

impl<R: BufRead, W: Write> ConsoleProcessor<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            color: false,
        }
    }

    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    fn prompt(&mut self) -> io::Result<()> {
        if self.color {
            write!(self.output, "{}", PROMPT.bold())?;
        } else {
            write!(self.output, "{}", PROMPT)?;
        }
        self.output.flush()
    }

    fn complain(&mut self, message: &str) -> io::Result<()> {
        if self.color {
            writeln!(self.output, "{}", format!("*** {}", message).red())
        } else {
            writeln!(self.output, "*** {}", message)
        }
    }

    /// `None` keeps the session open.
    fn dispatch(&mut self, ctx: &mut SessionContext, line: &str) -> Result<Option<LoopSignal>> {
        let words: Vec<&str> = line.split_whitespace().collect();
        match words.as_slice() {
            [] => Ok(None),
            ["c" | "continue"] => Ok(Some(LoopSignal::Continue)),
            ["r" | "restart"] => Ok(Some(LoopSignal::Restart)),
            ["r" | "restart", script] => {
                let path = absolute_path(std::path::Path::new(script))?;
                let previous = ctx.replace_target(SessionTarget::new(path));
                tracing::debug!(from = %previous, to = %ctx.target(), "switched target");
                Ok(Some(LoopSignal::Restart))
            }
            ["q" | "quit" | "exit"] => Ok(Some(LoopSignal::Quit)),
            ["set", name, value] => {
                self.set(ctx, name, value)?;
                Ok(None)
            }
            ["i" | "info"] => {
                self.info(ctx)?;
                Ok(None)
            }
            ["h" | "help"] => {
                self.output.write_all(HELP.as_bytes())?;
                Ok(None)
            }
            _ => {
                self.complain(&format!("Unknown command: \"{}\". Try \"help\"", line))?;
                Ok(None)
            }
        }
    }

    fn set(&mut self, ctx: &mut SessionContext, name: &str, value: &str) -> io::Result<()> {
        let setting = match name.parse::<Setting>() {
            Ok(setting) => setting,
            Err(err) => return self.complain(&err.to_string()),
        };
        let enabled = match value {
            "on" | "true" | "1" => true,
            "off" | "false" | "0" => false,
            other => return self.complain(&format!("Expected on or off, got \"{}\"", other)),
        };

        ctx.settings.set(setting, enabled);
        writeln!(self.output, "{} is {}", setting, on_off(enabled))
    }

    fn info(&mut self, ctx: &SessionContext) -> io::Result<()> {
        writeln!(self.output, "Script: {}", ctx.target())?;
        if !ctx.script_args.is_empty() {
            writeln!(self.output, "Arguments: {}", ctx.script_args.join(" "))?;
        }
        for setting in Setting::ALL {
            writeln!(self.output, "{}: {}", setting, on_off(ctx.settings.get(setting)))?;
        }
        Ok(())
    }
}

fn on_off(value: bool) -> &'static str {
    if value { "on" } else { "off" }
}

impl<R: BufRead, W: Write> CommandProcessor for ConsoleProcessor<R, W> {
    fn process_commands(&mut self, ctx: &mut SessionContext) -> Result<LoopSignal> {
        let mut line = String::new();
        loop {
            self.prompt()?;
            line.clear();
            if self.input.read_line(&mut line)? == 0 {
                writeln!(self.output)?;
                return Ok(LoopSignal::Quit);
            }
            if let Some(signal) = self.dispatch(ctx, line.trim())? {
                return Ok(signal);
            }
        }
    }

    fn execute_command(&mut self, ctx: &mut SessionContext, line: &str) -> Result<LoopSignal> {
        Ok(self
            .dispatch(ctx, line.trim())?
            .unwrap_or(LoopSignal::Continue))
    }
}

/// Hands out console processors bound to the process's stdin and stdout.
pub struct ConsoleFactory {
    color: bool,
}

impl ConsoleFactory {
    pub fn new() -> Self {
        Self {
            color: io::stdout().is_terminal(),
        }
    }
}

impl Default for ConsoleFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandProcessorFactory for ConsoleFactory {
    fn create(&self) -> Box<dyn CommandProcessor + '_> {
        Box::new(ConsoleProcessor::new(io::stdin().lock(), io::stdout()).with_color(self.color))
    }
}

//! Process module - Running external package managers and build tools
//!
//! Every run blocks until the child exits. Combined stdout/stderr is handed
//! to a callback line by line as it arrives. When a terminal is available the
//! child can be attached to it instead; failing to attach is only a warning.

mod internal;

use anyhow::Result;
use std::path::Path;

pub use internal::{tty_available, Invocation, Program, SystemRunner, TtyMode, TTY_DEVICE};

/// Indentation for echoed child output
pub const OUTPUT_INDENT: &str = "    ";

/// Something that can execute an [`Invocation`]
pub trait Runner {
    /// Run to completion and return the exit code
    ///
    /// `on_line` is called once per output line, without the line terminator.
    fn run(&self, invocation: &Invocation, on_line: &mut dyn FnMut(&str)) -> Result<i32>;
}

impl Runner for SystemRunner {
    fn run(&self, invocation: &Invocation, on_line: &mut dyn FnMut(&str)) -> Result<i32> {
        self.execute(invocation, on_line)
    }
}

/// Print a line of child output
pub fn echo_line(line: &str) {
    println!("{OUTPUT_INDENT}{line}");
}

/// Run `commands` as one shell line joined with `&&`
///
/// Returns whether the whole chain succeeded.
pub fn run_commands(runner: &dyn Runner, commands: &[&str], cwd: &Path) -> Result<bool> {
    let invocation = Invocation::shell(commands.join(" && ")).current_dir(cwd);
    let code = runner.run(&invocation, &mut |line| echo_line(line))?;
    if code != 0 {
        log::debug!("`{}` exited with {code}", invocation.display());
    }
    Ok(code == 0)
}

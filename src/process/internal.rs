//! Internal implementation for process module
//!
//! Children either share the controlling terminal (TTY mode) or run with
//! piped stdout/stderr. Piped output is read by one thread per stream and
//! handed to the caller's callback on the calling thread, one line at a time.

use anyhow::{Context, Result};
use colored::Colorize;
use std::fs::{File, OpenOptions};
use std::io::{self, BufRead, BufReader, Read};
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};
use std::sync::mpsc;
use std::thread;

/// Controlling terminal device
pub const TTY_DEVICE: &str = "/dev/tty";

// =============================================================================
// Invocation
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Program {
    /// A command line interpreted by the platform shell
    Shell(String),
    /// Program and arguments, no shell involved
    Argv(Vec<String>),
}

/// What to run, where, and with which extra environment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: Program,
    pub cwd: Option<PathBuf>,
    pub env: Vec<(String, String)>,
}

impl Invocation {
    pub fn shell(line: impl Into<String>) -> Self {
        Self::new(Program::Shell(line.into()))
    }

    pub fn argv<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(Program::Argv(args.into_iter().map(Into::into).collect()))
    }

    fn new(program: Program) -> Self {
        Self {
            program,
            cwd: None,
            env: Vec::new(),
        }
    }

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    /// Add a variable on top of the inherited environment
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    /// Human readable command line
    pub fn display(&self) -> String {
        match &self.program {
            Program::Shell(line) => line.clone(),
            Program::Argv(args) => args.join(" "),
        }
    }

    fn command(&self) -> Result<Command> {
        let mut cmd = match &self.program {
            Program::Shell(line) => shell_command(line),
            Program::Argv(args) => {
                let Some((program, rest)) = args.split_first() else {
                    anyhow::bail!("Empty command");
                };
                let mut cmd = Command::new(program);
                cmd.args(rest);
                cmd
            }
        };

        if let Some(dir) = &self.cwd {
            cmd.current_dir(dir);
        }
        cmd.envs(self.env.iter().map(|(k, v)| (k, v)));
        Ok(cmd)
    }
}

#[cfg(not(windows))]
fn shell_command(line: &str) -> Command {
    let mut cmd = Command::new("sh");
    cmd.arg("-c").arg(line);
    cmd
}

#[cfg(windows)]
fn shell_command(line: &str) -> Command {
    let mut cmd = Command::new("cmd");
    cmd.arg("/C").arg(line);
    cmd
}

// =============================================================================
// TTY
// =============================================================================

/// Whether to hand the terminal to child processes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TtyMode {
    /// Attach when /dev/tty exists and is readable
    #[default]
    Auto,
    /// Always pipe output
    Never,
}

/// True when a terminal device exists and can be read
pub fn tty_available() -> bool {
    if cfg!(windows) {
        return false;
    }
    let device = Path::new(TTY_DEVICE);
    device.exists() && File::open(device).is_ok()
}

fn open_tty() -> io::Result<(File, File, File)> {
    let input = OpenOptions::new().read(true).open(TTY_DEVICE)?;
    let output = OpenOptions::new().write(true).open(TTY_DEVICE)?;
    let errors = output.try_clone()?;
    Ok((input, output, errors))
}

// =============================================================================
// Running
// =============================================================================

/// Runs invocations as real child processes
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner {
    pub tty: TtyMode,
}

impl SystemRunner {
    pub fn new(tty: TtyMode) -> Self {
        Self { tty }
    }

    pub fn execute(&self, invocation: &Invocation, on_line: &mut dyn FnMut(&str)) -> Result<i32> {
        let mut cmd = invocation.command()?;
        log::debug!("running `{}`", invocation.display());

        if self.tty == TtyMode::Auto && tty_available() {
            return run_attached(&mut cmd, invocation, open_tty, on_line);
        }

        run_piped(&mut cmd, invocation, on_line)
    }
}

/// Attach stdin/stdout/stderr to the handles from `open`, piping when it fails
fn run_attached(
    cmd: &mut Command,
    invocation: &Invocation,
    open: impl FnOnce() -> io::Result<(File, File, File)>,
    on_line: &mut dyn FnMut(&str),
) -> Result<i32> {
    match open() {
        Ok((input, output, errors)) => {
            let status = cmd
                .stdin(Stdio::from(input))
                .stdout(Stdio::from(output))
                .stderr(Stdio::from(errors))
                .status()
                .with_context(|| format!("Failed to run `{}`", invocation.display()))?;
            Ok(exit_code(status))
        }
        Err(e) => {
            let message = format!("TTY mode requires {TTY_DEVICE} to be read/writable: {e}");
            log::warn!("{message}");
            eprintln!("  {} {}\n", " WARN ".black().on_yellow(), message);
            run_piped(cmd, invocation, on_line)
        }
    }
}

fn run_piped(cmd: &mut Command, invocation: &Invocation, on_line: &mut dyn FnMut(&str)) -> Result<i32> {
    let mut child = cmd
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .with_context(|| format!("Failed to run `{}`", invocation.display()))?;

    let (tx, rx) = mpsc::channel::<String>();
    let mut readers = Vec::new();
    if let Some(stdout) = child.stdout.take() {
        readers.push(forward_lines(stdout, tx.clone()));
    }
    if let Some(stderr) = child.stderr.take() {
        readers.push(forward_lines(stderr, tx.clone()));
    }
    drop(tx);

    // Ends once both streams are closed
    for line in rx {
        on_line(&line);
    }
    for reader in readers {
        if reader.join().is_err() {
            log::debug!("output reader for `{}` panicked", invocation.display());
        }
    }

    let status = child
        .wait()
        .with_context(|| format!("Failed to wait for `{}`", invocation.display()))?;
    Ok(exit_code(status))
}

fn forward_lines<R: Read + Send + 'static>(stream: R, tx: mpsc::Sender<String>) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let mut reader = BufReader::new(stream);
        let mut buf = Vec::new();
        loop {
            buf.clear();
            match reader.read_until(b'\n', &mut buf) {
                Ok(0) => break,
                Err(e) => {
                    log::debug!("stopped reading child output: {e}");
                    break;
                }
                Ok(_) => {
                    let line = String::from_utf8_lossy(&buf);
                    let line = line.trim_end_matches(['\n', '\r']);
                    if tx.send(line.to_string()).is_err() {
                        break;
                    }
                }
            }
        }
    })
}

/// Exit code, with signals reported as 128 + signal number
fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }

    1
}

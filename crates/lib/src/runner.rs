//! External command execution.
//!
//! Commands are spawned from a literal argument vector, never through a shell.
//! A non-zero exit is reported in [`CommandResult`], not as an error: callers
//! decide whether a failed command is fatal.

use std::collections::VecDeque;
use std::process::Stdio;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::{ChildStderr, Command};
use tracing::debug;

/// Lines of stderr kept from a non-capturing run.
pub const STDERR_TAIL_LINES: usize = 20;

/// Errors of the runner itself (the command never ran to completion).
#[derive(Debug, Error)]
pub enum RunError {
  #[error("empty command")]
  EmptyCommand,

  #[error("failed to execute '{program}'. Is it installed?")]
  Spawn {
    program: String,
    #[source]
    source: std::io::Error,
  },

  #[error("failed waiting for '{program}'")]
  Wait {
    program: String,
    #[source]
    source: std::io::Error,
  },
}

/// Outcome of one external command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandResult {
  /// Exit status was zero.
  pub success: bool,
  /// Exit code, `None` if terminated by signal.
  pub code: Option<i32>,
  /// Captured stdout. Empty unless the command was run capturing.
  pub stdout: String,
  /// Last lines written to stderr.
  pub stderr_tail: Vec<String>,
}

impl CommandResult {
  /// A finished command with the given exit code and stdout.
  pub fn exited(code: i32, stdout: impl Into<String>) -> Self {
    Self {
      success: code == 0,
      code: Some(code),
      stdout: stdout.into(),
      stderr_tail: Vec::new(),
    }
  }
}

/// Human-readable exit status for error messages.
pub fn describe_exit(code: &Option<i32>) -> String {
  match code {
    Some(code) => format!("exit code {}", code),
    None => "termination by signal".to_string(),
  }
}

/// Runs external commands for the workflow.
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
  /// Run a command while showing progress titled `title`. Stdout is not kept.
  async fn run(&self, title: &str, argv: &[String]) -> Result<CommandResult, RunError>;

  /// Run a command and capture its stdout.
  async fn run_capturing(&self, argv: &[String]) -> Result<CommandResult, RunError>;
}

/// Spawns real processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner {
  accessible: bool,
}

impl SystemRunner {
  /// `accessible` replaces the spinner with plain status lines.
  pub fn new(accessible: bool) -> Self {
    Self { accessible }
  }
}

fn command_for(argv: &[String]) -> Result<(Command, &str), RunError> {
  let (program, args) = argv.split_first().ok_or(RunError::EmptyCommand)?;
  let mut command = Command::new(program);
  command.args(args);
  Ok((command, program))
}

impl CommandRunner for SystemRunner {
  async fn run(&self, title: &str, argv: &[String]) -> Result<CommandResult, RunError> {
    let (mut command, program) = command_for(argv)?;
    command
      .stdin(Stdio::inherit())
      .stdout(Stdio::null())
      .stderr(Stdio::piped());

    debug!(cmd = %argv.join(" "), "spawning process");

    let progress = Progress::start(title, self.accessible);
    let mut child = match command.spawn() {
      Ok(child) => child,
      Err(source) => {
        progress.finish(false);
        return Err(RunError::Spawn {
          program: program.to_string(),
          source,
        });
      }
    };

    let stderr = child.stderr.take();
    let (status, stderr_tail) = tokio::join!(child.wait(), stderr_tail(stderr));

    let status = match status {
      Ok(status) => status,
      Err(source) => {
        progress.finish(false);
        return Err(RunError::Wait {
          program: program.to_string(),
          source,
        });
      }
    };
    progress.finish(status.success());

    debug!(cmd = %argv.join(" "), code = ?status.code(), "process exited");

    Ok(CommandResult {
      success: status.success(),
      code: status.code(),
      stdout: String::new(),
      stderr_tail,
    })
  }

  async fn run_capturing(&self, argv: &[String]) -> Result<CommandResult, RunError> {
    let (mut command, program) = command_for(argv)?;

    debug!(cmd = %argv.join(" "), "spawning process");

    let output = command.output().await.map_err(|source| RunError::Spawn {
      program: program.to_string(),
      source,
    })?;

    let stderr = String::from_utf8_lossy(&output.stderr);
    let skip = stderr.lines().count().saturating_sub(STDERR_TAIL_LINES);

    Ok(CommandResult {
      success: output.status.success(),
      code: output.status.code(),
      stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
      stderr_tail: stderr.lines().skip(skip).map(str::to_string).collect(),
    })
  }
}

/// Drain stderr, keeping only the last [`STDERR_TAIL_LINES`] lines.
async fn stderr_tail(stderr: Option<ChildStderr>) -> Vec<String> {
  let Some(stderr) = stderr else {
    return Vec::new();
  };

  let mut reader = BufReader::new(stderr);
  let mut tail = VecDeque::with_capacity(STDERR_TAIL_LINES);
  let mut buf = Vec::new();

  loop {
    buf.clear();
    match reader.read_until(b'\n', &mut buf).await {
      Ok(0) | Err(_) => break,
      Ok(_) => {
        if tail.len() == STDERR_TAIL_LINES {
          tail.pop_front();
        }
        tail.push_back(String::from_utf8_lossy(&buf).trim_end().to_string());
      }
    }
  }

  Vec::from(tail)
}

/// Progress shown while a command runs.
enum Progress {
  Spinner(ProgressBar),
  Plain(String),
}

impl Progress {
  fn start(title: &str, accessible: bool) -> Self {
    if accessible {
      eprintln!("{} in progress", title);
      return Progress::Plain(title.to_string());
    }

    let spinner = ProgressBar::new_spinner();
    let style = ProgressStyle::with_template("{spinner:.cyan} {msg}")
      .unwrap_or_else(|_| ProgressStyle::default_spinner());
    spinner.set_style(style);
    spinner.set_message(title.to_string());
    spinner.enable_steady_tick(Duration::from_millis(100));
    Progress::Spinner(spinner)
  }

  fn finish(self, success: bool) {
    match self {
      Progress::Spinner(spinner) => spinner.finish_and_clear(),
      Progress::Plain(title) => {
        let status = if success { "done" } else { "failed" };
        eprintln!("{} {}", title, status);
      }
    }
  }
}

//! Change detection for tracked configuration files.
//!
//! `git diff --quiet` exits 0 when the working tree matches the index for the
//! given pathspec and 1 when it does not. Detection is informational: a clean
//! tree does not stop a rebuild unless the caller asks for that.

use thiserror::Error;
use tracing::debug;

use crate::runner::{CommandRunner, RunError, describe_exit};

#[derive(Debug, Error)]
pub enum DetectError {
  #[error(transparent)]
  Run(#[from] RunError),

  /// git failed for a reason other than reporting differences (not a repository, bad pathspec).
  #[error("git diff failed with {}{}", describe_exit(.code), stderr_suffix(.stderr))]
  GitFailed { code: Option<i32>, stderr: Vec<String> },
}

fn stderr_suffix(stderr: &[String]) -> String {
  match stderr.last() {
    Some(line) => format!(": {}", line),
    None => String::new(),
  }
}

/// Whether tracked files differ from the last committed state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeStatus {
  Clean,
  Changed {
    /// Zero-context diff of the tracked files.
    diff: String,
  },
}

impl ChangeStatus {
  pub fn is_clean(&self) -> bool {
    matches!(self, ChangeStatus::Clean)
  }
}

/// Argument vector of the quiet diff check.
pub fn quiet_diff_argv(glob: &str) -> Vec<String> {
  vec!["git".into(), "diff".into(), "--quiet".into(), glob.into()]
}

/// Argument vector of the verbose, zero-context diff.
pub fn verbose_diff_argv(glob: &str) -> Vec<String> {
  vec!["git".into(), "diff".into(), "-U0".into(), glob.into()]
}

/// Check the files matching `glob` for changes and log the diff when there are any.
pub async fn detect_changes<R: CommandRunner>(runner: &R, glob: &str) -> Result<ChangeStatus, DetectError> {
  let quiet = runner.run_capturing(&quiet_diff_argv(glob)).await?;

  match quiet.code {
    Some(0) => {
      debug!(glob, "No changes detected.");
      Ok(ChangeStatus::Clean)
    }
    Some(1) => {
      let verbose = runner.run_capturing(&verbose_diff_argv(glob)).await?;
      if !verbose.success {
        return Err(DetectError::GitFailed {
          code: verbose.code,
          stderr: verbose.stderr_tail,
        });
      }
      debug!(glob, diff = %verbose.stdout, "changes detected");
      Ok(ChangeStatus::Changed { diff: verbose.stdout })
    }
    code => Err(DetectError::GitFailed {
      code,
      stderr: quiet.stderr_tail,
    }),
  }
}

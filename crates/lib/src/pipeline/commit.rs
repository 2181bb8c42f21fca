//! Commit stage: record the applied system generation in version control.

use tracing::{debug, info};

use super::types::CommitError;
use crate::runner::CommandRunner;

/// Marker `nixos-rebuild list-generations` puts on the active generation.
const CURRENT_MARKER: &str = "current";

pub fn list_generations_argv() -> Vec<String> {
  vec!["nixos-rebuild".into(), "list-generations".into()]
}

pub fn commit_argv(message: &str) -> Vec<String> {
  vec!["git".into(), "commit".into(), "-am".into(), message.into()]
}

/// Pick the line(s) marking the current generation out of `list-generations` output.
///
/// Whitespace inside each line is collapsed to single spaces; several matching
/// lines are joined with newlines. Returns `None` when nothing matches.
pub fn extract_current_generation(output: &str) -> Option<String> {
  let lines: Vec<String> = output
    .lines()
    .filter(|line| line.contains(CURRENT_MARKER))
    .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
    .collect();

  if lines.is_empty() {
    None
  } else {
    Some(lines.join("\n"))
  }
}

/// Query the current system generation.
pub async fn current_generation<R: CommandRunner>(runner: &R) -> Result<String, CommitError> {
  let result = runner.run_capturing(&list_generations_argv()).await?;
  if !result.success {
    return Err(CommitError::QueryFailed {
      code: result.code,
      stderr: result.stderr_tail,
    });
  }

  let generation = extract_current_generation(&result.stdout).ok_or(CommitError::GenerationNotFound)?;
  debug!(generation = %generation, "current generation");
  Ok(generation)
}

/// Commit all staged changes with the current generation as the message.
///
/// Returns the commit message.
pub async fn commit_generation<R: CommandRunner>(runner: &R) -> Result<String, CommitError> {
  let generation = current_generation(runner).await?;

  let result = runner.run("Committing", &commit_argv(&generation)).await?;
  if !result.success {
    return Err(CommitError::CommitFailed {
      code: result.code,
      stderr: result.stderr_tail,
    });
  }

  info!(generation = %generation, "Committed changes.");
  Ok(generation)
}

//! The rebuild pipeline.
//!
//! Stages run strictly in order and each one is a terminal failure point:
//!
//! ```text
//! stage changes -> rebuild NixOS -> [rebuild home-manager] -> [update flake]
//!   -> confirm commit -> [query generation -> commit] -> done
//! ```
//!
//! Bracketed stages depend on the settings or on the operator's answer.
//! Nothing is retried and nothing already applied is rolled back.

pub mod commit;
pub mod stage;
mod types;

use std::time::Instant;

use tracing::{debug, error, info, warn};

pub use commit::{commit_generation, current_generation, extract_current_generation};
pub use stage::{Stage, rebuild_stages};
pub use types::{COMMIT_QUESTION, CommitError, PipelineDecision, PipelineError, PipelineOutcome};

use crate::changes::detect_changes;
use crate::paths::{PathResolver, ResolvedPaths};
use crate::prompt::Prompter;
use crate::runner::CommandRunner;
use crate::settings::RebuildSettings;

/// Run the rebuild stages and the commit stage.
///
/// Returns `NotRequested` without running anything when `should_rebuild` is false.
pub async fn run_pipeline<R: CommandRunner, P: Prompter>(
  settings: &RebuildSettings,
  paths: &ResolvedPaths,
  should_rebuild: bool,
  runner: &R,
  prompter: &mut P,
) -> Result<PipelineOutcome, PipelineError> {
  if !should_rebuild {
    info!("Rebuild declined.");
    return Ok(PipelineOutcome::NotRequested);
  }

  for stage in rebuild_stages(settings, paths) {
    if stage.is_skipped(settings) {
      debug!(stage = %stage.title, "skipping stage");
      continue;
    }
    run_stage(&stage, runner).await?;
  }

  if !prompter.confirm(COMMIT_QUESTION)? {
    info!("Success!");
    return Ok(PipelineOutcome::Rebuilt);
  }

  let generation = commit_generation(runner).await.inspect_err(|e| {
    error!(stage = "Committing", error = %e, "Could not commit changes.");
  })?;

  info!("Success!");
  Ok(PipelineOutcome::Committed { generation })
}

/// Check for changes, then run the pipeline.
///
/// A clean tree is informational unless `settings.skip_when_unchanged` is set.
pub async fn rebuild<R: CommandRunner, P: Prompter>(
  settings: &RebuildSettings,
  paths: &ResolvedPaths,
  should_rebuild: bool,
  runner: &R,
  prompter: &mut P,
) -> Result<PipelineOutcome, PipelineError> {
  let status = detect_changes(runner, &settings.tracked_glob).await?;

  if should_rebuild && status.is_clean() && settings.skip_when_unchanged {
    info!("No changes to tracked files, skipping rebuild.");
    return Ok(PipelineOutcome::SkippedUnchanged);
  }

  run_pipeline(settings, paths, should_rebuild, runner, prompter).await
}

/// Resolve the configured paths and rebuild, unless the rebuild was declined.
///
/// A declined run ends before any path is resolved, so a stale path in the
/// settings document cannot fail it. Its change check only logs.
pub async fn rebuild_from_settings<R: CommandRunner, P: Prompter>(
  settings: &RebuildSettings,
  resolver: &PathResolver,
  should_rebuild: bool,
  runner: &R,
  prompter: &mut P,
) -> Result<PipelineOutcome, PipelineError> {
  if !should_rebuild {
    if let Err(e) = detect_changes(runner, &settings.tracked_glob).await {
      warn!(error = %e, "could not check for changes");
    }
    info!("Rebuild declined.");
    return Ok(PipelineOutcome::NotRequested);
  }

  let paths = resolver.resolve_settings(settings).inspect_err(|e| {
    error!(error = %e, "Invalid settings.");
  })?;

  rebuild(settings, &paths, should_rebuild, runner, prompter).await
}

async fn run_stage<R: CommandRunner>(stage: &Stage, runner: &R) -> Result<(), PipelineError> {
  let start = Instant::now();

  let result = runner.run(&stage.title, &stage.argv).await.map_err(|source| {
    error!(stage = %stage.title, error = %source, "{}", stage.failure_message);
    PipelineError::Run {
      title: stage.title.clone(),
      source,
    }
  })?;

  if !result.success {
    for line in &result.stderr_tail {
      debug!(stage = %stage.title, "{}", line);
    }
    error!(stage = %stage.title, code = ?result.code, "{}", stage.failure_message);
    return Err(PipelineError::StageFailed {
      title: stage.title.clone(),
      message: stage.failure_message.to_string(),
      code: result.code,
      stderr: result.stderr_tail,
    });
  }

  info!(elapsed = ?start.elapsed(), "{}", stage.success_message);
  Ok(())
}

//! Types for the rebuild pipeline.

use thiserror::Error;

use crate::changes::DetectError;
use crate::paths::ResolveError;
use crate::prompt::PromptError;
use crate::runner::{RunError, describe_exit};

/// Title of the commit confirmation.
pub const COMMIT_QUESTION: &str = "Commit changes?";

/// The operator's go/no-go answers for one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineDecision {
  pub should_rebuild: bool,
  pub should_commit: bool,
}

/// How a pipeline run ended without error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineOutcome {
  /// The operator declined the rebuild.
  NotRequested,
  /// Tracked files were unchanged and the settings ask to skip in that case.
  SkippedUnchanged,
  /// Every rebuild stage succeeded; the commit was declined.
  Rebuilt,
  /// Every stage succeeded and the result was committed.
  Committed {
    /// The commit message.
    generation: String,
  },
}

impl PipelineOutcome {
  /// The decisions that led to this outcome.
  pub fn decision(&self) -> PipelineDecision {
    match self {
      PipelineOutcome::NotRequested => PipelineDecision::default(),
      PipelineOutcome::SkippedUnchanged | PipelineOutcome::Rebuilt => PipelineDecision {
        should_rebuild: true,
        should_commit: false,
      },
      PipelineOutcome::Committed { .. } => PipelineDecision {
        should_rebuild: true,
        should_commit: true,
      },
    }
  }
}

/// Errors from the commit stage.
#[derive(Debug, Error)]
pub enum CommitError {
  #[error(transparent)]
  Run(#[from] RunError),

  #[error("could not list system generations ({})", describe_exit(.code))]
  QueryFailed { code: Option<i32>, stderr: Vec<String> },

  #[error("no current generation in nixos-rebuild output")]
  GenerationNotFound,

  #[error("could not commit changes ({})", describe_exit(.code))]
  CommitFailed { code: Option<i32>, stderr: Vec<String> },
}

/// Fatal pipeline errors. The first one ends the run.
#[derive(Debug, Error)]
pub enum PipelineError {
  /// A stage's command exited non-zero.
  #[error("{message} ({title}: {})", describe_exit(.code))]
  StageFailed {
    title: String,
    message: String,
    code: Option<i32>,
    stderr: Vec<String>,
  },

  /// A stage's command could not be run at all.
  #[error("could not run '{title}'")]
  Run {
    title: String,
    #[source]
    source: RunError,
  },

  /// A configured path does not lead to its required file.
  #[error(transparent)]
  Resolve(#[from] ResolveError),

  #[error("could not check for changes")]
  Detect(#[from] DetectError),

  #[error(transparent)]
  Prompt(#[from] PromptError),

  #[error(transparent)]
  Commit(#[from] CommitError),
}

impl PipelineError {
  /// Last stderr lines of the failed command, if any were kept.
  pub fn stderr_tail(&self) -> &[String] {
    match self {
      PipelineError::StageFailed { stderr, .. }
      | PipelineError::Commit(CommitError::QueryFailed { stderr, .. })
      | PipelineError::Commit(CommitError::CommitFailed { stderr, .. }) => stderr,
      _ => &[],
    }
  }
}

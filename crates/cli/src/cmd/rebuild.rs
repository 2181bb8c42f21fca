//! Implementation of the `nixrb rebuild` command.
//!
//! Loads the settings document, asks for any missing paths, then drives the
//! rebuild pipeline against the real system.

use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::info;

use nixrb_lib::collect::collect_settings;
use nixrb_lib::paths::PathResolver;
use nixrb_lib::pipeline::{PipelineOutcome, rebuild_from_settings};
use nixrb_lib::runner::SystemRunner;

use crate::output::{format_duration, print_detail, print_info, print_success};
use crate::prompts::TerminalPrompter;

/// Flags of the `rebuild` subcommand.
#[derive(Debug, Clone, Copy, Default)]
pub struct RebuildArgs {
  pub assume_yes: bool,
  pub skip_unchanged: bool,
  pub save: bool,
  pub accessible: bool,
}

/// Execute the rebuild command.
///
/// # Errors
///
/// Returns an error if the settings document cannot be loaded, the form is
/// cancelled, or a requested rebuild fails (unresolvable path or failed stage).
pub fn cmd_rebuild(config: Option<&Path>, args: RebuildArgs, verbose: bool) -> Result<()> {
  let start = Instant::now();
  let (config_path, mut configuration) = super::load_configuration(config, verbose)?;

  let resolver = PathResolver::from_env().context("Failed to determine the working directory")?;
  let mut prompter = TerminalPrompter::new(args.assume_yes);

  let collected = collect_settings(configuration.rebuild.clone(), &resolver, &mut prompter)
    .context("Settings form aborted")?;

  if args.save
    && configuration
      .save_entered_paths(&config_path, &collected.settings, collected.changed)
      .context("Failed to save settings document")?
  {
    info!(path = %config_path.display(), "saved entered paths");
  }

  let mut settings = collected.settings;
  if args.skip_unchanged {
    settings.skip_when_unchanged = true;
  }

  let runner = SystemRunner::new(args.accessible);
  let rt = tokio::runtime::Runtime::new().context("Failed to create async runtime")?;
  let outcome = rt.block_on(rebuild_from_settings(
    &settings,
    &resolver,
    collected.should_rebuild,
    &runner,
    &mut prompter,
  ));

  let outcome = match outcome {
    Ok(outcome) => outcome,
    Err(e) => {
      for line in e.stderr_tail() {
        print_detail(line);
      }
      return Err(e).context("Rebuild failed");
    }
  };

  let elapsed = format_duration(start.elapsed());
  match outcome {
    PipelineOutcome::NotRequested => print_info("Rebuild not requested, nothing to do"),
    PipelineOutcome::SkippedUnchanged => print_info("No tracked files changed, rebuild skipped"),
    PipelineOutcome::Rebuilt => print_success(&format!("Rebuild complete in {}", elapsed)),
    PipelineOutcome::Committed { generation } => print_success(&format!(
      "Rebuild complete in {}, committed generation: {}",
      elapsed, generation
    )),
  }

  Ok(())
}

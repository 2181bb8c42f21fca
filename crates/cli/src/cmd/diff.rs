//! Implementation of the `nixrb diff` command.

use std::path::Path;

use anyhow::{Context, Result};

use nixrb_lib::changes::{ChangeStatus, detect_changes};
use nixrb_lib::runner::SystemRunner;

use crate::output::{print_diff, print_info};

pub fn cmd_diff(config: Option<&Path>, verbose: bool) -> Result<()> {
  let (_, configuration) = super::load_configuration(config, verbose)?;
  let glob = &configuration.rebuild.tracked_glob;

  let runner = SystemRunner::new(true);
  let rt = tokio::runtime::Runtime::new().context("Failed to create async runtime")?;
  let status = rt
    .block_on(detect_changes(&runner, glob))
    .context("Failed to check for changes")?;

  match status {
    ChangeStatus::Clean => print_info(&format!("No changes to files matching {}", glob)),
    ChangeStatus::Changed { diff } => print_diff(&diff),
  }

  Ok(())
}

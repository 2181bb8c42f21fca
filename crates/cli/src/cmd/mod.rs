mod diff;
mod init;
mod rebuild;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use nixrb_lib::settings::{Configuration, find_config_path};

use crate::logging;

pub use diff::cmd_diff;
pub use init::cmd_init;
pub use rebuild::{RebuildArgs, cmd_rebuild};

/// Locate and load the settings document, then install logging from it.
fn load_configuration(explicit: Option<&Path>, verbose: bool) -> Result<(PathBuf, Configuration)> {
  let path = find_config_path(explicit).context("Failed to find settings document")?;
  let configuration = Configuration::load(&path).context("Failed to load settings document")?;
  logging::init(&configuration.logging, verbose);
  Ok((path, configuration))
}
